use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Response header carrying the machine-readable error kind.
pub const ERROR_KIND_HEADER: HeaderName = HeaderName::from_static("x-error-kind");

/// Request failures. `Display` is the plain-text body sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Missing product ID.")]
    MissingProductId,

    #[error("Malformed request body.")]
    MalformedBody,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("UserName has existed ! Please enter a different one !")]
    UsernameTaken,

    #[error("Passwords don't match ! Enter again !")]
    PasswordMismatch,

    #[error("User not logged in.")]
    NotLoggedIn,

    #[error("Product already sold.")]
    AlreadySold,

    #[error("Choosing A Category!")]
    CategoryRequired,

    #[error("Price must be a non-negative number.")]
    InvalidPrice,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFields,
    MissingProductId,
    MalformedBody,
    InvalidCredentials,
    UsernameTaken,
    PasswordMismatch,
    NotLoggedIn,
    AlreadySold,
    CategoryRequired,
    InvalidPrice,
    NotFound,
    ServerError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::MissingProductId => "missing_product_id",
            Self::MalformedBody => "malformed_body",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UsernameTaken => "username_taken",
            Self::PasswordMismatch => "password_mismatch",
            Self::NotLoggedIn => "not_logged_in",
            Self::AlreadySold => "already_sold",
            Self::CategoryRequired => "category_required",
            Self::InvalidPrice => "invalid_price",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields(_) => ErrorKind::MissingFields,
            Self::MissingProductId => ErrorKind::MissingProductId,
            Self::MalformedBody => ErrorKind::MalformedBody,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::UsernameTaken => ErrorKind::UsernameTaken,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
            Self::NotLoggedIn => ErrorKind::NotLoggedIn,
            Self::AlreadySold => ErrorKind::AlreadySold,
            Self::CategoryRequired => ErrorKind::CategoryRequired,
            Self::InvalidPrice => ErrorKind::InvalidPrice,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::ServerError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The cause stays in the log; the client only sees the fixed message.
        if let Self::Internal(e) = &self {
            error!("Request failed: {:#}", e);
        }

        let kind = HeaderValue::from_static(self.kind().as_str());
        (self.status(), [(ERROR_KIND_HEADER, kind)], self.to_string()).into_response()
    }
}
