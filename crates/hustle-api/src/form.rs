//! Body extractor accepting the three encodings browsers and scripts send
//! forms in: urlencoded, `multipart/form-data` (`FormData`) and JSON.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;

/// Form fields deserialized into `T`. All values arrive as strings.
#[derive(Debug)]
pub struct FormInput<T>(pub T);

impl<S, T> FromRequest<S> for FormInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let fields = if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| {
                    warn!("Rejected urlencoded body: {}", e);
                    ApiError::MalformedBody
                })?;
            map.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
        } else if content_type.starts_with("multipart/form-data") {
            read_multipart(req, state).await?
        } else if content_type.starts_with("application/json") {
            let Json(map) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| {
                    warn!("Rejected JSON body: {}", e);
                    ApiError::MalformedBody
                })?;
            map.into_iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k, Value::String(s))))
                .collect()
        } else {
            // No recognizable body: every field is missing.
            Map::new()
        };

        serde_json::from_value(Value::Object(fields))
            .map(FormInput)
            .map_err(|e| {
                warn!("Form fields did not match: {}", e);
                ApiError::MalformedBody
            })
    }
}

async fn read_multipart<S: Send + Sync>(
    req: Request,
    state: &S,
) -> Result<Map<String, Value>, ApiError> {
    let malformed = |e: &dyn std::fmt::Display| {
        warn!("Rejected multipart body: {}", e);
        ApiError::MalformedBody
    };

    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| malformed(&e))?;

    let mut fields = Map::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| malformed(&e))? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        // file uploads are not part of any form
        if field.file_name().is_some() {
            continue;
        }
        let value = field.text().await.map_err(|e| malformed(&e))?;
        fields.insert(name, Value::String(value));
    }

    Ok(fields)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A field's value, treating an empty string as absent.
pub fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present() {
        assert_eq!(present(Some("x".into())), Some("x".into()));
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(serde_json::json!(12.5)), Some("12.5".into()));
        assert_eq!(scalar_to_string(serde_json::json!(7)), Some("7".into()));
        assert_eq!(scalar_to_string(serde_json::json!("a")), Some("a".into()));
        assert_eq!(scalar_to_string(Value::Null), None);
    }
}
