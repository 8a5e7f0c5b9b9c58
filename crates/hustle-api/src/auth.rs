use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{extract::State, http::HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use hustle_types::api::{LoginForm, SignUpForm};

use crate::error::ApiError;
use crate::form::{FormInput, present};
use crate::session::{SessionUser, removal_cookie, session_cookie, session_id};
use crate::state::{AppState, run_blocking};

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    FormInput(form): FormInput<LoginForm>,
) -> Result<(CookieJar, &'static str), ApiError> {
    let (Some(username), Some(password)) = (present(form.username), present(form.password)) else {
        return Err(ApiError::MissingFields("Missing username or password."));
    };

    let user = run_blocking(&state, move |db| {
        let Some(user) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };
        Ok(verify_password(&password, &user.password)?.then_some(user))
    })
    .await?
    .ok_or_else(|| {
        warn!("Failed login attempt");
        ApiError::InvalidCredentials
    })?;

    // A fresh login replaces whatever session this client had.
    if let Some(old) = session_id(&headers) {
        state.sessions.remove(&old);
    }

    let id = state.sessions.create(SessionUser {
        user_id: user.user_id,
        username: user.username.clone(),
    });
    info!("User '{}' logged in", user.username);

    let jar = CookieJar::from_headers(&headers).add(session_cookie(id));
    Ok((jar, "success"))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> (CookieJar, &'static str) {
    if let Some(user) = session_id(&headers).and_then(|id| state.sessions.remove(&id)) {
        info!("User '{}' logged out", user.username);
    }

    let jar = CookieJar::from_headers(&headers).remove(removal_cookie());
    (jar, "successfully logged out")
}

pub async fn check_login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    state
        .current_user(&headers)
        .map(|user| user.username)
        .ok_or(ApiError::NotLoggedIn)
}

pub async fn sign_up(
    State(state): State<AppState>,
    FormInput(form): FormInput<SignUpForm>,
) -> Result<&'static str, ApiError> {
    let (Some(username), Some(password), Some(rec_password)) = (
        present(form.username),
        present(form.password),
        present(form.rec_password),
    ) else {
        return Err(ApiError::MissingFields("Missing Information in the form"));
    };
    let email = present(form.email);

    let lookup = username.clone();
    if run_blocking(&state, move |db| db.username_exists(&lookup)).await? {
        return Err(ApiError::UsernameTaken);
    }
    if password != rec_password {
        return Err(ApiError::PasswordMismatch);
    }

    let name = username.clone();
    let created = run_blocking(&state, move |db| {
        let hash = hash_password(&password)?;
        db.create_user(&name, &hash, email.as_deref())
    })
    .await?;

    // Another sign-up may have claimed the name since the check above.
    let user_id = created.ok_or(ApiError::UsernameTaken)?;
    info!("Created account '{}' (id {})", username, user_id);

    Ok("Your Account has been created !")
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, phc: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| anyhow!("corrupt password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        assert!(verify_password("pw", "plaintext-pw").is_err());
    }
}
