use std::sync::Arc;

use axum::{Json, extract::State};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use aisle_db::Database;
use aisle_types::api::{AdminLoginRequest, Claims, GuestLoginRequest, Role, SessionResponse};

use crate::assistant::Assistant;
use crate::error::ApiError;
use crate::files::Storage;
use crate::query::{self, ReadRetry};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub storage: Storage,
    pub assistant: Assistant,
    pub jwt_secret: String,
    /// Unset means admin sign-in is disabled.
    pub admin_password: Option<String>,
    pub read_retry: ReadRetry,
}

const SESSION_DAYS: i64 = 30;

/// Plain equality against the configured secret. A missing secret or a
/// missing/empty password is always a mismatch.
pub fn validate_admin_password(configured: Option<&str>, supplied: Option<&str>) -> bool {
    match (configured, supplied) {
        (Some(expected), Some(given)) => {
            !expected.is_empty() && !given.is_empty() && expected == given
        }
        _ => false,
    }
}

/// Guest "login" is an existence check on the full name, not a credential.
/// The session it issues is bound to the matching party's email.
pub async fn guest_login(
    State(state): State<AppState>,
    Json(req): Json<GuestLoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let name = req.full_name.clone();
    let guest = query::read(&state, move |db| db.find_guest_by_full_name(&name))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let token = create_token(&state.jwt_secret, &guest.email, Some(&guest.full_name), Role::Guest)
        .map_err(ApiError::Save)?;

    info!("Guest session issued for party {}", guest.email);
    Ok(Json(SessionResponse {
        token,
        role: Role::Guest,
        email: Some(guest.email),
    }))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if !validate_admin_password(state.admin_password.as_deref(), Some(&req.password)) {
        return Err(ApiError::Unauthorized);
    }

    let token =
        create_token(&state.jwt_secret, "admin", None, Role::Admin).map_err(ApiError::Save)?;

    info!("Admin session issued");
    Ok(Json(SessionResponse {
        token,
        role: Role::Admin,
        email: None,
    }))
}

pub fn create_token(
    secret: &str,
    sub: &str,
    name: Option<&str>,
    role: Role,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: sub.to_string(),
        name: name.map(String::from),
        role,
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_password_needs_both_sides() {
        assert!(validate_admin_password(Some("hunter2"), Some("hunter2")));
        assert!(!validate_admin_password(Some("hunter2"), Some("Hunter2")));
        assert!(!validate_admin_password(Some("hunter2"), None));
        assert!(!validate_admin_password(None, Some("hunter2")));
        assert!(!validate_admin_password(Some(""), Some("")));
    }
}
