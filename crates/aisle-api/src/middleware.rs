use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use aisle_types::api::{Claims, Role};

use crate::auth::AppState;
use crate::error::ApiError;

type BearerHeader = TypedHeader<Authorization<Bearer>>;

fn decode_claims(secret: &str, header: Option<BearerHeader>) -> Result<Claims, ApiError> {
    let TypedHeader(Authorization(bearer)) = header.ok_or(ApiError::Unauthorized)?;

    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;

    Ok(token_data.claims)
}

async fn require_role(
    role: Role,
    state: AppState,
    header: Option<BearerHeader>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_claims(&state.jwt_secret, header)?;
    if claims.role != role {
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Party routes: a guest session whose `sub` is the party email.
pub async fn require_guest(
    State(state): State<AppState>,
    header: Option<BearerHeader>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(Role::Guest, state, header, req, next).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    header: Option<BearerHeader>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(Role::Admin, state, header, req, next).await
}
