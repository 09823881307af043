//! Customer JWT authentication
//!
//! Tokens are issued elsewhere; this service only verifies them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// JWT claims for customer authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerClaims {
    /// User ID
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller extracted from JWT
#[derive(Debug, Clone, Copy)]
pub struct CustomerIdentity {
    pub user_id: Uuid,
}

/// Create a JWT token for a user
#[cfg(test)]
pub fn create_token(
    user_id: Uuid,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header};

    let now = chrono::Utc::now();
    let claims = CustomerClaims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(token: &str, secret: &str) -> Result<CustomerIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<CustomerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;
    Ok(CustomerIdentity { user_id })
}

/// Middleware that extracts and verifies the customer JWT from the Authorization header
pub async fn customer_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::NotAuthenticated,
                "Missing Authorization header",
            )
            .into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::invalid_token("Invalid Authorization format").into_response()
    })?;

    let identity = verify(token, &state.jwt_secret).map_err(IntoResponse::into_response)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
