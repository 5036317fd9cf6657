pub mod guards;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use course_domain::Session;
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::ApiError, routes::AppState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub github_id: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
    #[error("Authentication token has expired")]
    ExpiredToken,
    #[error("Unknown user")]
    UnknownUser,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            expiration_hours,
        }
    }

    pub fn generate_token(
        &self,
        user_id: i64,
        github_id: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            github_id: github_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Authenticates the bearer token and attaches the caller's [`Session`],
/// loaded fresh from the database, to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = state.jwt.validate_token(&token).inspect_err(|err| {
        warn!("authentication failed: {err}");
    })?;

    let session = state
        .users
        .load_session(claims.user_id)
        .await?
        .ok_or(AuthError::UnknownUser)?;
    debug!(user_id = session.user_id, "request authenticated");

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// The authenticated caller's session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(ApiError::Authentication(AuthError::MissingToken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough!!";

    #[test]
    fn test_jwt_round_trip() {
        let jwt = JwtService::new(SECRET, 24);
        let token = jwt.generate_token(42, "octocat").unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.github_id, "octocat");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtService::new("another-secret-that-is-long-enough", 24)
            .generate_token(1, "someone")
            .unwrap();
        let result = JwtService::new(SECRET, 24).validate_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = JwtService::new(SECRET, -2).generate_token(1, "late").unwrap();
        let result = JwtService::new(SECRET, 24).validate_token(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = JwtService::new(SECRET, 24).validate_token("not.a.jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
