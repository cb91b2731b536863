//! JWT issuing and verification.
//!
//! Access tokens are HMAC-SHA256 JWTs carrying the user's id, email and granted roles. They are
//! issued at login, are valid for seven days, and do not refresh. The [`TokenVerifier`] is shared
//! with the ACL middleware, which stashes the validated [`JwtClaims`] in the request extensions
//! for handlers to extract.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::Duration;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub email: String,
    pub roles: bistro_engine::db_types::Roles,
}

/// Extracts the validated claims that the ACL middleware placed in the request extensions.
/// Handlers that take a `JwtClaims` argument therefore only run behind authenticated routes.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<JwtClaims>()
            .cloned()
            .ok_or(ServerError::AuthenticationError(AuthError::MissingToken));
        ready(claims)
    }
}

pub struct TokenIssuer {
    key: Hs256Key,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key }
    }

    /// Issues a new access token for the given claims, valid for [`TOKEN_VALIDITY_DAYS`] days.
    pub fn issue_token(&self, claims: JwtClaims) -> Result<String, ServerError> {
        let time_options = TimeOptions::default();
        let claims = Claims::new(claims).set_duration_and_issuance(&time_options, Duration::days(TOKEN_VALIDITY_DAYS));
        let header = Header::empty().with_token_type("JWT");
        let token = Hs256
            .token(&header, &claims, &self.key)
            .map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))?;
        Ok(token)
    }
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: Hs256Key,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key }
    }

    /// Checks the token's signature and expiry and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let token = Hs256
            .validator::<JwtClaims>(&self.key)
            .validate(&untrusted)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        token
            .claims()
            .validate_expiration(&TimeOptions::default())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(token.claims().custom.clone())
    }
}
