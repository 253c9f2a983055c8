//! Bearer token extraction.
//!
//! [`BearerToken`] only locates the token. [`VerifiedToken`] and
//! [`ManagementToken`] also check it against the gateway, so handlers that
//! read a body can refuse the caller before the body is touched.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::auth::TokenClaims;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Message for requests that carry no token at all.
pub const MISSING_TOKEN: &str = "Missing token parameter.";

/// Raw bearer token taken from the request.
///
/// Looked up in the `Authorization: Bearer` header first, then in a `token`
/// query parameter.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// The token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn token_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn token_from_query(parts: &Parts) -> Option<String> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "token" && !value.is_empty() {
            urlencoding::decode(value).ok().map(|s| s.into_owned())
        } else {
            None
        }
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_header(parts)
            .or_else(|| token_from_query(parts))
            .map(BearerToken)
            .ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN))
    }
}

/// A token that verified, with its claims.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub token: BearerToken,
    pub claims: TokenClaims,
}

impl VerifiedToken {
    /// The token string, for passing on to the gateway.
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for VerifiedToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.gateway.authorize(token.as_str())?;
        Ok(Self { token, claims })
    }
}

/// A verified token whose role is Management.
#[derive(Debug, Clone)]
pub struct ManagementToken(pub VerifiedToken);

impl ManagementToken {
    /// The token string, for passing on to the gateway.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ManagementToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.gateway.authorize_management(token.as_str())?;
        Ok(Self(VerifiedToken { token, claims }))
    }
}
