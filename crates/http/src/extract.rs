// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use walletd_auth::{decode_bearer_token, AuthContext};
use walletd_core::Error;

use crate::error::ApiError;
use crate::AppState;

/// Extracts and decodes the bearer token from `Authorization`. Route
/// handlers that require a particular scope call `require_scope` on the
/// resulting context themselves, since the required scope differs per
/// route (§6) and can't be encoded in the extractor type alone without one
/// marker type per scope.
pub struct Authenticated(pub AuthContext);

impl<S> FromRequestParts<S> for Authenticated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::Unauthorized("missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("Authorization header must be a Bearer token".to_string()))?;

        let ctx = decode_bearer_token(token, &state.jwt_settings)?;
        Ok(Authenticated(ctx))
    }
}

/// Extracts the `Idempotency-Key` header, required on every write route.
/// A missing key is treated as an authorization failure (§8) rather than a
/// validation failure, matching the original service's boundary behavior.
pub struct IdempotencyKey(pub String);

impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get("Idempotency-Key")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Unauthorized("Idempotency-Key header is required".to_string()))?;

        Ok(IdempotencyKey(key.to_string()))
    }
}
