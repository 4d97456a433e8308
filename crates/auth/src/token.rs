// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use std::collections::HashSet;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use walletd_core::Error;

/// The subset of `Config` the token provider needs, kept separate so the
/// auth crate never depends on the whole configuration surface.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    scope: String,
}

/// The authenticated identity and scope set carried forward from a decoded
/// bearer token into the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub scope: HashSet<String>,
}

/// Decodes and validates a `Bearer` token: checks the HMAC-SHA-256 signature
/// and the configured audience, then extracts `sub` and `scope`. `exp` is
/// validated when present (jsonwebtoken's default), but not required — the
/// claims this service relies on are `sub`, `aud`, and `scope` only.
pub fn decode_bearer_token(token: &str, settings: &JwtSettings) -> Result<AuthContext, Error> {
    let mut validation = Validation::new(
        settings.algorithms.first().copied().unwrap_or(Algorithm::HS256),
    );
    validation.algorithms = settings.algorithms.clone();
    validation.required_spec_claims.clear();
    validation.set_audience(&[settings.audience.as_str()]);

    let key = DecodingKey::from_secret(settings.secret.as_bytes());
    let data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| Error::Unauthorized(format!("invalid token: {e}")))?;

    let scope = data
        .claims
        .scope
        .split(' ')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(AuthContext { subject: data.claims.sub, scope })
}

/// Fails with `Forbidden` when `required` is absent from the context's scope set.
pub fn require_scope(ctx: &AuthContext, required: &str) -> Result<(), Error> {
    if ctx.scope.contains(required) {
        Ok(())
    } else {
        Err(Error::Forbidden(format!("missing scope: {required}")))
    }
}
