// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

/// The ledger's error taxonomy. Every fallible operation in this workspace
/// returns one of these kinds; the HTTP layer maps each to a status code.
///
/// The engine never retries internally — any error rolls back the current
/// transaction and surfaces here unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input violates a structural or domain rule. Maps to 422.
    #[error("validation: {0}")]
    Validation(String),

    /// Referenced wallet, projection, or transaction does not exist. Maps to 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness violation, optimistic version conflict, or idempotency-key
    /// reuse with a different payload. Maps to 409.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid bearer token, or a missing required header. Maps to 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Token valid but missing a required scope. Maps to 403.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The store is unreachable or failing outside the engine's scope. The
    /// client may retry. Maps to 503. Never constructed from a raw driver
    /// error message — those are logged server-side and collapsed to this.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
