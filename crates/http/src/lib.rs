// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod dto;
mod error;
mod extract;
mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use walletd_auth::JwtSettings;
use walletd_ledger::Engine;

pub use error::{ApiError, ApiResult};

/// Shared handler state: the ledger engine plus the settings needed to
/// validate bearer tokens. Cheap to clone — `Engine` and `JwtSettings` are
/// themselves thin handles (a connection pool, a secret and an audience).
#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub jwt_settings: JwtSettings,
    /// Asset code substituted for any request that omits `asset` (§6).
    pub default_asset: String,
}

/// Builds the service's route table (§6). Every route is wired exactly
/// once here; handlers enforce their own required scope since axum has no
/// first-class way to attach per-route metadata to an extractor type.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/wallets", post(handlers::create_wallet))
        .route("/v1/wallets/:id/balance", get(handlers::get_balance))
        .route("/v1/wallets/:id/balance/audit", get(handlers::audit_balance))
        .route("/v1/transfers", post(handlers::post_transfer))
        .route("/v1/adjustments", post(handlers::post_adjustment))
        .route("/v1/transactions/:id", get(handlers::get_transaction))
        .route("/v1/health", get(handlers::health))
        .route("/v1/ready", get(handlers::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
