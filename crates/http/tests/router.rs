// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Router-level tests that need no live database: `/v1/health` is a static
//! response, and `connect_lazy` lets `/v1/ready` exercise the "store
//! unavailable" path (spec §8 scenario 6) without a real Postgres instance.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::Algorithm;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;
use walletd_auth::JwtSettings;
use walletd_http::{router, AppState};
use walletd_ledger::Engine;

fn state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://wallet-ledger-tests-unreachable:5432/db")
        .expect("connect_lazy never actually connects");
    let engine = Engine::new(pool, Uuid::new_v4());
    let jwt_settings = JwtSettings {
        secret: "test-secret".to_string(),
        audience: "wallet-ledger".to_string(),
        algorithms: vec![Algorithm::HS256],
    };
    AppState { engine, jwt_settings, default_asset: "USD".to_string() }
}

#[tokio::test]
async fn health_is_always_ok() {
    let app = router(state());
    let response = app
        .oneshot(Request::builder().uri("/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn ready_is_service_unavailable_when_store_is_unreachable() {
    let app = router(state());
    let response = app
        .oneshot(Request::builder().uri("/v1/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let app = router(state());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/wallets/{}/balance", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_idempotency_key_on_transfer_is_unauthorized() {
    let app = router(state());
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(Algorithm::HS256),
        &serde_json::json!({ "sub": "svc", "aud": "wallet-ledger", "scope": "wallet:write" }),
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    let app = app;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/transfers")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "from_wallet_id": Uuid::new_v4(),
                        "to_wallet_id": Uuid::new_v4(),
                        "amount": "1.00"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
