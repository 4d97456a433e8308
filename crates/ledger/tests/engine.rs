// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Integration tests against a real Postgres instance, exercising the
//! properties in spec §8. Gated behind `DATABASE_URL` so the rest of the
//! suite runs without a database; see `setup` below.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;
use walletd_core::{Direction, Error};
use walletd_ledger::{AdjustmentInput, Engine, TransferInput};

/// Connects to `DATABASE_URL` and lays down the schema (idempotent —
/// `CREATE TABLE IF NOT EXISTS`), returning `None` when the env var is
/// unset so callers can skip rather than fail.
async fn setup() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new().connect(&database_url).await.expect("connect to test database");

    for sql in [
        include_str!("../../../migrations/0001_create_schema_migrations.sql"),
        include_str!("../../../migrations/0002_create_accounts.sql"),
        include_str!("../../../migrations/0003_create_balance_projections.sql"),
        include_str!("../../../migrations/0004_create_journal_transactions.sql"),
        include_str!("../../../migrations/0005_create_journal_entries.sql"),
        include_str!("../../../migrations/0006_create_outbox_events.sql"),
    ] {
        sqlx::raw_sql(sql).execute(&pool).await.expect("apply schema");
    }

    Some(pool)
}

async fn engine_with_system_wallet(pool: PgPool) -> (Engine, Uuid) {
    let system_wallet_id = Uuid::new_v4();
    let engine = Engine::new(pool, system_wallet_id);
    engine.create_wallet(system_wallet_id, "USD").await.expect("create system wallet");
    (engine, system_wallet_id)
}

fn idem(label: &str) -> String {
    format!("{label}-{}", Uuid::new_v4())
}

#[tokio::test]
async fn transfer_happy_path_and_idempotent_replay() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();
    engine.create_wallet(b, "USD").await.unwrap();

    let key = idem("transfer");
    let input = TransferInput {
        idempotency_key: key.clone(),
        from_wallet_id: a,
        to_wallet_id: b,
        amount: dec!(10.25),
        asset: "USD".to_string(),
        external_reference: None,
        expected_from_version: None,
        expected_to_version: None,
    };

    let first = engine.post_transfer(input.clone()).await.unwrap();

    let balance_a = engine.get_balance(a).await.unwrap();
    let balance_b = engine.get_balance(b).await.unwrap();
    assert_eq!(balance_a.balance, dec!(-10.25));
    assert_eq!(balance_b.balance, dec!(10.25));

    // P4: replaying the same key + payload returns the same transaction and
    // mutates nothing further.
    let second = engine.post_transfer(input).await.unwrap();
    assert_eq!(first.transaction_id, second.transaction_id);

    let balance_a_after = engine.get_balance(a).await.unwrap();
    let balance_b_after = engine.get_balance(b).await.unwrap();
    assert_eq!(balance_a_after.balance, dec!(-10.25));
    assert_eq!(balance_b_after.balance, dec!(10.25));
}

#[tokio::test]
async fn idempotency_key_reuse_with_different_payload_conflicts() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();
    engine.create_wallet(b, "USD").await.unwrap();

    let key = idem("transfer-mismatch");
    let base = TransferInput {
        idempotency_key: key.clone(),
        from_wallet_id: a,
        to_wallet_id: b,
        amount: dec!(10.25),
        asset: "USD".to_string(),
        external_reference: None,
        expected_from_version: None,
        expected_to_version: None,
    };
    engine.post_transfer(base.clone()).await.unwrap();

    let mut mismatched = base;
    mismatched.amount = dec!(10.26);
    let err = engine.post_transfer(mismatched).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // State from the first post is untouched.
    let balance_a = engine.get_balance(a).await.unwrap();
    assert_eq!(balance_a.balance, dec!(-10.25));
}

#[tokio::test]
async fn projection_matches_audit_after_transfer() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();
    engine.create_wallet(b, "USD").await.unwrap();

    engine
        .post_transfer(TransferInput {
            idempotency_key: idem("audit"),
            from_wallet_id: a,
            to_wallet_id: b,
            amount: dec!(10.25),
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: None,
            expected_to_version: None,
        })
        .await
        .unwrap();

    let projected = engine.get_balance(a).await.unwrap();
    let audited = engine.audit_balance(a).await.unwrap();
    assert_eq!(projected.balance, audited.balance);
    assert_eq!(audited.balance, dec!(-10.25));
}

#[tokio::test]
async fn optimistic_version_conflict_on_stale_expected_version() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();
    engine.create_wallet(b, "USD").await.unwrap();
    engine.create_wallet(c, "USD").await.unwrap();

    let stale_version = engine.get_balance(a).await.unwrap().version;

    engine
        .post_transfer(TransferInput {
            idempotency_key: idem("v1"),
            from_wallet_id: a,
            to_wallet_id: b,
            amount: dec!(1),
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: Some(stale_version),
            expected_to_version: None,
        })
        .await
        .unwrap();

    // P7: a second write using the now-stale expected version conflicts.
    let err = engine
        .post_transfer(TransferInput {
            idempotency_key: idem("v2"),
            from_wallet_id: a,
            to_wallet_id: c,
            amount: dec!(1),
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: Some(stale_version),
            expected_to_version: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn adjustment_credits_wallet_and_debits_system_wallet() {
    let Some(pool) = setup().await else { return };
    let (engine, system_wallet_id) = engine_with_system_wallet(pool).await;

    let wallet = Uuid::new_v4();
    engine.create_wallet(wallet, "USD").await.unwrap();

    engine
        .post_adjustment(AdjustmentInput {
            idempotency_key: idem("adj"),
            wallet_id: wallet,
            amount: dec!(50),
            direction: Direction::Credit,
            asset: "USD".to_string(),
            reason: "promo credit".to_string(),
            expected_wallet_version: None,
        })
        .await
        .unwrap();

    let wallet_balance = engine.get_balance(wallet).await.unwrap();
    let system_balance = engine.get_balance(system_wallet_id).await.unwrap();
    assert_eq!(wallet_balance.balance, dec!(50));
    assert_eq!(system_balance.balance, dec!(-50));
}

#[tokio::test]
async fn version_and_projection_version_stay_in_lockstep() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();
    engine.create_wallet(b, "USD").await.unwrap();

    engine
        .post_transfer(TransferInput {
            idempotency_key: idem("lockstep"),
            from_wallet_id: a,
            to_wallet_id: b,
            amount: dec!(1),
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: None,
            expected_to_version: None,
        })
        .await
        .unwrap();

    let balance = engine.get_balance(a).await.unwrap();
    assert_eq!(balance.version, 1);
}

#[tokio::test]
async fn rejects_self_transfer_before_touching_the_database() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();

    let err = engine
        .post_transfer(TransferInput {
            idempotency_key: idem("self"),
            from_wallet_id: a,
            to_wallet_id: a,
            amount: Decimal::ONE,
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: None,
            expected_to_version: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn transfer_to_unknown_wallet_is_not_found() {
    let Some(pool) = setup().await else { return };
    let (engine, _system) = engine_with_system_wallet(pool).await;

    let a = Uuid::new_v4();
    engine.create_wallet(a, "USD").await.unwrap();

    let err = engine
        .post_transfer(TransferInput {
            idempotency_key: idem("missing"),
            from_wallet_id: a,
            to_wallet_id: Uuid::new_v4(),
            amount: Decimal::ONE,
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: None,
            expected_to_version: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}
