// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use sqlx::PgPool;
use tracing::instrument;
use walletd_core::{Account, BalanceProjection, JournalTransaction, OperationScope, Result, TransactionId, WalletId};

use crate::entries::ensure_balanced;
use crate::fingerprint::payload_hash;
use crate::input::{AdjustmentInput, TransferInput};
use crate::repository::{self, AuditedBalance};
use crate::runner::begin_serializable;

/// The double-entry ledger engine: validates and posts balanced journal
/// transactions against accounts with optimistic concurrency, suppresses
/// duplicates by idempotency key, and serves projection/audit reads.
///
/// Holds only a connection pool and the well-known system wallet id — no
/// in-process ledger state, matching the shared-resource policy that the
/// database is the only shared mutable state.
#[derive(Clone)]
pub struct Engine {
    pool: PgPool,
    system_wallet_id: WalletId,
}

impl Engine {
    pub fn new(pool: PgPool, system_wallet_id: WalletId) -> Self {
        Self { pool, system_wallet_id }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(name = "engine::create_wallet", level = "debug", skip(self))]
    pub async fn create_wallet(&self, wallet_id: WalletId, asset: &str) -> Result<Account> {
        let mut tx = begin_serializable(&self.pool).await?;
        let account = repository::create_account(&mut tx, wallet_id, asset).await?;
        repository::create_balance_projection(&mut tx, wallet_id, asset).await?;
        tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(account)
    }

    #[instrument(name = "engine::get_balance", level = "trace", skip(self))]
    pub async fn get_balance(&self, wallet_id: WalletId) -> Result<BalanceProjection> {
        let mut tx = begin_serializable(&self.pool).await?;
        let balance = repository::fetch_balance(&mut tx, wallet_id).await?;
        tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(balance)
    }

    #[instrument(name = "engine::audit_balance", level = "debug", skip(self))]
    pub async fn audit_balance(&self, wallet_id: WalletId) -> Result<AuditedBalance> {
        let mut tx = begin_serializable(&self.pool).await?;
        let audited = repository::audit_balance(&mut tx, wallet_id).await?;
        tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(audited)
    }

    #[instrument(name = "engine::get_transaction", level = "trace", skip(self))]
    pub async fn get_transaction(&self, transaction_id: TransactionId) -> Result<JournalTransaction> {
        let mut tx = begin_serializable(&self.pool).await?;
        if !repository::transaction_exists(&mut tx, transaction_id).await? {
            return Err(walletd_core::Error::NotFound(format!("transaction not found: {transaction_id}")));
        }
        let loaded = repository::load_transaction(&mut tx, transaction_id).await?;
        tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(loaded)
    }

    /// Posts a transfer (§4.4). Locks are acquired in ascending `wallet_id`
    /// byte order rather than from-then-to, independent of which side is
    /// debited — the hardening recommended in §9 to avoid a deadlock on
    /// concurrent transfers between the same pair in opposite directions.
    /// The signed deltas still follow the original semantics regardless of
    /// lock order: `from` always gets `-amount`, `to` always gets `+amount`.
    #[instrument(
        name = "engine::post_transfer",
        level = "debug",
        skip(self, input),
        fields(
            from_wallet_id = %input.from_wallet_id,
            to_wallet_id = %input.to_wallet_id,
            idempotency_key = %input.idempotency_key,
        )
    )]
    pub async fn post_transfer(&self, input: TransferInput) -> Result<JournalTransaction> {
        input.validate()?;

        let payload = input.canonical_payload();
        let hash = payload_hash(&payload);
        let entries = input.entries();
        ensure_balanced(&entries)?;

        let mut tx = begin_serializable(&self.pool).await?;

        if let Some(existing) = repository::fetch_existing_idempotent(
            &mut tx,
            OperationScope::Transfer,
            &input.idempotency_key,
            &hash,
        )
        .await?
        {
            let loaded = repository::load_transaction(&mut tx, existing).await?;
            tx.commit().await.map_err(crate::runner::translate_execution_error)?;
            return Ok(loaded);
        }

        let transaction_id = uuid::Uuid::new_v4();
        repository::insert_journal_transaction(
            &mut tx,
            transaction_id,
            OperationScope::Transfer,
            &input.idempotency_key,
            &hash,
            input.external_reference.as_deref(),
        )
        .await?;

        let (first, second) = if input.from_wallet_id <= input.to_wallet_id {
            (input.from_wallet_id, input.to_wallet_id)
        } else {
            (input.to_wallet_id, input.from_wallet_id)
        };
        let expected_for = |wallet_id: WalletId| {
            if wallet_id == input.from_wallet_id {
                input.expected_from_version
            } else {
                input.expected_to_version
            }
        };
        let new_version_first = repository::bump_version(&mut tx, first, expected_for(first)).await?;
        let new_version_second = repository::bump_version(&mut tx, second, expected_for(second)).await?;
        let from_version = if input.from_wallet_id == first { new_version_first } else { new_version_second };
        let to_version = if input.to_wallet_id == first { new_version_first } else { new_version_second };

        for (seq, entry) in entries.iter().enumerate() {
            repository::insert_journal_entry(
                &mut tx,
                transaction_id,
                (seq + 1) as i32,
                entry.wallet_id,
                entry.amount,
                &entry.asset,
            )
            .await?;
        }

        repository::apply_projection(&mut tx, input.from_wallet_id, &input.asset, -input.amount, from_version)
            .await?;
        repository::apply_projection(&mut tx, input.to_wallet_id, &input.asset, input.amount, to_version).await?;

        repository::insert_outbox_event(&mut tx, transaction_id, OperationScope::Transfer.event_type(), &payload)
            .await?;

        tx.commit().await.map_err(crate::runner::translate_execution_error)?;

        // Reload rather than synthesize `created_at`: the row's DB-default
        // `now()` is the committed value, and a synthesized `Utc::now()`
        // here would drift from what a later `GET /v1/transactions/{id}`
        // returns for the same transaction.
        let mut read_tx = begin_serializable(&self.pool).await?;
        let loaded = repository::load_transaction(&mut read_tx, transaction_id).await?;
        read_tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(loaded)
    }

    /// Posts an adjustment (§4.4). The user-supplied wallet is locked
    /// before the system wallet; adjustments against distinct user wallets
    /// never contend on a symmetric pair the way transfers can, so there is
    /// no antisymmetric deadlock to guard against here — the ordering just
    /// keeps the system wallet's lock hold time short.
    #[instrument(
        name = "engine::post_adjustment",
        level = "debug",
        skip(self, input),
        fields(
            wallet_id = %input.wallet_id,
            idempotency_key = %input.idempotency_key,
        )
    )]
    pub async fn post_adjustment(&self, input: AdjustmentInput) -> Result<JournalTransaction> {
        input.validate()?;

        let payload = input.canonical_payload();
        let hash = payload_hash(&payload);
        let entries = input.entries(self.system_wallet_id);
        ensure_balanced(&entries)?;

        let mut tx = begin_serializable(&self.pool).await?;

        if let Some(existing) = repository::fetch_existing_idempotent(
            &mut tx,
            OperationScope::Adjustment,
            &input.idempotency_key,
            &hash,
        )
        .await?
        {
            let loaded = repository::load_transaction(&mut tx, existing).await?;
            tx.commit().await.map_err(crate::runner::translate_execution_error)?;
            return Ok(loaded);
        }

        let transaction_id = uuid::Uuid::new_v4();
        repository::insert_journal_transaction(
            &mut tx,
            transaction_id,
            OperationScope::Adjustment,
            &input.idempotency_key,
            &hash,
            Some(&input.reason),
        )
        .await?;

        let wallet_version = repository::bump_version(&mut tx, input.wallet_id, input.expected_wallet_version).await?;
        let system_version = repository::bump_version(&mut tx, self.system_wallet_id, None).await?;

        for (seq, entry) in entries.iter().enumerate() {
            repository::insert_journal_entry(
                &mut tx,
                transaction_id,
                (seq + 1) as i32,
                entry.wallet_id,
                entry.amount,
                &entry.asset,
            )
            .await?;
        }

        let wallet_delta = input.wallet_delta();
        repository::apply_projection(&mut tx, input.wallet_id, &input.asset, wallet_delta, wallet_version).await?;
        repository::apply_projection(
            &mut tx,
            self.system_wallet_id,
            &input.asset,
            -wallet_delta,
            system_version,
        )
        .await?;

        repository::insert_outbox_event(&mut tx, transaction_id, OperationScope::Adjustment.event_type(), &payload)
            .await?;

        tx.commit().await.map_err(crate::runner::translate_execution_error)?;

        // Reload rather than synthesize `created_at` — see the matching
        // comment in `post_transfer`.
        let mut read_tx = begin_serializable(&self.pool).await?;
        let loaded = repository::load_transaction(&mut read_tx, transaction_id).await?;
        read_tx.commit().await.map_err(crate::runner::translate_execution_error)?;
        Ok(loaded)
    }
}
