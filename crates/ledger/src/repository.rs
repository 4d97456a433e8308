// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Thin, free-function operations against an open transaction. Every
//! function here takes the same `&mut PgConnection` so each step of a
//! posting observes and mutates one consistent transactional snapshot —
//! there is no repository object threading a live handle through private
//! methods, just functions over a borrowed connection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::Row;
use walletd_core::{Account, BalanceProjection, Error, JournalEntry, JournalTransaction, OperationScope, Result, TransactionId, WalletId};

use crate::runner::translate_execution_error;

pub async fn create_account(
    conn: &mut PgConnection,
    wallet_id: WalletId,
    asset: &str,
) -> Result<Account> {
    let row = sqlx::query(
        "INSERT INTO accounts(wallet_id, asset, version, created_at) \
         VALUES ($1, $2, 0, now()) \
         RETURNING wallet_id, asset, version, created_at",
    )
    .bind(wallet_id)
    .bind(asset)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Error::Conflict(format!("wallet already exists: {wallet_id}"))
        }
        _ => translate_execution_error(e),
    })?;

    Ok(Account {
        wallet_id: row.try_get("wallet_id").map_err(translate_execution_error)?,
        asset: row.try_get("asset").map_err(translate_execution_error)?,
        version: row.try_get("version").map_err(translate_execution_error)?,
        created_at: row.try_get("created_at").map_err(translate_execution_error)?,
    })
}

pub async fn create_balance_projection(
    conn: &mut PgConnection,
    wallet_id: WalletId,
    asset: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO balance_projections(wallet_id, asset, balance, version, as_of) \
         VALUES ($1, $2, 0, 0, now())",
    )
    .bind(wallet_id)
    .bind(asset)
    .execute(&mut *conn)
    .await
    .map_err(translate_execution_error)?;
    Ok(())
}

pub async fn fetch_balance(conn: &mut PgConnection, wallet_id: WalletId) -> Result<BalanceProjection> {
    let row = sqlx::query(
        "SELECT wallet_id, asset, balance, version, as_of FROM balance_projections WHERE wallet_id = $1",
    )
    .bind(wallet_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(translate_execution_error)?
    .ok_or_else(|| Error::NotFound(format!("wallet not found: {wallet_id}")))?;

    Ok(BalanceProjection {
        wallet_id: row.try_get("wallet_id").map_err(translate_execution_error)?,
        asset: row.try_get("asset").map_err(translate_execution_error)?,
        balance: row.try_get("balance").map_err(translate_execution_error)?,
        version: row.try_get("version").map_err(translate_execution_error)?,
        as_of: row.try_get("as_of").map_err(translate_execution_error)?,
    })
}

/// The authoritative balance, reconstructed directly from journal entries
/// rather than read from the (possibly divergent) projection.
pub struct AuditedBalance {
    pub wallet_id: WalletId,
    pub asset: String,
    pub balance: Decimal,
}

pub async fn audit_balance(conn: &mut PgConnection, wallet_id: WalletId) -> Result<AuditedBalance> {
    let row = sqlx::query(
        "SELECT a.wallet_id, a.asset, COALESCE(SUM(e.amount), 0) AS balance \
         FROM accounts a \
         LEFT JOIN journal_entries e ON e.wallet_id = a.wallet_id AND e.asset = a.asset \
         WHERE a.wallet_id = $1 \
         GROUP BY a.wallet_id, a.asset",
    )
    .bind(wallet_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(translate_execution_error)?
    .ok_or_else(|| Error::NotFound(format!("wallet not found: {wallet_id}")))?;

    Ok(AuditedBalance {
        wallet_id: row.try_get("wallet_id").map_err(translate_execution_error)?,
        asset: row.try_get("asset").map_err(translate_execution_error)?,
        balance: row.try_get("balance").map_err(translate_execution_error)?,
    })
}

/// Looks up `(operation_scope, idempotency_key)`. `None` means proceed with
/// a new posting; `Some` means replay — the caller loads and returns the
/// existing transaction without mutating anything. Fails with `Conflict`
/// if a row exists with the same key but a different payload hash.
pub async fn fetch_existing_idempotent(
    conn: &mut PgConnection,
    operation_scope: OperationScope,
    idempotency_key: &str,
    payload_hash: &str,
) -> Result<Option<TransactionId>> {
    let row = sqlx::query(
        "SELECT transaction_id, payload_hash FROM journal_transactions \
         WHERE operation_scope = $1 AND idempotency_key = $2",
    )
    .bind(operation_scope.as_str())
    .bind(idempotency_key)
    .fetch_optional(&mut *conn)
    .await
    .map_err(translate_execution_error)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let existing_hash: String = row.try_get("payload_hash").map_err(translate_execution_error)?;
    if existing_hash != payload_hash {
        return Err(Error::Conflict("idempotency key reuse with different payload".to_string()));
    }

    Ok(Some(row.try_get("transaction_id").map_err(translate_execution_error)?))
}

pub async fn insert_journal_transaction(
    conn: &mut PgConnection,
    transaction_id: TransactionId,
    operation_scope: OperationScope,
    idempotency_key: &str,
    payload_hash: &str,
    external_reference: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO journal_transactions \
         (transaction_id, operation_scope, idempotency_key, payload_hash, status, external_reference) \
         VALUES ($1, $2, $3, $4, 'committed', $5)",
    )
    .bind(transaction_id)
    .bind(operation_scope.as_str())
    .bind(idempotency_key)
    .bind(payload_hash)
    .bind(external_reference)
    .execute(&mut *conn)
    .await
    .map_err(translate_execution_error)?;
    Ok(())
}

/// Bumps an account's version under optimistic concurrency (§4.4 step 7).
///
/// With `expected_version` supplied, this is a single conditional `UPDATE`.
/// Without it, the current version is first read under a row-level write
/// lock (`FOR UPDATE`) and used as the expectation — so two concurrent
/// callers racing on the same wallet still serialize on the same
/// conditional update, and exactly one of them advances it.
pub async fn bump_version(
    conn: &mut PgConnection,
    wallet_id: WalletId,
    expected_version: Option<i64>,
) -> Result<i64> {
    let expected = match expected_version {
        Some(v) => v,
        None => {
            let row = sqlx::query("SELECT version FROM accounts WHERE wallet_id = $1 FOR UPDATE")
                .bind(wallet_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(translate_execution_error)?
                .ok_or_else(|| Error::NotFound(format!("wallet not found: {wallet_id}")))?;
            row.try_get::<i64, _>("version").map_err(translate_execution_error)?
        }
    };

    let row = sqlx::query(
        "UPDATE accounts SET version = version + 1 WHERE wallet_id = $1 AND version = $2 RETURNING version",
    )
    .bind(wallet_id)
    .bind(expected)
    .fetch_optional(&mut *conn)
    .await
    .map_err(translate_execution_error)?;

    match row {
        Some(row) => row.try_get("version").map_err(translate_execution_error),
        None => Err(Error::Conflict(format!("optimistic version conflict on wallet {wallet_id}"))),
    }
}

pub async fn insert_journal_entry(
    conn: &mut PgConnection,
    transaction_id: TransactionId,
    seq: i32,
    wallet_id: WalletId,
    amount: Decimal,
    asset: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO journal_entries(transaction_id, seq, wallet_id, amount, asset) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(transaction_id)
    .bind(seq)
    .bind(wallet_id)
    .bind(amount)
    .bind(asset)
    .execute(&mut *conn)
    .await
    .map_err(translate_execution_error)?;
    Ok(())
}

/// Updates the projection in lockstep with an account's version bump. A
/// zero-row update means the projection is missing for an account that
/// exists — that is corruption, not a client-facing not-found: the
/// projection row is created alongside the account at wallet-creation time
/// and never deleted.
pub async fn apply_projection(
    conn: &mut PgConnection,
    wallet_id: WalletId,
    asset: &str,
    delta: Decimal,
    new_version: i64,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE balance_projections SET balance = balance + $1, version = $2, as_of = now() \
         WHERE wallet_id = $3 AND asset = $4",
    )
    .bind(delta)
    .bind(new_version)
    .bind(wallet_id)
    .bind(asset)
    .execute(&mut *conn)
    .await
    .map_err(translate_execution_error)?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!(
            "balance projection missing for account {wallet_id} ({asset}) — account exists without a projection"
        )));
    }
    Ok(())
}

pub async fn insert_outbox_event(
    conn: &mut PgConnection,
    transaction_id: TransactionId,
    event_type: &str,
    payload: &serde_json::Value,
) -> Result<()> {
    sqlx::query("INSERT INTO outbox_events(event_id, transaction_id, event_type, payload) VALUES (gen_random_uuid(), $1, $2, $3)")
        .bind(transaction_id)
        .bind(event_type)
        .bind(payload)
        .execute(&mut *conn)
        .await
        .map_err(translate_execution_error)?;
    Ok(())
}

pub async fn transaction_exists(conn: &mut PgConnection, transaction_id: TransactionId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM journal_transactions WHERE transaction_id = $1")
        .bind(transaction_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(translate_execution_error)?;
    Ok(row.is_some())
}

pub async fn load_transaction(conn: &mut PgConnection, transaction_id: TransactionId) -> Result<JournalTransaction> {
    let header = sqlx::query(
        "SELECT transaction_id, operation_scope, idempotency_key, payload_hash, status, created_at, external_reference \
         FROM journal_transactions WHERE transaction_id = $1",
    )
    .bind(transaction_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(translate_execution_error)?
    .ok_or_else(|| Error::NotFound(format!("transaction not found: {transaction_id}")))?;

    let entry_rows = sqlx::query(
        "SELECT wallet_id, amount, asset FROM journal_entries WHERE transaction_id = $1 ORDER BY seq ASC",
    )
    .bind(transaction_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(translate_execution_error)?;

    let mut entries = Vec::with_capacity(entry_rows.len());
    for row in entry_rows {
        entries.push(JournalEntry {
            account_id: row.try_get("wallet_id").map_err(translate_execution_error)?,
            amount: row.try_get("amount").map_err(translate_execution_error)?,
            asset: row.try_get("asset").map_err(translate_execution_error)?,
        });
    }

    let operation_scope_str: String = header.try_get("operation_scope").map_err(translate_execution_error)?;

    Ok(JournalTransaction {
        transaction_id: header.try_get("transaction_id").map_err(translate_execution_error)?,
        operation_scope: operation_scope_str.parse()?,
        idempotency_key: header.try_get("idempotency_key").map_err(translate_execution_error)?,
        payload_hash: header.try_get("payload_hash").map_err(translate_execution_error)?,
        status: header.try_get("status").map_err(translate_execution_error)?,
        created_at: header.try_get::<DateTime<Utc>, _>("created_at").map_err(translate_execution_error)?,
        external_reference: header.try_get("external_reference").map_err(translate_execution_error)?,
        entries,
    })
}
