// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use sqlx::{PgPool, Postgres, Transaction};
use walletd_core::{Error, Result};

/// Acquires a connection from the pool and opens a transaction at the
/// strongest available isolation level. The caller drives the rest of the
/// unit of work and is responsible for calling `commit`/`rollback` on it —
/// if the transaction value is dropped without either, sqlx rolls it back.
///
/// Connection failure is the *unavailable* failure mode: fatal and
/// non-retryable at this layer, surfaced as `ServiceUnavailable`.
pub async fn begin_serializable(pool: &PgPool) -> Result<Transaction<'static, Postgres>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::ServiceUnavailable(format!("database unavailable: {e}")))?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await
        .map_err(translate_execution_error)?;

    Ok(tx)
}

/// Translates an *execution error* (any database failure other than a
/// failed connection acquisition) into the crate's error taxonomy. Driver
/// errors are never handed to callers verbatim; specific cases the engine
/// cares about are matched on the SQLSTATE code, everything else collapses
/// to `ServiceUnavailable` since, under the CP-first policy, an unexpected
/// storage failure is not something the client can act on beyond retrying.
///
/// `40001`/`40P01` (serialization failure / deadlock detected) are the
/// losing side of the concurrency the SERIALIZABLE isolation level (see
/// `begin_serializable`) is relied on to provide: two concurrent writers
/// against the same account race inside the database itself, and the one
/// Postgres aborts surfaces one of these codes rather than a plain
/// zero-row conditional update. That is still a `Conflict` the caller can
/// retry, not a storage outage — P7 requires the losing writer to see 409,
/// not 503.
pub fn translate_execution_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => return Error::Conflict(format!("uniqueness violation: {db_err}")),
            Some("40001") => return Error::Conflict(format!("serialization failure: {db_err}")),
            Some("40P01") => return Error::Conflict(format!("deadlock detected: {db_err}")),
            _ => {}
        }
    }
    Error::ServiceUnavailable(format!("database error: {err}"))
}
