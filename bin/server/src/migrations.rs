// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Applies the `.sql` files under `migrations/` in ascending filename order,
//! recording each one in `schema_migrations` as it runs (§4.1, §4.6). Each
//! file is embedded at compile time rather than read from disk at startup,
//! so the binary carries its own schema and does not depend on a working
//! directory or a co-located `migrations/` folder at deploy time.

use sqlx::PgPool;
use walletd_core::{Error, Result};

/// Ascending-filename order is the whole ordering contract; this array's
/// declaration order *is* that order.
const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_create_schema_migrations.sql", include_str!("../../../migrations/0001_create_schema_migrations.sql")),
    ("0002_create_accounts.sql", include_str!("../../../migrations/0002_create_accounts.sql")),
    ("0003_create_balance_projections.sql", include_str!("../../../migrations/0003_create_balance_projections.sql")),
    ("0004_create_journal_transactions.sql", include_str!("../../../migrations/0004_create_journal_transactions.sql")),
    ("0005_create_journal_entries.sql", include_str!("../../../migrations/0005_create_journal_entries.sql")),
    ("0006_create_outbox_events.sql", include_str!("../../../migrations/0006_create_outbox_events.sql")),
];

/// Runs every not-yet-applied migration, each in its own transaction.
///
/// `schema_migrations` is bootstrapped outside the per-file transaction
/// loop: Postgres aborts an entire transaction on the first error, so
/// probing "does this table exist yet" from inside the same transaction
/// that might need to create it would poison every statement after a
/// failed probe on a brand-new database.
pub async fn run(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS schema_migrations (\
             filename TEXT PRIMARY KEY, \
             applied_at TIMESTAMPTZ NOT NULL DEFAULT now()\
         )",
    )
    .execute(pool)
    .await
    .map_err(|e| Error::ServiceUnavailable(format!("database unavailable: {e}")))?;

    for (filename, sql) in MIGRATIONS {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| Error::ServiceUnavailable(format!("database unavailable: {e}")))?;

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE filename = $1)",
        )
        .bind(filename)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Error::ServiceUnavailable(format!("checking migration state failed: {e}")))?;

        if already_applied {
            tx.rollback().await.ok();
            continue;
        }

        sqlx::raw_sql(sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::ServiceUnavailable(format!("migration {filename} failed: {e}")))?;

        sqlx::query("INSERT INTO schema_migrations (filename) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(filename)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::ServiceUnavailable(format!("recording migration {filename} failed: {e}")))?;

        tx.commit().await.map_err(|e| Error::ServiceUnavailable(format!("migration {filename} failed to commit: {e}")))?;

        tracing::info!(migration = filename, "applied migration");
    }

    Ok(())
}
