// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

pub mod error;
pub mod scope;

pub use error::{Error, Result};
pub use scope::OperationScope;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Identifies an [`Account`] and its [`BalanceProjection`]. Equivalent to the
/// source's `wallet_id`.
pub type WalletId = Uuid;

/// Identifies a [`JournalTransaction`] and its child [`JournalEntry`] rows.
pub type TransactionId = Uuid;

/// A fixed-point, signed monetary amount. Never use binary floating point for
/// anything that flows through the ledger, including fingerprint canonicalization.
pub type Amount = Decimal;

/// An account: a wallet/asset pair with a monotonically increasing version.
/// Created once, never implicitly; the version only advances through the engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Account {
    pub wallet_id: WalletId,
    pub asset: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// The materialized running balance for one account, kept in lockstep with
/// the journal by the transaction that last wrote entries for it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BalanceProjection {
    pub wallet_id: WalletId,
    pub asset: String,
    pub balance: Amount,
    pub version: i64,
    pub as_of: DateTime<Utc>,
}

/// One signed debit or credit line belonging to a [`JournalTransaction`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JournalEntry {
    pub account_id: WalletId,
    pub amount: Amount,
    pub asset: String,
}

/// An atomic, balanced journal transaction: the unit of mutation the engine
/// commits. `entries` is always in `seq` order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JournalTransaction {
    pub transaction_id: TransactionId,
    pub operation_scope: OperationScope,
    pub idempotency_key: String,
    pub payload_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub external_reference: Option<String>,
    pub entries: Vec<JournalEntry>,
}

/// Direction of an adjustment's effect on the user-supplied wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// +1 for credit, -1 for debit — the sign applied to the user wallet's entry.
    pub fn sign(self) -> Amount {
        match self {
            Direction::Credit => Decimal::ONE,
            Direction::Debit => -Decimal::ONE,
        }
    }
}
