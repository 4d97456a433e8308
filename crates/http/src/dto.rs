// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use walletd_core::{Account, BalanceProjection, Direction, JournalTransaction, WalletId};

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub wallet_id: WalletId,
    /// Falls back to the service's configured `default_asset` when omitted.
    pub asset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub wallet_id: WalletId,
    pub asset: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for WalletResponse {
    fn from(a: Account) -> Self {
        WalletResponse { wallet_id: a.wallet_id, asset: a.asset, version: a.version, created_at: a.created_at }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub wallet_id: WalletId,
    pub asset: String,
    pub balance: Decimal,
    pub version: i64,
    pub as_of: DateTime<Utc>,
}

impl From<BalanceProjection> for BalanceResponse {
    fn from(b: BalanceProjection) -> Self {
        BalanceResponse { wallet_id: b.wallet_id, asset: b.asset, balance: b.balance, version: b.version, as_of: b.as_of }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
    /// Falls back to the service's configured `default_asset` when omitted.
    pub asset: Option<String>,
    pub external_reference: Option<String>,
    pub expected_from_version: Option<i64>,
    pub expected_to_version: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionDto {
    Credit,
    Debit,
}

impl From<DirectionDto> for Direction {
    fn from(d: DirectionDto) -> Self {
        match d {
            DirectionDto::Credit => Direction::Credit,
            DirectionDto::Debit => Direction::Debit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub direction: DirectionDto,
    /// Falls back to the service's configured `default_asset` when omitted.
    pub asset: Option<String>,
    pub reason: String,
    pub expected_wallet_version: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub account_id: WalletId,
    pub amount: Decimal,
    pub asset: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: WalletId,
    pub operation_scope: String,
    pub idempotency_key: String,
    pub payload_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub external_reference: Option<String>,
    pub entries: Vec<JournalEntryResponse>,
}

impl From<JournalTransaction> for TransactionResponse {
    fn from(t: JournalTransaction) -> Self {
        TransactionResponse {
            transaction_id: t.transaction_id,
            operation_scope: t.operation_scope.to_string(),
            idempotency_key: t.idempotency_key,
            payload_hash: t.payload_hash,
            status: t.status,
            created_at: t.created_at,
            external_reference: t.external_reference,
            entries: t
                .entries
                .into_iter()
                .map(|e| JournalEntryResponse { account_id: e.account_id, amount: e.amount, asset: e.asset })
                .collect(),
        }
    }
}
