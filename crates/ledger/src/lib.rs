// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod engine;
mod entries;
mod fingerprint;
mod input;
mod repository;
mod runner;

pub use engine::Engine;
pub use entries::{ensure_balanced, EntryDraft};
pub use fingerprint::payload_hash;
pub use input::{AdjustmentInput, TransferInput};
pub use repository::AuditedBalance;
pub use runner::{begin_serializable, translate_execution_error};

pub use walletd_core::{
    Account, Amount, BalanceProjection, Direction, Error, JournalEntry, JournalTransaction,
    OperationScope, Result, TransactionId, WalletId,
};
