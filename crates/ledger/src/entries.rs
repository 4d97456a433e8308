// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use rust_decimal::Decimal;
use walletd_core::{Error, Result, WalletId};

/// One side of a not-yet-persisted journal entry: a wallet, its signed
/// delta, and the shared asset. Turned into a `JournalEntry` once a `seq`
/// is assigned.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub asset: String,
}

/// Validates I1–I3 against a draft entry list: at least two entries, no
/// zero amounts, a single shared asset, and a zero sum.
pub fn ensure_balanced(entries: &[EntryDraft]) -> Result<()> {
    if entries.len() < 2 {
        return Err(Error::Validation("at least two journal entries required".to_string()));
    }

    let mut total = Decimal::ZERO;
    let mut asset: Option<&str> = None;
    for entry in entries {
        if entry.amount.is_zero() {
            return Err(Error::Validation("journal entry amount cannot be zero".to_string()));
        }
        total += entry.amount;
        match asset {
            None => asset = Some(entry.asset.as_str()),
            Some(a) if a != entry.asset => {
                return Err(Error::Validation(
                    "all entries in a transaction must have the same asset".to_string(),
                ))
            }
            Some(_) => {}
        }
    }

    if !total.is_zero() {
        return Err(Error::Validation("double-entry violation: sum(entries.amount) != 0".to_string()));
    }

    Ok(())
}
