// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use rust_decimal::Decimal;
use serde_json::{json, Value};
use walletd_core::{Direction, Error, Result, WalletId};

use crate::entries::EntryDraft;

fn validate_asset(asset: &str) -> Result<()> {
    if (3..=12).contains(&asset.len()) {
        Ok(())
    } else {
        Err(Error::Validation(format!("asset must be 3-12 characters, got: {asset:?}")))
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(Error::Validation(format!("amount must be strictly positive, got: {amount}")))
    }
}

/// A validated request to move funds between two wallets.
#[derive(Debug, Clone)]
pub struct TransferInput {
    pub idempotency_key: String,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
    pub asset: String,
    pub external_reference: Option<String>,
    pub expected_from_version: Option<i64>,
    pub expected_to_version: Option<i64>,
}

impl TransferInput {
    pub fn validate(&self) -> Result<()> {
        if self.from_wallet_id == self.to_wallet_id {
            return Err(Error::Validation("from_wallet_id and to_wallet_id must differ".to_string()));
        }
        validate_amount(self.amount)?;
        validate_asset(&self.asset)?;
        Ok(())
    }

    pub fn entries(&self) -> Vec<EntryDraft> {
        vec![
            EntryDraft { wallet_id: self.from_wallet_id, amount: -self.amount, asset: self.asset.clone() },
            EntryDraft { wallet_id: self.to_wallet_id, amount: self.amount, asset: self.asset.clone() },
        ]
    }

    /// The canonical payload this request fingerprints to. Key order does
    /// not matter (see `fingerprint::payload_hash`); values are the exact
    /// textual forms the caller supplied, not renormalized.
    pub fn canonical_payload(&self) -> Value {
        json!({
            "from_wallet_id": self.from_wallet_id.to_string(),
            "to_wallet_id": self.to_wallet_id.to_string(),
            "amount": self.amount.to_string(),
            "asset": self.asset,
            "external_reference": self.external_reference,
            "expected_from_version": self.expected_from_version,
            "expected_to_version": self.expected_to_version,
        })
    }
}

/// A validated request to credit or debit a single wallet against the
/// system counterparty.
#[derive(Debug, Clone)]
pub struct AdjustmentInput {
    pub idempotency_key: String,
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub direction: Direction,
    pub asset: String,
    pub reason: String,
    pub expected_wallet_version: Option<i64>,
}

impl AdjustmentInput {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_asset(&self.asset)?;
        Ok(())
    }

    /// The signed delta applied to the user-supplied wallet (sign from `direction`).
    pub fn wallet_delta(&self) -> Decimal {
        self.amount * self.direction.sign()
    }

    pub fn entries(&self, system_wallet_id: WalletId) -> Vec<EntryDraft> {
        let delta = self.wallet_delta();
        vec![
            EntryDraft { wallet_id: self.wallet_id, amount: delta, asset: self.asset.clone() },
            EntryDraft { wallet_id: system_wallet_id, amount: -delta, asset: self.asset.clone() },
        ]
    }

    pub fn canonical_payload(&self) -> Value {
        json!({
            "wallet_id": self.wallet_id.to_string(),
            "amount": self.amount.to_string(),
            "direction": match self.direction {
                walletd_core::Direction::Credit => "credit",
                walletd_core::Direction::Debit => "debit",
            },
            "asset": self.asset,
            "reason": self.reason,
            "expected_wallet_version": self.expected_wallet_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn transfer(amount: &str) -> TransferInput {
        TransferInput {
            idempotency_key: "k".to_string(),
            from_wallet_id: Uuid::new_v4(),
            to_wallet_id: Uuid::new_v4(),
            amount: amount.parse().unwrap(),
            asset: "USD".to_string(),
            external_reference: None,
            expected_from_version: None,
            expected_to_version: None,
        }
    }

    #[test]
    fn rejects_zero_or_negative_amount() {
        assert!(transfer("0").validate().is_err());
        assert!(transfer("-1").validate().is_err());
        assert!(transfer("1").validate().is_ok());
    }

    #[test]
    fn rejects_self_transfer() {
        let mut t = transfer("1");
        t.to_wallet_id = t.from_wallet_id;
        assert!(matches!(t.validate().unwrap_err(), Error::Validation(_)));
    }

    #[test]
    fn rejects_malformed_asset() {
        let mut t = transfer("1");
        t.asset = "US".to_string();
        assert!(t.validate().is_err());
        t.asset = "X".repeat(13);
        assert!(t.validate().is_err());
    }

    #[test]
    fn canonical_payload_preserves_exact_amount_text() {
        let t = transfer("10.20");
        let payload = t.canonical_payload();
        assert_eq!(payload["amount"], "10.20");
    }
}
