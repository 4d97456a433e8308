// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use std::fmt::{Display, Formatter};

/// The class of a write request, partitioning the idempotency namespace.
/// `(operation_scope, idempotency_key)` is the key the engine deduplicates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationScope {
    Transfer,
    Adjustment,
}

impl OperationScope {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationScope::Transfer => "transfer",
            OperationScope::Adjustment => "adjustment",
        }
    }

    pub fn event_type(self) -> &'static str {
        match self {
            OperationScope::Transfer => "wallet.transfer.committed",
            OperationScope::Adjustment => "wallet.adjustment.committed",
        }
    }
}

impl Display for OperationScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationScope {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(OperationScope::Transfer),
            "adjustment" => Ok(OperationScope::Adjustment),
            other => Err(crate::Error::Validation(format!("unknown operation scope: {other}"))),
        }
    }
}
