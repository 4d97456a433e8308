// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use sha2::{Digest, Sha256};

/// Computes the canonical fingerprint of a write request's logical payload.
///
/// `payload` must already be a `serde_json::Value::Object` built with the
/// exact textual values the caller supplied (see `transfer_payload` /
/// `adjustment_payload`). `serde_json::Map` is a `BTreeMap` by default, so
/// serializing it sorts keys in ascending lexical order for free; combined
/// with `to_string`'s compact, whitespace-free output this gives the
/// deterministic, key-order-insensitive encoding I6 relies on.
///
/// Amounts are never renormalized here: `"10.20"` and `"10.2"` hash
/// differently, by design, because `rust_decimal::Decimal` preserves the
/// scale it was parsed with, so `Decimal::to_string()` round-trips the
/// caller's exact textual form.
pub fn payload_hash(payload: &serde_json::Value) -> String {
    let canonical = serde_json::to_string(payload).expect("payload is built from valid JSON values");
    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insensitive_to_key_construction_order() {
        let a = json!({"amount": "10.25", "asset": "USD"});
        let b = json!({"asset": "USD", "amount": "10.25"});
        assert_eq!(payload_hash(&a), payload_hash(&b));
    }

    #[test]
    fn sensitive_to_trailing_zero_normalization() {
        let a = json!({"amount": "10.20"});
        let b = json!({"amount": "10.2"});
        assert_ne!(payload_hash(&a), payload_hash(&b));
    }

    #[test]
    fn is_lowercase_hex_sha256() {
        let digest = payload_hash(&json!({}));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
