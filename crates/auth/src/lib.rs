// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod token;

pub use token::{decode_bearer_token, require_scope, AuthContext, JwtSettings};

pub use walletd_core::{Error, Result};
