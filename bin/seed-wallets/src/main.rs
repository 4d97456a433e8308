// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Operational tool for local load-testing: mints a short-lived HS256
//! bearer token against the same secret/audience the server validates
//! against, then bulk-POSTs `/v1/wallets`. Equivalent to the source's
//! `seed_wallets.py`, expressed as a small internal binary rather than a
//! shell-adjacent script — this workspace's idiom for operational tooling.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "walletd-seed-wallets")]
#[command(about = "Mints a bearer token and bulk-creates wallets for load-testing", long_about = None)]
struct Args {
    /// Base URL of a running wallet-ledger server.
    #[arg(long, env = "WALLETD_URL", default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Must match the server's JWT_SECRET.
    #[arg(long, env = "JWT_SECRET", default_value = "dev-secret-change-me")]
    jwt_secret: String,

    /// Must match the server's JWT_AUDIENCE.
    #[arg(long, env = "JWT_AUDIENCE", default_value = "wallet-ledger")]
    jwt_audience: String,

    /// Number of wallets to create.
    #[arg(short = 'n', long, default_value = "100")]
    count: u32,

    /// Asset code to seed wallets with.
    #[arg(long, default_value = "USD")]
    asset: String,
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    aud: &'a str,
    scope: &'a str,
    exp: u64,
}

fn mint_token(secret: &str, audience: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_secs()
        + 3600;

    let claims = Claims { sub: "seed-wallets", aud: audience, scope: "wallet:write", exp: expires_at };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

#[derive(Serialize)]
struct CreateWalletRequest {
    wallet_id: Uuid,
    asset: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let token = mint_token(&args.jwt_secret, &args.jwt_audience)?;
    let client = reqwest::Client::new();

    let mut created = 0u32;
    let mut failed = 0u32;

    for _ in 0..args.count {
        let wallet_id = Uuid::new_v4();
        let response = client
            .post(format!("{}/v1/wallets", args.url))
            .bearer_auth(&token)
            .json(&CreateWalletRequest { wallet_id, asset: args.asset.clone() })
            .send()
            .await?;

        if response.status().is_success() {
            created += 1;
        } else {
            failed += 1;
            eprintln!("failed to create {wallet_id}: {}", response.status());
        }
    }

    println!("seeded {created} wallets ({failed} failures) against {}", args.url);
    Ok(())
}
