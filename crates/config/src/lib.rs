// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

//! Explicit configuration, constructed once at startup and passed into the
//! engine and the auth module by reference. No process-wide mutable
//! singleton — the source's global `settings` object is not reproduced here.

use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use uuid::Uuid;
use walletd_auth::JwtSettings;
use walletd_core::{Error, Result, WalletId};

#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub host: String,
    pub port: u16,

    pub database_url: String,
    pub db_connect_timeout: Duration,

    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_algorithms: Vec<Algorithm>,

    pub default_asset: String,
    pub system_wallet_id: WalletId,

    pub allow_stale_reads: bool,

    pub otel_enabled: bool,
}

impl Config {
    /// Loads configuration from environment variables. Fails closed on any
    /// malformed value rather than silently falling back to a default that
    /// could mask a deployment mistake in `database_url` or `jwt_secret`.
    pub fn from_env() -> Result<Self> {
        let allow_stale_reads = parse_bool(env_or("ALLOW_STALE_READS", "false"))?;
        if allow_stale_reads {
            return Err(Error::Validation(
                "allow_stale_reads=true is reserved for a future stale-read path and is not \
                 implemented; CP-first behavior requires it to stay false"
                    .to_string(),
            ));
        }

        let system_wallet_id = env_or("SYSTEM_WALLET_ID", "00000000-0000-0000-0000-000000000001");
        let system_wallet_id = Uuid::parse_str(&system_wallet_id)
            .map_err(|e| Error::Validation(format!("SYSTEM_WALLET_ID is not a valid UUID: {e}")))?;

        let jwt_algorithms = env_or("JWT_ALGORITHMS", "HS256")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_algorithm)
            .collect::<Result<Vec<_>>>()?;

        Ok(Config {
            app_name: env_or("APP_NAME", "wallet-ledger"),
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "8080")
                .parse()
                .map_err(|e| Error::Validation(format!("PORT must be a u16: {e}")))?,

            database_url: env::var("DATABASE_URL")
                .map_err(|_| Error::Validation("DATABASE_URL is required".to_string()))?,
            db_connect_timeout: Duration::from_secs(
                env_or("DB_CONNECT_TIMEOUT_SECONDS", "3")
                    .parse()
                    .map_err(|e| Error::Validation(format!("DB_CONNECT_TIMEOUT_SECONDS must be a u64: {e}")))?,
            ),

            jwt_secret: env_or("JWT_SECRET", "dev-secret-change-me"),
            jwt_audience: env_or("JWT_AUDIENCE", "wallet-ledger"),
            jwt_algorithms,

            default_asset: env_or("DEFAULT_ASSET", "USD"),
            system_wallet_id,

            allow_stale_reads,

            otel_enabled: parse_bool(env_or("OTEL_ENABLED", "false"))?,
        })
    }

    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings {
            secret: self.jwt_secret.clone(),
            audience: self.jwt_audience.clone(),
            algorithms: self.jwt_algorithms.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: String) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(Error::Validation(format!("expected a boolean, got: {other}"))),
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(Error::Validation(format!("unsupported JWT algorithm: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("true".into()).unwrap());
        assert!(parse_bool("1".into()).unwrap());
        assert!(!parse_bool("false".into()).unwrap());
        assert!(parse_bool("maybe".into()).is_err());
    }

    #[test]
    fn parse_algorithm_rejects_unknown() {
        assert!(parse_algorithm("RS256").is_err());
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
    }
}
