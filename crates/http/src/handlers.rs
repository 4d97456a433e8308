// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

use axum::extract::{Path, State};
use axum::Json;
use walletd_auth::require_scope;
use walletd_core::WalletId;
use walletd_ledger::{AdjustmentInput, Direction, TransferInput};

use crate::dto::{
    AdjustmentRequest, BalanceResponse, CreateWalletRequest, TransactionResponse, TransferRequest, WalletResponse,
};
use crate::error::ApiResult;
use crate::extract::{Authenticated, IdempotencyKey};
use crate::AppState;

pub async fn create_wallet(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Json(req): Json<CreateWalletRequest>,
) -> ApiResult<Json<WalletResponse>> {
    require_scope(&ctx, "wallet:write")?;
    let asset = req.asset.unwrap_or_else(|| state.default_asset.clone());
    let account = state.engine.create_wallet(req.wallet_id, &asset).await?;
    Ok(Json(account.into()))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(wallet_id): Path<WalletId>,
) -> ApiResult<Json<BalanceResponse>> {
    require_scope(&ctx, "wallet:read")?;
    let balance = state.engine.get_balance(wallet_id).await?;
    Ok(Json(balance.into()))
}

/// The balance figure comes from the authoritative journal reconstruction,
/// while `version`/`as_of` are read from the projection — identical to the
/// router-level composition in the service this was adapted from, which
/// never stores `version`/`as_of` alongside the audited sum.
pub async fn audit_balance(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(wallet_id): Path<WalletId>,
) -> ApiResult<Json<BalanceResponse>> {
    require_scope(&ctx, "wallet:read")?;
    let audited = state.engine.audit_balance(wallet_id).await?;
    let projected = state.engine.get_balance(wallet_id).await?;
    Ok(Json(BalanceResponse {
        wallet_id: audited.wallet_id,
        asset: audited.asset,
        balance: audited.balance,
        version: projected.version,
        as_of: projected.as_of,
    }))
}

pub async fn post_transfer(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    IdempotencyKey(idempotency_key): IdempotencyKey,
    Json(req): Json<TransferRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    require_scope(&ctx, "wallet:write")?;
    let input = TransferInput {
        idempotency_key,
        from_wallet_id: req.from_wallet_id,
        to_wallet_id: req.to_wallet_id,
        amount: req.amount,
        asset: req.asset.unwrap_or_else(|| state.default_asset.clone()),
        external_reference: req.external_reference,
        expected_from_version: req.expected_from_version,
        expected_to_version: req.expected_to_version,
    };
    let transaction = state.engine.post_transfer(input).await?;
    Ok(Json(transaction.into()))
}

pub async fn post_adjustment(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    IdempotencyKey(idempotency_key): IdempotencyKey,
    Json(req): Json<AdjustmentRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    require_scope(&ctx, "wallet:admin")?;
    let input = AdjustmentInput {
        idempotency_key,
        wallet_id: req.wallet_id,
        amount: req.amount,
        direction: Direction::from(req.direction),
        asset: req.asset.unwrap_or_else(|| state.default_asset.clone()),
        reason: req.reason,
        expected_wallet_version: req.expected_wallet_version,
    };
    let transaction = state.engine.post_adjustment(input).await?;
    Ok(Json(transaction.into()))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(transaction_id): Path<WalletId>,
) -> ApiResult<Json<TransactionResponse>> {
    require_scope(&ctx, "wallet:read")?;
    let transaction = state.engine.get_transaction(transaction_id).await?;
    Ok(Json(transaction.into()))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn ready(State(state): State<AppState>) -> ApiResult<&'static str> {
    sqlx::query("SELECT 1")
        .execute(state.engine.pool())
        .await
        .map_err(walletd_ledger::translate_execution_error)?;
    Ok("ready")
}
