//! Client API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{client, conduce};
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use shared::message::NotificationType;
use shared::models::{Client, ClientAccount, ClientCreate, ClientUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 按名称 / 电话 / RNC 模糊搜索
    pub q: Option<String>,
}

fn validate_credit_terms(limit: Option<f64>, days: Option<i32>) -> AppResult<()> {
    if let Some(limit) = limit {
        validate_amount(limit, "credit_limit")?;
    }
    if let Some(days) = days
        && days < 0
    {
        return Err(AppError::validation(format!(
            "credit_days must be non-negative, got {days}"
        )));
    }
    Ok(())
}

/// GET /api/clientes - 获取客户列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let clients = client::find_all(&state.pool, query.q.as_deref()).await?;
    Ok(Json(clients))
}

/// GET /api/clientes/:id - 获取单个客户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Client>> {
    let client = client::get(&state.pool, id).await?;
    Ok(Json(client))
}

/// GET /api/clientes/:id/cuenta - 赊账账户 (可用额度 + 未结赊账单)
pub async fn account(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ClientAccount>> {
    let client = client::get(&state.pool, id).await?;
    let pending_conduces = conduce::find_pending_by_client(&state.pool, id).await?;
    Ok(Json(ClientAccount {
        available_credit: client.available_credit(),
        client,
        pending_conduces,
    }))
}

/// POST /api/clientes - 创建客户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.rnc, "rnc", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_credit_terms(Some(payload.credit_limit), Some(payload.credit_days))?;

    let client = client::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevoCliente, &client);
    Ok(Json(client))
}

/// PUT /api/clientes/:id - 更新客户 (不修改欠款余额)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.rnc, "rnc", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_credit_terms(payload.credit_limit, payload.credit_days)?;

    let client = client::update(&state.pool, id, payload).await?;
    state.notify(NotificationType::ClienteActualizado, &client);
    Ok(Json(client))
}

/// DELETE /api/clientes/:id - 删除客户 (有欠款或未结赊账单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    client::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::ClienteEliminado, id);
    Ok(Json(true))
}
