//! Conduce API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{date_range, void_reason};
use crate::core::ServerState;
use crate::db::repository::conduce::{self, ConduceFilter};
use crate::utils::AppResult;
use shared::message::NotificationType;
use shared::models::{Conduce, ConduceCreate, ConduceStatus, VoidRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub estado: Option<ConduceStatus>,
    /// 客户 ID
    pub cliente: Option<i64>,
}

/// GET /api/conduces - 获取赊账单列表 (?fecha=&estado=&cliente=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Conduce>>> {
    let filter = ConduceFilter {
        range: date_range(query.fecha.as_deref(), &state)?,
        status: query.estado,
        client_id: query.cliente,
    };
    let conduces = conduce::find_all(&state.pool, &filter).await?;
    Ok(Json(conduces))
}

/// GET /api/conduces/:id - 获取单张赊账单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Conduce>> {
    let conduce = conduce::get(&state.pool, id).await?;
    Ok(Json(conduce))
}

/// POST /api/conduces - 开赊账单 (校验信用额度)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ConduceCreate>,
) -> AppResult<Json<Conduce>> {
    let conduce = conduce::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevoConduce, &conduce);
    Ok(Json(conduce))
}

/// PUT /api/conduces/:id/anular - 作废赊账单 (释放客户欠款)
pub async fn void(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<VoidRequest>>,
) -> AppResult<Json<Conduce>> {
    let reason = void_reason(payload)?;
    let conduce = conduce::void(&state.pool, id, reason).await?;
    state.notify(NotificationType::ConduceAnulado, &conduce);
    Ok(Json(conduce))
}

/// DELETE /api/conduces/:id - 删除赊账单 (仅限已作废)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    conduce::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::ConduceEliminado, id);
    Ok(Json(true))
}
