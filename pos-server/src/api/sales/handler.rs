//! Sale API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{DateQuery, void_reason};
use crate::core::ServerState;
use crate::db::repository::sale;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text};
use shared::message::NotificationType;
use shared::models::{Sale, SaleCreate, VoidRequest};

/// GET /api/ventas - 获取销售列表 (?fecha=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let range = query.range(&state)?;
    let sales = sale::find_all(&state.pool, range).await?;
    Ok(Json(sales))
}

/// GET /api/ventas/:id - 获取单笔销售
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Sale>> {
    let sale = sale::get(&state.pool, id).await?;
    Ok(Json(sale))
}

/// POST /api/ventas - 创建销售 (不接受赊账)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SaleCreate>,
) -> AppResult<Json<Sale>> {
    validate_optional_text(&payload.client_name, "client_name", MAX_NAME_LEN)?;

    let sale = sale::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevaVenta, &sale);
    Ok(Json(sale))
}

/// PUT /api/ventas/:id/anular - 作废销售
pub async fn void(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<VoidRequest>>,
) -> AppResult<Json<Sale>> {
    let reason = void_reason(payload)?;
    let sale = sale::void(&state.pool, id, reason).await?;
    state.notify(NotificationType::VentaAnulada, &sale);
    Ok(Json(sale))
}

/// DELETE /api/ventas/:id - 删除销售
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    sale::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::VentaEliminada, id);
    Ok(Json(true))
}
