//! Invoice API Handlers
//!
//! `conduce_ids` 非空时为结算发票: 对应赊账单标记为已付, 客户欠款同步减少。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{date_range, void_reason};
use crate::core::ServerState;
use crate::db::repository::invoice;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::AppResult;
use shared::message::NotificationType;
use shared::models::{Invoice, InvoiceCreate, VoidRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    /// 客户 ID
    pub cliente: Option<i64>,
}

fn validate_create(payload: &InvoiceCreate) -> AppResult<()> {
    validate_optional_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.customer_address, "customer_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.customer_rnc, "customer_rnc", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// GET /api/facturas - 获取发票列表 (?fecha=&cliente=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Invoice>>> {
    let range = date_range(query.fecha.as_deref(), &state)?;
    let invoices = invoice::find_all(&state.pool, range, query.cliente).await?;
    Ok(Json(invoices))
}

/// GET /api/facturas/:id - 获取单张发票
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let invoice = invoice::get(&state.pool, id).await?;
    Ok(Json(invoice))
}

/// POST /api/facturas - 开票 (直接开票或赊账单结算)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<Invoice>> {
    validate_create(&payload)?;

    let invoice = invoice::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevaFactura, &invoice);
    Ok(Json(invoice))
}

/// PUT /api/facturas/:id/anular - 作废发票 (结算发票恢复赊账单)
pub async fn void(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<VoidRequest>>,
) -> AppResult<Json<Invoice>> {
    let reason = void_reason(payload)?;
    let invoice = invoice::void(&state.pool, id, reason).await?;
    state.notify(NotificationType::FacturaAnulada, &invoice);
    Ok(Json(invoice))
}

/// DELETE /api/facturas/:id - 删除发票
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    invoice::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::FacturaEliminada, id);
    Ok(Json(true))
}
