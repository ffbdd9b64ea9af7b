//! Delivery Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{date_range, void_reason};
use crate::core::ServerState;
use crate::db::repository::delivery_order;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::AppResult;
use shared::message::NotificationType;
use shared::models::{
    DeliveryOrder, DeliveryOrderCreate, OrderPaymentUpdate, OrderStatus, OrderStatusUpdate,
    VoidRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub estado: Option<OrderStatus>,
}

fn validate_create(payload: &DeliveryOrderCreate) -> AppResult<()> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.customer_address, "customer_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_amount(payload.amount, "amount")?;
    validate_amount(payload.delivery_fee, "delivery_fee")?;
    Ok(())
}

/// GET /api/ordenes - 获取订单列表 (?fecha=&estado=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DeliveryOrder>>> {
    let range = date_range(query.fecha.as_deref(), &state)?;
    let orders = delivery_order::find_all(&state.pool, range, query.estado).await?;
    Ok(Json(orders))
}

/// GET /api/ordenes/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeliveryOrder>> {
    let order = delivery_order::get(&state.pool, id).await?;
    Ok(Json(order))
}

/// POST /api/ordenes - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DeliveryOrderCreate>,
) -> AppResult<Json<DeliveryOrder>> {
    validate_create(&payload)?;

    let order = delivery_order::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevaOrden, &order);
    Ok(Json(order))
}

/// PUT /api/ordenes/:id/estado - 推进订单状态
///
/// 赊账订单送达时自动生成赊账单
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<DeliveryOrder>> {
    let (order, issued) = delivery_order::update_status(&state.pool, id, payload.status).await?;

    if let Some(conduce) = &issued {
        state.notify(NotificationType::NuevoConduce, conduce);
    }
    state.notify(NotificationType::OrdenActualizada, &order);
    Ok(Json(order))
}

/// PUT /api/ordenes/:id/metodoPago - 修改支付方式
pub async fn update_payment_method(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPaymentUpdate>,
) -> AppResult<Json<DeliveryOrder>> {
    let order =
        delivery_order::update_payment_method(&state.pool, id, payload.payment_method).await?;
    state.notify(NotificationType::OrdenActualizada, &order);
    Ok(Json(order))
}

/// PUT /api/ordenes/:id/anular - 作废订单
pub async fn void(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<VoidRequest>>,
) -> AppResult<Json<DeliveryOrder>> {
    let reason = void_reason(payload)?;
    let order = delivery_order::void(&state.pool, id, reason).await?;
    state.notify(NotificationType::OrdenActualizada, &order);
    Ok(Json(order))
}

/// DELETE /api/ordenes/:id - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    delivery_order::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::OrdenEliminada, id);
    Ok(Json(true))
}
