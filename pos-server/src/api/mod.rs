//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`clients`] - 客户与赊账账户 (`/api/clientes`)
//! - [`orders`] - 外卖订单 (`/api/ordenes`)
//! - [`sales`] - 柜台销售 (`/api/ventas`)
//! - [`invoices`] - 发票与赊账结算 (`/api/facturas`)
//! - [`conduces`] - 赊账单 (`/api/conduces`)
//! - [`expenses`] - 支出 (`/api/gastos`)
//! - [`opening_balance`] - 开班现金 (`/api/monto-inicial`)
//! - [`company_config`] - 公司信息 (`/api/configuracion-empresa`)
//! - [`tax_config`] - RNC / NCF 配置 (`/api/configuracion-rnc`)
//! - [`reports`] - 日结对账与收银结算 (`/api/reporte`)
//! - [`ws`] - 通知 WebSocket (`/ws`)

pub mod middleware;

pub mod health;
pub mod ws;

pub mod clients;
pub mod company_config;
pub mod conduces;
pub mod expenses;
pub mod invoices;
pub mod opening_balance;
pub mod orders;
pub mod reports;
pub mod sales;
pub mod tax_config;

use std::time::Duration;

use axum::{Json, Router};
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::repository::TimeRange;
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::VoidRequest;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(ws::router())
        .merge(clients::router())
        .merge(orders::router())
        .merge(sales::router())
        .merge(invoices::router())
        .merge(conduces::router())
        .merge(expenses::router())
        .merge(opening_balance::router())
        .merge(company_config::router())
        .merge(tax_config::router())
        .merge(reports::router())
}

/// Build a fully configured application with all middleware
///
/// Used by both the HTTP server and the oneshot tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    build_router()
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        // Request logging: wrapped by the request-id layers below, so x-request-id is already set
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        // ========== Application Middleware ==========
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}

/// `?fecha=YYYY-MM-DD` filter shared by the list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub fecha: Option<String>,
}

impl DateQuery {
    /// Business-day range of `fecha`, `None` when absent
    pub fn range(&self, state: &ServerState) -> AppResult<Option<TimeRange>> {
        date_range(self.fecha.as_deref(), state)
    }
}

pub(crate) fn date_range(fecha: Option<&str>, state: &ServerState) -> AppResult<Option<TimeRange>> {
    match fecha.map(str::trim).filter(|f| !f.is_empty()) {
        Some(f) => {
            let date = time::parse_date(f)?;
            let (start, end) = time::day_range(date, state.config.timezone);
            Ok(Some(TimeRange::new(start, end)))
        }
        None => Ok(None),
    }
}

/// Optional `{ "reason": .. }` body of the `/anular` endpoints
pub(crate) fn void_reason(payload: Option<Json<VoidRequest>>) -> Result<Option<String>, AppError> {
    let reason = payload
        .and_then(|Json(body)| body.reason)
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    validate_optional_text(&reason, "reason", MAX_NOTE_LEN)?;
    Ok(reason)
}
