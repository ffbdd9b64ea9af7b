//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::DateQuery;
use crate::core::ServerState;
use crate::db::repository::{TimeRange, cash_closing, report};
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::AppResult;
use shared::message::NotificationType;
use shared::models::{CashClosing, CashClosingCreate, DailyReconciliation};

#[derive(Debug, Deserialize)]
pub struct ClosingsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    30
}

async fn reconcile_day(state: &ServerState, date: NaiveDate) -> AppResult<DailyReconciliation> {
    let (start, end) = time::day_range(date, state.config.timezone);
    let report =
        report::daily_reconciliation(&state.pool, &date.to_string(), TimeRange::new(start, end))
            .await?;
    Ok(report)
}

/// GET /api/reporte/cuadre - 日结对账 (?fecha=, 默认今天)
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DailyReconciliation>> {
    let date = time::parse_date_or_today(query.fecha.as_deref(), state.config.timezone)?;
    let report = reconcile_day(&state, date).await?;
    Ok(Json(report))
}

/// POST /api/reporte/cierre - 收银结算 (记录实点现金与差额)
pub async fn close_day(
    State(state): State<ServerState>,
    Json(payload): Json<CashClosingCreate>,
) -> AppResult<Json<CashClosing>> {
    validate_amount(payload.counted_cash, "counted_cash")?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let date = time::parse_date_or_today(payload.business_date.as_deref(), state.config.timezone)?;

    let report = reconcile_day(&state, date).await?;
    let closing = cash_closing::upsert(
        &state.pool,
        &report.date,
        report.expected_cash,
        payload.counted_cash,
        payload.note,
    )
    .await?;

    tracing::info!(
        date = %closing.business_date,
        expected = closing.expected_cash,
        counted = closing.counted_cash,
        variance = closing.variance,
        "Cash register closed"
    );
    state.notify(NotificationType::CierreCaja, &closing);
    Ok(Json(closing))
}

/// GET /api/reporte/cierres - 历史收银结算
pub async fn list_closings(
    State(state): State<ServerState>,
    Query(query): Query<ClosingsQuery>,
) -> AppResult<Json<Vec<CashClosing>>> {
    let closings = cash_closing::find_all(&state.pool, query.limit.clamp(1, 365)).await?;
    Ok(Json(closings))
}
