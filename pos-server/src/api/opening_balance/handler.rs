//! Opening Balance API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::DateQuery;
use crate::core::ServerState;
use crate::db::repository::opening_balance;
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::message::NotificationType;
use shared::models::{OpeningBalance, OpeningBalanceSet};

/// GET /api/monto-inicial - 获取某日开班现金 (?fecha=, 默认今天)
pub async fn get_by_date(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<OpeningBalance>> {
    let date = time::parse_date_or_today(query.fecha.as_deref(), state.config.timezone)?;
    let business_date = date.to_string();
    let balance = opening_balance::find_by_date(&state.pool, &business_date)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OpeningBalanceNotFound,
                format!("No opening balance for {business_date}"),
            )
        })?;
    Ok(Json(balance))
}

/// POST /api/monto-inicial - 设置开班现金 (同一天重复设置则覆盖)
pub async fn set(
    State(state): State<ServerState>,
    Json(payload): Json<OpeningBalanceSet>,
) -> AppResult<Json<OpeningBalance>> {
    validate_amount(payload.amount, "amount")?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let date = time::parse_date_or_today(payload.business_date.as_deref(), state.config.timezone)?;

    let balance =
        opening_balance::upsert(&state.pool, &date.to_string(), payload.amount, payload.note)
            .await?;
    state.notify(NotificationType::MontoInicialActualizado, &balance);
    Ok(Json(balance))
}
