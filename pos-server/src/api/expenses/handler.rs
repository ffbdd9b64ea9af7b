//! Expense API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::DateQuery;
use crate::core::ServerState;
use crate::db::repository::expense;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive_amount,
    validate_required_text,
};
use shared::message::NotificationType;
use shared::models::{Expense, ExpenseCreate, ExpenseUpdate};

/// GET /api/gastos - 获取支出列表 (?fecha=)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let range = query.range(&state)?;
    let expenses = expense::find_all(&state.pool, range).await?;
    Ok(Json(expenses))
}

/// POST /api/gastos - 记录支出 (可指定 created_at 补录)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_positive_amount(payload.amount, "amount")?;
    validate_optional_text(&Some(payload.category.clone()), "category", MAX_SHORT_TEXT_LEN)?;

    let expense = expense::create(&state.pool, payload).await?;
    state.notify(NotificationType::NuevoGasto, &expense);
    Ok(Json(expense))
}

/// PUT /api/gastos/:id - 更新支出
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<Expense>> {
    if let Some(description) = &payload.description {
        validate_required_text(description, "description", MAX_NOTE_LEN)?;
    }
    if let Some(amount) = payload.amount {
        validate_positive_amount(amount, "amount")?;
    }
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;

    let expense = expense::update(&state.pool, id, payload).await?;
    state.notify(NotificationType::GastoActualizado, &expense);
    Ok(Json(expense))
}

/// DELETE /api/gastos/:id - 删除支出
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    expense::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::GastoEliminado, id);
    Ok(Json(true))
}
