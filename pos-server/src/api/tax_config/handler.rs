//! Tax Config API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::tax_config;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use shared::message::NotificationType;
use shared::models::{TaxConfig, TaxConfigCreate, TaxConfigUpdate};

/// GET /api/configuracion-rnc - 获取 NCF 配置列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TaxConfig>>> {
    let configs = tax_config::find_all(&state.pool).await?;
    Ok(Json(configs))
}

/// POST /api/configuracion-rnc - 创建 NCF 配置
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TaxConfigCreate>,
) -> AppResult<Json<TaxConfig>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.rnc, "rnc", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.ncf_prefix, "ncf_prefix", MAX_SHORT_TEXT_LEN)?;

    let config = tax_config::create(&state.pool, payload).await?;
    state.notify(NotificationType::ConfiguracionRncActualizada, &config);
    Ok(Json(config))
}

/// PUT /api/configuracion-rnc/:id - 更新 NCF 配置
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaxConfigUpdate>,
) -> AppResult<Json<TaxConfig>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(rnc) = &payload.rnc {
        validate_required_text(rnc, "rnc", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(prefix) = &payload.ncf_prefix {
        validate_required_text(prefix, "ncf_prefix", MAX_SHORT_TEXT_LEN)?;
    }

    let config = tax_config::update(&state.pool, id, payload).await?;
    state.notify(NotificationType::ConfiguracionRncActualizada, &config);
    Ok(Json(config))
}

/// DELETE /api/configuracion-rnc/:id - 删除 NCF 配置
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tax_config::delete(&state.pool, id).await?;
    state.notify_deleted(NotificationType::ConfiguracionRncActualizada, id);
    Ok(Json(true))
}
