//! Company Config API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::company_config;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_LOGO_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::message::NotificationType;
use shared::models::{CompanyConfig, CompanyConfigUpdate};

/// GET /api/configuracion-empresa - 获取公司信息
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<CompanyConfig>> {
    let config = company_config::get(&state.pool).await?;
    Ok(Json(config))
}

/// PUT /api/configuracion-empresa - 更新公司信息
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<CompanyConfigUpdate>,
) -> AppResult<Json<CompanyConfig>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.rnc, "rnc", MAX_SHORT_TEXT_LEN)?;
    // logo: data URL
    validate_optional_text(&payload.logo, "logo", MAX_LOGO_LEN)?;

    let config = company_config::update(&state.pool, payload).await?;
    state.notify(NotificationType::ConfiguracionEmpresaActualizada, &config);
    Ok(Json(config))
}
