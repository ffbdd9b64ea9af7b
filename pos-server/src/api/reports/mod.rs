//! Report API 模块 (日结对账 / 收银结算)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reporte", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/cuadre", get(handler::daily))
        .route("/cierre", post(handler::close_day))
        .route("/cierres", get(handler::list_closings))
}
