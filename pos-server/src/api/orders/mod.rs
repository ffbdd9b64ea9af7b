//! Delivery Order API 模块 (外卖订单)

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ordenes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/estado", put(handler::update_status))
        .route("/{id}/metodoPago", put(handler::update_payment_method))
        .route("/{id}/anular", put(handler::void))
}
