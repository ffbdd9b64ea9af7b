//! Opening Balance API 模块 (开班现金)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/monto-inicial", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::get_by_date).post(handler::set))
}
