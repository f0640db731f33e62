mod dto;
pub mod handlers;
pub mod refcode;
pub mod repo;
pub mod search;
pub mod serial;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
