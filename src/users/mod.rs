use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo_types::User;

pub fn router() -> Router<AppState> {
    handlers::lookup_routes()
}
