mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

pub use dto::CharacterResponse;
pub use repo_types::{Character, GUEST_USER_ID};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
