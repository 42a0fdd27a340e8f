//! Character Creator backend: user accounts, character records and a stubbed
//! generation endpoint over a pluggable document store.

pub mod app;
pub mod auth;
pub mod characters;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;
pub mod status;
pub mod store;

pub use app::build_app;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
