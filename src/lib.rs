pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod goals;
pub mod input;
pub mod meals;
pub mod models;
pub mod nutrition;
pub mod state;
pub mod telemetry;
pub mod users;
pub mod weekly;

pub use error::ApiError;
pub use state::AppState;
