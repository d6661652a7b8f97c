//! Commander API - HTTP surface for the Command resource
//!
//! - `config`: layered `Settings` (defaults, TOML file, environment)
//! - `state`: the shared `RecordStore` handed to every request
//! - `routes`: the axum `Router` and its handlers
//! - `server`: binding, serving and graceful shutdown

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Backend, Settings, SettingsError};
pub use error::ApiError;
pub use routes::{location, router, COMMANDS_PATH};
pub use server::serve;
pub use state::AppState;
