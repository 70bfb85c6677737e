//! Web layer for the harbour dashboard server.
//!
//! Provides HTTP endpoints for the departures snapshot and the stored
//! tide and weather payloads.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
