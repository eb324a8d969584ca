//! Web layer for the transit route finder.
//!
//! Serves the search form and results pages, plus a JSON API over the
//! same search sessions.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppFetcher, AppState};
pub use templates::*;
