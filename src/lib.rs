//! Campus Portal library
//!
//! University management backend: role dashboards, attendance and grade
//! tracking for professors, clubs and their events.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use api::{create_router, AppState};
pub use config::Config;
pub use database::DatabaseManager;
pub use error::{AppError, AppResult};
