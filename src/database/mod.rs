//! Database layer
//!
//! SQLite persistence through SQLx: connection management, row mapping,
//! the read-side repository contract, writes and demo seeding.

pub mod clubs;
pub mod connection;
pub mod mutations;
pub mod repository;
pub mod rows;
pub mod seed;

pub use connection::DatabaseManager;
pub use repository::{AcademicRepository, GradeFilter, Owned};
