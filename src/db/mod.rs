//! Database module: SQLite pool setup plus SQL repositories.
//!
//! - `model`: row-shaped view models and the JSON item codec.
//! - `repo`: SQL-only functions over the append-only event tables.
//!
//! External modules import from `roperia::db`; the repository API is
//! re-exported here.

pub mod model;
pub mod repo;

pub use repo::*;
