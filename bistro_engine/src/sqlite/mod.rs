//! SQLite database module for the ordering engine.

mod sqlite_impl;

pub mod db;
pub use db::new_pool;
pub use sqlite_impl::SqliteDatabase;
