//! Repository layer for persisting domain models to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
