//! Infrastructure layer: storage adapters and configuration.

pub mod config;
pub mod repository;

pub use config::{AppConfig, ConfigError, DatabaseConfig, StorageBackend};
pub use repository::{InMemoryProductRepository, PostgresProductRepository, connect_pool};
