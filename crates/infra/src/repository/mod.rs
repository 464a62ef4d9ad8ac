//! Product storage adapters.
//!
//! Both implement [`catalog_products::ProductRepository`]; which one backs the
//! service is decided by [`crate::config::StorageBackend`].

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductRepository;
pub use postgres::{PostgresProductRepository, connect_pool};
