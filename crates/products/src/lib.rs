//! Products domain module.
//!
//! This crate contains the product entity, its validation rules, the storage
//! port the service depends on, and the service that sequences
//! lookup → mutation → persistence. It performs no IO of its own.

pub mod product;
pub mod repository;
pub mod service;
pub mod validation;

pub use product::{Product, ProductInput};
pub use repository::{ProductRepository, RepositoryError, RepositoryResult};
pub use service::{NOT_FOUND_MESSAGE, ProductService, ServiceError};
pub use validation::{FieldViolation, ViolationKind, Violations};
