use std::sync::Arc;

use anyhow::Context;

use catalog_infra::{
    AppConfig, InMemoryProductRepository, PostgresProductRepository, StorageBackend, connect_pool,
};
use catalog_products::{ProductRepository, ProductService};

/// Product service over whichever storage adapter the config selected.
pub type SharedProductService = ProductService<Arc<dyn ProductRepository>>;

#[derive(Clone)]
pub struct AppServices {
    pub products: SharedProductService,
}

impl AppServices {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            products: ProductService::new(repository),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }
}

/// Build the service graph for the configured storage backend.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.storage {
        StorageBackend::InMemory => {
            tracing::warn!("USE_PERSISTENT_STORES not enabled; products are kept in memory only");
            Ok(AppServices::in_memory())
        }
        StorageBackend::Postgres(db) => {
            let pool = connect_pool(db)
                .await
                .context("failed to connect to Postgres")?;

            let repository = PostgresProductRepository::new(pool);
            repository
                .ensure_schema()
                .await
                .context("failed to create products table")?;

            tracing::info!(max_connections = db.max_connections, "using Postgres product store");
            Ok(AppServices::new(Arc::new(repository)))
        }
    }
}
