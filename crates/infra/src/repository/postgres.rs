//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError | Scenario |
//! |------------|-----------------|----------|
//! | Database (any code) | `Unavailable` | Constraint or server-side failure |
//! | PoolTimedOut / PoolClosed / Io / Tls | `Unavailable` | Store cannot be reached |
//! | ColumnDecode / ColumnNotFound | `Corrupt` | Row does not match the expected shape |
//! | Other | `Unavailable` | Anything else |
//!
//! Rows whose values fail product validation are reported as `Corrupt`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Row};
use tracing::instrument;

use catalog_core::{Entity, ProductId};
use catalog_products::{Product, ProductRepository, RepositoryError, RepositoryResult};

use crate::config::DatabaseConfig;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id             BIGSERIAL PRIMARY KEY,
        name           VARCHAR(100) NOT NULL,
        price_in_cents BIGINT NOT NULL CHECK (price_in_cents > 0)
    )
"#;

/// Build a connection pool from configuration.
pub async fn connect_pool(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Postgres-backed product repository.
///
/// Every method is a single statement, so each call is atomic on its own.
/// Uses the SQLx connection pool which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `products` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn insert(&self, product: &Product) -> RepositoryResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price_in_cents)
            VALUES ($1, $2)
            RETURNING id, name, price_in_cents
            "#,
        )
        .bind(product.name())
        .bind(product.price_in_cents())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        decode(&row)
    }

    async fn upsert(&self, id: ProductId, product: &Product) -> RepositoryResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, price_in_cents)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                price_in_cents = EXCLUDED.price_in_cents
            RETURNING id, name, price_in_cents
            "#,
        )
        .bind(id.get())
        .bind(product.name())
        .bind(product.price_in_cents())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert", e))?;

        decode(&row)
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip_all, fields(product_id = ?product.id()), err)]
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        match product.id() {
            None => self.insert(&product).await,
            Some(id) => self.upsert(id, &product).await,
        }
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, price_in_cents FROM products WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, price_in_cents FROM products ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(decode(row)?);
        }
        tracing::Span::current().record("row_count", products.len());
        Ok(products)
    }

    #[instrument(skip(self), err)]
    async fn exists_by_id(&self, id: ProductId) -> RepositoryResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1) AS present")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_id", e))?;

        row.try_get::<bool, _>("present")
            .map_err(|e| map_sqlx_error("exists_by_id", e))
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&self, id: ProductId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    price_in_cents: i64,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price_in_cents: row.try_get("price_in_cents")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Product::restore(ProductId::new(row.id), row.name, row.price_in_cents)
            .map_err(|v| RepositoryError::corrupt(format!("product {}: {v}", row.id)))
    }
}

fn decode(row: &PgRow) -> RepositoryResult<Product> {
    let row = ProductRow::from_row(row).map_err(|e| map_sqlx_error("decode", e))?;
    Product::try_from(row)
}

/// Map SQLx errors to repository errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            RepositoryError::unavailable(format!(
                "database error in {operation} [{code}]: {}",
                db_err.message()
            ))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            RepositoryError::corrupt(format!("undecodable row in {operation}: {err}"))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::unavailable(format!("connection pool closed in {operation}"))
        }
        _ => RepositoryError::unavailable(format!("sqlx error in {operation}: {err}")),
    }
}
