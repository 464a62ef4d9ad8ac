use serde::{Deserialize, Serialize};

use catalog_core::Entity;
use catalog_products::{Product, ProductInput};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Fields are optional so that missing or `null` values reach validation and
/// are reported per field instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_in_cents: Option<i64>,
}

impl From<ProductRequest> for ProductInput {
    fn from(body: ProductRequest) -> Self {
        ProductInput {
            name: body.name,
            price_in_cents: body.price_in_cents,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Option<i64>,
    pub name: String,
    pub price_in_cents: i64,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id().map(i64::from),
            name: p.name().to_string(),
            price_in_cents: p.price_in_cents(),
        }
    }
}

pub fn product_to_json(p: &Product) -> ProductResponse {
    ProductResponse::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::ProductId;

    #[test]
    fn request_uses_camel_case_and_tolerates_nulls() {
        let body: ProductRequest =
            serde_json::from_str(r#"{"name":null,"priceInCents":250000}"#).unwrap();
        assert_eq!(body.name, None);
        assert_eq!(body.price_in_cents, Some(250_000));

        let empty: ProductRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(ProductInput::from(empty), ProductInput::default());
    }

    #[test]
    fn response_serializes_external_field_names() {
        let product = Product::restore(ProductId::new(1), "Notebook", 250_000).unwrap();
        let json = serde_json::to_value(product_to_json(&product)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Notebook", "priceInCents": 250000})
        );
    }
}
