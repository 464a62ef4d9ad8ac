use catalog_core::{Entity, ProductId};

use crate::validation::{self, Violations};

/// Entity: Product.
///
/// A `Product` value always satisfies the validation rules: the only ways to
/// obtain one are [`Product::new`], [`Product::restore`] and
/// [`ProductInput::validate`], all of which run them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<ProductId>,
    name: String,
    price_in_cents: i64,
}

impl Product {
    /// Build a not-yet-persisted product from caller-supplied values.
    pub fn new(name: impl Into<String>, price_in_cents: i64) -> Result<Self, Violations> {
        ProductInput {
            name: Some(name.into()),
            price_in_cents: Some(price_in_cents),
        }
        .validate()
    }

    /// Rehydrate a stored product. Values are re-validated.
    pub fn restore(
        id: ProductId,
        name: impl Into<String>,
        price_in_cents: i64,
    ) -> Result<Self, Violations> {
        Ok(Self::new(name, price_in_cents)?.assign_id(id))
    }

    /// Attach the storage-assigned identifier.
    pub fn assign_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Drop any identifier so the product is saved as a new record.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_in_cents(&self) -> i64 {
        self.price_in_cents
    }

    /// Full replacement of the mutable fields. The identifier is kept.
    pub fn replace_details(&mut self, details: Product) {
        self.name = details.name;
        self.price_in_cents = details.price_in_cents;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<ProductId> {
        self.id
    }
}

/// Untrusted product fields as decoded from a request. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub name: Option<String>,
    pub price_in_cents: Option<i64>,
}

impl ProductInput {
    /// Evaluate every rule and either produce a valid, id-less `Product` or
    /// the full set of violations.
    pub fn validate(&self) -> Result<Product, Violations> {
        let mut violations = Violations::new();

        let name = validation::validate_name(self.name.as_deref())
            .map_err(|kind| violations.push(kind))
            .ok();
        let price_in_cents = validation::validate_price(self.price_in_cents)
            .map_err(|kind| violations.push(kind))
            .ok();

        match (name, price_in_cents) {
            (Some(name), Some(price_in_cents)) => Ok(Product {
                id: None,
                name,
                price_in_cents,
            }),
            _ => Err(violations),
        }
    }
}
