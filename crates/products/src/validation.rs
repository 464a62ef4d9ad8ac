//! Field validation rules for product input.
//!
//! Rules are evaluated against every field and collected into a [`Violations`]
//! set, so a single submission reports all of its problems at once.

use thiserror::Error;

/// External name of the product name field.
pub const FIELD_NAME: &str = "name";

/// External name of the price field.
pub const FIELD_PRICE_IN_CENTS: &str = "priceInCents";

/// Maximum product name length, in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 100;

/// Kind of rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    NameBlank,
    NameTooLong,
    PriceNotPositive,
}

impl ViolationKind {
    /// Stable tag for the violated rule.
    pub fn tag(&self) -> &'static str {
        match self {
            ViolationKind::NameBlank => "NAME_BLANK",
            ViolationKind::NameTooLong => "NAME_TOO_LONG",
            ViolationKind::PriceNotPositive => "PRICE_NOT_POSITIVE",
        }
    }

    /// External field the rule applies to.
    pub fn field(&self) -> &'static str {
        match self {
            ViolationKind::NameBlank | ViolationKind::NameTooLong => FIELD_NAME,
            ViolationKind::PriceNotPositive => FIELD_PRICE_IN_CENTS,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ViolationKind::NameBlank => "product name must not be blank".to_string(),
            ViolationKind::NameTooLong => {
                format!("product name must be at most {NAME_MAX_CHARS} characters")
            }
            ViolationKind::PriceNotPositive => "price must be greater than zero".to_string(),
        }
    }
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

impl From<ViolationKind> for FieldViolation {
    fn from(kind: ViolationKind) -> Self {
        Self {
            field: kind.field(),
            kind,
            message: kind.message(),
        }
    }
}

/// All violations found for a single submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid product: {}", summarize(.0))]
pub struct Violations(Vec<FieldViolation>);

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ViolationKind) {
        self.0.push(kind.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validate a product name, returning the trimmed value.
pub fn validate_name(name: Option<&str>) -> Result<String, ViolationKind> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ViolationKind::NameBlank);
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(ViolationKind::NameTooLong);
    }
    Ok(trimmed.to_string())
}

/// Validate a price in minor currency units.
pub fn validate_price(price_in_cents: Option<i64>) -> Result<i64, ViolationKind> {
    match price_in_cents {
        Some(p) if p > 0 => Ok(p),
        _ => Err(ViolationKind::PriceNotPositive),
    }
}
