//! Command structs for engine operations.
//!
//! These types group parameters for write operations (product creation,
//! movement creation/update), keeping call sites readable and avoiding long
//! argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::MovementKind;

/// Create a catalog product.
#[derive(Clone, Debug)]
pub struct NewProductCmd {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub quantity: i64,
    pub category: Option<String>,
    pub vendor: Option<String>,
}

impl NewProductCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            description: None,
            price_minor: 0,
            quantity: 0,
            category: None,
            vendor: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn price_minor(mut self, price_minor: i64) -> Self {
        self.price_minor = price_minor;
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

/// Record a stock movement against a product.
#[derive(Clone, Debug)]
pub struct CreateMovementCmd {
    pub kind: MovementKind,
    pub product_id: Uuid,
    pub quantity: i64,
    pub performed_by: String,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl CreateMovementCmd {
    #[must_use]
    pub fn new(
        kind: MovementKind,
        product_id: Uuid,
        quantity: i64,
        performed_by: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            product_id,
            quantity,
            performed_by: performed_by.into(),
            note: None,
            occurred_at: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}

/// Update an existing stock movement.
#[derive(Clone, Debug)]
pub struct UpdateMovementCmd {
    pub movement_id: Uuid,

    pub kind: Option<MovementKind>,
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl UpdateMovementCmd {
    #[must_use]
    pub fn new(movement_id: Uuid) -> Self {
        Self {
            movement_id,
            kind: None,
            product_id: None,
            quantity: None,
            note: None,
            occurred_at: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn product_id(mut self, product_id: Uuid) -> Self {
        self.product_id = Some(product_id);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}
