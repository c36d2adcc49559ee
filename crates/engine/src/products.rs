//! Product primitives.
//!
//! A `Product` is a catalog item whose on-hand `quantity` is the running
//! balance of every stock movement recorded against it.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A catalog product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier for this product.
    ///
    /// This is a UUID generated once and persisted in the database, so the
    /// product can be renamed without breaking movement references.
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub quantity: i64,
    pub category: Option<String>,
    pub vendor: Option<String>,
}

impl Product {
    pub fn new(name: String, sku: String, price_minor: i64, quantity: i64) -> ResultEngine<Self> {
        if price_minor < 0 {
            return Err(EngineError::InvalidQuantity(
                "price_minor must be >= 0".to_string(),
            ));
        }
        if quantity < 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            sku,
            description: None,
            price_minor,
            quantity,
            category: None,
            vendor: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub quantity: i64,
    pub category: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            sku: ActiveValue::Set(product.sku.clone()),
            description: ActiveValue::Set(product.description.clone()),
            price_minor: ActiveValue::Set(product.price_minor),
            quantity: ActiveValue::Set(product.quantity),
            category: ActiveValue::Set(product.category.clone()),
            vendor: ActiveValue::Set(product.vendor.clone()),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::ProductNotFound("product not exists".to_string()))?,
            name: model.name,
            sku: model.sku,
            description: model.description,
            price_minor: model.price_minor,
            quantity: model.quantity,
            category: model.category,
            vendor: model.vendor,
        })
    }
}
