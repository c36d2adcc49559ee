//! Stock movement primitives.
//!
//! A `Movement` is an atomic event that changes the on-hand quantity of a
//! [`Product`](crate::Product): an `input` receives stock, an `output` ships
//! it. The product quantity is kept in lockstep with the movement ledger, so
//! replaying every movement from an empty product always reproduces the
//! stored balance.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Input,
    Output,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    /// Signed effect of a movement of this kind on the product quantity.
    pub fn signed(self, quantity: i64) -> i64 {
        match self {
            Self::Input => quantity,
            Self::Output => -quantity,
        }
    }
}

impl TryFrom<&str> for MovementKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            other => Err(EngineError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub kind: MovementKind,
    pub product_id: Uuid,
    pub quantity: i64,
    pub performed_by: String,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movement {
    pub fn new(
        kind: MovementKind,
        product_id: Uuid,
        quantity: i64,
        performed_by: String,
        occurred_at: DateTime<Utc>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if quantity < 1 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be >= 1".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            product_id,
            quantity,
            performed_by,
            occurred_at,
            note,
            created_at: now,
            updated_at: now,
        })
    }

    /// Signed effect of this movement on the product quantity.
    pub fn signed_delta(&self) -> i64 {
        self.kind.signed(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub product_id: String,
    pub quantity: i64,
    pub performed_by: String,
    pub occurred_at: DateTimeUtc,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Movement> for ActiveModel {
    fn from(movement: &Movement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id.to_string()),
            kind: ActiveValue::Set(movement.kind.as_str().to_string()),
            product_id: ActiveValue::Set(movement.product_id.to_string()),
            quantity: ActiveValue::Set(movement.quantity),
            performed_by: ActiveValue::Set(movement.performed_by.clone()),
            occurred_at: ActiveValue::Set(movement.occurred_at),
            note: ActiveValue::Set(movement.note.clone()),
            created_at: ActiveValue::Set(movement.created_at),
            updated_at: ActiveValue::Set(movement.updated_at),
        }
    }
}

impl TryFrom<Model> for Movement {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::MovementNotFound("movement not exists".to_string()))?,
            kind: MovementKind::try_from(model.kind.as_str())?,
            product_id: Uuid::parse_str(&model.product_id)
                .map_err(|_| EngineError::ProductNotFound("product not exists".to_string()))?,
            quantity: model.quantity,
            performed_by: model.performed_by,
            occurred_at: model.occurred_at,
            note: model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [MovementKind::Input, MovementKind::Output] {
            assert_eq!(MovementKind::try_from(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = MovementKind::try_from("transfer").unwrap_err();

        assert_eq!(err, EngineError::InvalidKind("transfer".to_string()));
    }

    #[test]
    fn signed_delta_follows_kind() {
        let input = Movement::new(
            MovementKind::Input,
            Uuid::new_v4(),
            25,
            "magazzino".to_string(),
            Utc::now(),
            None,
        )
        .unwrap();
        let output = Movement::new(
            MovementKind::Output,
            Uuid::new_v4(),
            25,
            "magazzino".to_string(),
            Utc::now(),
            None,
        )
        .unwrap();

        assert_eq!(input.signed_delta(), 25);
        assert_eq!(output.signed_delta(), -25);
    }

    #[test]
    fn movement_rejects_non_positive_quantity() {
        for quantity in [0, -10] {
            let result = Movement::new(
                MovementKind::Input,
                Uuid::new_v4(),
                quantity,
                "magazzino".to_string(),
                Utc::now(),
                None,
            );

            assert_eq!(
                result.unwrap_err(),
                EngineError::InvalidQuantity("quantity must be >= 1".to_string())
            );
        }
    }
}
