use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateMovementCmd, EngineError, Movement, MovementKind, ResultEngine, UpdateMovementCmd,
    movements, products,
};

use super::super::{Engine, normalize_note, normalize_required_name, with_tx};

// Quantities live in i64 but a movement command may carry any value >= 1,
// so every balance shift is checked instead of trusting the range.
fn bounded(balance: Option<i64>) -> ResultEngine<i64> {
    balance.ok_or_else(|| {
        EngineError::InvalidQuantity("product quantity out of range".to_string())
    })
}

fn apply_optional_note_patch(
    existing: Option<String>,
    patch: Option<&str>,
) -> ResultEngine<Option<String>> {
    match patch {
        None => Ok(existing),
        Some(value) => normalize_note(Some(value)),
    }
}

impl Engine {
    async fn persist_product_quantity(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: &str,
        quantity: i64,
    ) -> ResultEngine<()> {
        let product_active = products::ActiveModel {
            id: ActiveValue::Set(product_id.to_string()),
            quantity: ActiveValue::Set(quantity),
            ..Default::default()
        };
        product_active.update(db_tx).await?;
        Ok(())
    }

    /// Records a stock movement and moves the product quantity with it.
    ///
    /// An `input` increases the on-hand quantity, an `output` decreases it.
    /// An output larger than the current stock is rejected, so the quantity
    /// can never go negative. `occurred_at` defaults to `Utc::now()` when the
    /// command leaves it unset.
    pub async fn create_movement(&self, cmd: CreateMovementCmd) -> ResultEngine<Movement> {
        let CreateMovementCmd {
            kind,
            product_id,
            quantity,
            performed_by,
            note,
            occurred_at,
        } = cmd;
        let performed_by = normalize_required_name(&performed_by, "performed_by")?;
        let note = normalize_note(note.as_deref())?;
        let occurred_at = occurred_at.unwrap_or_else(Utc::now);

        let movement = Movement::new(kind, product_id, quantity, performed_by, occurred_at, note)?;
        let movement_entry: movements::ActiveModel = (&movement).into();

        with_tx!(self, |db_tx| {
            let product_model = self.require_product(&db_tx, product_id).await?;

            if movement.kind == MovementKind::Output && product_model.quantity < movement.quantity {
                return Err(EngineError::InsufficientStock {
                    available: product_model.quantity,
                    requested: movement.quantity,
                });
            }
            let new_quantity =
                bounded(product_model.quantity.checked_add(movement.signed_delta()))?;

            movement_entry.insert(&db_tx).await?;
            self.persist_product_quantity(&db_tx, &product_model.id, new_quantity)
                .await?;

            Ok(movement)
        })
    }

    /// Updates an existing movement (kind, product, quantity, and/or
    /// metadata), recomputing the affected product quantities.
    ///
    /// The stored effect is reverted first and the effective values are
    /// applied on top, so editing a movement never double-counts it. When the
    /// movement is retargeted to another product, the revert on the original
    /// product and the apply on the new one happen in the same DB
    /// transaction, and each side is guarded against going negative.
    pub async fn update_movement(&self, cmd: UpdateMovementCmd) -> ResultEngine<Movement> {
        let UpdateMovementCmd {
            movement_id,
            kind,
            product_id,
            quantity,
            note,
            occurred_at,
        } = cmd;
        if let Some(quantity) = quantity
            && quantity < 1
        {
            return Err(EngineError::InvalidQuantity(
                "quantity must be >= 1".to_string(),
            ));
        }
        let note = note.as_deref();

        with_tx!(self, |db_tx| {
            let movement_model = self.require_movement(&db_tx, movement_id).await?;
            let movement = Movement::try_from(movement_model)?;

            let new_kind = kind.unwrap_or(movement.kind);
            let new_product_id = product_id.unwrap_or(movement.product_id);
            let new_quantity = quantity.unwrap_or(movement.quantity);
            let new_note = apply_optional_note_patch(movement.note.clone(), note)?;
            let new_occurred_at = occurred_at.unwrap_or(movement.occurred_at);
            let new_delta = new_kind.signed(new_quantity);

            if new_product_id == movement.product_id {
                let product_model = self
                    .require_movement_product(&db_tx, movement.product_id)
                    .await?;
                let reverted =
                    bounded(product_model.quantity.checked_sub(movement.signed_delta()))?;
                let balance = bounded(reverted.checked_add(new_delta))?;
                if balance < 0 {
                    return Err(EngineError::InsufficientStock {
                        available: reverted,
                        requested: new_quantity,
                    });
                }

                self.persist_product_quantity(&db_tx, &product_model.id, balance)
                    .await?;
            } else {
                let source_model = self
                    .require_movement_product(&db_tx, movement.product_id)
                    .await?;
                let target_model = self.require_product(&db_tx, new_product_id).await?;

                let reverted_source =
                    bounded(source_model.quantity.checked_sub(movement.signed_delta()))?;
                if reverted_source < 0 {
                    return Err(EngineError::NegativeStockViolation {
                        resulting: reverted_source,
                    });
                }
                let target_balance = bounded(target_model.quantity.checked_add(new_delta))?;
                if target_balance < 0 {
                    return Err(EngineError::InsufficientStock {
                        available: target_model.quantity,
                        requested: new_quantity,
                    });
                }

                self.persist_product_quantity(&db_tx, &source_model.id, reverted_source)
                    .await?;
                self.persist_product_quantity(&db_tx, &target_model.id, target_balance)
                    .await?;
            }

            let updated_at = Utc::now();
            let movement_active = movements::ActiveModel {
                id: ActiveValue::Set(movement_id.to_string()),
                kind: ActiveValue::Set(new_kind.as_str().to_string()),
                product_id: ActiveValue::Set(new_product_id.to_string()),
                quantity: ActiveValue::Set(new_quantity),
                note: ActiveValue::Set(new_note.clone()),
                occurred_at: ActiveValue::Set(new_occurred_at),
                updated_at: ActiveValue::Set(updated_at),
                ..Default::default()
            };
            movement_active.update(&db_tx).await?;

            Ok(Movement {
                id: movement.id,
                kind: new_kind,
                product_id: new_product_id,
                quantity: new_quantity,
                performed_by: movement.performed_by,
                occurred_at: new_occurred_at,
                note: new_note,
                created_at: movement.created_at,
                updated_at,
            })
        })
    }

    /// Deletes a movement and reverts its effect on the product quantity.
    ///
    /// Deleting an `input` that the product has since shipped out is
    /// rejected: the revert would leave a negative on-hand quantity.
    pub async fn delete_movement(&self, movement_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let movement_model = self.require_movement(&db_tx, movement_id).await?;
            let movement = Movement::try_from(movement_model)?;

            let product_model = self
                .require_movement_product(&db_tx, movement.product_id)
                .await?;

            let reverted =
                bounded(product_model.quantity.checked_sub(movement.signed_delta()))?;
            if reverted < 0 {
                return Err(EngineError::NegativeStockViolation {
                    resulting: reverted,
                });
            }

            movements::Entity::delete_by_id(movement_id.to_string())
                .exec(&db_tx)
                .await?;
            self.persist_product_quantity(&db_tx, &product_model.id, reverted)
                .await?;

            Ok(())
        })
    }
}
