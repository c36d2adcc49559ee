use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, movements, products};

use super::Engine;

impl Engine {
    async fn find_product(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
    ) -> ResultEngine<Option<products::Model>> {
        products::Entity::find_by_id(product_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Look up a product referenced directly by a caller.
    pub(super) async fn require_product(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
    ) -> ResultEngine<products::Model> {
        self.find_product(db, product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound(product_id.to_string()))
    }

    /// Look up the product a stored movement points at.
    ///
    /// The distinct message matters: the caller named a movement, not the
    /// product, so the id in the error would be one they never supplied.
    pub(super) async fn require_movement_product(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
    ) -> ResultEngine<products::Model> {
        self.find_product(db, product_id)
            .await?
            .ok_or_else(|| EngineError::ProductNotFound("associated product".to_string()))
    }

    pub(super) async fn require_movement(
        &self,
        db: &DatabaseTransaction,
        movement_id: Uuid,
    ) -> ResultEngine<movements::Model> {
        movements::Entity::find_by_id(movement_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::MovementNotFound(movement_id.to_string()))
    }

    pub(super) async fn movement_count_for_product(
        &self,
        db: &DatabaseTransaction,
        product_id: Uuid,
    ) -> ResultEngine<u64> {
        movements::Entity::find()
            .filter(movements::Column::ProductId.eq(product_id.to_string()))
            .count(db)
            .await
            .map_err(Into::into)
    }
}
