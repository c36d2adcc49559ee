use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Movement, MovementKind, ResultEngine, movements};

use super::super::{Engine, with_tx};

/// Default page size for movement listings.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Filters for listing movements.
///
/// `from` and `to` are both inclusive (`[from, to]`), in UTC.
#[derive(Clone, Debug, Default)]
pub struct MovementListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, only movements of this kind are returned.
    pub kind: Option<MovementKind>,
    /// If present, only movements against this product are returned.
    pub product_id: Option<Uuid>,
    /// If present, only movements recorded by this user are returned.
    pub performed_by: Option<String>,
}

fn validate_list_filter(filter: &MovementListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidFilter(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyMovementFilters: QueryFilter + Sized {
    fn apply_movement_filters(self, filter: &MovementListFilter) -> Self;
}

impl<T> ApplyMovementFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_movement_filters(mut self, filter: &MovementListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(movements::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(movements::Column::OccurredAt.lte(to));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(movements::Column::Kind.eq(kind.as_str()));
        }
        if let Some(product_id) = filter.product_id {
            self = self.filter(movements::Column::ProductId.eq(product_id.to_string()));
        }
        if let Some(performed_by) = &filter.performed_by {
            self = self.filter(movements::Column::PerformedBy.eq(performed_by.clone()));
        }
        self
    }
}

/// One page of a movement listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementPage {
    pub items: Vec<Movement>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl Engine {
    /// Lists movements matching `filter`, newest first by `(occurred_at DESC,
    /// id DESC)`, with offset pagination.
    ///
    /// `page` is 1-based. Asking for a page past the last one is not an
    /// error: it returns empty `items` with the totals intact, so callers can
    /// recover without a second round trip.
    pub async fn list_movements(
        &self,
        filter: &MovementListFilter,
        page: u64,
        limit: u64,
    ) -> ResultEngine<MovementPage> {
        validate_list_filter(filter)?;
        if page == 0 {
            return Err(EngineError::InvalidFilter("page must be >= 1".to_string()));
        }
        if limit == 0 {
            return Err(EngineError::InvalidFilter("limit must be >= 1".to_string()));
        }

        with_tx!(self, |db_tx| {
            let paginator = movements::Entity::find()
                .apply_movement_filters(filter)
                .order_by_desc(movements::Column::OccurredAt)
                .order_by_desc(movements::Column::Id)
                .paginate(&db_tx, limit);

            // Count and page come from the same DB transaction, so the totals
            // always describe the page they arrive with.
            let totals = paginator.num_items_and_pages().await?;
            let models = paginator.fetch_page(page - 1).await?;

            let mut items: Vec<Movement> = Vec::with_capacity(models.len());
            for model in models {
                items.push(Movement::try_from(model)?);
            }

            Ok(MovementPage {
                items,
                total_count: totals.number_of_items,
                current_page: page,
                total_pages: totals.number_of_pages,
            })
        })
    }

    /// Returns the full movement ledger, newest first by `(occurred_at DESC,
    /// id DESC)`.
    pub async fn movement_history(&self) -> ResultEngine<Vec<Movement>> {
        with_tx!(self, |db_tx| {
            let models = movements::Entity::find()
                .order_by_desc(movements::Column::OccurredAt)
                .order_by_desc(movements::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Movement::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a movement snapshot from DB.
    pub async fn movement(&self, movement_id: Uuid) -> ResultEngine<Movement> {
        with_tx!(self, |db_tx| {
            let model = self.require_movement(&db_tx, movement_id).await?;
            Movement::try_from(model)
        })
    }
}
