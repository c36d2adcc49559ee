use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, NewProductCmd, Product, ResultEngine, products};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Add a new product to the catalog.
    pub async fn new_product(&self, cmd: NewProductCmd) -> ResultEngine<Product> {
        let NewProductCmd {
            name,
            sku,
            description,
            price_minor,
            quantity,
            category,
            vendor,
        } = cmd;
        let name = normalize_required_name(&name, "product name")?;
        let sku = normalize_required_name(&sku, "sku")?;

        let mut product = Product::new(name, sku.clone(), price_minor, quantity)?;
        product.description = normalize_optional_text(description.as_deref());
        product.category = normalize_optional_text(category.as_deref());
        product.vendor = normalize_optional_text(vendor.as_deref());
        let product_entry: products::ActiveModel = (&product).into();

        with_tx!(self, |db_tx| {
            // Enforce unique skus before insert so the caller gets a typed
            // error instead of a bare index violation.
            let exists = products::Entity::find()
                .filter(products::Column::Sku.eq(sku.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingSku(sku));
            }

            product_entry.insert(&db_tx).await?;

            Ok(product)
        })
    }

    /// Return a product snapshot from DB.
    pub async fn product(&self, product_id: Uuid) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;
            Product::try_from(model)
        })
    }

    /// Return a product snapshot from DB, addressed by sku.
    pub async fn product_by_sku(&self, sku: &str) -> ResultEngine<Product> {
        let sku = normalize_required_name(sku, "sku")?;
        with_tx!(self, |db_tx| {
            let model = products::Entity::find()
                .filter(products::Column::Sku.eq(sku.clone()))
                .one(&db_tx)
                .await?
                .ok_or(EngineError::ProductNotFound(sku))?;
            Product::try_from(model)
        })
    }

    /// Return every product in the catalog, ordered by name.
    pub async fn list_products(&self) -> ResultEngine<Vec<Product>> {
        with_tx!(self, |db_tx| {
            let models = products::Entity::find()
                .order_by_asc(products::Column::Name)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Product::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Delete a product from the catalog.
    ///
    /// A product with recorded movements cannot be removed: the movement
    /// ledger must stay replayable.
    pub async fn delete_product(&self, product_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;
            let movement_count = self.movement_count_for_product(&db_tx, product_id).await?;
            if movement_count > 0 {
                return Err(EngineError::ProductInUse(model.name));
            }

            products::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            Ok(())
        })
    }
}
