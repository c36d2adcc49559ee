use sea_orm::{Database, DatabaseConnection};

use engine::{CreateMovementCmd, Engine, EngineError, MovementKind, NewProductCmd};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn new_product_round_trips_all_fields() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .new_product(
            NewProductCmd::new("Bulloni M6", "BLT-M6")
                .description("Scatola da 100 pezzi")
                .price_minor(1250)
                .quantity(40)
                .category("ferramenta")
                .vendor("Rossi SRL"),
        )
        .await
        .unwrap();

    assert_eq!(created.name, "Bulloni M6");
    assert_eq!(created.sku, "BLT-M6");
    assert_eq!(created.description.as_deref(), Some("Scatola da 100 pezzi"));
    assert_eq!(created.price_minor, 1250);
    assert_eq!(created.quantity, 40);
    assert_eq!(created.category.as_deref(), Some("ferramenta"));
    assert_eq!(created.vendor.as_deref(), Some("Rossi SRL"));

    let by_id = engine.product(created.id).await.unwrap();
    assert_eq!(by_id, created);

    let by_sku = engine.product_by_sku("BLT-M6").await.unwrap();
    assert_eq!(by_sku, created);
}

#[tokio::test]
async fn names_and_skus_are_trimmed() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .new_product(NewProductCmd::new("  Bulloni M6  ", "  BLT-M6  ").description("   "))
        .await
        .unwrap();

    assert_eq!(created.name, "Bulloni M6");
    assert_eq!(created.sku, "BLT-M6");
    assert_eq!(created.description, None);

    // Lookup normalizes too.
    let found = engine.product_by_sku("  BLT-M6  ").await.unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_product(NewProductCmd::new("   ", "BLT-M6"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("product name must not be empty".to_string())
    );
}

#[tokio::test]
async fn blank_sku_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_product(NewProductCmd::new("Bulloni M6", ""))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("sku must not be empty".to_string())
    );
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6").price_minor(-1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidQuantity("price_minor must be >= 0".to_string())
    );
}

#[tokio::test]
async fn negative_starting_quantity_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6").quantity(-5))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidQuantity("quantity must be >= 0".to_string())
    );
}

#[tokio::test]
async fn duplicate_sku_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6"))
        .await
        .unwrap();

    let err = engine
        .new_product(NewProductCmd::new("Bulloni M6 zincati", "BLT-M6"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingSku("BLT-M6".to_string()));
}

#[tokio::test]
async fn list_products_sorts_by_name() {
    let (engine, _db) = engine_with_db().await;

    engine
        .new_product(NewProductCmd::new("Viti 4x40", "VT-440"))
        .await
        .unwrap();
    engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6"))
        .await
        .unwrap();
    engine
        .new_product(NewProductCmd::new("Guanti nitrile", "GL-NTR"))
        .await
        .unwrap();

    let names: Vec<String> = engine
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Bulloni M6", "Guanti nitrile", "Viti 4x40"]);
}

#[tokio::test]
async fn delete_product_removes_it() {
    let (engine, _db) = engine_with_db().await;

    let product = engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6"))
        .await
        .unwrap();

    engine.delete_product(product.id).await.unwrap();

    let err = engine.product(product.id).await.unwrap_err();
    assert_eq!(err, EngineError::ProductNotFound(product.id.to_string()));
}

#[tokio::test]
async fn delete_product_with_movements_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let product = engine
        .new_product(NewProductCmd::new("Bulloni M6", "BLT-M6"))
        .await
        .unwrap();
    let movement = engine
        .create_movement(CreateMovementCmd::new(
            MovementKind::Input,
            product.id,
            10,
            "magazzino",
        ))
        .await
        .unwrap();

    let err = engine.delete_product(product.id).await.unwrap_err();
    assert_eq!(err, EngineError::ProductInUse("Bulloni M6".to_string()));

    // Once the ledger is empty again the product can go.
    engine.delete_movement(movement.id).await.unwrap();
    engine.delete_product(product.id).await.unwrap();
}

#[tokio::test]
async fn missing_product_lookups_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let missing = Uuid::new_v4();

    let err = engine.product(missing).await.unwrap_err();
    assert_eq!(err, EngineError::ProductNotFound(missing.to_string()));

    let err = engine.product_by_sku("NOPE").await.unwrap_err();
    assert_eq!(err, EngineError::ProductNotFound("NOPE".to_string()));
}
