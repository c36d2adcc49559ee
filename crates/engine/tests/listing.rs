use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CreateMovementCmd, DEFAULT_PAGE_SIZE, Engine, EngineError, Movement, MovementKind,
    MovementListFilter, NewProductCmd, Product,
};
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

async fn seed_product(engine: &Engine, name: &str, sku: &str, quantity: i64) -> Product {
    engine
        .new_product(NewProductCmd::new(name, sku).quantity(quantity))
        .await
        .unwrap()
}

async fn record(
    engine: &Engine,
    kind: MovementKind,
    product_id: Uuid,
    quantity: i64,
    user: &str,
    at: DateTime<Utc>,
) -> Movement {
    engine
        .create_movement(CreateMovementCmd::new(kind, product_id, quantity, user).occurred_at(at))
        .await
        .unwrap()
}

#[tokio::test]
async fn pagination_splits_pages() {
    let (engine, _db) = engine_with_db().await;
    let product = seed_product(&engine, "Guanti nitrile", "GL-NTR", 0).await;

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    for i in 0..25 {
        record(
            &engine,
            MovementKind::Input,
            product.id,
            1,
            "magazzino",
            base + Duration::minutes(i),
        )
        .await;
    }

    let page = engine
        .list_movements(&MovementListFilter::default(), 1, DEFAULT_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 1);

    let page = engine
        .list_movements(&MovementListFilter::default(), 3, DEFAULT_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.current_page, 3);

    // Past the end: no items, totals still describe the ledger.
    let page = engine
        .list_movements(&MovementListFilter::default(), 4, DEFAULT_PAGE_SIZE)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 4);
}

#[tokio::test]
async fn pages_are_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let product = seed_product(&engine, "Guanti nitrile", "GL-NTR", 0).await;

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let oldest = record(
        &engine,
        MovementKind::Input,
        product.id,
        1,
        "magazzino",
        base,
    )
    .await;
    let middle = record(
        &engine,
        MovementKind::Input,
        product.id,
        2,
        "magazzino",
        base + Duration::hours(1),
    )
    .await;
    let newest = record(
        &engine,
        MovementKind::Input,
        product.id,
        3,
        "magazzino",
        base + Duration::hours(2),
    )
    .await;

    let page = engine
        .list_movements(&MovementListFilter::default(), 1, 10)
        .await
        .unwrap();
    let ids: Vec<Uuid> = page.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
}

#[tokio::test]
async fn same_timestamp_breaks_ties_by_id() {
    let (engine, _db) = engine_with_db().await;
    let product = seed_product(&engine, "Guanti nitrile", "GL-NTR", 0).await;

    let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    record(&engine, MovementKind::Input, product.id, 1, "magazzino", at).await;
    record(&engine, MovementKind::Input, product.id, 2, "magazzino", at).await;

    let page = engine
        .list_movements(&MovementListFilter::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].id.to_string() > page.items[1].id.to_string());
}

#[tokio::test]
async fn filters_combine_as_conjunction() {
    let (engine, _db) = engine_with_db().await;
    let bolts = seed_product(&engine, "Bulloni M6", "BLT-M6", 100).await;
    let gloves = seed_product(&engine, "Guanti nitrile", "GL-NTR", 100).await;

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    record(&engine, MovementKind::Input, bolts.id, 5, "alice", base).await;
    let first = record(
        &engine,
        MovementKind::Output,
        bolts.id,
        1,
        "bob",
        base + Duration::minutes(1),
    )
    .await;
    let second = record(
        &engine,
        MovementKind::Output,
        bolts.id,
        2,
        "bob",
        base + Duration::minutes(2),
    )
    .await;
    record(
        &engine,
        MovementKind::Output,
        gloves.id,
        3,
        "bob",
        base + Duration::minutes(3),
    )
    .await;
    record(
        &engine,
        MovementKind::Output,
        bolts.id,
        1,
        "alice",
        base + Duration::minutes(4),
    )
    .await;

    let filter = MovementListFilter {
        kind: Some(MovementKind::Output),
        product_id: Some(bolts.id),
        performed_by: Some("bob".to_string()),
        ..Default::default()
    };
    let page = engine.list_movements(&filter, 1, 10).await.unwrap();

    let ids: Vec<Uuid> = page.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let (engine, _db) = engine_with_db().await;
    let product = seed_product(&engine, "Guanti nitrile", "GL-NTR", 0).await;

    let ten = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
    let eleven = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap();
    let twelve = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    record(&engine, MovementKind::Input, product.id, 1, "magazzino", ten).await;
    record(
        &engine,
        MovementKind::Input,
        product.id,
        2,
        "magazzino",
        eleven,
    )
    .await;
    record(
        &engine,
        MovementKind::Input,
        product.id,
        3,
        "magazzino",
        twelve,
    )
    .await;

    let filter = MovementListFilter {
        from: Some(ten),
        to: Some(eleven),
        ..Default::default()
    };
    let page = engine.list_movements(&filter, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items[0].quantity, 2);
    assert_eq!(page.items[1].quantity, 1);

    // A range collapsed to a single instant still matches it.
    let filter = MovementListFilter {
        from: Some(eleven),
        to: Some(eleven),
        ..Default::default()
    };
    let page = engine.list_movements(&filter, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].quantity, 2);
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let filter = MovementListFilter {
        from: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
        to: Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()),
        ..Default::default()
    };
    let err = engine.list_movements(&filter, 1, 10).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidFilter("invalid range: from must be <= to".to_string())
    );
}

#[tokio::test]
async fn zero_page_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .list_movements(&MovementListFilter::default(), 0, 10)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidFilter("page must be >= 1".to_string())
    );
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .list_movements(&MovementListFilter::default(), 1, 0)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidFilter("limit must be >= 1".to_string())
    );
}

#[tokio::test]
async fn history_returns_full_ledger_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let bolts = seed_product(&engine, "Bulloni M6", "BLT-M6", 100).await;
    let gloves = seed_product(&engine, "Guanti nitrile", "GL-NTR", 100).await;

    let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let first = record(&engine, MovementKind::Input, bolts.id, 5, "alice", base).await;
    let second = record(
        &engine,
        MovementKind::Output,
        gloves.id,
        3,
        "bob",
        base + Duration::hours(1),
    )
    .await;
    let third = record(
        &engine,
        MovementKind::Output,
        bolts.id,
        2,
        "alice",
        base + Duration::hours(2),
    )
    .await;

    let history = engine.movement_history().await.unwrap();
    let ids: Vec<Uuid> = history.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}
