use std::error::Error;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{
    CreateMovementCmd, DEFAULT_PAGE_SIZE, Engine, EngineError, Movement, MovementKind,
    MovementListFilter, MovementPage, NewProductCmd, Product, UpdateMovementCmd,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "scorta")]
#[command(about = "Stock ledger for small inventories (products + movements)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    ///
    /// When omitted, falls back to the `database` key in `scorta.toml`, then
    /// to a local `scorta.db` file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Print results as JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Product(ProductArgs),
    Movement(MovementArgs),
}

#[derive(Args, Debug)]
struct ProductArgs {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    /// Add a product to the catalog.
    Add(ProductAddArgs),
    /// List the catalog, ordered by name.
    List,
    /// Show a single product.
    Show(ProductShowArgs),
    /// Remove a product that has no movements.
    Rm(ProductRmArgs),
}

#[derive(Args, Debug)]
struct ProductAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sku: String,
    #[arg(long)]
    description: Option<String>,
    /// Unit price in minor units (e.g. cents).
    #[arg(long, default_value_t = 0)]
    price_minor: i64,
    /// Opening on-hand quantity.
    #[arg(long, default_value_t = 0)]
    quantity: i64,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    vendor: Option<String>,
}

#[derive(Args, Debug)]
struct ProductShowArgs {
    /// Product id.
    #[arg(long, conflicts_with = "sku")]
    id: Option<Uuid>,
    /// Product sku, as an alternative to `--id`.
    #[arg(long)]
    sku: Option<String>,
}

#[derive(Args, Debug)]
struct ProductRmArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct MovementArgs {
    #[command(subcommand)]
    command: MovementCommand,
}

#[derive(Subcommand, Debug)]
enum MovementCommand {
    /// Record stock received (input).
    In(MovementWriteArgs),
    /// Record stock shipped (output).
    Out(MovementWriteArgs),
    /// Edit an existing movement, recomputing stock.
    Edit(MovementEditArgs),
    /// Delete a movement, reverting its effect on stock.
    Rm(MovementRmArgs),
    /// List movements with filters and pagination.
    List(MovementListArgs),
    /// Print the whole ledger, newest first.
    History,
}

#[derive(Args, Debug)]
struct MovementWriteArgs {
    #[arg(long)]
    product: Uuid,
    #[arg(long)]
    quantity: i64,
    /// Who performed the movement.
    #[arg(long)]
    user: String,
    #[arg(long)]
    note: Option<String>,
    /// RFC 3339 timestamp; defaults to now.
    #[arg(long)]
    occurred_at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct MovementEditArgs {
    #[arg(long)]
    id: Uuid,
    /// New kind (`input` or `output`).
    #[arg(long, value_parser = parse_kind)]
    kind: Option<MovementKind>,
    /// Retarget the movement to another product.
    #[arg(long)]
    product: Option<Uuid>,
    #[arg(long)]
    quantity: Option<i64>,
    /// New note; pass an empty string to clear it.
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    occurred_at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct MovementRmArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct MovementListArgs {
    /// Only movements of this kind (`input` or `output`).
    #[arg(long, value_parser = parse_kind)]
    kind: Option<MovementKind>,
    /// Only movements against this product.
    #[arg(long)]
    product: Option<Uuid>,
    /// Only movements recorded by this user.
    #[arg(long)]
    user: Option<String>,
    /// Inclusive lower bound on `occurred_at` (RFC 3339).
    #[arg(long)]
    from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurred_at` (RFC 3339).
    #[arg(long)]
    to: Option<DateTime<Utc>>,
    /// 1-based page to return.
    #[arg(long, default_value_t = 1)]
    page: u64,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u64,
}

fn parse_kind(raw: &str) -> Result<MovementKind, String> {
    MovementKind::try_from(raw).map_err(|err| err.to_string())
}

fn ok_or_exit<T>(result: Result<T, EngineError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_product_line(product: &Product) {
    println!(
        "{}  [{}]  {}  qty {}",
        product.id, product.sku, product.name, product.quantity
    );
}

fn print_product(product: &Product) {
    println!("id:          {}", product.id);
    println!("name:        {}", product.name);
    println!("sku:         {}", product.sku);
    println!("price_minor: {}", product.price_minor);
    println!("quantity:    {}", product.quantity);
    if let Some(description) = &product.description {
        println!("description: {description}");
    }
    if let Some(category) = &product.category {
        println!("category:    {category}");
    }
    if let Some(vendor) = &product.vendor {
        println!("vendor:      {vendor}");
    }
}

fn print_movement_line(movement: &Movement) {
    let note = movement.note.as_deref().unwrap_or("-");
    println!(
        "{}  {}  {:>6}  {:>5}  product {}  by {}  {}",
        movement.id,
        movement.occurred_at.to_rfc3339(),
        movement.kind.as_str(),
        movement.quantity,
        movement.product_id,
        movement.performed_by,
        note
    );
}

fn print_movement_page(page: &MovementPage) {
    println!(
        "page {}/{} ({} movements)",
        page.current_page, page.total_pages, page.total_count
    );
    for movement in &page.items {
        print_movement_line(movement);
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "scorta={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let database_url = cli
        .database_url
        .clone()
        .or_else(|| settings.database_url())
        .unwrap_or_else(|| "sqlite:./scorta.db?mode=rwc".to_string());

    let db = connect_db(&database_url).await?;
    tracing::info!("connected to {database_url}");

    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Product(ProductArgs { command }) => match command {
            ProductCommand::Add(args) => {
                let mut cmd = NewProductCmd::new(args.name, args.sku)
                    .price_minor(args.price_minor)
                    .quantity(args.quantity);
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                if let Some(category) = args.category {
                    cmd = cmd.category(category);
                }
                if let Some(vendor) = args.vendor {
                    cmd = cmd.vendor(vendor);
                }

                let product = ok_or_exit(engine.new_product(cmd).await);
                if cli.json {
                    print_json(&product)?;
                } else {
                    println!("created product: {} ({})", product.name, product.id);
                }
            }
            ProductCommand::List => {
                let products = ok_or_exit(engine.list_products().await);
                if cli.json {
                    print_json(&products)?;
                } else {
                    for product in &products {
                        print_product_line(product);
                    }
                }
            }
            ProductCommand::Show(args) => {
                let product = match (args.id, args.sku) {
                    (Some(id), None) => ok_or_exit(engine.product(id).await),
                    (None, Some(sku)) => ok_or_exit(engine.product_by_sku(&sku).await),
                    _ => {
                        eprintln!("pass exactly one of --id or --sku");
                        std::process::exit(2);
                    }
                };
                if cli.json {
                    print_json(&product)?;
                } else {
                    print_product(&product);
                }
            }
            ProductCommand::Rm(args) => {
                ok_or_exit(engine.delete_product(args.id).await);
                println!("deleted product: {}", args.id);
            }
        },
        Command::Movement(MovementArgs { command }) => match command {
            MovementCommand::In(args) => {
                record_movement(&engine, MovementKind::Input, args, cli.json).await?;
            }
            MovementCommand::Out(args) => {
                record_movement(&engine, MovementKind::Output, args, cli.json).await?;
            }
            MovementCommand::Edit(args) => {
                let mut cmd = UpdateMovementCmd::new(args.id);
                if let Some(kind) = args.kind {
                    cmd = cmd.kind(kind);
                }
                if let Some(product) = args.product {
                    cmd = cmd.product_id(product);
                }
                if let Some(quantity) = args.quantity {
                    cmd = cmd.quantity(quantity);
                }
                if let Some(note) = args.note {
                    cmd = cmd.note(note);
                }
                if let Some(occurred_at) = args.occurred_at {
                    cmd = cmd.occurred_at(occurred_at);
                }

                let movement = ok_or_exit(engine.update_movement(cmd).await);
                if cli.json {
                    print_json(&movement)?;
                } else {
                    println!("updated movement: {}", movement.id);
                }
            }
            MovementCommand::Rm(args) => {
                ok_or_exit(engine.delete_movement(args.id).await);
                println!("deleted movement: {}", args.id);
            }
            MovementCommand::List(args) => {
                let filter = MovementListFilter {
                    from: args.from,
                    to: args.to,
                    kind: args.kind,
                    product_id: args.product,
                    performed_by: args.user,
                };

                let page = ok_or_exit(engine.list_movements(&filter, args.page, args.limit).await);
                if cli.json {
                    print_json(&page)?;
                } else {
                    print_movement_page(&page);
                }
            }
            MovementCommand::History => {
                let movements = ok_or_exit(engine.movement_history().await);
                if cli.json {
                    print_json(&movements)?;
                } else {
                    for movement in &movements {
                        print_movement_line(movement);
                    }
                }
            }
        },
    }

    Ok(())
}

async fn record_movement(
    engine: &Engine,
    kind: MovementKind,
    args: MovementWriteArgs,
    json: bool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cmd = CreateMovementCmd::new(kind, args.product, args.quantity, args.user);
    if let Some(note) = args.note {
        cmd = cmd.note(note);
    }
    if let Some(occurred_at) = args.occurred_at {
        cmd = cmd.occurred_at(occurred_at);
    }

    let movement = ok_or_exit(engine.create_movement(cmd).await);
    if json {
        print_json(&movement)?;
    } else {
        println!(
            "recorded {} movement: {} ({} x product {})",
            movement.kind.as_str(),
            movement.id,
            movement.quantity,
            movement.product_id
        );
    }
    Ok(())
}
