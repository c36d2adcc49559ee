pub use commands::{CreateMovementCmd, NewProductCmd, UpdateMovementCmd};
pub use error::EngineError;
pub use movements::{Movement, MovementKind};
pub use ops::{DEFAULT_PAGE_SIZE, Engine, EngineBuilder, MovementListFilter, MovementPage};
pub use products::Product;

mod commands;
mod error;
mod movements;
mod ops;
mod products;

type ResultEngine<T> = Result<T, EngineError>;
