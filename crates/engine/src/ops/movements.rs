mod list;
mod write;

pub use list::{DEFAULT_PAGE_SIZE, MovementListFilter, MovementPage};
