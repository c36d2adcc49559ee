//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientStock`] thrown when an output would take a [`Product`]
//!   below zero on-hand quantity.
//! - [`NegativeStockViolation`] thrown when reverting a movement would leave
//!   a negative balance behind.
//! - [`ProductNotFound`]/[`MovementNotFound`] thrown when an item is not
//!   found.
//!
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`NegativeStockViolation`]: EngineError::NegativeStockViolation
//!  [`ProductNotFound`]: EngineError::ProductNotFound
//!  [`MovementNotFound`]: EngineError::MovementNotFound
//!  [`Product`]: super::products::Product
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("movement not found: {0}")]
    MovementNotFound(String),
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },
    #[error("stock cannot go negative: resulting quantity {resulting}")]
    NegativeStockViolation { resulting: i64 },
    #[error("sku \"{0}\" already present!")]
    ExistingSku(String),
    #[error("product \"{0}\" still has movements")]
    ProductInUse(String),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("invalid movement kind: {0}")]
    InvalidKind(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ProductNotFound(a), Self::ProductNotFound(b)) => a == b,
            (Self::MovementNotFound(a), Self::MovementNotFound(b)) => a == b,
            (
                Self::InsufficientStock {
                    available: a,
                    requested: b,
                },
                Self::InsufficientStock {
                    available: c,
                    requested: d,
                },
            ) => a == c && b == d,
            (
                Self::NegativeStockViolation { resulting: a },
                Self::NegativeStockViolation { resulting: b },
            ) => a == b,
            (Self::ExistingSku(a), Self::ExistingSku(b)) => a == b,
            (Self::ProductInUse(a), Self::ProductInUse(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
