//! The module contains the errors the engine can return.
//!
//! The settlement computation itself is total and never fails; these errors
//! come from validating input at the boundary (parsing amounts, names and
//! invite codes) and from the in-memory store.
//!
//! - [`InvalidAmount`] thrown when an amount cannot be turned into cents.
//! - [`KeyNotFound`] thrown when a stored record is not found.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid code: {0}")]
    InvalidCode(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
}
