//! Shared Domain Types
//!
//! Value objects and errors shared across modules.

pub mod errors;
pub(crate) mod serde_helpers;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{AccountId, Symbol, UserId, WatchlistId};
