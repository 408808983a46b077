//! Shared Value Objects
//!
//! Immutable domain types used across modules.
//! Value objects are compared by value, not identity.

mod identifiers;
mod symbol;

pub use identifiers::{AccountId, UserId, WatchlistId};
pub use symbol::Symbol;
