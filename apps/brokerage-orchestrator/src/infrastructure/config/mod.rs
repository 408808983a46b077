//! Wiring
//!
//! Dependency injection container for the use cases.

pub mod container;

pub use container::{Container, UseCaseSettings};
