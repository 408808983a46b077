//! Application Layer
//!
//! The application layer orchestrates upstream calls through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the upstream APIs, profile store and catalog
//! - **Use Cases**: Guarded order placement, watchlist sync, onboarding
//! - **DTOs**: Enriched results, pass-through replies, query parameters
//! - **Routes**: Every upstream path the use cases call

pub mod dto;
pub mod error;
pub mod ports;
pub mod routes;
pub mod use_cases;

pub use dto::*;
pub use error::{GuardBlockReason, OrchestrationError};
pub use ports::*;
pub use use_cases::*;
