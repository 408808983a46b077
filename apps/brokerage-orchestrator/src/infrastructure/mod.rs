//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `broker/`: HTTP gateway to the brokerage and market-data APIs
//!   - `persistence/`: Profile store
//!   - `catalog/`: Instrument display names
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod broker;
pub mod catalog;
pub mod config;
pub mod persistence;
