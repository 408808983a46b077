//! Instrument Catalog Adapters
//!
//! Static reference data behind `InstrumentCatalogPort`.

mod static_catalog;

pub use static_catalog::StaticInstrumentCatalog;
