//! Instrument Catalog Port (Driven Port)
//!
//! Static reference data: display names for listed instruments.

use crate::domain::shared::Symbol;

/// Port for looking up instrument names by symbol.
pub trait InstrumentCatalogPort: Send + Sync {
    /// Display name for `symbol`, if the catalog knows it.
    fn name_for(&self, symbol: &Symbol) -> Option<String>;
}
