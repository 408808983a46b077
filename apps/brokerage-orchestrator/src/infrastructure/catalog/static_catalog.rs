//! Built-in instrument catalog.

use std::collections::HashMap;

use crate::application::ports::InstrumentCatalogPort;
use crate::domain::shared::Symbol;

/// Widely held US listings.
const BUILT_IN: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("ABNB", "Airbnb, Inc."),
    ("AMD", "Advanced Micro Devices, Inc."),
    ("AMZN", "Amazon.com, Inc."),
    ("BA", "The Boeing Company"),
    ("BAC", "Bank of America Corporation"),
    ("BRK.B", "Berkshire Hathaway Inc. Class B"),
    ("COST", "Costco Wholesale Corporation"),
    ("CSCO", "Cisco Systems, Inc."),
    ("DIS", "The Walt Disney Company"),
    ("GOOG", "Alphabet Inc. Class C"),
    ("GOOGL", "Alphabet Inc. Class A"),
    ("IBM", "International Business Machines Corporation"),
    ("INTC", "Intel Corporation"),
    ("JNJ", "Johnson & Johnson"),
    ("JPM", "JPMorgan Chase & Co."),
    ("KO", "The Coca-Cola Company"),
    ("META", "Meta Platforms, Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("NFLX", "Netflix, Inc."),
    ("NKE", "NIKE, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("ORCL", "Oracle Corporation"),
    ("PEP", "PepsiCo, Inc."),
    ("PFE", "Pfizer Inc."),
    ("PYPL", "PayPal Holdings, Inc."),
    ("QQQ", "Invesco QQQ Trust"),
    ("SBUX", "Starbucks Corporation"),
    ("SPY", "SPDR S&P 500 ETF Trust"),
    ("T", "AT&T Inc."),
    ("TSLA", "Tesla, Inc."),
    ("UBER", "Uber Technologies, Inc."),
    ("V", "Visa Inc."),
    ("VOO", "Vanguard S&P 500 ETF"),
    ("WMT", "Walmart Inc."),
    ("XOM", "Exxon Mobil Corporation"),
];

/// Symbol to display-name lookup held in memory.
#[derive(Debug, Clone)]
pub struct StaticInstrumentCatalog {
    names: HashMap<Symbol, String>,
}

impl StaticInstrumentCatalog {
    /// Catalog of common US equities and ETFs.
    #[must_use]
    pub fn built_in() -> Self {
        Self::from_entries(BUILT_IN.iter().copied())
    }

    /// Catalog from `(symbol, name)` pairs. Later entries win.
    pub fn from_entries<I, S, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: AsRef<str>,
        N: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(symbol, name)| (Symbol::new(symbol), name.into()))
            .filter(|(symbol, _)| !symbol.as_str().is_empty())
            .collect();
        Self { names }
    }

    /// Number of known instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StaticInstrumentCatalog {
    fn default() -> Self {
        Self::built_in()
    }
}

impl InstrumentCatalogPort for StaticInstrumentCatalog {
    fn name_for(&self, symbol: &Symbol) -> Option<String> {
        self.names.get(symbol).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("AAPL", Some("Apple Inc.") ; "known")]
    #[test_case("brk.b", Some("Berkshire Hathaway Inc. Class B") ; "lowercase input")]
    #[test_case("ZZZZ", None ; "unknown")]
    fn built_in_lookup(raw: &str, expected: Option<&str>) {
        let catalog = StaticInstrumentCatalog::built_in();

        assert_eq!(catalog.name_for(&Symbol::new(raw)).as_deref(), expected);
    }

    #[test]
    fn from_entries_normalizes_and_skips_blank() {
        let catalog = StaticInstrumentCatalog::from_entries([
            (" acme ", "Acme Corp"),
            ("", "Nothing"),
            ("ACME", "Acme Corporation"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.name_for(&Symbol::new("ACME")).as_deref(),
            Some("Acme Corporation")
        );
    }

    #[test]
    fn default_is_built_in() {
        assert!(!StaticInstrumentCatalog::default().is_empty());
    }
}
