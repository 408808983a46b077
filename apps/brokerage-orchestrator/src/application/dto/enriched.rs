//! Partial-success results for enrichment.

use serde::{Deserialize, Serialize};

/// Enrichment stage that can fail without failing the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStage {
    /// Ticker snapshot lookup.
    Tickers,
    /// Default-watchlist membership lookup.
    WatchlistMembership,
}

/// One failed enrichment stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    /// Which stage failed.
    pub stage: EnrichmentStage,
    /// Failure details.
    pub message: String,
}

/// Enrichment warnings attached to an otherwise successful result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentError {
    /// Failed stages, in the order they ran.
    pub failures: Vec<EnrichmentFailure>,
}

impl std::fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|failure| format!("{:?}: {}", failure.stage, failure.message))
            .collect();
        write!(f, "enrichment incomplete ({})", parts.join("; "))
    }
}

/// Primary result plus an optional enrichment warning.
///
/// The primary data is always authoritative. When `enrichment_error` is set,
/// some enrichment fields (tickers, `is_watchlisted`) were left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enriched<T> {
    /// The upstream data, enriched as far as possible.
    pub primary: T,
    /// Set when one or more enrichment stages failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_error: Option<EnrichmentError>,
}

impl<T> Enriched<T> {
    /// Fully enriched result.
    pub const fn complete(primary: T) -> Self {
        Self {
            primary,
            enrichment_error: None,
        }
    }

    /// Record a failed stage.
    #[must_use]
    pub fn with_failure(mut self, stage: EnrichmentStage, message: impl Into<String>) -> Self {
        self.enrichment_error
            .get_or_insert_with(EnrichmentError::default)
            .failures
            .push(EnrichmentFailure {
                stage,
                message: message.into(),
            });
        self
    }

    /// Whether every enrichment stage succeeded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.enrichment_error.is_none()
    }

    /// Map the primary value, keeping the warning.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Enriched<U> {
        Enriched {
            primary: f(self.primary),
            enrichment_error: self.enrichment_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_accumulate() {
        let result = Enriched::complete(vec![1, 2])
            .with_failure(EnrichmentStage::Tickers, "timeout")
            .with_failure(EnrichmentStage::WatchlistMembership, "404");

        assert!(!result.is_complete());
        let err = result.enrichment_error.unwrap();
        assert_eq!(err.failures.len(), 2);
        assert!(err.to_string().contains("Tickers: timeout"));
    }

    #[test]
    fn complete_result_serializes_without_warning() {
        let value = serde_json::to_value(Enriched::complete("x")).unwrap();
        assert_eq!(value, serde_json::json!({"primary": "x"}));
    }
}
