//! Trading account snapshot and the day-trade policy.
//!
//! FINRA Rule 4210 restricts margin accounts under $25,000 equity to three
//! day trades in a rolling five business day window. The upstream broker
//! tracks the counter; this module only reads it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::AccountId;

/// Default number of day trades after which order placement is blocked.
pub const DEFAULT_DAYTRADE_CEILING: u32 = 3;

/// Point-in-time view of an upstream trading account.
///
/// Fetched fresh for every guard evaluation, never cached. `daytrade_count`
/// is required: a payload without it cannot be evaluated and must not
/// default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Upstream account identifier.
    pub id: AccountId,
    /// Human-facing account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Account status (ACTIVE, SUBMITTED, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Account currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Current buying power.
    #[serde(default)]
    pub buying_power: Decimal,
    /// Current equity.
    #[serde(default)]
    pub equity: Decimal,
    /// Equity at previous close.
    #[serde(default)]
    pub last_equity: Decimal,
    /// Settled cash.
    #[serde(default)]
    pub cash: Decimal,
    /// Day trades in the rolling window, as counted upstream.
    pub daytrade_count: u32,
    /// Whether the account is flagged as a pattern day trader.
    #[serde(default)]
    pub pattern_day_trader: bool,
    /// Trading is blocked upstream.
    #[serde(default)]
    pub trading_blocked: bool,
    /// Transfers are blocked upstream.
    #[serde(default)]
    pub transfers_blocked: bool,
    /// The whole account is blocked upstream.
    #[serde(default)]
    pub account_blocked: bool,
}

/// Day-trade ceiling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaytradePolicy {
    ceiling: u32,
}

impl DaytradePolicy {
    /// Create a policy with the given ceiling.
    #[must_use]
    pub const fn new(ceiling: u32) -> Self {
        Self { ceiling }
    }

    /// The configured ceiling.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Whether another order may be placed given the snapshot.
    #[must_use]
    pub const fn allows(&self, snapshot: &AccountSnapshot) -> bool {
        snapshot.daytrade_count < self.ceiling
    }

    /// Day trades left before the ceiling is reached.
    #[must_use]
    pub const fn remaining(&self, snapshot: &AccountSnapshot) -> u32 {
        self.ceiling.saturating_sub(snapshot.daytrade_count)
    }
}

impl Default for DaytradePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DAYTRADE_CEILING)
    }
}
