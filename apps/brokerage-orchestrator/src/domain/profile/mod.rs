//! Local user record and narrow partial updates.
//!
//! The orchestrator never overwrites a whole profile. Every write goes
//! through a [`ProfilePatch`] naming only the fields it changes, so
//! concurrent unrelated edits are not clobbered.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{AccountId, UserId, WatchlistId};

/// Local user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Local user identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Mobile phone number.
    pub mobile: String,
    /// Street address (single line).
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Tax identifier.
    pub tax_id: String,
    /// Tax identifier type (USA_SSN, ...).
    pub tax_id_type: String,
    /// Comma-separated funding sources (employment_income, savings, ...).
    pub funding_source: String,
    /// Upstream brokerage account, `None` until onboarded.
    pub account_id: Option<AccountId>,
    /// Default watchlist, `None` until the first one is created.
    pub watchlist_id: Option<WatchlistId>,
    /// Upstream account number.
    pub account_number: Option<String>,
    /// Upstream account currency.
    pub account_currency: Option<String>,
    /// Upstream account status.
    pub account_status: Option<String>,
}

impl UserProfile {
    /// Upstream account, when the profile has been onboarded.
    #[must_use]
    pub const fn account(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// Default watchlist, when one has been created.
    #[must_use]
    pub const fn default_watchlist(&self) -> Option<&WatchlistId> {
        self.watchlist_id.as_ref()
    }
}

/// Partial update of a [`UserProfile`].
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    /// New upstream account identifier.
    pub account_id: Option<AccountId>,
    /// New default watchlist identifier.
    pub watchlist_id: Option<WatchlistId>,
    /// New account number.
    pub account_number: Option<String>,
    /// New account currency.
    pub account_currency: Option<String>,
    /// New account status.
    pub account_status: Option<String>,
}

impl ProfilePatch {
    /// Patch that only sets the default watchlist.
    #[must_use]
    pub fn default_watchlist(watchlist_id: WatchlistId) -> Self {
        Self {
            watchlist_id: Some(watchlist_id),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.watchlist_id.is_none()
            && self.account_number.is_none()
            && self.account_currency.is_none()
            && self.account_status.is_none()
    }

    /// Apply the set fields to `profile`.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(account_id) = &self.account_id {
            profile.account_id = Some(account_id.clone());
        }
        if let Some(watchlist_id) = &self.watchlist_id {
            profile.watchlist_id = Some(watchlist_id.clone());
        }
        if let Some(number) = &self.account_number {
            profile.account_number = Some(number.clone());
        }
        if let Some(currency) = &self.account_currency {
            profile.account_currency = Some(currency.clone());
        }
        if let Some(status) = &self.account_status {
            profile.account_status = Some(status.clone());
        }
    }
}
