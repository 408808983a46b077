//! Brokerage account application built from a local profile.
//!
//! The payload is derived strictly from existing profile fields plus three
//! fixed agreement records. Country fields are fixed to the only supported
//! jurisdiction and every disclosure is answered "no".

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::profile::{ProfilePatch, UserProfile};
use crate::domain::shared::AccountId;

/// Field whose presence marks a successful account-creation response.
pub const ACCOUNT_NUMBER_MARKER: &str = "account_number";

/// Country code used for contact, citizenship, birth and tax residence.
pub const SUPPORTED_COUNTRY: &str = "USA";

/// Originating address recorded on agreements.
pub const AGREEMENT_ORIGIN_IP: &str = "127.0.0.1";

/// Agreements signed at onboarding, in submission order.
pub const AGREEMENTS: [&str; 3] = ["margin_agreement", "account_agreement", "customer_agreement"];

/// Contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Email address.
    pub email_address: String,
    /// Phone number.
    pub phone_number: String,
    /// Street address lines.
    pub street_address: Vec<String>,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Country.
    pub country: String,
}

/// Identity block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Tax identifier.
    pub tax_id: String,
    /// Tax identifier type.
    pub tax_id_type: String,
    /// Country of citizenship.
    pub country_of_citizenship: String,
    /// Country of birth.
    pub country_of_birth: String,
    /// Country of tax residence.
    pub country_of_tax_residence: String,
    /// Funding sources.
    pub funding_source: Vec<String>,
}

/// Regulatory disclosures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Disclosures {
    /// Control person of a public company.
    pub is_control_person: bool,
    /// Affiliated with an exchange or FINRA.
    pub is_affiliated_exchange_or_finra: bool,
    /// Politically exposed person.
    pub is_politically_exposed: bool,
    /// Immediate family member is politically exposed.
    pub immediate_family_exposed: bool,
}

/// Signed agreement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Agreement kind.
    pub agreement: String,
    /// RFC 3339 signing time.
    pub signed_at: String,
    /// Originating address.
    pub ip_address: String,
}

/// Payload for `POST /v1/accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountApplication {
    /// Contact block.
    pub contact: Contact,
    /// Identity block.
    pub identity: Identity,
    /// Disclosures block.
    pub disclosures: Disclosures,
    /// Agreements block.
    pub agreements: Vec<Agreement>,
}

impl AccountApplication {
    /// Build the application from a profile, stamping agreements with `signed_at`.
    #[must_use]
    pub fn from_profile(profile: &UserProfile, signed_at: DateTime<Utc>) -> Self {
        let signed_at = signed_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        Self {
            contact: Contact {
                email_address: profile.email.clone(),
                phone_number: profile.mobile.clone(),
                street_address: vec![profile.address.clone()],
                city: profile.city.clone(),
                state: profile.state.clone(),
                country: SUPPORTED_COUNTRY.to_string(),
            },
            identity: Identity {
                given_name: profile.first_name.clone(),
                family_name: profile.last_name.clone(),
                date_of_birth: profile.date_of_birth.clone(),
                tax_id: profile.tax_id.clone(),
                tax_id_type: profile.tax_id_type.clone(),
                country_of_citizenship: SUPPORTED_COUNTRY.to_string(),
                country_of_birth: SUPPORTED_COUNTRY.to_string(),
                country_of_tax_residence: SUPPORTED_COUNTRY.to_string(),
                funding_source: split_funding_sources(&profile.funding_source),
            },
            disclosures: Disclosures::default(),
            agreements: AGREEMENTS
                .iter()
                .map(|kind| Agreement {
                    agreement: (*kind).to_string(),
                    signed_at: signed_at.clone(),
                    ip_address: AGREEMENT_ORIGIN_IP.to_string(),
                })
                .collect(),
        }
    }
}

/// Split the comma-separated funding source list, dropping blank entries.
#[must_use]
pub fn split_funding_sources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Identifiers returned by a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReceipt {
    /// Upstream account identifier.
    pub id: AccountId,
    /// Account number.
    pub account_number: String,
    /// Account currency.
    #[serde(default)]
    pub currency: String,
    /// Account status.
    #[serde(default)]
    pub status: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Equity at last close.
    #[serde(default)]
    pub last_equity: Option<String>,
}

impl AccountReceipt {
    /// Patch reconciling the four upstream identifiers into the profile.
    #[must_use]
    pub fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            account_id: Some(self.id.clone()),
            account_number: Some(self.account_number.clone()),
            account_currency: Some(self.currency.clone()),
            account_status: Some(self.status.clone()),
            ..ProfilePatch::default()
        }
    }
}

/// Whether a raw creation response carries the success marker.
#[must_use]
pub fn is_account_created(body: &[u8]) -> bool {
    let marker = ACCOUNT_NUMBER_MARKER.as_bytes();
    body.windows(marker.len()).any(|w| w == marker)
}
