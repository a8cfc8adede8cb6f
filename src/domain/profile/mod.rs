//! Profile domain — the signed-in user's profile, addresses and embedded
//! wallet/KYC summaries.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod forms;
pub mod state;
pub mod wire;

use crate::shared::RecordId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use forms::{AddressForm, ProfileForm};
pub use state::{FetchOutcome, ProfilePatch, ProfileStore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub created_at: Option<DateTime<Utc>>,
    pub address: Vec<Address>,
    pub wallet: Vec<WalletAccount>,
    pub kyc: Vec<KycSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub id: RecordId,
    pub street: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_primary: bool,
    pub is_deleted: bool,
}

/// Wallet summary embedded in the profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletAccount {
    pub balance: Decimal,
    pub credit: Decimal,
    pub debit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycSummary {
    pub id: Option<RecordId>,
    pub status: Option<String>,
}

/// One weighted item of the profile completion meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionItem {
    pub name: &'static str,
    pub description: &'static str,
    pub weight: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
    pub items: [CompletionItem; 3],
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Balance of the first wallet, zero when there is none.
    pub fn wallet_balance(&self) -> Decimal {
        self.wallet
            .first()
            .map(|w| w.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// First non-deleted address, else the first address.
    pub fn primary_address(&self) -> Option<&Address> {
        self.address
            .iter()
            .find(|a| !a.is_deleted)
            .or_else(|| self.address.first())
    }

    fn has_personal_details(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.mobile_no,
            &self.gender,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
            && self.date_of_birth.is_some()
    }

    /// Six personal fields set and at least one address. KYC is not required.
    pub fn is_complete(&self) -> bool {
        self.has_personal_details() && !self.address.is_empty()
    }

    pub fn has_kyc(&self) -> bool {
        !self.kyc.is_empty()
    }

    /// Weighted completion: personal details 40, address 30, KYC 30.
    pub fn completion(&self) -> Completion {
        let items = [
            CompletionItem {
                name: "Personal Information",
                description: "Complete your basic profile details",
                weight: 40,
                completed: self.has_personal_details(),
            },
            CompletionItem {
                name: "Address Information",
                description: "Add your address for better service",
                weight: 30,
                completed: !self.address.is_empty(),
            },
            CompletionItem {
                name: "KYC Verification",
                description: "Complete KYC verification for account security",
                weight: 30,
                completed: self.has_kyc(),
            },
        ];
        let total: u32 = items.iter().map(|i| i.weight).sum();
        let done: u32 = items.iter().filter(|i| i.completed).map(|i| i.weight).sum();
        let percentage = if total == 0 {
            0
        } else {
            (done * 100 + total / 2) / total
        };
        Completion { percentage, items }
    }

    /// Whole days since the account was created.
    pub fn membership_days(&self, now: DateTime<Utc>) -> i64 {
        self.created_at
            .map(|c| (now - c).num_days().max(0))
            .unwrap_or(0)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_primary_address_skips_deleted() {
        let mut p = profile();
        p.address = vec![address("old", true), address("new", false)];
        assert_eq!(p.primary_address().unwrap().id.as_str(), "new");
        p.address = vec![address("only", true)];
        assert_eq!(p.primary_address().unwrap().id.as_str(), "only");
        p.address.clear();
        assert!(p.primary_address().is_none());
    }

    #[test]
    fn test_complete_requires_scalars_and_address() {
        let mut p = profile();
        assert!(p.is_complete());
        p.gender = "  ".into();
        assert!(!p.is_complete());
        let mut p = profile();
        p.address.clear();
        assert!(!p.is_complete());
    }

    #[test]
    fn test_completion_weights() {
        let mut p = profile();
        assert_eq!(p.completion().percentage, 70);
        p.kyc.push(KycSummary {
            id: None,
            status: Some("pending".into()),
        });
        assert!(p.completion().is_complete());
        p.address.clear();
        p.mobile_no.clear();
        assert_eq!(p.completion().percentage, 30);
    }

    #[test]
    fn test_wallet_balance_defaults_to_zero() {
        let mut p = profile();
        assert_eq!(p.wallet_balance(), Decimal::new(125050, 2));
        p.wallet.clear();
        assert_eq!(p.wallet_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let mut p = profile();
        p.last_name.clear();
        assert_eq!(p.full_name(), "Asha");
    }
}
