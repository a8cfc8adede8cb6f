//! Conversions from wire types to profile domain types.

use super::wire::{AddressResponse, KycRefResponse, ProfileResponse, WalletResponse};
use super::{Address, KycSummary, Profile, WalletAccount};

impl From<ProfileResponse> for Profile {
    fn from(p: ProfileResponse) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name.unwrap_or_default(),
            last_name: p.last_name.unwrap_or_default(),
            email: p.email.unwrap_or_default(),
            mobile_no: p.mobile_no.unwrap_or_default(),
            date_of_birth: p.date_of_birth.map(|dt| dt.date_naive()),
            gender: p.gender.unwrap_or_default(),
            created_at: p.created_at,
            address: p.address.into_iter().map(Address::from).collect(),
            wallet: p.wallet.into_iter().map(WalletAccount::from).collect(),
            kyc: p.kyc.into_iter().map(KycSummary::from).collect(),
        }
    }
}

impl From<AddressResponse> for Address {
    fn from(a: AddressResponse) -> Self {
        Self {
            id: a.id,
            street: a.street.unwrap_or_default(),
            city: a.city.unwrap_or_default(),
            district: a.district.unwrap_or_default(),
            state: a.state.unwrap_or_default(),
            country: a.country.unwrap_or_default(),
            postal_code: a.postal_code.unwrap_or_default(),
            is_primary: a.is_primary,
            is_deleted: a.is_deleted,
        }
    }
}

impl From<WalletResponse> for WalletAccount {
    fn from(w: WalletResponse) -> Self {
        Self {
            balance: w.balance,
            credit: w.credit,
            debit: w.debit,
        }
    }
}

impl From<KycRefResponse> for KycSummary {
    fn from(k: KycRefResponse) -> Self {
        Self {
            id: k.id,
            status: k.status,
        }
    }
}
