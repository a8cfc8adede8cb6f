//! Profile and address edit forms.

use super::wire::{AddressRequest, UpdateProfileRequest};
use super::Profile;
use crate::error::FormErrors;
use crate::shared::validate;
use crate::shared::RecordId;
use chrono::NaiveDate;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";
pub const ADDRESS_SAVED: &str = "Address saved successfully!";
pub const ADDRESS_SAVE_FAILED: &str = "Failed to save address. Please try again.";

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    /// `YYYY-MM-DD` as typed; empty when unknown.
    pub date_of_birth: String,
    pub gender: String,
    pub errors: FormErrors,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            mobile_no: profile.mobile_no.clone(),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: profile.gender.clone(),
            errors: FormErrors::new(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<UpdateProfileRequest, FormErrors> {
        let mut errors = FormErrors::new();
        validate::require(&mut errors, "first_name", &self.first_name, "First name is required");
        validate::require(&mut errors, "last_name", &self.last_name, "Last name is required");
        validate::require_email(&mut errors, "email", &self.email);
        if !self.mobile_no.trim().is_empty() && !validate::is_phone(self.mobile_no.trim()) {
            errors.insert("mobile_no", "Please enter a valid phone number");
        }
        let dob = self.date_of_birth.trim();
        if !dob.is_empty() {
            match NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
                Ok(d) if d > today => {
                    errors.insert("date_of_birth", "Date of birth cannot be in the future")
                }
                Ok(_) => {}
                Err(_) => errors.insert("date_of_birth", "Please enter a valid date of birth"),
            }
        }
        validate::require(&mut errors, "gender", &self.gender, "Gender is required");
        errors.into_result()?;

        Ok(UpdateProfileRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile_no: self.mobile_no.trim().to_string(),
            date_of_birth: dob.to_string(),
            gender: self.gender.trim().to_string(),
        })
    }
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Address form. `id` is set when editing an existing address, which turns
/// the save into a `PATCH`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressForm {
    pub id: Option<RecordId>,
    pub street: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub errors: FormErrors,
}

impl AddressForm {
    /// Pre-populated from the primary address, or blank when there is none.
    pub fn from_profile(profile: &Profile) -> Self {
        match profile.primary_address() {
            Some(a) => Self {
                id: Some(a.id.clone()),
                street: a.street.clone(),
                city: a.city.clone(),
                district: a.district.clone(),
                state: a.state.clone(),
                country: a.country.clone(),
                postal_code: a.postal_code.clone(),
                errors: FormErrors::new(),
            },
            None => Self::default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Values are sent as entered so an unchanged form round-trips exactly.
    pub fn validate(&self) -> Result<AddressRequest, FormErrors> {
        let mut errors = FormErrors::new();
        validate::require(&mut errors, "street", &self.street, "Street address is required");
        validate::require(&mut errors, "city", &self.city, "City is required");
        validate::require(&mut errors, "state", &self.state, "State/Province is required");
        validate::require(&mut errors, "country", &self.country, "Country is required");
        validate::require(
            &mut errors,
            "postal_code",
            &self.postal_code,
            "ZIP/Postal code is required",
        );
        errors.into_result()?;

        Ok(AddressRequest {
            id: self.id.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::fixtures::profile;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_profile_form_prefills_and_validates() {
        let form = ProfileForm::from_profile(&profile());
        assert_eq!(form.date_of_birth, "1992-04-10");
        let req = form.validate(today()).unwrap();
        assert_eq!(req.first_name, "Asha");
        assert_eq!(req.date_of_birth, "1992-04-10");
    }

    #[test]
    fn test_profile_form_rejects_bad_fields() {
        let form = ProfileForm {
            first_name: "Asha".into(),
            email: "asha".into(),
            mobile_no: "abc".into(),
            date_of_birth: "2026-10-19".into(),
            ..ProfileForm::default()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.get("last_name"), Some("Last name is required"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email"));
        assert_eq!(errors.get("mobile_no"), Some("Please enter a valid phone number"));
        assert_eq!(
            errors.get("date_of_birth"),
            Some("Date of birth cannot be in the future")
        );
        assert_eq!(errors.get("gender"), Some("Gender is required"));
    }

    #[test]
    fn test_birthday_today_is_allowed() {
        let mut form = ProfileForm::from_profile(&profile());
        form.date_of_birth = "2026-10-18".into();
        assert!(form.validate(today()).is_ok());
        form.date_of_birth = "18/10/2026".into();
        assert_eq!(
            form.validate(today()).unwrap_err().get("date_of_birth"),
            Some("Please enter a valid date of birth")
        );
    }

    #[test]
    fn test_address_form_edit_carries_id() {
        let form = AddressForm::from_profile(&profile());
        assert!(form.is_edit());
        let req = form.validate().unwrap();
        assert_eq!(req.id.as_ref().map(|i| i.as_str()), Some("a1"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["id"], "a1");
    }

    #[test]
    fn test_new_address_omits_id_and_district_is_optional() {
        let mut p = profile();
        p.address.clear();
        let mut form = AddressForm::from_profile(&p);
        assert!(!form.is_edit());
        assert_eq!(
            form.validate().unwrap_err().first(),
            Some("Street address is required")
        );

        form.street = "1 Creek Rd".into();
        form.city = "Dubai".into();
        form.state = "Dubai".into();
        form.country = "UAE".into();
        form.postal_code = "12345".into();
        let json = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["district"], "");
    }
}
