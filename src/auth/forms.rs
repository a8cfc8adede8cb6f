//! Login and registration forms.

use crate::auth::RegisterRequest;
use crate::error::{ApiErrorKind, FormErrors, SdkError, GENERAL, NETWORK_MESSAGE};
use crate::router::Route;
use crate::shared::validate;

#[cfg(feature = "http")]
use crate::auth::client::Auth;

const LOGIN_REJECTED: &str = "Login failed. Please check your credentials.";
const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const MIN_PASSWORD_LEN: usize = 6;

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editing any field dismisses the previous error.
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.error = None;
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.error = None;
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validate::require(&mut errors, "email", &self.email, "Email is required");
        validate::require(&mut errors, "password", &self.password, "Password is required");
        errors.into_result()
    }

    /// Text shown for a failed login.
    ///
    /// A response from the backend shows its `message`; a missing response is
    /// a connectivity problem; anything else is generic.
    pub fn failure_message(error: &SdkError) -> String {
        match error {
            SdkError::Http(e) if e.has_response() => e
                .body()
                .and_then(|b| b.message.clone())
                .unwrap_or_else(|| LOGIN_REJECTED.to_string()),
            SdkError::Http(e) if e.kind() == ApiErrorKind::Network => NETWORK_MESSAGE.to_string(),
            _ => LOGIN_FAILED.to_string(),
        }
    }

    /// Submit the form. Returns the route to navigate to on success; on
    /// failure `error` is set and the entered data is kept.
    #[cfg(feature = "http")]
    pub async fn submit(&mut self, auth: &Auth<'_>) -> Option<Route> {
        if let Err(errors) = self.validate() {
            self.error = errors.first().map(str::to_string);
            return None;
        }
        self.submitting = true;
        self.error = None;
        let result = auth.login(self.email.trim(), &self.password).await;
        self.submitting = false;
        match result {
            Ok(_) => Some(Route::Schemes),
            Err(e) => {
                self.error = Some(Self::failure_message(&e));
                None
            }
        }
    }
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: FormErrors,
    pub submitting: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<RegisterRequest, FormErrors> {
        let mut errors = FormErrors::new();
        validate::require(&mut errors, "first_name", &self.first_name, "First name is required");
        validate::require(&mut errors, "last_name", &self.last_name, "Last name is required");
        validate::require_email(&mut errors, "email", &self.email);
        if validate::require(
            &mut errors,
            "mobile_no",
            &self.mobile_no,
            "Mobile number is required",
        ) && !validate::is_phone(self.mobile_no.trim())
        {
            errors.insert("mobile_no", "Please enter a valid phone number");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert("password", "Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            errors.insert("confirm_password", "Passwords do not match");
        }
        errors.into_result()?;

        Ok(RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile_no: self.mobile_no.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Register and, on success, send the user to the login screen. No
    /// session is created.
    #[cfg(feature = "http")]
    pub async fn submit(&mut self, auth: &Auth<'_>) -> Option<Route> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.errors = errors;
                return None;
            }
        };
        self.errors = FormErrors::new();
        self.submitting = true;
        let result = auth.register(&request).await;
        self.submitting = false;
        match result {
            Ok(_) => Some(Route::Login),
            Err(e) => {
                let message = match e.kind() {
                    Some(ApiErrorKind::Network) => NETWORK_MESSAGE.to_string(),
                    _ => e
                        .server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| REGISTER_FAILED.to_string()),
                };
                self.errors.insert(GENERAL, message);
                None
            }
        }
    }
}
