//! Schemes screen: subscriptions, catalog, payment setup and detail views.

use super::wire::SelectSchemeRequest;
use super::{Scheme, SelectedScheme};
use crate::error::{FormErrors, SdkError, GENERAL};
use crate::shared::validate::parse_amount;
use crate::shared::{Epoch, Loadable, Ticket, Toast};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub const PAY_AMOUNT_INVALID: &str = "Payment amount is required and must be greater than 0";
pub const PAYMENT_DATE_INVALID: &str = "Please select a valid payment date (1-31)";
pub const PAYMENT_FAILED: &str = "Payment failed. Please try again.";
pub const SELECT_FAILED: &str = "Failed to select scheme. Please try again.";

/// Prefix for catalog fetch failures.
pub const CATALOG_FETCH_FAILED: &str = "Error fetching schemes";
/// Prefix for subscription fetch failures.
pub const SUBSCRIPTIONS_FETCH_FAILED: &str = "Error fetching selected schemes";

/// Payment setup for one catalog scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    pub scheme: Scheme,
    pub pay_amount: String,
    /// Day of month, 1–31.
    pub payment_date: u32,
    pub errors: FormErrors,
    pub submitting: bool,
}

impl PaymentForm {
    /// Defaults: the scheme's monthly instalment, due on `today_day`.
    pub fn new(scheme: Scheme, today_day: u32) -> Self {
        Self {
            pay_amount: scheme.monthly_pay.normalize().to_string(),
            scheme,
            payment_date: today_day,
            errors: FormErrors::new(),
            submitting: false,
        }
    }

    pub fn set_pay_amount(&mut self, value: impl Into<String>) {
        self.pay_amount = value.into();
        self.errors.clear("pay_amount");
    }

    pub fn set_payment_date(&mut self, day: u32) {
        self.payment_date = day;
        self.errors.clear("payment_date");
    }

    pub fn validate(&self) -> Result<SelectSchemeRequest, FormErrors> {
        let mut errors = FormErrors::new();
        let amount = parse_amount(&self.pay_amount).filter(|a| *a > Decimal::ZERO);
        if amount.is_none() {
            errors.insert("pay_amount", PAY_AMOUNT_INVALID);
        }
        if !(1..=31).contains(&self.payment_date) {
            errors.insert("payment_date", PAYMENT_DATE_INVALID);
        }
        match amount {
            Some(pay_amount) if errors.is_empty() => Ok(SelectSchemeRequest {
                scheme_id: self.scheme.id.clone(),
                pay_amount,
                payment_date: self.payment_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Which sub-view of the schemes screen is shown.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemesView {
    #[default]
    Subscriptions,
    Catalog,
    Payment(PaymentForm),
    Detail(SelectedScheme),
}

impl SchemesView {
    pub fn name(&self) -> &'static str {
        match self {
            SchemesView::Subscriptions => "subscriptions",
            SchemesView::Catalog => "catalog",
            SchemesView::Payment(_) => "payment",
            SchemesView::Detail(_) => "detail",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemesState {
    view: SchemesView,
    epoch: Epoch,
    catalog: Loadable<Vec<Scheme>>,
    subscriptions: Loadable<Vec<SelectedScheme>>,
    toast: Option<Toast>,
    kyc_prompt: bool,
}

impl SchemesState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &SchemesView {
        &self.view
    }

    pub fn catalog(&self) -> &Loadable<Vec<Scheme>> {
        &self.catalog
    }

    pub fn subscriptions(&self) -> &Loadable<Vec<SelectedScheme>> {
        &self.subscriptions
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn kyc_prompt(&self) -> bool {
        self.kyc_prompt
    }

    pub fn payment_form_mut(&mut self) -> Option<&mut PaymentForm> {
        match &mut self.view {
            SchemesView::Payment(form) => Some(form),
            _ => None,
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────

    fn go(&mut self, view: SchemesView) {
        tracing::debug!(from = self.view.name(), to = view.name(), "Schemes view change");
        self.view = view;
        self.epoch.advance();
    }

    pub fn show_subscriptions(&mut self) {
        self.go(SchemesView::Subscriptions);
    }

    pub fn show_catalog(&mut self) {
        self.go(SchemesView::Catalog);
    }

    /// Open payment setup for a catalog scheme.
    pub fn select_scheme(&mut self, scheme: Scheme, today_day: u32) {
        self.go(SchemesView::Payment(PaymentForm::new(scheme, today_day)));
    }

    pub fn view_detail(&mut self, subscription: SelectedScheme) {
        self.go(SchemesView::Detail(subscription));
    }

    /// Payment → catalog, anything else → subscriptions. Form input is lost.
    pub fn back(&mut self) {
        match self.view {
            SchemesView::Payment(_) => self.show_catalog(),
            _ => self.show_subscriptions(),
        }
    }

    /// Abandon anything in flight (the screen was left).
    pub fn leave(&mut self) {
        self.epoch.advance();
    }

    // ── Fetches ──────────────────────────────────────────────────────────

    pub fn begin_catalog_load(&mut self) -> Ticket {
        self.epoch.advance();
        self.catalog = Loadable::Loading;
        self.epoch.ticket()
    }

    pub fn finish_catalog_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Scheme>, String>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        self.catalog = match result {
            Ok(list) => Loadable::Loaded(list),
            Err(reason) => Loadable::Failed(format!("{}: {}", CATALOG_FETCH_FAILED, reason)),
        };
        true
    }

    pub fn begin_subscriptions_load(&mut self) -> Ticket {
        self.epoch.advance();
        self.subscriptions = Loadable::Loading;
        self.epoch.ticket()
    }

    pub fn finish_subscriptions_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<SelectedScheme>, String>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        self.subscriptions = match result {
            Ok(list) => Loadable::Loaded(list),
            Err(reason) => {
                Loadable::Failed(format!("{}: {}", SUBSCRIPTIONS_FETCH_FAILED, reason))
            }
        };
        true
    }

    // ── Payment setup ────────────────────────────────────────────────────

    /// Validate the payment form. Field errors stay on the form.
    pub fn begin_payment(&mut self) -> Option<(Ticket, SelectSchemeRequest)> {
        let ticket = self.epoch.ticket();
        let form = self.payment_form_mut()?;
        match form.validate() {
            Ok(request) => {
                form.errors = FormErrors::new();
                form.submitting = true;
                Some((ticket, request))
            }
            Err(errors) => {
                form.errors = errors;
                None
            }
        }
    }

    /// Apply the `POST /scheme` result.
    ///
    /// Success returns to the subscriptions list with a toast; the caller
    /// re-fetches it. A KYC failure raises the KYC prompt instead of a toast.
    pub fn finish_payment(&mut self, ticket: Ticket, result: Result<(), &SdkError>) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let Some(form) = self.payment_form_mut() else {
            return false;
        };
        form.submitting = false;

        match result {
            Ok(()) => {
                let name = form.scheme.name.clone();
                self.toast = Some(Toast::success(format!(
                    "Payment setup successful for {}!",
                    name
                )));
                self.show_subscriptions();
            }
            Err(e) if e.requires_kyc() => {
                self.kyc_prompt = true;
            }
            Err(e) => {
                let message = match e {
                    SdkError::Rejected(_) => e
                        .server_message()
                        .unwrap_or(SELECT_FAILED)
                        .to_string(),
                    _ => e.user_message(PAYMENT_FAILED),
                };
                form.errors.insert(GENERAL, message.clone());
                self.toast = Some(Toast::error(message));
            }
        }
        true
    }

    pub fn dismiss_kyc_prompt(&mut self) {
        self.kyc_prompt = false;
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Drop the toast once its display time has passed.
    pub fn expire_toast(&mut self, now: DateTime<Utc>) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }
}
