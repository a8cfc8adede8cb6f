//! Aims screen: the list and the two-step calculate/submit form.

use super::wire::{AddAimRequest, AimCalculationRequest};
use super::{Aim, AimCalculation, PaymentCycle};
use crate::error::{FormErrors, SdkError, GENERAL};
use crate::shared::validate::parse_amount;
use crate::shared::{Epoch, Loadable, Ticket, Toast};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

pub const NAME_REQUIRED: &str = "Aim name is required";
pub const MONTHS_INVALID: &str = "Months must be greater than 0";
pub const AMOUNT_INVALID: &str = "Amount must be greater than 0";
pub const TARGET_DATE_PAST: &str = "Target date must be in the future";
pub const CALCULATE_FIRST: &str = "Please calculate EMI first";
pub const CALCULATE_FAILED: &str = "Failed to calculate aim. Please try again.";
pub const ADD_FAILED: &str = "Failed to add aim. Please try again.";
pub const FETCH_FAILED: &str = "Failed to fetch aims";

const TOAST_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AimForm {
    pub name: String,
    amount: String,
    months: String,
    payment_cycle: PaymentCycle,
    pub target_date: Option<NaiveDate>,
    calculation: Option<AimCalculation>,
    pub errors: FormErrors,
    pub calculating: bool,
    pub submitting: bool,
}

impl AimForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn months(&self) -> &str {
        &self.months
    }

    pub fn payment_cycle(&self) -> PaymentCycle {
        self.payment_cycle
    }

    pub fn calculation(&self) -> Option<&AimCalculation> {
        self.calculation.as_ref()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.errors.clear("name");
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
        self.errors.clear("amount");
        self.calculation = None;
    }

    pub fn set_months(&mut self, value: impl Into<String>) {
        self.months = value.into();
        self.errors.clear("months");
        self.calculation = None;
    }

    pub fn set_payment_cycle(&mut self, cycle: PaymentCycle) {
        self.payment_cycle = cycle;
        self.errors.clear("payment_cycle");
        self.calculation = None;
    }

    pub fn set_target_date(&mut self, date: Option<NaiveDate>) {
        self.target_date = date;
        self.errors.clear("target_date");
    }

    /// Submit stays disabled until a calculation exists for the current inputs.
    pub fn can_submit(&self) -> bool {
        self.calculation.is_some() && !self.calculating && !self.submitting
    }

    fn parsed_months(&self) -> Option<u32> {
        self.months.trim().parse::<u32>().ok().filter(|m| *m > 0)
    }

    fn parsed_amount(&self) -> Option<Decimal> {
        parse_amount(&self.amount).filter(|a| *a > Decimal::ZERO)
    }

    fn check_plan_inputs(&self, errors: &mut FormErrors) {
        if self.parsed_months().is_none() {
            errors.insert("months", MONTHS_INVALID);
        }
        if self.parsed_amount().is_none() {
            errors.insert("amount", AMOUNT_INVALID);
        }
    }

    pub fn validate_for_calculation(&self) -> Result<AimCalculationRequest, FormErrors> {
        let mut errors = FormErrors::new();
        self.check_plan_inputs(&mut errors);
        match (self.parsed_months(), self.parsed_amount()) {
            (Some(months), Some(amount)) => Ok(AimCalculationRequest {
                months,
                amount,
                payment_cycle: self.payment_cycle,
            }),
            _ => Err(errors),
        }
    }

    /// A target date must fall strictly after `now`; today is rejected.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<AddAimRequest, FormErrors> {
        let mut errors = FormErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", NAME_REQUIRED);
        }
        self.check_plan_inputs(&mut errors);
        if let Some(date) = self.target_date {
            let starts = date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
            if starts.map_or(true, |s| s <= now) {
                errors.insert("target_date", TARGET_DATE_PAST);
            }
        }
        if self.calculation.is_none() {
            errors.insert(GENERAL, CALCULATE_FIRST);
        }

        match (
            self.parsed_months(),
            self.parsed_amount(),
            self.calculation.as_ref(),
        ) {
            (Some(months), Some(amount), Some(calc)) if errors.is_empty() => Ok(AddAimRequest {
                name: self.name.clone(),
                months,
                amount,
                payment_cycle: self.payment_cycle,
                calculated_emi: calc.calculated_emi,
                target_date: self.target_date,
            }),
            _ => Err(errors),
        }
    }

    fn inputs_match(&self, request: &AimCalculationRequest) -> bool {
        self.validate_for_calculation().ok().as_ref() == Some(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AimsView {
    #[default]
    List,
    Add(AimForm),
}

#[derive(Debug, Clone, Default)]
pub struct AimsState {
    view: AimsView,
    epoch: Epoch,
    aims: Loadable<Vec<Aim>>,
    toast: Option<Toast>,
    kyc_prompt: bool,
}

impl AimsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &AimsView {
        &self.view
    }

    pub fn aims(&self) -> &Loadable<Vec<Aim>> {
        &self.aims
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn kyc_prompt(&self) -> bool {
        self.kyc_prompt
    }

    pub fn form_mut(&mut self) -> Option<&mut AimForm> {
        match &mut self.view {
            AimsView::Add(form) => Some(form),
            AimsView::List => None,
        }
    }

    pub fn show_add(&mut self) {
        tracing::debug!(view = "aims", "Open add form");
        self.view = AimsView::Add(AimForm::new());
        self.epoch.advance();
    }

    /// Back to the list, discarding the form. The caller re-fetches.
    pub fn back(&mut self) {
        self.view = AimsView::List;
        self.epoch.advance();
    }

    pub fn leave(&mut self) {
        self.epoch.advance();
    }

    /// Start a list fetch. Anything still in flight is superseded.
    pub fn begin_load(&mut self) -> Ticket {
        self.epoch.advance();
        self.aims = Loadable::Loading;
        self.epoch.ticket()
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<Aim>, String>) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        self.aims = match result {
            Ok(list) => Loadable::Loaded(list),
            Err(message) => Loadable::Failed(message),
        };
        true
    }

    pub fn begin_calculate(&mut self) -> Option<(Ticket, AimCalculationRequest)> {
        let ticket = self.epoch.ticket();
        let form = self.form_mut()?;
        match form.validate_for_calculation() {
            Ok(request) => {
                form.errors.clear(GENERAL);
                form.calculating = true;
                Some((ticket, request))
            }
            Err(errors) => {
                form.errors.extend(errors);
                None
            }
        }
    }

    /// Apply a calculation. It is discarded if the inputs changed while it
    /// was in flight.
    pub fn finish_calculate(
        &mut self,
        ticket: Ticket,
        request: &AimCalculationRequest,
        result: Result<AimCalculation, &SdkError>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let Some(form) = self.form_mut() else {
            return false;
        };
        form.calculating = false;
        match result {
            Ok(calc) if form.inputs_match(request) => {
                form.calculation = Some(calc);
                true
            }
            Ok(_) => false,
            Err(e) => {
                form.errors.insert(GENERAL, e.message_or(CALCULATE_FAILED));
                true
            }
        }
    }

    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Option<(Ticket, AddAimRequest)> {
        let ticket = self.epoch.ticket();
        let form = self.form_mut()?;
        match form.validate(now) {
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

    /// Apply the `POST /aim` result. Success returns to the list with a
    /// toast; the caller re-fetches.
    pub fn finish_submit(&mut self, ticket: Ticket, result: Result<(), &SdkError>) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let Some(form) = self.form_mut() else {
            return false;
        };
        form.submitting = false;
        match result {
            Ok(()) => {
                let message = format!("Aim \"{}\" created successfully!", form.name);
                self.toast =
                    Some(Toast::success(message).with_ttl(Duration::seconds(TOAST_TTL_SECS)));
                self.back();
            }
            Err(e) if e.requires_kyc() => self.kyc_prompt = true,
            Err(_) => form.errors.insert(GENERAL, ADD_FAILED),
        }
        true
    }

    pub fn dismiss_kyc_prompt(&mut self) {
        self.kyc_prompt = false;
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn expire_toast(&mut self, now: DateTime<Utc>) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }
}
