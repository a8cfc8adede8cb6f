//! KYC screen state machine.
//!
//! ```text
//! Fetching ──► NoRecord ──begin_submission──► Editing ──submit──► Fetching
//!    │                                          ▲  │
//!    ├──► Viewing(pending | approved)           │  └─cancel_edit─► previous
//!    ├──► Viewing(rejected) ──begin_update──────┘
//!    └──► Unauthenticated
//! ```

use super::{DocumentError, DocumentKind, DocumentSlot, DocumentUpload, KycRecord, KycStatus};
use crate::error::{ApiErrorKind, SdkError, ADDRESS_MISSING_MESSAGE, AUTH_FAILED_MESSAGE, NETWORK_MESSAGE};
use crate::shared::{Epoch, RecordId, Ticket, Toast};

pub const EMIRATES_ID_REQUIRED: &str = "Emirates ID number is required";
pub const SOURCE_OF_FUNDS_REQUIRED: &str = "Source of funds is required";
pub const FRONT_IMAGE_REQUIRED: &str = "Valid Emirates ID front image is required";
pub const BACK_IMAGE_REQUIRED: &str = "Valid Emirates ID back image is required";
pub const SUBMITTED: &str = "KYC submitted successfully!";
pub const UPDATED: &str = "KYC updated successfully!";
pub const SUBMIT_FAILED: &str = "An error occurred while submitting KYC";
pub const LOGIN_TO_VIEW: &str = "Please log in to view your KYC information.";

/// Validated payload of a KYC submission: text fields, newly picked files
/// only, and the record id when resubmitting.
#[derive(Debug, Clone, PartialEq)]
pub struct KycSubmission {
    pub emirates_id: String,
    pub source_of_funds: String,
    pub passport_no: Option<String>,
    pub files: Vec<(DocumentKind, DocumentUpload)>,
    /// Set for a resubmission of a rejected record (`PATCH /kyc`).
    pub kyc_id: Option<RecordId>,
}

impl KycSubmission {
    pub fn is_update(&self) -> bool {
        self.kyc_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KycForm {
    pub emirates_id: String,
    pub passport_no: String,
    pub source_of_funds: String,
    front: DocumentSlot,
    back: DocumentSlot,
    visa_copy: DocumentSlot,
    /// The record being resubmitted, if any.
    record: Option<KycRecord>,
    pub submitting: bool,
}

impl KycForm {
    /// Empty form for a first submission.
    pub fn blank() -> Self {
        Self {
            emirates_id: String::new(),
            passport_no: String::new(),
            source_of_funds: String::new(),
            front: DocumentSlot::Empty,
            back: DocumentSlot::Empty,
            visa_copy: DocumentSlot::Empty,
            record: None,
            submitting: false,
        }
    }

    /// Form pre-filled from an existing record; its images count as present.
    pub fn resubmission(record: &KycRecord) -> Self {
        Self {
            emirates_id: record.emirates_id.clone(),
            passport_no: record.passport_no.clone().unwrap_or_default(),
            source_of_funds: record.source_of_funds.clone(),
            front: DocumentSlot::from_ref(record.front_image.as_deref()),
            back: DocumentSlot::from_ref(record.back_image.as_deref()),
            visa_copy: DocumentSlot::from_ref(record.visa_copy.as_deref()),
            record: Some(record.clone()),
            submitting: false,
        }
    }

    pub fn record(&self) -> Option<&KycRecord> {
        self.record.as_ref()
    }

    pub fn slot(&self, kind: DocumentKind) -> &DocumentSlot {
        match kind {
            DocumentKind::Front => &self.front,
            DocumentKind::Back => &self.back,
            DocumentKind::VisaCopy => &self.visa_copy,
        }
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut DocumentSlot {
        match kind {
            DocumentKind::Front => &mut self.front,
            DocumentKind::Back => &mut self.back,
            DocumentKind::VisaCopy => &mut self.visa_copy,
        }
    }

    pub fn select(&mut self, kind: DocumentKind, upload: DocumentUpload) {
        *self.slot_mut(kind) = DocumentSlot::Selected(upload);
    }

    pub fn remove(&mut self, kind: DocumentKind) {
        *self.slot_mut(kind) = DocumentSlot::Empty;
    }

    /// Front and back images are mandatory for a first submission and for a
    /// rejected record; an image already on the server satisfies them.
    pub fn requires_images(&self) -> bool {
        self.record
            .as_ref()
            .map_or(true, |r| r.status == KycStatus::Rejected)
    }

    pub fn validate(&self) -> Result<KycSubmission, String> {
        if self.emirates_id.trim().is_empty() {
            return Err(EMIRATES_ID_REQUIRED.to_string());
        }
        if self.source_of_funds.trim().is_empty() {
            return Err(SOURCE_OF_FUNDS_REQUIRED.to_string());
        }
        if self.requires_images() {
            if !self.front.is_filled() {
                return Err(FRONT_IMAGE_REQUIRED.to_string());
            }
            if !self.back.is_filled() {
                return Err(BACK_IMAGE_REQUIRED.to_string());
            }
        }

        let files = DocumentKind::ALL
            .iter()
            .filter_map(|kind| match self.slot(*kind) {
                DocumentSlot::Selected(upload) => Some((*kind, upload.clone())),
                _ => None,
            })
            .collect();
        let passport_no = Some(self.passport_no.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let kyc_id = self
            .record
            .as_ref()
            .filter(|r| r.can_update())
            .map(|r| r.id.clone());

        Ok(KycSubmission {
            emirates_id: self.emirates_id.clone(),
            source_of_funds: self.source_of_funds.clone(),
            passport_no,
            files,
            kyc_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum KycView {
    Unauthenticated(String),
    #[default]
    Fetching,
    NoRecord,
    Viewing(KycRecord),
    Editing(KycForm),
}

impl KycView {
    pub fn name(&self) -> &'static str {
        match self {
            KycView::Unauthenticated(_) => "unauthenticated",
            KycView::Fetching => "fetching",
            KycView::NoRecord => "no-record",
            KycView::Viewing(_) => "viewing",
            KycView::Editing(_) => "editing",
        }
    }
}

/// Message shown for a failed submission.
pub fn submit_failure_message(error: &SdkError) -> String {
    match error.kind() {
        Some(ApiErrorKind::Unauthorized) => AUTH_FAILED_MESSAGE.to_string(),
        Some(ApiErrorKind::AddressMissing) => ADDRESS_MISSING_MESSAGE.to_string(),
        Some(ApiErrorKind::NotFound) => error
            .server_message()
            .unwrap_or(ADDRESS_MISSING_MESSAGE)
            .to_string(),
        Some(ApiErrorKind::Network) => NETWORK_MESSAGE.to_string(),
        _ => match error.server_message() {
            Some(m) if m.contains("Authentication failed") => AUTH_FAILED_MESSAGE.to_string(),
            Some(m) => m.to_string(),
            None => SUBMIT_FAILED.to_string(),
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct KycState {
    view: KycView,
    epoch: Epoch,
    /// Banner: success or error text for the last action.
    notice: Option<Toast>,
}

impl KycState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &KycView {
        &self.view
    }

    pub fn notice(&self) -> Option<&Toast> {
        self.notice.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut KycForm> {
        match &mut self.view {
            KycView::Editing(form) => Some(form),
            _ => None,
        }
    }

    fn go(&mut self, view: KycView) {
        tracing::debug!(from = self.view.name(), to = view.name(), "KYC view change");
        self.view = view;
        self.epoch.advance();
    }

    pub fn leave(&mut self) {
        self.epoch.advance();
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.go(KycView::Fetching);
        self.epoch.ticket()
    }

    /// Apply `GET /kyc`. `Ok(None)` means the user has no record yet.
    pub fn finish_fetch(
        &mut self,
        ticket: Ticket,
        result: Result<Option<KycRecord>, &SdkError>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let view = match result {
            Ok(Some(record)) => KycView::Viewing(record),
            Ok(None) => KycView::NoRecord,
            Err(e) if e.kind() == Some(ApiErrorKind::Unauthorized) => {
                KycView::Unauthenticated(LOGIN_TO_VIEW.to_string())
            }
            Err(e) if e.kind() == Some(ApiErrorKind::NotFound) => KycView::NoRecord,
            Err(e) => match e.server_message() {
                Some(m) if m.contains("Authentication failed") => {
                    KycView::Unauthenticated(AUTH_FAILED_MESSAGE.to_string())
                }
                Some(m) => {
                    self.notice = Some(Toast::error(m));
                    KycView::NoRecord
                }
                None => KycView::NoRecord,
            },
        };
        self.view = view;
        true
    }

    /// Start a first submission. Only valid without a record.
    pub fn begin_submission(&mut self) -> bool {
        if self.view != KycView::NoRecord {
            return false;
        }
        self.notice = None;
        self.go(KycView::Editing(KycForm::blank()));
        true
    }

    /// Start a resubmission. Only valid for a rejected record.
    pub fn begin_update(&mut self) -> bool {
        let form = match &self.view {
            KycView::Viewing(record) if record.can_update() => KycForm::resubmission(record),
            _ => return false,
        };
        self.notice = None;
        self.go(KycView::Editing(form));
        true
    }

    /// Leave the form, discarding picked files and edits.
    pub fn cancel_edit(&mut self) {
        let KycView::Editing(form) = &self.view else {
            return;
        };
        let back = match form.record() {
            Some(record) => KycView::Viewing(record.clone()),
            None => KycView::NoRecord,
        };
        self.notice = None;
        self.go(back);
    }

    /// Attach a picked file. Rejected files never reach the form.
    pub fn select_document(
        &mut self,
        kind: DocumentKind,
        upload: Result<DocumentUpload, DocumentError>,
    ) {
        let Some(form) = self.form_mut() else {
            return;
        };
        match upload {
            Ok(upload) => {
                form.select(kind, upload);
                self.notice = None;
            }
            Err(e) => self.notice = Some(Toast::error(e.to_string())),
        }
    }

    pub fn remove_document(&mut self, kind: DocumentKind) {
        if let Some(form) = self.form_mut() {
            form.remove(kind);
        }
    }

    pub fn begin_submit(&mut self) -> Option<(Ticket, KycSubmission)> {
        let ticket = self.epoch.ticket();
        let form = self.form_mut()?;
        match form.validate() {
            Ok(submission) => {
                form.submitting = true;
                self.notice = None;
                Some((ticket, submission))
            }
            Err(message) => {
                self.notice = Some(Toast::error(message));
                None
            }
        }
    }

    /// Apply the submission result. On success the caller re-fetches the
    /// record; the form keeps its input on failure.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        submission: &KycSubmission,
        result: Result<(), &SdkError>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let Some(form) = self.form_mut() else {
            return false;
        };
        form.submitting = false;
        self.notice = Some(match result {
            Ok(()) if submission.is_update() => Toast::success(UPDATED),
            Ok(()) => Toast::success(SUBMITTED),
            Err(e) => Toast::error(submit_failure_message(e)),
        });
        true
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
