//! KYC domain — identity documents and their review status.
//!
//! A user has at most one KYC record. It is created once and may only be
//! resubmitted while its status is [`KycStatus::Rejected`]. Document images
//! are checked locally (type allow-list and size ceiling) before they can be
//! attached to a submission.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use state::{KycForm, KycState, KycView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => KycStatus::Approved,
            "rejected" => KycStatus::Rejected,
            _ => KycStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's KYC record as last fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycRecord {
    pub id: RecordId,
    pub emirates_id: String,
    pub passport_no: Option<String>,
    pub source_of_funds: String,
    /// Server file references, fetched through `kyc().document(..)`.
    pub front_image: Option<String>,
    pub back_image: Option<String>,
    pub visa_copy: Option<String>,
    pub status: KycStatus,
    /// Rejection reason.
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl KycRecord {
    pub fn can_update(&self) -> bool {
        self.status == KycStatus::Rejected
    }

    pub fn file_ref(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Front => self.front_image.as_deref(),
            DocumentKind::Back => self.back_image.as_deref(),
            DocumentKind::VisaCopy => self.visa_copy.as_deref(),
        }
    }
}

/// The three document images a submission can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Front,
    Back,
    VisaCopy,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Front, DocumentKind::Back, DocumentKind::VisaCopy];

    /// Multipart field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentKind::Front => "emirates_id_front_img",
            DocumentKind::Back => "emirates_id_back_img",
            DocumentKind::VisaCopy => "visa_copy",
        }
    }
}

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Please upload only JPEG or PNG images")]
    UnsupportedType(String),
    #[error("File size should be less than 5MB")]
    TooLarge(usize),
    #[error("No file selected")]
    Empty,
}

/// A locally picked image that passed the type and size checks.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, DocumentError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(DocumentError::UnsupportedType(content_type));
        }
        if bytes.is_empty() {
            return Err(DocumentError::Empty);
        }
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge(bytes.len()));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Document bytes stay out of logs.
impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What a document slot of the form currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentSlot {
    #[default]
    Empty,
    /// Already on the server; not re-uploaded.
    Existing(String),
    Selected(DocumentUpload),
}

impl DocumentSlot {
    pub fn is_filled(&self) -> bool {
        !matches!(self, DocumentSlot::Empty)
    }

    fn from_ref(file_ref: Option<&str>) -> Self {
        file_ref
            .map(|r| DocumentSlot::Existing(r.to_string()))
            .unwrap_or_default()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_allow_list() {
        assert!(DocumentUpload::new("a.jpg", "image/jpeg", vec![1]).is_ok());
        assert!(DocumentUpload::new("a.jpg", "IMAGE/JPG", vec![1]).is_ok());
        assert!(DocumentUpload::new("a.png", "image/png", vec![1]).is_ok());
        let err = DocumentUpload::new("a.pdf", "application/pdf", vec![1]).unwrap_err();
        assert_eq!(err.to_string(), "Please upload only JPEG or PNG images");
        assert!(matches!(
            DocumentUpload::new("a.gif", "image/gif", vec![1]),
            Err(DocumentError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_document_size_ceiling() {
        assert!(DocumentUpload::new("a.png", "image/png", vec![0; MAX_DOCUMENT_BYTES]).is_ok());
        let err = DocumentUpload::new("a.png", "image/png", vec![0; MAX_DOCUMENT_BYTES + 1])
            .unwrap_err();
        assert_eq!(err, DocumentError::TooLarge(MAX_DOCUMENT_BYTES + 1));
        assert_eq!(err.to_string(), "File size should be less than 5MB");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let doc = fixtures::png(3);
        let shown = format!("{:?}", doc);
        assert!(shown.contains("len: 3"));
        assert!(!shown.contains("[7, 7, 7]"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(KycStatus::parse("Rejected"), KycStatus::Rejected);
        assert_eq!(KycStatus::parse("approved"), KycStatus::Approved);
        assert_eq!(KycStatus::parse("whatever"), KycStatus::Pending);
    }
}
