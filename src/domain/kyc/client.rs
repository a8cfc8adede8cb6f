//! KYC sub-client — record fetch, multipart submission, document download.

use crate::client::PortalClient;
use crate::domain::kyc::state::KycSubmission;
use crate::domain::kyc::wire::KycResponse;
use crate::domain::kyc::{KycRecord, KycState};
use crate::error::SdkError;
use crate::http::MultipartBody;
use crate::shared::OptionalEnvelope;

pub struct KycClient<'a> {
    pub(crate) client: &'a PortalClient,
}

impl From<&KycSubmission> for MultipartBody {
    fn from(s: &KycSubmission) -> Self {
        let mut body = MultipartBody::new()
            .text("emirates_id", s.emirates_id.as_str())
            .text("source_of_funds", s.source_of_funds.as_str());
        if let Some(passport_no) = &s.passport_no {
            body = body.text("passport_no", passport_no.as_str());
        }
        for (kind, upload) in &s.files {
            body = body.file(
                kind.field_name(),
                upload.file_name(),
                upload.content_type(),
                upload.bytes().to_vec(),
            );
        }
        if let Some(kyc_id) = &s.kyc_id {
            body = body.text("kyc_id", kyc_id.as_str());
        }
        body
    }
}

impl<'a> KycClient<'a> {
    /// `GET /kyc`. `None` when the user has not submitted yet.
    pub async fn get(&self) -> Result<Option<KycRecord>, SdkError> {
        let url = self.client.http.url("/kyc");
        let envelope: OptionalEnvelope<KycResponse> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope.data.map(KycRecord::from))
    }

    /// `POST /kyc`, or `PATCH /kyc` for a resubmission.
    pub async fn submit(&self, submission: &KycSubmission) -> Result<(), SdkError> {
        let url = self.client.http.url("/kyc");
        let body = MultipartBody::from(submission);
        let _: serde_json::Value = if submission.is_update() {
            self.client.http.patch_multipart(&url, &body).await?
        } else {
            self.client.http.post_multipart(&url, &body).await?
        };
        Ok(())
    }

    /// Download a stored document image with the session's bearer header.
    pub async fn document(&self, file_ref: &str) -> Result<Vec<u8>, SdkError> {
        let url = self.client.http.url(file_ref);
        Ok(self.client.http.get_bytes(&url).await?)
    }

    pub async fn load(&self, state: &mut KycState) {
        let ticket = state.begin_fetch();
        match self.get().await {
            Ok(record) => state.finish_fetch(ticket, Ok(record)),
            Err(e) => {
                tracing::debug!(error = %e, view = "kyc", "KYC fetch failed");
                state.finish_fetch(ticket, Err(&e))
            }
        };
    }

    /// Submit the open form; on success the record is fetched again.
    pub async fn submit_form(&self, state: &mut KycState) -> Result<bool, SdkError> {
        let Some((ticket, submission)) = state.begin_submit() else {
            return Ok(false);
        };
        let result = self.submit(&submission).await;
        state.finish_submit(ticket, &submission, result.as_ref().map(|_| ()));
        match result {
            Ok(()) => {
                tracing::info!(
                    update = submission.is_update(),
                    files = submission.files.len(),
                    "KYC submitted"
                );
                self.load(state).await;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
