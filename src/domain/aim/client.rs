//! Aims sub-client — list, EMI calculation, creation and payments.

use crate::client::PortalClient;
use crate::domain::aim::state::FETCH_FAILED;
use crate::domain::aim::wire::{
    AddAimRequest, AimCalculationRequest, AimCalculationResponse, AimResponse,
};
use crate::domain::aim::{Aim, AimCalculation, AimPayment, AimsState};
use crate::domain::wallet::wire::AimPaymentResponse;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Envelope;
use chrono::Utc;

pub struct AimsClient<'a> {
    pub(crate) client: &'a PortalClient,
}

impl<'a> AimsClient<'a> {
    /// `GET /aim`.
    pub async fn list(&self) -> Result<Vec<Aim>, SdkError> {
        let url = self.client.http.url("/aim");
        let envelope: Envelope<Vec<AimResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope.data.into_iter().map(Aim::from).collect())
    }

    /// `POST /aim-calculation`. The backend owns the EMI arithmetic.
    pub async fn calculate(
        &self,
        request: &AimCalculationRequest,
    ) -> Result<AimCalculation, SdkError> {
        let url = self.client.http.url("/aim-calculation");
        let envelope: Envelope<AimCalculationResponse> = self
            .client
            .http
            .post(&url, request, RetryPolicy::None)
            .await?;
        Ok(envelope.data.into())
    }

    /// `POST /aim`.
    pub async fn create(&self, request: &AddAimRequest) -> Result<(), SdkError> {
        let url = self.client.http.url("/aim");
        let envelope: Envelope<serde_json::Value> = self
            .client
            .http
            .post(&url, request, RetryPolicy::None)
            .await?;
        if envelope.is_rejected() {
            return Err(SdkError::Rejected(envelope.message.unwrap_or_default()));
        }
        Ok(())
    }

    /// `GET /aim/payment`.
    pub async fn payments(&self) -> Result<Vec<AimPayment>, SdkError> {
        let url = self.client.http.url("/aim/payment");
        let envelope: Envelope<Vec<AimPaymentResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope.data.into_iter().map(AimPayment::from).collect())
    }

    pub async fn load(&self, state: &mut AimsState) {
        let ticket = state.begin_load();
        let result = self.list().await.map_err(|e| {
            tracing::warn!(error = %e, view = "aims", "Aim list fetch failed");
            FETCH_FAILED.to_string()
        });
        state.finish_load(ticket, result);
    }

    /// Run the calculation step for the open form.
    pub async fn calculate_form(&self, state: &mut AimsState) -> Result<bool, SdkError> {
        let Some((ticket, request)) = state.begin_calculate() else {
            return Ok(false);
        };
        let result = self.calculate(&request).await;
        match result {
            Ok(calc) => Ok(state.finish_calculate(ticket, &request, Ok(calc))),
            Err(e) => {
                state.finish_calculate(ticket, &request, Err(&e));
                Err(e)
            }
        }
    }

    /// Submit the open form; on success the list is fetched again.
    pub async fn submit(&self, state: &mut AimsState) -> Result<bool, SdkError> {
        let Some((ticket, request)) = state.begin_submit(Utc::now()) else {
            return Ok(false);
        };
        let result = self.create(&request).await;
        state.finish_submit(ticket, result.as_ref().map(|_| ()));
        match result {
            Ok(()) => {
                tracing::info!(name = %request.name, cycle = %request.payment_cycle, "Aim created");
                self.load(state).await;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
