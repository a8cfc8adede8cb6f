//! Wallet sub-client — transaction history, deposits, balance reconciliation.

use crate::client::PortalClient;
use crate::domain::wallet::state::{DEPOSIT_FAILED, HISTORY_FAILED};
use crate::domain::wallet::wire::{DepositRequest, TransactionHistoryResponse};
use crate::domain::wallet::{BalanceReading, BalanceSource, WalletOverview, WalletView};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Envelope;
use chrono::Utc;

pub struct WalletClient<'a> {
    pub(crate) client: &'a PortalClient,
}

impl<'a> WalletClient<'a> {
    /// `GET /transaction`, merged into one timeline.
    pub async fn overview(&self) -> Result<WalletOverview, SdkError> {
        let url = self.client.http.url("/transaction");
        let envelope: Envelope<Vec<TransactionHistoryResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope
            .data
            .into_iter()
            .next()
            .unwrap_or_default()
            .into())
    }

    /// `POST /wallet/payment`.
    pub async fn deposit(&self, request: &DepositRequest) -> Result<(), SdkError> {
        let url = self.client.http.url("/wallet/payment");
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

    /// Fetch the timeline into `view`.
    ///
    /// The response balance is recorded as a reading in the profile store and
    /// the view shows whichever reading is newer.
    pub async fn load(&self, view: &mut WalletView) -> Result<(), SdkError> {
        let ticket = view.begin_load();
        let result = self.overview().await;
        let observed_at = Utc::now();

        match result {
            Ok(overview) => {
                let balance = {
                    let mut store = self.client.profile_store.write().await;
                    store.record_balance(BalanceReading {
                        amount: overview.summary.balance,
                        observed_at,
                        source: BalanceSource::Transactions,
                    });
                    store.wallet_balance()
                };
                if view.finish_load(ticket, Ok(overview)) {
                    view.set_balance(balance);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, view = "wallet", "Transaction history failed");
                view.finish_load(ticket, Err(HISTORY_FAILED.to_string()));
                Err(e)
            }
        }
    }

    /// Submit the open deposit form.
    ///
    /// An accepted deposit shows up at the top of the timeline immediately,
    /// then the history is fetched again. Returns `Ok(false)` when there is no
    /// open form or it failed validation.
    pub async fn submit_deposit(&self, view: &mut WalletView) -> Result<bool, SdkError> {
        let Some((ticket, request)) = view.begin_deposit() else {
            return Ok(false);
        };

        if let Err(e) = self.deposit(&request).await {
            tracing::debug!(error = %e, "Deposit rejected");
            view.finish_deposit(ticket, &request, Err(e.message_or(DEPOSIT_FAILED)), Utc::now());
            return Err(e);
        }
        view.finish_deposit(ticket, &request, Ok(()), Utc::now());
        tracing::info!(amount = %request.amount, "Deposit requested");

        // A failed re-fetch keeps the optimistic entry; the view records why.
        let _ = self.load(view).await;
        Ok(true)
    }
}
