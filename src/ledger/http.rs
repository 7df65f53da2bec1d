//! HTTP order ledger client.

use super::{OrderLedger, OrderLedgerError, VolumeAndCount};
use crate::domain::{Decimal, WalletId};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeResponse {
    volume: Decimal,
    tx_count: i64,
}

/// Order ledger backed by the settlement service's stats endpoint.
#[derive(Debug, Clone)]
pub struct HttpOrderLedger {
    client: Client,
    base_url: String,
}

impl HttpOrderLedger {
    /// Create a new HTTP order ledger client.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn get_stats(&self, wallet: &WalletId) -> Result<VolumeResponse, OrderLedgerError> {
        let url = format!("{}/v1/wallets/{}/volume", self.base_url, wallet);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(OrderLedgerError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(OrderLedgerError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(OrderLedgerError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(OrderLedgerError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response.json::<VolumeResponse>().await.map_err(|e| {
                backoff::Error::permanent(OrderLedgerError::ParseError(e.to_string()))
            })
        })
        .await
    }
}

#[async_trait]
impl OrderLedger for HttpOrderLedger {
    async fn volume_and_count(
        &self,
        wallet: &WalletId,
    ) -> Result<VolumeAndCount, OrderLedgerError> {
        let stats = self.get_stats(wallet).await?;
        debug!(wallet = %wallet, volume = %stats.volume, "Fetched wallet volume");
        Ok(VolumeAndCount {
            volume: stats.volume,
            tx_count: stats.tx_count,
        })
    }
}
