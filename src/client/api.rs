use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::date_utils::MonthKey;
use crate::models::{Budget, BudgetInput, Envelope, Transaction, TransactionInput};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The record does not exist (any more) on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the request, e.g. because of invalid input.
    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Operations the dashboard needs from the tracker backend.
#[allow(async_fn_in_trait)]
pub trait TrackerApi {
    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>>;
    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction>;
    async fn create_transaction(&self, input: &TransactionInput) -> ClientResult<Transaction>;
    async fn update_transaction(
        &self,
        id: &str,
        input: &TransactionInput,
    ) -> ClientResult<Transaction>;
    async fn delete_transaction(&self, id: &str) -> ClientResult<()>;
    async fn list_budgets(&self, month: MonthKey) -> ClientResult<Vec<Budget>>;
    async fn upsert_budget(&self, input: &BudgetInput) -> ClientResult<Budget>;
}

/// [`TrackerApi`] over HTTP against a running tally server.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transaction_url(&self, id: &str) -> String {
        self.url(&format!("/api/transactions/{}", urlencoding::encode(id)))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(body);
            return Err(if status == StatusCode::NOT_FOUND {
                ClientError::NotFound(message)
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        if !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.error.unwrap_or_default(),
            });
        }
        envelope
            .data
            .ok_or_else(|| ClientError::MalformedResponse("response has no data".into()))
    }
}

impl TrackerApi for HttpApi {
    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.send(self.client.get(self.url("/api/transactions")))
            .await
    }

    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction> {
        self.send(self.client.get(self.transaction_url(id))).await
    }

    async fn create_transaction(&self, input: &TransactionInput) -> ClientResult<Transaction> {
        self.send(self.client.post(self.url("/api/transactions")).json(input))
            .await
    }

    async fn update_transaction(
        &self,
        id: &str,
        input: &TransactionInput,
    ) -> ClientResult<Transaction> {
        self.send(self.client.put(self.transaction_url(id)).json(input))
            .await
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        let _: serde_json::Value = self.send(self.client.delete(self.transaction_url(id))).await?;
        Ok(())
    }

    async fn list_budgets(&self, month: MonthKey) -> ClientResult<Vec<Budget>> {
        let url = self.url(&format!(
            "/api/budgets?month={}",
            urlencoding::encode(&month.to_string())
        ));
        self.send(self.client.get(url)).await
    }

    async fn upsert_budget(&self, input: &BudgetInput) -> ClientResult<Budget> {
        self.send(self.client.post(self.url("/api/budgets")).json(input))
            .await
    }
}
