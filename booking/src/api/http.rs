//! reqwest adapter for the rental backend
//!
//! Responsibilities beyond plain HTTP:
//!
//! - attaches `Authorization: Bearer` from the injected
//!   [`TokenProvider`](rentflow_core::environment::TokenProvider)
//! - reports 401/403 through `on_unauthorized` so the session layer can react
//! - normalizes the backend's inconsistent `data | {data}` envelope in one
//!   place ([`unwrap_envelope`])
//! - extracts the `message` field from JSON error bodies

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use rentflow_core::environment::TokenProvider;

use super::{ApiError, RentalApi};
use crate::types::{
    AvailabilityRequest, AvailabilityResult, DiscountValidation, EquipmentCatalogItem,
    ExportFormat, InvoiceDraft, InvoiceFilter, InvoiceStatus, InvoiceSummary, Page,
    PricingBreakdown, QuoteBreakdown, QuoteRequest, ReservationDraft, ReservationOutcome,
    ReservationPricingRequest,
};

/// Configuration for the HTTP adapter
#[derive(Clone, Debug)]
pub struct HttpApiConfig {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` keeps the client default
    pub timeout: Option<Duration>,
}

impl HttpApiConfig {
    /// Config for the given base URL with client-default timeouts
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Set a per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Production [`RentalApi`] implementation over reqwest
pub struct HttpRentalApi {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

/// Pull the payload out of the backend's response envelope
///
/// Some endpoints return the payload bare, others wrap it as `{ "data": … }`.
/// Normalizing here keeps the duck-typing out of every call site.
fn unwrap_envelope(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            // contains_key checked above
            map.remove("data").unwrap_or(serde_json::Value::Null)
        },
        other => other,
    }
}

impl HttpRentalApi {
    /// Build the adapter
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying client cannot be
    /// constructed (TLS backend initialization).
    pub fn new(config: HttpApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the bearer token, send, and map failure statuses
    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let builder = match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "Bearer token rejected");
            self.tokens.on_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                });
            tracing::warn!(status = status.as_u16(), ?message, "Server returned an error");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Execute and decode a JSON payload through the envelope normalizer
    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        let value: serde_json::Value = response.json().await?;
        Ok(serde_json::from_value(unwrap_envelope(value))?)
    }
}

#[async_trait]
impl RentalApi for HttpRentalApi {
    async fn equipment_catalog(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<EquipmentCatalogItem>, ApiError> {
        let mut builder = self.client.get(self.url("/equipment"));
        if let Some(status) = status {
            builder = builder.query(&[("status", status)]);
        }
        self.json(builder).await
    }

    async fn check_bulk_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResult, ApiError> {
        self.json(
            self.client
                .post(self.url("/reservations/check-bulk-availability"))
                .json(request),
        )
        .await
    }

    async fn calculate_reservation_price(
        &self,
        request: &ReservationPricingRequest,
    ) -> Result<PricingBreakdown, ApiError> {
        self.json(
            self.client
                .post(self.url("/reservations/calculate-price"))
                .json(request),
        )
        .await
    }

    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<ReservationOutcome, ApiError> {
        self.json(self.client.post(self.url("/reservations")).json(draft))
            .await
    }

    async fn calculate_quote(&self, request: &QuoteRequest) -> Result<QuoteBreakdown, ApiError> {
        self.json(self.client.post(self.url("/pricing/calculate")).json(request))
            .await
    }

    async fn validate_discount(&self, code: &str) -> Result<DiscountValidation, ApiError> {
        self.json(
            self.client
                .post(self.url("/pricing/discounts/validate"))
                .json(&serde_json::json!({ "code": code })),
        )
        .await
    }

    async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Page<InvoiceSummary>, ApiError> {
        self.json(self.client.get(self.url("/invoices")).query(filter))
            .await
    }

    async fn get_invoice(&self, id: u64) -> Result<InvoiceSummary, ApiError> {
        self.json(self.client.get(self.url(&format!("/invoices/{id}"))))
            .await
    }

    async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<InvoiceSummary, ApiError> {
        self.json(self.client.post(self.url("/invoices")).json(draft))
            .await
    }

    async fn update_invoice(
        &self,
        id: u64,
        draft: &InvoiceDraft,
    ) -> Result<InvoiceSummary, ApiError> {
        self.json(
            self.client
                .put(self.url(&format!("/invoices/{id}")))
                .json(draft),
        )
        .await
    }

    async fn delete_invoice(&self, id: u64) -> Result<(), ApiError> {
        self.execute(self.client.delete(self.url(&format!("/invoices/{id}"))))
            .await?;
        Ok(())
    }

    async fn update_invoice_status(
        &self,
        id: u64,
        status: InvoiceStatus,
    ) -> Result<InvoiceSummary, ApiError> {
        self.json(
            self.client
                .patch(self.url(&format!("/invoices/{id}/status")))
                .json(&serde_json::json!({ "status": status })),
        )
        .await
    }

    async fn export_invoices(
        &self,
        filter: &InvoiceFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .execute(
                self.client
                    .get(self.url("/invoices/export"))
                    .query(filter)
                    .query(&[("format", format.as_query_value())]),
            )
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data_key_is_unwrapped() {
        let wrapped = serde_json::json!({ "data": { "id": 1 } });
        assert_eq!(unwrap_envelope(wrapped), serde_json::json!({ "id": 1 }));
    }

    #[test]
    fn bare_payload_passes_through() {
        let bare = serde_json::json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(unwrap_envelope(bare.clone()), bare);
    }

    #[test]
    fn object_without_data_key_passes_through() {
        let body = serde_json::json!({ "allAvailable": true, "results": [] });
        assert_eq!(unwrap_envelope(body.clone()), body);
    }
}
