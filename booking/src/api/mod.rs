//! Rental backend contract
//!
//! [`RentalApi`] is the seam between workflows and the REST backend. Reducers
//! and services hold it as `Arc<dyn RentalApi>`, so tests substitute a
//! programmable mock and production wires in [`http::HttpRentalApi`].

use async_trait::async_trait;

use crate::types::{
    AvailabilityRequest, AvailabilityResult, DiscountValidation, EquipmentCatalogItem,
    ExportFormat, InvoiceDraft, InvoiceFilter, InvoiceStatus, InvoiceSummary, Page,
    PricingBreakdown, QuoteBreakdown, QuoteRequest, ReservationDraft, ReservationOutcome,
    ReservationPricingRequest,
};

pub mod http;

pub use http::{HttpApiConfig, HttpRentalApi};

/// Errors from the rental backend adapter
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server rejected the bearer token
    #[error("unauthorized")]
    Unauthorized,

    /// Non-success HTTP status with an optional structured message
    #[error("server error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status code
        status: u16,
        /// `message` field extracted from the JSON error body, if any
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// User-facing message for this failure
    ///
    /// Prefers the server's structured message; every other failure class
    /// gets the caller's localized fallback. Transport details never leak
    /// into notifications.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// The rental backend's REST surface
///
/// One method per endpoint the workflows use. All methods are cheap to call
/// concurrently; the backend handles its own consistency.
#[async_trait]
pub trait RentalApi: Send + Sync {
    /// Fetch the equipment catalog, optionally filtered by status
    async fn equipment_catalog(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<EquipmentCatalogItem>, ApiError>;

    /// Check availability for several equipment lines in one call
    async fn check_bulk_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResult, ApiError>;

    /// Price a multi-line reservation
    async fn calculate_reservation_price(
        &self,
        request: &ReservationPricingRequest,
    ) -> Result<PricingBreakdown, ApiError>;

    /// Create a reservation
    ///
    /// Business rejections arrive as `Ok` with `success: false`; only
    /// transport and server failures are `Err`.
    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<ReservationOutcome, ApiError>;

    /// Price a single equipment item for the calculator widget
    async fn calculate_quote(&self, request: &QuoteRequest) -> Result<QuoteBreakdown, ApiError>;

    /// Validate a promo code
    async fn validate_discount(&self, code: &str) -> Result<DiscountValidation, ApiError>;

    /// Fetch a filtered, paginated invoice list
    async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Page<InvoiceSummary>, ApiError>;

    /// Fetch a single invoice
    async fn get_invoice(&self, id: u64) -> Result<InvoiceSummary, ApiError>;

    /// Create an invoice
    async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<InvoiceSummary, ApiError>;

    /// Update an invoice
    async fn update_invoice(
        &self,
        id: u64,
        draft: &InvoiceDraft,
    ) -> Result<InvoiceSummary, ApiError>;

    /// Delete an invoice
    async fn delete_invoice(&self, id: u64) -> Result<(), ApiError>;

    /// Change a single invoice's status
    async fn update_invoice_status(
        &self,
        id: u64,
        status: InvoiceStatus,
    ) -> Result<InvoiceSummary, ApiError>;

    /// Download the filtered invoice list as a binary export
    async fn export_invoices(
        &self,
        filter: &InvoiceFilter,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_message() {
        let err = ApiError::Server {
            status: 422,
            message: Some("Seçilen tarihler dolu".into()),
        };
        assert_eq!(err.user_message("Rezervasyon oluşturulamadı"), "Seçilen tarihler dolu");
    }

    #[test]
    fn user_message_falls_back_without_server_message() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Faturalar yüklenemedi"), "Faturalar yüklenemedi");

        let err = ApiError::Unauthorized;
        assert_eq!(err.user_message("Faturalar yüklenemedi"), "Faturalar yüklenemedi");
    }
}
