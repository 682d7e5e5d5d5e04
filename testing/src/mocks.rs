//! Mock implementations for testing
//!
//! - [`FixedClock`]: deterministic time
//! - [`StaticTokenProvider`]: canned bearer token with unauthorized tracking
//! - [`RecordingNotifier`]: captures notifications
//! - [`MockRentalApi`]: programmable per-endpoint responses with call
//!   recording

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rentflow_booking::api::{ApiError, RentalApi};
use rentflow_booking::types::{
    AvailabilityRequest, AvailabilityResult, DiscountValidation, EquipmentCatalogItem,
    ExportFormat, InvoiceDraft, InvoiceFilter, InvoiceStatus, InvoiceSummary, Page,
    PricingBreakdown, QuoteBreakdown, QuoteRequest, ReservationDraft, ReservationOutcome,
    ReservationPricingRequest,
};
use rentflow_core::environment::{Clock, NoticeLevel, Notifier, TokenProvider};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use rentflow_testing::mocks::FixedClock;
/// use rentflow_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// let time1 = clock.now();
/// let time2 = clock.now();
/// assert_eq!(time1, time2); // Always the same!
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// Token provider returning a canned token
///
/// Tracks how often the backend reported the token as rejected.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: Mutex<Option<String>>,
    unauthorized: AtomicUsize,
}

impl StaticTokenProvider {
    /// Provider with a session token
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
            unauthorized: AtomicUsize::new(0),
        }
    }

    /// Provider without a session (anonymous requests)
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// How many times `on_unauthorized` was invoked
    #[must_use]
    pub fn unauthorized_calls(&self) -> usize {
        self.unauthorized.load(Ordering::SeqCst)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn on_unauthorized(&self) {
        self.unauthorized.fetch_add(1, Ordering::SeqCst);
        let mut token = self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *token = None;
    }
}

/// Notifier that records every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, in delivery order
    #[must_use]
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, message.to_owned()));
    }
}

type ResponseQueue<T> = Mutex<VecDeque<Result<T, ApiError>>>;

fn pop<T>(queue: &ResponseQueue<T>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .pop_front()
        .unwrap_or_else(|| {
            Err(ApiError::Server {
                status: 599,
                message: Some("mock response not programmed".to_owned()),
            })
        })
}

fn push<T>(queue: &ResponseQueue<T>, response: Result<T, ApiError>) {
    queue
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push_back(response);
}

fn record<T: Clone>(log: &Mutex<Vec<T>>, value: &T) {
    log.lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(value.clone());
}

fn snapshot<T: Clone>(log: &Mutex<Vec<T>>) -> Vec<T> {
    log.lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone()
}

/// Programmable rental backend
///
/// Each endpoint pops its next queued response; an unprogrammed call returns
/// a status-599 server error so tests fail loudly instead of hanging on a
/// made-up payload. Requests are recorded for assertions on exact payloads.
#[derive(Default)]
pub struct MockRentalApi {
    catalog_responses: ResponseQueue<Vec<EquipmentCatalogItem>>,
    availability_responses: ResponseQueue<AvailabilityResult>,
    reservation_pricing_responses: ResponseQueue<PricingBreakdown>,
    reservation_responses: ResponseQueue<ReservationOutcome>,
    quote_responses: ResponseQueue<QuoteBreakdown>,
    discount_responses: ResponseQueue<DiscountValidation>,
    invoice_page_responses: ResponseQueue<Page<InvoiceSummary>>,
    invoice_responses: ResponseQueue<InvoiceSummary>,
    delete_responses: ResponseQueue<()>,
    export_responses: ResponseQueue<Vec<u8>>,

    availability_requests: Mutex<Vec<AvailabilityRequest>>,
    pricing_requests: Mutex<Vec<ReservationPricingRequest>>,
    reservation_drafts: Mutex<Vec<ReservationDraft>>,
    quote_requests: Mutex<Vec<QuoteRequest>>,
    validated_codes: Mutex<Vec<String>>,
    list_filters: Mutex<Vec<InvoiceFilter>>,
    deleted_ids: Mutex<Vec<u64>>,
    status_updates: Mutex<Vec<(u64, InvoiceStatus)>>,
}

impl MockRentalApi {
    /// Backend with no programmed responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Programming ===

    /// Queue an equipment catalog response
    pub fn enqueue_catalog(&self, response: Result<Vec<EquipmentCatalogItem>, ApiError>) {
        push(&self.catalog_responses, response);
    }

    /// Queue a bulk availability response
    pub fn enqueue_availability(&self, response: Result<AvailabilityResult, ApiError>) {
        push(&self.availability_responses, response);
    }

    /// Queue a reservation pricing response
    pub fn enqueue_reservation_pricing(&self, response: Result<PricingBreakdown, ApiError>) {
        push(&self.reservation_pricing_responses, response);
    }

    /// Queue a reservation creation outcome
    pub fn enqueue_reservation_outcome(&self, response: Result<ReservationOutcome, ApiError>) {
        push(&self.reservation_responses, response);
    }

    /// Queue a widget quote response
    pub fn enqueue_quote(&self, response: Result<QuoteBreakdown, ApiError>) {
        push(&self.quote_responses, response);
    }

    /// Queue a promo validation verdict
    pub fn enqueue_discount_validation(&self, response: Result<DiscountValidation, ApiError>) {
        push(&self.discount_responses, response);
    }

    /// Queue an invoice list page
    pub fn enqueue_invoice_page(&self, response: Result<Page<InvoiceSummary>, ApiError>) {
        push(&self.invoice_page_responses, response);
    }

    /// Queue a single-invoice response (get, create, update, status change)
    pub fn enqueue_invoice(&self, response: Result<InvoiceSummary, ApiError>) {
        push(&self.invoice_responses, response);
    }

    /// Queue a delete response
    pub fn enqueue_delete(&self, response: Result<(), ApiError>) {
        push(&self.delete_responses, response);
    }

    /// Queue an export download
    pub fn enqueue_export(&self, response: Result<Vec<u8>, ApiError>) {
        push(&self.export_responses, response);
    }

    // === Recorded calls ===

    /// Availability requests in call order
    #[must_use]
    pub fn availability_requests(&self) -> Vec<AvailabilityRequest> {
        snapshot(&self.availability_requests)
    }

    /// Reservation pricing requests in call order
    #[must_use]
    pub fn pricing_requests(&self) -> Vec<ReservationPricingRequest> {
        snapshot(&self.pricing_requests)
    }

    /// Submitted reservation drafts in call order
    #[must_use]
    pub fn reservation_drafts(&self) -> Vec<ReservationDraft> {
        snapshot(&self.reservation_drafts)
    }

    /// Widget quote requests in call order
    #[must_use]
    pub fn quote_requests(&self) -> Vec<QuoteRequest> {
        snapshot(&self.quote_requests)
    }

    /// Promo codes submitted for validation
    #[must_use]
    pub fn validated_codes(&self) -> Vec<String> {
        snapshot(&self.validated_codes)
    }

    /// Number of invoice list fetches
    #[must_use]
    pub fn list_invoice_calls(&self) -> usize {
        snapshot(&self.list_filters).len()
    }

    /// Number of invoice deletions attempted
    #[must_use]
    pub fn delete_invoice_calls(&self) -> usize {
        snapshot(&self.deleted_ids).len()
    }

    /// Ids passed to delete, in call order
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<u64> {
        snapshot(&self.deleted_ids)
    }

    /// Status changes attempted, in call order
    #[must_use]
    pub fn status_updates(&self) -> Vec<(u64, InvoiceStatus)> {
        snapshot(&self.status_updates)
    }
}

#[async_trait]
impl RentalApi for MockRentalApi {
    async fn equipment_catalog(
        &self,
        _status: Option<&str>,
    ) -> Result<Vec<EquipmentCatalogItem>, ApiError> {
        pop(&self.catalog_responses)
    }

    async fn check_bulk_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResult, ApiError> {
        record(&self.availability_requests, request);
        pop(&self.availability_responses)
    }

    async fn calculate_reservation_price(
        &self,
        request: &ReservationPricingRequest,
    ) -> Result<PricingBreakdown, ApiError> {
        record(&self.pricing_requests, request);
        pop(&self.reservation_pricing_responses)
    }

    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<ReservationOutcome, ApiError> {
        record(&self.reservation_drafts, draft);
        pop(&self.reservation_responses)
    }

    async fn calculate_quote(&self, request: &QuoteRequest) -> Result<QuoteBreakdown, ApiError> {
        record(&self.quote_requests, request);
        pop(&self.quote_responses)
    }

    async fn validate_discount(&self, code: &str) -> Result<DiscountValidation, ApiError> {
        record(&self.validated_codes, &code.to_owned());
        pop(&self.discount_responses)
    }

    async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Page<InvoiceSummary>, ApiError> {
        record(&self.list_filters, filter);
        pop(&self.invoice_page_responses)
    }

    async fn get_invoice(&self, _id: u64) -> Result<InvoiceSummary, ApiError> {
        pop(&self.invoice_responses)
    }

    async fn create_invoice(&self, _draft: &InvoiceDraft) -> Result<InvoiceSummary, ApiError> {
        pop(&self.invoice_responses)
    }

    async fn update_invoice(
        &self,
        _id: u64,
        _draft: &InvoiceDraft,
    ) -> Result<InvoiceSummary, ApiError> {
        pop(&self.invoice_responses)
    }

    async fn delete_invoice(&self, id: u64) -> Result<(), ApiError> {
        record(&self.deleted_ids, &id);
        pop(&self.delete_responses)
    }

    async fn update_invoice_status(
        &self,
        id: u64,
        status: InvoiceStatus,
    ) -> Result<InvoiceSummary, ApiError> {
        record(&self.status_updates, &(id, status));
        pop(&self.invoice_responses)
    }

    async fn export_invoices(
        &self,
        _filter: &InvoiceFilter,
        _format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        pop(&self.export_responses)
    }
}
