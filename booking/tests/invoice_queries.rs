//! Invoice query service tests
//!
//! These live as integration tests (not a `#[cfg(test)]` module inside the
//! lib) because they use `rentflow-testing`, which itself depends on
//! `rentflow-booking`; keeping them here ensures only one copy of the crate
//! is linked.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use rentflow_booking::api::ApiError;
use rentflow_booking::query::{BulkOutcome, CachePolicy, InvoiceQueries};
use rentflow_booking::types::{
    ExportFormat, InvoiceDraft, InvoiceFilter, InvoiceStatus, InvoiceSummary, Page,
};
use rentflow_runtime::debounce::Debouncer;
use rentflow_testing::mocks::{MockRentalApi, RecordingNotifier, test_clock};

fn invoice(id: u64) -> InvoiceSummary {
    InvoiceSummary {
        id,
        invoice_number: format!("FTR-{id:04}"),
        customer_name: "Acme İnşaat".into(),
        issue_date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap_or_default(),
        total_amount: 1500.0,
        status: InvoiceStatus::Sent,
    }
}

fn page(ids: &[u64]) -> Page<InvoiceSummary> {
    Page {
        items: ids.iter().map(|&id| invoice(id)).collect(),
        total: ids.len() as u64,
        page: 1,
        page_size: 20,
    }
}

fn service(api: Arc<MockRentalApi>, notifier: Arc<RecordingNotifier>) -> InvoiceQueries {
    InvoiceQueries::with_debounce(
        api,
        notifier,
        Arc::new(test_clock()),
        Debouncer::new(Duration::ZERO),
    )
}

#[tokio::test]
async fn cached_page_skips_the_server_within_the_window() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_invoice_page(Ok(page(&[1, 2])));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), notifier);

    let filter = InvoiceFilter::default();
    let first = queries.list(&filter, CachePolicy::default_list()).await;
    let second = queries.list(&filter, CachePolicy::default_list()).await;

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(api.list_invoice_calls(), 1);
}

#[tokio::test]
async fn fresh_policy_always_hits_the_server() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_invoice_page(Ok(page(&[1])));
    api.enqueue_invoice_page(Ok(page(&[1])));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), notifier);

    let filter = InvoiceFilter::default();
    let _ = queries.list(&filter, CachePolicy::Fresh).await;
    let _ = queries.list(&filter, CachePolicy::Fresh).await;

    assert_eq!(api.list_invoice_calls(), 2);
}

#[tokio::test]
async fn bulk_delete_makes_one_notification_and_one_refetch() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_delete(Ok(()));
    api.enqueue_delete(Ok(()));
    api.enqueue_delete(Ok(()));
    api.enqueue_invoice_page(Ok(page(&[4])));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), Arc::clone(&notifier));

    let outcome = queries
        .bulk_delete(&[1, 2, 3], &InvoiceFilter::default())
        .await;

    assert_eq!(outcome, BulkOutcome { succeeded: 3, failed: 0 });
    assert_eq!(api.delete_invoice_calls(), 3);
    assert_eq!(api.list_invoice_calls(), 1);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].1, "3 fatura silindi");
}

#[tokio::test]
async fn partial_bulk_failure_surfaces_one_error_notification() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_delete(Ok(()));
    api.enqueue_delete(Err(ApiError::Server {
        status: 409,
        message: Some("Fatura kilitli".into()),
    }));
    api.enqueue_invoice_page(Ok(page(&[2])));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), Arc::clone(&notifier));

    let outcome = queries.bulk_delete(&[1, 2], &InvoiceFilter::default()).await;

    assert_eq!(outcome, BulkOutcome { succeeded: 1, failed: 1 });
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].1, "Bazı faturalar silinemedi");
}

#[tokio::test]
async fn create_failure_prefers_the_server_message() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_invoice(Err(ApiError::Server {
        status: 422,
        message: Some("Fatura numarası kullanımda".into()),
    }));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), Arc::clone(&notifier));

    let draft = InvoiceDraft {
        customer_name: "Acme İnşaat".into(),
        issue_date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap_or_default(),
        total_amount: 1500.0,
        status: InvoiceStatus::Draft,
    };
    let result = queries.create(&draft).await;

    assert!(result.is_err());
    let notices = notifier.notices();
    assert_eq!(notices[0].1, "Fatura numarası kullanımda");
}

#[tokio::test]
async fn export_names_the_file_from_todays_date() {
    let api = Arc::new(MockRentalApi::new());
    api.enqueue_export(Ok(vec![1, 2, 3]));
    let notifier = Arc::new(RecordingNotifier::new());
    let queries = service(Arc::clone(&api), notifier);

    #[allow(clippy::unwrap_used)] // Test code: export was enqueued
    let file = queries
        .export(&InvoiceFilter::default(), ExportFormat::Excel)
        .await
        .unwrap();

    // test_clock pins today to 2025-01-01
    assert_eq!(file.filename, "faturalar-2025-01-01.xlsx");
    assert_eq!(file.bytes, vec![1, 2, 3]);
}
