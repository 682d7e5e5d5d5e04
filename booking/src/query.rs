//! Invoice queries and mutations
//!
//! One service covers both access patterns the admin screens need: cached
//! list reads (with the cache policy as a parameter, not a separate code
//! path) and imperative mutations that invalidate the cache and notify the
//! user. Search input is debounced and sequence-gated so a slow earlier
//! response can never overwrite a fresher one.
//!
//! Bulk operations are parallel individual calls with exactly one
//! consolidated notification and exactly one list refetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use futures::future::join_all;

use rentflow_core::environment::{Clock, Notifier};
use rentflow_runtime::debounce::{Debouncer, SequenceGate};

use crate::api::{ApiError, RentalApi};
use crate::format::export_filename;
use crate::types::{
    ExportFormat, InvoiceDraft, InvoiceFilter, InvoiceStatus, InvoiceSummary, Page,
};

/// How stale a cached page may be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always hit the server
    Fresh,
    /// Serve a cached page no older than the duration
    CachedFor(Duration),
}

impl CachePolicy {
    /// Default staleness window for list screens (30 seconds)
    #[must_use]
    pub const fn default_list() -> Self {
        Self::CachedFor(Duration::from_secs(30))
    }
}

struct CacheEntry<T> {
    inserted_at: Instant,
    value: T,
}

/// Keyed response cache for one entity's list queries
///
/// Keys are filter fingerprints; invalidation clears the whole entity, which
/// is what every mutation wants.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> QueryCache<T> {
    /// Empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a page under the policy
    #[must_use]
    pub fn get(&self, key: &str, policy: CachePolicy) -> Option<T> {
        let CachePolicy::CachedFor(max_age) = policy else {
            return None;
        };
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() <= max_age)
            .map(|entry| entry.value.clone())
    }

    /// Store a page
    pub fn insert(&self, key: String, value: T) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Drop every cached page for this entity
    pub fn invalidate(&self) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.clear();
    }
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a bulk operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Calls that succeeded
    pub succeeded: usize,
    /// Calls that failed
    pub failed: usize,
}

/// A generated export download
#[derive(Clone, Debug)]
pub struct ExportedFile {
    /// Client-generated filename, e.g. `faturalar-2025-06-01.xlsx`
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Invoice query and mutation service
pub struct InvoiceQueries {
    api: Arc<dyn RentalApi>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    cache: QueryCache<Page<InvoiceSummary>>,
    debouncer: Debouncer,
    gate: SequenceGate,
}

impl InvoiceQueries {
    /// Build the service with the standard 500 ms search debounce
    #[must_use]
    pub fn new(api: Arc<dyn RentalApi>, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self::with_debounce(api, notifier, clock, Debouncer::for_search())
    }

    /// Build the service with a custom debouncer (tests use a zero window)
    #[must_use]
    pub fn with_debounce(
        api: Arc<dyn RentalApi>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        debouncer: Debouncer,
    ) -> Self {
        Self {
            api,
            notifier,
            clock,
            cache: QueryCache::new(),
            debouncer,
            gate: SequenceGate::new(),
        }
    }

    /// Fetch a filtered page, honoring the cache policy
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`] after surfacing a notification.
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        policy: CachePolicy,
    ) -> Result<Page<InvoiceSummary>, ApiError> {
        let key = filter.fingerprint();
        if let Some(page) = self.cache.get(&key, policy) {
            tracing::debug!(%key, "Serving invoice list from cache");
            return Ok(page);
        }

        match self.api.list_invoices(filter).await {
            Ok(page) => {
                self.cache.insert(key, page.clone());
                Ok(page)
            },
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Faturalar yüklenemedi"));
                Err(err)
            },
        }
    }

    /// Debounced, sequence-gated search fetch
    ///
    /// Returns `None` when this call was superseded by a later keystroke, its
    /// response arrived after a fresher one, or the fetch failed (which also
    /// surfaces a notification). Callers apply a `Some` page as-is.
    pub async fn search(&self, filter: InvoiceFilter) -> Option<Page<InvoiceSummary>> {
        self.debouncer
            .call(|| async {
                let seq = self.gate.next();
                match self.api.list_invoices(&filter).await {
                    Ok(page) => {
                        if self.gate.accept(seq) {
                            self.cache.insert(filter.fingerprint(), page.clone());
                            Some(page)
                        } else {
                            None
                        }
                    },
                    Err(err) => {
                        self.notifier
                            .error(&err.user_message("Faturalar yüklenemedi"));
                        None
                    },
                }
            })
            .await
            .flatten()
    }

    /// Fetch a single invoice
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`]; detail screens render their own
    /// failure state.
    pub async fn get(&self, id: u64) -> Result<InvoiceSummary, ApiError> {
        self.api.get_invoice(id).await
    }

    /// Create an invoice
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`] after surfacing a notification.
    pub async fn create(&self, draft: &InvoiceDraft) -> Result<InvoiceSummary, ApiError> {
        match self.api.create_invoice(draft).await {
            Ok(invoice) => {
                self.cache.invalidate();
                self.notifier.success("Fatura oluşturuldu");
                Ok(invoice)
            },
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Fatura oluşturulamadı"));
                Err(err)
            },
        }
    }

    /// Update an invoice
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`] after surfacing a notification.
    pub async fn update(&self, id: u64, draft: &InvoiceDraft) -> Result<InvoiceSummary, ApiError> {
        match self.api.update_invoice(id, draft).await {
            Ok(invoice) => {
                self.cache.invalidate();
                self.notifier.success("Fatura güncellendi");
                Ok(invoice)
            },
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Fatura güncellenemedi"));
                Err(err)
            },
        }
    }

    /// Delete an invoice
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`] after surfacing a notification.
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        match self.api.delete_invoice(id).await {
            Ok(()) => {
                self.cache.invalidate();
                self.notifier.success("Fatura silindi");
                Ok(())
            },
            Err(err) => {
                self.notifier.error(&err.user_message("Fatura silinemedi"));
                Err(err)
            },
        }
    }

    /// Delete several invoices as parallel individual calls
    ///
    /// One consolidated notification and one list refetch regardless of how
    /// many invoices were selected.
    pub async fn bulk_delete(&self, ids: &[u64], filter: &InvoiceFilter) -> BulkOutcome {
        let results = join_all(ids.iter().map(|&id| self.api.delete_invoice(id))).await;
        let succeeded = results.iter().filter(|result| result.is_ok()).count();
        let outcome = BulkOutcome {
            succeeded,
            failed: results.len() - succeeded,
        };

        if outcome.failed == 0 {
            self.notifier
                .success(&format!("{} fatura silindi", outcome.succeeded));
        } else {
            self.notifier.error("Bazı faturalar silinemedi");
        }

        self.cache.invalidate();
        let _ = self.list(filter, CachePolicy::Fresh).await;
        outcome
    }

    /// Change several invoices' status as parallel individual calls
    ///
    /// Same contract as [`bulk_delete`](Self::bulk_delete): one notification,
    /// one refetch.
    pub async fn bulk_update_status(
        &self,
        ids: &[u64],
        status: InvoiceStatus,
        filter: &InvoiceFilter,
    ) -> BulkOutcome {
        let results =
            join_all(ids.iter().map(|&id| self.api.update_invoice_status(id, status))).await;
        let succeeded = results.iter().filter(|result| result.is_ok()).count();
        let outcome = BulkOutcome {
            succeeded,
            failed: results.len() - succeeded,
        };

        if outcome.failed == 0 {
            self.notifier
                .success(&format!("{} fatura güncellendi", outcome.succeeded));
        } else {
            self.notifier.error("Bazı faturalar güncellenemedi");
        }

        self.cache.invalidate();
        let _ = self.list(filter, CachePolicy::Fresh).await;
        outcome
    }

    /// Download the filtered list as a file
    ///
    /// The filename is generated client-side from today's date, e.g.
    /// `faturalar-2025-06-01.xlsx`.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`] after surfacing a notification.
    pub async fn export(
        &self,
        filter: &InvoiceFilter,
        format: ExportFormat,
    ) -> Result<ExportedFile, ApiError> {
        match self.api.export_invoices(filter, format).await {
            Ok(bytes) => Ok(ExportedFile {
                filename: export_filename("faturalar", self.clock.now().date_naive(), format),
                bytes,
            }),
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Dışa aktarma başarısız"));
                Err(err)
            },
        }
    }
}
