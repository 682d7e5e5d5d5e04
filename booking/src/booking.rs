//! Reservation booking wizard
//!
//! A three-step flow: customer info, equipment selection, review and confirm.
//! All transition decisions live in [`BookingReducer`]; the server stays
//! authoritative for availability and pricing, the client only gates and
//! sequences the calls.
//!
//! Step transitions:
//!
//! ```text
//! CustomerInfo --ContinueToEquipment--> EquipmentSelection
//! EquipmentSelection --CheckAvailability--> (availability ok) --> pricing --> ReviewAndConfirm
//! ReviewAndConfirm --Submit--> (created) --> Completed
//! ```
//!
//! Availability and pricing are causally sequenced: the pricing call starts
//! only after the server confirms every line is available, with the same
//! items and dates.

use std::sync::Arc;

use chrono::NaiveDate;

use rentflow_core::effect::Effect;
use rentflow_core::environment::Notifier;
use rentflow_core::reducer::Reducer;

use crate::api::RentalApi;
use crate::types::{
    AvailabilityRequest, AvailabilityRequestItem, AvailabilityResult, CustomerIntake,
    EquipmentCatalogItem, PricingBreakdown, ReservationDraft, ReservationPricingRequest,
    ReservationRecord, SelectedLineItem,
};

/// Invoked exactly once when a reservation is created
pub type CompletionCallback = Arc<dyn Fn(&ReservationRecord) + Send + Sync>;

/// Tunables for the booking workflow
#[derive(Clone, Debug)]
pub struct BookingConfig {
    /// Fraction of the total shown as the deposit due at pickup
    pub deposit_rate: f64,
}

impl BookingConfig {
    /// Override the deposit rate
    #[must_use]
    pub const fn with_deposit_rate(mut self, rate: f64) -> Self {
        self.deposit_rate = rate;
        self
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { deposit_rate: 0.30 }
    }
}

/// Dependencies injected into the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Rental backend
    pub api: Arc<dyn RentalApi>,
    /// User-facing notification sink
    pub notifier: Arc<dyn Notifier>,
    /// Invoked with the created reservation
    pub on_complete: CompletionCallback,
    /// Workflow tunables
    pub config: BookingConfig,
}

/// Wizard steps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BookingStep {
    /// Step 1: customer contact details and rental dates
    #[default]
    CustomerInfo,
    /// Step 2: equipment lines and quantities
    EquipmentSelection,
    /// Step 3: server-priced summary awaiting confirmation
    ReviewAndConfirm,
    /// Terminal: reservation created
    Completed,
}

/// Booking wizard state
#[derive(Clone, Debug, Default)]
pub struct BookingState {
    /// Current wizard step
    pub step: BookingStep,
    /// Customer contact details
    pub customer: CustomerIntake,
    /// Company the customer belongs to, for contract pricing
    pub company_id: Option<u64>,
    /// Customer street address
    pub customer_address: String,
    /// Rental start date
    pub start_date: Option<NaiveDate>,
    /// Rental end date
    pub end_date: Option<NaiveDate>,
    /// Whether delivery is required
    pub delivery_required: bool,
    /// Delivery address
    pub delivery_address: String,
    /// Delivery fee quoted to the customer
    pub delivery_fee: Option<f64>,
    /// Pickup location for self-pickup
    pub pickup_location: String,
    /// Agreed pickup time
    pub pickup_time: String,
    /// Agreed return time
    pub return_time: String,
    /// Return location, when it differs from pickup
    pub return_location: String,
    /// Free-form notes
    pub notes: String,
    /// Special requests for the depot
    pub special_requests: String,
    /// Discount code, stored upper-cased
    pub discount_code: String,
    /// Equipment catalog, loaded once per workflow instance
    pub catalog: Vec<EquipmentCatalogItem>,
    /// Whether a catalog load completed (even an empty one)
    pub catalog_loaded: bool,
    /// Free-text catalog filter
    pub catalog_filter: String,
    /// Selected equipment lines
    pub selected: Vec<SelectedLineItem>,
    /// In-flight flag covering availability check and the chained pricing call
    pub checking_availability: bool,
    /// In-flight flag for reservation submission
    pub submitting: bool,
    /// Inline validation or server-rejection message
    pub form_error: Option<String>,
    /// Server-computed pricing, set before entering review
    pub pricing: Option<PricingBreakdown>,
    /// Deposit figure derived from the configured rate
    pub deposit_due: Option<f64>,
    /// The created reservation, set in the terminal step
    pub created: Option<ReservationRecord>,
}

impl BookingState {
    /// Catalog entries matching the current filter
    #[must_use]
    pub fn filtered_catalog(&self) -> Vec<&EquipmentCatalogItem> {
        self.catalog
            .iter()
            .filter(|item| item.matches_filter(&self.catalog_filter))
            .collect()
    }

    /// Discount code as sent to the server: upper-cased, `None` when empty
    #[must_use]
    pub fn effective_discount_code(&self) -> Option<String> {
        let code = self.discount_code.trim();
        if code.is_empty() {
            None
        } else {
            Some(code.to_uppercase())
        }
    }
}

/// Booking wizard actions
///
/// Commands come from the user; events are produced by effects and fed back
/// through the store.
#[derive(Clone, Debug)]
pub enum BookingAction {
    // === Commands (user intent) ===
    /// Load the equipment catalog (sent once when the wizard opens)
    LoadCatalog,
    /// Edit the customer name
    SetCustomerName(String),
    /// Edit the customer email
    SetCustomerEmail(String),
    /// Edit the customer phone
    SetCustomerPhone(String),
    /// Edit the optional company name
    SetCompanyName(String),
    /// Link the customer to a company
    SetCompanyId(Option<u64>),
    /// Edit the customer street address
    SetCustomerAddress(String),
    /// Edit the rental start date
    SetStartDate(Option<NaiveDate>),
    /// Edit the rental end date
    SetEndDate(Option<NaiveDate>),
    /// Toggle delivery
    SetDeliveryRequired(bool),
    /// Edit the delivery address
    SetDeliveryAddress(String),
    /// Edit the delivery fee
    SetDeliveryFee(Option<f64>),
    /// Edit the pickup location
    SetPickupLocation(String),
    /// Edit the pickup time
    SetPickupTime(String),
    /// Edit the return time
    SetReturnTime(String),
    /// Edit the return location
    SetReturnLocation(String),
    /// Edit the notes field
    SetNotes(String),
    /// Edit the special requests field
    SetSpecialRequests(String),
    /// Edit the discount code (stored upper-cased)
    SetDiscountCode(String),
    /// Advance from customer info to equipment selection
    ContinueToEquipment,
    /// Return to the customer info step
    BackToCustomerInfo,
    /// Edit the catalog free-text filter
    SetCatalogFilter(String),
    /// Select an equipment item (no-op when already selected)
    AddEquipment(u64),
    /// Remove a selected line
    RemoveEquipment(u64),
    /// Change a selected line's quantity (values below 1 are rejected)
    SetQuantity {
        /// Equipment id of the line
        equipment_id: u64,
        /// New quantity
        quantity: u32,
    },
    /// Check availability and, when clear, price the reservation
    CheckAvailability,
    /// Return from review to equipment selection
    BackToEquipment,
    /// Submit the reservation
    Submit,

    // === Events (effect results) ===
    /// Catalog fetch succeeded
    CatalogLoaded(Vec<EquipmentCatalogItem>),
    /// Catalog fetch failed; the wizard continues with an empty catalog
    CatalogLoadFailed(String),
    /// Availability verdict arrived
    AvailabilityChecked(AvailabilityResult),
    /// Availability request failed (user-facing message)
    AvailabilityCheckFailed(String),
    /// Pricing arrived; the wizard advances to review
    PricingCalculated(PricingBreakdown),
    /// Pricing request failed (user-facing message)
    PricingFailed(String),
    /// Reservation created
    SubmissionSucceeded(ReservationRecord),
    /// Server declined the reservation (business rejection)
    SubmissionRejected(String),
    /// Submission request failed (user-facing message)
    SubmissionFailed(String),
}

/// The booking wizard reducer
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingReducer;

/// Step 1 gate: required contact fields, both dates, and date ordering
fn validate_customer_step(state: &BookingState) -> Result<(), String> {
    let (Some(start), Some(end)) = (state.start_date, state.end_date) else {
        return Err("Lütfen gerekli alanları doldurun".to_owned());
    };
    if !state.customer.is_complete() {
        return Err("Lütfen gerekli alanları doldurun".to_owned());
    }
    if end < start {
        return Err("Bitiş tarihi başlangıç tarihinden sonra olmalı".to_owned());
    }
    Ok(())
}

/// Availability gate: dates and at least one selected line
fn validate_availability_inputs(state: &BookingState) -> Result<(), String> {
    if state.start_date.is_none() || state.end_date.is_none() || state.selected.is_empty() {
        Err("Lütfen tarih ve ekipman seçin".to_owned())
    } else {
        Ok(())
    }
}

fn request_items(selected: &[SelectedLineItem]) -> Vec<AvailabilityRequestItem> {
    selected
        .iter()
        .map(|line| AvailabilityRequestItem {
            equipment_id: line.equipment_id,
            quantity: line.quantity,
        })
        .collect()
}

/// Build the submission payload; `None` when required inputs are missing
fn build_draft(state: &BookingState) -> Option<ReservationDraft> {
    let non_empty = |s: &str| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    };

    Some(ReservationDraft {
        customer: state.customer.clone(),
        company_id: state.company_id,
        customer_address: non_empty(&state.customer_address),
        start_date: state.start_date?,
        end_date: state.end_date?,
        items: request_items(&state.selected),
        discount_code: state.effective_discount_code(),
        delivery_required: state.delivery_required,
        delivery_address: non_empty(&state.delivery_address),
        delivery_fee: state.delivery_fee,
        pickup_location: non_empty(&state.pickup_location),
        pickup_time: non_empty(&state.pickup_time),
        return_time: non_empty(&state.return_time),
        return_location: non_empty(&state.return_location),
        notes: non_empty(&state.notes),
        special_requests: non_empty(&state.special_requests),
    })
}

fn load_catalog_effect(api: Arc<dyn RentalApi>) -> Effect<BookingAction> {
    Effect::future(async move {
        match api.equipment_catalog(Some("AVAILABLE")).await {
            Ok(catalog) => Some(BookingAction::CatalogLoaded(catalog)),
            Err(err) => Some(BookingAction::CatalogLoadFailed(err.to_string())),
        }
    })
}

fn pricing_effect(
    api: Arc<dyn RentalApi>,
    request: ReservationPricingRequest,
) -> Effect<BookingAction> {
    Effect::future(async move {
        match api.calculate_reservation_price(&request).await {
            Ok(breakdown) => Some(BookingAction::PricingCalculated(breakdown)),
            Err(err) => Some(BookingAction::PricingFailed(
                err.user_message("Fiyat hesaplanamadı"),
            )),
        }
    })
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per wizard action
    fn reduce(
        &self,
        state: &mut BookingState,
        action: BookingAction,
        env: &BookingEnvironment,
    ) -> Vec<Effect<BookingAction>> {
        match action {
            // === Catalog ===
            BookingAction::LoadCatalog => {
                if state.catalog_loaded {
                    return vec![Effect::None];
                }
                vec![load_catalog_effect(Arc::clone(&env.api))]
            },
            BookingAction::CatalogLoaded(catalog) => {
                state.catalog = catalog;
                state.catalog_loaded = true;
                vec![Effect::None]
            },
            BookingAction::CatalogLoadFailed(reason) => {
                // The wizard stays usable with an empty catalog
                tracing::warn!(%reason, "Equipment catalog failed to load");
                state.catalog_loaded = true;
                vec![Effect::None]
            },

            // === Field edits ===
            BookingAction::SetCustomerName(value) => {
                state.customer.customer_name = value;
                vec![Effect::None]
            },
            BookingAction::SetCustomerEmail(value) => {
                state.customer.customer_email = value;
                vec![Effect::None]
            },
            BookingAction::SetCustomerPhone(value) => {
                state.customer.customer_phone = value;
                vec![Effect::None]
            },
            BookingAction::SetCompanyName(value) => {
                state.customer.company_name = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                };
                vec![Effect::None]
            },
            BookingAction::SetStartDate(date) => {
                state.start_date = date;
                vec![Effect::None]
            },
            BookingAction::SetEndDate(date) => {
                state.end_date = date;
                vec![Effect::None]
            },
            BookingAction::SetCompanyId(company_id) => {
                state.company_id = company_id;
                vec![Effect::None]
            },
            BookingAction::SetCustomerAddress(value) => {
                state.customer_address = value;
                vec![Effect::None]
            },
            BookingAction::SetDeliveryRequired(required) => {
                state.delivery_required = required;
                vec![Effect::None]
            },
            BookingAction::SetDeliveryAddress(value) => {
                state.delivery_address = value;
                vec![Effect::None]
            },
            BookingAction::SetDeliveryFee(fee) => {
                state.delivery_fee = fee;
                vec![Effect::None]
            },
            BookingAction::SetPickupLocation(value) => {
                state.pickup_location = value;
                vec![Effect::None]
            },
            BookingAction::SetPickupTime(value) => {
                state.pickup_time = value;
                vec![Effect::None]
            },
            BookingAction::SetReturnTime(value) => {
                state.return_time = value;
                vec![Effect::None]
            },
            BookingAction::SetReturnLocation(value) => {
                state.return_location = value;
                vec![Effect::None]
            },
            BookingAction::SetNotes(value) => {
                state.notes = value;
                vec![Effect::None]
            },
            BookingAction::SetSpecialRequests(value) => {
                state.special_requests = value;
                vec![Effect::None]
            },
            BookingAction::SetDiscountCode(code) => {
                state.discount_code = code.to_uppercase();
                vec![Effect::None]
            },
            BookingAction::SetCatalogFilter(filter) => {
                state.catalog_filter = filter;
                vec![Effect::None]
            },

            // === Step 1 → 2 ===
            BookingAction::ContinueToEquipment => {
                if state.step != BookingStep::CustomerInfo {
                    return vec![Effect::None];
                }
                match validate_customer_step(state) {
                    Ok(()) => {
                        state.form_error = None;
                        state.step = BookingStep::EquipmentSelection;
                        if state.catalog_loaded {
                            vec![Effect::None]
                        } else {
                            vec![load_catalog_effect(Arc::clone(&env.api))]
                        }
                    },
                    Err(message) => {
                        state.form_error = Some(message);
                        vec![Effect::None]
                    },
                }
            },
            BookingAction::BackToCustomerInfo => {
                if state.step == BookingStep::EquipmentSelection {
                    state.step = BookingStep::CustomerInfo;
                    state.form_error = None;
                }
                vec![Effect::None]
            },

            // === Equipment selection ===
            BookingAction::AddEquipment(equipment_id) => {
                if state.step != BookingStep::EquipmentSelection {
                    return vec![Effect::None];
                }
                // Idempotent: a second add of the same equipment is a no-op
                if state
                    .selected
                    .iter()
                    .any(|line| line.equipment_id == equipment_id)
                {
                    return vec![Effect::None];
                }
                if let Some(item) = state.catalog.iter().find(|item| item.id == equipment_id) {
                    state.selected.push(SelectedLineItem {
                        equipment_id: item.id,
                        name: item.name.clone(),
                        quantity: 1,
                        daily_price: item.daily_price,
                    });
                }
                vec![Effect::None]
            },
            BookingAction::RemoveEquipment(equipment_id) => {
                state.selected.retain(|line| line.equipment_id != equipment_id);
                vec![Effect::None]
            },
            BookingAction::SetQuantity {
                equipment_id,
                quantity,
            } => {
                // Quantity floor: values below 1 are rejected, not clamped
                if quantity < 1 {
                    return vec![Effect::None];
                }
                if let Some(line) = state
                    .selected
                    .iter_mut()
                    .find(|line| line.equipment_id == equipment_id)
                {
                    line.quantity = quantity;
                }
                vec![Effect::None]
            },

            // === Availability → pricing ===
            BookingAction::CheckAvailability => {
                if state.step != BookingStep::EquipmentSelection || state.checking_availability {
                    return vec![Effect::None];
                }
                if let Err(message) = validate_availability_inputs(state) {
                    state.form_error = Some(message);
                    return vec![Effect::None];
                }
                let (Some(start_date), Some(end_date)) = (state.start_date, state.end_date)
                else {
                    return vec![Effect::None];
                };

                state.checking_availability = true;
                state.form_error = None;

                let api = Arc::clone(&env.api);
                let request = AvailabilityRequest {
                    start_date,
                    end_date,
                    items: request_items(&state.selected),
                };
                vec![Effect::future(async move {
                    match api.check_bulk_availability(&request).await {
                        Ok(result) => Some(BookingAction::AvailabilityChecked(result)),
                        Err(err) => Some(BookingAction::AvailabilityCheckFailed(
                            err.user_message("Müsaitlik kontrolü başarısız"),
                        )),
                    }
                })]
            },
            BookingAction::AvailabilityChecked(result) => {
                if !state.checking_availability {
                    return vec![Effect::None];
                }
                if result.all_available {
                    // Keep the in-flight flag up: pricing is part of the same
                    // user-visible operation and must use the same inputs.
                    let (Some(start_date), Some(end_date)) = (state.start_date, state.end_date)
                    else {
                        state.checking_availability = false;
                        return vec![Effect::None];
                    };
                    let request = ReservationPricingRequest {
                        start_date,
                        end_date,
                        items: request_items(&state.selected),
                        company_id: state.company_id,
                        discount_code: state.effective_discount_code(),
                    };
                    vec![pricing_effect(Arc::clone(&env.api), request)]
                } else {
                    state.checking_availability = false;
                    state.form_error = Some(format!(
                        "Bazı ekipmanlar seçilen tarihte müsait değil: {}",
                        result.shortfall_summary()
                    ));
                    vec![Effect::None]
                }
            },
            BookingAction::AvailabilityCheckFailed(message)
            | BookingAction::PricingFailed(message) => {
                state.checking_availability = false;
                state.form_error = Some(message);
                vec![Effect::None]
            },
            BookingAction::PricingCalculated(breakdown) => {
                state.checking_availability = false;
                state.deposit_due = Some(breakdown.total_amount * env.config.deposit_rate);
                state.pricing = Some(breakdown);
                state.form_error = None;
                state.step = BookingStep::ReviewAndConfirm;
                vec![Effect::None]
            },
            BookingAction::BackToEquipment => {
                // The fetched pricing stays; the next availability check
                // replaces it with a fresh one.
                if state.step == BookingStep::ReviewAndConfirm {
                    state.step = BookingStep::EquipmentSelection;
                }
                vec![Effect::None]
            },

            // === Submission ===
            BookingAction::Submit => {
                if state.step != BookingStep::ReviewAndConfirm || state.submitting {
                    return vec![Effect::None];
                }
                let Some(draft) = build_draft(state) else {
                    state.form_error = Some("Lütfen gerekli alanları doldurun".to_owned());
                    return vec![Effect::None];
                };

                state.submitting = true;
                state.form_error = None;

                let api = Arc::clone(&env.api);
                let notifier = Arc::clone(&env.notifier);
                vec![Effect::future(async move {
                    match api.create_reservation(&draft).await {
                        Ok(outcome) if outcome.success => {
                            if let Some(record) = outcome.reservation {
                                notifier.success("Rezervasyon oluşturuldu");
                                Some(BookingAction::SubmissionSucceeded(record))
                            } else {
                                // success without a payload is a server bug;
                                // treat it as a rejection
                                let message = "Rezervasyon oluşturulamadı".to_owned();
                                notifier.error(&message);
                                Some(BookingAction::SubmissionRejected(message))
                            }
                        },
                        Ok(outcome) => {
                            let message = outcome
                                .message
                                .unwrap_or_else(|| "Rezervasyon oluşturulamadı".to_owned());
                            notifier.error(&message);
                            Some(BookingAction::SubmissionRejected(message))
                        },
                        Err(err) => {
                            let message = err.user_message("Rezervasyon oluşturma başarısız");
                            notifier.error(&message);
                            Some(BookingAction::SubmissionFailed(message))
                        },
                    }
                })]
            },
            BookingAction::SubmissionSucceeded(record) => {
                state.submitting = false;
                state.step = BookingStep::Completed;
                state.created = Some(record.clone());

                let callback = Arc::clone(&env.on_complete);
                vec![Effect::future(async move {
                    callback(&record);
                    None
                })]
            },
            BookingAction::SubmissionRejected(message)
            | BookingAction::SubmissionFailed(message) => {
                state.submitting = false;
                state.form_error = Some(message);
                vec![Effect::None]
            },
        }
    }
}
