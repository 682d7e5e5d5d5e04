//! Standalone price calculator
//!
//! A single-equipment quote tool: any date or quantity edit triggers a fresh
//! server calculation, superseding whichever calculation is still in flight
//! (keyed cancellable effects). Promo codes are validated server-side before
//! they are allowed to influence a quote.

use std::sync::Arc;

use chrono::NaiveDate;

use rentflow_core::effect::{Effect, EffectKey};
use rentflow_core::reducer::Reducer;

use crate::api::RentalApi;
use crate::types::{QuoteBreakdown, QuoteRequest};

/// Cancellation key shared by all quote calculations of one widget instance
pub const QUOTE_CALC_KEY: EffectKey = EffectKey("pricing.quote");

/// Dependencies for the calculator widget
#[derive(Clone)]
pub struct QuoteEnvironment {
    /// Rental backend
    pub api: Arc<dyn RentalApi>,
}

/// Calculator widget state
#[derive(Clone, Debug)]
pub struct QuoteState {
    /// Equipment being quoted
    pub equipment_id: u64,
    /// Rental start date
    pub start_date: Option<NaiveDate>,
    /// Rental end date
    pub end_date: Option<NaiveDate>,
    /// Unit count, never below 1
    pub quantity: u32,
    /// Promo code input field
    pub promo_code: String,
    /// Promo code accepted by the server, forwarded with quote requests
    pub applied_promo: Option<String>,
    /// Rejection or validation-failure message for the promo field
    pub promo_error: Option<String>,
    /// Date validation message
    pub validation_error: Option<String>,
    /// Latest server quote
    pub breakdown: Option<QuoteBreakdown>,
    /// In-flight flag for the quote calculation
    pub calculating: bool,
    /// In-flight flag for promo validation
    pub validating_promo: bool,
}

impl QuoteState {
    /// Fresh widget for the given equipment
    #[must_use]
    pub const fn new(equipment_id: u64) -> Self {
        Self {
            equipment_id,
            start_date: None,
            end_date: None,
            quantity: 1,
            promo_code: String::new(),
            applied_promo: None,
            promo_error: None,
            validation_error: None,
            breakdown: None,
            calculating: false,
            validating_promo: false,
        }
    }
}

/// Calculator widget actions
#[derive(Clone, Debug)]
pub enum QuoteAction {
    // === Commands ===
    /// Edit the start date (auto-triggers recalculation)
    SetStartDate(Option<NaiveDate>),
    /// Edit the end date (auto-triggers recalculation)
    SetEndDate(Option<NaiveDate>),
    /// Edit the quantity (values below 1 rejected; auto-triggers recalculation)
    SetQuantity(u32),
    /// Edit the promo code input
    SetPromoCode(String),
    /// Validate the entered promo code against the server
    ApplyPromo,
    /// Explicitly request a calculation
    Calculate,

    // === Events ===
    /// Quote arrived
    QuoteCalculated(QuoteBreakdown),
    /// Quote request failed (user-facing message)
    QuoteFailed(String),
    /// The server accepted the promo code
    PromoAccepted(String),
    /// The server rejected the promo code
    PromoRejected,
    /// Promo validation request failed
    PromoCheckFailed,
}

/// The calculator reducer
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteReducer;

/// Date gate for every calculation attempt
fn validate_dates(state: &QuoteState) -> Result<(NaiveDate, NaiveDate), String> {
    let (Some(start), Some(end)) = (state.start_date, state.end_date) else {
        return Err("Başlangıç ve bitiş tarihi gerekli".to_owned());
    };
    if end <= start {
        return Err("Bitiş tarihi başlangıç tarihinden sonra olmalı".to_owned());
    }
    Ok((start, end))
}

/// Start (or restart) a quote calculation if the inputs validate
///
/// Returns the cancellable effect, or a `CancelKey` effect after recording
/// the validation error in state.
fn recalculate(state: &mut QuoteState, env: &QuoteEnvironment) -> Effect<QuoteAction> {
    match validate_dates(state) {
        Ok((start_date, end_date)) => {
            state.validation_error = None;
            state.calculating = true;

            let api = Arc::clone(&env.api);
            let request = QuoteRequest {
                equipment_id: state.equipment_id,
                start_date,
                end_date,
                quantity: state.quantity,
                promo_code: state.applied_promo.clone(),
            };
            Effect::cancellable(QUOTE_CALC_KEY, async move {
                match api.calculate_quote(&request).await {
                    Ok(breakdown) => Some(QuoteAction::QuoteCalculated(breakdown)),
                    Err(err) => Some(QuoteAction::QuoteFailed(
                        err.user_message("Fiyat hesaplanamadı"),
                    )),
                }
            })
        },
        Err(message) => {
            state.validation_error = Some(message);
            state.calculating = false;
            // An in-flight calculation for the now-invalid inputs must not land
            Effect::CancelKey(QUOTE_CALC_KEY)
        },
    }
}

impl Reducer for QuoteReducer {
    type State = QuoteState;
    type Action = QuoteAction;
    type Environment = QuoteEnvironment;

    fn reduce(
        &self,
        state: &mut QuoteState,
        action: QuoteAction,
        env: &QuoteEnvironment,
    ) -> Vec<Effect<QuoteAction>> {
        match action {
            QuoteAction::SetStartDate(date) => {
                state.start_date = date;
                vec![recalculate(state, env)]
            },
            QuoteAction::SetEndDate(date) => {
                state.end_date = date;
                vec![recalculate(state, env)]
            },
            QuoteAction::SetQuantity(quantity) => {
                if quantity < 1 {
                    return vec![Effect::None];
                }
                state.quantity = quantity;
                vec![recalculate(state, env)]
            },
            QuoteAction::Calculate => vec![recalculate(state, env)],

            QuoteAction::QuoteCalculated(breakdown) => {
                state.calculating = false;
                state.breakdown = Some(breakdown);
                vec![Effect::None]
            },
            QuoteAction::QuoteFailed(message) => {
                state.calculating = false;
                state.validation_error = Some(message);
                vec![Effect::None]
            },

            QuoteAction::SetPromoCode(code) => {
                state.promo_code = code;
                state.promo_error = None;
                vec![Effect::None]
            },
            QuoteAction::ApplyPromo => {
                let code = state.promo_code.trim().to_uppercase();
                if code.is_empty() || state.validating_promo {
                    return vec![Effect::None];
                }
                state.validating_promo = true;
                state.promo_error = None;

                let api = Arc::clone(&env.api);
                vec![Effect::future(async move {
                    match api.validate_discount(&code).await {
                        Ok(validation) if validation.valid => {
                            Some(QuoteAction::PromoAccepted(code))
                        },
                        Ok(_) => Some(QuoteAction::PromoRejected),
                        Err(_) => Some(QuoteAction::PromoCheckFailed),
                    }
                })]
            },
            QuoteAction::PromoAccepted(code) => {
                state.validating_promo = false;
                state.applied_promo = Some(code);
                state.promo_error = None;
                // A fresh quote reflecting the discount
                vec![recalculate(state, env)]
            },
            QuoteAction::PromoRejected => {
                // A rejected code is cleared so the next calculation runs
                // without it.
                state.validating_promo = false;
                state.promo_code.clear();
                state.applied_promo = None;
                state.promo_error = Some("Geçersiz kod".to_owned());
                vec![Effect::None]
            },
            QuoteAction::PromoCheckFailed => {
                state.validating_promo = false;
                state.promo_code.clear();
                state.applied_promo = None;
                state.promo_error = Some("Kod doğrulanamadı".to_owned());
                vec![Effect::None]
            },
        }
    }
}
