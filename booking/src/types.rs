//! Wire and domain types shared by the booking workflows
//!
//! These mirror the rental backend's REST payloads. Field names on the wire
//! are camelCase; serde rename attributes keep the Rust side idiomatic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Customer details collected in the first wizard step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIntake {
    /// Customer display name
    pub customer_name: String,
    /// Contact email
    pub customer_email: String,
    /// Contact phone
    pub customer_phone: String,
    /// Optional company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl CustomerIntake {
    /// Whether all required contact fields are filled in
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.customer_name.trim().is_empty()
            && !self.customer_email.trim().is_empty()
            && !self.customer_phone.trim().is_empty()
    }
}

/// One equipment entry from the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentCatalogItem {
    /// Server-assigned equipment id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Short inventory code, when the depot assigned one
    pub code: Option<String>,
    /// Category label used for filtering, when categorized
    pub category: Option<String>,
    /// Daily rental price
    pub daily_price: f64,
    /// Units the depot holds in total
    pub quantity: u32,
}

impl EquipmentCatalogItem {
    /// Case-insensitive match against a free-text filter
    ///
    /// Matches name, code, or category, as the catalog search box does.
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.trim().is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_ref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        self.name.to_lowercase().contains(&needle)
            || contains(&self.code)
            || contains(&self.category)
    }
}

/// A selected equipment line in the wizard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLineItem {
    /// Equipment id from the catalog
    pub equipment_id: u64,
    /// Display name (carried for shortfall messages and review)
    pub name: String,
    /// Requested unit count, never below 1
    pub quantity: u32,
    /// Daily price at selection time (display only; the server reprices)
    pub daily_price: f64,
}

/// Bulk availability request payload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// Requested rental start date
    pub start_date: NaiveDate,
    /// Requested rental end date
    pub end_date: NaiveDate,
    /// Equipment and quantities to check
    pub items: Vec<AvailabilityRequestItem>,
}

/// One line of an availability request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequestItem {
    /// Equipment id
    pub equipment_id: u64,
    /// Requested quantity
    pub quantity: u32,
}

/// Server verdict for a bulk availability check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// True only when every requested line can be fulfilled
    pub all_available: bool,
    /// Per-line verdicts, including shortfall quantities
    pub items: Vec<AvailabilityItem>,
}

/// Per-equipment availability verdict
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityItem {
    /// Equipment id
    pub equipment_id: u64,
    /// Display name echoed by the server
    pub name: String,
    /// Units actually free in the requested range
    pub available_quantity: u32,
    /// Units that were requested
    pub requested_quantity: u32,
    /// Whether this line can be fulfilled
    pub available: bool,
}

impl AvailabilityResult {
    /// Format unavailable lines as `name (available/requested)`, comma separated
    #[must_use]
    pub fn shortfall_summary(&self) -> String {
        self.items
            .iter()
            .filter(|item| !item.available)
            .map(|item| {
                format!(
                    "{} ({}/{})",
                    item.name, item.available_quantity, item.requested_quantity
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Reservation pricing request payload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPricingRequest {
    /// Rental start date
    pub start_date: NaiveDate,
    /// Rental end date
    pub end_date: NaiveDate,
    /// Selected equipment lines
    pub items: Vec<AvailabilityRequestItem>,
    /// Company the customer belongs to, for contract pricing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,
    /// Upper-cased discount code, when the customer entered one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

/// Server-computed reservation pricing
///
/// The server is authoritative for every figure here; the client renders
/// them without recomputation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    /// Per-equipment pricing lines
    pub items: Vec<PricingLine>,
    /// Sum of all line totals before discounts and tax
    pub subtotal: f64,
    /// Total discount applied
    pub discount_amount: f64,
    /// Tax amount
    pub tax_amount: f64,
    /// Final amount due
    pub total_amount: f64,
}

/// One equipment line of a server-computed reservation price
///
/// Review screens render `unit price × duration × quantity` per line from
/// these figures without recomputing them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingLine {
    /// Equipment display name
    pub equipment_name: String,
    /// Unit count
    pub quantity: u32,
    /// Billed rental length in days
    pub duration: u32,
    /// Daily price per unit
    pub unit_price: f64,
    /// Line total
    pub total_price: f64,
}

/// Payload for creating a reservation
///
/// Optional fields serialize only when present, matching the backend's
/// expectation that empty strings are omitted rather than sent.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    /// Customer contact details
    #[serde(flatten)]
    pub customer: CustomerIntake,
    /// Company the customer belongs to, for contract pricing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<u64>,
    /// Customer street address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    /// Rental start date
    pub start_date: NaiveDate,
    /// Rental end date
    pub end_date: NaiveDate,
    /// Selected equipment lines
    pub items: Vec<AvailabilityRequestItem>,
    /// Upper-cased discount code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    /// Whether delivery to the customer is required
    pub delivery_required: bool,
    /// Delivery address, required when delivery is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Delivery fee quoted to the customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    /// Pickup location for self-pickup reservations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    /// Agreed pickup time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    /// Agreed return time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_time: Option<String>,
    /// Return location, when it differs from pickup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_location: Option<String>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Special requests forwarded to the depot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// A reservation as returned by the server after creation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    /// Server-assigned reservation id
    pub id: u64,
    /// Human-readable reservation number
    pub reservation_number: String,
    /// Rental start date
    pub start_date: NaiveDate,
    /// Rental end date
    pub end_date: NaiveDate,
    /// Final amount due
    pub total_amount: f64,
    /// Current status label
    pub status: String,
}

/// Submission outcome envelope for reservation creation
///
/// The backend reports business rejections (conflicting bookings found
/// between check and submit, say) with `success: false` and a message,
/// while transport failures surface as errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationOutcome {
    /// Whether the reservation was created
    pub success: bool,
    /// The created reservation, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationRecord>,
    /// Server-provided rejection message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Single-item quote request for the standalone calculator
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Equipment to quote
    pub equipment_id: u64,
    /// Rental start date
    pub start_date: NaiveDate,
    /// Rental end date
    pub end_date: NaiveDate,
    /// Unit count
    pub quantity: u32,
    /// Validated promo code, when one was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

/// Server-computed quote for the calculator widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    /// Price before discounts
    pub base_price: f64,
    /// Individual discount lines
    pub discounts: Vec<DiscountLine>,
    /// Sum of all discounts
    pub total_discount: f64,
    /// Final price
    pub final_price: f64,
    /// Effective per-day price
    pub price_per_day: f64,
    /// Rental length in whole days
    pub duration_days: u32,
    /// Rental length in hours (sub-day rentals)
    pub duration_hours: u32,
    /// Names of pricing rules the server applied
    pub applied_rules: Vec<String>,
}

/// One named discount in a quote
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountLine {
    /// Discount rule name
    pub name: String,
    /// Discount amount
    pub amount: f64,
}

/// Server verdict for a promo code
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountValidation {
    /// Whether the code is applicable
    pub valid: bool,
    /// Human-readable description of the discount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Invoice lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Created, not yet sent
    Draft,
    /// Sent to the customer
    Sent,
    /// Fully paid
    Paid,
    /// Cancelled
    Cancelled,
}

/// An invoice row in list and detail views
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    /// Server-assigned invoice id
    pub id: u64,
    /// Human-readable invoice number
    pub invoice_number: String,
    /// Billed customer name
    pub customer_name: String,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Amount due
    pub total_amount: f64,
    /// Lifecycle status
    pub status: InvoiceStatus,
}

/// Payload for creating or updating an invoice
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    /// Billed customer name
    pub customer_name: String,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Amount due
    pub total_amount: f64,
    /// Lifecycle status
    pub status: InvoiceStatus,
}

/// Filter and paging parameters for invoice lists
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    /// Free-text search over number and customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Restrict to a single status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    /// Issue date lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Issue date upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Rows per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl InvoiceFilter {
    /// Stable fingerprint used as a cache key
    ///
    /// Two filters with the same fingerprint would produce the same server
    /// response, so cached pages can be shared between them.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "search={:?};status={:?};from={:?};to={:?};page={:?};size={:?}",
            self.search, self.status, self.from_date, self.to_date, self.page, self.page_size
        )
    }
}

/// A page of results from a list endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows in this page
    pub items: Vec<T>,
    /// Total rows matching the filter
    pub total: u64,
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
}

/// Export file format for list downloads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Excel workbook
    Excel,
    /// PDF document
    Pdf,
}

impl ExportFormat {
    /// File extension for generated downloads
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    /// Wire value for the export endpoint's format parameter
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Pdf => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code: literal dates and JSON always parse

    use super::*;

    #[test]
    fn incomplete_customer_is_detected() {
        let customer = CustomerIntake {
            customer_name: "Ayşe Demir".into(),
            customer_email: String::new(),
            customer_phone: "05321234567".into(),
            company_name: None,
        };
        assert!(!customer.is_complete());
    }

    #[test]
    fn whitespace_only_fields_do_not_count_as_filled() {
        let customer = CustomerIntake {
            customer_name: "   ".into(),
            customer_email: "ayse@example.com".into(),
            customer_phone: "05321234567".into(),
            company_name: None,
        };
        assert!(!customer.is_complete());
    }

    #[test]
    fn catalog_filter_matches_name_code_and_category() {
        let item = EquipmentCatalogItem {
            id: 7,
            name: "Mini Ekskavatör".into(),
            code: Some("EXC-07".into()),
            category: Some("İş Makinesi".into()),
            daily_price: 100.0,
            quantity: 5,
        };
        assert!(item.matches_filter("ekskavatör"));
        assert!(item.matches_filter("exc-07"));
        assert!(item.matches_filter("makine"));
        assert!(item.matches_filter(""));
        assert!(!item.matches_filter("vinç"));
    }

    #[test]
    fn catalog_filter_tolerates_missing_code_and_category() {
        let item = EquipmentCatalogItem {
            id: 8,
            name: "Jeneratör".into(),
            code: None,
            category: None,
            daily_price: 50.0,
            quantity: 2,
        };
        assert!(item.matches_filter("jeneratör"));
        assert!(!item.matches_filter("exc"));
    }

    #[test]
    fn catalog_item_decodes_the_wire_shape() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Mini Ekskavatör",
            "dailyPrice": 100.0,
            "quantity": 5
        });
        let item: EquipmentCatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.quantity, 5);
        assert!(item.code.is_none());
        assert!(item.category.is_none());
    }

    #[test]
    fn availability_result_decodes_the_wire_shape() {
        let json = serde_json::json!({
            "allAvailable": false,
            "items": [{
                "equipmentId": 7,
                "name": "Mini Ekskavatör",
                "availableQuantity": 1,
                "requestedQuantity": 3,
                "available": false
            }]
        });
        let result: AvailabilityResult = serde_json::from_value(json).unwrap();
        assert!(!result.all_available);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.shortfall_summary(), "Mini Ekskavatör (1/3)");
    }

    #[test]
    fn pricing_breakdown_decodes_the_wire_shape() {
        let json = serde_json::json!({
            "items": [{
                "equipmentName": "Mini Ekskavatör",
                "quantity": 2,
                "duration": 4,
                "unitPrice": 100.0,
                "totalPrice": 800.0
            }],
            "subtotal": 800.0,
            "discountAmount": 0.0,
            "taxAmount": 144.0,
            "totalAmount": 944.0
        });
        let breakdown: PricingBreakdown = serde_json::from_value(json).unwrap();
        assert_eq!(breakdown.subtotal, 800.0);
        assert_eq!(breakdown.items[0].total_price, 800.0);
        assert_eq!(breakdown.items[0].duration, 4);
    }

    #[test]
    fn shortfall_summary_lists_every_unavailable_line() {
        let result = AvailabilityResult {
            all_available: false,
            items: vec![
                AvailabilityItem {
                    equipment_id: 1,
                    name: "Jeneratör".into(),
                    available_quantity: 1,
                    requested_quantity: 3,
                    available: false,
                },
                AvailabilityItem {
                    equipment_id: 2,
                    name: "Kompresör".into(),
                    available_quantity: 2,
                    requested_quantity: 2,
                    available: true,
                },
                AvailabilityItem {
                    equipment_id: 3,
                    name: "Vinç".into(),
                    available_quantity: 0,
                    requested_quantity: 1,
                    available: false,
                },
            ],
        };
        assert_eq!(result.shortfall_summary(), "Jeneratör (1/3), Vinç (0/1)");
    }

    #[test]
    fn draft_omits_empty_optional_fields() {
        let draft = ReservationDraft {
            customer: CustomerIntake {
                customer_name: "Ali Kaya".into(),
                customer_email: "ali@example.com".into(),
                customer_phone: "05551112233".into(),
                company_name: None,
            },
            company_id: None,
            customer_address: None,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            items: vec![AvailabilityRequestItem {
                equipment_id: 7,
                quantity: 2,
            }],
            discount_code: None,
            delivery_required: false,
            delivery_address: None,
            delivery_fee: None,
            pickup_location: None,
            pickup_time: None,
            return_time: None,
            return_location: None,
            notes: None,
            special_requests: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("notes").is_none());
        assert!(json.get("discountCode").is_none());
        assert!(json.get("pickupTime").is_none());
        assert!(json.get("deliveryFee").is_none());
        assert_eq!(json["customerName"], "Ali Kaya");
        assert_eq!(json["deliveryRequired"], false);
        assert_eq!(json["startDate"], "2025-06-01");
    }

    #[test]
    fn filter_fingerprint_distinguishes_different_filters() {
        let a = InvoiceFilter {
            search: Some("acme".into()),
            ..InvoiceFilter::default()
        };
        let b = InvoiceFilter {
            search: Some("other".into()),
            ..InvoiceFilter::default()
        };
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }
}
