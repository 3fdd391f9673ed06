//! Request DTOs for the generate-pdf endpoint.
//!
//! Required fields are deserialized as `Option` so the validator owns the
//! missing-field taxonomy instead of serde producing opaque rejections.

use rust_decimal::Decimal;
use serde::Deserialize;

fn default_true() -> bool {
    true
}

/// Caller-supplied invoice description.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePdfRequest {
    pub title: Option<String>,
    pub invoice_date: Option<String>,
    pub billed_by: Option<String>,
    pub billed_to: Option<String>,
    pub currency: Option<String>,
    pub cash_note: Option<String>,
    pub deposit: Option<Decimal>,
    #[serde(default = "default_true")]
    pub show_quantity: bool,
    #[serde(default = "default_true")]
    pub show_rate: bool,
    #[serde(default = "default_true")]
    pub show_amount: bool,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

/// One row of the item table as submitted by the caller. `quantity`
/// deserializes as a decimal so a fractional value reaches the validator
/// instead of dying in serde as an opaque bad request.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub item: Option<String>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub note: Option<String>,
}
