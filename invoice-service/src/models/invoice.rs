//! Normalized invoice model.

use crate::models::LineItem;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Wire and display format for the invoice date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Toggles for the optional item table columns. The description and note
/// columns are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    pub show_quantity: bool,
    pub show_rate: bool,
    pub show_amount: bool,
}

/// Validated invoice, ready for rendering. Built fresh per request and
/// discarded once the PDF bytes are produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub title: String,
    pub invoice_date: NaiveDate,
    pub billed_by: String,
    pub billed_to: String,
    pub currency: String,
    pub cash_note: Option<String>,
    pub deposit: Decimal,
    pub display: DisplayFlags,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    /// Subtotal minus deposit. May be negative when the deposit exceeds
    /// the subtotal; rendered as-is, never clamped.
    pub balance_due: Decimal,
}

impl Invoice {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: String,
        invoice_date: NaiveDate,
        billed_by: String,
        billed_to: String,
        currency: String,
        cash_note: Option<String>,
        deposit: Decimal,
        display: DisplayFlags,
        items: Vec<LineItem>,
    ) -> Self {
        let subtotal: Decimal = items.iter().map(LineItem::amount).sum();
        let balance_due = subtotal - deposit;

        Invoice {
            title,
            invoice_date,
            billed_by,
            billed_to,
            currency,
            cash_note,
            deposit,
            display,
            items,
            subtotal,
            balance_due,
        }
    }
}
