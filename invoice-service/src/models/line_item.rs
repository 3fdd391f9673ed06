//! Line item model for invoice-service.

use rust_decimal::Decimal;

/// Line item on an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub rate: Decimal,
    pub note: Option<String>,
}

impl LineItem {
    /// Extended amount for the row, computed exactly.
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.rate
    }
}
