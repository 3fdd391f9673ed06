//! Domain models for invoice-service.

mod invoice;
mod line_item;

pub use invoice::{DisplayFlags, Invoice, DATE_FORMAT};
pub use line_item::LineItem;
