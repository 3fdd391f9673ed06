mod health;
mod invoices;

pub use health::{health_check, readiness_check};
pub use invoices::generate_pdf;
