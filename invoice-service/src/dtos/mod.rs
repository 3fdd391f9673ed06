mod invoices;

pub use invoices::{GeneratePdfRequest, LineItemRequest};
