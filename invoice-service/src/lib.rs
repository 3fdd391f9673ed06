//! Proforma invoice PDF service.
//!
//! Accepts an invoice description over HTTP, validates it, computes the
//! derived totals and renders a downloadable PDF document.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
