//! Request validation and normalization.
//!
//! Pure function of the incoming DTO: checks required fields and numeric
//! domains, trims text, and computes the derived totals. No rendering work
//! starts until validation has passed.

use crate::dtos::GeneratePdfRequest;
use crate::models::{DisplayFlags, Invoice, LineItem, DATE_FORMAT};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invoice must contain at least one line item")]
    EmptyItemList,

    #[error("line item {index}: quantity must be a positive integer")]
    InvalidQuantity { index: usize },

    #[error("line item {index}: rate must be a non-negative number")]
    InvalidRate { index: usize },

    #[error("deposit must be a non-negative number")]
    InvalidDeposit,

    #[error("invoice_date must be a calendar date in YYYY-MM-DD format")]
    InvalidDate,
}

pub fn validate(raw: GeneratePdfRequest) -> Result<Invoice, ValidationError> {
    let title = required_text(raw.title, "title")?;
    let billed_to = required_multiline(raw.billed_to, "billed_to")?;
    let currency = required_text(raw.currency, "currency")?;

    let invoice_date = required_text(raw.invoice_date, "invoice_date")?;
    let invoice_date = NaiveDate::parse_from_str(&invoice_date, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate)?;

    // Issuer block is free text and may legitimately be empty.
    let billed_by = raw
        .billed_by
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let cash_note = optional_text(raw.cash_note);

    let deposit = raw.deposit.unwrap_or(Decimal::ZERO);
    if deposit < Decimal::ZERO {
        return Err(ValidationError::InvalidDeposit);
    }

    let mut items = Vec::with_capacity(raw.items.len());
    for (index, row) in raw.items.into_iter().enumerate() {
        let description = row.item.as_deref().map(str::trim).unwrap_or("");
        if description.is_empty() {
            // Form rows without an item name are discarded, not rejected.
            continue;
        }

        let quantity = match row.quantity {
            None => 1,
            Some(q) => {
                if q < Decimal::ONE || !q.fract().is_zero() {
                    return Err(ValidationError::InvalidQuantity { index });
                }
                q.to_u32()
                    .ok_or(ValidationError::InvalidQuantity { index })?
            }
        };

        let rate = row.rate.unwrap_or(Decimal::ZERO);
        if rate < Decimal::ZERO {
            return Err(ValidationError::InvalidRate { index });
        }

        items.push(LineItem {
            description: description.to_string(),
            quantity: quantity as u32,
            rate,
            note: optional_text(row.note),
        });
    }

    if items.is_empty() {
        return Err(ValidationError::EmptyItemList);
    }

    Ok(Invoice::new(
        title,
        invoice_date,
        billed_by,
        billed_to,
        currency,
        cash_note,
        deposit,
        DisplayFlags {
            show_quantity: raw.show_quantity,
            show_rate: raw.show_rate,
            show_amount: raw.show_amount,
        },
        items,
    ))
}

fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Like `required_text` but preserves internal line breaks, trimming only
/// the outer whitespace of the block.
fn required_multiline(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_matches('\n')
            .to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::LineItemRequest;
    use serde_json::json;

    fn request(value: serde_json::Value) -> GeneratePdfRequest {
        serde_json::from_value(value).expect("request should deserialize")
    }

    fn base_request() -> serde_json::Value {
        json!({
            "title": "Invoice",
            "invoice_date": "2026-01-15",
            "billed_by": "Acme Ltd\n1 High Street",
            "billed_to": "Jane Doe\n2 Low Road",
            "currency": "£",
            "deposit": 30,
            "items": [
                { "item": "Consult", "quantity": 2, "rate": 50, "note": "" }
            ]
        })
    }

    #[test]
    fn computes_subtotal_and_balance_due() {
        let invoice = validate(request(base_request())).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(100));
        assert_eq!(invoice.balance_due, Decimal::from(70));
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].amount(), Decimal::from(100));
    }

    #[test]
    fn balance_due_may_be_negative() {
        let mut raw = base_request();
        raw["deposit"] = json!(150);

        let invoice = validate(request(raw)).unwrap();
        assert_eq!(invoice.balance_due, Decimal::from(-50));
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let mut raw = base_request();
        raw["items"] = json!([]);

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::EmptyItemList)
        );
    }

    #[test]
    fn rows_without_an_item_name_are_dropped() {
        let mut raw = base_request();
        raw["items"] = json!([
            { "item": "  ", "quantity": 1, "rate": 10 },
            { "item": "Kept", "quantity": 1, "rate": 10 }
        ]);

        let invoice = validate(request(raw)).unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].description, "Kept");
    }

    #[test]
    fn all_blank_rows_count_as_empty_list() {
        let mut raw = base_request();
        raw["items"] = json!([{ "item": "", "quantity": 1, "rate": 10 }]);

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::EmptyItemList)
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut raw = base_request();
        raw["items"][0]["quantity"] = json!(0);

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::InvalidQuantity { index: 0 })
        );
    }

    #[test]
    fn fractional_quantity_is_rejected() {
        let mut raw = base_request();
        raw["items"][0]["quantity"] = json!(2.5);

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::InvalidQuantity { index: 0 })
        );
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut raw = base_request();
        raw["items"][0]["rate"] = json!(-1);

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::InvalidRate { index: 0 })
        );
    }

    #[test]
    fn negative_deposit_is_rejected() {
        let mut raw = base_request();
        raw["deposit"] = json!(-10);

        assert_eq!(validate(request(raw)), Err(ValidationError::InvalidDeposit));
    }

    #[test]
    fn missing_required_fields_are_named() {
        for field in ["title", "billed_to", "currency", "invoice_date"] {
            let mut raw = base_request();
            raw.as_object_mut().unwrap().remove(field);

            assert_eq!(
                validate(request(raw)),
                Err(ValidationError::MissingField(field)),
                "field {field}"
            );
        }
    }

    #[test]
    fn blank_title_is_missing() {
        let mut raw = base_request();
        raw["title"] = json!("   ");

        assert_eq!(
            validate(request(raw)),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut raw = base_request();
        raw["invoice_date"] = json!("15/01/2026");

        assert_eq!(validate(request(raw)), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn strings_are_trimmed_and_line_breaks_preserved() {
        let mut raw = base_request();
        raw["title"] = json!("  Invoice  ");
        raw["billed_to"] = json!("Jane Doe  \n2 Low Road\n");
        raw["items"][0]["note"] = json!("   ");

        let invoice = validate(request(raw)).unwrap();
        assert_eq!(invoice.title, "Invoice");
        assert_eq!(invoice.billed_to, "Jane Doe\n2 Low Road");
        assert_eq!(invoice.items[0].note, None);
    }

    #[test]
    fn quantity_defaults_to_one_and_rate_to_zero() {
        let raw = GeneratePdfRequest {
            items: vec![LineItemRequest {
                item: Some("Thing".to_string()),
                quantity: None,
                rate: None,
                note: None,
            }],
            ..request(base_request())
        };

        let invoice = validate(raw).unwrap();
        assert_eq!(invoice.items[0].quantity, 1);
        assert_eq!(invoice.items[0].rate, Decimal::ZERO);
        assert_eq!(invoice.subtotal, Decimal::ZERO);
    }

    #[test]
    fn display_flags_default_to_all_shown() {
        let mut raw = base_request();
        raw.as_object_mut().unwrap().remove("deposit");

        let invoice = validate(request(raw)).unwrap();
        assert!(invoice.display.show_quantity);
        assert!(invoice.display.show_rate);
        assert!(invoice.display.show_amount);
        assert_eq!(invoice.deposit, Decimal::ZERO);
    }

    #[test]
    fn fractional_rates_stay_exact() {
        let mut raw = base_request();
        raw["items"] = json!([
            { "item": "A", "quantity": 3, "rate": "19.99" },
            { "item": "B", "quantity": 1, "rate": "0.01" }
        ]);
        raw["deposit"] = json!("60.00");

        let invoice = validate(request(raw)).unwrap();
        assert_eq!(invoice.subtotal, "59.98".parse::<Decimal>().unwrap());
        assert_eq!(invoice.balance_due, "-0.02".parse::<Decimal>().unwrap());
    }
}
