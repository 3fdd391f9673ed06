use crate::dtos::GeneratePdfRequest;
use crate::error::AppError;
use crate::models::Invoice;
use crate::services::{renderer, validation};
use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::IntoResponse,
    Json,
};

pub async fn generate_pdf(
    payload: Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Malformed or non-JSON bodies get the same { "error" } shape as every
    // other failure instead of axum's plain-text rejection.
    let Json(request) = payload.map_err(|e| AppError::BadRequest(anyhow::anyhow!("{}", e)))?;

    let invoice = validation::validate(request)?;

    tracing::info!(
        items = invoice.items.len(),
        pages_hint = invoice.items.len() / 30 + 1,
        "rendering invoice"
    );

    let filename = attachment_filename(&invoice);
    let pdf = renderer::render(&invoice)?;

    tracing::info!(bytes = pdf.len(), "invoice rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    ))
}

/// Download name derived from the first line of the recipient block,
/// reduced to characters that are safe inside a quoted header value.
fn attachment_filename(invoice: &Invoice) -> String {
    let name: String = invoice
        .billed_to
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        .collect();

    if name.is_empty() {
        "invoice.pdf".to_string()
    } else {
        format!("invoice_{}.pdf", name)
    }
}
