//! Invoice PDF renderer.
//!
//! Lays out a validated invoice on A4 pages: document header, the two
//! party blocks, the itemized table (paginated with repeated column
//! headers), the totals block and the optional payment note. Output is
//! deterministic: metadata dates are pinned so the same invoice always
//! renders to the same bytes.

use crate::models::{DisplayFlags, Invoice, LineItem, DATE_FORMAT};
use crate::services::text;
use printpdf::{
    BuiltinFont, Color, CustomPdfConformance, IndirectFontRef, Line, Mm, PdfConformance,
    PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("text contains a character outside the supported character set: {0:?}")]
    UnencodableCharacter(char),

    #[error("pdf emission failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

// Page geometry (A4 portrait, millimetres).
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const CONTENT_LEFT: f32 = MARGIN;
const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN;
const CONTENT_WIDTH: f32 = CONTENT_RIGHT - CONTENT_LEFT;
const PAGE_TOP: f32 = PAGE_HEIGHT - 20.0;
const PAGE_BOTTOM: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 11.0;
const LINE_PITCH: f32 = 5.0;
const ROW_PITCH: f32 = 6.5;
const CELL_GAP: f32 = 1.5;

// Fixed widths for the optional columns; description absorbs the rest.
const QUANTITY_WIDTH: f32 = 18.0;
const RATE_WIDTH: f32 = 28.0;
const AMOUNT_WIDTH: f32 = 30.0;
const NOTE_WIDTH: f32 = 38.0;

const TOTALS_LABEL_RIGHT: f32 = CONTENT_RIGHT - 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Description,
    Quantity,
    Rate,
    Amount,
    Note,
}

impl ColumnKind {
    fn label(self) -> &'static str {
        match self {
            ColumnKind::Description => "Item",
            ColumnKind::Quantity => "Quantity",
            ColumnKind::Rate => "Rate",
            ColumnKind::Amount => "Amount",
            ColumnKind::Note => "Note",
        }
    }

    fn numeric(self) -> bool {
        matches!(
            self,
            ColumnKind::Quantity | ColumnKind::Rate | ColumnKind::Amount
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub(crate) kind: ColumnKind,
    x: f32,
    width: f32,
}

/// Column plan for the item table. Description and note are always
/// present; the numeric columns follow the display flags, in the fixed
/// order description, quantity, rate, amount, note.
pub(crate) fn table_columns(flags: DisplayFlags) -> Vec<Column> {
    let mut tail = NOTE_WIDTH;
    if flags.show_quantity {
        tail += QUANTITY_WIDTH;
    }
    if flags.show_rate {
        tail += RATE_WIDTH;
    }
    if flags.show_amount {
        tail += AMOUNT_WIDTH;
    }

    let mut columns = Vec::with_capacity(5);
    let mut x = CONTENT_LEFT;

    columns.push(Column {
        kind: ColumnKind::Description,
        x,
        width: CONTENT_WIDTH - tail,
    });
    x += CONTENT_WIDTH - tail;

    if flags.show_quantity {
        columns.push(Column {
            kind: ColumnKind::Quantity,
            x,
            width: QUANTITY_WIDTH,
        });
        x += QUANTITY_WIDTH;
    }
    if flags.show_rate {
        columns.push(Column {
            kind: ColumnKind::Rate,
            x,
            width: RATE_WIDTH,
        });
        x += RATE_WIDTH;
    }
    if flags.show_amount {
        columns.push(Column {
            kind: ColumnKind::Amount,
            x,
            width: AMOUNT_WIDTH,
        });
        x += AMOUNT_WIDTH;
    }

    columns.push(Column {
        kind: ColumnKind::Note,
        x,
        width: NOTE_WIDTH,
    });

    columns
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

fn encode(text: &str) -> Result<String, RenderError> {
    text::encode(text).map_err(RenderError::UnencodableCharacter)
}

/// Collapses internal whitespace so a table cell never receives a line
/// break; address blocks split lines before reaching this point.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn draw_left(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn draw_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    right_edge: f32,
    y: f32,
    bold: bool,
) {
    let x = right_edge - text::width_mm(text, size, bold);
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn hline(layer: &PdfLayerReference, y: f32) {
    layer.set_outline_thickness(0.2);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(CONTENT_LEFT), Mm(y)), false),
            (Point::new(Mm(CONTENT_RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn set_gray(layer: &PdfLayerReference) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.35, 0.35, 0.35, None)));
}

fn set_black(layer: &PdfLayerReference) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}

/// Bold column labels with a rule underneath. Returns the baseline for
/// the first row below the header.
fn draw_table_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    columns: &[Column],
    y: f32,
) -> f32 {
    for column in columns {
        let label = column.kind.label();
        if column.kind.numeric() {
            draw_right(
                layer,
                &fonts.bold,
                label,
                BODY_SIZE,
                column.x + column.width - CELL_GAP,
                y,
                true,
            );
        } else {
            draw_left(layer, &fonts.bold, label, BODY_SIZE, column.x, y);
        }
    }
    hline(layer, y - 2.0);
    y - ROW_PITCH
}

fn draw_row(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    columns: &[Column],
    item: &LineItem,
    currency: &str,
    y: f32,
) -> Result<(), RenderError> {
    for column in columns {
        match column.kind {
            ColumnKind::Description => {
                let cell = encode(&single_line(&item.description))?;
                let cell = text::truncate_to_width(&cell, BODY_SIZE, false, column.width - CELL_GAP);
                draw_left(layer, &fonts.regular, &cell, BODY_SIZE, column.x, y);
            }
            ColumnKind::Quantity => {
                draw_right(
                    layer,
                    &fonts.regular,
                    &item.quantity.to_string(),
                    BODY_SIZE,
                    column.x + column.width - CELL_GAP,
                    y,
                    false,
                );
            }
            ColumnKind::Rate => {
                let cell = encode(&text::format_money(currency, item.rate))?;
                draw_right(
                    layer,
                    &fonts.regular,
                    &cell,
                    BODY_SIZE,
                    column.x + column.width - CELL_GAP,
                    y,
                    false,
                );
            }
            ColumnKind::Amount => {
                let cell = encode(&text::format_money(currency, item.amount()))?;
                draw_right(
                    layer,
                    &fonts.regular,
                    &cell,
                    BODY_SIZE,
                    column.x + column.width - CELL_GAP,
                    y,
                    false,
                );
            }
            ColumnKind::Note => {
                if let Some(note) = &item.note {
                    let cell = encode(&single_line(note))?;
                    let cell =
                        text::truncate_to_width(&cell, BODY_SIZE, false, column.width - CELL_GAP);
                    set_gray(layer);
                    draw_left(layer, &fonts.italic, &cell, BODY_SIZE, column.x + CELL_GAP, y);
                    set_black(layer);
                }
            }
        }
    }
    Ok(())
}

pub fn render(invoice: &Invoice) -> Result<Vec<u8>, RenderError> {
    let columns = table_columns(invoice.display);

    let (doc, first_page, first_layer) =
        PdfDocument::new(&invoice.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    // Pinned dates and a conformance level without XMP/ICC payloads keep
    // repeated renders byte-identical.
    let doc = doc
        .with_conformance(PdfConformance::Custom(CustomPdfConformance::default()))
        .with_creation_date(OffsetDateTime::UNIX_EPOCH)
        .with_mod_date(OffsetDateTime::UNIX_EPOCH)
        .with_metadata_date(OffsetDateTime::UNIX_EPOCH);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_TOP;

    // Document header: centered title, date on the right below it.
    let title = encode(&invoice.title)?;
    let title_x =
        (CONTENT_LEFT + (CONTENT_WIDTH - text::width_mm(&title, TITLE_SIZE, true)) / 2.0)
            .max(CONTENT_LEFT);
    draw_left(&layer, &fonts.bold, &title, TITLE_SIZE, title_x, y);
    y -= 8.0;

    let date_line = format!("Date: {}", invoice.invoice_date.format(DATE_FORMAT));
    draw_right(&layer, &fonts.regular, &date_line, BODY_SIZE, CONTENT_RIGHT, y, false);
    y -= 10.0;

    // Party blocks, side by side, internal line breaks preserved.
    let billed_by_lines = invoice
        .billed_by
        .lines()
        .map(encode)
        .collect::<Result<Vec<_>, _>>()?;
    let billed_to_lines = invoice
        .billed_to
        .lines()
        .map(encode)
        .collect::<Result<Vec<_>, _>>()?;

    let block_right_x = CONTENT_LEFT + CONTENT_WIDTH / 2.0 + 5.0;
    draw_left(&layer, &fonts.bold, "Billed By:", BODY_SIZE, CONTENT_LEFT, y);
    draw_left(&layer, &fonts.bold, "Billed To:", BODY_SIZE, block_right_x, y);
    y -= LINE_PITCH + 1.0;

    let block_height = billed_by_lines.len().max(billed_to_lines.len());
    for i in 0..block_height {
        let line_y = y - i as f32 * LINE_PITCH;
        if let Some(line) = billed_by_lines.get(i) {
            draw_left(&layer, &fonts.regular, line, BODY_SIZE, CONTENT_LEFT, line_y);
        }
        if let Some(line) = billed_to_lines.get(i) {
            draw_left(&layer, &fonts.regular, line, BODY_SIZE, block_right_x, line_y);
        }
    }
    y -= block_height as f32 * LINE_PITCH + 6.0;

    // Item table.
    y = draw_table_header(&layer, &fonts, &columns, y);

    for item in &invoice.items {
        if y < PAGE_BOTTOM + ROW_PITCH {
            let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_index);
            y = draw_table_header(&layer, &fonts, &columns, PAGE_TOP);
        }
        draw_row(&layer, &fonts, &columns, item, &invoice.currency, y)?;
        y -= ROW_PITCH;
    }

    hline(&layer, y + ROW_PITCH - 2.5);
    y -= 4.0;

    // Totals block on the right; the page break here never repeats the
    // column headers since the table itself has ended.
    let totals_height = 3.0 * ROW_PITCH + 12.0;
    if y - totals_height < PAGE_BOTTOM {
        let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        layer = doc.get_page(page).get_layer(layer_index);
        y = PAGE_TOP;
    }

    let subtotal = encode(&text::format_money(&invoice.currency, invoice.subtotal))?;
    draw_right(&layer, &fonts.regular, "Subtotal", TOTAL_SIZE, TOTALS_LABEL_RIGHT, y, false);
    draw_right(&layer, &fonts.regular, &subtotal, TOTAL_SIZE, CONTENT_RIGHT, y, false);
    y -= ROW_PITCH;

    if invoice.deposit > rust_decimal::Decimal::ZERO {
        let deposit = encode(&text::format_money(&invoice.currency, invoice.deposit))?;
        draw_right(&layer, &fonts.regular, "Deposit", TOTAL_SIZE, TOTALS_LABEL_RIGHT, y, false);
        draw_right(&layer, &fonts.regular, &deposit, TOTAL_SIZE, CONTENT_RIGHT, y, false);
        y -= ROW_PITCH;
    }

    let balance = encode(&text::format_money(&invoice.currency, invoice.balance_due))?;
    draw_right(&layer, &fonts.bold, "Balance Due", TOTAL_SIZE, TOTALS_LABEL_RIGHT, y, true);
    draw_right(&layer, &fonts.bold, &balance, TOTAL_SIZE, CONTENT_RIGHT, y, true);
    y -= ROW_PITCH + 4.0;

    if let Some(cash_note) = &invoice.cash_note {
        set_gray(&layer);
        for line in cash_note.lines() {
            if y < PAGE_BOTTOM {
                let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(layer_index);
                // Fill color is per-layer graphics state.
                set_gray(&layer);
                y = PAGE_TOP;
            }
            let line = encode(line)?;
            draw_left(&layer, &fonts.italic, &line, BODY_SIZE, CONTENT_LEFT, y);
            y -= LINE_PITCH;
        }
        set_black(&layer);
    }

    doc.save_to_bytes().map_err(RenderError::from)
}
