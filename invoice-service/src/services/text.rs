//! Text handling for the builtin Helvetica faces: WinAnsi repertoire
//! checks, legacy transliteration, advance-width measurement and money
//! formatting.

use rust_decimal::Decimal;

/// Helvetica advance widths for ASCII 32..=126 in 1/1000 em units
/// (Adobe AFM data).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126 in 1/1000 em units.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Currency symbols and other non-ASCII glyphs are close to a digit width.
const DEFAULT_WIDTH: u16 = 556;

const PT_TO_MM: f32 = 25.4 / 72.0;

fn char_width(ch: char, bold: bool) -> u16 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        let index = (code - 32) as usize;
        if bold {
            HELVETICA_BOLD_WIDTHS[index]
        } else {
            HELVETICA_WIDTHS[index]
        }
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in millimetres at the given point size.
pub(super) fn width_mm(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|ch| char_width(ch, bold) as u32).sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

/// Letters the legacy generator substituted because the builtin font
/// encoding has no glyph for them.
fn transliterate(ch: char) -> Option<&'static str> {
    match ch {
        'ı' => Some("i"),
        'İ' => Some("I"),
        'ş' => Some("s"),
        'Ş' => Some("S"),
        'ğ' => Some("g"),
        'Ğ' => Some("G"),
        _ => None,
    }
}

fn is_winansi(ch: char) -> bool {
    matches!(ch, ' '..='~')
        || ('\u{00A0}'..='\u{00FF}').contains(&ch)
        || matches!(
            ch,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž'
                | '‘' | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ'
                | 'ž' | 'Ÿ'
        )
}

/// Prepares a single line of text for the builtin font: transliterates the
/// legacy substitutions and rejects anything the WinAnsi encoding cannot
/// represent.
pub(super) fn encode(text: &str) -> Result<String, char> {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(mapped) = transliterate(ch) {
            out.push_str(mapped);
        } else if is_winansi(ch) {
            out.push(ch);
        } else {
            return Err(ch);
        }
    }
    Ok(out)
}

/// Formats a monetary value as `<symbol><sign><grouped>.<2dp>`, matching
/// the document's uniform currency style.
pub(super) fn format_money(symbol: &str, value: Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2));
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{}", symbol, sign, grouped, dec_part)
}

/// Truncates `text` with an ellipsis so it fits within `max_width` mm.
pub(super) fn truncate_to_width(text: &str, size: f32, bold: bool, max_width: f32) -> String {
    if width_mm(text, size, bold) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = width_mm("...", size, bold);
    if ellipsis_width > max_width {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0.0;
    for ch in text.chars() {
        let w = char_width(ch, bold) as f32 / 1000.0 * size * PT_TO_MM;
        if used + w + ellipsis_width > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}
