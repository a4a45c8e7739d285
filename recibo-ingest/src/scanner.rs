//! Receipt text scanner: a single-pass state machine over extracted
//! receipt lines.
//!
//! Expected layout (Mercadona-style tickets after PDF-to-text):
//!
//!   MERCADONA, S.A.
//!   01/02/2024 18:32  OP: 123456
//!   Descripción P. Unit Importe
//!   2 Leche Entera 1,20 2,40
//!   1 Pan integral 1,50
//!   TOTAL (€) 3,90
//!
//! A date-time line updates the timestamp carried by every subsequent
//! record. The section marker opens the item section, "TOTAL" ends the
//! document. Lines that fail item parsing are dropped silently; a scan
//! never fails mid-document.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use recibo_core::{Categories, ItemRecord, classify};
use regex::Regex;

/// Header line that opens the product section.
pub const SECTION_MARKER: &str = "Descripción P. Unit Importe";

/// Line that ends the product section and the whole scan.
pub const TERMINATOR: &str = "TOTAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Scanning for the product-section marker
    Seeking,
    /// Reading item lines
    InItems,
    /// Terminator reached; remaining lines are not examined
    Done,
}

/// Scan one receipt's extracted text into item records, classifying each
/// description against `categories`.
///
/// The `Result` covers regex compilation only; scanning itself always runs
/// to the end of the document (or its terminator).
pub fn scan_receipt_text(text: &str, categories: &Categories) -> Result<Vec<ItemRecord>> {
    scan_receipt_text_with_markers(text, categories, SECTION_MARKER, TERMINATOR)
}

/// Same as [`scan_receipt_text`] with the section marker and terminator
/// overridable, for receipt layouts that label the columns differently.
pub fn scan_receipt_text_with_markers(
    text: &str,
    categories: &Categories,
    section_marker: &str,
    terminator: &str,
) -> Result<Vec<ItemRecord>> {
    let datetime_re = Regex::new(r"(\d{2}/\d{2}/\d{4}) (\d{2}:\d{2})")?;
    let price_re = Regex::new(r"\d+,\d{2}")?;

    let mut state = ScanState::Seeking;
    let mut date: Option<NaiveDate> = None;
    let mut time: Option<NaiveTime> = None;
    let mut records = Vec::new();

    for line in text.lines() {
        // Precedence per line: date-time > section marker > terminator > item.
        if let Some(caps) = datetime_re.captures(line) {
            // A date-time line is consumed even while in the item section.
            // An impossible calendar date leaves the current stamp untouched.
            if let (Ok(d), Ok(t)) = (
                NaiveDate::parse_from_str(&caps[1], "%d/%m/%Y"),
                NaiveTime::parse_from_str(&caps[2], "%H:%M"),
            ) {
                date = Some(d);
                time = Some(t);
            }
            continue;
        }

        if line.contains(section_marker) {
            state = ScanState::InItems;
            continue;
        }

        if line.contains(terminator) {
            // ends the whole document, not just the item section
            state = ScanState::Done;
        }
        if state == ScanState::Done {
            break;
        }

        if state != ScanState::InItems {
            continue;
        }

        if let Some(record) = parse_item_line(line, &price_re, categories, date, time) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Parse one line inside the item section. `None` means the line is not an
/// item (no price token, no leading quantity, or a bad numeric) and is
/// skipped without producing a partial record.
fn parse_item_line(
    line: &str,
    price_re: &Regex,
    categories: &Categories,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Option<ItemRecord> {
    let prices: Vec<regex::Match> = price_re.find_iter(line).collect();
    let total = *prices.last()?;
    let unit = (prices.len() >= 2).then(|| prices[prices.len() - 2]);

    // Leading run of digits is the quantity; anything else is not an item.
    let quantity_len = line.bytes().take_while(u8::is_ascii_digit).count();
    if quantity_len == 0 {
        return None;
    }
    let quantity: u32 = line[..quantity_len].parse().ok()?;
    if quantity == 0 {
        return None;
    }

    // Description runs from the quantity prefix to the first trailing price
    // token (the unit price when both are present).
    let description_end = unit.map_or(total.start(), |m| m.start());
    if description_end < quantity_len {
        return None;
    }
    let description = line[quantity_len..description_end].trim().to_string();

    let total_price = parse_price(total.as_str())?;
    let unit_price = match unit {
        Some(m) => Some(parse_price(m.as_str())?),
        None => None,
    };

    let category = classify(&description, categories);
    Some(ItemRecord {
        quantity,
        description,
        unit_price,
        total_price,
        date,
        time,
        category,
    })
}

/// Decimal-comma price token to f64. The pattern makes failure unlikely,
/// but a bad token skips the line rather than aborting the scan.
fn parse_price(raw: &str) -> Option<f64> {
    match raw.replace(',', ".").parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("warning: unparseable price token: {raw}");
            None
        }
    }
}
