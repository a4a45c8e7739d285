//! CSV classification and export.
//!
//! Tabular exports use the receipt columns in Spanish. Classification only
//! needs `Descripción`; every other column passes through untouched.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use recibo_core::record::{date_ddmmyyyy, time_hhmm};
use recibo_core::{Categories, ItemRecord, classify};
use std::io::{Read, Write};

pub const DESCRIPTION_COLUMN: &str = "Descripción";
pub const CATEGORY_COLUMN: &str = "Clasificación";

/// Column order of the record export, matching the original table layout.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Número de artículos",
    DESCRIPTION_COLUMN,
    "P. Unit",
    "Importe",
    "Fecha",
    "Hora",
    CATEGORY_COLUMN,
];

/// A classified CSV: the input table with its `Clasificación` column filled.
#[derive(Debug, Clone)]
pub struct ClassifiedCsv {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl ClassifiedCsv {
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Reinterpret rows in the export column layout as item records so a
    /// previously downloaded CSV merges into the same aggregate table.
    /// Rows without a parseable `Importe` are skipped.
    pub fn to_records(&self) -> Vec<ItemRecord> {
        let col = |name: &str| self.headers.iter().position(|h| h.trim() == name);

        let Some(desc_idx) = col(DESCRIPTION_COLUMN) else {
            return Vec::new();
        };
        let Some(total_idx) = col("Importe") else {
            return Vec::new();
        };
        let quantity_idx = col("Número de artículos");
        let unit_idx = col("P. Unit");
        let date_idx = col("Fecha");
        let time_idx = col("Hora");
        let category_idx = col(CATEGORY_COLUMN);

        let field = |row: &StringRecord, idx: Option<usize>| -> Option<String> {
            let raw = idx.and_then(|i| row.get(i))?.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        };

        let mut records = Vec::new();
        for row in &self.rows {
            let Some(total_price) = field(row, Some(total_idx)).and_then(|s| parse_decimal(&s))
            else {
                continue;
            };
            let description = field(row, Some(desc_idx)).unwrap_or_default();
            let quantity = field(row, quantity_idx)
                .and_then(|s| s.parse().ok())
                .filter(|q| *q >= 1)
                .unwrap_or(1);

            records.push(ItemRecord {
                quantity,
                description,
                unit_price: field(row, unit_idx).and_then(|s| parse_decimal(&s)),
                total_price,
                date: field(row, date_idx)
                    .and_then(|s| NaiveDate::parse_from_str(&s, date_ddmmyyyy::FORMAT).ok()),
                time: field(row, time_idx)
                    .and_then(|s| NaiveTime::parse_from_str(&s, time_hhmm::FORMAT).ok()),
                category: field(row, category_idx).unwrap_or_default(),
            });
        }
        records
    }
}

/// Classify a headered CSV by its `Descripción` column, filling a
/// `Clasificación` column (overwritten when already present, appended
/// otherwise) and keeping every other column and the row order unchanged.
pub fn classify_csv<R: Read>(reader: R, categories: &Categories) -> Result<ClassifiedCsv> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("reading CSV headers")?.clone();
    let desc_idx = headers
        .iter()
        .position(|h| h.trim() == DESCRIPTION_COLUMN)
        .with_context(|| format!("CSV is missing a '{DESCRIPTION_COLUMN}' column"))?;

    let mut out_headers = headers.clone();
    let category_idx = match headers.iter().position(|h| h.trim() == CATEGORY_COLUMN) {
        Some(idx) => idx,
        None => {
            out_headers.push_field(CATEGORY_COLUMN);
            headers.len()
        }
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let category = classify(record.get(desc_idx).unwrap_or(""), categories);
        let mut row = StringRecord::new();
        for i in 0..out_headers.len() {
            if i == category_idx {
                row.push_field(&category);
            } else {
                row.push_field(record.get(i).unwrap_or(""));
            }
        }
        rows.push(row);
    }

    Ok(ClassifiedCsv {
        headers: out_headers,
        rows,
    })
}

/// Write records as CSV in the export column layout.
pub fn write_records_csv<W: Write>(records: &[ItemRecord], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for record in records {
        wtr.write_record([
            record.quantity.to_string(),
            record.description.clone(),
            record
                .unit_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
            format!("{:.2}", record.total_price),
            record
                .date
                .map(|d| d.format(date_ddmmyyyy::FORMAT).to_string())
                .unwrap_or_default(),
            record
                .time
                .map(|t| t.format(time_hhmm::FORMAT).to_string())
                .unwrap_or_default(),
            record.category.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a decimal that may use either a comma or a point.
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}
