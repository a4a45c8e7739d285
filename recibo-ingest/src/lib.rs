//! recibo-ingest: receipt text scanning (state machine over extracted
//! lines), CSV classification, and batch source loading.

pub mod csv_classify;
pub mod scanner;
pub mod sources;

pub use csv_classify::{ClassifiedCsv, classify_csv, write_records_csv};
pub use scanner::{
    SECTION_MARKER, TERMINATOR, scan_receipt_text, scan_receipt_text_with_markers,
};
pub use sources::{load_receipt_text, scan_batch};
