//! Batch source loading: turn receipt files into extracted text.
//!
//! PDF extraction shells out to `pdftotext` (poppler-utils); everything
//! else is read as already-extracted plain text. A source that cannot be
//! read yields no records and never aborts the rest of the batch.

use anyhow::{Context, Result, bail};
use recibo_core::{Categories, ItemRecord};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::scanner::scan_receipt_text_with_markers;

/// Extracted text of one receipt file.
pub fn load_receipt_text(path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => extract_pdf_text(path),
        _ => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
    }
}

fn extract_pdf_text(path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .context("running pdftotext (is poppler-utils installed?)")?;

    if !output.status.success() {
        bail!(
            "pdftotext failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Scan a batch of receipt files in the order given, concatenating each
/// document's records. An unreadable source warns on stderr and contributes
/// nothing; the rest of the batch still runs.
pub fn scan_batch(
    paths: &[PathBuf],
    categories: &Categories,
    section_marker: &str,
    terminator: &str,
) -> Result<Vec<ItemRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let text = match load_receipt_text(path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("warning: skipping {}: {err:#}", path.display());
                continue;
            }
        };
        let scanned =
            scan_receipt_text_with_markers(&text, categories, section_marker, terminator)?;
        records.extend(scanned);
    }
    Ok(records)
}
