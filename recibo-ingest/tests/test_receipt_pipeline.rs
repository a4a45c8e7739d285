//! End-to-end: category store -> receipt scan -> summaries.

use recibo_core::{CategoryStore, spend_by_category, spend_by_date};
use recibo_ingest::{classify_csv, scan_receipt_text, write_records_csv};
use tempfile::TempDir;

const TICKET: &str = r#"
MERCADONA, S.A.
AVDA. DE LA CONSTITUCIÓN 5
01/02/2024 18:32 OP: 998877
FACTURA SIMPLIFICADA
Descripción P. Unit Importe
2 Leche Entera 1,20 2,40
3 Pan integral 1,50
1 Agua Mineral 1,5L 0,60
1 Destornillador 3,99
TOTAL (€) 8,49
TARJETA BANCARIA 8,49
"#;

fn seeded_store(dir: &TempDir) -> CategoryStore {
    let store = CategoryStore::open(dir.path().join("categories.json"));
    store
        .create_category("lácteos", &["leche".into(), "yogur".into()])
        .unwrap();
    store
        .create_category("bollería", &["pan".into(), "croissant".into()])
        .unwrap();
    store
        .create_category("bebidas", &["agua".into(), "zumo".into()])
        .unwrap();
    store
}

#[test]
fn test_scan_against_persisted_store() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let categories = store.categories().unwrap();

    let records = scan_receipt_text(TICKET, &categories).unwrap();
    assert_eq!(records.len(), 4);

    let cats: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(cats, vec!["lácteos", "bollería", "bebidas", "Other"]);

    // every record carries the ticket date-time
    for record in &records {
        assert_eq!(record.date, chrono::NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(record.time, chrono::NaiveTime::from_hms_opt(18, 32, 0));
    }

    // "1,5L" is not a price token; the single price goes to the total
    let agua = &records[2];
    assert_eq!(agua.description, "Agua Mineral 1,5L");
    assert_eq!(agua.unit_price, None);
    assert_eq!(agua.total_price, 0.60);
}

#[test]
fn test_summaries_over_scanned_records() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let records = scan_receipt_text(TICKET, &store.categories().unwrap()).unwrap();

    let by_date = spend_by_date(&records);
    assert_eq!(by_date.len(), 1);
    assert!((by_date[0].total - 8.49).abs() < 1e-9);

    let by_category = spend_by_category(&records);
    assert_eq!(by_category[0].category, "Other"); // 3.99 is the largest
    let total: f64 = by_category.iter().map(|c| c.total).sum();
    assert!((total - 8.49).abs() < 1e-9);
}

#[test]
fn test_store_edits_change_the_next_scan() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    let before = scan_receipt_text(TICKET, &store.categories().unwrap()).unwrap();
    assert_eq!(before[3].category, "Other");

    store
        .create_category("ferretería", &["destornillador".into()])
        .unwrap();
    let after = scan_receipt_text(TICKET, &store.categories().unwrap()).unwrap();
    assert_eq!(after[3].category, "ferretería");
}

#[test]
fn test_scanned_records_export_and_reimport() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let categories = store.categories().unwrap();
    let records = scan_receipt_text(TICKET, &categories).unwrap();

    let mut csv_bytes = Vec::new();
    write_records_csv(&records, &mut csv_bytes).unwrap();

    let classified = classify_csv(csv_bytes.as_slice(), &categories).unwrap();
    let reimported = classified.to_records();
    assert_eq!(reimported.len(), records.len());
    for (a, b) in reimported.iter().zip(&records) {
        assert_eq!(a.description, b.description);
        assert_eq!(a.quantity, b.quantity);
        assert_eq!(a.date, b.date);
        assert!((a.total_price - b.total_price).abs() < 1e-9);
    }
}
