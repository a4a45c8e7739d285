//! Group-and-sum summaries over scanned records, shaped for display.

use crate::record::{ItemRecord, date_ddmmyyyy};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Total spend on one receipt date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSpend {
    #[serde(with = "date_ddmmyyyy")]
    pub date: Option<NaiveDate>,
    pub total: f64,
}

/// Total spend in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: f64,
}

/// Sum totals per date, chronologically. Records without a date are skipped.
pub fn spend_by_date(records: &[ItemRecord]) -> Vec<DateSpend> {
    let mut totals: HashMap<NaiveDate, f64> = HashMap::new();
    for record in records {
        if let Some(date) = record.date {
            *totals.entry(date).or_insert(0.0) += record.total_price;
        }
    }

    let mut series: Vec<DateSpend> = totals
        .into_iter()
        .map(|(date, total)| DateSpend {
            date: Some(date),
            total,
        })
        .collect();
    series.sort_by_key(|s| s.date);
    series
}

/// Sum totals per category, largest spend first.
pub fn spend_by_category(records: &[ItemRecord]) -> Vec<CategorySpend> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in records {
        *totals.entry(record.category.as_str()).or_insert(0.0) += record.total_price;
    }

    let mut spend: Vec<CategorySpend> = totals
        .into_iter()
        .map(|(category, total)| CategorySpend {
            category: category.to_string(),
            total,
        })
        .collect();
    spend.sort_by(|a, b| b.total.total_cmp(&a.total).then(a.category.cmp(&b.category)));
    spend
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn record(date: Option<NaiveDate>, category: &str, total: f64) -> ItemRecord {
        ItemRecord {
            quantity: 1,
            description: "x".to_string(),
            unit_price: None,
            total_price: total,
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_spend_by_date_sums_and_sorts_chronologically() {
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1);
        let jan = NaiveDate::from_ymd_opt(2024, 1, 15);
        let records = vec![
            record(feb, "a", 2.40),
            record(jan, "b", 1.50),
            record(feb, "c", 0.60),
        ];

        let series = spend_by_date(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, jan);
        assert_eq!(series[0].total, 1.50);
        assert_eq!(series[1].date, feb);
        assert!((series[1].total - 3.00).abs() < 1e-9);
    }

    #[test]
    fn test_spend_by_date_skips_undated_records() {
        let records = vec![record(None, "a", 9.99)];
        assert!(spend_by_date(&records).is_empty());
    }

    #[test]
    fn test_spend_by_category_largest_first() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1);
        let records = vec![
            record(date, "lácteos", 2.40),
            record(date, "bebidas", 5.00),
            record(date, "lácteos", 1.20),
        ];

        let spend = spend_by_category(&records);
        assert_eq!(spend[0].category, "bebidas");
        assert_eq!(spend[1].category, "lácteos");
        assert!((spend[1].total - 3.60).abs() < 1e-9);
    }

    #[test]
    fn test_summary_totals_match_record_sum() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1);
        let records = vec![
            record(date, "a", 1.10),
            record(date, "b", 2.20),
            record(date, "a", 3.30),
        ];
        let sum: f64 = records.iter().map(|r| r.total_price).sum();
        let by_cat: f64 = spend_by_category(&records).iter().map(|s| s.total).sum();
        let by_date: f64 = spend_by_date(&records).iter().map(|s| s.total).sum();
        assert!((by_cat - sum).abs() < 1e-9);
        assert!((by_date - sum).abs() < 1e-9);
    }
}
