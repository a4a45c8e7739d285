//! Line-item record types produced by the receipt scanner.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One parsed product line from a receipt.
///
/// Records are immutable once produced and are collected in the order
/// their lines appeared in the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    /// Number of units on the line (always >= 1)
    pub quantity: u32,
    /// Product description with the quantity prefix and price tokens stripped
    pub description: String,
    /// Price per unit; `None` when the line carried a single price token.
    /// Never inferred from total/quantity.
    pub unit_price: Option<f64>,
    /// Line total
    pub total_price: f64,
    /// Receipt date (DD/MM/YYYY on the wire), carried forward from the most
    /// recent date-time line in the same document
    #[serde(with = "date_ddmmyyyy")]
    pub date: Option<NaiveDate>,
    /// Receipt time (HH:MM on the wire), carried alongside `date`
    #[serde(with = "time_hhmm")]
    pub time: Option<NaiveTime>,
    /// Classifier output over `description`
    pub category: String,
}

impl ItemRecord {
    /// Returns true when the line carried both a unit and a total price.
    pub fn has_unit_price(&self) -> bool {
        self.unit_price.is_some()
    }
}

/// Serialize `Option<NaiveDate>` in the receipt's own DD/MM/YYYY shape.
pub mod date_ddmmyyyy {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Serialize `Option<NaiveTime>` as HH:MM.
pub mod time_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
