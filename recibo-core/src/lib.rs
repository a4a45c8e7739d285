//! recibo-core: receipt line-item records, the persisted category store,
//! and the keyword classifier built on top of it.

pub mod classify;
pub mod record;
pub mod store;
pub mod summary;

pub use classify::{DEFAULT_CATEGORY, classify};
pub use record::ItemRecord;
pub use store::{Categories, CategoryStore, StoreError};
pub use summary::{CategorySpend, DateSpend, spend_by_category, spend_by_date};
