use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;

use super::model::{Inventory, Record};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Report views: display key → value, in inventory order
// ---------------------------------------------------------------------------

/// Records below a quantity threshold: display key → items left.
pub type LowQuantityView = IndexMap<String, u64>;

/// Records expiring before a cutoff: display key → expiration date.
pub type ExpiringView = IndexMap<String, NaiveDate>;

/// `"{name}, code {code}, expire on {expiration}"`
pub fn low_quantity_key(record: &Record) -> String {
    format!(
        "{}, code {}, expire on {}",
        record.name(),
        record.code(),
        record.expiration()
    )
}

/// `"{name}, code {code}, {quantity} items left"`
pub fn expiring_key(record: &Record) -> String {
    format!(
        "{}, code {}, {} items left",
        record.name(),
        record.code(),
        record.quantity()
    )
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Records holding strictly fewer than `threshold` items.
///
/// Keys embed name, code and expiration, which merging keeps unique among
/// neighbours, so no collision handling is done here. Equal items the sort
/// left apart share a key: the later record replaces the earlier one's
/// quantity in place, and only one of them appears in the view.
pub fn low_quantity(inventory: &Inventory, threshold: i64) -> LowQuantityView {
    inventory
        .iter()
        .filter(|r| i64::try_from(r.quantity()).is_ok_and(|q| q < threshold))
        .map(|r| (low_quantity_key(r), r.quantity()))
        .collect()
}

/// Records expiring strictly before `cutoff`.
///
/// The key does not carry the date, so equal name/code/quantity can repeat.
/// The n-th repeat of a key gets n trailing spaces. Every expiration field is
/// parsed, including those of records that end up excluded.
pub fn expiring_before(inventory: &Inventory, cutoff: NaiveDate) -> Result<ExpiringView> {
    let mut view = ExpiringView::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for record in inventory {
        let expiration = record.expiration_date()?;
        if expiration >= cutoff {
            continue;
        }

        let base = expiring_key(record);
        let repeats = seen.entry(base.clone()).or_insert(0);
        let key = format!("{base}{}", " ".repeat(*repeats));
        *repeats += 1;

        view.insert(key, expiration);
    }

    Ok(view)
}

impl Inventory {
    /// See [`low_quantity`].
    pub fn low_quantity(&self, threshold: i64) -> LowQuantityView {
        low_quantity(self, threshold)
    }

    /// See [`expiring_before`].
    pub fn expiring_before(&self, cutoff: NaiveDate) -> Result<ExpiringView> {
        expiring_before(self, cutoff)
    }
}
