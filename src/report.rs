//! Two-column text tables and JSON for the report views.

use std::fmt::Write;

use serde::Serialize;

use crate::data::filter::{ExpiringView, LowQuantityView};
use crate::data::model::DATE_FORMAT;

const LOW_QUANTITY_WIDTH: usize = 56;
const EXPIRING_WIDTH: usize = 50;

pub const NO_LOW_QUANTITY: &str = "No items are below the specified amount";
pub const NO_EXPIRING: &str = "No items are expiring before the date specified";

/// Table of products under the threshold, or [`NO_LOW_QUANTITY`].
pub fn low_quantity_table(view: &LowQuantityView) -> String {
    if view.is_empty() {
        return format!("{NO_LOW_QUANTITY}\n");
    }
    let rows = view.iter().map(|(k, q)| (k.as_str(), q.to_string()));
    table(LOW_QUANTITY_WIDTH, "Items left:", rows)
}

/// Table of products expiring before the cutoff, or [`NO_EXPIRING`].
pub fn expiring_table(view: &ExpiringView) -> String {
    if view.is_empty() {
        return format!("{NO_EXPIRING}\n");
    }
    let rows = view
        .iter()
        .map(|(k, d)| (k.as_str(), d.format(DATE_FORMAT).to_string()));
    table(EXPIRING_WIDTH, "Expiration date:", rows)
}

fn table<'a>(
    width: usize,
    value_header: &str,
    rows: impl Iterator<Item = (&'a str, String)>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:<width$}|{value_header}", "Product:");
    for (key, value) in rows {
        let _ = writeln!(out, "{key:<width$}|{value}");
    }
    out
}

/// Pretty JSON object, keys in view order.
pub fn to_json<V: Serialize>(view: &V) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}
