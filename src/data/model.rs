use std::fmt;

use chrono::NaiveDate;

use crate::error::{InventoryError, Result};

/// Format of every date in the inventory file and on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// RawRow – one data line, split but untyped
// ---------------------------------------------------------------------------

/// A data line split into its four columns, all kept as text.
///
/// Field order matters: the derived `Ord` compares name, then code, then the
/// quantity *string*, then the date string. That byte-wise ordering is what
/// decides which duplicate rows end up adjacent and get merged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawRow {
    pub name: String,
    pub code: String,
    pub quantity: String,
    pub expiration: String,
}

impl RawRow {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        quantity: impl Into<String>,
        expiration: impl Into<String>,
    ) -> Self {
        RawRow {
            name: name.into(),
            code: code.into(),
            quantity: quantity.into(),
            expiration: expiration.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one merged inventory entry
// ---------------------------------------------------------------------------

/// One inventory entry after merging: quantity is typed, the expiration date
/// is still raw text and only parsed by [`Record::expiration_date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: String,
    code: String,
    quantity: u64,
    expiration: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        quantity: u64,
        expiration: impl Into<String>,
    ) -> Self {
        Record {
            name: name.into(),
            code: code.into(),
            quantity,
            expiration: expiration.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Expiration date exactly as it appeared in the file.
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Parse the expiration field as a strict `YYYY-MM-DD` date.
    pub fn expiration_date(&self) -> Result<NaiveDate> {
        parse_date(&self.expiration).ok_or_else(|| {
            InventoryError::format(
                format!("{}, code {}", self.name, self.code),
                "expiration is not a YYYY-MM-DD date",
                self.expiration.as_str(),
            )
        })
    }

    /// Whether `other` is the same logical item: same name, code and expiration.
    pub fn same_item(&self, other: &Record) -> bool {
        self.name == other.name && self.code == other.code && self.expiration == other.expiration
    }

    /// A new record holding the summed quantity of `self` and `other`.
    ///
    /// Returns `None` on overflow.
    pub fn merged_with(&self, other: &Record) -> Option<Record> {
        let quantity = self.quantity.checked_add(other.quantity)?;
        Some(Record {
            quantity,
            ..self.clone()
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.name, self.code, self.quantity, self.expiration
        )
    }
}

// ---------------------------------------------------------------------------
// Inventory – the merged, lexically ordered record set
// ---------------------------------------------------------------------------

/// Merged records in post-merge lexical order.
///
/// No two adjacent records share name, code and expiration. Duplicates that
/// the lexical sort left apart are kept as separate records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<Record>,
}

impl Inventory {
    pub fn from_records(records: Vec<Record>) -> Self {
        Inventory { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of merged records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of items across all records.
    pub fn total_quantity(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity))
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a strict `YYYY-MM-DD` date.
///
/// Exactly four year digits, two month digits and two day digits separated
/// by hyphens, naming a real calendar day. Anything else is `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}
