use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use super::model::{Inventory, RawRow, Record};
use crate::error::{InventoryError, Result};

/// Number of columns every data line must have.
const COLUMNS: usize = 4;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and merge an inventory file.
///
/// Reads every data line, sorts the rows lexically and collapses adjacent
/// duplicates. Nothing is cached: call again to pick up changes on disk.
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Inventory> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let row_count = rows.len();
    let inventory = merge_adjacent(rows)?;
    log::info!(
        "Loaded {}: {row_count} rows merged into {} records",
        path.display(),
        inventory.len()
    );
    Ok(inventory)
}

impl Inventory {
    /// See [`load_inventory`].
    pub fn load(path: impl AsRef<Path>) -> Result<Inventory> {
        load_inventory(path)
    }
}

/// Same as [`load_inventory`] but over an already open reader.
pub fn parse_inventory<R: Read>(reader: R) -> Result<Inventory> {
    let rows = read_rows_from(reader, Path::new("<stream>"))?;
    merge_adjacent(rows)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Read the raw rows of an inventory file, skipping its header line.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows_from(file, path)
}

/// Split each line on commas into a [`RawRow`].
///
/// The first physical line is dropped unread, even when it is blank. There
/// is no quoting: a comma inside a field shifts the columns, and that is only
/// caught when the field count no longer adds up to four. Trailing empty
/// fields are ignored, so `a,b,1,2024-01-01,` is still four fields. Blank
/// lines after the header are skipped.
pub fn read_rows_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<RawRow>> {
    let mut reader = BufReader::new(reader);
    let mut header = Vec::new();
    reader
        .read_until(b'\n', &mut header)
        .map_err(|source| InventoryError::Io {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, origin))?;
        // csv counts from the line after the header.
        let line = record.position().map_or(0, |p| p.line() + 1);

        let fields = record.len() - record.iter().rev().take_while(|f| f.is_empty()).count();
        if fields != COLUMNS {
            return Err(InventoryError::format(
                format!("line {line}"),
                format!("expected {COLUMNS} comma-separated fields, found {fields}"),
                record.iter().collect::<Vec<_>>().join(","),
            ));
        }

        rows.push(RawRow::new(&record[0], &record[1], &record[2], &record[3]));
    }

    log::debug!("Read {} data rows from {}", rows.len(), origin.display());
    Ok(rows)
}

fn csv_error(err: csv::Error, origin: &Path) -> InventoryError {
    let line = err.position().map_or(0, |p| p.line() + 1);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => InventoryError::Io {
            path: PathBuf::from(origin),
            source,
        },
        csv::ErrorKind::Utf8 { err, .. } => {
            InventoryError::format(format!("line {line}"), "invalid UTF-8", err.to_string())
        }
        other => InventoryError::format(format!("line {line}"), "unreadable row", format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// Deduplicator
// ---------------------------------------------------------------------------

/// Sort rows lexically and merge runs of adjacent rows for the same item.
///
/// Rows compare field by field as text, so `"10"` sorts before `"9"`. Two
/// rows merge only when they end up next to each other with equal name, code
/// and expiration; a run of three or more collapses into one record. Equal
/// items separated by another row are left unmerged.
pub fn merge_adjacent(mut rows: Vec<RawRow>) -> Result<Inventory> {
    rows.sort();

    let mut merged: Vec<Record> = Vec::with_capacity(rows.len());
    for row in rows {
        let quantity = parse_quantity(&row)?;
        let record = Record::new(row.name, row.code, quantity, row.expiration);

        match merged.last_mut() {
            Some(last) if last.same_item(&record) => {
                *last = last.merged_with(&record).ok_or_else(|| {
                    InventoryError::format(
                        format!("{}, code {}", record.name(), record.code()),
                        "merged quantity overflows",
                        record.quantity().to_string(),
                    )
                })?;
                log::trace!("merged duplicate row into {last}");
            }
            _ => merged.push(record),
        }
    }

    Ok(Inventory::from_records(merged))
}

fn parse_quantity(row: &RawRow) -> Result<u64> {
    row.quantity.parse::<u64>().map_err(|_| {
        InventoryError::format(
            format!("{}, code {}", row.name, row.code),
            "quantity is not a non-negative integer",
            row.quantity.as_str(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[(&str, &str, &str, &str)]) -> Vec<RawRow> {
        lines
            .iter()
            .map(|(n, c, q, e)| RawRow::new(*n, *c, *q, *e))
            .collect()
    }

    #[test]
    fn header_is_skipped_and_columns_kept_raw() {
        let text = "name,code,quantity,expiration\nApple,A1,05,2024-01-10\n";
        let rows = read_rows_from(text.as_bytes(), Path::new("t.csv")).unwrap();
        assert_eq!(rows, vec![RawRow::new("Apple", "A1", "05", "2024-01-10")]);
    }

    #[test]
    fn header_is_not_validated() {
        let text = "whatever header;has;no;commas\nApple,A1,5,2024-01-10\n";
        let rows = read_rows_from(text.as_bytes(), Path::new("t.csv")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn header_only_file_is_empty() {
        let rows = read_rows_from("name,code,quantity,expiration\n".as_bytes(), Path::new("t")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_first_line_is_the_header() {
        let text = "\nApple,A1,5,2024-01-10\nPear,P1,2,2024-03-01\n";
        let inv = parse_inventory(text.as_bytes()).unwrap();
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.records()[0], Record::new("Apple", "A1", 5, "2024-01-10"));
    }

    #[test]
    fn empty_input_has_no_rows() {
        let rows = read_rows_from("".as_bytes(), Path::new("t")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn header_without_newline_has_no_rows() {
        let rows = read_rows_from("name,code,quantity,expiration".as_bytes(), Path::new("t")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn trailing_empty_fields_are_ignored() {
        let text = "h\nApple,A1,5,2024-01-10,\nPear,P1,2,2024-03-01,,\n";
        let rows = read_rows_from(text.as_bytes(), Path::new("t")).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow::new("Apple", "A1", "5", "2024-01-10"),
                RawRow::new("Pear", "P1", "2", "2024-03-01"),
            ]
        );
    }

    #[test]
    fn missing_trailing_field_is_format_error() {
        let text = "h\nApple,A1,5,\n";
        let err = read_rows_from(text.as_bytes(), Path::new("t")).unwrap_err();
        assert!(err.to_string().contains("found 3"), "{err}");
    }

    #[test]
    fn quotes_are_not_special() {
        let text = "h\n\"Apple\",A1,5,2024-01-10\n";
        let rows = read_rows_from(text.as_bytes(), Path::new("t")).unwrap();
        assert_eq!(rows[0].name, "\"Apple\"");
    }

    #[test]
    fn embedded_comma_breaks_field_count() {
        let text = "h\nApple, red,A1,5,2024-01-10\n";
        let err = read_rows_from(text.as_bytes(), Path::new("t")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("found 5"), "{msg}");
    }

    #[test]
    fn crlf_lines() {
        let text = "h\r\nApple,A1,5,2024-01-10\r\nPear,P1,2,2024-03-01\r\n";
        let rows = read_rows_from(text.as_bytes(), Path::new("t")).unwrap();
        assert_eq!(rows[1], RawRow::new("Pear", "P1", "2", "2024-03-01"));
    }

    #[test]
    fn merges_scenario() {
        let inv = merge_adjacent(rows(&[
            ("Apple", "A1", "5", "2024-01-10"),
            ("Apple", "A1", "3", "2024-01-10"),
            ("Banana", "B2", "20", "2024-06-01"),
        ]))
        .unwrap();
        assert_eq!(
            inv.records(),
            &[
                Record::new("Apple", "A1", 8, "2024-01-10"),
                Record::new("Banana", "B2", 20, "2024-06-01"),
            ]
        );
    }

    #[test]
    fn run_of_three_collapses() {
        let inv = merge_adjacent(rows(&[
            ("Milk", "M1", "1", "2024-01-01"),
            ("Milk", "M1", "2", "2024-01-01"),
            ("Milk", "M1", "4", "2024-01-01"),
        ]))
        .unwrap();
        assert_eq!(inv.records(), &[Record::new("Milk", "M1", 7, "2024-01-01")]);
    }

    #[test]
    fn non_adjacent_duplicates_stay_apart() {
        // Sorted: (1,2024-05-01) (2,2024-01-01) (3,2024-05-01): the two
        // 2024-05-01 rows are separated by the 2024-01-01 row.
        let inv = merge_adjacent(rows(&[
            ("Milk", "M1", "3", "2024-05-01"),
            ("Milk", "M1", "1", "2024-05-01"),
            ("Milk", "M1", "2", "2024-01-01"),
        ]))
        .unwrap();
        assert_eq!(
            inv.records(),
            &[
                Record::new("Milk", "M1", 1, "2024-05-01"),
                Record::new("Milk", "M1", 2, "2024-01-01"),
                Record::new("Milk", "M1", 3, "2024-05-01"),
            ]
        );
    }

    #[test]
    fn order_is_lexical_not_file_order() {
        let inv = merge_adjacent(rows(&[
            ("Pear", "P1", "9", "2024-01-01"),
            ("Apple", "A1", "10", "2024-01-01"),
        ]))
        .unwrap();
        let names: Vec<_> = inv.iter().map(Record::name).collect();
        assert_eq!(names, ["Apple", "Pear"]);
    }

    #[test]
    fn bad_quantity_is_format_error() {
        let err = merge_adjacent(rows(&[("Apple", "A1", "five", "2024-01-10")])).unwrap_err();
        assert!(matches!(err, InventoryError::Format { .. }));
        assert!(err.to_string().contains("\"five\""));
    }

    #[test]
    fn negative_quantity_is_format_error() {
        let err = merge_adjacent(rows(&[("Apple", "A1", "-1", "2024-01-10")])).unwrap_err();
        assert!(matches!(err, InventoryError::Format { .. }));
    }

    #[test]
    fn bad_date_survives_loading() {
        let inv = merge_adjacent(rows(&[("Apple", "A1", "1", "tomorrow")])).unwrap();
        assert_eq!(inv.records()[0].expiration(), "tomorrow");
    }

    #[test]
    fn overflow_is_format_error() {
        let max = u64::MAX.to_string();
        let err = merge_adjacent(rows(&[
            ("X", "1", max.as_str(), "2024-01-01"),
            ("X", "1", "1", "2024-01-01"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn parse_inventory_reads_and_merges() {
        let text = "name,code,quantity,expiration\nApple,A1,5,2024-01-10\nApple,A1,3,2024-01-10\n";
        let inv = parse_inventory(text.as_bytes()).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.total_quantity(), 8);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_inventory("/definitely/not/here.csv").unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
