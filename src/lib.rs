//! Inventory file checker.
//!
//! Loads a `name,code,quantity,expiration` file, merges duplicate rows and
//! answers two questions: which products are running low, and which expire
//! before a given day.

pub mod data;
pub mod error;
pub mod report;

pub use data::filter::{expiring_before, low_quantity, ExpiringView, LowQuantityView};
pub use data::loader::{load_inventory, parse_inventory};
pub use data::model::{parse_date, Inventory, Record};
pub use error::{InventoryError, Result};

