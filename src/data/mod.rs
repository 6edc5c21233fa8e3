/// Data layer: core types, loading/merging, and report projections.
///
/// Architecture:
/// ```text
///  name,code,quantity,expiration   (.csv, header skipped)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split rows → sort lexically → merge adjacent duplicates
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ Inventory  │  Vec<Record>, post-merge lexical order
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  low_quantity / expiring_before → IndexMap views
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
