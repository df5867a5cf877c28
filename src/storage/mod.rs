//! Storage Module
//!
//! Directory-per-record persistence for data source metadata.
//!
//! ## Responsibilities
//! - Seed the ID allocator from the directories already on disk
//! - Create one numbered directory per record
//! - Read single records and project fields across all records
//!
//! ## On-Disk Layout
//! ```text
//! <root>/
//! ├── 1/
//! │   └── data_source_metadata.json   { "name": ..., "id": 1 }
//! ├── 2/
//! │   └── data_source_metadata.json   { "name": ..., "id": 2 }
//! └── notes/                          (ignored by the allocator)
//! ```

mod allocator;
mod store;

pub use allocator::IdAllocator;
pub use store::RecordStore;

/// A stored record: field name → JSON value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Name of the metadata file inside each record directory
pub const METADATA_FILENAME: &str = "data_source_metadata.json";

/// Reserved field holding the store-assigned ID
pub const ID_FIELD: &str = "id";

/// Fields returned by `RecordStore::list` when none are requested
pub const DEFAULT_LIST_FIELDS: [&str; 2] = ["id", "name"];
