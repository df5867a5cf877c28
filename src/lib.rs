//! # dsregistry
//!
//! A minimal metadata registry for data source connection profiles:
//! - One numbered directory per data source, holding one JSON document
//! - Monotonic IDs reseeded from disk on every start
//! - Field-projection listing that tolerates broken directories
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Callers (CLI, UI, query layer)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ create / get_by_id / list
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    RecordStore                               │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ allocate()                       │ read / write
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────────┐
//!   │  IdAllocator    │               │  <root>/<id>/        │
//!   │  (AtomicU64)    │               │  data_source_        │
//!   └─────────────────┘               │  metadata.json       │
//!                                     └──────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod datasource;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RegistryError, Result};
pub use config::Config;
pub use datasource::{DataSource, Dialect};
pub use storage::{IdAllocator, Record, RecordStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dsregistry
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
