//! Record Store
//!
//! Owns the registry root and performs create/read/list.
//!
//! ## Responsibilities
//! - Validate the root directory and seed the allocator on startup
//! - Write one metadata file per record under `<root>/<id>/`
//! - Look up records by ID with typed failures
//! - List records with field projection, skipping broken directories

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::config::Config;
use crate::datasource::DataSource;
use crate::error::{RegistryError, Result};

use super::{IdAllocator, Record, DEFAULT_LIST_FIELDS, ID_FIELD, METADATA_FILENAME};

/// Filesystem-backed metadata store
///
/// ## Concurrency:
/// - All methods use `&self`; share the store with `Arc<RecordStore>`
/// - `allocator`: atomic counter, so concurrent creates get disjoint IDs
///   and therefore write disjoint directories
/// - Reads take no locks. A `list` racing a `create` may or may not see
///   the new record.
///
/// The allocator lives in process memory only. Two processes sharing one
/// root can hand out the same ID.
#[derive(Debug)]
pub struct RecordStore {
    /// Store configuration (root directory, sync policy)
    config: Config,

    /// Source of new record IDs
    allocator: IdAllocator,
}

impl RecordStore {
    /// Open the store rooted at `config.data_dir`
    ///
    /// On startup:
    /// 1. Check the root exists and is a directory (never created here)
    /// 2. Scan immediate subdirectories with numeric names
    /// 3. Seed the allocator with the highest ID found (0 if none)
    ///
    /// A numeric directory name too large for a `u64`, or a seed of
    /// `u64::MAX` that leaves nothing to allocate, fails the open.
    pub fn open(config: Config) -> Result<Self> {
        let root = config.data_dir.as_path();
        Self::ensure_root(root)?;

        let max_id = Self::scan_max_id(root)?;
        if max_id == u64::MAX {
            return Err(RegistryError::IdSpaceExhausted { last: max_id });
        }

        let mut allocator = IdAllocator::new();
        allocator.initialize(max_id);

        tracing::debug!(root = %root.display(), max_id, "record store opened");

        Ok(Self { config, allocator })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Store a new record
    ///
    /// Steps:
    /// 1. Reject anything that is not a JSON object
    /// 2. Allocate an ID and write it into the `id` field
    /// 3. Create `<root>/<id>/` (an existing directory is reused)
    /// 4. Write the metadata file, replacing any file already there
    ///
    /// A failure after step 2 does not release the ID.
    pub fn create(&self, fields: Value) -> Result<Record> {
        let mut record = match fields {
            Value::Object(map) => map,
            other => {
                return Err(RegistryError::InvalidInput(format!(
                    "data source must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let id = self.allocator.allocate()?;
        record.insert(ID_FIELD.to_string(), Value::from(id));

        let dir = self.record_dir(id);
        fs::create_dir_all(&dir)?;

        let path = dir.join(METADATA_FILENAME);
        self.write_metadata(&path, &record)?;

        tracing::info!(id, path = %path.display(), "stored data source metadata");

        Ok(record)
    }

    /// Store a typed connection profile
    ///
    /// Any `id` already set on `source` is replaced by the allocated one.
    pub fn create_data_source(&self, source: &DataSource) -> Result<Record> {
        self.create(source.to_fields()?)
    }

    /// Read one record by ID
    ///
    /// The document is returned as written; its `id` field is not
    /// compared against the directory name.
    pub fn get_by_id(&self, id: u64) -> Result<Record> {
        let dir = self.record_dir(id);
        if !dir.is_dir() {
            return Err(RegistryError::NotFound(id));
        }

        let path = dir.join(METADATA_FILENAME);
        if !path.is_file() {
            return Err(RegistryError::MetadataMissing(id));
        }

        let bytes = fs::read(&path)?;
        parse_document(&bytes).map_err(|reason| RegistryError::CorruptRecord { id, reason })
    }

    /// List every record, keeping only the requested fields
    ///
    /// - An empty `fields` slice means `["id", "name"]`
    /// - A record missing any requested field is left out entirely
    /// - Directories with a missing, unreadable or malformed metadata file
    ///   are skipped with a log event
    /// - Order follows directory enumeration and is not sorted
    pub fn list<S: AsRef<str>>(&self, fields: &[S]) -> Result<Vec<Record>> {
        let root = self.root();
        Self::ensure_root(root)?;

        let requested = requested_fields(fields);
        let mut result = Vec::new();

        for entry in fs::read_dir(root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }

            let path = dir.join(METADATA_FILENAME);
            if !path.is_file() {
                tracing::debug!(dir = %dir.display(), "skipping directory without metadata file");
                continue;
            }

            let document = match fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| parse_document(&bytes))
            {
                Ok(document) => document,
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "skipping metadata file");
                    continue;
                }
            };

            if let Some(projected) = project(&document, &requested) {
                result.push(projected);
            }
        }

        Ok(result)
    }

    /// List with the default projection (`id`, `name`)
    pub fn list_default(&self) -> Result<Vec<Record>> {
        self.list(&DEFAULT_LIST_FIELDS)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the registry root directory
    pub fn root(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last ID handed out (the seed right after `open`)
    pub fn last_id(&self) -> u64 {
        self.allocator.last_allocated()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ensure_root(root: &Path) -> Result<()> {
        if root.is_dir() {
            Ok(())
        } else {
            Err(RegistryError::InvalidRootDirectory(root.to_path_buf()))
        }
    }

    /// Highest numeric subdirectory name under `root`, or 0
    fn scan_max_id(root: &Path) -> Result<u64> {
        let mut max_id = 0;

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            match numeric_name(&file_name) {
                Some(digits) => {
                    let id: u64 = digits
                        .parse()
                        .map_err(|_| RegistryError::IdOutOfRange(digits.to_string()))?;
                    max_id = max_id.max(id);
                }
                None => tracing::debug!(
                    name = %file_name.to_string_lossy(),
                    "ignoring non-numeric directory"
                ),
            }
        }

        Ok(max_id)
    }

    fn record_dir(&self, id: u64) -> PathBuf {
        self.root().join(id.to_string())
    }

    /// Write the document next to its final path, then rename over it, so
    /// readers see either the old file or the complete new one.
    fn write_metadata(&self, path: &Path, record: &Record) -> Result<()> {
        let tmp_path = path.with_extension("json.tmp");

        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        record.serialize(&mut serializer)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// "17" → Some("17"); "foo", "", "-3", "+3" → None
fn numeric_name(name: &OsStr) -> Option<&str> {
    let name = name.to_str()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(name)
}

fn parse_document(bytes: &[u8]) -> std::result::Result<Record, String> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_type_name(&other))),
        Err(e) => Err(e.to_string()),
    }
}

/// Requested field names in order, duplicates removed, defaulted if empty
fn requested_fields<S: AsRef<str>>(fields: &[S]) -> Vec<String> {
    if fields.is_empty() {
        return DEFAULT_LIST_FIELDS.iter().map(|f| f.to_string()).collect();
    }

    let mut requested: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        let field = field.as_ref();
        if !requested.iter().any(|f| f == field) {
            requested.push(field.to_string());
        }
    }
    requested
}

/// Copy `fields` out of `document`; None if any of them is absent
fn project(document: &Record, fields: &[String]) -> Option<Record> {
    fields
        .iter()
        .map(|field| document.get(field).map(|value| (field.clone(), value.clone())))
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_name() {
        assert_eq!(numeric_name(OsStr::new("17")), Some("17"));
        assert_eq!(numeric_name(OsStr::new("0")), Some("0"));
        assert_eq!(numeric_name(OsStr::new("foo")), None);
        assert_eq!(numeric_name(OsStr::new("")), None);
        assert_eq!(numeric_name(OsStr::new("-3")), None);
        assert_eq!(numeric_name(OsStr::new("+3")), None);
        assert_eq!(
            numeric_name(OsStr::new("99999999999999999999999")),
            Some("99999999999999999999999")
        );
    }

    #[test]
    fn test_project_requires_every_field() {
        let document = match json!({"id": 1, "name": "A", "host": "h"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let fields = vec!["name".to_string(), "port".to_string()];
        assert!(project(&document, &fields).is_none());

        let fields = vec!["host".to_string(), "id".to_string()];
        let projected = project(&document, &fields).unwrap();
        assert_eq!(Value::Object(projected), json!({"host": "h", "id": 1}));
    }

    #[test]
    fn test_requested_fields_defaults_and_dedups() {
        let empty: [&str; 0] = [];
        assert_eq!(requested_fields(&empty), vec!["id", "name"]);
        assert_eq!(requested_fields(&["name", "id", "name"]), vec!["name", "id"]);
    }

    #[test]
    fn test_parse_document_rejects_non_objects() {
        assert!(parse_document(br#"{"id": 1}"#).is_ok());
        assert!(parse_document(b"[1, 2]").unwrap_err().contains("an array"));
        assert!(parse_document(b"{not json").is_err());
    }
}
