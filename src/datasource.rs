//! Typed connection profiles
//!
//! The store itself accepts any JSON object. `DataSource` is the shape the
//! registry's front-ends submit: database credentials plus an optional SQL
//! log captured from the application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, Result};
use crate::storage::Record;

/// SQL dialect of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    PostgreSql,
    MySql,
    Oracle,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::PostgreSql => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::Oracle => "oracle",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = RegistryError;

    /// Case-insensitive: "PostgreSQL", "postgres" and "postgresql" all parse
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            "mysql" => Ok(Dialect::MySql),
            "oracle" => Ok(Dialect::Oracle),
            other => Err(RegistryError::InvalidInput(format!(
                "unsupported dialect '{}' (expected postgresql, mysql or oracle)",
                other
            ))),
        }
    }
}

/// A database connection profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Assigned by the store; ignored on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Display name
    pub name: String,

    pub host: String,
    pub port: u16,
    pub username: String,

    /// Stored as given. Encrypting it is the caller's job.
    pub pwd: String,

    pub dialect: Dialect,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Raw text of an uploaded SQL/query log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_logs: Option<String>,
}

impl DataSource {
    /// JSON object suitable for `RecordStore::create`
    pub fn to_fields(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Typed view of a stored record; unknown fields are ignored
    pub fn from_record(record: Record) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }
}
