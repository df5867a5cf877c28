//! Tests for Config
//!
//! Environment-based tests live in a single test so they never race on
//! the process environment or working directory.

use std::env;
use std::fs;
use std::path::PathBuf;

use dsregistry::config::DATA_DIR_ENV;
use dsregistry::{Config, RegistryError};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.data_dir, PathBuf::from("./datasources"));
    assert!(config.sync_writes);
}

#[test]
fn test_builder() {
    let config = Config::builder()
        .data_dir("/tmp/registry")
        .sync_writes(false)
        .build();

    assert_eq!(config.data_dir, PathBuf::from("/tmp/registry"));
    assert!(!config.sync_writes);
}

#[test]
fn test_from_env() {
    let original_dir = env::current_dir().unwrap();
    let project = TempDir::new().unwrap();
    let nested = project.path().join("app").join("bin");
    fs::create_dir_all(&nested).unwrap();
    env::set_current_dir(&nested).unwrap();

    // -------------------------------------------------------------------------
    // No variable, no .env file
    // -------------------------------------------------------------------------
    env::remove_var(DATA_DIR_ENV);
    assert!(matches!(Config::from_env(), Err(RegistryError::Config(_))));

    env::set_var(DATA_DIR_ENV, "   ");
    assert!(matches!(Config::from_env(), Err(RegistryError::Config(_))));

    // -------------------------------------------------------------------------
    // .env found by searching upward from the working directory
    // -------------------------------------------------------------------------
    let from_file = project.path().join("datasources");
    fs::write(
        project.path().join(".env"),
        format!("{}={}\n", DATA_DIR_ENV, from_file.display()),
    )
    .unwrap();

    env::remove_var(DATA_DIR_ENV);
    let config = Config::from_env().unwrap();
    assert_eq!(config.data_dir, from_file);

    // Process environment wins over the file
    env::set_var(DATA_DIR_ENV, "/srv/datasources");
    let config = Config::from_env().unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/srv/datasources"));

    // -------------------------------------------------------------------------
    // Explicit dotenv path
    // -------------------------------------------------------------------------
    let explicit = project.path().join("registry.env");
    fs::write(&explicit, format!("{}=/data/registry\n", DATA_DIR_ENV)).unwrap();

    env::remove_var(DATA_DIR_ENV);
    let config = Config::from_env_file(&explicit).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/data/registry"));

    let missing = project.path().join("missing.env");
    assert!(matches!(
        Config::from_env_file(&missing),
        Err(RegistryError::Config(_))
    ));

    env::remove_var(DATA_DIR_ENV);
    env::set_current_dir(original_dir).unwrap();
}
