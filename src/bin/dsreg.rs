//! dsreg CLI
//!
//! Command-line interface for the data source registry.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dsregistry::config::DATA_DIR_ENV;
use dsregistry::{Config, DataSource, Dialect, RecordStore, RegistryError, Result};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// dsreg
#[derive(Parser, Debug)]
#[command(name = "dsreg")]
#[command(about = "Manage data source connection profiles")]
#[command(version)]
struct Args {
    /// Registry root directory (must already exist)
    #[arg(short, long, env = DATA_DIR_ENV)]
    data_dir: PathBuf,

    /// Skip fsync after writing metadata
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List data sources, projecting the given fields
    List {
        /// Comma-separated field names
        #[arg(short, long, value_delimiter = ',', default_value = "id,name")]
        fields: Vec<String>,
    },

    /// Print one data source
    Get {
        /// The data source ID
        id: u64,
    },

    /// Add a data source from connection details
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long)]
        port: u16,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// postgresql, mysql or oracle
        #[arg(long)]
        dialect: Dialect,

        #[arg(long)]
        database: Option<String>,

        /// File of SQL queries or database logs to attach
        #[arg(long)]
        sql_log: Option<PathBuf>,
    },

    /// Add a data source from a raw JSON object
    CreateJson {
        /// e.g. '{"name": "warehouse", "host": "db.internal"}'
        json: String,
    },
}

fn main() {
    // Logs go to stderr; stdout carries JSON only
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dsregistry=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // DATASOURCE_DIR may come from a .env file; clap reads it below
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("loaded {}", path.display());
    }

    let args = Args::parse();

    tracing::debug!("dsreg v{}", dsregistry::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .sync_writes(!args.no_sync)
        .build();

    let store = RecordStore::open(config)?;

    let output = match args.command {
        Commands::List { fields } => {
            let records = store.list(&fields)?;
            Value::Array(records.into_iter().map(Value::Object).collect())
        }
        Commands::Get { id } => Value::Object(store.get_by_id(id)?),
        Commands::Create {
            name,
            host,
            port,
            username,
            password,
            dialect,
            database,
            sql_log,
        } => {
            let sql_logs = match sql_log {
                Some(path) => Some(fs::read_to_string(&path)?),
                None => None,
            };

            let source = DataSource {
                id: None,
                name,
                host,
                port,
                username,
                pwd: password,
                dialect,
                database,
                sql_logs,
            };
            Value::Object(store.create_data_source(&source)?)
        }
        Commands::CreateJson { json } => {
            let fields: Value = serde_json::from_str(&json)
                .map_err(|e| RegistryError::InvalidInput(e.to_string()))?;
            Value::Object(store.create(fields)?)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
