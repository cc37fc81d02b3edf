//! Configuration for a seeding run
//!
//! Flags are parsed once by [`SeedArgs`] (each flag can also come from the
//! environment) and validated into a [`SeedConfig`] that is passed down to
//! the pipeline. Env files are loaded before argument parsing so their values
//! are visible to clap.

use clap::error::ErrorKind;
use clap::Parser;
use medseed_common::{ExitStatus, Result, SeedError};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CSV_PATH: &str = "updated_indian_medicine_data.csv";
pub const DEFAULT_DATABASE: &str = "healthcare";
pub const DEFAULT_COLLECTION: &str = "medicines";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Env file consulted before `.env`, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = "server/.env";

/// Overrides [`DEFAULT_ENV_FILE`].
pub const ENV_FILE_VAR: &str = "MEDSEED_ENV_FILE";

/// Seed the medicines collection from a CSV export
#[derive(Parser, Debug, Clone)]
#[command(name = "medseed")]
#[command(author, version, about = "Seed the medicines collection from a CSV export")]
pub struct SeedArgs {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Target database
    #[arg(long, env = "MEDSEED_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Target collection (replaced on every run)
    #[arg(long, env = "MEDSEED_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// CSV file to load
    #[arg(long = "csv", env = "MEDSEED_CSV_PATH", default_value = DEFAULT_CSV_PATH)]
    pub csv_path: PathBuf,

    /// Documents per insert call
    #[arg(long, env = "MEDSEED_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Stop after this many data rows
    #[arg(long, env = "MEDSEED_LIMIT")]
    pub limit: Option<usize>,

    /// Read and transform the CSV without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Skip TLS certificate validation (local development only)
    #[arg(long, env = "MEDSEED_TLS_ALLOW_INVALID_CERTIFICATES")]
    pub tls_allow_invalid_certificates: bool,

    /// Disable the insert progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Exit status for an argument parsing failure.
///
/// `--help` and `--version` succeed. Any other rejected flag or env value is a
/// configuration error, never clap's own usage status.
pub fn cli_exit_status(err: &clap::Error) -> ExitStatus {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitStatus::Success,
        _ => ExitStatus::ConfigError,
    }
}

/// Connection settings for the target collection
#[derive(Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub tls_allow_invalid_certificates: bool,
}

// The URI usually embeds credentials.
impl fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field(
                "tls_allow_invalid_certificates",
                &self.tls_allow_invalid_certificates,
            )
            .finish()
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// `None` only for dry runs started without a connection string
    pub mongo: Option<MongoSettings>,
    pub csv_path: PathBuf,
    pub batch_size: usize,
    pub limit: Option<usize>,
    pub dry_run: bool,
    pub show_progress: bool,
}

impl SeedConfig {
    /// Validate parsed arguments.
    ///
    /// A missing or blank connection string is a configuration error unless
    /// this is a dry run.
    pub fn from_args(args: &SeedArgs) -> Result<Self> {
        let uri = args
            .mongodb_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty());

        let mongo = match uri {
            Some(uri) => Some(MongoSettings {
                uri: uri.to_string(),
                database: non_blank(&args.database, "--database")?,
                collection: non_blank(&args.collection, "--collection")?,
                tls_allow_invalid_certificates: args.tls_allow_invalid_certificates,
            }),
            None if args.dry_run => None,
            None => {
                return Err(SeedError::config(format!(
                    "MONGODB_URI is not set; export it or define it in {}",
                    DEFAULT_ENV_FILE
                )))
            },
        };

        if args.batch_size == 0 {
            return Err(SeedError::config("--batch-size must be at least 1"));
        }

        Ok(Self {
            mongo,
            csv_path: args.csv_path.clone(),
            batch_size: args.batch_size,
            limit: args.limit,
            dry_run: args.dry_run,
            show_progress: !args.no_progress,
        })
    }
}

fn non_blank(value: &str, flag: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SeedError::config(format!("{} must not be empty", flag)));
    }
    Ok(value.to_string())
}

/// Outcome of [`load_env_files`], reported once logging is up.
#[derive(Debug, Default)]
pub struct EnvFileReport {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Load `$MEDSEED_ENV_FILE` (default `server/.env`), then `.env`.
///
/// Missing files are skipped. Variables already set in the process
/// environment are never overwritten.
pub fn load_env_files() -> EnvFileReport {
    let primary = std::env::var(ENV_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));

    let mut report = EnvFileReport::default();
    for path in [primary, PathBuf::from(".env")] {
        match dotenvy::from_path(&path) {
            Ok(()) => report.loaded.push(path),
            Err(e) if e.not_found() => {},
            Err(e) => report.failed.push((path, e.to_string())),
        }
    }
    report
}
