//! Medseed - Main entry point

use clap::Parser;
use medseed_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use medseed_common::{ExitStatus, SeedError};
use medseed_ingest::config::{cli_exit_status, load_env_files};
use medseed_ingest::{pipeline, SeedArgs, SeedConfig};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Env files must be loaded before clap reads MONGODB_URI and friends
    let env_files = load_env_files();
    let args = match SeedArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli_exit_status(&e).code());
        },
    };

    let log_config = LogConfig::builder()
        .level(if args.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
        .output(LogOutput::Console)
        .log_file_prefix("medseed")
        .filter_directives("mongodb=warn")
        .build();

    let _guard = match log_config
        .with_env_overrides()
        .and_then(|config| init_logging(&config))
    {
        Ok(guard) => guard,
        Err(e) => {
            let err = SeedError::Logging(format!("{:#}", e));
            eprintln!("Error: {}", err);
            return ExitCode::from(err.exit_status().code());
        },
    };

    for path in &env_files.loaded {
        debug!(path = %path.display(), "Loaded env file");
    }
    for (path, reason) in &env_files.failed {
        warn!(path = %path.display(), reason = %reason, "Failed to load env file");
    }

    match execute(&args).await {
        Ok(()) => ExitCode::from(ExitStatus::Success.code()),
        Err(e) => {
            error!(error = %e, "Seeding failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_status().code())
        },
    }
}

async fn execute(args: &SeedArgs) -> medseed_common::Result<()> {
    let config = SeedConfig::from_args(args)?;
    debug!(config = ?config, "Resolved configuration");

    let summary = pipeline::run(&config).await?;
    if let Some(load) = &summary.load {
        info!(
            cleared = load.cleared,
            inserted = load.inserted,
            batches = load.batches,
            "Seed finished"
        );
    }
    Ok(())
}
