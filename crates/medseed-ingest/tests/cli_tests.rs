//! End-to-end tests for the medseed binary
//!
//! These tests validate the process-level contract:
//! - Exit codes for configuration, input and database failures
//! - Dry run mode
//! - Env file loading

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\
name,price,manufacturer_name,type,pack_size_label,short_composition1,short_composition2,medicine_desc,side_effects,Is_discontinued
Augmentin 625 Duo Tablet,223.42,Glaxo SmithKline Pharmaceuticals Ltd,allopathy,strip of 10 tablets,Amoxycillin  (500mg),Clavulanic Acid (125mg),Antibiotic.,\"Vomiting, Nausea, Diarrhea\",FALSE
Azithral 500 Tablet,132.36,Alembic Pharmaceuticals Ltd,allopathy,strip of 5 tablets,Azithromycin (500mg),,Macrolide antibiotic.,\"Vomiting, Abdominal pain\",FALSE
,10,Unknown,allopathy,,,,,,FALSE
";

/// Command isolated from the developer's environment and env files
fn medseed(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("medseed").unwrap();
    cmd.current_dir(workdir)
        .env("MEDSEED_ENV_FILE", workdir.join("no-such.env"))
        .env_remove("MONGODB_URI")
        .env_remove("MEDSEED_DATABASE")
        .env_remove("MEDSEED_COLLECTION")
        .env_remove("MEDSEED_CSV_PATH")
        .env_remove("MEDSEED_BATCH_SIZE")
        .env_remove("MEDSEED_LIMIT")
        .env_remove("MEDSEED_TLS_ALLOW_INVALID_CERTIFICATES")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FORMAT")
        .env_remove("LOG_FILTER")
        .env_remove("RUST_LOG");
    cmd
}

fn workdir_with_csv() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("updated_indian_medicine_data.csv"), SAMPLE_CSV).unwrap();
    dir
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    medseed(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mongodb-uri"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_missing_uri_exits_1() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .arg("--no-progress")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("MONGODB_URI is not set"));
}

#[test]
fn test_zero_batch_size_exits_1() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .args(["--dry-run", "--batch-size", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--batch-size"));
}

#[test]
fn test_invalid_batch_size_env_exits_1() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .env("MONGODB_URI", "mongodb://127.0.0.1:1")
        .env("MEDSEED_BATCH_SIZE", "abc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--batch-size"));
}

#[test]
fn test_invalid_limit_flag_exits_1() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .args(["--dry-run", "--limit", "many"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_flag_exits_1() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .args(["--dry-run", "--frobnicate"])
        .assert()
        .code(1);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_missing_csv_exits_2() {
    let dir = TempDir::new().unwrap();
    medseed(dir.path())
        .env("MONGODB_URI", "mongodb://127.0.0.1:1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_custom_csv_path() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("data/meds.csv"), SAMPLE_CSV).unwrap();

    medseed(dir.path())
        .args(["--dry-run", "--csv", "data/meds.csv"])
        .assert()
        .success();
}

// ============================================================================
// Dry run
// ============================================================================

#[test]
fn test_dry_run_without_uri_succeeds() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));
}

#[test]
fn test_no_valid_records_exits_0() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("updated_indian_medicine_data.csv"),
        "name,price\n,10\nNA,12\n",
    )
    .unwrap();

    // The unreachable URI proves no connection is attempted.
    medseed(dir.path())
        .env("MONGODB_URI", "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid medicine records found"));
}

// ============================================================================
// Database
// ============================================================================

#[test]
fn test_unreachable_database_exits_3() {
    let dir = workdir_with_csv();
    medseed(dir.path())
        .env("MONGODB_URI", "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
        .arg("--no-progress")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Database error during connect"));
}

// ============================================================================
// Env files
// ============================================================================

#[test]
fn test_env_file_supplies_uri() {
    let dir = workdir_with_csv();
    fs::create_dir(dir.path().join("server")).unwrap();
    fs::write(
        dir.path().join("server/.env"),
        "MONGODB_URI=mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200\n",
    )
    .unwrap();

    // Loaded from the default location, so the run gets past config validation.
    medseed(dir.path())
        .env_remove("MEDSEED_ENV_FILE")
        .arg("--no-progress")
        .assert()
        .code(3);
}
