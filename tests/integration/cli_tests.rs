use clap::Parser;
use dedupe::actions::DUPLICATES_DIR;
use dedupe::cli::Cli;
use dedupe::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Empty config file so the user's own configuration is never picked up.
fn config_file(dir: &TempDir) -> String {
    let path = dir.path().join("dedupe.toml");
    fs::write(&path, "").unwrap();
    path.to_string_lossy().into_owned()
}

fn cli(folder: &Path, config: &str, extra: &[&str]) -> Cli {
    let folder = folder.to_string_lossy().into_owned();
    let mut args = vec!["dedupe", "--quiet", "--config", config];
    args.extend_from_slice(extra);
    args.push(&folder);
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_run_app_moves_duplicates() {
    let cfg = tempdir().unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"pixels").unwrap();
    fs::write(dir.path().join("b.jpg"), b"pixels").unwrap();

    let code = dedupe::run_app(cli(dir.path(), &config_file(&cfg), &[])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_dir(dir.path().join(DUPLICATES_DIR)).unwrap().count(), 1);
}

#[test]
fn test_run_app_remove_with_json_output() {
    let cfg = tempdir().unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"pixels").unwrap();
    fs::write(dir.path().join("b.jpg"), b"pixels").unwrap();

    let code = dedupe::run_app(cli(
        dir.path(),
        &config_file(&cfg),
        &["--rm", "--hash", "sha256", "-o", "json"],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_run_app_no_duplicates() {
    let cfg = tempdir().unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"one").unwrap();
    fs::write(dir.path().join("b"), b"two").unwrap();

    let code = dedupe::run_app(cli(dir.path(), &config_file(&cfg), &[])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!dir.path().join(DUPLICATES_DIR).exists());
}

#[test]
fn test_run_app_rejects_bad_config() {
    let cfg = tempdir().unwrap();
    let path = cfg.path().join("bad.toml");
    fs::write(&path, "chunk_size = 0\n").unwrap();
    let dir = tempdir().unwrap();

    let err = dedupe::run_app(cli(dir.path(), &path.to_string_lossy(), &[])).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_cli_rejects_missing_folder() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let result = Cli::try_parse_from(["dedupe".to_string(), missing.to_string_lossy().into_owned()]);

    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_algorithm() {
    let dir = tempdir().unwrap();

    let result = Cli::try_parse_from([
        "dedupe".to_string(),
        "--hash".to_string(),
        "crc32".to_string(),
        dir.path().to_string_lossy().into_owned(),
    ]);

    let err = result.unwrap_err().to_string();
    assert!(err.contains("unsupported hash algorithm"));
}
