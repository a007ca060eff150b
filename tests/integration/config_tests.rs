use clap::Parser;
use dedupe::cli::Cli;
use dedupe::config::{Config, ConfigError};
use dedupe::duplicates::DedupeConfig;
use dedupe::actions::Action;
use dedupe::scanner::HashAlgorithm;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_explicit_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "algorithm = \"sha256\"\nchunk_size = 4096\nio_threads = 2\nremove = true\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.chunk_size, 4096);
    assert_eq!(config.io_threads, 2);
    assert!(config.remove);
    assert!(!config.continue_on_error);
}

#[test]
fn test_load_missing_explicit_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    match Config::load(Some(&path)) {
        Err(ConfigError::MissingFile(p)) => assert_eq!(p, path),
        other => panic!("Expected MissingFile, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_unknown_algorithm() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"crc32\"\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
    assert!(err.to_string().contains("failed to load configuration"));
}

#[test]
fn test_load_rejects_zero_threads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = 0\n").unwrap();

    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::InvalidIoThreads)
    ));
}

#[test]
fn test_cli_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"sha1\"\nchunk_size = 4096\n").unwrap();

    let cli = Cli::try_parse_from([
        "dedupe".to_string(),
        "--hash".to_string(),
        "BLAKE3".to_string(),
        "--remove".to_string(),
        "--keep-going".to_string(),
        dir.path().to_string_lossy().into_owned(),
    ])
    .unwrap();
    let config = cli.apply_to(Config::load(Some(&path)).unwrap()).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.chunk_size, 4096);
    assert!(config.remove);
    assert!(config.continue_on_error);

    let run = DedupeConfig::from(&config);
    assert_eq!(run.action, Action::Delete);
    assert_eq!(run.algorithm, HashAlgorithm::Blake3);
}
