//! Authority persistence tests for grid-manager-config.
// crates/grid-manager-config/tests/authority_store.rs
// =============================================================================
// Module: Authority Store Tests
// Description: Validate directory and stdio persistence of authority state.
// Purpose: Ensure configs round-trip and certificate files never overwrite.
// =============================================================================

use std::fs;

use grid_manager_config::AUTHORITY_CONFIG_FILE;
use grid_manager_config::AuthorityStore;
use grid_manager_config::ConfigLocation;
use grid_manager_config::MAX_AUTHORITY_CONFIG_SIZE;
use grid_manager_config::StoreError;
use grid_manager_config::certificate_file_name;
use grid_manager_core::GridManagerConfig;
use grid_manager_core::PrivateKey;
use grid_manager_core::ServerName;
use grid_manager_core::SignedCertificate;
use grid_manager_core::SigningPolicy;
use grid_manager_core::Timestamp;

type TestResult = Result<(), String>;

fn authority() -> Result<GridManagerConfig, String> {
    let server_key = PrivateKey::from_seed(&[9; 32]).public_key().encode();
    GridManagerConfig::from_private_key(PrivateKey::from_seed(&[1; 32]))
        .add("storage0", &server_key)
        .map_err(|err| err.to_string())
}

fn server_name(name: &str) -> Result<ServerName, String> {
    ServerName::parse(name).map_err(|err| err.to_string())
}

#[test]
fn location_dash_selects_stdio() -> TestResult {
    if ConfigLocation::parse("-") != ConfigLocation::Stdio {
        return Err("dash should select stdio".to_string());
    }
    if ConfigLocation::parse("gm") != ConfigLocation::Directory("gm".into()) {
        return Err("path should select a directory".to_string());
    }
    Ok(())
}

#[test]
fn directory_create_save_load_round_trip() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let dir = root.path().join("gm");
    let store = AuthorityStore::new(ConfigLocation::Directory(dir.clone()));
    let config = authority()?;
    store.create(&config, std::io::sink()).map_err(|err| err.to_string())?;
    if !dir.join(AUTHORITY_CONFIG_FILE).is_file() {
        return Err("config.json not written".to_string());
    }
    let loaded = store.load(std::io::empty()).map_err(|err| err.to_string())?;
    if loaded != config {
        return Err("loaded config differs".to_string());
    }
    Ok(())
}

#[test]
fn create_refuses_existing_directory() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let store = AuthorityStore::new(ConfigLocation::Directory(root.path().to_path_buf()));
    match store.create(&authority()?, std::io::sink()) {
        Err(StoreError::AlreadyExists(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(()) => Err("create overwrote an existing directory".to_string()),
    }
}

#[test]
fn stdio_save_then_load() -> TestResult {
    let store = AuthorityStore::new(ConfigLocation::Stdio);
    let config = authority()?;
    let mut buffer = Vec::new();
    store.save(&config, &mut buffer).map_err(|err| err.to_string())?;
    let text = String::from_utf8(buffer.clone()).map_err(|err| err.to_string())?;
    if !text.contains("\"storage_servers\"") || !text.ends_with('\n') {
        return Err(format!("unexpected stdout config: {text}"));
    }
    let loaded = store.load(buffer.as_slice()).map_err(|err| err.to_string())?;
    if loaded != config {
        return Err("stdio round trip differs".to_string());
    }
    Ok(())
}

#[test]
fn load_missing_directory_config_is_not_found() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let store = AuthorityStore::new(ConfigLocation::Directory(root.path().join("absent")));
    match store.load(std::io::empty()) {
        Err(StoreError::NotFound(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("expected missing config".to_string()),
    }
}

#[test]
fn load_rejects_oversized_stdin() -> TestResult {
    let store = AuthorityStore::new(ConfigLocation::Stdio);
    let input = vec![b' '; MAX_AUTHORITY_CONFIG_SIZE + 1];
    match store.load(input.as_slice()) {
        Err(StoreError::TooLarge {
            ..
        }) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("expected size limit".to_string()),
    }
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let dir = root.path().join("gm");
    let store = AuthorityStore::new(ConfigLocation::Directory(dir.clone()));
    store.create(&authority()?, std::io::sink()).map_err(|err| err.to_string())?;
    let path = dir.join(AUTHORITY_CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|err| err.to_string())?;
    fs::write(&path, text.replacen('{', "{\"extra\": 1,", 1)).map_err(|err| err.to_string())?;
    match store.load(std::io::empty()) {
        Err(StoreError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("unknown field accepted".to_string()),
    }
}

#[test]
fn certificate_files_get_numbered_suffixes() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let dir = root.path().join("gm");
    let store = AuthorityStore::new(ConfigLocation::Directory(dir.clone()));
    let config = authority()?;
    store.create(&config, std::io::sink()).map_err(|err| err.to_string())?;
    let name = server_name("storage0")?;
    let now = Timestamp::from_unix_seconds(1_000);
    let mut written = Vec::new();
    for version in 1 ..= 3 {
        let certificate = config
            .sign("storage0", version, SigningPolicy::new(60), now)
            .map_err(|err| err.to_string())?;
        let path = store.write_certificate(&name, &certificate).map_err(|err| err.to_string())?;
        written.push(path.ok_or("directory store returned no path")?);
    }
    let expected = vec![
        dir.join("storage0.cert"),
        dir.join("storage0.cert.1"),
        dir.join("storage0.cert.2"),
    ];
    if written != expected {
        return Err(format!("unexpected certificate paths {}", written.len()));
    }
    let first = fs::read(&expected[0]).map_err(|err| err.to_string())?;
    let parsed = SignedCertificate::from_json_slice(&first).map_err(|err| err.to_string())?;
    let body = parsed.body().map_err(|err| err.to_string())?;
    if body.version != 1 {
        return Err("first certificate was overwritten".to_string());
    }
    Ok(())
}

#[test]
fn certificate_file_stays_inside_directory() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let dir = root.path().join("gm");
    let store = AuthorityStore::new(ConfigLocation::Directory(dir.clone()));
    let config = authority()?;
    store.create(&config, std::io::sink()).map_err(|err| err.to_string())?;
    let escaped_key = PrivateKey::from_seed(&[3; 32]).public_key().encode();
    if config.clone().add("../escaped", &escaped_key).is_ok() {
        return Err("path-like roster name accepted".to_string());
    }
    let certificate = config
        .sign("storage0", 1, SigningPolicy::new(60), Timestamp::from_unix_seconds(0))
        .map_err(|err| err.to_string())?;
    match store.write_certificate(&ServerName::new("../escaped"), &certificate) {
        Err(StoreError::Invalid(_)) => {}
        Err(other) => return Err(format!("unexpected error {other}")),
        Ok(_) => return Err("certificate written for a path-like name".to_string()),
    }
    if root.path().join("escaped.cert").exists() {
        return Err("certificate escaped the config directory".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_path_like_roster_names() -> TestResult {
    let store = AuthorityStore::new(ConfigLocation::Stdio);
    let mut saved = Vec::new();
    store.save(&authority()?, &mut saved).map_err(|err| err.to_string())?;
    let text = String::from_utf8(saved).map_err(|err| err.to_string())?;
    let tampered = text.replace("\"storage0\"", "\"../escaped\"");
    if tampered == text {
        return Err("saved config missing roster name".to_string());
    }
    match store.load(tampered.as_bytes()) {
        Err(StoreError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("path-like roster name loaded".to_string()),
    }
}

#[test]
fn stdio_store_writes_no_certificate_file() -> TestResult {
    let store = AuthorityStore::new(ConfigLocation::Stdio);
    let config = authority()?;
    let certificate = config
        .sign("storage0", 1, SigningPolicy::new(60), Timestamp::from_unix_seconds(0))
        .map_err(|err| err.to_string())?;
    let path = store
        .write_certificate(&server_name("storage0")?, &certificate)
        .map_err(|err| err.to_string())?;
    if path.is_some() {
        return Err("stdio store wrote a file".to_string());
    }
    Ok(())
}

#[test]
fn certificate_file_name_format() -> TestResult {
    let name = server_name("alice")?;
    if certificate_file_name(&name, 0) != "alice.cert"
        || certificate_file_name(&name, 4) != "alice.cert.4"
    {
        return Err("unexpected certificate file names".to_string());
    }
    Ok(())
}
