//! Integration test: gpuprof.toml loading and validation
//!
//! Run with: cargo test -p gpuprof-core --test config_test

use std::io::Write;
use std::path::PathBuf;

use gpuprof_core::config::{
    default_config_path, resolve_config_path, GpuprofConfig, ProbeConfig, CONFIG_ENV,
};
use gpuprof_core::CoreError;
use gpuprof_driver::Backend;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("temp path is UTF-8")
}

#[test]
fn test_defaults_probe_every_backend() {
    let config = GpuprofConfig::default();
    assert_eq!(config.probe.backends, Backend::ALL.to_vec());
    assert!(config.probe.required.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("");
    let config = GpuprofConfig::load(path_of(&file)).expect("empty config is valid");
    assert_eq!(config, GpuprofConfig::default());
}

#[test]
fn test_load_backends_and_required() {
    let file = write_config(
        r#"
[probe]
backends = ["cuda", "cupti"]
required = ["cuda"]
"#,
    );
    let config = GpuprofConfig::load(path_of(&file)).expect("load config");
    assert_eq!(
        config.probe,
        ProbeConfig {
            backends: vec![Backend::Cuda, Backend::Cupti],
            required: vec![Backend::Cuda],
        }
    );
}

#[test]
fn test_required_must_be_probed() {
    let file = write_config(
        r#"
[probe]
backends = ["cupti"]
required = ["roctracer"]
"#,
    );
    let err = GpuprofConfig::load(path_of(&file)).expect_err("roctracer is not probed");
    println!("{}", err);
    assert!(matches!(err, CoreError::ConfigError(_)));
    assert!(err.to_string().contains("roctracer"));
}

#[test]
fn test_unknown_backend_is_a_parse_error() {
    let file = write_config("[probe]\nbackends = [\"opencl\"]\n");
    let err = GpuprofConfig::load(path_of(&file)).expect_err("opencl is not a backend");
    assert!(matches!(err, CoreError::Parse(_)));
}

#[test]
fn test_load_or_default_falls_back() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("gpuprof.toml");
    let config = GpuprofConfig::load_or_default(missing.to_str().expect("UTF-8 path"));
    assert_eq!(config, GpuprofConfig::default());

    let invalid = write_config("[probe]\nrequired = 3\n");
    assert_eq!(GpuprofConfig::load_or_default(path_of(&invalid)), GpuprofConfig::default());
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = GpuprofConfig::default();
    config.probe.required = vec![Backend::Cupti];

    let text = toml::to_string(&config).expect("serialize config");
    println!("{}", text);
    assert!(text.contains("required = [\"cupti\"]"));
    let parsed: GpuprofConfig = toml::from_str(&text).expect("parse serialized config");
    assert_eq!(parsed, config);
}

#[test]
fn test_explicit_config_path_wins() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let present = dir.path().join("present.toml");
    std::fs::write(&present, "").expect("write candidate");

    let explicit = PathBuf::from("/srv/profiling/gpuprof.toml");
    assert_eq!(
        resolve_config_path(Some(explicit.clone()), &[present.clone()]),
        explicit
    );
    // an empty override is ignored
    assert_eq!(resolve_config_path(Some(PathBuf::new()), &[present.clone()]), present);
}

#[test]
fn test_first_existing_candidate_is_used() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let absent = dir.path().join("absent.toml");
    let present = dir.path().join("present.toml");
    std::fs::write(&present, "").expect("write candidate");

    assert_eq!(resolve_config_path(None, &[absent.clone(), present.clone()]), present);
    // directories are not config files
    assert_eq!(
        resolve_config_path(None, &[dir.path().to_path_buf(), absent]),
        PathBuf::from("gpuprof.toml")
    );
}

#[test]
fn test_config_env_overrides_default_path() {
    let file = write_config("[probe]\nbackends = [\"cuda\"]\n");
    std::env::set_var(CONFIG_ENV, file.path());

    let path = default_config_path();
    std::env::remove_var(CONFIG_ENV);

    assert_eq!(path, file.path());
    let config = GpuprofConfig::load_or_default(&path);
    assert_eq!(config.probe.backends, vec![Backend::Cuda]);
}
