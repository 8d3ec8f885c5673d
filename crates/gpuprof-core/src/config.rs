use std::path::{Path, PathBuf};

use gpuprof_driver::Backend;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;

/// Top-level gpuprof configuration, loaded from gpuprof.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuprofConfig {
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Backends to probe (default: all)
    #[serde(default = "default_backends")]
    pub backends: Vec<Backend>,
    /// Backends whose absence makes `gpuprof probe` fail
    #[serde(default)]
    pub required: Vec<Backend>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            backends: default_backends(),
            required: Vec::new(),
        }
    }
}

impl GpuprofConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: GpuprofConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(CoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(b) = self
            .probe
            .required
            .iter()
            .find(|b| !self.probe.backends.contains(b))
        {
            return Err(CoreError::ConfigError(format!(
                "required backend '{}' is not listed in probe.backends",
                b
            )));
        }
        Ok(())
    }
}

/// Environment variable naming the config file; overrides the search below.
pub const CONFIG_ENV: &str = "GPUPROF_CONFIG";

/// Config file used when `--config` is not given: `$GPUPROF_CONFIG` if set
/// and non-empty, else the first existing candidate of [`config_candidates`],
/// else `gpuprof.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    resolve_config_path(from_env, &config_candidates())
}

/// Picks the config path from an explicit override and a list of candidates.
pub fn resolve_config_path(explicit: Option<PathBuf>, candidates: &[PathBuf]) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return path;
    }
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
}

/// Per-user, then system-wide config locations.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        candidates.push(Path::new(&dir).join("gpuprof").join(LOCAL_CONFIG));
    }
    if cfg!(windows) {
        if let Some(dir) = std::env::var_os("PROGRAMDATA") {
            candidates.push(Path::new(&dir).join("gpuprof").join(LOCAL_CONFIG));
        }
    } else {
        candidates.push(PathBuf::from("/etc/gpuprof").join(LOCAL_CONFIG));
    }
    candidates
}

const LOCAL_CONFIG: &str = "gpuprof.toml";

fn default_backends() -> Vec<Backend> {
    Backend::ALL.to_vec()
}
