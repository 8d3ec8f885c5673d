//! Reports which vendor libraries this host can load.

use gpuprof_common::platform::{library_search_path_var, platform_name};
use gpuprof_dispatch::DispatchError;
use gpuprof_driver::Backend;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub backend: Backend,
    pub library: &'static str,
    pub default_dir: Option<&'static str>,
    pub loaded: bool,
    pub version: Option<i64>,
    /// Why loading or the version query failed
    pub error: Option<String>,
}

impl BackendStatus {
    /// Builds the status from the outcome of a version query.
    ///
    /// `loaded` is taken separately: the library can be loaded while the
    /// query itself fails (e.g. a driver that is not initialised).
    pub fn from_version(
        backend: Backend,
        loaded: bool,
        version: Result<Option<i64>, DispatchError>,
    ) -> Self {
        let (version, error) = match version {
            Ok(v) => (v, None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            backend,
            library: backend.library_name(),
            default_dir: backend.default_dir(),
            loaded,
            version,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub platform: &'static str,
    pub search_path_var: &'static str,
    pub backends: Vec<BackendStatus>,
}

impl ProbeReport {
    pub fn new(backends: Vec<BackendStatus>) -> Self {
        Self {
            platform: platform_name(),
            search_path_var: library_search_path_var(),
            backends,
        }
    }

    pub fn get(&self, backend: Backend) -> Option<&BackendStatus> {
        self.backends.iter().find(|s| s.backend == backend)
    }

    /// Required backends that were not probed or could not be loaded.
    pub fn missing_required(&self, required: &[Backend]) -> Vec<Backend> {
        required
            .iter()
            .copied()
            .filter(|b| !self.get(*b).is_some_and(|s| s.loaded))
            .collect()
    }

    pub fn check_required(&self, required: &[Backend]) -> Result<(), CoreError> {
        let missing = self.missing_required(required);
        if missing.is_empty() {
            return Ok(());
        }
        for backend in &missing {
            let reason = self
                .get(*backend)
                .and_then(|s| s.error.as_deref())
                .unwrap_or("not probed");
            warn!("required backend {} is missing: {}", backend, reason);
        }
        Err(CoreError::MissingBackends(missing))
    }
}

/// Tries to load each backend once and records the outcome. Duplicates are
/// probed once, in first-seen order.
pub fn probe(backends: &[Backend]) -> ProbeReport {
    let mut statuses: Vec<BackendStatus> = Vec::with_capacity(backends.len());
    for &backend in backends {
        if statuses.iter().any(|s| s.backend == backend) {
            continue;
        }
        let version = backend.version();
        let status = BackendStatus::from_version(backend, backend.is_loaded(), version);
        if status.loaded {
            info!("{} available ({})", backend, status.library);
        }
        statuses.push(status);
    }
    ProbeReport::new(statuses)
}
