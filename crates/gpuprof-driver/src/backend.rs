use std::fmt;
use std::str::FromStr;

use gpuprof_dispatch::{Dispatch, DispatchError, ExternLib};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cuda::{self, ExternLibCuda};
use crate::cupti::{self, ExternLibCupti};
use crate::roctracer::ExternLibRoctracer;

/// One of the vendor libraries a profiler host can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Cupti,
    Cuda,
    Roctracer,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Cupti, Backend::Cuda, Backend::Roctracer];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Cupti => "cupti",
            Backend::Cuda => "cuda",
            Backend::Roctracer => "roctracer",
        }
    }

    /// File name the loader asks the platform for.
    pub fn library_name(self) -> &'static str {
        match self {
            Backend::Cupti => ExternLibCupti::NAME,
            Backend::Cuda => ExternLibCuda::NAME,
            Backend::Roctracer => ExternLibRoctracer::NAME,
        }
    }

    /// Fallback directory baked in at build time, if any.
    pub fn default_dir(self) -> Option<&'static str> {
        let dir = match self {
            Backend::Cupti => ExternLibCupti::DEFAULT_DIR,
            Backend::Cuda => ExternLibCuda::DEFAULT_DIR,
            Backend::Roctracer => ExternLibRoctracer::DEFAULT_DIR,
        };
        dir.filter(|d| !d.is_empty())
    }

    pub fn ensure_loaded(self) -> Result<(), DispatchError> {
        match self {
            Backend::Cupti => Dispatch::<ExternLibCupti>::ensure_loaded().map(drop),
            Backend::Cuda => Dispatch::<ExternLibCuda>::ensure_loaded().map(drop),
            Backend::Roctracer => Dispatch::<ExternLibRoctracer>::ensure_loaded().map(drop),
        }
    }

    pub fn is_loaded(self) -> bool {
        match self {
            Backend::Cupti => Dispatch::<ExternLibCupti>::is_loaded(),
            Backend::Cuda => Dispatch::<ExternLibCuda>::is_loaded(),
            Backend::Roctracer => Dispatch::<ExternLibRoctracer>::is_loaded(),
        }
    }

    /// Loads the library if needed and reports whether that worked.
    pub fn is_available(self) -> bool {
        match self.ensure_loaded() {
            Ok(()) => true,
            Err(e) => {
                debug!("{} unavailable: {}", self, e);
                false
            }
        }
    }

    /// CUPTI API version or CUDA driver version. roctracer exposes none.
    pub fn version(self) -> Result<Option<i64>, DispatchError> {
        match self {
            Backend::Cupti => cupti::version().map(|v| Some(v.into())),
            Backend::Cuda => cuda::driver_version().map(|v| Some(v.into())),
            Backend::Roctracer => self.ensure_loaded().map(|()| None),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cupti" => Ok(Backend::Cupti),
            "cuda" => Ok(Backend::Cuda),
            "roctracer" => Ok(Backend::Roctracer),
            other => Err(format!(
                "unknown backend '{}', expected one of: cupti, cuda, roctracer",
                other
            )),
        }
    }
}
