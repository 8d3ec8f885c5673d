use gpuprof_driver::Backend;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("required backend(s) not available: {}", join(.0))]
    MissingBackends(Vec<Backend>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join(backends: &[Backend]) -> String {
    backends
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
