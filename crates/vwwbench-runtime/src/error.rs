use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("variant `{variant}` failed to load with {backend}")]
    Backend {
        variant: String,
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("variant `{variant}` does not accept the benchmark input {expected}: {found}")]
    InputMismatch {
        variant: String,
        expected: String,
        found: String,
    },

    #[error("variant `{0}` is already registered")]
    Duplicate(String),
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("a benchmark run is already in progress")]
    Busy,

    #[error("benchmark worker is no longer running")]
    Gone,

    #[error("failed to spawn benchmark worker thread")]
    Spawn(#[from] std::io::Error),
}
