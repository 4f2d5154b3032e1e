use thiserror::Error;

/// Error taxonomy for one command invocation.
///
/// `Config`, `Usage`, and `Csv` are fatal: they abort before any batch work and
/// reach `main` via `?`. `Transport`, `Api`, and `Rejected` occur per row
/// during submission and are recorded in the batch report instead of
/// propagating.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("failed to read CSV file {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The server answered 2xx but reported failure in the reply body
    /// (e.g. `["object_exists", "john@example.com"]`).
    #[error("{0}")]
    Rejected(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
