use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PdbError {
    #[error("invalid PDB id: {0}")]
    InvalidId(String),

    #[error("network error reaching RCSB: {0}")]
    Network(String),

    #[error("RCSB returned client error {status}")]
    ClientStatus {
        status: u16,
        retry_after: Option<String>,
    },

    #[error("RCSB returned server error {status}")]
    ServerStatus { status: u16 },

    #[error("RCSB returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("corrupt cache entry at {path}: {message}")]
    CorruptCache { path: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
