use thiserror::Error;

/// Fatal conditions surfaced to the driver. An exhausted search range is not
/// an error; it is reported as an empty result.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("shard IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("compressor failed: {0}")]
    Compressor(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
