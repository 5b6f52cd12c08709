use pwseek_common::{salt::SaltError, token::TokenizeError};

use crate::params::ScryptParams;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("token error: {0}")]
    Token(#[from] TokenizeError),
    #[error("unsupported format version digit {0:?}")]
    SaltValue(char),
    #[error("salt error: {0}")]
    SaltLength(#[from] SaltError),
    #[error("batch disagrees on scrypt parameters: expected {expected:?}, found {found:?}")]
    InconsistentParams {
        expected: ScryptParams,
        found: ScryptParams,
    },
    #[error("insufficient device memory: no usable buffer for concurrency {concurrency}")]
    InsufficientMemory { concurrency: u32 },
}
