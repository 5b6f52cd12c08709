use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("format error: {0}")]
    Format(#[from] pwseek_bestcrypt::error::FormatError),
    #[error("no decodable records in {0}")]
    EmptyHashFile(PathBuf),
}
