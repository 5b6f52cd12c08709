//! Generic salt codec shared by hex-salted formats.

/// Upper bound on decoded salt bytes, matching the engine's salt storage.
pub const SALT_MAX: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SaltError {
    #[error("salt is not valid hex")]
    Malformed,
    #[error("salt length {0} exceeds maximum {SALT_MAX}")]
    TooLong(usize),
}

/// Decode a hex salt field into raw bytes, bounded by [`SALT_MAX`].
pub fn decode_hex(field: &str) -> Result<Vec<u8>, SaltError> {
    let bytes = const_hex::decode(field).map_err(|_| SaltError::Malformed)?;

    if bytes.len() > SALT_MAX {
        return Err(SaltError::TooLong(bytes.len()));
    }

    Ok(bytes)
}

/// Inverse of [`decode_hex`]; lowercase, no prefix.
pub fn encode_hex(salt: &[u8]) -> String {
    const_hex::encode(salt)
}

/// Interpret the leading salt bytes as little-endian 32-bit words.
pub fn leading_words<const N: usize>(salt: &[u8]) -> [u32; N] {
    let mut words = [0u32; N];
    for (i, word) in words.iter_mut().enumerate() {
        let mut buf = [0u8; 4];
        let offset = i * 4;
        if offset < salt.len() {
            let take = (salt.len() - offset).min(4);
            buf[..take].copy_from_slice(&salt[offset..offset + take]);
        }
        *word = u32::from_le_bytes(buf);
    }
    words
}
