//! Record codec for the `$bcve$` textual hash format.
//!
//! `$bcve$<version:1 digit>$<subtype:2 hex>$<salt:48 hex>$<ciphertext:192 hex>`
//!
//! Decode and encode are exact inverses for every decodable line.

use pwseek_common::{
    salt,
    token::{tokenize, CharClass, FieldSpec, TokenSpec, TokenizeError},
};

use crate::error::FormatError;

pub const SIGNATURE: &str = "$bcve$";

/// Decoded salt length in bytes (48 hex chars on the wire).
pub const SALT_LEN: usize = 24;
/// Ciphertext length in 32-bit words (192 hex chars on the wire).
pub const CIPHERTEXT_WORDS: usize = 24;
/// First ciphertext word of the digest pre-filter.
pub const DIGEST_WORD_OFFSET: usize = 16;

const FORMAT_VERSION: &str = "4";

const TOKEN_SPEC: TokenSpec = TokenSpec {
    signature: Some(SIGNATURE),
    fields: &[
        // format version
        FieldSpec {
            len: 1,
            sep: Some('$'),
            class: CharClass::Digit,
        },
        // crypto sub-type
        FieldSpec {
            len: 2,
            sep: Some('$'),
            class: CharClass::Hex,
        },
        // salt
        FieldSpec {
            len: SALT_LEN * 2,
            sep: Some('$'),
            class: CharClass::Hex,
        },
        // ciphertext
        FieldSpec {
            len: CIPHERTEXT_WORDS * 8,
            sep: None,
            class: CharClass::Hex,
        },
    ],
};

/// One decoded `$bcve$` record. Ciphertext words are little-endian; the
/// digest is a fixed sub-slice of them, used as a cheap pre-filter before
/// full verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    /// ASCII second nibble of the crypto sub-type field.
    pub version: u8,
    /// Salt bytes in generic (wire) byte order.
    pub salt: Vec<u8>,
    /// First two salt words, byte-swapped for the kernel, which reads the
    /// salt in the opposite byte order from the generic representation.
    pub salt_head: [u32; 2],
    pub ciphertext: [u32; CIPHERTEXT_WORDS],
}

impl HashRecord {
    /// Digest pre-filter: ciphertext words 16..=19, no transformation.
    pub fn digest(&self) -> [u32; 4] {
        [
            self.ciphertext[DIGEST_WORD_OFFSET],
            self.ciphertext[DIGEST_WORD_OFFSET + 1],
            self.ciphertext[DIGEST_WORD_OFFSET + 2],
            self.ciphertext[DIGEST_WORD_OFFSET + 3],
        ]
    }
}

pub fn decode(line: &str) -> Result<HashRecord, FormatError> {
    let fields = tokenize(line, &TOKEN_SPEC)?;

    if fields[0] != FORMAT_VERSION {
        return Err(FormatError::SaltValue(fields[0].as_bytes()[0] as char));
    }

    let version = fields[1].as_bytes()[1];

    let salt = salt::decode_hex(fields[2])?;

    let salt_words: [u32; 2] = salt::leading_words(&salt);
    let salt_head = [salt_words[0].swap_bytes(), salt_words[1].swap_bytes()];

    // the tokenizer has already vetted length and character class
    let bytes: [u8; CIPHERTEXT_WORDS * 4] = const_hex::decode_to_array(fields[3])
        .map_err(|_| TokenizeError::Class {
            field: 3,
            class: CharClass::Hex,
        })?;

    let mut ciphertext = [0u32; CIPHERTEXT_WORDS];
    for (word, chunk) in ciphertext.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(HashRecord {
        version,
        salt,
        salt_head,
        ciphertext,
    })
}

/// Left inverse of [`decode`]: reproduces the exact textual form.
pub fn encode(record: &HashRecord) -> String {
    let mut bytes = [0u8; CIPHERTEXT_WORDS * 4];
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(record.ciphertext.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }

    format!(
        "{SIGNATURE}{FORMAT_VERSION}$0{}${}${}",
        record.version as char,
        salt::encode_hex(&record.salt),
        const_hex::encode(bytes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR: &str = "$bcve$4$08$323631353538333233323034363039393534383233393530$9f7892b8324b1d8cd36b5f2f8705b407131261620a89370db8369046646f5f82b96780453948db53b04928ae0cc47066f13454b34e31b58ea44ce943bcba14fcbd87f17205a31a896df182629ceea164d87e9e29127e8d865ca0bee52f832723";

    #[test]
    fn decodes_known_vector() {
        let record = decode(VECTOR).unwrap();

        assert_eq!(record.version, b'8');
        assert_eq!(record.salt, b"261558323204609954823950");
        assert_eq!(record.salt_head, [0x3236_3135, 0x3538_3332]);
        assert_eq!(
            record.digest(),
            [0x72f1_87bd, 0x891a_a305, 0x6282_f16d, 0x64a1_ee9c]
        );
    }

    #[test]
    fn round_trips_byte_for_byte() {
        let record = decode(VECTOR).unwrap();
        assert_eq!(encode(&record), VECTOR);
    }

    #[test]
    fn rejects_wrong_version_digit() {
        let line = VECTOR.replacen("$bcve$4$", "$bcve$3$", 1);
        assert_eq!(decode(&line), Err(FormatError::SaltValue('3')));
    }

    #[test]
    fn rejects_wrong_signature() {
        let line = VECTOR.replacen("$bcve$", "$bcvf$", 1);
        assert_eq!(
            decode(&line),
            Err(FormatError::Token(TokenizeError::Signature))
        );
    }

    #[test]
    fn rejects_truncated_salt() {
        // drop one hex char from the salt field
        let line = VECTOR.replacen("530$", "53$", 1);
        assert_eq!(
            decode(&line),
            Err(FormatError::Token(TokenizeError::Length {
                field: 2,
                expected: 48,
                found: 47,
            }))
        );
    }

    #[test]
    fn rejects_truncated_ciphertext() {
        let line = &VECTOR[..VECTOR.len() - 2];
        assert_eq!(
            decode(line),
            Err(FormatError::Token(TokenizeError::Length {
                field: 3,
                expected: 192,
                found: 190,
            }))
        );
    }

    #[test]
    fn rejects_trailing_data() {
        let line = format!("{VECTOR}ab");
        assert_eq!(
            decode(&line),
            Err(FormatError::Token(TokenizeError::Length {
                field: 3,
                expected: 192,
                found: 194,
            }))
        );
    }

    #[test]
    fn rejects_non_hex_ciphertext() {
        let mut line = VECTOR.to_string();
        line.replace_range(line.len() - 1.., "x");
        assert_eq!(
            decode(&line),
            Err(FormatError::Token(TokenizeError::Class {
                field: 3,
                class: CharClass::Hex,
            }))
        );
    }
}
