//! Generic tokenizer contract for textual hash records.
//!
//! A record is a signature prefix followed by fixed-length fields split on a
//! literal separator. Format plugins describe the shape with a [`TokenSpec`]
//! and get back borrowed field slices; all structural mismatches surface as a
//! typed [`TokenizeError`] so the caller can report them verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Any,
    Digit,
    Hex,
}

impl CharClass {
    fn accepts(self, b: u8) -> bool {
        match self {
            Self::Any => true,
            Self::Digit => b.is_ascii_digit(),
            Self::Hex => b.is_ascii_hexdigit(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Exact field length in bytes.
    pub len: usize,
    /// Separator terminating the field. The last field must not carry one;
    /// it instead consumes the rest of the line.
    pub sep: Option<char>,
    pub class: CharClass,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenSpec<'a> {
    /// Fixed prefix, verified byte-for-byte before any field is read.
    pub signature: Option<&'a str>,
    pub fields: &'a [FieldSpec],
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("signature mismatch")]
    Signature,
    #[error("missing separator after field {0}")]
    MissingSeparator(usize),
    #[error("field {field} has length {found}, expected {expected}")]
    Length {
        field: usize,
        expected: usize,
        found: usize,
    },
    #[error("field {field} contains a character outside class {class:?}")]
    Class { field: usize, class: CharClass },
    #[error("trailing data after last field")]
    TrailingData,
}

/// Split `line` into exactly `spec.fields.len()` borrowed slices.
pub fn tokenize<'a>(line: &'a str, spec: &TokenSpec) -> Result<Vec<&'a str>, TokenizeError> {
    let mut rest = match spec.signature {
        Some(sig) => line.strip_prefix(sig).ok_or(TokenizeError::Signature)?,
        None => line,
    };

    let mut fields = Vec::with_capacity(spec.fields.len());

    for (i, field) in spec.fields.iter().enumerate() {
        let token = match field.sep {
            Some(sep) => {
                let (token, tail) = rest
                    .split_once(sep)
                    .ok_or(TokenizeError::MissingSeparator(i))?;
                rest = tail;
                token
            }
            None => std::mem::take(&mut rest),
        };

        if token.len() != field.len {
            return Err(TokenizeError::Length {
                field: i,
                expected: field.len,
                found: token.len(),
            });
        }

        if token.bytes().any(|b| !field.class.accepts(b)) {
            return Err(TokenizeError::Class {
                field: i,
                class: field.class,
            });
        }

        fields.push(token);
    }

    if !rest.is_empty() {
        return Err(TokenizeError::TrailingData);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: TokenSpec = TokenSpec {
        signature: Some("$t$"),
        fields: &[
            FieldSpec {
                len: 1,
                sep: Some('$'),
                class: CharClass::Digit,
            },
            FieldSpec {
                len: 4,
                sep: None,
                class: CharClass::Hex,
            },
        ],
    };

    #[test]
    fn splits_fields() {
        let fields = tokenize("$t$4$beef", &SPEC).unwrap();
        assert_eq!(fields, vec!["4", "beef"]);
    }

    #[test]
    fn rejects_bad_signature() {
        assert_eq!(tokenize("$x$4$beef", &SPEC), Err(TokenizeError::Signature));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            tokenize("$t$4$beefbeef", &SPEC),
            Err(TokenizeError::Length {
                field: 1,
                expected: 4,
                found: 8
            })
        );
    }

    #[test]
    fn rejects_wrong_class() {
        assert_eq!(
            tokenize("$t$a$beef", &SPEC),
            Err(TokenizeError::Class {
                field: 0,
                class: CharClass::Digit
            })
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(tokenize("$t$4beef", &SPEC), Err(TokenizeError::MissingSeparator(0)));
    }
}
