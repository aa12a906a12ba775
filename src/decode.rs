//! Percent decoding of path and query components.
use crate::errors::ParseError;

/// Percent decoding used by [`crate::Parser`] before any path or query
/// grammar is applied. A failure is always reported as a
/// [`crate::ParseErrorType::DecodeError`].
pub trait Decoder {
    fn decode_path(&self, path: &str) -> Result<String, ParseError>;
    fn decode_query(&self, query: &str) -> Result<String, ParseError>;
}

/// The default decoder. Rejects `%` not followed by two hex digits and
/// decoded bytes that are not valid UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct PercentDecoder;

impl Decoder for PercentDecoder {
    fn decode_path(&self, path: &str) -> Result<String, ParseError> {
        unescape(path)
    }

    fn decode_query(&self, query: &str) -> Result<String, ParseError> {
        // '+' must be replaced before unescaping so that "%2B" survives as '+'
        if query.contains('+') {
            unescape(&query.replace('+', " "))
        } else {
            unescape(query)
        }
    }
}

fn unescape(s: &str) -> Result<String, ParseError> {
    validate_escapes(s)?;
    urlencoding::decode(s)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| ParseError::decode(format!("invalid UTF-8 in {:?}: {}", s, err)))
}

fn validate_escapes(s: &str) -> Result<(), ParseError> {
    let bytes = s.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'%' {
            let escape = bytes.get(index + 1..index + 3);
            match escape {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    index += 3;
                    continue;
                }
                _ => {
                    // the escape may end inside a multi-byte character
                    let end = s
                        .char_indices()
                        .map(|(i, _)| i)
                        .find(|&i| i >= index + 3)
                        .unwrap_or(s.len());
                    return Err(ParseError::decode(format!(
                        "invalid URL escape {:?}",
                        &s[index..end]
                    )));
                }
            }
        }
        index += 1;
    }

    Ok(())
}
