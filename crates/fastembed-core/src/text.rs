// crates/fastembed-core/src/text.rs
//
// Text preparation for the hash path.
//
// Text ends at the first NUL byte, as a C string would. ASCII letters are
// folded to lowercase before hashing so that "Hello World", "hello world"
// and "HELLO WORLD" embed identically. Other bytes pass through untouched,
// which keeps the byte length unchanged.

use crate::config::MAX_TEXT_LENGTH;
use crate::error::EmbedError;

/// Bytes of `text` up to (not including) the first NUL byte.
pub fn until_nul(text: &str) -> &[u8] {
    let bytes = text.as_bytes();
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Validate `text` and return the case-folded bytes that get hashed.
pub fn prepare(text: &str) -> Result<Vec<u8>, EmbedError> {
    let bytes = until_nul(text);
    if bytes.is_empty() {
        return Err(EmbedError::EmptyText);
    }
    if bytes.len() > MAX_TEXT_LENGTH {
        return Err(EmbedError::TextTooLong {
            length: bytes.len(),
            max: MAX_TEXT_LENGTH,
        });
    }
    Ok(bytes.to_ascii_lowercase())
}
