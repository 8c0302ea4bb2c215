// crates/fastembed-core/src/tokenizer.rs
//
// Tokenizer contract for the model path, and a placeholder word tokenizer.
//
// `SimpleTokenizer` is not a WordPiece tokenizer. It only produces ids in the
// shape a BERT-style model expects ([CLS] ... [SEP]) so the inference
// pipeline can run end to end.

use crate::config::VOCAB_SIZE;
use crate::error::EmbedError;

/// [CLS] start marker.
pub const CLS_TOKEN_ID: i64 = 101;

/// [SEP] end marker.
pub const SEP_TOKEN_ID: i64 = 102;

/// Ids below this are reserved for special tokens.
const FIRST_WORD_ID: u32 = 100;

/// Converts text into a bounded sequence of token ids.
///
/// Implementations must be deterministic, prepend a start marker and
/// append an end marker, and truncate (not fail) when the text produces
/// more than `max_length` tokens.
pub trait Tokenizer: Send {
    fn tokenize(&self, text: &str, max_length: usize) -> Result<Vec<i64>, EmbedError>;
}

/// Hash-per-word tokenizer over ASCII whitespace and punctuation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTokenizer;

impl SimpleTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn word_id(hash: u32) -> i64 {
        let id = hash % VOCAB_SIZE;
        let id = if id < FIRST_WORD_ID { id + FIRST_WORD_ID } else { id };
        i64::from(id)
    }
}

fn is_separator(b: u8) -> bool {
    // C `isspace` also counts vertical tab.
    b.is_ascii_whitespace() || b == 0x0B || b.is_ascii_punctuation()
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str, max_length: usize) -> Result<Vec<i64>, EmbedError> {
        if max_length < 2 {
            return Err(EmbedError::Tokenization(format!(
                "max_length {} leaves no room for [CLS] and [SEP]",
                max_length
            )));
        }

        let word_budget = max_length - 1;
        let mut ids = Vec::with_capacity(max_length.min(text.len() + 2));
        ids.push(CLS_TOKEN_ID);

        let mut hash: u32 = 0;
        let mut in_word = false;
        for &b in text.as_bytes().iter().take_while(|&&b| b != 0) {
            if ids.len() >= word_budget {
                break;
            }
            if is_separator(b) {
                if in_word {
                    ids.push(Self::word_id(hash));
                    hash = 0;
                }
                in_word = false;
            } else {
                hash = hash
                    .wrapping_mul(31)
                    .wrapping_add(u32::from(b.to_ascii_lowercase()));
                in_word = true;
            }
        }
        if in_word && ids.len() < word_budget {
            ids.push(Self::word_id(hash));
        }

        ids.push(SEP_TOKEN_ID);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hash(word: &str) -> u32 {
        word.bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
    }

    #[test]
    fn test_markers() {
        let ids = SimpleTokenizer::new().tokenize("hello", 16).unwrap();
        assert_eq!(ids.first(), Some(&CLS_TOKEN_ID));
        assert_eq!(ids.last(), Some(&SEP_TOKEN_ID));
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_word_ids() {
        let ids = SimpleTokenizer::new().tokenize("Hello, world!", 16).unwrap();
        let hello = i64::from(word_hash("hello") % VOCAB_SIZE);
        let world = i64::from(word_hash("world") % VOCAB_SIZE);
        assert_eq!(ids, vec![CLS_TOKEN_ID, hello, world, SEP_TOKEN_ID]);
    }

    #[test]
    fn test_case_insensitive() {
        let tokenizer = SimpleTokenizer::new();
        assert_eq!(
            tokenizer.tokenize("Hello World", 16).unwrap(),
            tokenizer.tokenize("hello world", 16).unwrap()
        );
    }

    #[test]
    fn test_reserved_ids_shifted() {
        // "a" hashes to 97, inside the reserved range.
        let ids = SimpleTokenizer::new().tokenize("a", 16).unwrap();
        assert_eq!(ids[1], 197);
    }

    #[test]
    fn test_empty_and_separator_only() {
        let tokenizer = SimpleTokenizer::new();
        assert_eq!(tokenizer.tokenize("", 16).unwrap(), vec![CLS_TOKEN_ID, SEP_TOKEN_ID]);
        assert_eq!(
            tokenizer.tokenize(" \t.,;\x0b", 16).unwrap(),
            vec![CLS_TOKEN_ID, SEP_TOKEN_ID]
        );
    }

    #[test]
    fn test_truncates_to_max_length() {
        let text = "word ".repeat(100);
        let ids = SimpleTokenizer::new().tokenize(&text, 10).unwrap();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids[0], CLS_TOKEN_ID);
        assert_eq!(ids[9], SEP_TOKEN_ID);
    }

    #[test]
    fn test_rejects_tiny_max_length() {
        assert!(matches!(
            SimpleTokenizer::new().tokenize("hello", 1),
            Err(EmbedError::Tokenization(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let tokenizer = SimpleTokenizer::new();
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(
            tokenizer.tokenize(text, 64).unwrap(),
            tokenizer.tokenize(text, 64).unwrap()
        );
    }
}
