// crates/fastembed-cli/src/commands/mod.rs
//
// Command module declarations for the FastEmbed CLI.

pub mod embed;
pub mod model;
pub mod similarity;
pub mod vector;

use std::io::{self, Read};

use crate::error::CliError;

/// Use `arg` when given, otherwise read all of stdin.
///
/// Trailing newlines are stripped so `echo text | fastembed embed` embeds
/// `text`, not `text\n`.
pub fn read_input(arg: Option<&str>) -> Result<String, CliError> {
    match arg {
        Some(text) => Ok(text.to_string()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(strip_trailing_newlines(&buffer).to_string())
        }
    }
}

fn strip_trailing_newlines(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_wins() {
        assert_eq!(read_input(Some("hello\n")).unwrap(), "hello\n");
    }

    #[test]
    fn test_strip_trailing_newlines() {
        assert_eq!(strip_trailing_newlines("hello\n"), "hello");
        assert_eq!(strip_trailing_newlines("hello\r\n"), "hello");
        assert_eq!(strip_trailing_newlines("a\nb\n\n"), "a\nb");
        assert_eq!(strip_trailing_newlines("  spaced  "), "  spaced  ");
    }
}
