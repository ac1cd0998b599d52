//! Value types used to validate and render utility values.
//!
//! - [`color`] recognizes colors and applies opacity
//! - [`units`] parses numbers and dimensions, negates values and normalizes
//!   math functions
//! - [`kinds`] is the catalogue of value kinds that arbitrary values are
//!   matched against
//! - [`composite`] holds the multi-term kinds (shadows, background
//!   positions and sizes, images, font families)

pub mod color;
pub mod composite;
pub mod kinds;
pub mod units;

pub use color::{Color, ColorParseError};
pub use kinds::{ConfigOptions, ValueKind, ValueOptions};

/// Splits `input` at `sep` characters that are not nested inside
/// parentheses, brackets or quotes.
pub fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    split_with(input, |c| c == sep)
}

/// Splits `input` at whitespace that is not nested inside parentheses,
/// brackets or quotes. Empty pieces are dropped.
pub fn split_top_level_whitespace(input: &str) -> Vec<&str> {
    split_with(input, char::is_whitespace)
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect()
}

fn split_with(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_nesting() {
        assert_eq!(
            split_top_level("a, rgb(1, 2, 3), 'x,y'", ','),
            ["a", " rgb(1, 2, 3)", " 'x,y'"]
        );
        assert_eq!(
            split_top_level_whitespace("  0 0 calc(1px + 2px)  red "),
            ["0", "0", "calc(1px + 2px)", "red"]
        );
    }
}
