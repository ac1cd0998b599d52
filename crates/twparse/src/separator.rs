//! The configurable variant separator.
//!
//! A [`Separator`] is validated once and then shared by every parse. The
//! parser looks ahead for the whole separator sequence, so multi-character
//! separators such as `::` or `__` work the same way as the default `:`.

use crate::error::ParseError;

/// Characters that carry structure in the grammar and can never be part of
/// a separator.
const STRUCTURAL: &[char] = &['(', ')', '[', ']', '{', '}', '/', '!', '-'];

/// A validated separator between a variant and the expression it applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Separator {
    text: String,
}

impl Separator {
    /// Validates `text` and builds a separator from it.
    ///
    /// # Examples
    ///
    /// ```
    /// use twparse::Separator;
    ///
    /// assert!(Separator::new("|").is_ok());
    /// assert!(Separator::new("__").is_ok());
    /// assert!(Separator::new("-").is_err());
    /// assert!(Separator::new("").is_err());
    /// ```
    pub fn new(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            return Err(ParseError::EmptySeparator);
        }
        if text
            .chars()
            .any(|c| c.is_whitespace() || STRUCTURAL.contains(&c))
        {
            return Err(ParseError::InvalidSeparator(text.to_string()));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns `true` when the separator starts at byte offset `pos`.
    pub fn matches_at(&self, source: &str, pos: usize) -> bool {
        source
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(self.text.as_str()))
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self {
            text: ":".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_colon() {
        assert_eq!(Separator::default().as_str(), ":");
    }

    #[test]
    fn rejects_structural_characters() {
        for bad in ["(", ")", "[", "]", "{", "}", "/", "!", "-", "a-b", " ", "\t"] {
            assert!(
                matches!(Separator::new(bad), Err(ParseError::InvalidSeparator(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Separator::new(""), Err(ParseError::EmptySeparator));
    }

    #[test]
    fn matches_multi_character_sequence() {
        let sep = Separator::new("__").unwrap();
        assert!(sep.matches_at("hover__flex", 5));
        assert!(!sep.matches_at("hover_flex", 5));
        assert!(!sep.matches_at("hover", 5));
    }
}
