//! Bracket matching for arbitrary values, selectors and groups.
//!
//! The scanner walks forward from an opening `(`, `[` or `{` and finds the
//! byte where its nesting level closes again. It keeps track of:
//!
//! - nesting depth across all three bracket kinds
//! - quoted strings (`"…"` and `'…'`) including backslash escapes
//! - `/* block */` and `// line` comments
//! - `url(…)` arguments, inside which comment detection is switched off so
//!   `url(https://…)` is not cut at the `//`
//!
//! When the input ends before the level closes the scan reports an unclosed
//! range that extends to the end of the source.

/// Result of scanning for the end of a bracketed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Closing {
    /// Byte offset just past the closing bracket, or the source length when
    /// the range is unterminated.
    pub end: usize,
    /// `false` when the input ended before the range closed.
    pub closed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Comment {
    Line,
    Block,
}

/// Scans from the opening bracket at `open` to its matching close.
///
/// `open` must point at one of `(`, `[` or `{`.
///
/// # Examples
///
/// ```
/// use twparse::scan::find_closing;
///
/// let source = "[url(https://x.y/a)]:flex";
/// let closing = find_closing(source, 0);
/// assert!(closing.closed);
/// assert_eq!(&source[..closing.end], "[url(https://x.y/a)]");
/// ```
pub fn find_closing(source: &str, open: usize) -> Closing {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut comment: Option<Comment> = None;
    let mut url_depth: Option<usize> = None;
    let mut pos = open;

    while pos < bytes.len() {
        let b = bytes[pos];

        if let Some(kind) = comment {
            match kind {
                Comment::Line if b == b'\n' => comment = None,
                Comment::Block if b == b'*' && bytes.get(pos + 1) == Some(&b'/') => {
                    comment = None;
                    pos += 1;
                }
                _ => {}
            }
            pos += 1;
            continue;
        }

        if let Some(q) = quote {
            if b == b'\\' {
                pos += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            pos += 1;
            continue;
        }

        match b {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'"' | b'\'' => quote = Some(b),
            b'/' if url_depth.is_none() && bytes.get(pos + 1) == Some(&b'*') => {
                comment = Some(Comment::Block);
                pos += 1;
            }
            b'/' if url_depth.is_none() && bytes.get(pos + 1) == Some(&b'/') => {
                comment = Some(Comment::Line);
                pos += 1;
            }
            b'(' | b'[' | b'{' => {
                depth += 1;
                if b == b'(' && url_depth.is_none() && preceded_by_url(bytes, pos) {
                    url_depth = Some(depth);
                }
            }
            b')' | b']' | b'}' => {
                if url_depth == Some(depth) {
                    url_depth = None;
                }
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Closing {
                        end: pos + 1,
                        closed: true,
                    };
                }
            }
            _ => {}
        }
        pos += 1;
    }

    Closing {
        end: bytes.len(),
        closed: false,
    }
}

fn preceded_by_url(bytes: &[u8], paren: usize) -> bool {
    paren >= 3 && bytes[paren - 3..paren].eq_ignore_ascii_case(b"url")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_text(source: &str) -> &str {
        let closing = find_closing(source, 0);
        assert!(closing.closed, "{source:?} should close");
        &source[..closing.end]
    }

    #[test]
    fn simple_brackets() {
        assert_eq!(closed_text("[22px] rest"), "[22px]");
    }

    #[test]
    fn nested_parentheses() {
        assert_eq!(
            closed_text("[calc(100%-(2*var(--x)))]:x"),
            "[calc(100%-(2*var(--x)))]"
        );
    }

    #[test]
    fn quoted_brackets_are_ignored() {
        assert_eq!(closed_text("[content:']'] x"), "[content:']']");
        assert_eq!(closed_text(r#"["a\"]"]"#), r#"["a\"]"]"#);
    }

    #[test]
    fn url_suppresses_line_comments() {
        assert_eq!(
            closed_text("[url(https://example.com/a.png)] next"),
            "[url(https://example.com/a.png)]"
        );
    }

    #[test]
    fn block_comment_hides_brackets() {
        assert_eq!(closed_text("[a/*]*/b] c"), "[a/*]*/b]");
    }

    #[test]
    fn line_comment_runs_to_newline() {
        assert_eq!(closed_text("(a // ) \n b) c"), "(a // ) \n b)");
    }

    #[test]
    fn unterminated_extends_to_end() {
        let closing = find_closing("[calc(1px", 0);
        assert_eq!(
            closing,
            Closing {
                end: 9,
                closed: false
            }
        );
    }

    #[test]
    fn scans_from_offset() {
        let source = "bg-[red] x";
        let closing = find_closing(source, 3);
        assert_eq!(&source[3..closing.end], "[red]");
    }
}
