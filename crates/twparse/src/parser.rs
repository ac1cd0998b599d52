//! Recursive-descent parser producing an [`Ast`].
//!
//! The parser makes a single left-to-right pass. At each position it tries,
//! in order:
//!
//! 1. a variant immediately followed by the separator (`hover:`,
//!    `supports-[display:grid]:`, `[&>*]:`, `(a: b:):`)
//! 2. a `!`-prefixable `[` starting an arbitrary property
//! 3. an identifier immediately followed by `[` (arbitrary classname)
//! 4. a plain identifier (classname)
//! 5. a `!`-prefixable `(` starting a group
//! 6. anything else up to the next whitespace, kept as an opaque classname
//!    so evaluation can report it instead of silently dropping it
//!
//! Unterminated brackets and groups still yield nodes, flagged as unclosed
//! and extending to the end of the input.

use crate::ast::{Ast, Modifier, Node, NodeId, NodeKind, node_id};
use crate::scan::{Closing, find_closing};
use crate::separator::Separator;
use crate::span::Span;

/// Parses a utility string.
///
/// # Examples
///
/// ```
/// use twparse::{parse, NodeKind, Separator};
///
/// let ast = parse("sm:(flex p-4)", &Separator::default());
/// assert_eq!(ast.exprs().len(), 1);
/// assert!(matches!(ast.kind(ast.exprs()[0]), NodeKind::VariantSpan { .. }));
/// ```
pub fn parse<'s>(source: &'s str, separator: &Separator) -> Ast<'s> {
    Parser::new(source, separator).parse_program()
}

/// A classname or variant head before we know which of the two it is.
enum Head {
    Plain {
        name: Span,
        modifier: Option<Modifier>,
    },
    Arbitrary {
        prefix: Span,
        value: Span,
        modifier: Option<Modifier>,
        closed: bool,
    },
}

impl Head {
    fn into_variant(self) -> NodeKind {
        match self {
            Head::Plain { name, modifier } => NodeKind::SimpleVariant { name, modifier },
            Head::Arbitrary {
                prefix,
                value,
                modifier,
                closed,
            } => NodeKind::ArbitraryVariant {
                prefix,
                value,
                modifier,
                closed,
            },
        }
    }

    fn into_classname(self, important: bool) -> NodeKind {
        match self {
            Head::Plain { name, modifier } => NodeKind::Classname {
                name,
                important,
                modifier,
            },
            Head::Arbitrary {
                prefix,
                value,
                modifier,
                closed,
            } => NodeKind::ArbitraryClassname {
                prefix,
                value,
                modifier,
                important,
                closed,
            },
        }
    }
}

struct Parser<'s, 'p> {
    source: &'s str,
    pos: usize,
    separator: &'p Separator,
    nodes: Vec<Node>,
}

impl<'s, 'p> Parser<'s, 'p> {
    fn new(source: &'s str, separator: &'p Separator) -> Self {
        Self {
            source,
            pos: 0,
            separator,
            nodes: Vec::new(),
        }
    }

    fn parse_program(mut self) -> Ast<'s> {
        let mut exprs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            if let Some(id) = self.parse_expr(false) {
                exprs.push(id);
            }
        }
        let root = self.push(
            NodeKind::Program { exprs },
            Span::new(0, self.source.len()),
        );
        Ast::new(self.source, self.nodes, root)
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_separator(&self) -> bool {
        self.separator.matches_at(self.source, self.pos)
    }

    fn eat_separator(&mut self) -> bool {
        if self.at_separator() {
            self.pos += self.separator.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn at_whitespace_or_end(&self) -> bool {
        self.peek().is_none_or(char::is_whitespace)
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = node_id(self.nodes.len());
        self.nodes.push(Node { kind, span });
        id
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Parses one expression at the cursor. Returns `None` only when the
    /// cursor sits on the `)` closing the enclosing group.
    fn parse_expr(&mut self, in_group: bool) -> Option<NodeId> {
        let start = self.pos;
        match self.peek_byte()? {
            b')' if in_group => None,
            b'!' => Some(self.parse_bang(start, in_group)),
            b'(' => Some(self.parse_paren(start, false, in_group)),
            b'[' => Some(self.parse_bracket(start, false, in_group)),
            b']' | b')' | b'{' | b'}' => Some(self.parse_other(start, in_group)),
            _ => Some(self.parse_identifier(start, false, in_group)),
        }
    }

    fn parse_bang(&mut self, start: usize, in_group: bool) -> NodeId {
        self.pos += 1;
        match self.peek() {
            Some('(') => self.parse_paren(start, true, in_group),
            Some('[') => self.parse_bracket(start, true, in_group),
            Some(c) if is_ident_char(c) && !self.at_separator() => {
                self.parse_identifier(start, true, in_group)
            }
            _ => {
                self.pos = start;
                self.parse_other(start, in_group)
            }
        }
    }

    fn parse_identifier(&mut self, start: usize, important: bool, in_group: bool) -> NodeId {
        let head_start = self.pos;
        let Some(head) = self.parse_head() else {
            return self.parse_other(start, in_group);
        };

        if !important && self.at_separator() {
            let variant = self.push(head.into_variant(), Span::new(head_start, self.pos));
            self.eat_separator();
            return self.finish_variant_span(variant, start, in_group);
        }

        let important = self.eat_byte(b'!') || important;
        self.push(head.into_classname(important), Span::new(start, self.pos))
    }

    /// Parses `(`: either a group of expressions or, when the closing paren is
    /// followed by the separator, a group variant.
    fn parse_paren(&mut self, start: usize, important: bool, in_group: bool) -> NodeId {
        let closing = find_closing(self.source, self.pos);
        if !important && closing.closed && self.separator.matches_at(self.source, closing.end) {
            let variant = self.parse_group_variant(closing);
            self.eat_separator();
            return self.finish_variant_span(variant, start, in_group);
        }

        self.pos += 1;
        let mut exprs = Vec::new();
        let mut closed = false;
        loop {
            self.skip_whitespace();
            match self.peek_byte() {
                None => break,
                Some(b')') => {
                    self.pos += 1;
                    closed = true;
                    break;
                }
                _ => {
                    if let Some(id) = self.parse_expr(true) {
                        exprs.push(id);
                    }
                }
            }
        }

        let important = (closed && self.eat_byte(b'!')) || important;
        self.push(
            NodeKind::Group {
                exprs,
                important,
                closed,
            },
            Span::new(start, self.pos),
        )
    }

    /// Parses `[`: an arbitrary selector variant when followed by the
    /// separator, otherwise an arbitrary property.
    fn parse_bracket(&mut self, start: usize, important: bool, in_group: bool) -> NodeId {
        let bracket_start = self.pos;
        let closing = find_closing(self.source, self.pos);
        let inner = inner_span(bracket_start, closing);

        if !important && closing.closed && self.separator.matches_at(self.source, closing.end) {
            self.pos = closing.end;
            let variant = self.push(
                NodeKind::ArbitrarySelector {
                    selector: inner,
                    closed: true,
                },
                Span::new(bracket_start, self.pos),
            );
            self.eat_separator();
            return self.finish_variant_span(variant, start, in_group);
        }

        self.pos = closing.end;
        let important = (closing.closed && self.eat_byte(b'!')) || important;
        self.push(
            NodeKind::ArbitraryProperty {
                value: inner,
                important,
                closed: closing.closed,
            },
            Span::new(start, self.pos),
        )
    }

    /// Consumes a run of unrecognized input up to the next whitespace and
    /// keeps it as an opaque classname.
    fn parse_other(&mut self, start: usize, in_group: bool) -> NodeId {
        self.pos = start;
        self.advance();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || (in_group && c == ')') {
                break;
            }
            self.advance();
        }
        self.push(
            NodeKind::Classname {
                name: Span::new(start, self.pos),
                important: false,
                modifier: None,
            },
            Span::new(start, self.pos),
        )
    }

    /// After a variant and its separator: an adjacent expression becomes the
    /// child, whitespace or a closing paren leaves the span childless.
    fn finish_variant_span(&mut self, variant: NodeId, start: usize, in_group: bool) -> NodeId {
        let child = match self.peek() {
            None | Some(')') => None,
            Some(c) if c.is_whitespace() => None,
            Some(_) => self.parse_expr(in_group),
        };
        self.push(
            NodeKind::VariantSpan { variant, child },
            Span::new(start, self.pos),
        )
    }

    // ------------------------------------------------------------------
    // Heads: identifiers, arbitrary values and modifiers
    // ------------------------------------------------------------------

    fn scan_ident(&mut self) -> Span {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_char(c) || self.at_separator() {
                break;
            }
            self.advance();
        }
        Span::new(start, self.pos)
    }

    fn parse_head(&mut self) -> Option<Head> {
        let ident = self.scan_ident();
        if ident.is_empty() {
            return None;
        }
        let ident_text = ident.text(self.source);

        if self.peek_byte() != Some(b'[') {
            return Some(Head::Plain {
                name: ident,
                modifier: plain_modifier(self.source, ident),
            });
        }

        let closing = find_closing(self.source, self.pos);
        let inner = inner_span(self.pos, closing);

        if ident_text.ends_with('/') {
            // `bg-black/[.5]`: a bracketed modifier on a plain name
            self.pos = closing.end;
            return Some(Head::Plain {
                name: Span::new(ident.start, self.pos),
                modifier: Some(Modifier {
                    span: inner,
                    wrapped: true,
                    closed: closing.closed,
                }),
            });
        }

        self.pos = closing.end;
        let prefix_end = if ident_text.ends_with('-') {
            ident.end - 1
        } else {
            ident.end
        };
        let modifier = if closing.closed {
            self.parse_trailing_modifier()
        } else {
            None
        };
        Some(Head::Arbitrary {
            prefix: Span::new(ident.start, prefix_end),
            value: inner,
            modifier,
            closed: closing.closed,
        })
    }

    /// `/50` or `/[50%]` directly after an arbitrary value.
    fn parse_trailing_modifier(&mut self) -> Option<Modifier> {
        if self.peek_byte() != Some(b'/') {
            return None;
        }
        let slash = self.pos;
        self.pos += 1;

        if self.peek_byte() == Some(b'[') {
            let closing = find_closing(self.source, self.pos);
            let span = inner_span(self.pos, closing);
            self.pos = closing.end;
            return Some(Modifier {
                span,
                wrapped: true,
                closed: closing.closed,
            });
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_char(c) || c == '/' || self.at_separator() {
                break;
            }
            self.advance();
        }
        if self.pos == start {
            self.pos = slash;
            return None;
        }
        Some(Modifier {
            span: Span::new(start, self.pos),
            wrapped: false,
            closed: true,
        })
    }

    // ------------------------------------------------------------------
    // Group variants
    // ------------------------------------------------------------------

    /// Parses `(a: b:)` with the cursor on `(`; leaves the cursor after `)`.
    fn parse_group_variant(&mut self, closing: Closing) -> NodeId {
        let start = self.pos;
        let limit = if closing.closed {
            closing.end - 1
        } else {
            closing.end
        };
        self.pos += 1;

        let mut members = Vec::new();
        loop {
            while self.pos < limit && self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }
            if self.pos >= limit {
                break;
            }
            let chain = self.parse_variant_chain(limit);
            if chain.is_empty() {
                let garbage = self.skip_member(limit);
                let id = self.push(
                    NodeKind::SimpleVariant {
                        name: garbage,
                        modifier: None,
                    },
                    garbage,
                );
                members.push(vec![id]);
            } else {
                members.push(chain);
            }
        }

        self.pos = closing.end;
        self.push(
            NodeKind::GroupVariant {
                members,
                closed: closing.closed,
            },
            Span::new(start, self.pos),
        )
    }

    /// Parses adjacent variants such as `hover:focus:` into one chain.
    fn parse_variant_chain(&mut self, limit: usize) -> Vec<NodeId> {
        let mut chain = Vec::new();
        while self.pos < limit && !self.at_whitespace_or_end() {
            let before = self.pos;
            let Some(id) = self.parse_member_variant(limit) else {
                self.pos = before;
                break;
            };
            chain.push(id);
            if !self.eat_separator() {
                break;
            }
        }
        chain
    }

    fn parse_member_variant(&mut self, limit: usize) -> Option<NodeId> {
        let start = self.pos;
        match self.peek_byte()? {
            b'[' => {
                let closing = find_closing(self.source, self.pos);
                if closing.end > limit {
                    return None;
                }
                self.pos = closing.end;
                Some(self.push(
                    NodeKind::ArbitrarySelector {
                        selector: inner_span(start, closing),
                        closed: closing.closed,
                    },
                    Span::new(start, self.pos),
                ))
            }
            b'(' => {
                let closing = find_closing(self.source, self.pos);
                if !closing.closed || closing.end > limit {
                    return None;
                }
                Some(self.parse_group_variant(closing))
            }
            _ => {
                let head = self.parse_head()?;
                if self.pos > limit {
                    return None;
                }
                Some(self.push(head.into_variant(), Span::new(start, self.pos)))
            }
        }
    }

    fn skip_member(&mut self, limit: usize) -> Span {
        let start = self.pos;
        self.advance();
        while self.pos < limit && !self.at_whitespace_or_end() {
            self.advance();
        }
        Span::new(start, self.pos)
    }
}

/// Characters that may appear in a utility or variant identifier.
fn is_ident_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '!')
}

/// The text between the brackets of a scanned range.
fn inner_span(open: usize, closing: Closing) -> Span {
    let end = if closing.closed {
        closing.end - 1
    } else {
        closing.end
    };
    Span::new(open + 1, end)
}

/// Splits a trailing `/value` off a plain identifier.
fn plain_modifier(source: &str, name: Span) -> Option<Modifier> {
    let text = name.text(source);
    let slash = text.rfind('/')?;
    if slash + 1 == text.len() {
        return None;
    }
    Some(Modifier {
        span: Span::new(name.start + slash + 1, name.end),
        wrapped: false,
        closed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(input: &str) -> String {
        parse(input, &Separator::default()).dump()
    }

    #[test]
    fn empty_input() {
        assert_eq!(dump(""), "(program)");
        assert_eq!(dump("   "), "(program)");
    }

    #[test]
    fn plain_classnames() {
        assert_eq!(dump("flex p-4"), "(program (class flex) (class p-4))");
    }

    #[test]
    fn negative_classname() {
        assert_eq!(dump("-mt-4"), "(program (class -mt-4))");
    }

    #[test]
    fn slash_in_classname_is_a_modifier_candidate() {
        assert_eq!(dump("w-1/2"), "(program (class w-1/2 /2))");
    }

    #[test]
    fn bracketed_modifier_on_plain_classname() {
        assert_eq!(
            dump("bg-black/[.5]"),
            "(program (class bg-black/[.5] /[.5]))"
        );
    }

    #[test]
    fn important_prefix_and_suffix() {
        assert_eq!(dump("!text-black"), "(program (class! text-black))");
        assert_eq!(dump("text-black!"), "(program (class! text-black))");
    }

    #[test]
    fn variant_span() {
        assert_eq!(
            dump("hover:focus:flex"),
            "(program (span (variant hover) (span (variant focus) (class flex))))"
        );
    }

    #[test]
    fn variant_without_child() {
        assert_eq!(dump("hover: flex"), "(program (span (variant hover)) (class flex))");
    }

    #[test]
    fn variant_with_modifier() {
        assert_eq!(
            dump("group-hover/item:flex"),
            "(program (span (variant group-hover /item) (class flex)))"
        );
    }

    #[test]
    fn arbitrary_classname_with_modifier() {
        assert_eq!(
            dump("bg-[#fff]/50 bg-[#000]/[33%]"),
            "(program (arbitrary bg [#fff] /50) (arbitrary bg [#000] /[33%]))"
        );
    }

    #[test]
    fn arbitrary_variant() {
        assert_eq!(
            dump("supports-[display:grid]:grid"),
            "(program (span (arbitrary-variant supports [display:grid]) (class grid)))"
        );
    }

    #[test]
    fn arbitrary_selector_and_property() {
        assert_eq!(
            dump("[&>*]:[color:red]"),
            "(program (span (selector [&>*]) (property [color:red])))"
        );
    }

    #[test]
    fn important_arbitrary_property() {
        assert_eq!(dump("![color:red]"), "(program (property! [color:red]))");
        assert_eq!(dump("[color:red]!"), "(program (property! [color:red]))");
    }

    #[test]
    fn groups() {
        assert_eq!(
            dump("sm:(flex p-4)"),
            "(program (span (variant sm) (group (class flex) (class p-4))))"
        );
        assert_eq!(dump("!(a b)"), "(program (group! (class a) (class b)))");
        assert_eq!(dump("(a b)!"), "(program (group! (class a) (class b)))");
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            dump("md:(hover:(a b) c)"),
            "(program (span (variant md) (group (span (variant hover) (group (class a) (class b))) (class c))))"
        );
    }

    #[test]
    fn group_variant() {
        assert_eq!(
            dump("(y: z:):inline"),
            "(program (span (group-variant (variant y) (variant z)) (class inline)))"
        );
    }

    #[test]
    fn group_variant_with_chain() {
        assert_eq!(
            dump("(hover:focus: sm:):flex"),
            "(program (span (group-variant (chain (variant hover) (variant focus)) (variant sm)) (class flex)))"
        );
    }

    #[test]
    fn unclosed_group() {
        assert_eq!(dump("(flex p-4"), "(program (group? (class flex) (class p-4)))");
    }

    #[test]
    fn unclosed_arbitrary_value() {
        assert_eq!(dump("bg-[#fff"), "(program (arbitrary? bg [#fff))");
    }

    #[test]
    fn stray_tokens_are_kept() {
        assert_eq!(dump("flex ) }x"), "(program (class flex) (class )) (class }x))");
    }

    #[test]
    fn bracket_contents_do_not_split() {
        assert_eq!(
            dump("bg-[url('a b.png')] [content:'(:)']"),
            "(program (arbitrary bg [url('a b.png')]) (property [content:'(:)']))"
        );
    }

    #[test]
    fn custom_separator() {
        let sep = Separator::new("|").unwrap();
        assert_eq!(
            parse("in-range|text-black/10", &sep).dump(),
            "(program (span (variant in-range) (class text-black/10 /10)))"
        );
    }

    #[test]
    fn multi_character_separator() {
        let sep = Separator::new("__").unwrap();
        assert_eq!(
            parse("hover__w_full", &sep).dump(),
            "(program (span (variant hover) (class w_full)))"
        );
    }

    #[test]
    fn spans_cover_source() {
        let ast = parse("hover:flex", &Separator::default());
        let span = ast.exprs()[0];
        assert_eq!(ast.node_text(span), "hover:flex");
        let NodeKind::VariantSpan { variant, child } = ast.kind(span) else {
            panic!("expected variant span");
        };
        assert_eq!(ast.node_text(*variant), "hover");
        assert_eq!(ast.node_text(child.unwrap()), "flex");
    }
}
