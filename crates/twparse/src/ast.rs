//! Arena-allocated syntax tree for utility strings.
//!
//! Nodes live in a flat arena owned by [`Ast`] and refer to each other by
//! [`NodeId`]. They never copy substrings out of the source: every textual
//! part is a [`Span`] into the parsed string. Nodes are immutable once the
//! parse returns; consumers that want to cache derived data per node use a
//! [`SideTable`] keyed by the same ids.

use std::fmt::Write;

use crate::span::Span;

/// Index of a node inside an [`Ast`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A trailing `/value` or `/[value]` attached to a classname or variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modifier {
    /// The modifier text without the slash and without brackets.
    pub span: Span,
    /// `true` for the bracketed `/[value]` form.
    pub wrapped: bool,
    /// `false` when a bracketed modifier is unterminated.
    pub closed: bool,
}

/// The different node shapes produced by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The root: an ordered sequence of expressions.
    Program { exprs: Vec<NodeId> },
    /// `(a b c)`, optionally marked important with a leading or trailing `!`.
    Group {
        exprs: Vec<NodeId>,
        important: bool,
        closed: bool,
    },
    /// A variant applied to an optional child expression: `hover:flex`.
    VariantSpan {
        variant: NodeId,
        child: Option<NodeId>,
    },
    /// A plain utility name such as `flex`, `-mt-4` or `bg-black/50`.
    ///
    /// `name` covers the whole identifier including any `/modifier`.
    Classname {
        name: Span,
        important: bool,
        modifier: Option<Modifier>,
    },
    /// `prefix-[value]` with an optional `/modifier`.
    ArbitraryClassname {
        prefix: Span,
        value: Span,
        modifier: Option<Modifier>,
        important: bool,
        closed: bool,
    },
    /// `[prop:value]`.
    ArbitraryProperty {
        value: Span,
        important: bool,
        closed: bool,
    },
    /// `name:` with an optional `/modifier` before the separator.
    SimpleVariant {
        name: Span,
        modifier: Option<Modifier>,
    },
    /// `prefix-[value]:` with an optional `/modifier` before the separator.
    ArbitraryVariant {
        prefix: Span,
        value: Span,
        modifier: Option<Modifier>,
        closed: bool,
    },
    /// `[selector]:` such as `[&>*]:` or `[@media(print)]:`.
    ArbitrarySelector { selector: Span, closed: bool },
    /// `(a: b:):` — each member is a chain of adjacent variants.
    GroupVariant {
        members: Vec<Vec<NodeId>>,
        closed: bool,
    },
}

/// A node in the arena together with the source range it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    /// Returns `false` for nodes whose bracket, group or modifier ran off the
    /// end of the input.
    pub fn is_closed(&self) -> bool {
        let modifier_closed = |m: &Option<Modifier>| m.is_none_or(|m| m.closed);
        match &self.kind {
            NodeKind::Group { closed, .. }
            | NodeKind::ArbitraryProperty { closed, .. }
            | NodeKind::ArbitrarySelector { closed, .. }
            | NodeKind::GroupVariant { closed, .. } => *closed,
            NodeKind::ArbitraryClassname {
                closed, modifier, ..
            }
            | NodeKind::ArbitraryVariant {
                closed, modifier, ..
            } => *closed && modifier_closed(modifier),
            NodeKind::Classname { modifier, .. } | NodeKind::SimpleVariant { modifier, .. } => {
                modifier_closed(modifier)
            }
            NodeKind::Program { .. } | NodeKind::VariantSpan { .. } => true,
        }
    }

    /// Returns `true` for the four variant shapes.
    pub fn is_variant(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::SimpleVariant { .. }
                | NodeKind::ArbitraryVariant { .. }
                | NodeKind::ArbitrarySelector { .. }
                | NodeKind::GroupVariant { .. }
        )
    }
}

/// The parsed form of one utility string.
#[derive(Clone, Debug)]
pub struct Ast<'s> {
    source: &'s str,
    nodes: Vec<Node>,
    root: NodeId,
}

impl<'s> Ast<'s> {
    pub(crate) fn new(source: &'s str, nodes: Vec<Node>, root: NodeId) -> Self {
        Self {
            source,
            nodes,
            root,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// The `Program` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// The source text a span covers.
    pub fn text(&self, span: Span) -> &'s str {
        span.text(self.source)
    }

    /// The source text a node was parsed from.
    pub fn node_text(&self, id: NodeId) -> &'s str {
        self.node(id).span.text(self.source)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level expressions of the program.
    pub fn exprs(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Program { exprs } => exprs,
            _ => &[],
        }
    }

    /// Renders the tree as a compact s-expression, mostly for tests and
    /// debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use twparse::{parse, Separator};
    ///
    /// let ast = parse("hover:bg-black/50", &Separator::default());
    /// assert_eq!(ast.dump(), "(program (span (variant hover) (class bg-black/50 /50)))");
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let flags = |important: bool, closed: bool| {
            let mut s = String::new();
            if important {
                s.push('!');
            }
            if !closed {
                s.push('?');
            }
            s
        };
        match &node.kind {
            NodeKind::Program { exprs } => {
                out.push_str("(program");
                self.dump_children(exprs, out);
                out.push(')');
            }
            NodeKind::Group {
                exprs,
                important,
                closed,
            } => {
                let _ = write!(out, "(group{}", flags(*important, *closed));
                self.dump_children(exprs, out);
                out.push(')');
            }
            NodeKind::VariantSpan { variant, child } => {
                out.push_str("(span ");
                self.dump_node(*variant, out);
                if let Some(child) = child {
                    out.push(' ');
                    self.dump_node(*child, out);
                }
                out.push(')');
            }
            NodeKind::Classname {
                name,
                important,
                modifier,
            } => {
                let _ = write!(out, "(class{} {}", flags(*important, true), self.text(*name));
                self.dump_modifier(modifier, out);
                out.push(')');
            }
            NodeKind::ArbitraryClassname {
                prefix,
                value,
                modifier,
                important,
                closed,
            } => {
                let _ = write!(
                    out,
                    "(arbitrary{} {} [{}",
                    flags(*important, *closed),
                    self.text(*prefix),
                    self.text(*value)
                );
                if *closed {
                    out.push(']');
                }
                self.dump_modifier(modifier, out);
                out.push(')');
            }
            NodeKind::ArbitraryProperty {
                value,
                important,
                closed,
            } => {
                let _ = write!(
                    out,
                    "(property{} [{}{})",
                    flags(*important, *closed),
                    self.text(*value),
                    if *closed { "]" } else { "" }
                );
            }
            NodeKind::SimpleVariant { name, modifier } => {
                let _ = write!(out, "(variant {}", self.variant_name(*name, modifier));
                self.dump_modifier(modifier, out);
                out.push(')');
            }
            NodeKind::ArbitraryVariant {
                prefix,
                value,
                modifier,
                closed,
            } => {
                let _ = write!(
                    out,
                    "(arbitrary-variant{} {} [{}",
                    flags(false, *closed),
                    self.text(*prefix),
                    self.text(*value)
                );
                if *closed {
                    out.push(']');
                }
                self.dump_modifier(modifier, out);
                out.push(')');
            }
            NodeKind::ArbitrarySelector { selector, closed } => {
                let _ = write!(
                    out,
                    "(selector{} [{}{})",
                    flags(false, *closed),
                    self.text(*selector),
                    if *closed { "]" } else { "" }
                );
            }
            NodeKind::GroupVariant { members, closed } => {
                let _ = write!(out, "(group-variant{}", flags(false, *closed));
                for chain in members {
                    out.push(' ');
                    if let [single] = chain.as_slice() {
                        self.dump_node(*single, out);
                    } else {
                        out.push_str("(chain");
                        self.dump_children(chain, out);
                        out.push(')');
                    }
                }
                out.push(')');
            }
        }
    }

    fn dump_children(&self, ids: &[NodeId], out: &mut String) {
        for id in ids {
            out.push(' ');
            self.dump_node(*id, out);
        }
    }

    fn dump_modifier(&self, modifier: &Option<Modifier>, out: &mut String) {
        if let Some(m) = modifier {
            if m.wrapped {
                let _ = write!(
                    out,
                    " /[{}{}",
                    self.text(m.span),
                    if m.closed { "]" } else { "" }
                );
            } else {
                let _ = write!(out, " /{}", self.text(m.span));
            }
        }
    }

    /// The variant name without its modifier.
    fn variant_name(&self, name: Span, modifier: &Option<Modifier>) -> &'s str {
        match modifier {
            Some(m) => {
                let end = if m.wrapped { m.span.start - 2 } else { m.span.start - 1 };
                self.text(Span::new(name.start, end))
            }
            None => self.text(name),
        }
    }
}

/// Per-node storage populated after parsing, indexed by [`NodeId`].
///
/// Keeps derived data such as normalized arbitrary values out of the
/// immutable nodes.
#[derive(Clone, Debug)]
pub struct SideTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> SideTable<T> {
    /// Creates an empty table sized for `ast`.
    pub fn new(ast: &Ast<'_>) -> Self {
        let mut slots = Vec::with_capacity(ast.len());
        slots.resize_with(ast.len(), || None);
        Self { slots }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn insert(&mut self, id: NodeId, value: T) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = Some(value);
        }
    }

    /// Returns the cached value for `id`, computing it on first access.
    pub fn get_or_insert_with(&mut self, id: NodeId, f: impl FnOnce() -> T) -> Option<&T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.is_none() {
            *slot = Some(f());
        }
        slot.as_ref()
    }
}

pub(crate) fn node_id(index: usize) -> NodeId {
    NodeId(index as u32)
}
