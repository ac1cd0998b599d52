//! # twparse - utility class string parser
//!
//! Parses compact, Tailwind-style utility strings such as
//! `hover:bg-black/50`, `sm:(flex p-4)` or `[&>*]:[color:red]` into an
//! arena-allocated syntax tree.
//!
//! ## Grammar
//!
//! ```text
//! program             := expr*
//! expr                := group | variant-span | classname
//!                      | arbitrary-classname | arbitrary-property
//! group               := "!"? "(" expr* ")" "!"?
//! variant-span        := variant expr?
//! variant             := identifier separator
//!                      | "[" selector "]" separator
//!                      | identifier "[" value "]" ("/" modifier)? separator
//!                      | "(" variant* ")" separator
//! classname           := "!"? identifier ("/" modifier)? "!"?
//! arbitrary-classname := identifier "-" "[" value "]" ("/" modifier)? "!"?
//! arbitrary-property  := "!"? "[" property ":" value "]" "!"?
//! ```
//!
//! The separator defaults to `:` and can be any string free of whitespace
//! and of the structural characters `()[]{}/!-`.
//!
//! ## Quick Start
//!
//! ```rust
//! use twparse::{parse, Separator};
//!
//! let ast = parse("hover:(flex p-4) !text-black", &Separator::default());
//! assert_eq!(
//!     ast.dump(),
//!     "(program (span (variant hover) (group (class flex) (class p-4))) (class! text-black))"
//! );
//! ```
//!
//! Parsing never fails. Unterminated brackets or groups produce nodes whose
//! [`Node::is_closed`] returns `false`, which keeps partially typed input
//! usable by editor tooling.

pub mod ast;
pub mod error;
pub mod parser;
pub mod scan;
pub mod separator;
pub mod span;

pub use ast::{Ast, Modifier, Node, NodeId, NodeKind, SideTable};
pub use error::ParseError;
pub use parser::parse;
pub use separator::Separator;
pub use span::Span;
