//! Compile Tailwind-style utility class strings into nested style trees.
//!
//! This package re-exports the two member crates:
//!
//! - [`parse`]: the tokenizer and parser producing an arena AST
//! - [`css`]: configuration, the plugin registry and the evaluator
//!
//! ```
//! use twstyle::{Config, create_context, resolve_config, style_tree};
//!
//! let ctx = create_context(&resolve_config(&Config::new().prefix("tw-"))).unwrap();
//! assert_eq!(
//!     ctx.css("sm:tw-p-4").unwrap(),
//!     style_tree! { "@media (min-width: 640px)" => style_tree! { "padding" => "1rem" } }
//! );
//! ```

pub use twcss as css;
pub use twparse as parse;

pub use twcss::style_tree;
pub use twcss::{
    Config, Context, ContextOptions, Diagnostic, DiagnosticKind, Evaluated, Plugin, PluginApi,
    ResolvedConfig, Result, StyleTree, StyleValue, TwError, Wrapper, create_context, resolve,
    resolve_config,
};
pub use twparse::{Ast, ParseError, Separator};
