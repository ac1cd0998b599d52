//! # twcss - utility classes to style trees
//!
//! Compiles Tailwind-style utility strings into nested style trees, the
//! shape CSS-in-JS runtimes consume. This crate provides:
//!
//! - **Config**: layered configuration with presets, theme functions and
//!   `extend`, resolved once into a [`ResolvedConfig`](config::ResolvedConfig)
//! - **Registry**: utilities and variants registered by plugins through a
//!   small API, frozen into a [`Context`](context::Context)
//! - **Evaluation**: prefix resolution, value kinds, opacity modifiers,
//!   variants and `@apply`
//!
//! ## Quick Start
//!
//! ```rust
//! use twcss::config::{Config, resolve_config};
//! use twcss::context::create_context;
//! use twcss::style_tree;
//!
//! let ctx = create_context(&resolve_config(&Config::new())).unwrap();
//!
//! assert_eq!(
//!     ctx.css("hover:bg-black/31").unwrap(),
//!     style_tree! {
//!         "@media (hover: hover) and (pointer: fine)" => style_tree! {
//!             "&:hover" => style_tree! { "backgroundColor" => "rgb(0 0 0 / 0.31)" },
//!         },
//!     }
//! );
//! ```
//!
//! ## Supported Syntax
//!
//! - Utilities: `flex`, `-mt-4`, `bg-red-500/50`, `w-1/2`
//! - Arbitrary values: `text-[22px]`, `bg-[color:var(--brand)]`
//! - Arbitrary properties: `[mask-type:luminance]`
//! - Variants: `hover:`, `md:`, `group-hover/item:`, `data-[open]:`, `[&>*]:`
//! - Groups: `hover:(flex p-4)`, `(focus: active:):flex`
//! - Important: `!font-bold`, `font-bold!`, `!(p-4 m-2)`
//!
//! ## Modules
//!
//! - [`style`]: the style tree and the `style_tree!` macro
//! - [`types`]: value kinds, colors and units
//! - [`theme`]: theme lookup and `theme()` rendering
//! - [`config`]: configuration layers and their resolution
//! - [`context`]: the registry, the plugin API and the compile entry points
//! - [`eval`]: evaluation output and variant wrappers
//! - [`plugins`]: the built-in plugins

#[macro_use]
pub mod style;

pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod plugins;
pub mod theme;
pub mod types;

pub use config::{Config, ResolvedConfig, resolve, resolve_config};
pub use context::{Context, ContextOptions, Plugin, PluginApi, create_context};
pub use error::{Diagnostic, DiagnosticKind, Result, TwError};
pub use eval::{Evaluated, Wrapper};
pub use style::{StyleTree, StyleValue};
