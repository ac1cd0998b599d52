//! Registry entries for utilities and variants.
//!
//! Each prefix key in the registry holds an ordered list of specs. A spec is
//! either static (a fixed subtree or selector template, reachable only by
//! its exact name) or a lookup (a value table plus a render capability,
//! reachable through hyphen back-off and arbitrary values).

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use serde_json::Value;

use crate::style::StyleTree;
use crate::theme::{Theme, ValueTable};
use crate::types::ValueKind;

bitflags! {
    /// Behaviour switches of a lookup utility.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpecFlags: u8 {
        /// `-m-4` style negative values are allowed.
        const NEGATIVE          = 0b0000_0001;
        /// The bare name does not fall back to the `DEFAULT` table entry.
        const FILTER_DEFAULT    = 0b0000_0010;
        /// The utility renders colors and takes opacity modifiers.
        const COLOR             = 0b0000_0100;
        /// Only reachable through the configured prefix.
        const RESPECT_PREFIX    = 0b0000_1000;
        /// Affected by the `important` option.
        const RESPECT_IMPORTANT = 0b0001_0000;
    }
}

impl Default for SpecFlags {
    fn default() -> Self {
        SpecFlags::RESPECT_PREFIX | SpecFlags::RESPECT_IMPORTANT
    }
}

/// What a lookup utility's render function gets besides the value.
pub struct UtilityArgs<'a> {
    /// The `/modifier` text when the value was found without it.
    pub modifier: Option<&'a str>,
    /// The kind that accepted an arbitrary value, `None` for table values.
    pub kind: Option<ValueKind>,
    /// The raw table entry for table values.
    pub entry: Option<&'a Value>,
    pub theme: &'a Theme,
}

/// What a lookup variant's render function gets besides the value.
pub struct VariantArgs<'a> {
    pub modifier: Option<&'a str>,
}

/// Renders the declarations of a lookup utility for one value.
///
/// An empty tree means the value is not accepted.
pub trait RenderUtility: Send + Sync {
    fn render(&self, value: &str, args: &UtilityArgs<'_>) -> StyleTree;
}

impl<F> RenderUtility for F
where
    F: Fn(&str, &UtilityArgs<'_>) -> StyleTree + Send + Sync,
{
    fn render(&self, value: &str, args: &UtilityArgs<'_>) -> StyleTree {
        self(value, args)
    }
}

/// Renders the selector template of a lookup variant for one value.
pub trait RenderVariant: Send + Sync {
    fn render(&self, value: &str, args: &VariantArgs<'_>) -> Option<String>;
}

impl<F> RenderVariant for F
where
    F: Fn(&str, &VariantArgs<'_>) -> Option<String> + Send + Sync,
{
    fn render(&self, value: &str, args: &VariantArgs<'_>) -> Option<String> {
        self(value, args)
    }
}

/// Rewrites the subtree a utility or variant produced.
pub trait PostTransform: Send + Sync {
    fn apply(&self, tree: StyleTree) -> StyleTree;
}

impl<F> PostTransform for F
where
    F: Fn(StyleTree) -> StyleTree + Send + Sync,
{
    fn apply(&self, tree: StyleTree) -> StyleTree {
        self(tree)
    }
}

/// A utility registered with `add_utilities` or `add_components`.
#[derive(Clone)]
pub struct StaticUtility {
    pub plugin: String,
    /// The declarations, already nested in the selector and at-rule
    /// context the class was found in.
    pub tree: StyleTree,
    pub flags: SpecFlags,
}

/// A utility registered with `match_utility` or `match_component`.
#[derive(Clone)]
pub struct LookupUtility {
    pub plugin: String,
    pub values: ValueTable,
    /// Accepted kinds for arbitrary values, in order of preference.
    pub kinds: Vec<ValueKind>,
    pub flags: SpecFlags,
    pub render: Arc<dyn RenderUtility>,
    pub post: Option<Arc<dyn PostTransform>>,
}

#[derive(Clone)]
pub enum UtilitySpec {
    Static(StaticUtility),
    Lookup(LookupUtility),
}

impl UtilitySpec {
    pub fn plugin(&self) -> &str {
        match self {
            UtilitySpec::Static(spec) => &spec.plugin,
            UtilitySpec::Lookup(spec) => &spec.plugin,
        }
    }

    pub fn flags(&self) -> SpecFlags {
        match self {
            UtilitySpec::Static(spec) => spec.flags,
            UtilitySpec::Lookup(spec) => spec.flags,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, UtilitySpec::Lookup(_))
    }
}

impl fmt::Debug for UtilitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilitySpec::Static(spec) => f
                .debug_struct("Static")
                .field("plugin", &spec.plugin)
                .field("tree", &spec.tree)
                .finish(),
            UtilitySpec::Lookup(spec) => f
                .debug_struct("Lookup")
                .field("plugin", &spec.plugin)
                .field("values", &spec.values.len())
                .field("kinds", &spec.kinds)
                .field("flags", &spec.flags)
                .finish(),
        }
    }
}

/// A variant registered with `add_variant`.
#[derive(Clone)]
pub struct StaticVariant {
    pub plugin: String,
    pub templates: Vec<String>,
    pub post: Option<Arc<dyn PostTransform>>,
}

/// A variant registered with `match_variant`.
#[derive(Clone)]
pub struct LookupVariant {
    pub plugin: String,
    pub values: ValueTable,
    pub render: Arc<dyn RenderVariant>,
    pub post: Option<Arc<dyn PostTransform>>,
}

#[derive(Clone)]
pub enum VariantSpec {
    Static(StaticVariant),
    Lookup(LookupVariant),
}

impl VariantSpec {
    pub fn plugin(&self) -> &str {
        match self {
            VariantSpec::Static(spec) => &spec.plugin,
            VariantSpec::Lookup(spec) => &spec.plugin,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, VariantSpec::Lookup(_))
    }

    pub(crate) fn post(&self) -> Option<&Arc<dyn PostTransform>> {
        match self {
            VariantSpec::Static(spec) => spec.post.as_ref(),
            VariantSpec::Lookup(spec) => spec.post.as_ref(),
        }
    }
}

impl fmt::Debug for VariantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSpec::Static(spec) => f
                .debug_struct("Static")
                .field("plugin", &spec.plugin)
                .field("templates", &spec.templates)
                .finish(),
            VariantSpec::Lookup(spec) => f
                .debug_struct("Lookup")
                .field("plugin", &spec.plugin)
                .field("values", &spec.values.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_tree;

    #[test]
    fn default_flags_respect_prefix_and_important() {
        let flags = SpecFlags::default();
        assert!(flags.contains(SpecFlags::RESPECT_PREFIX));
        assert!(flags.contains(SpecFlags::RESPECT_IMPORTANT));
        assert!(!flags.contains(SpecFlags::NEGATIVE));
    }

    #[test]
    fn closures_are_render_capabilities() {
        let render: Arc<dyn RenderUtility> =
            Arc::new(|value: &str, _: &UtilityArgs<'_>| style_tree! { "width" => value });
        let theme = Theme::default();
        let args = UtilityArgs {
            modifier: None,
            kind: None,
            entry: None,
            theme: &theme,
        };
        assert_eq!(render.render("1rem", &args), style_tree! { "width" => "1rem" });

        let variant: Arc<dyn RenderVariant> =
            Arc::new(|value: &str, _: &VariantArgs<'_>| Some(format!("&[data-{value}]")));
        assert_eq!(
            variant.render("open", &VariantArgs { modifier: None }).as_deref(),
            Some("&[data-open]")
        );
    }
}
