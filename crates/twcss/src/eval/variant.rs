//! Variant wrappers.
//!
//! A variant resolves to a [`Wrapper`]: a stack of layers, each holding one
//! or more selector templates. Applying a wrapper nests a style tree inside
//! every layer, innermost layer first, so the first variant written ends up
//! outermost.

use std::sync::Arc;

use crate::context::PostTransform;
use crate::style::{StyleTree, StyleValue, is_at_rule};

/// One variant's contribution to a wrapper.
#[derive(Clone, Default)]
pub(crate) struct Layer {
    /// Each template split into its nesting levels, outermost first.
    templates: Vec<Vec<String>>,
    posts: Vec<Arc<dyn PostTransform>>,
}

impl Layer {
    pub(crate) fn new(templates: &[String], post: Option<Arc<dyn PostTransform>>) -> Self {
        Self {
            templates: templates.iter().map(|t| split_levels(t)).collect(),
            posts: post.into_iter().collect(),
        }
    }

    fn apply(&self, tree: StyleTree) -> StyleTree {
        let tree = self.posts.iter().fold(tree, |tree, post| post.apply(tree));
        self.wrap(tree)
    }

    fn wrap(&self, tree: StyleTree) -> StyleTree {
        let mut out = StyleTree::new();
        for levels in &self.templates {
            let wrapped = levels
                .iter()
                .rev()
                .fold(tree.clone(), |inner, level| StyleTree::nest(level.clone(), inner));
            out.merge(wrapped);
        }
        out
    }
}

/// A composed set of variants, ready to wrap style trees.
#[derive(Clone, Default)]
pub struct Wrapper {
    /// Outermost layer first.
    layers: Vec<Layer>,
}

impl Wrapper {
    pub(crate) fn from_layer(layer: Layer) -> Self {
        Self {
            layers: vec![layer],
        }
    }

    /// A wrapper that leaves trees unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        self.layers.is_empty()
    }

    /// Nests `inner` inside `self`.
    pub fn then(mut self, inner: Wrapper) -> Wrapper {
        self.layers.extend(inner.layers);
        self
    }

    /// Wraps `tree` in every layer.
    pub fn apply(&self, tree: StyleTree) -> StyleTree {
        if tree.is_empty() {
            return tree;
        }
        self.layers.iter().rev().fold(tree, |tree, layer| layer.apply(tree))
    }

    /// The selector this wrapper adds when it is a single plain selector
    /// level, found by wrapping a marker tree.
    fn plain_selector(&self) -> Option<String> {
        let marker = marker();
        let wrapped = self
            .layers
            .iter()
            .rev()
            .fold(marker.clone(), |tree, layer| layer.wrap(tree));
        let mut entries = wrapped.into_iter();
        let (key, value) = entries.next()?;
        if entries.next().is_some() || is_at_rule(&key) {
            return None;
        }
        match value {
            StyleValue::Tree(inner) if inner == marker => Some(key),
            _ => None,
        }
    }

    /// Combines the members of a variant group.
    ///
    /// When every member only adds one plain selector, the selectors are
    /// joined into one comma separated level. Otherwise the members nest in
    /// the order they were written.
    pub(crate) fn group(members: Vec<Wrapper>) -> Wrapper {
        let selectors: Option<Vec<String>> =
            members.iter().map(Wrapper::plain_selector).collect();
        match selectors {
            Some(selectors) if selectors.len() > 1 => {
                let posts = members
                    .into_iter()
                    .flat_map(|m| m.layers)
                    .flat_map(|layer| layer.posts)
                    .collect();
                Wrapper::from_layer(Layer {
                    templates: vec![vec![selectors.join(", ")]],
                    posts,
                })
            }
            _ => members
                .into_iter()
                .fold(Wrapper::identity(), |outer, member| outer.then(member)),
        }
    }
}

impl std::fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| &layer.templates))
            .finish()
    }
}

fn marker() -> StyleTree {
    let mut tree = StyleTree::new();
    tree.insert("--marker", "\u{0}");
    tree
}

/// Splits `"A { B { C } }"` into `["A", "B", "C"]`.
fn split_levels(template: &str) -> Vec<String> {
    let mut levels = Vec::new();
    let mut rest = template.trim();
    loop {
        let Some(open) = rest.find('{') else {
            if !rest.is_empty() {
                levels.push(rest.to_string());
            }
            break;
        };
        let head = rest[..open].trim();
        if !head.is_empty() {
            levels.push(head.to_string());
        }
        let inner = &rest[open + 1..];
        rest = inner
            .rfind('}')
            .map_or(inner, |close| &inner[..close])
            .trim();
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_tree;
    use pretty_assertions::assert_eq;

    fn variant(templates: &[&str]) -> Wrapper {
        let templates: Vec<String> = templates.iter().map(|t| t.to_string()).collect();
        Wrapper::from_layer(Layer::new(&templates, None))
    }

    fn flex() -> StyleTree {
        style_tree! { "display" => "flex" }
    }

    #[test]
    fn levels_split_at_braces() {
        assert_eq!(split_levels("&:hover"), ["&:hover"]);
        assert_eq!(
            split_levels("@media (hover: hover) { &:hover }"),
            ["@media (hover: hover)", "&:hover"]
        );
        assert_eq!(split_levels("a { b { c } }"), ["a", "b", "c"]);
    }

    #[test]
    fn first_variant_is_outermost() {
        let wrapper = variant(&["@media print"]).then(variant(&["&:hover"]));
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! {
                "@media print" => style_tree! { "&:hover" => flex() },
            }
        );
    }

    #[test]
    fn several_templates_merge() {
        let wrapper = variant(&["& *::selection", "&::selection"]);
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! { "& *::selection" => flex(), "&::selection" => flex() }
        );
    }

    #[test]
    fn plain_selectors_combine_in_groups() {
        let wrapper = Wrapper::group(vec![variant(&["&:focus"]), variant(&["&:active"])]);
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! { "&:focus, &:active" => flex() }
        );
    }

    #[test]
    fn at_rules_and_scoped_templates_nest_in_groups() {
        let wrapper = Wrapper::group(vec![variant(&["&:xyz"]), variant(&["&::placeholder { &:test }"])]);
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! {
                "&:xyz" => style_tree! {
                    "&::placeholder" => style_tree! { "&:test" => flex() },
                },
            }
        );

        let wrapper = Wrapper::group(vec![variant(&["&:focus"]), variant(&["@media print"])]);
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! { "&:focus" => style_tree! { "@media print" => flex() } }
        );
    }

    #[test]
    fn posts_run_before_wrapping() {
        let post: Arc<dyn PostTransform> = Arc::new(|mut tree: StyleTree| {
            tree.insert("content", "var(--tw-content)");
            tree
        });
        let wrapper = Wrapper::from_layer(Layer::new(&["&::before".to_string()], Some(post)));
        assert_eq!(
            wrapper.apply(flex()),
            style_tree! {
                "&::before" => style_tree! { "display" => "flex", "content" => "var(--tw-content)" },
            }
        );
    }
}
