//! `@apply` and `@screen` expansion inside registered style trees.
//!
//! ```text
//! { ".btn": { "@apply": "px-4 py-2", "@screen md": { "@apply": "px-6" } } }
//! ```
//!
//! `@apply` takes its classes either as the value or as the rest of the key
//! (`"@apply font-bold": {}`). A trailing `!important` marks the expansion
//! important. `@screen name` wraps its body in the named variant. Scalars
//! get their `theme()` calls rendered.

use crate::style::{StyleTree, StyleValue};

use super::{Evaluator, MAX_APPLY_DEPTH};

const APPLY: &str = "@apply";
const SCREEN: &str = "@screen ";

impl Evaluator<'_> {
    /// Expands directives in `tree`, leaving everything else in place.
    pub(crate) fn expand(&mut self, tree: StyleTree) -> StyleTree {
        if !needs_expansion(&tree) {
            return tree;
        }
        let mut out = StyleTree::new();
        for (key, value) in tree {
            if let Some(classes) = apply_classes(&key, &value) {
                let applied = self.apply(&classes);
                out.merge(applied);
                continue;
            }
            if let Some(name) = key.strip_prefix(SCREEN) {
                let body = match value {
                    StyleValue::Tree(body) => self.expand(body),
                    _ => continue,
                };
                match self.resolve_variant(name.trim(), None) {
                    Ok(screen) => out.merge(screen.wrapper.apply(body)),
                    Err(kind) => log::debug!("dropping `{key}`: {kind}"),
                }
                continue;
            }
            match value {
                StyleValue::Tree(inner) => {
                    let inner = self.expand(inner);
                    out.merge(StyleTree::nest(key, inner));
                }
                StyleValue::Scalar(text) if text.contains("theme(") => {
                    out.insert(key, self.ctx.theme.render_function_calls(&text));
                }
                value => out.insert(key, value),
            }
        }
        out
    }

    /// Evaluates `classes` the way `@apply` does and returns the flat
    /// result.
    fn apply(&mut self, classes: &str) -> StyleTree {
        let classes = classes.trim();
        let (classes, important) = match classes.strip_suffix("!important") {
            Some(rest) => (rest.trim_end(), true),
            None => (classes, false),
        };
        if self.depth >= MAX_APPLY_DEPTH {
            log::warn!("`@apply {classes}` nests more than {MAX_APPLY_DEPTH} levels deep, dropping it");
            return StyleTree::new();
        }

        let mut nested = self.nested();
        let result = nested.run(classes);
        for diagnostic in &nested.diagnostics {
            log::debug!("in `@apply {classes}`: {diagnostic}");
        }
        if important {
            result.tree.important()
        } else {
            result.tree
        }
    }
}

/// The classes of an `@apply` entry, or `None` for any other entry.
fn apply_classes(key: &str, value: &StyleValue) -> Option<String> {
    let rest = key.strip_prefix(APPLY)?;
    if rest.is_empty() {
        return match value {
            StyleValue::Scalar(classes) => Some(classes.clone()),
            StyleValue::List(items) => Some(items.join(" ")),
            StyleValue::Tree(_) => None,
        };
    }
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim().to_string())
}

fn needs_expansion(tree: &StyleTree) -> bool {
    tree.iter().any(|(key, value)| {
        key.starts_with(APPLY)
            || key.starts_with(SCREEN)
            || match value {
                StyleValue::Tree(inner) => needs_expansion(inner),
                StyleValue::Scalar(text) => text.contains("theme("),
                StyleValue::List(_) => false,
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_tree;

    #[test]
    fn apply_classes_come_from_the_value_or_the_key() {
        assert_eq!(
            apply_classes("@apply", &"p-4 m-2".into()).as_deref(),
            Some("p-4 m-2")
        );
        assert_eq!(
            apply_classes("@apply font-bold", &StyleValue::Tree(StyleTree::new())).as_deref(),
            Some("font-bold")
        );
        assert_eq!(apply_classes("@applyx", &"p-4".into()), None);
        assert_eq!(apply_classes("color", &"red".into()), None);
    }

    #[test]
    fn plain_trees_are_left_alone() {
        let tree = style_tree! { ".a" => style_tree! { "color" => "red" } };
        assert!(!needs_expansion(&tree));
        let tree = style_tree! { ".a" => style_tree! { "@apply" => "p-4" } };
        assert!(needs_expansion(&tree));
    }
}
