//! Nested style trees.
//!
//! A [`StyleTree`] maps CSS property names, selectors and at-rules to
//! values. Selector and at-rule keys hold nested trees; property keys hold
//! scalars or, when a property is declared several times, an ordered list
//! of scalars. Insertion order is preserved throughout.
//!
//! ```
//! use twcss::style_tree;
//!
//! let mut tree = style_tree! { "display" => "flex" };
//! tree.merge(style_tree! { "&:hover" => style_tree! { "color" => "red" } });
//! assert_eq!(tree.to_json().to_string(), r#"{"display":"flex","&:hover":{"color":"red"}}"#);
//! ```

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};
use serde::Serialize;
use serde_json::{Map, Value};

/// Builds a [`StyleTree`] from `key => value` pairs.
#[macro_export]
macro_rules! style_tree {
    () => {
        $crate::style::StyleTree::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut tree = $crate::style::StyleTree::new();
        $( tree.insert($key, $value); )+
        tree
    }};
}

const IMPORTANT: &str = " !important";

/// A value stored under a style tree key.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Scalar(String),
    List(Vec<String>),
    Tree(StyleTree),
}

impl StyleValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            StyleValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&StyleTree> {
        match self {
            StyleValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    fn map_scalars(self, f: &impl Fn(String) -> String) -> StyleValue {
        match self {
            StyleValue::Scalar(s) => StyleValue::Scalar(f(s)),
            StyleValue::List(items) => StyleValue::List(items.into_iter().map(f).collect()),
            StyleValue::Tree(tree) => StyleValue::Tree(tree.map_scalars(f)),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Scalar(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Scalar(value)
    }
}

impl From<&String> for StyleValue {
    fn from(value: &String) -> Self {
        StyleValue::Scalar(value.clone())
    }
}

impl From<Vec<String>> for StyleValue {
    fn from(value: Vec<String>) -> Self {
        StyleValue::List(value)
    }
}

impl From<StyleTree> for StyleValue {
    fn from(value: StyleTree) -> Self {
        StyleValue::Tree(value)
    }
}

/// An ordered mapping from property, selector or at-rule to [`StyleValue`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleTree(IndexMap<String, StyleValue>);

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, StyleValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> Keys<'_, String, StyleValue> {
        self.0.keys()
    }

    /// Wraps `tree` in a single `key` level.
    pub fn nest(key: impl Into<String>, tree: StyleTree) -> StyleTree {
        let mut outer = StyleTree::new();
        outer.insert(key, tree);
        outer
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Nested trees merge recursively. Any other value overwrites the
    /// previous one, which keeps the position of its first insertion.
    pub fn merge(&mut self, other: StyleTree) {
        for (key, value) in other.0 {
            match (self.0.get_mut(&key), value) {
                (Some(StyleValue::Tree(existing)), StyleValue::Tree(incoming)) => {
                    existing.merge(incoming)
                }
                (Some(slot), value) => *slot = value,
                (None, value) => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    /// Applies `f` to every scalar, including list items, at any depth.
    pub fn map_scalars(self, f: &impl Fn(String) -> String) -> StyleTree {
        StyleTree(
            self.0
                .into_iter()
                .map(|(key, value)| (key, value.map_scalars(f)))
                .collect(),
        )
    }

    /// Appends `!important` to every declaration that does not carry it yet.
    pub fn important(self) -> StyleTree {
        self.map_scalars(&|value| {
            if value.ends_with("!important") {
                value
            } else {
                value + IMPORTANT
            }
        })
    }

    /// Converts property keys to camelCase.
    ///
    /// Selector and at-rule keys, and custom properties (`--x`), are left as
    /// they are.
    pub fn camelize(self) -> StyleTree {
        StyleTree(
            self.0
                .into_iter()
                .map(|(key, value)| match value {
                    StyleValue::Tree(tree) => (key, StyleValue::Tree(tree.camelize())),
                    value if is_selector_key(&key) || key.starts_with("--") => (key, value),
                    value => (camel_case(&key), value),
                })
                .collect(),
        )
    }

    pub fn to_json(&self) -> Value {
        let map = self
            .0
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    StyleValue::Scalar(s) => Value::String(s.clone()),
                    StyleValue::List(items) => {
                        Value::Array(items.iter().cloned().map(Value::String).collect())
                    }
                    StyleValue::Tree(tree) => tree.to_json(),
                };
                (key.clone(), value)
            })
            .collect::<Map<_, _>>();
        Value::Object(map)
    }

    /// Builds a tree from a JSON object.
    ///
    /// Numbers and booleans become scalars, arrays become lists and `null`
    /// entries are skipped. Returns `None` when `value` is not an object.
    pub fn from_json(value: &Value) -> Option<StyleTree> {
        let Value::Object(map) = value else {
            return None;
        };
        let mut tree = StyleTree::new();
        for (key, value) in map {
            let value = match value {
                Value::Null => continue,
                Value::Object(_) => StyleValue::Tree(StyleTree::from_json(value)?),
                Value::Array(items) => {
                    StyleValue::List(items.iter().filter_map(scalar_text).collect())
                }
                other => match scalar_text(other) {
                    Some(text) => StyleValue::Scalar(text),
                    None => continue,
                },
            };
            tree.insert(key.clone(), value);
        }
        Some(tree)
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = StyleTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}

impl IntoIterator for StyleTree {
    type Item = (String, StyleValue);
    type IntoIter = indexmap::map::IntoIter<String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleTree {
    type Item = (&'a String, &'a StyleValue);
    type IntoIter = Iter<'a, String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns `true` for at-rule keys such as `@media (...)`.
pub fn is_at_rule(key: &str) -> bool {
    key.starts_with('@')
}

/// Returns `true` for keys that introduce a nested selector or at-rule
/// rather than a property.
pub fn is_selector_key(key: &str) -> bool {
    matches!(
        key.chars().next(),
        Some('&' | '.' | '@' | ':' | '#' | '*' | '[' | '>' | '+' | '~')
    ) || key.contains('&')
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for (i, c) in key.chars().enumerate() {
        if c == '-' {
            upper = i > 0 || key.starts_with("-webkit-") || key.starts_with("-moz-");
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn merge_is_deep_and_keeps_first_position() {
        let mut tree = style_tree! {
            "color" => "red",
            "&:hover" => style_tree! { "color" => "blue" },
        };
        tree.merge(style_tree! {
            "&:hover" => style_tree! { "display" => "flex" },
            "color" => "green",
        });
        assert_eq!(
            tree.to_json(),
            json!({ "color": "green", "&:hover": { "color": "blue", "display": "flex" } })
        );
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["color", "&:hover"]);
    }

    #[test]
    fn important_marks_nested_scalars_once() {
        let tree = style_tree! {
            "color" => "red !important",
            "@media print" => style_tree! { "display" => "none" },
        };
        assert_eq!(
            tree.important().to_json(),
            json!({ "color": "red !important", "@media print": { "display": "none !important" } })
        );
    }

    #[test]
    fn camelize_leaves_selectors_and_custom_properties() {
        let tree = style_tree! {
            "background-color" => "red",
            "--tw-content" => "''",
            "-webkit-box-orient" => "vertical",
            "&:focus-visible" => style_tree! { "outline-offset" => "2px" },
        };
        assert_eq!(
            tree.camelize().to_json(),
            json!({
                "backgroundColor": "red",
                "--tw-content": "''",
                "WebkitBoxOrient": "vertical",
                "&:focus-visible": { "outlineOffset": "2px" }
            })
        );
    }

    #[test]
    fn from_json_accepts_numbers_and_lists() {
        let tree = StyleTree::from_json(&json!({
            "z-index": 10,
            "font-family": ["a", "b"],
            "skip": null,
            ".x": { "color": "red" }
        }))
        .unwrap();
        assert_eq!(tree.get("z-index"), Some(&StyleValue::from("10")));
        assert_eq!(
            tree.get("font-family"),
            Some(&StyleValue::List(vec!["a".into(), "b".into()]))
        );
        assert!(!tree.contains_key("skip"));
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({ "z-index": "10", "font-family": ["a", "b"], ".x": { "color": "red" } })
        );
    }

    #[test]
    fn selector_key_classification() {
        assert!(is_selector_key("&:hover"));
        assert!(is_selector_key(".dark &"));
        assert!(is_selector_key("@media print"));
        assert!(is_selector_key("::placeholder"));
        assert!(!is_selector_key("color"));
        assert!(is_at_rule("@supports (display: grid)"));
    }
}
