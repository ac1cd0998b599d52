//! Theme lookups and the `theme()` function.
//!
//! A [`Theme`] wraps the merged, fully resolved theme object. Paths use dot
//! or bracket segments:
//!
//! ```text
//! colors.red.500
//! spacing[2.5]
//! fontFamily.sans
//! colors.red.500/50       (opacity suffix)
//! colors.red.500 / 50%
//! ```
//!
//! When a path does not resolve as written, a trailing `/NN` is taken as an
//! opacity modifier and applied to the color found at the rest of the path.

mod path;

use indexmap::IndexMap;
use serde_json::Value;
use twparse::scan::find_closing;

use crate::types::color::with_opacity;
use crate::types::kinds::{config_text, modifier_to_opacity};

pub use path::parse_path;

/// A flattened theme category: `red-500 => "#ef4444"`.
pub type ValueTable = IndexMap<String, Value>;

/// The merged theme.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Theme {
    root: Value,
}

impl Theme {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Returns the raw value at `path`, without opacity handling.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = parse_path(path)?;
        walk(&self.root, &segments)
    }

    /// Flattens a category into a [`ValueTable`].
    ///
    /// Nested keys are joined with `-` and `DEFAULT` keys collapse into
    /// their parent, so `{ red: { DEFAULT: a, 500: b } }` yields
    /// `red => a` and `red-500 => b`.
    pub fn table(&self, category: &str) -> ValueTable {
        let mut table = ValueTable::new();
        if let Some(Value::Object(map)) = self.root.get(category) {
            for (key, value) in map {
                flatten_into(&mut table, key, value);
            }
        }
        table
    }

    /// Looks up `key` in the `opacity` category.
    pub fn opacity(&self, key: &str) -> Option<String> {
        self.root
            .get("opacity")
            .and_then(|table| table.get(key))
            .and_then(config_text)
    }

    /// Opacity for a `/modifier`: a theme `opacity` key wins, otherwise a
    /// number `n` means `n / 100`.
    pub fn modifier_opacity(&self, modifier: &str) -> Option<String> {
        self.opacity(modifier)
            .or_else(|| modifier_to_opacity(modifier))
    }

    /// Resolves a theme path to CSS text.
    ///
    /// ```
    /// use serde_json::json;
    /// use twcss::theme::Theme;
    ///
    /// let theme = Theme::new(json!({
    ///     "colors": { "black": "#000" },
    ///     "spacing": { "2.5": "0.625rem" },
    /// }));
    /// assert_eq!(theme.resolve("spacing[2.5]").as_deref(), Some("0.625rem"));
    /// assert_eq!(theme.resolve("colors.black / 50%").as_deref(), Some("rgb(0 0 0 / 50%)"));
    /// assert_eq!(theme.resolve("colors.white"), None);
    /// ```
    pub fn resolve(&self, path: &str) -> Option<String> {
        let path = unquote(path.trim());
        if let Some(value) = self.get(path) {
            return config_text(value);
        }

        let (path, opacity) = path.rsplit_once('/')?;
        let value = config_text(self.get(path.trim())?)?;
        let opacity = opacity.trim();
        let opacity = self
            .modifier_opacity(opacity)
            .unwrap_or_else(|| opacity.to_string());
        Some(with_opacity(&value, &opacity).unwrap_or(value))
    }

    /// Replaces every `theme(path[, default])` call in `text` with its
    /// value.
    ///
    /// Unresolvable paths fall back to the default, or to nothing.
    pub fn render_function_calls(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = find_call(rest) {
            out.push_str(&rest[..start]);
            let open = start + "theme".len();
            let closing = find_closing(rest, open);
            let inner_end = if closing.closed {
                closing.end - 1
            } else {
                closing.end
            };
            let args = &rest[open + 1..inner_end];
            out.push_str(&self.render_call(args));
            rest = &rest[closing.end..];
        }
        out.push_str(rest);
        out
    }

    fn render_call(&self, args: &str) -> String {
        let split = crate::types::split_top_level(args, ',');
        let path = split.first().copied().unwrap_or_default();
        if let Some(value) = self.resolve(path) {
            return value;
        }
        match args.split_once(',') {
            Some((_, default)) if split.len() > 1 => {
                self.render_function_calls(unquote(default.trim()))
            }
            _ => String::new(),
        }
    }
}

/// Finds the next `theme(` that is not the tail of a longer identifier.
///
/// A `-` only joins an identifier when it follows a name character, so
/// `--my-theme(` is skipped while `100%-theme(` is a call.
fn find_call(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = text[from..].find("theme(") {
        let at = from + offset;
        let mut before = text[..at].chars().rev();
        let prefixed = match before.next() {
            Some('-') => before.next().is_some_and(is_name_char),
            Some(c) => c.is_alphanumeric() || c == '_',
            None => false,
        };
        if !prefixed {
            return Some(at);
        }
        from = at + "theme(".len();
    }
    None
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn unquote(text: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(q).and_then(|t| t.strip_suffix(q)) {
            return inner;
        }
    }
    text
}

pub(crate) fn walk<'v>(value: &'v Value, segments: &[String]) -> Option<&'v Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(value);
    };
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(first).and_then(|v| walk(v, rest)) {
                return Some(found);
            }
            // Keys like `2.5` are written as `spacing.2.5`: retry with the
            // following segments joined back together.
            let mut key = first.clone();
            for (i, segment) in rest.iter().enumerate() {
                key.push('.');
                key.push_str(segment);
                if let Some(found) = map.get(&key).and_then(|v| walk(v, &rest[i + 1..])) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => {
            let index: usize = first.parse().ok()?;
            walk(items.get(index)?, rest)
        }
        _ => None,
    }
}

fn flatten_into(table: &mut ValueTable, key: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                let joined = if child == "DEFAULT" {
                    key.to_string()
                } else {
                    format!("{key}-{child}")
                };
                flatten_into(table, &joined, value);
            }
        }
        value => {
            table.insert(key.to_string(), value.clone());
        }
    }
}
