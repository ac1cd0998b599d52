//! Normalization of bracketed values, selectors and properties.

use crate::theme::Theme;
use crate::types::split_top_level;
use crate::types::units::normalize_math;

/// Prepares the text inside `[...]` for the value kinds.
///
/// `theme()` calls are rendered, `_` becomes a space (`\_` stays an
/// underscore, `url(...)` is left alone) and binary operators in math
/// functions get spaces.
///
/// ```
/// # use serde_json::json;
/// # use twcss::theme::Theme;
/// # use twcss::eval::normalize_value;
/// let theme = Theme::new(json!({ "spacing": { "4": "1rem" } }));
/// assert_eq!(normalize_value(&theme, "calc(100%-theme(spacing.4))"), "calc(100% - 1rem)");
/// assert_eq!(normalize_value(&theme, "url(/a_b.png)"), "url(/a_b.png)");
/// assert_eq!(normalize_value(&theme, "'a_b\\_c'"), "'a b_c'");
/// ```
pub fn normalize_value(theme: &Theme, raw: &str) -> String {
    let rendered = if raw.contains("theme(") {
        theme.render_function_calls(raw)
    } else {
        raw.to_string()
    };
    normalize_math(&convert_underscores(&rendered))
}

/// Underscore handling alone, for selectors.
pub(crate) fn convert_underscores(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        if rest.starts_with("url(") {
            let end = url_end(rest);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }
        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        match c {
            '\\' if chars.as_str().starts_with('_') => {
                out.push('_');
                rest = &rest[2..];
                continue;
            }
            '_' => out.push(' '),
            c => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Byte length of the `url(...)` call at the start of `text`.
fn url_end(text: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    text.len()
}

/// An arbitrary variant selector: `&_p` becomes `& p`.
///
/// Returns `None` unless the selector refers to the parent with `&` or is
/// an at-rule.
pub(crate) fn normalize_selector(raw: &str) -> Option<String> {
    let selector = convert_underscores(raw.trim());
    (selector.contains('&') || selector.starts_with('@')).then_some(selector)
}

/// Splits `[property:value]` at its first top-level colon.
///
/// The property must look like a CSS property name (custom properties
/// included) and the value must not be empty.
pub(crate) fn split_property(raw: &str) -> Option<(&str, &str)> {
    let parts = split_top_level(raw, ':');
    let [head, _, ..] = parts.as_slice() else {
        return None;
    };
    let property = head.trim();
    let value = raw[head.len() + 1..].trim();
    if value.is_empty() || !is_property_name(property) {
        return None;
    }
    Some((property, value))
}

fn is_property_name(name: &str) -> bool {
    let body = name.trim_start_matches('-');
    let dashes = name.len() - body.len();
    dashes <= 2
        && body.starts_with(|c: char| c.is_ascii_alphabetic())
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_become_spaces_outside_urls() {
        assert_eq!(convert_underscores("1px_solid_red"), "1px solid red");
        assert_eq!(
            convert_underscores("url(a_b.png),_url(c_d.png)"),
            "url(a_b.png), url(c_d.png)"
        );
        assert_eq!(convert_underscores("snake\\_case"), "snake_case");
    }

    #[test]
    fn selectors_need_a_parent_reference() {
        assert_eq!(normalize_selector("&>*").as_deref(), Some("&>*"));
        assert_eq!(normalize_selector("&_p").as_deref(), Some("& p"));
        assert_eq!(
            normalize_selector("@media_print").as_deref(),
            Some("@media print")
        );
        assert_eq!(normalize_selector(".x"), None);
    }

    #[test]
    fn properties_split_at_the_first_top_level_colon() {
        assert_eq!(split_property("color:red"), Some(("color", "red")));
        assert_eq!(
            split_property("background:url(http://x.y/z)"),
            Some(("background", "url(http://x.y/z)"))
        );
        assert_eq!(split_property("--my-var:1px"), Some(("--my-var", "1px")));
        assert_eq!(split_property("content:'a:b'"), Some(("content", "'a:b'")));
        assert_eq!(split_property("color:"), None);
        assert_eq!(split_property("a b:c"), None);
        assert_eq!(split_property("nocolon"), None);
    }
}
