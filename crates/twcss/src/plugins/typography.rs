//! Text color, font and generated content utilities.

use serde_json::Value;

use super::properties;
use crate::context::{MatchOptions, PluginApi, UtilityArgs};
use crate::style::StyleTree;
use crate::style_tree;
use crate::types::ValueKind;
use crate::types::kinds::config_text;

pub(super) fn text_color(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("textColor"))
        .kinds([ValueKind::Color, ValueKind::Any]);
    api.match_utility("text", opts, properties(&["color"]));
}

pub(super) fn font_size(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("fontSize"))
        .kinds([
            ValueKind::AbsoluteSize,
            ValueKind::Length,
            ValueKind::Percentage,
            ValueKind::RelativeSize,
        ]);
    api.match_utility("text", opts, render_font_size);
}

/// `text-sm` sets the size and the line height paired with it in the
/// theme; `text-sm/6` takes the line height from the modifier instead.
fn render_font_size(value: &str, args: &UtilityArgs<'_>) -> StyleTree {
    let mut tree = style_tree! { "font-size" => value };
    if let Some(modifier) = args.modifier {
        let line_height = args
            .theme
            .get(&format!("lineHeight[{modifier}]"))
            .and_then(config_text)
            .unwrap_or_else(|| modifier.to_string());
        tree.insert("line-height", line_height);
        return tree;
    }
    if let Some(Value::Array(pair)) = args.entry {
        let options = match pair.as_slice() {
            [_, Value::String(line_height)] => {
                tree.insert("line-height", line_height.as_str());
                None
            }
            [_, Value::Object(options)] => Some(options),
            _ => None,
        };
        for (key, property) in [
            ("lineHeight", "line-height"),
            ("letterSpacing", "letter-spacing"),
            ("fontWeight", "font-weight"),
        ] {
            if let Some(text) = options.and_then(|o| o.get(key)).and_then(config_text) {
                tree.insert(property, text);
            }
        }
    }
    tree
}

pub(super) fn font_weight(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("fontWeight"))
        .kinds([ValueKind::Number, ValueKind::Any]);
    api.match_utility("font", opts, properties(&["font-weight"]));
}

pub(super) fn font_family(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("fontFamily"))
        .kinds([ValueKind::GenericName, ValueKind::FamilyName]);
    api.match_utility("font", opts, properties(&["font-family"]));
}

pub(super) fn placeholder_color(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("placeholderColor"))
        .kinds([ValueKind::Color, ValueKind::Any]);
    api.match_utility("placeholder", opts, |value, _| {
        style_tree! { "&::placeholder" => style_tree! { "color" => value } }
    });
}

pub(super) fn content(api: &mut PluginApi<'_>) {
    api.add_defaults("content", style_tree! { "--tw-content" => "''" });
    let opts = MatchOptions::new()
        .values(api.theme_table("content"))
        .kinds([ValueKind::Any]);
    api.match_utility("content", opts, |value, _| {
        style_tree! {
            "--tw-content" => value,
            "content" => "var(--tw-content)",
        }
    });
}
