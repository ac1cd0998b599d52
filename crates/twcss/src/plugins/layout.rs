//! Box model and positioning utilities.

use super::properties;
use crate::context::{MatchOptions, PluginApi};
use crate::style::StyleTree;
use crate::style_tree;
use crate::types::ValueKind;
use crate::types::kinds::config_text;

const SIZE_KINDS: [ValueKind; 3] = [ValueKind::Length, ValueKind::Percentage, ValueKind::Any];

pub(super) fn container(api: &mut PluginApi<'_>) {
    let mut tree = style_tree! { ".container" => style_tree! { "width" => "100%" } };
    for (_, value) in &api.theme_table("screens") {
        let Some(min) = config_text(value) else {
            continue;
        };
        tree.insert(
            format!("@media (min-width: {min})"),
            style_tree! { ".container" => style_tree! { "max-width" => min } },
        );
    }
    api.add_components(tree);
}

/// Registers one static utility per `(class, property, value)`.
fn add_keywords(api: &mut PluginApi<'_>, property: &str, classes: &[(&str, &str)]) {
    let tree: StyleTree = classes
        .iter()
        .map(|(class, value)| (format!(".{class}"), style_tree! { property => *value }))
        .collect();
    api.add_utilities(tree);
}

pub(super) fn display(api: &mut PluginApi<'_>) {
    add_keywords(
        api,
        "display",
        &[
            ("block", "block"),
            ("inline-block", "inline-block"),
            ("inline", "inline"),
            ("flex", "flex"),
            ("inline-flex", "inline-flex"),
            ("table", "table"),
            ("flow-root", "flow-root"),
            ("grid", "grid"),
            ("inline-grid", "inline-grid"),
            ("contents", "contents"),
            ("list-item", "list-item"),
            ("hidden", "none"),
        ],
    );
}

pub(super) fn position(api: &mut PluginApi<'_>) {
    add_keywords(
        api,
        "position",
        &[
            ("static", "static"),
            ("fixed", "fixed"),
            ("absolute", "absolute"),
            ("relative", "relative"),
            ("sticky", "sticky"),
        ],
    );
}

pub(super) fn inset(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("inset"))
        .kinds(SIZE_KINDS)
        .negative();
    api.match_utilities(
        [
            ("inset", properties(&["inset"])),
            ("inset-x", properties(&["left", "right"])),
            ("inset-y", properties(&["top", "bottom"])),
            ("top", properties(&["top"])),
            ("right", properties(&["right"])),
            ("bottom", properties(&["bottom"])),
            ("left", properties(&["left"])),
        ],
        opts,
    );
}

pub(super) fn z_index(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("zIndex"))
        .kinds([ValueKind::Number, ValueKind::Any])
        .negative();
    api.match_utility("z", opts, properties(&["z-index"]));
}

pub(super) fn margin(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("margin"))
        .kinds(SIZE_KINDS)
        .negative();
    api.match_utilities(
        [
            ("m", properties(&["margin"])),
            ("mx", properties(&["margin-left", "margin-right"])),
            ("my", properties(&["margin-top", "margin-bottom"])),
            ("ms", properties(&["margin-inline-start"])),
            ("me", properties(&["margin-inline-end"])),
            ("mt", properties(&["margin-top"])),
            ("mr", properties(&["margin-right"])),
            ("mb", properties(&["margin-bottom"])),
            ("ml", properties(&["margin-left"])),
        ],
        opts,
    );
}

pub(super) fn padding(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("padding"))
        .kinds(SIZE_KINDS);
    api.match_utilities(
        [
            ("p", properties(&["padding"])),
            ("px", properties(&["padding-left", "padding-right"])),
            ("py", properties(&["padding-top", "padding-bottom"])),
            ("ps", properties(&["padding-inline-start"])),
            ("pe", properties(&["padding-inline-end"])),
            ("pt", properties(&["padding-top"])),
            ("pr", properties(&["padding-right"])),
            ("pb", properties(&["padding-bottom"])),
            ("pl", properties(&["padding-left"])),
        ],
        opts,
    );
}

pub(super) fn width(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("width"))
        .kinds(SIZE_KINDS);
    api.match_utility("w", opts, properties(&["width"]));
}

pub(super) fn height(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("height"))
        .kinds(SIZE_KINDS);
    api.match_utility("h", opts, properties(&["height"]));
}

pub(super) fn gap(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("gap"))
        .kinds(SIZE_KINDS);
    api.match_utilities(
        [
            ("gap", properties(&["gap"])),
            ("gap-x", properties(&["column-gap"])),
            ("gap-y", properties(&["row-gap"])),
        ],
        opts,
    );
}

pub(super) fn rotate(api: &mut PluginApi<'_>) {
    api.add_defaults("transform", style_tree! { "--tw-rotate" => "0" });
    let opts = MatchOptions::new()
        .values(api.theme_table("rotate"))
        .kinds([ValueKind::Angle, ValueKind::Any])
        .negative();
    api.match_utility("rotate", opts, |value, _| {
        style_tree! {
            "--tw-rotate" => value,
            "transform" => "rotate(var(--tw-rotate))",
        }
    });
}
