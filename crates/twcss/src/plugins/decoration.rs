//! Backgrounds, borders, shadows and opacity.

use super::properties;
use crate::context::{MatchOptions, PluginApi};
use crate::types::ValueKind;

fn colors(api: &PluginApi<'_>, category: &str) -> MatchOptions {
    MatchOptions::new()
        .values(api.theme_table(category))
        .kinds([ValueKind::Color, ValueKind::Any])
}

pub(super) fn background_color(api: &mut PluginApi<'_>) {
    let opts = colors(api, "backgroundColor");
    api.match_utility("bg", opts, properties(&["background-color"]));
}

pub(super) fn background_image(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("backgroundImage"))
        .kinds([ValueKind::Image, ValueKind::Url]);
    api.match_utility("bg", opts, properties(&["background-image"]));
}

pub(super) fn background_position(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("backgroundPosition"))
        .kinds([ValueKind::BackgroundPosition]);
    api.match_utility("bg", opts, properties(&["background-position"]));
}

pub(super) fn background_size(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("backgroundSize"))
        .kinds([
            ValueKind::BackgroundSize,
            ValueKind::Length,
            ValueKind::Percentage,
        ]);
    api.match_utility("bg", opts, properties(&["background-size"]));
}

pub(super) fn opacity(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("opacity"))
        .kinds([ValueKind::Number, ValueKind::Percentage, ValueKind::Any]);
    api.match_utility("opacity", opts, properties(&["opacity"]));
}

pub(super) fn border_width(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("borderWidth"))
        .kinds([ValueKind::LineWidth, ValueKind::Length]);
    api.match_utilities(
        [
            ("border", properties(&["border-width"])),
            ("border-x", properties(&["border-left-width", "border-right-width"])),
            ("border-y", properties(&["border-top-width", "border-bottom-width"])),
            ("border-t", properties(&["border-top-width"])),
            ("border-r", properties(&["border-right-width"])),
            ("border-b", properties(&["border-bottom-width"])),
            ("border-l", properties(&["border-left-width"])),
        ],
        opts,
    );
}

pub(super) fn border_color(api: &mut PluginApi<'_>) {
    let opts = colors(api, "borderColor").filter_default();
    api.match_utilities(
        [
            ("border", properties(&["border-color"])),
            ("border-x", properties(&["border-left-color", "border-right-color"])),
            ("border-y", properties(&["border-top-color", "border-bottom-color"])),
            ("border-t", properties(&["border-top-color"])),
            ("border-r", properties(&["border-right-color"])),
            ("border-b", properties(&["border-bottom-color"])),
            ("border-l", properties(&["border-left-color"])),
        ],
        opts,
    );
}

pub(super) fn border_radius(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("borderRadius"))
        .kinds([ValueKind::Length, ValueKind::Percentage, ValueKind::Any]);
    api.match_utilities(
        [
            ("rounded", properties(&["border-radius"])),
            (
                "rounded-t",
                properties(&["border-top-left-radius", "border-top-right-radius"]),
            ),
            (
                "rounded-r",
                properties(&["border-top-right-radius", "border-bottom-right-radius"]),
            ),
            (
                "rounded-b",
                properties(&["border-bottom-right-radius", "border-bottom-left-radius"]),
            ),
            (
                "rounded-l",
                properties(&["border-top-left-radius", "border-bottom-left-radius"]),
            ),
        ],
        opts,
    );
}

pub(super) fn box_shadow(api: &mut PluginApi<'_>) {
    let opts = MatchOptions::new()
        .values(api.theme_table("boxShadow"))
        .kinds([ValueKind::Shadow, ValueKind::Any]);
    api.match_utility("shadow", opts, properties(&["box-shadow"]));
}
