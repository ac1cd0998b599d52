//! Base element styles.

use crate::context::PluginApi;
use crate::style_tree;

pub(super) fn preflight(api: &mut PluginApi<'_>) {
    api.add_base(style_tree! {
        "*, ::before, ::after" => style_tree! {
            "box-sizing" => "border-box",
            "border-width" => "0",
            "border-style" => "solid",
            "border-color" => "theme('borderColor.DEFAULT', currentColor)",
        },
        "html" => style_tree! {
            "line-height" => "1.5",
            "font-family" => "theme('fontFamily.sans', sans-serif)",
        },
        "body" => style_tree! {
            "margin" => "0",
            "line-height" => "inherit",
        },
        "hr" => style_tree! {
            "height" => "0",
            "color" => "inherit",
            "border-top-width" => "1px",
        },
        "img, video" => style_tree! {
            "max-width" => "100%",
            "height" => "auto",
        },
    });
}
