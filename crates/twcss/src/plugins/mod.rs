//! Built-in plugins.
//!
//! Each core plugin is an ordinary consumer of the plugin API, identified
//! by the name `corePlugins` toggles it with. They run in the order of
//! [`CORE_PLUGINS`], before any configured plugin.

mod decoration;
mod layout;
mod preflight;
mod typography;
mod variants;

use crate::context::{PluginApi, UtilityArgs};
use crate::style::StyleTree;

/// Every built-in plugin, in registration order.
pub const CORE_PLUGINS: &[&str] = &[
    "preflight",
    // variants
    "pseudoClassVariants",
    "pseudoElementVariants",
    "groupVariants",
    "peerVariants",
    "darkVariant",
    "screenVariants",
    "mediaVariants",
    "supportsVariant",
    "dataVariant",
    "ariaVariant",
    // layout
    "container",
    "display",
    "position",
    "inset",
    "zIndex",
    "margin",
    "padding",
    "width",
    "height",
    "gap",
    "rotate",
    // decoration
    "backgroundColor",
    "backgroundImage",
    "backgroundPosition",
    "backgroundSize",
    "opacity",
    "borderWidth",
    "borderColor",
    "borderRadius",
    "boxShadow",
    // typography
    "textColor",
    "fontSize",
    "fontWeight",
    "fontFamily",
    "placeholderColor",
    "content",
];

/// Runs the core plugin called `name`.
pub(crate) fn register(name: &str, api: &mut PluginApi<'_>) {
    log::trace!("running core plugin `{name}`");
    match name {
        "preflight" => preflight::preflight(api),

        "pseudoClassVariants" => variants::pseudo_class_variants(api),
        "pseudoElementVariants" => variants::pseudo_element_variants(api),
        "groupVariants" => variants::group_variants(api),
        "peerVariants" => variants::peer_variants(api),
        "darkVariant" => variants::dark_variant(api),
        "screenVariants" => variants::screen_variants(api),
        "mediaVariants" => variants::media_variants(api),
        "supportsVariant" => variants::supports_variant(api),
        "dataVariant" => variants::data_variant(api),
        "ariaVariant" => variants::aria_variant(api),

        "container" => layout::container(api),
        "display" => layout::display(api),
        "position" => layout::position(api),
        "inset" => layout::inset(api),
        "zIndex" => layout::z_index(api),
        "margin" => layout::margin(api),
        "padding" => layout::padding(api),
        "width" => layout::width(api),
        "height" => layout::height(api),
        "gap" => layout::gap(api),
        "rotate" => layout::rotate(api),

        "backgroundColor" => decoration::background_color(api),
        "backgroundImage" => decoration::background_image(api),
        "backgroundPosition" => decoration::background_position(api),
        "backgroundSize" => decoration::background_size(api),
        "opacity" => decoration::opacity(api),
        "borderWidth" => decoration::border_width(api),
        "borderColor" => decoration::border_color(api),
        "borderRadius" => decoration::border_radius(api),
        "boxShadow" => decoration::box_shadow(api),

        "textColor" => typography::text_color(api),
        "fontSize" => typography::font_size(api),
        "fontWeight" => typography::font_weight(api),
        "fontFamily" => typography::font_family(api),
        "placeholderColor" => typography::placeholder_color(api),
        "content" => typography::content(api),

        other => log::warn!("no core plugin named `{other}`"),
    }
}

/// A render function that sets every one of `names` to the value.
pub(crate) fn properties(
    names: &'static [&'static str],
) -> impl Fn(&str, &UtilityArgs<'_>) -> StyleTree + Send + Sync + 'static {
    move |value: &str, _: &UtilityArgs<'_>| {
        names
            .iter()
            .map(|name| (*name, value))
            .collect::<StyleTree>()
    }
}
