//! Selector, pseudo-element and media variants.

use serde_json::{Value, json};

use crate::context::{PluginApi, VariantArgs, VariantOptions};
use crate::style::StyleTree;
use crate::theme::ValueTable;
use crate::types::kinds::config_text;

const HOVER: &str = "@media (hover: hover) and (pointer: fine) { &:hover }";

/// Pseudo-classes, in the order their variants are registered.
const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("first", ":first-child"),
    ("last", ":last-child"),
    ("only", ":only-child"),
    ("odd", ":nth-child(odd)"),
    ("even", ":nth-child(even)"),
    ("first-of-type", ":first-of-type"),
    ("last-of-type", ":last-of-type"),
    ("visited", ":visited"),
    ("target", ":target"),
    ("open", "[open]"),
    ("default", ":default"),
    ("checked", ":checked"),
    ("indeterminate", ":indeterminate"),
    ("placeholder-shown", ":placeholder-shown"),
    ("autofill", ":autofill"),
    ("optional", ":optional"),
    ("required", ":required"),
    ("valid", ":valid"),
    ("invalid", ":invalid"),
    ("in-range", ":in-range"),
    ("out-of-range", ":out-of-range"),
    ("read-only", ":read-only"),
    ("empty", ":empty"),
    ("focus-within", ":focus-within"),
    ("hover", ":hover"),
    ("focus", ":focus"),
    ("focus-visible", ":focus-visible"),
    ("active", ":active"),
    ("enabled", ":enabled"),
    ("disabled", ":disabled"),
];

pub(super) fn pseudo_class_variants(api: &mut PluginApi<'_>) {
    for (name, pseudo) in PSEUDO_CLASSES {
        if *name == "hover" {
            api.add_variant(name, HOVER);
        } else {
            api.add_variant(name, format!("&{pseudo}"));
        }
    }
}

pub(super) fn pseudo_element_variants(api: &mut PluginApi<'_>) {
    api.add_variant("first-letter", "&::first-letter");
    api.add_variant("first-line", "&::first-line");
    api.add_variant("marker", ["& *::marker", "&::marker"]);
    api.add_variant("selection", ["& *::selection", "&::selection"]);
    api.add_variant("file", "&::file-selector-button");
    api.add_variant("placeholder", "&::placeholder");
    api.add_variant("backdrop", "&::backdrop");
    api.add_variant_with("before", "&::before", with_content());
    api.add_variant_with("after", "&::after", with_content());
}

/// `before:` and `after:` only render with a `content` declaration.
fn with_content() -> VariantOptions {
    VariantOptions::new().post(|tree: StyleTree| {
        let mut out = StyleTree::new();
        out.insert("content", "var(--tw-content)");
        out.merge(tree);
        out
    })
}

/// The states `group-*` and `peer-*` accept, as selector suffixes.
fn state_values() -> ValueTable {
    PSEUDO_CLASSES
        .iter()
        .map(|(name, pseudo)| (name.to_string(), json!(pseudo)))
        .collect()
}

/// The selector for a marker class, `.group` or `.group\/name`.
fn marker_class(marker: &str, args: &VariantArgs<'_>) -> String {
    match args.modifier {
        Some(name) => format!(".{marker}\\/{name}"),
        None => format!(".{marker}"),
    }
}

/// Applies a state to a marker selector. Arbitrary states may place the
/// marker with `&`, otherwise the state is appended.
fn marked_state(marker: &str, state: &str) -> Option<String> {
    let state = state.trim();
    if state.is_empty() {
        return None;
    }
    if state.contains('&') {
        Some(state.replace('&', marker))
    } else {
        Some(format!("{marker}{state}"))
    }
}

pub(super) fn group_variants(api: &mut PluginApi<'_>) {
    let opts = VariantOptions::new().values(state_values());
    let group = api.prefix("group");
    api.match_variant("group", opts, move |state, args| {
        let marker = marker_class(&group, args);
        marked_state(&marker, state).map(|selector| format!("{selector} &"))
    });
}

pub(super) fn peer_variants(api: &mut PluginApi<'_>) {
    let opts = VariantOptions::new().values(state_values());
    let peer = api.prefix("peer");
    api.match_variant("peer", opts, move |state, args| {
        let marker = marker_class(&peer, args);
        marked_state(&marker, state).map(|selector| format!("{selector} ~ &"))
    });
}

pub(super) fn dark_variant(api: &mut PluginApi<'_>) {
    let template = api.config().dark_mode.template();
    api.add_variant("dark", template);
}

pub(super) fn screen_variants(api: &mut PluginApi<'_>) {
    let screens = api.theme_table("screens");
    for (name, value) in &screens {
        let Some(min) = config_text(value) else {
            log::debug!("screen `{name}` has no usable width");
            continue;
        };
        api.add_variant(name, format!("@media (min-width: {min})"));
    }
}

pub(super) fn media_variants(api: &mut PluginApi<'_>) {
    api.add_variant("motion-safe", "@media (prefers-reduced-motion: no-preference)");
    api.add_variant("motion-reduce", "@media (prefers-reduced-motion: reduce)");
    api.add_variant("print", "@media print");
    api.add_variant("portrait", "@media (orientation: portrait)");
    api.add_variant("landscape", "@media (orientation: landscape)");
    api.add_variant("rtl", r#"&:where([dir="rtl"], [dir="rtl"] *)"#);
    api.add_variant("ltr", r#"&:where([dir="ltr"], [dir="ltr"] *)"#);
}

pub(super) fn supports_variant(api: &mut PluginApi<'_>) {
    let opts = VariantOptions::new().values(api.theme_table("supports"));
    api.match_variant("supports", opts, |value, _| {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let query = if value.starts_with('(') || value.starts_with("not ") {
            value.to_string()
        } else if value.contains(':') {
            format!("({value})")
        } else {
            format!("({value}: var(--tw))")
        };
        Some(format!("@supports {query}"))
    });
}

pub(super) fn data_variant(api: &mut PluginApi<'_>) {
    let opts = VariantOptions::new().values(api.theme_table("data"));
    api.match_variant("data", opts, |value, _| {
        let value = value.trim();
        (!value.is_empty()).then(|| format!("&[data-{value}]"))
    });
}

pub(super) fn aria_variant(api: &mut PluginApi<'_>) {
    let mut values: ValueTable = [
        "busy", "checked", "disabled", "expanded", "hidden", "pressed", "readonly", "required",
        "selected",
    ]
    .into_iter()
    .map(|state| (state.to_string(), Value::String(format!("{state}=\"true\""))))
    .collect();
    values.extend(api.theme_table("aria"));

    api.match_variant("aria", VariantOptions::new().values(values), |value, _| {
        let value = value.trim();
        (!value.is_empty()).then(|| format!("&[aria-{value}]"))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_attach_to_the_marker() {
        assert_eq!(marked_state(".group", ":hover").as_deref(), Some(".group:hover"));
        assert_eq!(
            marked_state(".group", ".is-open").as_deref(),
            Some(".group.is-open")
        );
        assert_eq!(
            marked_state(".group", ":nth-of-type(3) &").as_deref(),
            Some(":nth-of-type(3) .group")
        );
        assert_eq!(marked_state(".group", " "), None);
    }

    #[test]
    fn named_markers_are_escaped() {
        let args = VariantArgs {
            modifier: Some("item"),
        };
        assert_eq!(marker_class("group", &args), ".group\\/item");
        assert_eq!(marker_class("peer", &VariantArgs { modifier: None }), ".peer");
    }
}
