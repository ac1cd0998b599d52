//! The built-in base preset.

use once_cell::sync::Lazy;
use serde_json::{Value, json};

use super::{Config, ThemeHelpers};
use crate::config::resolve::merge_values;

static PALETTE: Lazy<Value> = Lazy::new(|| {
    json!({
        "inherit": "inherit",
        "current": "currentColor",
        "transparent": "transparent",
        "black": "#000",
        "white": "#fff",
        "gray": {
            "50": "#f9fafb", "100": "#f3f4f6", "200": "#e5e7eb", "300": "#d1d5db",
            "400": "#9ca3af", "500": "#6b7280", "600": "#4b5563", "700": "#374151",
            "800": "#1f2937", "900": "#111827", "950": "#030712",
        },
        "red": {
            "50": "#fef2f2", "100": "#fee2e2", "200": "#fecaca", "300": "#fca5a5",
            "400": "#f87171", "500": "#ef4444", "600": "#dc2626", "700": "#b91c1c",
            "800": "#991b1b", "900": "#7f1d1d", "950": "#450a0a",
        },
        "green": {
            "50": "#f0fdf4", "100": "#dcfce7", "200": "#bbf7d0", "300": "#86efac",
            "400": "#4ade80", "500": "#22c55e", "600": "#16a34a", "700": "#15803d",
            "800": "#166534", "900": "#14532d", "950": "#052e16",
        },
        "blue": {
            "50": "#eff6ff", "100": "#dbeafe", "200": "#bfdbfe", "300": "#93c5fd",
            "400": "#60a5fa", "500": "#3b82f6", "600": "#2563eb", "700": "#1d4ed8",
            "800": "#1e40af", "900": "#1e3a8a", "950": "#172554",
        },
    })
});

static BASE: Lazy<Config> = Lazy::new(|| {
    Config::new()
        .no_presets()
        .theme(
            "screens",
            json!({ "sm": "640px", "md": "768px", "lg": "1024px", "xl": "1280px", "2xl": "1536px" }),
        )
        .theme_fn("colors", |h: &ThemeHelpers<'_>| h.colors())
        .theme(
            "spacing",
            json!({
                "px": "1px", "0": "0px", "0.5": "0.125rem", "1": "0.25rem", "1.5": "0.375rem",
                "2": "0.5rem", "2.5": "0.625rem", "3": "0.75rem", "3.5": "0.875rem", "4": "1rem",
                "5": "1.25rem", "6": "1.5rem", "7": "1.75rem", "8": "2rem", "9": "2.25rem",
                "10": "2.5rem", "11": "2.75rem", "12": "3rem", "14": "3.5rem", "16": "4rem",
                "20": "5rem", "24": "6rem", "28": "7rem", "32": "8rem", "36": "9rem",
                "40": "10rem", "44": "11rem", "48": "12rem", "52": "13rem", "56": "14rem",
                "60": "15rem", "64": "16rem", "72": "18rem", "80": "20rem", "96": "24rem",
            }),
        )
        .theme(
            "opacity",
            json!({
                "0": "0", "5": "0.05", "10": "0.1", "15": "0.15", "20": "0.2", "25": "0.25",
                "30": "0.3", "35": "0.35", "40": "0.4", "45": "0.45", "50": "0.5", "55": "0.55",
                "60": "0.6", "65": "0.65", "70": "0.7", "75": "0.75", "80": "0.8", "85": "0.85",
                "90": "0.9", "95": "0.95", "100": "1",
            }),
        )
        .theme(
            "fontSize",
            json!({
                "xs": ["0.75rem", { "lineHeight": "1rem" }],
                "sm": ["0.875rem", { "lineHeight": "1.25rem" }],
                "base": ["1rem", { "lineHeight": "1.5rem" }],
                "lg": ["1.125rem", { "lineHeight": "1.75rem" }],
                "xl": ["1.25rem", { "lineHeight": "1.75rem" }],
                "2xl": ["1.5rem", { "lineHeight": "2rem" }],
                "3xl": ["1.875rem", { "lineHeight": "2.25rem" }],
            }),
        )
        .theme(
            "lineHeight",
            json!({
                "none": "1", "tight": "1.25", "snug": "1.375", "normal": "1.5",
                "relaxed": "1.625", "loose": "2", "4": "1rem", "6": "1.5rem", "8": "2rem",
            }),
        )
        .theme(
            "fontWeight",
            json!({
                "thin": "100", "extralight": "200", "light": "300", "normal": "400",
                "medium": "500", "semibold": "600", "bold": "700", "extrabold": "800",
                "black": "900",
            }),
        )
        .theme(
            "fontFamily",
            json!({
                "sans": ["ui-sans-serif", "system-ui", "sans-serif"],
                "serif": ["ui-serif", "Georgia", "serif"],
                "mono": ["ui-monospace", "SFMono-Regular", "monospace"],
            }),
        )
        .theme(
            "borderWidth",
            json!({ "DEFAULT": "1px", "0": "0px", "2": "2px", "4": "4px", "8": "8px" }),
        )
        .theme(
            "borderRadius",
            json!({
                "none": "0px", "sm": "0.125rem", "DEFAULT": "0.25rem", "md": "0.375rem",
                "lg": "0.5rem", "xl": "0.75rem", "2xl": "1rem", "full": "9999px",
            }),
        )
        .theme(
            "boxShadow",
            json!({
                "sm": "0 1px 2px 0 rgb(0 0 0 / 0.05)",
                "DEFAULT": "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
                "md": "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
                "lg": "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
                "inner": "inset 0 2px 4px 0 rgb(0 0 0 / 0.05)",
                "none": "none",
            }),
        )
        .theme(
            "zIndex",
            json!({ "0": "0", "10": "10", "20": "20", "30": "30", "40": "40", "50": "50", "auto": "auto" }),
        )
        .theme(
            "rotate",
            json!({
                "0": "0deg", "1": "1deg", "2": "2deg", "3": "3deg", "6": "6deg", "12": "12deg",
                "45": "45deg", "90": "90deg", "180": "180deg",
            }),
        )
        .theme(
            "backgroundPosition",
            json!({
                "bottom": "bottom", "center": "center", "left": "left",
                "left-bottom": "left bottom", "left-top": "left top", "right": "right",
                "right-bottom": "right bottom", "right-top": "right top", "top": "top",
            }),
        )
        .theme("backgroundSize", json!({ "auto": "auto", "cover": "cover", "contain": "contain" }))
        .theme(
            "backgroundImage",
            json!({
                "none": "none",
                "gradient-to-t": "linear-gradient(to top, var(--tw-gradient-stops))",
                "gradient-to-r": "linear-gradient(to right, var(--tw-gradient-stops))",
                "gradient-to-b": "linear-gradient(to bottom, var(--tw-gradient-stops))",
                "gradient-to-l": "linear-gradient(to left, var(--tw-gradient-stops))",
            }),
        )
        .theme("content", json!({ "none": "none" }))
        .theme_fn("width", |h: &ThemeHelpers<'_>| {
            let sizes = json!({
                "auto": "auto", "1/2": "50%", "1/3": "33.333333%", "2/3": "66.666667%",
                "1/4": "25%", "3/4": "75%", "full": "100%", "screen": "100vw",
                "min": "min-content", "max": "max-content", "fit": "fit-content",
            });
            merge_values(h.theme("spacing"), sizes)
        })
        .theme_fn("height", |h: &ThemeHelpers<'_>| {
            let sizes = json!({
                "auto": "auto", "1/2": "50%", "full": "100%", "screen": "100vh",
                "min": "min-content", "max": "max-content", "fit": "fit-content",
            });
            merge_values(h.theme("spacing"), sizes)
        })
        .theme_fn("margin", |h: &ThemeHelpers<'_>| {
            merge_values(json!({ "auto": "auto" }), h.theme("spacing"))
        })
        .theme_fn("padding", |h: &ThemeHelpers<'_>| h.theme("spacing"))
        .theme_fn("gap", |h: &ThemeHelpers<'_>| h.theme("spacing"))
        .theme_fn("inset", |h: &ThemeHelpers<'_>| {
            let sizes = json!({ "auto": "auto", "1/2": "50%", "full": "100%" });
            merge_values(h.theme("spacing"), sizes)
        })
        .theme_fn("backgroundColor", |h: &ThemeHelpers<'_>| h.theme("colors"))
        .theme_fn("textColor", |h: &ThemeHelpers<'_>| h.theme("colors"))
        .theme_fn("placeholderColor", |h: &ThemeHelpers<'_>| h.theme("colors"))
        .theme_fn("borderColor", |h: &ThemeHelpers<'_>| {
            let default = h.theme_or("colors.gray.200", json!("currentColor"));
            merge_values(h.theme("colors"), json!({ "DEFAULT": default }))
        })
});

/// The configuration every layer without explicit presets builds on.
pub fn base_preset() -> &'static Config {
    &BASE
}

pub(crate) fn palette() -> Value {
    PALETTE.clone()
}
