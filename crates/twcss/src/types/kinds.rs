//! The value kind catalogue.
//!
//! A lookup utility declares the kinds it accepts, in order. Arbitrary
//! values are offered to each kind in turn and the first one that accepts
//! wins, unless the value starts with an explicit `kind:` tag, which pins
//! the kind.
//!
//! | Kind | Accepts |
//! |---|---|
//! | `number` | unit-less numbers |
//! | `length` | lengths and `0` |
//! | `percentage` | percentages |
//! | `angle` | angles |
//! | `color` | hex, named and functional colors |
//! | `url` | `url(...)` |
//! | `image` | urls, gradients and image functions |
//! | `line-width` | `thin`, `medium`, `thick` or a length |
//! | `absolute-size` | `small`, `x-large`, ... |
//! | `relative-size` | `larger`, `smaller` |
//! | `generic-name` | generic font families |
//! | `family-name` | lists of font families |
//! | `shadow` | box shadows |
//! | `background-position` | 1 to 4 position terms per layer |
//! | `background-size` | `cover`, `contain` or up to two sizes per layer |
//!
//! The sentinel [`ValueKind::Any`] accepts any value unchanged.

use std::fmt;

use phf::phf_set;
use serde_json::Value;

use super::color::{is_color, with_opacity, without_opacity};
use super::composite::{
    is_background_position, is_background_size, is_family_list, is_generic_family, is_image,
    is_length, is_percentage, is_shadow,
};
use super::units::{UnitClass, dimension_class, first_unit, is_math_function, negate};

static ABSOLUTE_SIZES: phf::Set<&'static str> = phf_set! {
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
};

static LINE_WIDTHS: phf::Set<&'static str> = phf_set! { "thin", "medium", "thick" };

/// A kind of CSS value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Length,
    Percentage,
    Angle,
    Color,
    Url,
    Image,
    LineWidth,
    AbsoluteSize,
    RelativeSize,
    GenericName,
    FamilyName,
    Shadow,
    BackgroundPosition,
    BackgroundSize,
    /// Accepts any value as it is.
    Any,
}

/// Options for [`ValueKind::handle_value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueOptions<'a> {
    /// The utility was written with a leading `-`.
    pub negative: bool,
    /// The kind was pinned with an explicit tag, so the value is trusted.
    pub unambiguous: bool,
    /// Opacity to apply to colors.
    pub opacity: Option<&'a str>,
}

/// Options for [`ValueKind::handle_config`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigOptions<'a> {
    pub negative: bool,
    /// Opacity to apply to colors, already looked up in the theme.
    pub opacity: Option<&'a str>,
    /// The raw `/modifier`, used as `n / 100` opacity for colors when no
    /// opacity was given.
    pub modifier: Option<&'a str>,
}

impl ValueKind {
    /// Every concrete kind, without [`ValueKind::Any`].
    pub const ALL: [ValueKind; 15] = [
        ValueKind::Number,
        ValueKind::Length,
        ValueKind::Percentage,
        ValueKind::Angle,
        ValueKind::Color,
        ValueKind::Url,
        ValueKind::Image,
        ValueKind::LineWidth,
        ValueKind::AbsoluteSize,
        ValueKind::RelativeSize,
        ValueKind::GenericName,
        ValueKind::FamilyName,
        ValueKind::Shadow,
        ValueKind::BackgroundPosition,
        ValueKind::BackgroundSize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Length => "length",
            ValueKind::Percentage => "percentage",
            ValueKind::Angle => "angle",
            ValueKind::Color => "color",
            ValueKind::Url => "url",
            ValueKind::Image => "image",
            ValueKind::LineWidth => "line-width",
            ValueKind::AbsoluteSize => "absolute-size",
            ValueKind::RelativeSize => "relative-size",
            ValueKind::GenericName => "generic-name",
            ValueKind::FamilyName => "family-name",
            ValueKind::Shadow => "shadow",
            ValueKind::BackgroundPosition => "background-position",
            ValueKind::BackgroundSize => "background-size",
            ValueKind::Any => "any",
        }
    }

    /// Does an explicit `tag:` prefix select this kind?
    pub fn is_tag(self, tag: &str) -> bool {
        tag == self.name()
            || match self {
                ValueKind::BackgroundPosition => matches!(tag, "position" | "bg-position"),
                ValueKind::BackgroundSize => matches!(tag, "size" | "bg-size"),
                ValueKind::Image => tag == "gradient",
                ValueKind::FamilyName => tag == "family",
                _ => false,
            }
    }

    /// Finds the kind an explicit tag selects.
    pub fn from_tag(tag: &str) -> Option<ValueKind> {
        ValueKind::ALL
            .into_iter()
            .chain([ValueKind::Any])
            .find(|kind| kind.is_tag(tag))
    }

    /// Returns `true` when `raw` belongs to this kind.
    pub fn accepts(self, raw: &str, unambiguous: bool) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        if unambiguous || self == ValueKind::Any {
            return true;
        }
        let math_of = |class: UnitClass| is_math_function(raw) && first_unit(raw) == Some(class);
        match self {
            ValueKind::Number => {
                dimension_class(raw) == Some(UnitClass::Unitless) || math_of(UnitClass::Unitless)
            }
            ValueKind::Length => is_length(raw),
            ValueKind::Percentage => is_percentage(raw),
            ValueKind::Angle => {
                dimension_class(raw) == Some(UnitClass::Angle) || math_of(UnitClass::Angle)
            }
            ValueKind::Color => is_color(raw),
            ValueKind::Url => raw.starts_with("url(") && raw.ends_with(')'),
            ValueKind::Image => is_image(raw),
            ValueKind::LineWidth => LINE_WIDTHS.contains(raw) || is_length(raw),
            ValueKind::AbsoluteSize => ABSOLUTE_SIZES.contains(raw),
            ValueKind::RelativeSize => matches!(raw, "larger" | "smaller"),
            ValueKind::GenericName => is_generic_family(raw),
            ValueKind::FamilyName => {
                (raw.contains(',') || raw.contains(['"', '\''])) && is_family_list(raw)
            }
            ValueKind::Shadow => is_shadow(raw),
            ValueKind::BackgroundPosition => is_background_position(raw),
            ValueKind::BackgroundSize => is_background_size(raw),
            ValueKind::Any => true,
        }
    }

    fn negatable(self) -> bool {
        matches!(
            self,
            ValueKind::Number
                | ValueKind::Length
                | ValueKind::Percentage
                | ValueKind::Angle
                | ValueKind::Any
        )
    }

    /// Validates and formats an arbitrary value.
    ///
    /// Returns `None` when the value is not of this kind, or when it is
    /// negative and this kind cannot be negated.
    ///
    /// ```
    /// use twcss::types::{ValueKind, ValueOptions};
    ///
    /// let negative = ValueOptions { negative: true, ..Default::default() };
    /// assert_eq!(ValueKind::Length.handle_value("3px", negative).as_deref(), Some("-3px"));
    /// assert_eq!(ValueKind::Length.handle_value("red", negative), None);
    /// assert_eq!(ValueKind::Color.handle_value("3px", Default::default()), None);
    /// ```
    pub fn handle_value(self, raw: &str, opts: ValueOptions<'_>) -> Option<String> {
        let raw = raw.trim();
        if !self.accepts(raw, opts.unambiguous) {
            return None;
        }
        self.finish(raw.to_string(), opts.negative, opts.opacity)
    }

    /// Formats a value taken from a theme table.
    ///
    /// Strings are used as they are, numbers are printed, arrays of strings
    /// are joined with `", "` and `[value, { options }]` pairs yield their
    /// first element. Objects resolve through their `DEFAULT` key.
    pub fn handle_config(self, entry: &Value, opts: ConfigOptions<'_>) -> Option<String> {
        let text = config_text(entry)?;
        let modifier_opacity = opts.modifier.and_then(modifier_to_opacity);
        let opacity = opts.opacity.or(modifier_opacity.as_deref());
        self.finish(text, opts.negative, opacity)
    }

    fn finish(self, value: String, negative: bool, opacity: Option<&str>) -> Option<String> {
        if negative {
            return self.negatable().then(|| negate(&value));
        }
        if self == ValueKind::Color {
            return Some(match opacity {
                Some(opacity) => with_opacity(&value, opacity).unwrap_or(value),
                None => without_opacity(&value),
            });
        }
        Some(value)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders a theme table entry as CSS text.
pub fn config_text(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => match items.as_slice() {
            [first, Value::Object(_)] => config_text(first),
            items => {
                let parts: Option<Vec<String>> = items.iter().map(config_text).collect();
                parts.map(|parts| parts.join(", "))
            }
        },
        Value::Object(map) => map.get("DEFAULT").and_then(config_text),
        Value::Bool(_) | Value::Null => None,
    }
}

/// Turns a bare numeric modifier into an opacity: `50` becomes `0.5`.
pub fn modifier_to_opacity(modifier: &str) -> Option<String> {
    let n: f64 = modifier.parse().ok()?;
    Some(format_number(n / 100.0))
}

/// Prints a number without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Splits an explicit `kind:` tag off an arbitrary value.
///
/// Only tags naming a known kind count, so `content-['a:b']` keeps its
/// colon.
pub fn split_tag(raw: &str) -> Option<(ValueKind, &str)> {
    let (tag, rest) = raw.split_once(':')?;
    ValueKind::from_tag(tag).map(|kind| (kind, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(kind: ValueKind, raw: &str) -> Option<String> {
        kind.handle_value(raw, ValueOptions::default())
    }

    #[test]
    fn numeric_kinds() {
        assert_eq!(value(ValueKind::Number, "1.5").as_deref(), Some("1.5"));
        assert_eq!(value(ValueKind::Number, "1px"), None);
        assert_eq!(value(ValueKind::Length, "0").as_deref(), Some("0"));
        assert_eq!(value(ValueKind::Length, "calc(100%-1rem)"), None);
        assert_eq!(value(ValueKind::Length, "calc(1rem+2px)").as_deref(), Some("calc(1rem+2px)"));
        assert_eq!(value(ValueKind::Percentage, "calc(100%-1rem)").as_deref(), Some("calc(100%-1rem)"));
        assert_eq!(value(ValueKind::Angle, "45deg").as_deref(), Some("45deg"));
        assert_eq!(value(ValueKind::Angle, "45"), None);
    }

    #[test]
    fn negative_values() {
        let negative = ValueOptions { negative: true, ..Default::default() };
        assert_eq!(ValueKind::Angle.handle_value("45deg", negative).as_deref(), Some("-45deg"));
        assert_eq!(
            ValueKind::Length.handle_value("calc(1px+2px)", negative).as_deref(),
            Some("calc(calc(1px+2px) * -1)")
        );
        assert_eq!(ValueKind::Color.handle_value("red", negative), None);
    }

    #[test]
    fn keyword_kinds() {
        assert!(ValueKind::AbsoluteSize.accepts("x-large", false));
        assert!(ValueKind::RelativeSize.accepts("smaller", false));
        assert!(ValueKind::GenericName.accepts("ui-monospace", false));
        assert!(ValueKind::LineWidth.accepts("thick", false));
        assert!(ValueKind::LineWidth.accepts("2px", false));
        assert!(!ValueKind::FamilyName.accepts("Inter", false));
        assert!(ValueKind::FamilyName.accepts("Inter, sans-serif", false));
        assert!(ValueKind::FamilyName.accepts("Inter", true));
    }

    #[test]
    fn color_opacity() {
        let opts = ValueOptions { opacity: Some("0.5"), ..Default::default() };
        assert_eq!(
            ValueKind::Color.handle_value("#fff", opts).as_deref(),
            Some("rgb(255 255 255 / 0.5)")
        );
        assert_eq!(value(ValueKind::Color, "var(--c)"), None);
        let tagged = ValueOptions { unambiguous: true, opacity: Some("0.5"), ..Default::default() };
        assert_eq!(ValueKind::Color.handle_value("var(--c)", tagged).as_deref(), Some("var(--c)"));
    }

    #[test]
    fn config_entries() {
        let opts = ConfigOptions { modifier: Some("31"), ..Default::default() };
        assert_eq!(
            ValueKind::Color.handle_config(&json!("#000"), opts).as_deref(),
            Some("rgb(0 0 0 / 0.31)")
        );
        assert_eq!(
            ValueKind::Any.handle_config(&json!(["0.75rem", { "lineHeight": "1rem" }]), ConfigOptions::default()).as_deref(),
            Some("0.75rem")
        );
        assert_eq!(
            ValueKind::Any.handle_config(&json!(["Inter", "sans-serif"]), ConfigOptions::default()).as_deref(),
            Some("Inter, sans-serif")
        );
        let negative = ConfigOptions { negative: true, ..Default::default() };
        assert_eq!(ValueKind::Length.handle_config(&json!("1rem"), negative).as_deref(), Some("-1rem"));
        assert_eq!(ValueKind::Length.handle_config(&json!(10), negative).as_deref(), Some("-10"));
    }

    #[test]
    fn tags() {
        assert_eq!(split_tag("length:var(--x)"), Some((ValueKind::Length, "var(--x)")));
        assert_eq!(split_tag("position:center"), Some((ValueKind::BackgroundPosition, "center")));
        assert_eq!(split_tag("'a:b'"), None);
        assert_eq!(modifier_to_opacity("10").as_deref(), Some("0.1"));
        assert_eq!(modifier_to_opacity("x"), None);
        assert_eq!(format_number(2.0), "2");
    }
}
