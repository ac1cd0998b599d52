//! Color recognition and opacity application.
//!
//! Utilities never need to compute with colors, they only need to know
//! whether a value is one and to re-emit it with an alpha channel:
//!
//! - values containing the `<alpha-value>` placeholder get the opacity
//!   substituted directly
//! - hex and named colors become `rgb(r g b / opacity)`
//! - functional colors (`rgb()`, `hsl()`, `oklch()`, ...) keep their
//!   function and channels and get `/ opacity` appended
//! - a bare channel list (`255 0 0` or `255, 0, 0`) is wrapped in `rgb()`
//!
//! ## Supported Color Formats
//!
//! - **Hex**: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - **Functional**: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `lab()`,
//!   `lch()`, `oklab()`, `oklch()`, `color()`, in comma or space syntax
//! - **Named**: CSS color names like `red`, `aliceblue`, `rebeccapurple`
//! - **Special**: `transparent`, `currentColor`

use phf::phf_map;
use thiserror::Error;

/// Placeholder that color values may carry in place of their alpha channel.
pub const ALPHA_PLACEHOLDER: &str = "<alpha-value>";

const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color",
];

/// Error returned when a color string cannot be parsed.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color: #{0}")]
    InvalidHex(String),
    #[error("unknown color: {0}")]
    Unknown(String),
    #[error("malformed color function: {0}")]
    MalformedFunction(String),
}

/// A parsed color, kept in the shape it was written in.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    /// A hex or named color.
    Rgb { r: u8, g: u8, b: u8, a: Option<f32> },
    /// A color function with its channel arguments, alpha dropped.
    Function { name: String, channels: Vec<String> },
    /// `transparent`.
    Transparent,
    /// `currentColor`.
    Current,
}

impl Color {
    /// Parses a color string.
    ///
    /// # Examples
    ///
    /// ```
    /// use twcss::types::color::Color;
    ///
    /// assert_eq!(
    ///     Color::parse("#0f0").unwrap(),
    ///     Color::Rgb { r: 0, g: 255, b: 0, a: None }
    /// );
    /// assert!(Color::parse("coral").is_ok());
    /// assert!(Color::parse("12px").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        let lower = input.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" => return Ok(Color::Transparent),
            "currentcolor" => return Ok(Color::Current),
            _ => {}
        }

        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if let Some(open) = lower.find('(') {
            let name = &lower[..open];
            if COLOR_FUNCTIONS.contains(&name) {
                return Self::parse_function(name, &input[open..]);
            }
            return Err(ColorParseError::Unknown(input.to_string()));
        }

        NAMED_COLORS
            .get(lower.as_str())
            .map(|&(r, g, b)| Color::Rgb { r, g, b, a: None })
            .ok_or_else(|| ColorParseError::Unknown(input.to_string()))
    }

    fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidHex(hex.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid());
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            3 | 4 => {
                let a = if hex.len() == 4 {
                    Some((digit(3)? * 17) as f32 / 255.0)
                } else {
                    None
                };
                Ok(Color::Rgb {
                    r: digit(0)? * 17,
                    g: digit(1)? * 17,
                    b: digit(2)? * 17,
                    a,
                })
            }
            6 | 8 => {
                let a = if hex.len() == 8 {
                    Some(pair(6)? as f32 / 255.0)
                } else {
                    None
                };
                Ok(Color::Rgb {
                    r: pair(0)?,
                    g: pair(2)?,
                    b: pair(4)?,
                    a,
                })
            }
            _ => Err(invalid()),
        }
    }

    fn parse_function(name: &str, args: &str) -> Result<Self, ColorParseError> {
        let malformed = || ColorParseError::MalformedFunction(format!("{name}{args}"));
        let inner = args
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let channels = split_channels(inner);
        let expected = if name == "color" { 4 } else { 3 };
        if channels.len() < expected {
            return Err(malformed());
        }

        let name = match name {
            "rgba" => "rgb",
            "hsla" => "hsl",
            other => other,
        };
        Ok(Color::Function {
            name: name.to_string(),
            channels: channels.into_iter().take(expected).collect(),
        })
    }

    /// Renders the color with an explicit alpha channel.
    ///
    /// Returns `None` for `currentColor`, whose channels are unknown.
    pub fn with_alpha(&self, opacity: &str) -> Option<String> {
        match self {
            Color::Rgb { r, g, b, .. } => Some(format!("rgb({r} {g} {b} / {opacity})")),
            Color::Function { name, channels } => {
                Some(format!("{name}({} / {opacity})", channels.join(" ")))
            }
            Color::Transparent => Some(format!("rgb(0 0 0 / {opacity})")),
            Color::Current => None,
        }
    }
}

/// Splits the arguments of a color function into channels.
///
/// Handles both `1, 2, 3, 0.5` and `1 2 3 / 0.5`. The alpha channel, if
/// present, is kept as the last element.
fn split_channels(inner: &str) -> Vec<String> {
    let (channels, alpha) = match inner.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (inner, None),
    };
    let mut parts: Vec<String> = if channels.contains(',') {
        channels.split(',').map(|s| s.trim().to_string()).collect()
    } else {
        super::split_top_level_whitespace(channels)
            .into_iter()
            .map(str::to_string)
            .collect()
    };
    parts.retain(|p| !p.is_empty());
    parts.extend(alpha.map(str::to_string));
    parts
}

/// Returns `true` when `value` parses as a color.
pub fn is_color(value: &str) -> bool {
    Color::parse(value).is_ok()
}

/// Re-emits a color value with the given opacity.
///
/// Returns `None` when the value is not a color that can take an alpha
/// channel; callers then keep the value unchanged.
///
/// # Examples
///
/// ```
/// use twcss::types::color::with_opacity;
///
/// assert_eq!(with_opacity("#000", "0.31").as_deref(), Some("rgb(0 0 0 / 0.31)"));
/// assert_eq!(
///     with_opacity("rgb(var(--c) / <alpha-value>)", "0.5").as_deref(),
///     Some("rgb(var(--c) / 0.5)")
/// );
/// assert_eq!(with_opacity("255 0 0", "1").as_deref(), Some("rgb(255 0 0 / 1)"));
/// ```
pub fn with_opacity(value: &str, opacity: &str) -> Option<String> {
    if value.contains(ALPHA_PLACEHOLDER) {
        return Some(value.replace(ALPHA_PLACEHOLDER, opacity));
    }
    if let Ok(color) = Color::parse(value) {
        return color.with_alpha(opacity);
    }
    let channels = split_channels(value);
    if channels.len() == 3 && channels.iter().all(|c| is_channel(c)) {
        return Some(format!("rgb({} / {opacity})", channels.join(" ")));
    }
    None
}

/// Replaces the `<alpha-value>` placeholder with full opacity.
pub fn without_opacity(value: &str) -> String {
    if value.contains(ALPHA_PLACEHOLDER) {
        value.replace(ALPHA_PLACEHOLDER, "1")
    } else {
        value.to_string()
    }
}

fn is_channel(text: &str) -> bool {
    let digits = text.trim_end_matches('%');
    !digits.is_empty() && digits.parse::<f64>().is_ok()
}

static NAMED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "aliceblue" => (240, 248, 255),
    "antiquewhite" => (250, 235, 215),
    "aqua" => (0, 255, 255),
    "aquamarine" => (127, 255, 212),
    "azure" => (240, 255, 255),
    "beige" => (245, 245, 220),
    "bisque" => (255, 228, 196),
    "black" => (0, 0, 0),
    "blanchedalmond" => (255, 235, 205),
    "blue" => (0, 0, 255),
    "blueviolet" => (138, 43, 226),
    "brown" => (165, 42, 42),
    "burlywood" => (222, 184, 135),
    "cadetblue" => (95, 158, 160),
    "chartreuse" => (127, 255, 0),
    "chocolate" => (210, 105, 30),
    "coral" => (255, 127, 80),
    "cornflowerblue" => (100, 149, 237),
    "cornsilk" => (255, 248, 220),
    "crimson" => (220, 20, 60),
    "cyan" => (0, 255, 255),
    "darkblue" => (0, 0, 139),
    "darkcyan" => (0, 139, 139),
    "darkgoldenrod" => (184, 134, 11),
    "darkgray" => (169, 169, 169),
    "darkgreen" => (0, 100, 0),
    "darkgrey" => (169, 169, 169),
    "darkkhaki" => (189, 183, 107),
    "darkmagenta" => (139, 0, 139),
    "darkolivegreen" => (85, 107, 47),
    "darkorange" => (255, 140, 0),
    "darkorchid" => (153, 50, 204),
    "darkred" => (139, 0, 0),
    "darksalmon" => (233, 150, 122),
    "darkseagreen" => (143, 188, 143),
    "darkslateblue" => (72, 61, 139),
    "darkslategray" => (47, 79, 79),
    "darkslategrey" => (47, 79, 79),
    "darkturquoise" => (0, 206, 209),
    "darkviolet" => (148, 0, 211),
    "deeppink" => (255, 20, 147),
    "deepskyblue" => (0, 191, 255),
    "dimgray" => (105, 105, 105),
    "dimgrey" => (105, 105, 105),
    "dodgerblue" => (30, 144, 255),
    "firebrick" => (178, 34, 34),
    "floralwhite" => (255, 250, 240),
    "forestgreen" => (34, 139, 34),
    "fuchsia" => (255, 0, 255),
    "gainsboro" => (220, 220, 220),
    "ghostwhite" => (248, 248, 255),
    "gold" => (255, 215, 0),
    "goldenrod" => (218, 165, 32),
    "gray" => (128, 128, 128),
    "green" => (0, 128, 0),
    "greenyellow" => (173, 255, 47),
    "grey" => (128, 128, 128),
    "honeydew" => (240, 255, 240),
    "hotpink" => (255, 105, 180),
    "indianred" => (205, 92, 92),
    "indigo" => (75, 0, 130),
    "ivory" => (255, 255, 240),
    "khaki" => (240, 230, 140),
    "lavender" => (230, 230, 250),
    "lavenderblush" => (255, 240, 245),
    "lawngreen" => (124, 252, 0),
    "lemonchiffon" => (255, 250, 205),
    "lightblue" => (173, 216, 230),
    "lightcoral" => (240, 128, 128),
    "lightcyan" => (224, 255, 255),
    "lightgoldenrodyellow" => (250, 250, 210),
    "lightgray" => (211, 211, 211),
    "lightgreen" => (144, 238, 144),
    "lightgrey" => (211, 211, 211),
    "lightpink" => (255, 182, 193),
    "lightsalmon" => (255, 160, 122),
    "lightseagreen" => (32, 178, 170),
    "lightskyblue" => (135, 206, 250),
    "lightslategray" => (119, 136, 153),
    "lightslategrey" => (119, 136, 153),
    "lightsteelblue" => (176, 196, 222),
    "lightyellow" => (255, 255, 224),
    "lime" => (0, 255, 0),
    "limegreen" => (50, 205, 50),
    "linen" => (250, 240, 230),
    "magenta" => (255, 0, 255),
    "maroon" => (128, 0, 0),
    "mediumaquamarine" => (102, 205, 170),
    "mediumblue" => (0, 0, 205),
    "mediumorchid" => (186, 85, 211),
    "mediumpurple" => (147, 112, 219),
    "mediumseagreen" => (60, 179, 113),
    "mediumslateblue" => (123, 104, 238),
    "mediumspringgreen" => (0, 250, 154),
    "mediumturquoise" => (72, 209, 204),
    "mediumvioletred" => (199, 21, 133),
    "midnightblue" => (25, 25, 112),
    "mintcream" => (245, 255, 250),
    "mistyrose" => (255, 228, 225),
    "moccasin" => (255, 228, 181),
    "navajowhite" => (255, 222, 173),
    "navy" => (0, 0, 128),
    "oldlace" => (253, 245, 230),
    "olive" => (128, 128, 0),
    "olivedrab" => (107, 142, 35),
    "orange" => (255, 165, 0),
    "orangered" => (255, 69, 0),
    "orchid" => (218, 112, 214),
    "palegoldenrod" => (238, 232, 170),
    "palegreen" => (152, 251, 152),
    "paleturquoise" => (175, 238, 238),
    "palevioletred" => (219, 112, 147),
    "papayawhip" => (255, 239, 213),
    "peachpuff" => (255, 218, 185),
    "peru" => (205, 133, 63),
    "pink" => (255, 192, 203),
    "plum" => (221, 160, 221),
    "powderblue" => (176, 224, 230),
    "purple" => (128, 0, 128),
    "rebeccapurple" => (102, 51, 153),
    "red" => (255, 0, 0),
    "rosybrown" => (188, 143, 143),
    "royalblue" => (65, 105, 225),
    "saddlebrown" => (139, 69, 19),
    "salmon" => (250, 128, 114),
    "sandybrown" => (244, 164, 96),
    "seagreen" => (46, 139, 87),
    "seashell" => (255, 245, 238),
    "sienna" => (160, 82, 45),
    "silver" => (192, 192, 192),
    "skyblue" => (135, 206, 235),
    "slateblue" => (106, 90, 205),
    "slategray" => (112, 128, 144),
    "slategrey" => (112, 128, 144),
    "snow" => (255, 250, 250),
    "springgreen" => (0, 255, 127),
    "steelblue" => (70, 130, 180),
    "tan" => (210, 180, 140),
    "teal" => (0, 128, 128),
    "thistle" => (216, 191, 216),
    "tomato" => (255, 99, 71),
    "turquoise" => (64, 224, 208),
    "violet" => (238, 130, 238),
    "wheat" => (245, 222, 179),
    "white" => (255, 255, 255),
    "whitesmoke" => (245, 245, 245),
    "yellow" => (255, 255, 0),
    "yellowgreen" => (154, 205, 50),
};
