//! Configuration layers.
//!
//! A [`Config`] is one layer: user configuration, a preset, or the partial
//! configuration a plugin ships with. [`resolve`] flattens all layers into
//! a [`ResolvedConfig`], which is what a context is built from.
//!
//! Theme categories are either plain JSON or functions of the merged
//! theme, which lets a category be written in terms of another one:
//!
//! ```
//! use serde_json::json;
//! use twcss::config::{Config, resolve_config};
//!
//! let config = Config::new()
//!     .theme("spacing", json!({ "1": "0.25rem" }))
//!     .theme_fn("gap", |helpers| helpers.theme("spacing"));
//! let resolved = resolve_config(&config);
//! assert_eq!(resolved.theme["gap"], json!({ "1": "0.25rem" }));
//! ```

mod preset;
mod resolve;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::context::Plugin;
use crate::error::{Result, TwError};

pub use preset::base_preset;
pub use resolve::{ResolvedConfig, resolve, resolve_config};

/// Access to the merged theme while a function-valued category is being
/// evaluated.
pub struct ThemeHelpers<'a> {
    lookup: &'a dyn Fn(&str) -> Option<Value>,
}

impl<'a> ThemeHelpers<'a> {
    pub(crate) fn new(lookup: &'a dyn Fn(&str) -> Option<Value>) -> Self {
        Self { lookup }
    }

    /// Looks up a theme path, `Null` when absent.
    pub fn theme(&self, path: &str) -> Value {
        (self.lookup)(path).unwrap_or(Value::Null)
    }

    pub fn theme_or(&self, path: &str, default: Value) -> Value {
        (self.lookup)(path).unwrap_or(default)
    }

    /// The built-in color palette.
    pub fn colors(&self) -> Value {
        preset::palette()
    }
}

/// A function-valued theme category.
pub trait ThemeFn: Send + Sync {
    fn evaluate(&self, helpers: &ThemeHelpers<'_>) -> Value;
}

impl<F> ThemeFn for F
where
    F: Fn(&ThemeHelpers<'_>) -> Value + Send + Sync,
{
    fn evaluate(&self, helpers: &ThemeHelpers<'_>) -> Value {
        self(helpers)
    }
}

/// A theme category: data, or a function of the merged theme.
#[derive(Clone)]
pub enum ThemeValue {
    Value(Value),
    Func(Arc<dyn ThemeFn>),
}

impl ThemeValue {
    pub fn func(f: impl Fn(&ThemeHelpers<'_>) -> Value + Send + Sync + 'static) -> Self {
        ThemeValue::Func(Arc::new(f))
    }

    pub fn is_func(&self) -> bool {
        matches!(self, ThemeValue::Func(_))
    }

    pub(crate) fn evaluate(&self, helpers: &ThemeHelpers<'_>) -> Value {
        match self {
            ThemeValue::Value(value) => value.clone(),
            ThemeValue::Func(f) => f.evaluate(helpers),
        }
    }
}

impl From<Value> for ThemeValue {
    fn from(value: Value) -> Self {
        ThemeValue::Value(value)
    }
}

impl fmt::Debug for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeValue::Value(value) => write!(f, "{value}"),
            ThemeValue::Func(_) => f.write_str("<fn>"),
        }
    }
}

/// The `important` option.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Important {
    /// `true` marks every declaration `!important`.
    All(bool),
    /// `!`-marked utilities are emitted under `<selector> &`.
    Selector(String),
}

impl Default for Important {
    fn default() -> Self {
        Important::All(false)
    }
}

/// The `darkMode` option.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DarkModeRepr")]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`.
    #[default]
    Media,
    /// A selector on an ancestor, `.dark` unless configured.
    Class(String),
}

impl DarkMode {
    /// The variant template for `dark:`.
    pub fn template(&self) -> String {
        match self {
            DarkMode::Media => "@media (prefers-color-scheme: dark)".to_string(),
            DarkMode::Class(selector) => format!("{selector} &"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DarkModeRepr {
    Name(String),
    Pair(String, String),
}

impl TryFrom<DarkModeRepr> for DarkMode {
    type Error = String;

    fn try_from(repr: DarkModeRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            DarkModeRepr::Name(name) if name == "media" => Ok(DarkMode::Media),
            DarkModeRepr::Name(name) if name == "class" => Ok(DarkMode::Class(".dark".into())),
            DarkModeRepr::Pair(mode, selector) if mode == "class" => Ok(DarkMode::Class(selector)),
            DarkModeRepr::Name(other) | DarkModeRepr::Pair(other, _) => {
                Err(format!("unsupported darkMode `{other}`"))
            }
        }
    }
}

/// The `corePlugins` option.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CorePlugins {
    /// `true` enables every built-in plugin, `false` none.
    All(bool),
    /// Exactly these plugins.
    List(Vec<String>),
    /// Toggle individual plugins, keeping the others as they were.
    Map(IndexMap<String, bool>),
}

/// One configuration layer.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub theme: IndexMap<String, ThemeValue>,
    pub extend: IndexMap<String, ThemeValue>,
    /// `None` means the built-in base preset.
    pub presets: Option<Vec<Config>>,
    pub plugins: Vec<Plugin>,
    pub separator: Option<String>,
    pub prefix: Option<String>,
    pub important: Option<Important>,
    pub dark_mode: Option<DarkMode>,
    pub core_plugins: Option<CorePlugins>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a theme category, replacing the one from lower layers.
    pub fn theme(mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Self {
        self.theme.insert(key.into(), value.into());
        self
    }

    pub fn theme_fn(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&ThemeHelpers<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.theme.insert(key.into(), ThemeValue::func(f));
        self
    }

    /// Extends a theme category from lower layers.
    pub fn extend(mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Self {
        self.extend.insert(key.into(), value.into());
        self
    }

    pub fn extend_fn(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&ThemeHelpers<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.extend.insert(key.into(), ThemeValue::func(f));
        self
    }

    /// Adds a preset. The first call drops the built-in base preset.
    pub fn preset(mut self, preset: Config) -> Self {
        self.presets.get_or_insert_with(Vec::new).push(preset);
        self
    }

    /// Opts out of every preset, including the base one.
    pub fn no_presets(mut self) -> Self {
        self.presets = Some(Vec::new());
        self
    }

    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn important(mut self, important: Important) -> Self {
        self.important = Some(important);
        self
    }

    pub fn dark_mode(mut self, dark_mode: DarkMode) -> Self {
        self.dark_mode = Some(dark_mode);
        self
    }

    pub fn core_plugins(mut self, core_plugins: CorePlugins) -> Self {
        self.core_plugins = Some(core_plugins);
        self
    }

    /// Reads the data part of a configuration from JSON.
    ///
    /// Plugins and function-valued theme entries cannot be expressed in
    /// JSON; add them with the builder methods afterwards.
    ///
    /// ```
    /// use twcss::config::{Config, DarkMode, Important};
    ///
    /// let config = Config::from_json(r##"{
    ///     "prefix": "tw-",
    ///     "important": "#app",
    ///     "darkMode": ["class", ".night"],
    ///     "theme": { "extend": { "colors": { "brand": "#123456" } } }
    /// }"##).unwrap();
    /// assert_eq!(config.prefix.as_deref(), Some("tw-"));
    /// assert_eq!(config.important, Some(Important::Selector("#app".into())));
    /// assert_eq!(config.dark_mode, Some(DarkMode::Class(".night".into())));
    /// assert!(config.extend.contains_key("colors"));
    /// ```
    pub fn from_json(source: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(source)?;
        file.try_into()
    }
}

/// Serialized form of a [`Config`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    theme: Option<serde_json::Map<String, Value>>,
    presets: Option<Vec<ConfigFile>>,
    separator: Option<String>,
    prefix: Option<String>,
    important: Option<Important>,
    dark_mode: Option<DarkMode>,
    core_plugins: Option<CorePlugins>,
}

impl TryFrom<ConfigFile> for Config {
    type Error = TwError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let mut theme = IndexMap::new();
        let mut extend = IndexMap::new();
        for (key, value) in file.theme.unwrap_or_default() {
            if key != "extend" {
                theme.insert(key, ThemeValue::Value(value));
                continue;
            }
            let Value::Object(extensions) = value else {
                return Err(TwError::InvalidConfig(
                    "theme.extend must be an object".to_string(),
                ));
            };
            extend.extend(
                extensions
                    .into_iter()
                    .map(|(key, value)| (key, ThemeValue::Value(value))),
            );
        }

        let presets = file
            .presets
            .map(|presets| presets.into_iter().map(Config::try_from).collect())
            .transpose()?;

        Ok(Config {
            theme,
            extend,
            presets,
            plugins: Vec::new(),
            separator: file.separator,
            prefix: file.prefix,
            important: file.important,
            dark_mode: file.dark_mode,
            core_plugins: file.core_plugins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_reads_options() {
        let config = Config::from_json(
            r#"{
                "separator": "_",
                "important": true,
                "darkMode": "class",
                "corePlugins": { "margin": false },
                "presets": [{ "prefix": "x-" }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.separator.as_deref(), Some("_"));
        assert_eq!(config.important, Some(Important::All(true)));
        assert_eq!(config.dark_mode, Some(DarkMode::Class(".dark".into())));
        assert_eq!(
            config.core_plugins,
            Some(CorePlugins::Map(IndexMap::from([("margin".to_string(), false)])))
        );
        assert_eq!(config.presets.unwrap()[0].prefix.as_deref(), Some("x-"));
    }

    #[test]
    fn from_json_rejects_bad_shapes() {
        assert!(matches!(
            Config::from_json(r#"{ "theme": { "extend": 1 } }"#),
            Err(TwError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "darkMode": "sometimes" }"#),
            Err(TwError::Json(_))
        ));
    }

    #[test]
    fn dark_mode_templates() {
        assert_eq!(DarkMode::Media.template(), "@media (prefers-color-scheme: dark)");
        assert_eq!(DarkMode::Class(".night".into()).template(), ".night &");
    }

    #[test]
    fn theme_value_debug_hides_functions() {
        let value = ThemeValue::func(|_: &ThemeHelpers<'_>| json!(1));
        assert_eq!(format!("{value:?}"), "<fn>");
        assert_eq!(format!("{:?}", ThemeValue::from(json!("a"))), "\"a\"");
    }
}
