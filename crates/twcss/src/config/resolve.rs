use std::cell::RefCell;
use std::collections::HashSet;

use indexmap::IndexMap;
use log::{trace, warn};
use serde_json::Value;

use super::{Config, CorePlugins, DarkMode, Important, ThemeHelpers, ThemeValue, base_preset};
use crate::context::Plugin;
use crate::plugins::CORE_PLUGINS;
use crate::theme::{Theme, parse_path, walk};

/// A configuration with every layer merged and every theme function
/// evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    /// The merged theme, a JSON object keyed by category.
    pub theme: Value,
    /// User and preset plugins, lowest priority first.
    pub plugins: Vec<Plugin>,
    pub separator: String,
    pub prefix: String,
    pub important: Important,
    pub dark_mode: DarkMode,
    /// Enabled built-in plugins.
    pub core_plugins: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&[])
    }
}

impl ResolvedConfig {
    pub fn theme(&self) -> Theme {
        Theme::new(self.theme.clone())
    }

    pub fn core_plugin_enabled(&self, name: &str) -> bool {
        self.core_plugins.iter().any(|p| p == name)
    }

    /// Turns the resolved configuration back into a single layer.
    ///
    /// Resolving the result yields `self` again.
    pub fn to_config(&self) -> Config {
        let theme = match &self.theme {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), ThemeValue::Value(value.clone())))
                .collect(),
            _ => IndexMap::new(),
        };
        Config {
            theme,
            extend: IndexMap::new(),
            presets: Some(Vec::new()),
            plugins: self.plugins.clone(),
            separator: Some(self.separator.clone()),
            prefix: Some(self.prefix.clone()),
            important: Some(self.important.clone()),
            dark_mode: Some(self.dark_mode.clone()),
            core_plugins: Some(CorePlugins::List(self.core_plugins.clone())),
        }
    }
}

/// Resolves a single configuration.
pub fn resolve_config(config: &Config) -> ResolvedConfig {
    resolve(std::slice::from_ref(config))
}

/// Merges configuration layers, highest priority first.
///
/// Each layer's presets (the base preset when it declares none) and its
/// plugins' partial configs join the merge below it. Theme categories are
/// taken from the highest layer defining them; `extend` entries of all
/// layers are merged on top, lowest priority first.
pub fn resolve(configs: &[Config]) -> ResolvedConfig {
    let layers = if configs.is_empty() {
        with_plugin_configs(all_configs(&Config::default()))
    } else {
        with_plugin_configs(configs.iter().flat_map(all_configs).collect())
    };
    trace!("resolving {} configuration layers", layers.len());

    let mut theme: IndexMap<String, ThemeValue> = IndexMap::new();
    for layer in &layers {
        for (key, value) in &layer.theme {
            if !theme.contains_key(key) {
                theme.insert(key.clone(), value.clone());
            }
        }
    }

    let mut extensions: IndexMap<String, Vec<ThemeValue>> = IndexMap::new();
    for layer in layers.iter().rev() {
        for (key, value) in &layer.extend {
            extensions.entry(key.clone()).or_default().push(value.clone());
        }
    }

    for (key, pieces) in extensions {
        let base = theme.get(&key).cloned();
        theme.insert(key, merge_extensions(base, pieces));
    }

    let resolver = Resolver::new(&theme);
    let resolved: serde_json::Map<String, Value> = theme
        .keys()
        .filter_map(|key| resolver.category(key).map(|value| (key.clone(), value)))
        .collect();

    let mut plugins = Vec::new();
    for layer in layers.iter().rev() {
        plugins.extend(layer.plugins.iter().map(Plugin::without_config));
    }

    ResolvedConfig {
        theme: Value::Object(resolved),
        plugins,
        separator: layers
            .iter()
            .find_map(|c| c.separator.clone())
            .unwrap_or_else(|| ":".to_string()),
        prefix: layers
            .iter()
            .find_map(|c| c.prefix.clone())
            .unwrap_or_default(),
        important: layers
            .iter()
            .find_map(|c| c.important.clone())
            .unwrap_or_default(),
        dark_mode: layers
            .iter()
            .find_map(|c| c.dark_mode.clone())
            .unwrap_or_default(),
        core_plugins: core_plugins(&layers),
    }
}

/// A config followed by its presets, recursively. Later presets in a list
/// take priority over earlier ones.
fn all_configs(config: &Config) -> Vec<Config> {
    let mut out = vec![config.clone()];
    match &config.presets {
        Some(presets) => {
            for preset in presets.iter().rev() {
                out.extend(all_configs(preset));
            }
        }
        None => out.extend(all_configs(base_preset())),
    }
    out
}

/// Inserts each plugin's partial config right after the layer declaring
/// the plugin.
fn with_plugin_configs(configs: Vec<Config>) -> Vec<Config> {
    let mut out = Vec::with_capacity(configs.len());
    for config in configs {
        let nested: Vec<Config> = config
            .plugins
            .iter()
            .filter_map(|plugin| plugin.config().cloned())
            .collect();
        out.push(config);
        out.extend(with_plugin_configs(nested));
    }
    out
}

fn core_plugins(layers: &[Config]) -> Vec<String> {
    let mut enabled: Vec<&str> = CORE_PLUGINS.to_vec();
    for layer in layers.iter().rev() {
        match &layer.core_plugins {
            None => {}
            Some(CorePlugins::All(true)) => enabled = CORE_PLUGINS.to_vec(),
            Some(CorePlugins::All(false)) => enabled.clear(),
            Some(CorePlugins::List(names)) => {
                enabled = CORE_PLUGINS
                    .iter()
                    .copied()
                    .filter(|name| names.iter().any(|n| n == name))
                    .collect();
            }
            Some(CorePlugins::Map(toggles)) => {
                enabled = CORE_PLUGINS
                    .iter()
                    .copied()
                    .filter(|name| toggles.get(*name).copied().unwrap_or(enabled.contains(name)))
                    .collect();
            }
        }
    }
    enabled.into_iter().map(str::to_string).collect()
}

fn merge_extensions(base: Option<ThemeValue>, extensions: Vec<ThemeValue>) -> ThemeValue {
    let pieces: Vec<ThemeValue> = base.into_iter().chain(extensions).collect();
    if pieces.iter().any(ThemeValue::is_func) {
        return ThemeValue::func(move |helpers: &ThemeHelpers<'_>| {
            pieces
                .iter()
                .map(|piece| piece.evaluate(helpers))
                .fold(Value::Null, merge_values)
        });
    }
    let merged = pieces
        .into_iter()
        .map(|piece| match piece {
            ThemeValue::Value(value) => value,
            ThemeValue::Func(_) => Value::Null,
        })
        .fold(Value::Null, merge_values);
    ThemeValue::Value(merged)
}

/// Deep-merges `incoming` into `base`.
///
/// Objects merge key by key, arrays of objects concatenate, anything else
/// is replaced.
pub(crate) fn merge_values(base: Value, incoming: Value) -> Value {
    match (base, incoming) {
        (Value::Object(mut base), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match base.get_mut(&key) {
                    Some(slot) => {
                        let previous = slot.take();
                        *slot = merge_values(previous, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(incoming))
            if base.first().is_some_and(Value::is_object) =>
        {
            base.extend(incoming);
            Value::Array(base)
        }
        (base, Value::Null) => base,
        (_, incoming) => incoming,
    }
}

/// Evaluates theme categories on demand so functions can refer to other
/// categories, in any order.
struct Resolver<'a> {
    categories: &'a IndexMap<String, ThemeValue>,
    cache: RefCell<IndexMap<String, Value>>,
    active: RefCell<HashSet<String>>,
}

impl<'a> Resolver<'a> {
    fn new(categories: &'a IndexMap<String, ThemeValue>) -> Self {
        Self {
            categories,
            cache: RefCell::new(IndexMap::new()),
            active: RefCell::new(HashSet::new()),
        }
    }

    fn category(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.cache.borrow().get(name) {
            return Some(value.clone());
        }
        let entry = self.categories.get(name)?;
        if !self.active.borrow_mut().insert(name.to_string()) {
            warn!("theme category `{name}` refers to itself");
            return None;
        }

        let lookup = |path: &str| self.lookup(path);
        let value = entry.evaluate(&ThemeHelpers::new(&lookup));

        self.active.borrow_mut().remove(name);
        self.cache.borrow_mut().insert(name.to_string(), value.clone());
        Some(value)
    }

    fn lookup(&self, path: &str) -> Option<Value> {
        let segments = parse_path(path)?;
        let (first, rest) = segments.split_first()?;
        let category = self.category(first)?;
        walk(&category, rest).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bare() -> Config {
        Config::new().no_presets()
    }

    #[test]
    fn first_writer_wins_for_theme_categories() {
        let config = bare()
            .theme("colors", json!({ "a": "1" }))
            .preset(bare().theme("colors", json!({ "b": "2" })).theme("spacing", json!({})));
        let resolved = resolve_config(&config);
        assert_eq!(resolved.theme, json!({ "colors": { "a": "1" }, "spacing": {} }));
    }

    #[test]
    fn extensions_merge_lowest_priority_first() {
        let config = bare()
            .extend("colors", json!({ "a": "user" }))
            .preset(
                bare()
                    .theme("colors", json!({ "a": "base", "b": "base" }))
                    .extend("colors", json!({ "a": "preset", "c": "preset" })),
            );
        let resolved = resolve_config(&config);
        assert_eq!(
            resolved.theme["colors"],
            json!({ "a": "user", "b": "base", "c": "preset" })
        );
    }

    #[test]
    fn arrays_of_objects_concatenate_and_plain_arrays_replace() {
        assert_eq!(
            merge_values(json!([{ "a": 1 }]), json!([{ "b": 2 }])),
            json!([{ "a": 1 }, { "b": 2 }])
        );
        assert_eq!(merge_values(json!(["a"]), json!(["b"])), json!(["b"]));
    }

    #[test]
    fn functions_see_the_merged_theme() {
        let config = bare()
            .theme("spacing", json!({ "1": "0.25rem" }))
            .theme_fn("width", |h| merge_values(json!({ "full": "100%" }), h.theme("spacing")))
            .extend("spacing", json!({ "2": "0.5rem" }))
            .extend_fn("width", |h| json!({ "gap": h.theme("gap.1") }))
            .theme_fn("gap", |h| h.theme("spacing"));
        let resolved = resolve_config(&config);
        assert_eq!(
            resolved.theme["width"],
            json!({ "full": "100%", "1": "0.25rem", "2": "0.5rem", "gap": "0.25rem" })
        );
    }

    #[test]
    fn self_reference_does_not_loop() {
        let config = bare().theme_fn("a", |h| h.theme_or("a", json!("fallback")));
        assert_eq!(resolve_config(&config).theme["a"], json!("fallback"));
    }

    #[test]
    fn plugin_configs_sit_below_their_layer() {
        let plugin = Plugin::new("brand", |_| {})
            .with_config(bare().theme("colors", json!({ "brand": "#123" })).prefix("p-"));
        let config = bare().plugin(plugin).prefix("u-");
        let resolved = resolve_config(&config);
        assert_eq!(resolved.theme["colors"], json!({ "brand": "#123" }));
        assert_eq!(resolved.prefix, "u-");
        assert!(resolved.plugins[0].config().is_none());
    }

    #[test]
    fn core_plugin_layers() {
        let only = bare().core_plugins(CorePlugins::List(vec!["margin".into(), "nope".into()]));
        assert_eq!(resolve_config(&only).core_plugins, ["margin"]);

        let toggled = bare()
            .core_plugins(CorePlugins::Map(IndexMap::from([("padding".to_string(), true)])))
            .preset(bare().core_plugins(CorePlugins::All(false)));
        assert_eq!(resolve_config(&toggled).core_plugins, ["padding"]);

        assert_eq!(resolve_config(&bare()).core_plugins.len(), CORE_PLUGINS.len());
    }

    #[test]
    fn resolving_twice_is_stable() {
        let resolved = resolve_config(&Config::new().extend("colors", json!({ "x": "#fff" })));
        assert_eq!(resolve_config(&resolved.to_config()), resolved);
        assert_eq!(resolve(&[]), ResolvedConfig::default());
        assert_eq!(resolved.separator, ":");
        assert_eq!(resolved.theme["colors"]["x"], json!("#fff"));
    }
}
