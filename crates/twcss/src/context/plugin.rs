//! Plugins and the API they register through.
//!
//! A [`Plugin`] is a named handler that receives a [`PluginApi`] once, while
//! the context is being built:
//!
//! ```
//! use twcss::context::{MatchOptions, Plugin};
//! use twcss::style_tree;
//! use twcss::types::ValueKind;
//!
//! let plugin = Plugin::new("tab-size", |api| {
//!     api.add_utilities(style_tree! { ".tab-4" => style_tree! { "tab-size" => "4" } });
//!     api.match_utility(
//!         "tab",
//!         MatchOptions::new().kinds([ValueKind::Number]),
//!         |value, _| style_tree! { "tab-size" => value },
//!     );
//! });
//! assert_eq!(plugin.name(), "tab-size");
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::registry::{Registry, RegistryBuilder, TableKind, find_classes};
use super::spec::{
    LookupUtility, LookupVariant, PostTransform, RenderUtility, RenderVariant, SpecFlags,
    StaticUtility, StaticVariant, UtilityArgs, UtilitySpec, VariantArgs, VariantSpec,
};
use crate::config::{Config, ResolvedConfig};
use crate::error::{Result, TwError};
use crate::style::{StyleTree, StyleValue, is_at_rule};
use crate::theme::{Theme, ValueTable};
use crate::types::ValueKind;

type Handler = Arc<dyn Fn(&mut PluginApi<'_>) + Send + Sync>;

/// A named registration callback, optionally shipping a partial config.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    handler: Handler,
    config: Option<Box<Config>>,
}

impl Plugin {
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&mut PluginApi<'_>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
            config: None,
        }
    }

    /// Attaches a partial config that is merged below the layer declaring
    /// this plugin.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(Box::new(config));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_deref()
    }

    /// The same plugin with its partial config dropped, once the config has
    /// been merged.
    pub fn without_config(&self) -> Plugin {
        Plugin {
            name: self.name.clone(),
            handler: Arc::clone(&self.handler),
            config: None,
        }
    }

    pub(crate) fn run(&self, api: &mut PluginApi<'_>) {
        (self.handler)(api)
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("config", &self.config.is_some())
            .finish()
    }
}

/// Options for `match_utility` and `match_component`.
#[derive(Clone, Default)]
pub struct MatchOptions {
    pub values: ValueTable,
    /// Kinds accepted for arbitrary values. Empty means `any`.
    pub kinds: Vec<ValueKind>,
    pub flags: SpecFlags,
    pub post: Option<Arc<dyn PostTransform>>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(mut self, values: ValueTable) -> Self {
        self.values = values;
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn negative(mut self) -> Self {
        self.flags |= SpecFlags::NEGATIVE;
        self
    }

    pub fn filter_default(mut self) -> Self {
        self.flags |= SpecFlags::FILTER_DEFAULT;
        self
    }

    pub fn ignore_prefix(mut self) -> Self {
        self.flags.remove(SpecFlags::RESPECT_PREFIX);
        self
    }

    pub fn ignore_important(mut self) -> Self {
        self.flags.remove(SpecFlags::RESPECT_IMPORTANT);
        self
    }

    pub fn post(mut self, post: impl Fn(StyleTree) -> StyleTree + Send + Sync + 'static) -> Self {
        self.post = Some(Arc::new(post));
        self
    }
}

/// Options for `add_variant` and `match_variant`.
#[derive(Clone, Default)]
pub struct VariantOptions {
    /// Named values of a lookup variant.
    pub values: ValueTable,
    pub post: Option<Arc<dyn PostTransform>>,
}

impl VariantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(mut self, values: ValueTable) -> Self {
        self.values = values;
        self
    }

    pub fn post(mut self, post: impl Fn(StyleTree) -> StyleTree + Send + Sync + 'static) -> Self {
        self.post = Some(Arc::new(post));
        self
    }
}

/// One or more selector templates for `add_variant`.
pub trait IntoTemplates {
    fn into_templates(self) -> Vec<String>;
}

impl IntoTemplates for &str {
    fn into_templates(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoTemplates for String {
    fn into_templates(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoTemplates for Vec<String> {
    fn into_templates(self) -> Vec<String> {
        self
    }
}

impl IntoTemplates for &[&str] {
    fn into_templates(self) -> Vec<String> {
        self.iter().map(|t| t.to_string()).collect()
    }
}

impl<const N: usize> IntoTemplates for [&str; N] {
    fn into_templates(self) -> Vec<String> {
        self.iter().map(|t| t.to_string()).collect()
    }
}

/// The registration API handed to plugins.
pub struct PluginApi<'a> {
    builder: &'a mut RegistryBuilder,
    config: &'a ResolvedConfig,
    theme: &'a Theme,
    plugin: String,
    error: Option<TwError>,
}

impl<'a> PluginApi<'a> {
    pub(crate) fn new(
        builder: &'a mut RegistryBuilder,
        config: &'a ResolvedConfig,
        theme: &'a Theme,
        plugin: &str,
    ) -> Self {
        Self {
            builder,
            config,
            theme,
            plugin: plugin.to_string(),
            error: None,
        }
    }

    /// The first registration error raised while the plugin ran.
    pub(crate) fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.config
    }

    /// Resolves a theme path to CSS text, with `/opacity` support.
    pub fn theme(&self, path: &str) -> Option<String> {
        self.theme.resolve(path)
    }

    /// The raw theme value at `path`.
    pub fn theme_value(&self, path: &str) -> Option<&Value> {
        self.theme.get(path)
    }

    /// A flattened theme category, ready to use as lookup values.
    pub fn theme_table(&self, category: &str) -> ValueTable {
        self.theme.table(category)
    }

    /// Prepends the configured prefix to a class name.
    pub fn prefix(&self, class: &str) -> String {
        format!("{}{class}", self.config.prefix)
    }

    /// Merges `tree` into the global styles.
    ///
    /// `@apply` and `@screen` directives are expanded once every plugin has
    /// registered.
    pub fn add_base(&mut self, tree: StyleTree) {
        self.builder.merge_base(tree);
    }

    /// Declares custom property defaults for every element and for the
    /// backdrop.
    pub fn add_defaults(&mut self, name: &str, props: StyleTree) {
        log::trace!("defaults `{name}` from plugin `{}`", self.plugin);
        let mut tree = StyleTree::new();
        tree.insert("*, ::before, ::after", props.clone());
        tree.insert("::backdrop", props);
        self.builder.merge_base(tree);
    }

    /// Registers every class found in the selectors of `tree`.
    pub fn add_utilities(&mut self, tree: StyleTree) {
        self.add_static(tree, SpecFlags::default());
    }

    /// Like [`add_utilities`](Self::add_utilities), but unaffected by the
    /// `important` option.
    pub fn add_components(&mut self, tree: StyleTree) {
        self.add_static(tree, SpecFlags::RESPECT_PREFIX);
    }

    /// Registers a lookup utility under `name`.
    pub fn match_utility(
        &mut self,
        name: &str,
        opts: MatchOptions,
        render: impl Fn(&str, &UtilityArgs<'_>) -> StyleTree + Send + Sync + 'static,
    ) {
        self.add_lookup(name, opts, Arc::new(render));
    }

    /// Registers several lookup utilities sharing one set of options.
    pub fn match_utilities<F>(
        &mut self,
        utilities: impl IntoIterator<Item = (&'static str, F)>,
        opts: MatchOptions,
    ) where
        F: Fn(&str, &UtilityArgs<'_>) -> StyleTree + Send + Sync + 'static,
    {
        for (name, render) in utilities {
            self.add_lookup(name, opts.clone(), Arc::new(render));
        }
    }

    /// Like [`match_utility`](Self::match_utility), but unaffected by the
    /// `important` option.
    pub fn match_component(
        &mut self,
        name: &str,
        opts: MatchOptions,
        render: impl Fn(&str, &UtilityArgs<'_>) -> StyleTree + Send + Sync + 'static,
    ) {
        self.add_lookup(name, opts.ignore_important(), Arc::new(render));
    }

    /// Registers a static variant from one or more selector templates.
    ///
    /// A template is a selector containing `&` or an at-rule, and may open
    /// further nesting levels with `{ ... }`:
    /// `"@media (hover: hover) { &:hover }"`.
    pub fn add_variant(&mut self, name: &str, templates: impl IntoTemplates) {
        self.add_variant_with(name, templates, VariantOptions::default());
    }

    pub fn add_variant_with(
        &mut self,
        name: &str,
        templates: impl IntoTemplates,
        opts: VariantOptions,
    ) {
        if let Err(err) = self.builder.claim(TableKind::Variants, name.to_string()) {
            self.fail(err);
            return;
        }
        let spec = VariantSpec::Static(StaticVariant {
            plugin: self.plugin.clone(),
            templates: templates.into_templates(),
            post: opts.post,
        });
        self.builder.push_variant(name.to_string(), spec);
    }

    /// Registers a lookup variant. `render` turns a table or arbitrary value
    /// into a selector template, or rejects it with `None`.
    pub fn match_variant(
        &mut self,
        name: &str,
        opts: VariantOptions,
        render: impl Fn(&str, &VariantArgs<'_>) -> Option<String> + Send + Sync + 'static,
    ) {
        let render: Arc<dyn RenderVariant> = Arc::new(render);
        let spec = VariantSpec::Lookup(LookupVariant {
            plugin: self.plugin.clone(),
            values: opts.values,
            render,
            post: opts.post,
        });
        self.builder.push_variant(name.to_string(), spec);
    }

    fn add_lookup(&mut self, name: &str, opts: MatchOptions, render: Arc<dyn RenderUtility>) {
        let mut flags = opts.flags;
        if opts.kinds.contains(&ValueKind::Color) {
            flags |= SpecFlags::COLOR;
        }
        let kinds = if opts.kinds.is_empty() {
            vec![ValueKind::Any]
        } else {
            opts.kinds
        };
        let spec = UtilitySpec::Lookup(LookupUtility {
            plugin: self.plugin.clone(),
            values: opts.values,
            kinds,
            flags,
            render,
            post: opts.post,
        });
        self.builder.push_utility(name.to_string(), spec);
    }

    fn add_static(&mut self, tree: StyleTree, flags: SpecFlags) {
        let mut found: Vec<(String, String, StyleTree)> = Vec::new();
        collect_classes(&tree, &[], &mut |class, context, body| {
            let key = std::iter::once(class)
                .chain(context.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            let nested = context
                .iter()
                .rev()
                .fold(body, |inner, level| StyleTree::nest(level.clone(), inner));
            found.push((class.to_string(), key, nested));
        });

        let mut grouped: IndexMap<String, StyleTree> = IndexMap::new();
        for (class, key, nested) in found {
            if let Err(err) = self.builder.claim(TableKind::Utilities, key) {
                self.fail(err);
                return;
            }
            grouped.entry(class).or_default().merge(nested);
        }

        for (class, tree) in grouped {
            let spec = UtilitySpec::Static(StaticUtility {
                plugin: self.plugin.clone(),
                tree,
                flags,
            });
            self.builder.push_utility(class, spec);
        }
    }

    fn fail(&mut self, err: TwError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Walks a utilities tree, calling `f(class, context, body)` for every
/// class found in a selector key. `context` lists the enclosing at-rules
/// and class-less selectors, followed by the class's selector rewritten
/// around `&`.
fn collect_classes(
    tree: &StyleTree,
    outer: &[String],
    f: &mut impl FnMut(&str, &[String], StyleTree),
) {
    for (key, value) in tree {
        let StyleValue::Tree(body) = value else {
            log::debug!("ignoring top-level declaration `{key}` in utilities");
            continue;
        };
        if is_at_rule(key) {
            let mut nested = outer.to_vec();
            nested.push(key.clone());
            collect_classes(body, &nested, f);
            continue;
        }
        let classes = find_classes(key);
        if classes.is_empty() {
            let mut nested = outer.to_vec();
            nested.push(ancestor_selector(key));
            collect_classes(body, &nested, f);
            continue;
        }
        for class in classes {
            let mut context = outer.to_vec();
            context.extend(class.rest);
            f(&class.name, &context, body.clone());
        }
    }
}

/// `[dir=rtl]` becomes `[dir=rtl] &`; selectors already placing `&` are
/// kept.
fn ancestor_selector(selector: &str) -> String {
    if selector.contains('&') {
        return selector.to_string();
    }
    crate::types::split_top_level(selector, ',')
        .into_iter()
        .map(|part| format!("{} &", part.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_tree;

    fn build(strict: bool, run: impl Fn(&mut PluginApi<'_>)) -> Result<Registry> {
        let config = ResolvedConfig::default();
        let theme = config.theme();
        let mut builder = RegistryBuilder::new(strict);
        let mut api = PluginApi::new(&mut builder, &config, &theme, "test");
        run(&mut api);
        api.finish()?;
        Ok(builder.finish())
    }

    #[test]
    fn add_utilities_registers_each_class_with_its_context() {
        let registry = build(false, |api| {
            api.add_utilities(style_tree! {
                ".btn" => style_tree! { "padding" => "1rem" },
                ".btn:hover" => style_tree! { "color" => "red" },
                "@media (min-width: 640px)" => style_tree! {
                    ".btn, .card" => style_tree! { "padding" => "2rem" },
                },
            });
        })
        .unwrap();

        let btn = registry.utilities().get("btn").unwrap();
        assert_eq!(btn.len(), 1);
        let UtilitySpec::Static(spec) = &btn[0] else {
            panic!("expected a static spec");
        };
        assert_eq!(
            spec.tree,
            style_tree! {
                "padding" => "1rem",
                "&:hover" => style_tree! { "color" => "red" },
                "@media (min-width: 640px)" => style_tree! { "padding" => "2rem" },
            }
        );
        assert!(registry.utilities().contains_key("card"));
    }

    #[test]
    fn classes_under_plain_selectors_keep_them_as_ancestors() {
        let registry = build(false, |api| {
            api.add_utilities(style_tree! {
                "[dir=rtl]" => style_tree! {
                    ".ms-x" => style_tree! { "margin-right" => "1px" },
                },
                "@media print" => style_tree! {
                    "html, body" => style_tree! {
                        ".ms-x:hover" => style_tree! { "margin-right" => "2px" },
                    },
                },
            });
        })
        .unwrap();

        let specs = registry.utilities().get("ms-x").unwrap();
        assert_eq!(specs.len(), 1);
        let UtilitySpec::Static(spec) = &specs[0] else {
            panic!("expected a static spec");
        };
        assert_eq!(
            spec.tree,
            style_tree! {
                "[dir=rtl] &" => style_tree! { "margin-right" => "1px" },
                "@media print" => style_tree! {
                    "html &, body &" => style_tree! {
                        "&:hover" => style_tree! { "margin-right" => "2px" },
                    },
                },
            }
        );
    }

    #[test]
    fn strict_mode_rejects_duplicate_static_keys() {
        let result = build(true, |api| {
            api.add_utilities(style_tree! { ".a" => style_tree! { "color" => "red" } });
            api.add_utilities(style_tree! { ".a" => style_tree! { "color" => "blue" } });
        });
        assert!(matches!(result, Err(TwError::DuplicateRegistration { .. })));
    }

    #[test]
    fn lookup_duplicates_accumulate() {
        let registry = build(true, |api| {
            for _ in 0..2 {
                api.match_utility("tab", MatchOptions::new(), |value, _| {
                    style_tree! { "tab-size" => value }
                });
            }
        })
        .unwrap();
        assert_eq!(registry.utilities().get("tab").unwrap().len(), 2);
    }

    #[test]
    fn color_kinds_set_the_color_flag() {
        let registry = build(false, |api| {
            api.match_utility(
                "fill",
                MatchOptions::new().kinds([ValueKind::Color, ValueKind::Any]),
                |value, _| style_tree! { "fill" => value },
            );
        })
        .unwrap();
        let spec = &registry.utilities().get("fill").unwrap()[0];
        assert!(spec.flags().contains(SpecFlags::COLOR));
    }

    #[test]
    fn defaults_target_elements_and_backdrop() {
        let registry = build(false, |api| {
            api.add_defaults("rotate", style_tree! { "--tw-rotate" => "0" });
        })
        .unwrap();
        assert_eq!(
            registry.base.keys().collect::<Vec<_>>(),
            ["*, ::before, ::after", "::backdrop"]
        );
    }
}
