//! The compilation context.
//!
//! A [`Context`] is built once from a [`ResolvedConfig`]: the enabled core
//! plugins run first, then the configured plugins, each registering into
//! the same builder. The frozen registry is then shared by every call to
//! [`Context::css`].
//!
//! ```
//! use twcss::config::{Config, resolve_config};
//! use twcss::context::create_context;
//! use twcss::style_tree;
//!
//! let ctx = create_context(&resolve_config(&Config::new())).unwrap();
//! assert_eq!(ctx.css("flex").unwrap(), style_tree! { "display" => "flex" });
//! ```

mod plugin;
mod registry;
mod spec;

pub use plugin::{IntoTemplates, MatchOptions, Plugin, PluginApi, VariantOptions};
pub use registry::{PrefixTable, Registry};
pub use spec::{
    LookupUtility, LookupVariant, PostTransform, RenderUtility, RenderVariant, SpecFlags,
    StaticUtility, StaticVariant, UtilityArgs, UtilitySpec, VariantArgs, VariantSpec,
};

use twparse::Separator;

use crate::config::{Important, ResolvedConfig};
use crate::error::{Diagnostic, Result, TwError};
use crate::eval::{Evaluated, Evaluator, Wrapper, with_separator};
use crate::plugins::{self, CORE_PLUGINS};
use crate::style::StyleTree;
use crate::theme::Theme;

use registry::RegistryBuilder;

/// Options for [`Context::with_options`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Fail on duplicate static registrations and return diagnostics from
    /// compilation instead of dropping them.
    pub throw_error: bool,
}

/// A utility found by [`Context::resolve_utility`].
#[derive(Debug)]
pub struct UtilityMatch<'c> {
    /// The prefix key the classname resolved under.
    pub key: &'c str,
    pub spec: &'c UtilitySpec,
    /// The rendered declarations, before variants and `!important`.
    pub tree: StyleTree,
}

/// A variant found by [`Context::resolve_variant`].
#[derive(Debug)]
pub struct VariantMatch<'c> {
    /// The prefix key, empty for arbitrary selectors.
    pub key: &'c str,
    /// `None` for arbitrary selectors such as `[&>*]`.
    pub spec: Option<&'c VariantSpec>,
    pub wrapper: Wrapper,
}

/// A frozen registry together with the configuration it was built from.
#[derive(Debug)]
pub struct Context {
    pub(crate) config: ResolvedConfig,
    pub(crate) theme: Theme,
    pub(crate) separator: Separator,
    pub(crate) registry: Registry,
    global: StyleTree,
    throw_error: bool,
}

/// Builds a context with default options.
pub fn create_context(config: &ResolvedConfig) -> Result<Context> {
    Context::with_options(config, ContextOptions::default())
}

impl Context {
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        create_context(config)
    }

    pub fn with_options(config: &ResolvedConfig, options: ContextOptions) -> Result<Self> {
        let separator = Separator::new(&config.separator)?;
        let theme = config.theme();
        let mut builder = RegistryBuilder::new(options.throw_error);

        for name in CORE_PLUGINS
            .iter()
            .copied()
            .filter(|name| config.core_plugin_enabled(name))
        {
            let mut api = PluginApi::new(&mut builder, config, &theme, name);
            plugins::register(name, &mut api);
            api.finish()?;
        }
        for plugin in &config.plugins {
            log::trace!("running plugin `{}`", plugin.name());
            let mut api = PluginApi::new(&mut builder, config, &theme, plugin.name());
            plugin.run(&mut api);
            api.finish()?;
        }

        let mut ctx = Context {
            config: config.clone(),
            theme,
            separator,
            registry: builder.finish(),
            global: StyleTree::new(),
            throw_error: options.throw_error,
        };
        let base = ctx.registry.base.clone();
        let global = Evaluator::new(&ctx).expand(base);
        ctx.global = global;
        Ok(ctx)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn throw_error(&self) -> bool {
        self.throw_error
    }

    /// Switches between dropping unresolved input silently and reporting
    /// it as [`TwError::Compile`].
    pub fn set_throw_error(&mut self, throw_error: bool) {
        self.throw_error = throw_error;
    }

    /// Compiles a utility string into one camelCased style tree.
    ///
    /// With `important` configured as a selector, declarations marked `!`
    /// are nested under `"<selector> &"`.
    pub fn css(&self, input: &str) -> Result<StyleTree> {
        let Evaluated {
            mut tree,
            important,
        } = self.evaluate(input)?;
        if let Important::Selector(selector) = &self.config.important {
            if !important.is_empty() {
                tree.merge(StyleTree::nest(format!("{selector} &"), important));
            }
        }
        Ok(tree.camelize())
    }

    /// Compiles a utility string, keeping the important-selector tree apart
    /// and property names as written.
    pub fn evaluate(&self, input: &str) -> Result<Evaluated> {
        let mut evaluator = Evaluator::new(self);
        let evaluated = evaluator.run(input);
        self.check(input, evaluator.diagnostics)?;
        Ok(evaluated)
    }

    /// Composes a run of variants such as `hover:focus:` (the trailing
    /// separator is optional) into a reusable wrapper.
    pub fn wrap(&self, input: &str) -> Result<Wrapper> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Wrapper::identity());
        }
        let input = with_separator(input, self.config.separator.as_str());
        let mut evaluator = Evaluator::new(self);
        let wrapper = evaluator.run_variants(&input);
        self.check(&input, evaluator.diagnostics)?;
        Ok(wrapper)
    }

    /// Renders every `theme()` call in `text`.
    pub fn render_theme_func(&self, text: &str) -> String {
        self.theme.render_function_calls(text)
    }

    /// Resolves a theme path such as `colors.red.500 / 50%` to CSS text,
    /// or an empty string.
    pub fn render_theme(&self, path: &str) -> String {
        self.theme.resolve(path).unwrap_or_default()
    }

    /// Looks up a single classname, returning the spec it resolved to.
    pub fn resolve_utility(&self, input: &str) -> Option<UtilityMatch<'_>> {
        let resolved = Evaluator::new(self).resolve_utility_input(input)?;
        Some(UtilityMatch {
            key: resolved.key,
            spec: resolved.spec,
            tree: resolved.tree,
        })
    }

    /// Looks up a single variant, returning the spec it resolved to.
    pub fn resolve_variant(&self, input: &str) -> Option<VariantMatch<'_>> {
        let resolved = Evaluator::new(self).resolve_variant_input(input)?;
        Some(VariantMatch {
            key: resolved.key,
            spec: resolved.spec,
            wrapper: resolved.wrapper,
        })
    }

    /// Every utility prefix, in registration order.
    pub fn get_utilities(&self) -> Vec<&str> {
        self.registry.utilities.keys().collect()
    }

    /// Every variant prefix, in registration order.
    pub fn get_variants(&self) -> Vec<&str> {
        self.registry.variants.keys().collect()
    }

    /// Utility prefixes that render colors and take opacity modifiers.
    pub fn get_color_utilities(&self) -> Vec<&str> {
        self.registry
            .utilities
            .iter()
            .filter(|(_, specs)| specs.iter().any(|s| s.flags().contains(SpecFlags::COLOR)))
            .map(|(key, _)| key)
            .collect()
    }

    /// Utility prefixes holding more than one lookup spec, whose values
    /// are told apart by kind.
    pub fn get_ambiguous(&self) -> Vec<&str> {
        self.registry
            .utilities
            .iter()
            .filter(|(_, specs)| specs.iter().filter(|s| s.is_lookup()).count() > 1)
            .map(|(key, _)| key)
            .collect()
    }

    /// Styles registered through `add_base` and `add_defaults`, with
    /// directives expanded.
    pub fn global_styles(&self) -> &StyleTree {
        &self.global
    }

    fn check(&self, input: &str, diagnostics: Vec<Diagnostic>) -> Result<()> {
        if self.throw_error && !diagnostics.is_empty() {
            return Err(TwError::Compile {
                input: input.to_string(),
                diagnostics,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CorePlugins, resolve_config};
    use crate::style_tree;
    use pretty_assertions::assert_eq;

    fn bare(plugin: Plugin) -> Context {
        let config = Config::new()
            .core_plugins(CorePlugins::All(false))
            .plugin(plugin);
        create_context(&resolve_config(&config)).unwrap()
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn user_plugins_run_after_core_plugins() {
        let ctx = bare(Plugin::new("btn", |api| {
            api.add_components(style_tree! {
                ".btn" => style_tree! { "@apply" => "block" },
            });
            api.add_utilities(style_tree! {
                ".block" => style_tree! { "display" => "block" },
            });
        }));
        assert_eq!(ctx.get_utilities(), ["btn", "block"]);
        assert_eq!(ctx.css("btn").unwrap(), style_tree! { "display" => "block" });
    }

    #[test]
    fn base_styles_expand_directives_at_build() {
        let ctx = bare(Plugin::new("base", |api| {
            api.add_utilities(style_tree! { ".hidden" => style_tree! { "display" => "none" } });
            api.add_base(style_tree! { "h1" => style_tree! { "@apply" => "hidden" } });
        }));
        assert_eq!(
            ctx.global_styles(),
            &style_tree! { "h1" => style_tree! { "display" => "none" } }
        );
    }

    #[test]
    fn strict_mode_reports_unknown_input() {
        let mut ctx = bare(Plugin::new("none", |_| {}));
        assert_eq!(ctx.css("nope").unwrap(), StyleTree::new());
        ctx.set_throw_error(true);
        let Err(TwError::Compile { diagnostics, .. }) = ctx.css("nope") else {
            panic!("expected a compile error");
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].text, "nope");
    }
}
