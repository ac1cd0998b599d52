//! Prefix resolution and candidate rendering.
//!
//! A classname is read against the prefix table in a fixed order:
//!
//! 1. the whole name (`-mt-4/50`)
//! 2. without a leading `-`, as a negative value
//! 3. without the `/modifier`
//! 4. without both
//! 5. backing off at each `-` from the right, keeping the tail as the
//!    value (`bg-red-500` tries `bg-red` with `500`, then `bg` with
//!    `red-500`); only prefixes holding a lookup spec count here
//!
//! The first reading that yields at least one rendered candidate decides.

use crate::context::{LookupUtility, PrefixTable, SpecFlags, UtilityArgs, UtilitySpec};
use crate::error::DiagnosticKind;
use crate::style::StyleTree;
use crate::types::kinds::split_tag;
use crate::types::units::{dimension_class, is_math_function, is_reference};
use crate::types::{ConfigOptions, ValueKind, ValueOptions};

use super::Evaluator;

/// A `/modifier` as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ModifierText<'t> {
    pub text: &'t str,
    /// Written as `/[text]`.
    pub wrapped: bool,
}

impl ModifierText<'_> {
    /// Length of the modifier including its slash and brackets.
    fn suffix_len(&self) -> usize {
        self.text.len() + if self.wrapped { 3 } else { 1 }
    }
}

/// One reading of a name against a prefix table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PrefixMatch<'t> {
    pub key: &'t str,
    /// The value including any `/modifier`.
    pub full_value: Option<&'t str>,
    /// The value with the modifier split off.
    pub value: Option<&'t str>,
    pub negative: bool,
    pub modifier: Option<ModifierText<'t>>,
}

impl<'t> PrefixMatch<'t> {
    fn exact(key: &'t str, negative: bool, modifier: Option<ModifierText<'t>>) -> Self {
        Self {
            key,
            full_value: None,
            value: None,
            negative,
            modifier,
        }
    }
}

/// Lists the readings of `name` that hit an entry of `table`, in the order
/// they are tried.
pub(crate) fn prefix_matches<'t, S>(
    table: &PrefixTable<S>,
    name: &'t str,
    modifier: Option<ModifierText<'t>>,
    is_lookup: fn(&S) -> bool,
) -> Vec<PrefixMatch<'t>> {
    let mut matches = Vec::new();
    let mut push = |m: PrefixMatch<'t>| {
        if table.contains_key(m.key) && !matches.contains(&m) {
            log::trace!("prefix candidate `{}` for `{name}`", m.key);
            matches.push(m);
        }
    };

    let positive = name.strip_prefix('-');
    let stripped = modifier
        .filter(|m| m.suffix_len() < name.len())
        .map(|m| &name[..name.len() - m.suffix_len()]);

    push(PrefixMatch::exact(name, false, None));
    if let Some(positive) = positive {
        push(PrefixMatch::exact(positive, true, None));
    }
    if let Some(stripped) = stripped {
        push(PrefixMatch::exact(stripped, false, modifier));
        if let Some(positive) = stripped.strip_prefix('-') {
            push(PrefixMatch::exact(positive, true, modifier));
        }
    }

    let negative = positive.is_some();
    let full = positive.unwrap_or(name);
    let core = stripped
        .map(|s| s.strip_prefix('-').unwrap_or(s))
        .unwrap_or(full);
    for (dash, _) in core.rmatch_indices('-') {
        let key = &core[..dash];
        let value = &core[dash + 1..];
        if key.is_empty() || value.is_empty() {
            continue;
        }
        let has_lookup = table
            .get(key)
            .is_some_and(|specs| specs.iter().any(is_lookup));
        if !has_lookup {
            continue;
        }
        push(PrefixMatch {
            key,
            full_value: Some(&full[dash + 1..]),
            value: Some(value),
            negative,
            modifier: if stripped.is_some() { modifier } else { None },
        });
    }
    matches
}

/// A rendered candidate for one classname.
pub(crate) struct Candidate<'c> {
    pub spec: &'c UtilitySpec,
    pub tree: StyleTree,
    /// Accepted through a concrete kind rather than `any`.
    pub strong: bool,
}

/// The winning candidate of a classname.
pub(crate) struct Resolved<'c> {
    pub key: &'c str,
    pub spec: &'c UtilitySpec,
    pub tree: StyleTree,
}

/// Keeps the strong candidates when there are any and insists on exactly
/// one.
pub(crate) fn choose<'c>(
    key: &'c str,
    mut candidates: Vec<Candidate<'c>>,
) -> Option<Result<Resolved<'c>, DiagnosticKind>> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.iter().any(|c| c.strong) {
        candidates.retain(|c| c.strong);
    }
    if candidates.len() > 1 {
        log::warn!(
            "`{key}` matches {} utilities ({}), skipping it",
            candidates.len(),
            candidates
                .iter()
                .map(|c| c.spec.plugin())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Some(Err(DiagnosticKind::AmbiguousMatch));
    }
    let candidate = candidates.pop()?;
    Some(Ok(Resolved {
        key,
        spec: candidate.spec,
        tree: candidate.tree,
    }))
}

/// Table values can only be negated when they are numeric or computed.
fn can_negate(value: &str) -> bool {
    dimension_class(value).is_some() || is_math_function(value) || is_reference(value)
}

/// The kind table values of a lookup utility are formatted as.
fn config_kind(spec: &LookupUtility) -> ValueKind {
    if spec.flags.contains(SpecFlags::COLOR) {
        return ValueKind::Color;
    }
    spec.kinds
        .iter()
        .copied()
        .find(|kind| *kind != ValueKind::Any)
        .unwrap_or(ValueKind::Any)
}

impl<'c> Evaluator<'c> {
    /// Resolves a plain classname.
    pub(crate) fn resolve_classname(
        &self,
        name: &str,
        modifier: Option<ModifierText<'_>>,
    ) -> Result<Resolved<'c>, DiagnosticKind> {
        let (name, prefixed) = self.strip_config_prefix(name);
        let table = &self.ctx.registry.utilities;

        for m in prefix_matches(table, &name, modifier, UtilitySpec::is_lookup) {
            let Some((key, specs)) = table.get_key_value(m.key) else {
                continue;
            };
            let candidates = self.table_candidates(specs, &m, prefixed);
            if let Some(result) = choose(key, candidates) {
                return result;
            }
        }
        Err(DiagnosticKind::UtilityNotFound)
    }

    /// Resolves `prefix-[value]`. `value` is already normalized.
    pub(crate) fn resolve_arbitrary(
        &self,
        prefix: &str,
        value: &str,
        modifier: Option<ModifierText<'_>>,
    ) -> Result<Resolved<'c>, DiagnosticKind> {
        let (prefix, prefixed) = self.strip_config_prefix(prefix);
        let table = &self.ctx.registry.utilities;

        let mut readings = vec![(prefix.as_str(), false)];
        if let Some(positive) = prefix.strip_prefix('-') {
            readings.push((positive, true));
        }
        for (key, negative) in readings {
            let Some((key, specs)) = table.get_key_value(key) else {
                continue;
            };
            let candidates = specs
                .iter()
                .filter(|spec| self.prefix_allows(spec.flags(), prefixed))
                .filter_map(|spec| match spec {
                    UtilitySpec::Lookup(lookup) => self
                        .render_arbitrary(lookup, value, negative, modifier)
                        .map(|(tree, strong)| Candidate { spec, tree, strong }),
                    UtilitySpec::Static(_) => None,
                })
                .collect();
            if let Some(result) = choose(key, candidates) {
                return result;
            }
        }
        Err(DiagnosticKind::UtilityNotFound)
    }

    /// Splits the configured prefix off a name, after any leading `-`.
    fn strip_config_prefix(&self, name: &str) -> (String, bool) {
        let prefix = self.ctx.config.prefix.as_str();
        if prefix.is_empty() {
            return (name.to_string(), false);
        }
        let (sign, body) = match name.strip_prefix('-') {
            Some(body) => ("-", body),
            None => ("", name),
        };
        match body.strip_prefix(prefix) {
            Some(rest) => (format!("{sign}{rest}"), true),
            None => (name.to_string(), false),
        }
    }

    fn prefix_allows(&self, flags: SpecFlags, prefixed: bool) -> bool {
        self.ctx.config.prefix.is_empty() || flags.contains(SpecFlags::RESPECT_PREFIX) == prefixed
    }

    fn table_candidates(
        &self,
        specs: &'c [UtilitySpec],
        m: &PrefixMatch<'_>,
        prefixed: bool,
    ) -> Vec<Candidate<'c>> {
        let mut candidates = Vec::new();
        let mut statics: Option<Candidate<'c>> = None;

        for spec in specs {
            if !self.prefix_allows(spec.flags(), prefixed) {
                continue;
            }
            match spec {
                UtilitySpec::Static(fixed) => {
                    if m.value.is_some() || m.negative || m.modifier.is_some() {
                        continue;
                    }
                    match &mut statics {
                        Some(candidate) => candidate.tree.merge(fixed.tree.clone()),
                        None => {
                            statics = Some(Candidate {
                                spec,
                                tree: fixed.tree.clone(),
                                strong: true,
                            })
                        }
                    }
                }
                UtilitySpec::Lookup(lookup) => {
                    if let Some(tree) = self.render_table(lookup, m) {
                        candidates.push(Candidate {
                            spec,
                            tree,
                            strong: true,
                        });
                    }
                }
            }
        }
        statics.into_iter().chain(candidates).collect()
    }

    /// Renders a lookup utility for a value from its table.
    fn render_table(&self, spec: &LookupUtility, m: &PrefixMatch<'_>) -> Option<StyleTree> {
        if m.negative && !spec.flags.contains(SpecFlags::NEGATIVE) {
            return None;
        }
        let (entry, modifier) = match (m.value, m.full_value) {
            (None, _) => {
                if spec.flags.contains(SpecFlags::FILTER_DEFAULT) {
                    return None;
                }
                (spec.values.get("DEFAULT")?, m.modifier)
            }
            (Some("DEFAULT"), _) => return None,
            (Some(value), full) => match full.filter(|f| *f != value).and_then(|f| spec.values.get(f)) {
                Some(entry) => (entry, None),
                None => (spec.values.get(value)?, m.modifier),
            },
        };

        let kind = config_kind(spec);
        let opacity = match (kind, modifier) {
            (ValueKind::Color, Some(modifier)) => Some(self.modifier_opacity(modifier)?),
            _ => None,
        };
        let text = kind.handle_config(
            entry,
            ConfigOptions {
                negative: false,
                opacity: opacity.as_deref(),
                modifier: None,
            },
        )?;
        let text = if m.negative {
            if !can_negate(&text) {
                return None;
            }
            kind.handle_config(
                &serde_json::Value::String(text),
                ConfigOptions {
                    negative: true,
                    ..Default::default()
                },
            )?
        } else {
            text
        };

        let args = UtilityArgs {
            modifier: modifier.filter(|_| kind != ValueKind::Color).map(|m| m.text),
            kind: None,
            entry: Some(entry),
            theme: &self.ctx.theme,
        };
        self.finish_render(spec, &text, &args)
    }

    /// Renders a lookup utility for an arbitrary value. The flag tells
    /// whether the value was accepted through a concrete kind.
    fn render_arbitrary(
        &self,
        spec: &LookupUtility,
        value: &str,
        negative: bool,
        modifier: Option<ModifierText<'_>>,
    ) -> Option<(StyleTree, bool)> {
        if negative && !spec.flags.contains(SpecFlags::NEGATIVE) {
            return None;
        }
        let (kinds, value, pinned) = match split_tag(value) {
            Some((kind, rest)) => {
                if !spec.kinds.contains(&kind) {
                    return None;
                }
                (vec![kind], rest, true)
            }
            None => (spec.kinds.clone(), value, false),
        };

        for kind in kinds {
            let opacity = match (kind, modifier) {
                (ValueKind::Color, Some(modifier)) => match self.modifier_opacity(modifier) {
                    Some(opacity) => Some(opacity),
                    None => continue,
                },
                _ => None,
            };
            let opts = ValueOptions {
                negative,
                unambiguous: pinned,
                opacity: opacity.as_deref(),
            };
            let Some(text) = kind.handle_value(value, opts) else {
                continue;
            };
            let args = UtilityArgs {
                modifier: modifier.filter(|_| kind != ValueKind::Color).map(|m| m.text),
                kind: Some(kind),
                entry: None,
                theme: &self.ctx.theme,
            };
            let tree = self.finish_render(spec, &text, &args)?;
            return Some((tree, pinned || kind != ValueKind::Any));
        }
        None
    }

    fn finish_render(
        &self,
        spec: &LookupUtility,
        value: &str,
        args: &UtilityArgs<'_>,
    ) -> Option<StyleTree> {
        let tree = spec.render.render(value, args);
        if tree.is_empty() {
            return None;
        }
        Some(match &spec.post {
            Some(post) => post.apply(tree),
            None => tree,
        })
    }

    /// Opacity for a color modifier. Bracketed modifiers are used as they
    /// are.
    fn modifier_opacity(&self, modifier: ModifierText<'_>) -> Option<String> {
        if modifier.wrapped {
            return Some(modifier.text.to_string());
        }
        self.ctx.theme.modifier_opacity(modifier.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LookupUtility, StaticUtility};
    use std::sync::Arc;

    fn table(lookups: &[&str], statics: &[&str]) -> PrefixTable<UtilitySpec> {
        let mut table = PrefixTable::default();
        for key in lookups {
            table.insert_for_tests(
                key,
                UtilitySpec::Lookup(LookupUtility {
                    plugin: "test".into(),
                    values: Default::default(),
                    kinds: vec![ValueKind::Any],
                    flags: SpecFlags::default(),
                    render: Arc::new(|_: &str, _: &UtilityArgs<'_>| StyleTree::new()),
                    post: None,
                }),
            );
        }
        for key in statics {
            table.insert_for_tests(
                key,
                UtilitySpec::Static(StaticUtility {
                    plugin: "test".into(),
                    tree: StyleTree::new(),
                    flags: SpecFlags::default(),
                }),
            );
        }
        table
    }

    fn keys<'t>(matches: &[PrefixMatch<'t>]) -> Vec<(&'t str, Option<&'t str>)> {
        matches.iter().map(|m| (m.key, m.value)).collect()
    }

    #[test]
    fn longest_lookup_prefix_comes_first() {
        let table = table(&["p", "p-1"], &[]);
        let matches = prefix_matches(&table, "p-1-2", None, UtilitySpec::is_lookup);
        assert_eq!(keys(&matches), [("p-1", Some("2")), ("p", Some("1-2"))]);
    }

    #[test]
    fn static_entries_need_an_exact_name() {
        let table = table(&[], &["bg", "bg-red"]);
        let matches = prefix_matches(&table, "bg-red-500", None, UtilitySpec::is_lookup);
        assert!(matches.is_empty());
        let matches = prefix_matches(&table, "bg-red", None, UtilitySpec::is_lookup);
        assert_eq!(keys(&matches), [("bg-red", None)]);
    }

    #[test]
    fn negative_and_modifier_readings() {
        let table = table(&["mt", "bg"], &[]);
        let matches = prefix_matches(&table, "-mt-4", None, UtilitySpec::is_lookup);
        assert_eq!(keys(&matches), [("mt", Some("4"))]);
        assert!(matches[0].negative);

        let modifier = ModifierText {
            text: "50",
            wrapped: false,
        };
        let matches = prefix_matches(&table, "bg-red-500/50", Some(modifier), UtilitySpec::is_lookup);
        assert_eq!(keys(&matches), [("bg", Some("red-500"))]);
        assert_eq!(matches[0].full_value, Some("red-500/50"));
        assert_eq!(matches[0].modifier, Some(modifier));
    }

    #[test]
    fn wrapped_modifiers_are_stripped_with_their_brackets() {
        let table = table(&["bg"], &[]);
        let modifier = ModifierText {
            text: ".5",
            wrapped: true,
        };
        let matches = prefix_matches(&table, "bg-black/[.5]", Some(modifier), UtilitySpec::is_lookup);
        assert_eq!(keys(&matches), [("bg", Some("black"))]);
    }
}
