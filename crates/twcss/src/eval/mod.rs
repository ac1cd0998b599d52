//! Evaluation of parsed utility strings into style trees.
//!
//! The evaluator walks the AST produced by [`twparse::parse`] once,
//! resolving every classname against the utility table and every variant
//! against the variant table. Anything that does not resolve is recorded as
//! a [`Diagnostic`] and left out of the output.

mod arbitrary;
mod directives;
mod resolve;
mod variant;

pub use arbitrary::normalize_value;
pub use variant::Wrapper;

pub(crate) use arbitrary::normalize_selector;
pub(crate) use resolve::{ModifierText, Resolved};
pub(crate) use variant::Layer;

use twparse::{Ast, Modifier, NodeId, NodeKind, SideTable};

use crate::config::Important;
use crate::context::{Context, SpecFlags, UtilitySpec, VariantArgs, VariantSpec};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::style::StyleTree;
use crate::types::kinds::config_text;

use arbitrary::split_property;
use resolve::prefix_matches;

/// How deep `@apply` may nest before expansion gives up.
pub(crate) const MAX_APPLY_DEPTH: usize = 32;

/// The output of one evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluated {
    pub tree: StyleTree,
    /// Styles marked important while `important` is configured as a
    /// selector. They belong under that selector rather than in `tree`.
    pub important: StyleTree,
}

impl Evaluated {
    fn merge(&mut self, other: Evaluated) {
        self.tree.merge(other.tree);
        self.important.merge(other.important);
    }

    fn wrapped(self, wrapper: &Wrapper) -> Evaluated {
        Evaluated {
            tree: wrapper.apply(self.tree),
            important: wrapper.apply(self.important),
        }
    }
}

/// Whether the evaluation is for a caller or for an `@apply` expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal,
    Apply,
}

/// A resolved variant.
pub(crate) struct ResolvedVariant<'c> {
    pub key: &'c str,
    /// `None` for arbitrary selectors.
    pub spec: Option<&'c VariantSpec>,
    pub wrapper: Wrapper,
}

/// Per-parse state.
struct Walk<'a, 's> {
    ast: &'a Ast<'s>,
    /// Normalized text of arbitrary values, by node.
    normalized: SideTable<String>,
}

impl Walk<'_, '_> {
    fn normalized(&mut self, ctx: &Context, id: NodeId, raw: &str) -> String {
        self.normalized
            .get_or_insert_with(id, || normalize_value(&ctx.theme, raw))
            .cloned()
            .unwrap_or_default()
    }
}

pub(crate) struct Evaluator<'c> {
    pub(crate) ctx: &'c Context,
    mode: Mode,
    depth: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'c> Evaluator<'c> {
    pub(crate) fn new(ctx: &'c Context) -> Self {
        Self {
            ctx,
            mode: Mode::Normal,
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    fn nested(&self) -> Self {
        Self {
            ctx: self.ctx,
            mode: Mode::Apply,
            depth: self.depth + 1,
            diagnostics: Vec::new(),
        }
    }

    /// Evaluates a whole utility string.
    pub(crate) fn run(&mut self, input: &str) -> Evaluated {
        let ast = twparse::parse(input, &self.ctx.separator);
        log::trace!("evaluating `{input}`:\n{}", ast.dump());
        let mut walk = Walk {
            ast: &ast,
            normalized: SideTable::new(&ast),
        };
        let mut out = Evaluated::default();
        for &id in ast.exprs() {
            self.expr(&mut walk, id, false, &mut out);
        }
        out
    }

    /// Resolves a utility string made of variants only, such as
    /// `hover:focus:`.
    pub(crate) fn run_variants(&mut self, input: &str) -> Wrapper {
        let ast = twparse::parse(input, &self.ctx.separator);
        let mut walk = Walk {
            ast: &ast,
            normalized: SideTable::new(&ast),
        };
        let mut wrapper = Wrapper::identity();
        for &id in ast.exprs() {
            let mut next = Some(id);
            while let Some(id) = next {
                next = None;
                match ast.kind(id) {
                    NodeKind::VariantSpan { variant, child } => {
                        if let Some(layer) = self.variant(&mut walk, *variant) {
                            wrapper = wrapper.then(layer);
                        }
                        next = *child;
                    }
                    _ => self.report(DiagnosticKind::VariantNotFound, &ast, id),
                }
            }
        }
        wrapper
    }

    fn report(&mut self, kind: DiagnosticKind, ast: &Ast<'_>, id: NodeId) {
        let node = ast.node(id);
        let text = ast.node_text(id);
        log::debug!("skipping `{text}`: {kind}");
        self.diagnostics.push(Diagnostic {
            kind,
            span: node.span,
            text: text.to_string(),
        });
    }

    fn expr(&mut self, walk: &mut Walk<'_, '_>, id: NodeId, important: bool, out: &mut Evaluated) {
        let ast = walk.ast;
        if !ast.node(id).is_closed() {
            self.report(DiagnosticKind::ParseIncomplete, ast, id);
        }
        match ast.kind(id) {
            NodeKind::Program { exprs } => {
                for &expr in exprs {
                    self.expr(walk, expr, important, out);
                }
            }
            NodeKind::Group {
                exprs,
                important: marked,
                ..
            } => {
                for &expr in exprs {
                    self.expr(walk, expr, important || *marked, out);
                }
            }
            NodeKind::VariantSpan { variant, child } => {
                let wrapper = self.variant(walk, *variant);
                let Some(child) = child else {
                    return;
                };
                let mut local = Evaluated::default();
                self.expr(walk, *child, important, &mut local);
                if let Some(wrapper) = wrapper {
                    out.merge(local.wrapped(&wrapper));
                }
            }
            NodeKind::Classname {
                name,
                important: marked,
                modifier,
            } => {
                let modifier = modifier_text(ast, *modifier);
                match self.resolve_classname(ast.text(*name), modifier) {
                    Ok(resolved) => self.emit_resolved(resolved, important || *marked, out),
                    Err(kind) => self.report(kind, ast, id),
                }
            }
            NodeKind::ArbitraryClassname {
                prefix,
                value,
                modifier,
                important: marked,
                ..
            } => {
                let normalized = walk.normalized(self.ctx, id, ast.text(*value));
                let modifier = modifier_text(ast, *modifier);
                match self.resolve_arbitrary(ast.text(*prefix), &normalized, modifier) {
                    Ok(resolved) => self.emit_resolved(resolved, important || *marked, out),
                    Err(kind) => self.report(kind, ast, id),
                }
            }
            NodeKind::ArbitraryProperty {
                value,
                important: marked,
                ..
            } => match split_property(ast.text(*value)) {
                Some((property, raw)) => {
                    let value = walk.normalized(self.ctx, id, raw);
                    let mut tree = StyleTree::new();
                    tree.insert(property, value);
                    self.emit(out, tree, SpecFlags::default(), important || *marked);
                }
                None => self.report(DiagnosticKind::UtilityNotFound, ast, id),
            },
            // A variant without its span only shows up in malformed input.
            _ => self.report(DiagnosticKind::UtilityNotFound, ast, id),
        }
    }

    fn emit_resolved(&mut self, resolved: Resolved<'c>, important: bool, out: &mut Evaluated) {
        let flags = resolved.spec.flags();
        let tree = match resolved.spec {
            UtilitySpec::Static(_) => self.expand(resolved.tree),
            UtilitySpec::Lookup(_) => resolved.tree,
        };
        self.emit(out, tree, flags, important);
    }

    /// Adds a resolved tree to the output, honoring `!` and the configured
    /// `important` option.
    fn emit(&self, out: &mut Evaluated, tree: StyleTree, flags: SpecFlags, marked: bool) {
        let respects = flags.contains(SpecFlags::RESPECT_IMPORTANT);
        match (&self.ctx.config.important, self.mode) {
            (Important::Selector(_), Mode::Normal) if marked => out.important.merge(tree),
            (Important::All(true), _) if respects => out.tree.merge(tree.important()),
            _ if marked => out.tree.merge(tree.important()),
            _ => out.tree.merge(tree),
        }
    }

    /// Resolves a variant node to its wrapper, reporting failures.
    fn variant(&mut self, walk: &mut Walk<'_, '_>, id: NodeId) -> Option<Wrapper> {
        let ast = walk.ast;
        if !ast.node(id).is_closed() {
            self.report(DiagnosticKind::ParseIncomplete, ast, id);
        }
        if let NodeKind::GroupVariant { members, .. } = ast.kind(id) {
            let mut wrappers = Vec::with_capacity(members.len());
            let mut failed = false;
            for chain in members {
                let mut member = Wrapper::identity();
                for &link in chain {
                    match self.variant(walk, link) {
                        Some(wrapper) => member = member.then(wrapper),
                        None => failed = true,
                    }
                }
                wrappers.push(member);
            }
            // Members report their own failures.
            return (!failed).then(|| Wrapper::group(wrappers));
        }
        match self.variant_node(walk, id) {
            Ok(resolved) => Some(resolved.wrapper),
            Err(kind) => {
                self.report(kind, ast, id);
                None
            }
        }
    }

    fn variant_node(
        &mut self,
        walk: &mut Walk<'_, '_>,
        id: NodeId,
    ) -> Result<ResolvedVariant<'c>, DiagnosticKind> {
        let ast = walk.ast;
        match ast.kind(id) {
            NodeKind::SimpleVariant { name, modifier } => {
                self.resolve_variant(ast.text(*name), modifier_text(ast, *modifier))
            }
            NodeKind::ArbitraryVariant {
                prefix,
                value,
                modifier,
                ..
            } => {
                let normalized = walk.normalized(self.ctx, id, ast.text(*value));
                self.resolve_arbitrary_variant(
                    ast.text(*prefix),
                    &normalized,
                    modifier_text(ast, *modifier),
                )
            }
            NodeKind::ArbitrarySelector { selector, .. } => normalize_selector(ast.text(*selector))
                .map(|selector| ResolvedVariant {
                    key: "",
                    spec: None,
                    wrapper: Wrapper::from_layer(Layer::new(&[selector], None)),
                })
                .ok_or(DiagnosticKind::VariantNotFound),
            _ => Err(DiagnosticKind::VariantNotFound),
        }
    }

    /// Resolves one classname written on its own.
    pub(crate) fn resolve_utility_input(&mut self, input: &str) -> Option<Resolved<'c>> {
        let ast = twparse::parse(input.trim(), &self.ctx.separator);
        let [id] = ast.exprs() else {
            return None;
        };
        let resolved = match ast.kind(*id) {
            NodeKind::Classname { name, modifier, .. } => {
                self.resolve_classname(ast.text(*name), modifier_text(&ast, *modifier))
            }
            NodeKind::ArbitraryClassname {
                prefix,
                value,
                modifier,
                ..
            } => {
                let value = normalize_value(&self.ctx.theme, ast.text(*value));
                self.resolve_arbitrary(ast.text(*prefix), &value, modifier_text(&ast, *modifier))
            }
            _ => return None,
        };
        let mut resolved = resolved.ok()?;
        if !resolved.spec.is_lookup() {
            resolved.tree = self.expand(resolved.tree);
        }
        Some(resolved)
    }

    /// Resolves one variant written on its own, with or without its
    /// trailing separator.
    pub(crate) fn resolve_variant_input(&mut self, input: &str) -> Option<ResolvedVariant<'c>> {
        let input = with_separator(input.trim(), self.ctx.separator.as_str());
        let ast = twparse::parse(&input, &self.ctx.separator);
        let [id] = ast.exprs() else {
            return None;
        };
        let NodeKind::VariantSpan {
            variant,
            child: None,
        } = ast.kind(*id)
        else {
            return None;
        };
        let mut walk = Walk {
            ast: &ast,
            normalized: SideTable::new(&ast),
        };
        self.variant_node(&mut walk, *variant).ok()
    }

    /// Resolves `name` (with any `/modifier` still attached) against the
    /// variant table.
    pub(crate) fn resolve_variant(
        &self,
        name: &str,
        modifier: Option<ModifierText<'_>>,
    ) -> Result<ResolvedVariant<'c>, DiagnosticKind> {
        let table = &self.ctx.registry.variants;
        for m in prefix_matches(table, name, modifier, VariantSpec::is_lookup) {
            if m.negative {
                continue;
            }
            let Some((key, specs)) = table.get_key_value(m.key) else {
                continue;
            };

            let mut statics: Option<(Vec<String>, &'c VariantSpec)> = None;
            let mut lookups = Vec::new();
            for spec in specs {
                match spec {
                    VariantSpec::Static(fixed) => {
                        if m.value.is_some() || m.modifier.is_some() {
                            continue;
                        }
                        statics
                            .get_or_insert_with(|| (Vec::new(), spec))
                            .0
                            .extend(fixed.templates.iter().cloned());
                    }
                    VariantSpec::Lookup(lookup) => {
                        let entry = match (m.value, m.full_value) {
                            (None, _) => lookup.values.get("DEFAULT"),
                            (Some("DEFAULT"), _) => None,
                            (Some(value), full) => full
                                .filter(|f| *f != value)
                                .and_then(|f| lookup.values.get(f))
                                .or_else(|| lookup.values.get(value)),
                        };
                        let Some(text) = entry.and_then(config_text) else {
                            continue;
                        };
                        let args = VariantArgs {
                            modifier: m.modifier.map(|m| m.text),
                        };
                        if let Some(template) = lookup.render.render(&text, &args) {
                            lookups.push((template, spec));
                        }
                    }
                }
            }

            let mut candidates: Vec<(Vec<String>, &'c VariantSpec)> = statics.into_iter().collect();
            candidates.extend(lookups.into_iter().map(|(t, spec)| (vec![t], spec)));
            match candidates.len() {
                0 => continue,
                1 => {
                    let Some((templates, spec)) = candidates.pop() else {
                        continue;
                    };
                    let layer = Layer::new(&templates, spec.post().cloned());
                    return Ok(ResolvedVariant {
                        key,
                        spec: Some(spec),
                        wrapper: Wrapper::from_layer(layer),
                    });
                }
                n => {
                    log::warn!("variant `{name}` matches {n} definitions, skipping it");
                    return Err(DiagnosticKind::AmbiguousMatch);
                }
            }
        }
        Err(DiagnosticKind::VariantNotFound)
    }

    /// Resolves `prefix-[value]:`. `value` is already normalized.
    fn resolve_arbitrary_variant(
        &self,
        prefix: &str,
        value: &str,
        modifier: Option<ModifierText<'_>>,
    ) -> Result<ResolvedVariant<'c>, DiagnosticKind> {
        let Some((key, specs)) = self.ctx.registry.variants.get_key_value(prefix) else {
            return Err(DiagnosticKind::VariantNotFound);
        };
        let args = VariantArgs {
            modifier: modifier.map(|m| m.text),
        };
        let mut candidates: Vec<_> = specs
            .iter()
            .filter_map(|spec| match spec {
                VariantSpec::Lookup(lookup) => lookup
                    .render
                    .render(value, &args)
                    .map(|template| (template, spec)),
                VariantSpec::Static(_) => None,
            })
            .collect();
        if candidates.len() > 1 {
            log::warn!("variant `{prefix}-[{value}]` matches {} definitions", candidates.len());
            return Err(DiagnosticKind::AmbiguousMatch);
        }
        let (template, spec) = candidates.pop().ok_or(DiagnosticKind::VariantNotFound)?;
        Ok(ResolvedVariant {
            key,
            spec: Some(spec),
            wrapper: Wrapper::from_layer(Layer::new(&[template], spec.post().cloned())),
        })
    }
}

/// Appends `separator` unless `input` already ends with it.
pub(crate) fn with_separator(input: &str, separator: &str) -> String {
    if input.ends_with(separator) {
        input.to_string()
    } else {
        format!("{input}{separator}")
    }
}

fn modifier_text<'s>(ast: &Ast<'s>, modifier: Option<Modifier>) -> Option<ModifierText<'s>> {
    modifier.map(|m| ModifierText {
        text: ast.text(m.span),
        wrapped: m.wrapped,
    })
}
