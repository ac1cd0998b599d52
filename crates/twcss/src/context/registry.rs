//! Prefix tables and the registry they live in.
//!
//! Plugins register into a [`RegistryBuilder`] through the plugin API. When
//! every plugin has run, the builder is frozen into a [`Registry`], which has
//! no mutation methods at all.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::spec::{UtilitySpec, VariantSpec};
use crate::error::{Result, TwError};
use crate::style::StyleTree;

/// Specs keyed by prefix, in registration order.
#[derive(Clone, Debug)]
pub struct PrefixTable<S> {
    entries: IndexMap<String, Vec<S>>,
}

impl<S> Default for PrefixTable<S> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<S> PrefixTable<S> {
    pub fn get(&self, key: &str) -> Option<&[S]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the stored key along with its specs, so callers can hand
    /// out references that outlive the lookup text.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &[S])> {
        self.entries
            .get_key_value(key)
            .map(|(key, specs)| (key.as_str(), specs.as_slice()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[S])> {
        self.entries
            .iter()
            .map(|(key, specs)| (key.as_str(), specs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: String, spec: S) {
        self.entries.entry(key).or_default().push(spec);
    }

    #[cfg(test)]
    pub(crate) fn insert_for_tests(&mut self, key: &str, spec: S) {
        self.push(key.to_string(), spec);
    }
}

/// Which table a registration goes to, for duplicate reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TableKind {
    Utilities,
    Variants,
}

impl TableKind {
    fn name(self) -> &'static str {
        match self {
            TableKind::Utilities => "utility",
            TableKind::Variants => "variant",
        }
    }
}

/// Mutable registry state while plugins run.
#[derive(Default)]
pub(crate) struct RegistryBuilder {
    utilities: PrefixTable<UtilitySpec>,
    variants: PrefixTable<VariantSpec>,
    base: StyleTree,
    strict: bool,
    seen: HashSet<(TableKind, String)>,
}

impl RegistryBuilder {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Records a static registration key, failing on a repeat in strict
    /// mode.
    pub(crate) fn claim(&mut self, table: TableKind, key: String) -> Result<()> {
        if self.seen.insert((table, key.clone())) {
            return Ok(());
        }
        if self.strict {
            return Err(TwError::DuplicateRegistration {
                table: table.name(),
                key,
            });
        }
        log::warn!("{} `{key}` registered more than once", table.name());
        Ok(())
    }

    pub(crate) fn push_utility(&mut self, key: String, spec: UtilitySpec) {
        self.utilities.push(key, spec);
    }

    pub(crate) fn push_variant(&mut self, key: String, spec: VariantSpec) {
        self.variants.push(key, spec);
    }

    pub(crate) fn merge_base(&mut self, tree: StyleTree) {
        self.base.merge(tree);
    }

    pub(crate) fn finish(self) -> Registry {
        log::debug!(
            "registry built: {} utility prefixes, {} variant prefixes",
            self.utilities.len(),
            self.variants.len()
        );
        Registry {
            utilities: self.utilities,
            variants: self.variants,
            base: self.base,
        }
    }
}

/// The frozen utility and variant tables.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    pub(crate) utilities: PrefixTable<UtilitySpec>,
    pub(crate) variants: PrefixTable<VariantSpec>,
    /// Global styles as registered, before directive expansion.
    pub(crate) base: StyleTree,
}

impl Registry {
    pub fn utilities(&self) -> &PrefixTable<UtilitySpec> {
        &self.utilities
    }

    pub fn variants(&self) -> &PrefixTable<VariantSpec> {
        &self.variants
    }
}

/// A class found in a selector, with the selector rewritten around `&`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FoundClass {
    pub name: String,
    /// The selector with this class replaced by `&`, `None` when the
    /// selector is the class alone.
    pub rest: Option<String>,
}

/// Finds every class in a (possibly comma separated) selector.
///
/// Classes inside parentheses or brackets (`:not(.x)`, `[data-x=".y"]`)
/// are context, not registrations. Escapes such as `\:` are unescaped in
/// the returned name.
pub(crate) fn find_classes(selector: &str) -> Vec<FoundClass> {
    let mut found = Vec::new();
    for part in crate::types::split_top_level(selector, ',') {
        let part = part.trim();
        for (start, end, name) in class_ranges(part) {
            let rest = format!("{}&{}", &part[..start], &part[end..]);
            found.push(FoundClass {
                name,
                rest: (rest != "&").then_some(rest),
            });
        }
    }
    found
}

fn class_ranges(selector: &str) -> Vec<(usize, usize, String)> {
    let bytes = selector.as_bytes();
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        if let Some(q) = quote {
            if b == b'\\' {
                pos += 1;
            } else if b == q {
                quote = None;
            }
            pos += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => {
                let (end, name) = class_name(selector, pos + 1);
                if !name.is_empty() {
                    ranges.push((pos, end, name));
                    pos = end;
                    continue;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    ranges
}

/// Reads a class name starting at `start`, returning its end offset and
/// the unescaped name.
fn class_name(selector: &str, start: usize) -> (usize, String) {
    let mut name = String::new();
    let mut chars = selector[start..].char_indices();
    let mut end = start;
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((escaped_at, escaped)) => {
                    name.push(escaped);
                    end = start + escaped_at + escaped.len_utf8();
                    continue;
                }
                None => break,
            },
            c if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                name.push(c);
            }
            _ => break,
        }
        end = start + offset + c.len_utf8();
    }
    (end, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn found(selector: &str) -> Vec<(String, Option<String>)> {
        find_classes(selector)
            .into_iter()
            .map(|f| (f.name, f.rest))
            .collect()
    }

    #[test]
    fn plain_class() {
        assert_eq!(found(".btn"), [("btn".to_string(), None)]);
    }

    #[test]
    fn class_with_pseudo_and_descendant() {
        assert_eq!(
            found(".group:hover .item"),
            [
                ("group".to_string(), Some("&:hover .item".to_string())),
                ("item".to_string(), Some(".group:hover &".to_string())),
            ]
        );
    }

    #[test]
    fn comma_lists_and_escapes() {
        assert_eq!(
            found(".a, .w-1\\/2"),
            [("a".to_string(), None), ("w-1/2".to_string(), None)]
        );
    }

    #[test]
    fn classes_inside_functions_are_context() {
        assert_eq!(
            found(".x:not(.y)"),
            [("x".to_string(), Some("&:not(.y)".to_string()))]
        );
        assert!(found("[data-x='.y']").is_empty());
    }

    #[test]
    fn strict_builder_rejects_duplicates() {
        let mut builder = RegistryBuilder::new(true);
        assert!(builder.claim(TableKind::Utilities, "btn".into()).is_ok());
        assert!(builder.claim(TableKind::Variants, "btn".into()).is_ok());
        assert!(matches!(
            builder.claim(TableKind::Utilities, "btn".into()),
            Err(TwError::DuplicateRegistration { table: "utility", .. })
        ));

        let mut lenient = RegistryBuilder::new(false);
        assert!(lenient.claim(TableKind::Utilities, "btn".into()).is_ok());
        assert!(lenient.claim(TableKind::Utilities, "btn".into()).is_ok());
    }
}
