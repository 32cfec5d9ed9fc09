//! Named types usable in `[name:type]` groups.

mod builtin;
mod value;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex_syntax::ast as re_ast;
use regex_syntax::hir::translate::Translator;

use crate::{Error, Result};

pub use value::{ConvertError, ConvertResult, Converter, Identity, Value};

/// A registered type: the shape it matches and how its text is converted.
#[derive(Clone)]
pub struct TypeSpec {
    name: String,
    fragment: String,
    ast: re_ast::Ast,
    converter: Arc<dyn Converter>,
}

impl TypeSpec {
    fn new(name: &str, fragment: &str, converter: Arc<dyn Converter>) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidType {
            name: name.to_owned(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("type name is empty".into()));
        }
        if name.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("type name would be read as a width".into()));
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '[' | ']' | ':'))
        {
            return Err(invalid("type name contains whitespace, `[`, `]` or `:`".into()));
        }
        if fragment.is_empty() {
            return Err(invalid("regex fragment is empty".into()));
        }

        let mut ast = re_ast::parse::Parser::new()
            .parse(fragment)
            .map_err(|e| invalid(e.to_string()))?;
        Translator::new()
            .translate(fragment, &ast)
            .map_err(|e| invalid(e.to_string()))?;

        // captures inside a fragment would shift the matcher's own groups
        uncapture(&mut ast);

        Ok(Self {
            name: name.to_owned(),
            fragment: ast.to_string(),
            ast,
            converter,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fragment as embedded in compiled patterns.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub(crate) fn regex_ast(&self) -> &re_ast::Ast {
        &self.ast
    }

    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    pub fn convert(&self, raw: &str) -> ConvertResult {
        self.converter.convert(raw)
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("name", &self.name)
            .field("fragment", &self.fragment)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TypeSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.fragment == other.fragment
            && Arc::ptr_eq(&self.converter, &other.converter)
    }
}

fn uncapture(ast: &mut re_ast::Ast) {
    match ast {
        re_ast::Ast::Group(group) => {
            if group.capture_index().is_some() {
                group.kind = re_ast::GroupKind::NonCapturing(re_ast::Flags {
                    span: group.span,
                    items: vec![],
                });
            }
            uncapture(&mut group.ast);
        }
        re_ast::Ast::Repetition(rep) => uncapture(&mut rep.ast),
        re_ast::Ast::Alternation(alt) => alt.asts.iter_mut().for_each(uncapture),
        re_ast::Ast::Concat(concat) => concat.asts.iter_mut().for_each(uncapture),
        _ => {}
    }
}

/// Table of known types.
///
/// A registry is plain data: construct one with [`Registry::new`] for the
/// built-ins or [`Registry::empty`] for none, and hand it to
/// [`crate::Matcher::with_registry`]. Patterns compiled without an explicit
/// registry use the process-wide one behind [`registry`].
#[derive(Clone, Debug)]
pub struct Registry {
    types: BTreeMap<String, TypeSpec>,
}

impl Registry {
    /// A registry holding the built-in types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::install(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the type `name`.
    ///
    /// Capturing groups inside `fragment` are made non-capturing.
    pub fn register<C>(&mut self, name: &str, fragment: &str, converter: C) -> Result<()>
    where
        C: Converter + 'static,
    {
        self.register_arc(name, fragment, Arc::new(converter))
    }

    /// Register a type whose captures stay strings.
    pub fn register_str(&mut self, name: &str, fragment: &str) -> Result<()> {
        self.register(name, fragment, Identity)
    }

    pub fn register_arc(
        &mut self,
        name: &str,
        fragment: &str,
        converter: Arc<dyn Converter>,
    ) -> Result<()> {
        let spec = TypeSpec::new(name, fragment, converter)?;
        if self.types.insert(name.to_owned(), spec).is_some() {
            tracing::debug!(name, fragment, "overwrote registered type");
        } else {
            tracing::trace!(name, fragment, "registered type");
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<TypeSpec> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownType {
                name: name.to_owned(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// The process-wide registry used by [`crate::Matcher::new`] and the façade
/// functions.
///
/// Registration takes the write lock, so it is memory safe from any thread,
/// but a pattern only sees the types registered before it was compiled.
/// Hosts that register while other threads compile must order the two
/// themselves.
pub fn registry() -> &'static RwLock<Registry> {
    &DEFAULT_REGISTRY
}

/// Register a type in the process-wide registry.
pub fn register_type<C>(name: &str, fragment: &str, converter: C) -> Result<()>
where
    C: Converter + 'static,
{
    DEFAULT_REGISTRY.write().register(name, fragment, converter)
}

#[cfg(test)]
mod tests {
    use super::{Error, Registry, Value};

    #[test]
    fn fragment_captures_become_non_capturing() {
        let mut types = Registry::empty();
        types.register_str("pair", r"(a)(?P<x>b)(?:c)").unwrap();
        assert_eq!(types.resolve("pair").unwrap().fragment(), "(?:a)(?:b)(?:c)");
    }

    #[test]
    fn last_registration_wins() {
        let mut types = Registry::empty();
        types.register_str("word", "[a-z]+").unwrap();
        types
            .register("word", "[A-Z]+", |s: &str| Ok::<_, String>(s.to_lowercase()))
            .unwrap();

        let spec = types.resolve("word").unwrap();
        assert_eq!(spec.fragment(), "[A-Z]+");
        assert_eq!(spec.convert("ABC").unwrap(), Value::from("abc"));
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn unknown_type_lists_known_names() {
        let mut types = Registry::empty();
        types.register_str("b", "b").unwrap();
        types.register_str("a", "a").unwrap();

        match types.resolve("c") {
            Err(Error::UnknownType { name, known }) => {
                assert_eq!(name, "c");
                assert_eq!(known, "a, b");
            }
            other => panic!("expected unknown type, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_registrations() {
        let mut types = Registry::empty();
        for (name, fragment) in [
            ("empty", ""),
            ("broken", "(ab"),
            ("class", "[z-a]"),
            ("", "a"),
            ("12", "a"),
            ("a:b", "a"),
        ] {
            assert!(
                matches!(
                    types.register_str(name, fragment),
                    Err(Error::InvalidType { .. })
                ),
                "{name:?} / {fragment:?} should be rejected"
            );
        }
        assert!(types.is_empty());
    }

    #[test]
    fn builtins_are_present() {
        let types = Registry::new();
        for name in [
            "int",
            "float",
            "decimal",
            "date",
            "datetime",
            "uuid",
            "letters",
            "identifier",
            "email",
            "url",
            "ipv4",
            "ipv6",
            "creditcard",
            "open",
            "close",
        ] {
            assert!(types.contains(name), "missing built-in {name}");
        }
    }
}
