//! A single loaded defaults document with environment-aware lookup.

use crate::document;
use crate::env;
use crate::error::DefaultsError;
use crate::locate::locate;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The result of a lookup: either a terminal value or a sub-mapping that
/// itself supports further path-based lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A final scalar/sequence value (environment override already applied).
    Leaf(Value),
    /// A container to keep querying, carrying the environment-variable
    /// prefix of the path that produced it.
    Tree(Intermediate),
}

impl Content {
    /// The leaf value as a string slice, if that is what this is.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Content::Leaf(value) => value.as_str(),
            Content::Tree(_) => None,
        }
    }

    /// The leaf value, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Content::Leaf(value) => Some(value),
            Content::Tree(_) => None,
        }
    }

    /// The sub-mapping, if this is one.
    pub fn as_tree(&self) -> Option<&Intermediate> {
        match self {
            Content::Tree(tree) => Some(tree),
            Content::Leaf(_) => None,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Content::Tree(_))
    }
}

/// A sub-mapping extracted from an earlier lookup.
///
/// Keeping the derived environment-variable prefix alongside the mapping
/// lets later lookups against this cached copy honor overrides for the
/// full original path.
#[derive(Debug, Clone, PartialEq)]
pub struct Intermediate {
    env_prefix: String,
    mapping: Mapping,
}

impl Intermediate {
    pub(crate) fn new(env_prefix: String, mapping: Mapping) -> Self {
        Self { env_prefix, mapping }
    }

    /// Environment-variable prefix of the path this mapping came from.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.mapping.keys()
    }
}

/// One loaded defaults document (system or user) plus its origin path.
///
/// Loading is eager: construction fails if the file cannot be read or is
/// not a well-formed defaults document. The document is immutable once
/// loaded; only the live environment lookup varies between queries.
#[derive(Debug, Clone)]
pub struct DefaultsSource {
    origin: PathBuf,
    document: Mapping,
}

impl DefaultsSource {
    /// Load a defaults document (top-level key `defaults`).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DefaultsError> {
        Self::open_with_key(path, document::DEFAULTS_KEY)
    }

    /// Load a document with an explicit top-level key (`config` for
    /// component config documents).
    pub fn open_with_key(
        path: impl Into<PathBuf>,
        top_level_key: &str,
    ) -> Result<Self, DefaultsError> {
        let origin = path.into();
        let document = document::load(&origin, top_level_key)?;
        Ok(Self { origin, document })
    }

    /// The file this document was loaded from, for diagnostics.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// The whole working document.
    pub fn document(&self) -> &Mapping {
        &self.document
    }

    /// Resolve `path` against the document. A leaf result is substituted
    /// by the environment variable derived from the path, when set; a
    /// mapping result is returned as an [`Intermediate`] for further
    /// lookups. The empty path yields the whole document.
    pub fn content(&self, path: &[&str]) -> Result<Content, DefaultsError> {
        content_at(&self.document, path, "")
    }

    /// Resolve `path` locally against a previously extracted sub-mapping,
    /// with the same error semantics and with environment overrides still
    /// keyed to the full original path.
    pub fn content_in(
        &self,
        tree: &Intermediate,
        path: &[&str],
    ) -> Result<Content, DefaultsError> {
        content_at(&tree.mapping, path, &tree.env_prefix)
    }

    /// Derived environment-variable names of every leaf path in this
    /// document.
    pub fn environment_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_leaf_variables(&self.document, &mut Vec::new(), &mut names);
        names
    }
}

pub(crate) fn content_at(
    mapping: &Mapping,
    path: &[&str],
    env_prefix: &str,
) -> Result<Content, DefaultsError> {
    let variable = prefixed_variable(env_prefix, path);

    let Some(value) = locate(mapping, path)? else {
        // Empty path: the container itself, unchanged.
        return Ok(Content::Tree(Intermediate::new(variable, mapping.clone())));
    };

    match value {
        Value::Mapping(inner) => Ok(Content::Tree(Intermediate::new(variable, inner.clone()))),
        leaf => match env::lookup(&variable) {
            Some(raw) => Ok(Content::Leaf(Value::String(raw))),
            None => Ok(Content::Leaf(leaf.clone())),
        },
    }
}

fn prefixed_variable(prefix: &str, path: &[&str]) -> String {
    let derived = env::variable_name(path);
    let joined = if prefix.is_empty() {
        derived
    } else {
        format!("{prefix}_{derived}")
    };
    joined.trim_matches('_').to_string()
}

fn collect_leaf_variables(mapping: &Mapping, at: &mut Vec<String>, names: &mut BTreeSet<String>) {
    for (key, value) in mapping {
        let Some(key) = key.as_str() else { continue };
        at.push(key.to_string());
        match value {
            Value::Mapping(inner) => collect_leaf_variables(inner, at, names),
            _ => {
                names.insert(env::variable_name(at));
            }
        }
        at.pop();
    }
}
