//! Layered resolution across an ordered list of component source pairs.

use crate::error::DefaultsError;
use crate::merge::merge_overrides;
use crate::source::{Content, DefaultsSource, Intermediate};
use std::collections::BTreeSet;
use tracing::{debug, error};

/// One contributing component's sources. The system document is mandatory;
/// the user override document is optional.
#[derive(Debug, Clone)]
pub struct SourcePair {
    pub system: DefaultsSource,
    pub user: Option<DefaultsSource>,
}

impl SourcePair {
    pub fn new(system: DefaultsSource, user: Option<DefaultsSource>) -> Self {
        Self { system, user }
    }
}

/// The ordered traversal used to resolve one query: pairs are consulted
/// most-derived component first, user before system within each pair, and
/// environment overrides beat both.
///
/// Precedence is per pair: a more specific component's system default wins
/// over a less specific component's user override. The pair order is fixed
/// at construction and never changes.
#[derive(Debug, Clone)]
pub struct Cascade {
    family: String,
    pairs: Vec<SourcePair>,
}

impl Cascade {
    pub fn new(family: impl Into<String>, pairs: Vec<SourcePair>) -> Self {
        Self {
            family: family.into(),
            pairs,
        }
    }

    /// The component family this cascade resolves for, for diagnostics.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn pairs(&self) -> &[SourcePair] {
        &self.pairs
    }

    /// Resolve `path` through the layers.
    ///
    /// A sub-mapping found in a user source is deep-merged over the same
    /// path from that pair's system source before being returned, so any
    /// mapping handed out is schema-complete, never a partial override
    /// fragment. A pair that is missing the path entirely passes control
    /// to the next pair; only when every pair is exhausted does the
    /// failure surface, naming the full queried path.
    pub fn resolve(&self, path: &[&str]) -> Result<Content, DefaultsError> {
        if self.pairs.is_empty() {
            return Err(DefaultsError::NoDefaultsRegistered {
                family: self.family.clone(),
            });
        }

        let path_str = path_display(path);

        for pair in &self.pairs {
            if let Some(user) = &pair.user {
                debug!(
                    source = %user.origin().display(),
                    path = %path_str,
                    "querying user defaults"
                );
                match user.content(path) {
                    Ok(Content::Tree(user_tree)) => {
                        return self.merge_with_system(pair, path, &path_str, user_tree);
                    }
                    Ok(leaf) => return Ok(leaf),
                    Err(DefaultsError::ContentMissing { .. }) => {
                        // No override for this exact path. Try system.
                    }
                    Err(err) => {
                        debug!(
                            source = %user.origin().display(),
                            path = %path_str,
                            %err,
                            "user defaults unavailable for this pair"
                        );
                    }
                }
            }

            debug!(
                source = %pair.system.origin().display(),
                path = %path_str,
                "querying system defaults"
            );
            match pair.system.content(path) {
                Ok(content) => return Ok(content),
                Err(DefaultsError::ContentMissing { .. }) => {
                    // Maybe a more general component declares it.
                }
                Err(err) => {
                    debug!(
                        source = %pair.system.origin().display(),
                        path = %path_str,
                        %err,
                        "system defaults unavailable for this pair"
                    );
                }
            }
        }

        Err(DefaultsError::ContentMissing { path: path_str })
    }

    /// Resolve `path` locally against a previously extracted sub-mapping,
    /// bypassing layering: the mapping is already the product of a
    /// whole-hierarchy query.
    pub fn resolve_in(
        &self,
        tree: &Intermediate,
        path: &[&str],
    ) -> Result<Content, DefaultsError> {
        let Some(pair) = self.pairs.first() else {
            return Err(DefaultsError::NoDefaultsRegistered {
                family: self.family.clone(),
            });
        };
        pair.system.content_in(tree, path)
    }

    /// Derived environment-variable names of every leaf path declared by
    /// any system source. User sources hold only overrides, so the system
    /// documents are authoritative for the full schema.
    pub fn environment_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for pair in &self.pairs {
            names.extend(pair.system.environment_variables());
        }
        names
    }

    /// A user sub-tree is a partial copy; fill it out from the system
    /// document of the same pair so the caller can cache a complete
    /// mapping.
    fn merge_with_system(
        &self,
        pair: &SourcePair,
        path: &[&str],
        path_str: &str,
        user_tree: Intermediate,
    ) -> Result<Content, DefaultsError> {
        match pair.system.content(path) {
            Ok(Content::Tree(system_tree)) => {
                let merged = merge_overrides(system_tree.mapping(), user_tree.mapping())?;
                Ok(Content::Tree(Intermediate::new(
                    system_tree.env_prefix().to_string(),
                    merged,
                )))
            }
            Ok(Content::Leaf(_)) => Err(DefaultsError::OverrideTypeMismatch {
                path: path_str.to_string(),
            }),
            Err(err) => {
                error!(
                    source = %pair.system.origin().display(),
                    path = %path_str,
                    %err,
                    "system defaults unavailable for user override"
                );
                Err(err)
            }
        }
    }
}

fn path_display(path: &[&str]) -> String {
    if path.is_empty() {
        "<no path>".to_string()
    } else {
        path.join("/")
    }
}
