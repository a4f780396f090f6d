//! Explicit component registration and memoized cascade construction.
//!
//! Components register an ordered, most-derived-first list of specs under a
//! family name; the corresponding cascade is built lazily on first query
//! and cached for the life of the process. Discovery order is therefore
//! explicit and testable rather than implicit in any type hierarchy.

use crate::cascade::{Cascade, SourcePair};
use crate::document;
use crate::error::DefaultsError;
use crate::source::{Content, DefaultsSource};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::warn;

/// Name of the per-component config document describing where the
/// component's defaults file lives.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// One component's contribution to a family: a directory holding its
/// `config.yml`, which in turn names its defaults file.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    name: String,
    dir: PathBuf,
    search_root: Option<PathBuf>,
    user_dir: Option<PathBuf>,
}

/// Where a component's defaults document lives, per its config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsLocation {
    /// Full path of the system defaults file.
    pub path: PathBuf,
    /// Bare file name, from which the user override location
    /// `<home>/.<file_name>` is derived.
    pub file_name: String,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            search_root: None,
            user_dir: None,
        }
    }

    /// Allow `config.yml` (and an install-dir-less defaults file) to be
    /// found in an ancestor of the component directory, up to and
    /// including `root`. Without this, only the component directory itself
    /// is consulted.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    /// Override the directory searched for the user override file.
    /// Defaults to the process home directory.
    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load this component's config document.
    pub fn config(&self) -> Result<DefaultsSource, DefaultsError> {
        let path = self.find_file(CONFIG_FILE_NAME)?;
        DefaultsSource::open_with_key(path, document::CONFIG_KEY)
    }

    /// Determine where this component's system defaults file lives, or
    /// `None` if its config declares no defaults file (`name: null`).
    ///
    /// A null `install-dir` means the defaults file sits alongside the
    /// config document and is searched for the same way; otherwise the
    /// file is `<install-dir>/<name>`.
    pub fn defaults_location(&self) -> Result<Option<DefaultsLocation>, DefaultsError> {
        let config = self.config()?;

        let Some(file_name) = optional_string(&config, &["defaults", "name"])? else {
            return Ok(None);
        };

        let path = match optional_string(&config, &["defaults", "install-dir"])? {
            Some(install_dir) => PathBuf::from(install_dir).join(&file_name),
            None => self.find_file(&file_name)?,
        };

        Ok(Some(DefaultsLocation { path, file_name }))
    }

    /// Location of the user override file for a defaults file name, if a
    /// home (or substitute) directory is known. Absence of the file itself
    /// is expected and handled by the pair builder.
    pub fn user_file(&self, file_name: &str) -> Option<PathBuf> {
        let base = self.user_dir.clone().or_else(dirs::home_dir)?;
        Some(base.join(format!(".{file_name}")))
    }

    fn find_file(&self, file_name: &str) -> Result<PathBuf, DefaultsError> {
        for dir in self.dir.ancestors() {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            match &self.search_root {
                Some(root) if dir != root.as_path() => continue,
                _ => break,
            }
        }
        Err(DefaultsError::SourceNotFound {
            path: self.dir.join(file_name),
        })
    }
}

fn optional_string(
    config: &DefaultsSource,
    path: &[&str],
) -> Result<Option<String>, DefaultsError> {
    match config.content(path)? {
        Content::Leaf(Value::Null) => Ok(None),
        Content::Leaf(Value::String(s)) => Ok(Some(s)),
        other => Err(DefaultsError::FormatInvalid {
            origin: config.origin().to_path_buf(),
            reason: format!("expected string or null at '{}', got {other:?}", path.join("/")),
        }),
    }
}

/// Build the source pairs for an ordered component list.
///
/// A component whose config declares no defaults file contributes no pair.
/// A missing or malformed system file aborts construction; a missing user
/// file is silently tolerated, and any other user-file failure degrades
/// that pair to system-only with a warning.
pub fn build_pairs(components: &[ComponentSpec]) -> Result<Vec<SourcePair>, DefaultsError> {
    let mut pairs = Vec::new();

    for spec in components {
        let Some(location) = spec.defaults_location()? else {
            continue;
        };
        let system = DefaultsSource::open(&location.path)?;

        let user = spec.user_file(&location.file_name).and_then(|path| {
            match DefaultsSource::open(&path) {
                Ok(source) => Some(source),
                Err(DefaultsError::SourceNotFound { .. }) => None,
                Err(err) => {
                    warn!(component = %spec.name(), origin = %path.display(), %err,
                        "failed to load user defaults");
                    warn!(component = %spec.name(), "using system defaults solely");
                    None
                }
            }
        });

        pairs.push(SourcePair::new(system, user));
    }

    Ok(pairs)
}

/// Family-keyed cascade cache.
///
/// Construction happens at most once per family: the cache mutex is held
/// across the build, so racing threads cannot duplicate file loads or
/// observe a torn pair list.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    components: Vec<ComponentSpec>,
    cascade: Option<Arc<Cascade>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register (or re-register) a family's ordered component list,
    /// most-derived component first. Re-registration drops any cached
    /// cascade.
    pub fn register(&self, family: impl Into<String>, components: Vec<ComponentSpec>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            family.into(),
            Entry {
                components,
                cascade: None,
            },
        );
    }

    /// The cascade for a family, building and caching it on first use.
    /// An unregistered family is [`DefaultsError::NoDefaultsRegistered`].
    pub fn cascade(&self, family: &str) -> Result<Arc<Cascade>, DefaultsError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .get_mut(family)
            .ok_or_else(|| DefaultsError::NoDefaultsRegistered {
                family: family.to_string(),
            })?;

        if let Some(cascade) = &entry.cascade {
            return Ok(Arc::clone(cascade));
        }

        let pairs = build_pairs(&entry.components)?;
        let cascade = Arc::new(Cascade::new(family, pairs));
        entry.cascade = Some(Arc::clone(&cascade));
        Ok(cascade)
    }
}
