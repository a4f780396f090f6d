//! Path to environment-variable naming and live environment lookup.
//!
//! Environment reads are never cached; every query re-checks the process
//! environment, so toggling a variable between two calls is observable
//! without rebuilding any source.

/// Derive the canonical environment-variable name for a path: upper-case
/// each segment, join with `_`, then fold every ASCII punctuation character
/// to `_` (so `install-dir` becomes `INSTALL_DIR`).
///
/// Distinct leaf paths in a well-formed document are expected not to
/// collide; a colliding document is an authoring error.
pub fn variable_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_punctuation() { '_' } else { c })
        .collect()
}

/// Read the environment override for `path`, if any. The value is always
/// the raw variable string; no coercion to the overridden value's original
/// kind is performed.
pub fn resolve<S: AsRef<str>>(path: &[S]) -> Option<String> {
    lookup(&variable_name(path))
}

/// Read a variable by its already-derived name. The empty name (empty
/// path, no prefix) never matches.
pub fn lookup(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name_joins_and_uppercases() {
        assert_eq!(
            variable_name(&["group1", "subgroup1", "value1"]),
            "GROUP1_SUBGROUP1_VALUE1"
        );
    }

    #[test]
    fn test_variable_name_folds_punctuation() {
        assert_eq!(variable_name(&["group-a", "x.y"]), "GROUP_A_X_Y");
        assert_eq!(variable_name(&["install-dir"]), "INSTALL_DIR");
    }

    #[test]
    fn test_variable_name_empty_path() {
        assert_eq!(variable_name::<&str>(&[]), "");
    }

    #[test]
    fn test_lookup_empty_name_is_none() {
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_resolve_round_trip() {
        let path = ["env-round", "trip1"];
        let name = variable_name(&path);
        assert_eq!(name, "ENV_ROUND_TRIP1");

        unsafe { std::env::set_var(&name, "exactly-this") };
        assert_eq!(resolve(&path).as_deref(), Some("exactly-this"));
        unsafe { std::env::remove_var(&name) };
        assert_eq!(resolve(&path), None);
    }
}
