//! Configuration-element extension registry.
//!
//! Plugins contribute new material/element kinds at server startup; the
//! loader consults the registry (read-only) while validating a candidate
//! snapshot. The registry is constructed explicitly and injected — never
//! reached through ambient/global access.

use std::collections::BTreeSet;

use crate::types::MaterialKind;

/// Built-in material kinds every server recognizes.
const BUILTIN_KINDS: &[&str] = &["git", "hg", "svn", "dependency"];

/// Registry of recognized configuration-element kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRegistry {
    kinds: BTreeSet<String>,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self {
            kinds: BUILTIN_KINDS.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

impl ElementRegistry {
    /// Registry seeded with the built-in kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin-contributed element kind. Idempotent.
    pub fn register(&mut self, kind: MaterialKind) {
        self.kinds.insert(kind.0);
    }

    /// Whether `kind` is a recognized element kind.
    pub fn is_registered(&self, kind: &MaterialKind) -> bool {
        self.kinds.contains(&kind.0)
    }

    /// All recognized kinds, sorted.
    pub fn kinds(&self) -> Vec<MaterialKind> {
        self.kinds.iter().map(|k| MaterialKind::from(k.as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_are_registered() {
        let registry = ElementRegistry::new();
        for kind in BUILTIN_KINDS {
            assert!(registry.is_registered(&MaterialKind::from(*kind)));
        }
    }

    #[test]
    fn unknown_kind_is_not_registered() {
        let registry = ElementRegistry::new();
        assert!(!registry.is_registered(&MaterialKind::from("package-repo")));
    }

    #[test]
    fn register_adds_plugin_kind() {
        let mut registry = ElementRegistry::new();
        registry.register(MaterialKind::from("package-repo"));
        assert!(registry.is_registered(&MaterialKind::from("package-repo")));
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = ElementRegistry::new();
        let before = registry.kinds().len();
        registry.register(MaterialKind::from("git"));
        assert_eq!(registry.kinds().len(), before);
    }

    #[test]
    fn kinds_are_sorted() {
        let registry = ElementRegistry::new();
        let kinds = registry.kinds();
        let mut sorted = kinds.clone();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(kinds, sorted);
    }
}
