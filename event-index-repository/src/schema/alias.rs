//! Alias resolution between query-facing field names and canonical paths.

use std::collections::HashMap;

use crate::errors::{EventIndexError, UnresolvedAlias};

/// Bidirectional alias ↔ canonical path table.
///
/// Built once by [`SchemaBuilder::build`](super::SchemaBuilder::build) and
/// immutable afterwards, so it can be shared across threads without locking.
/// Lookups never fail hard: unknown input yields `None`, and [`require`]
/// turns that into an [`UnresolvedAlias`] for the query layer to report.
///
/// [`require`]: AliasResolver::require
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    by_alias: HashMap<String, String>,
    by_path: HashMap<String, String>,
}

impl AliasResolver {
    /// Register an alias for a path, rejecting empty, padded or duplicate aliases.
    pub(crate) fn insert(&mut self, alias: &str, path: &str) -> Result<(), EventIndexError> {
        if alias.trim().is_empty() {
            return Err(EventIndexError::schema_conflict(format!(
                "Field '{}' declares an empty alias",
                path
            )));
        }
        // Stored verbatim, so a padded alias would never resolve.
        if alias.trim() != alias {
            return Err(EventIndexError::schema_conflict(format!(
                "Alias '{}' of field '{}' has surrounding whitespace",
                alias, path
            )));
        }

        if let Some(existing) = self.by_alias.get(alias) {
            return Err(EventIndexError::schema_conflict(format!(
                "Alias '{}' is declared by both '{}' and '{}'",
                alias, existing, path
            )));
        }

        self.by_alias.insert(alias.to_string(), path.to_string());
        self.by_path.insert(path.to_string(), alias.to_string());
        Ok(())
    }

    /// Canonical path for an alias.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.by_alias.get(alias).map(String::as_str)
    }

    /// Alias for a canonical path.
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Resolve an alias or report it as an unknown field.
    pub fn require(&self, alias: &str) -> Result<&str, UnresolvedAlias> {
        self.resolve(alias)
            .ok_or_else(|| UnresolvedAlias::new(alias))
    }

    /// Resolve a list of aliases, failing on the first unknown one.
    pub fn resolve_all(&self, aliases: &[&str]) -> Result<Vec<&str>, UnresolvedAlias> {
        aliases.iter().map(|alias| self.require(alias)).collect()
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }

    /// Iterate over `(alias, path)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_alias
            .iter()
            .map(|(alias, path)| (alias.as_str(), path.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AliasResolver {
        let mut resolver = AliasResolver::default();
        resolver.insert("os", "os").unwrap();
        resolver
            .insert("version", "data.@version")
            .unwrap();
        resolver
    }

    #[test]
    fn test_resolve_and_alias_of() {
        let resolver = resolver();

        assert_eq!(resolver.resolve("version"), Some("data.@version"));
        assert_eq!(resolver.alias_of("data.@version"), Some("version"));
        assert_eq!(resolver.resolve("nope"), None);
        assert_eq!(resolver.alias_of("data.nope"), None);
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_insert_duplicate_alias() {
        let mut resolver = resolver();
        let result = resolver.insert("os", "data.@environment.os_name");

        assert!(matches!(
            result.unwrap_err(),
            EventIndexError::SchemaConflict(_)
        ));
        assert_eq!(resolver.resolve("os"), Some("os"));
    }

    #[test]
    fn test_insert_empty_alias() {
        let mut resolver = AliasResolver::default();
        assert!(resolver.insert("  ", "data.@level").is_err());
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_insert_padded_alias() {
        let mut resolver = AliasResolver::default();
        let result = resolver.insert(" level", "data.@level");

        assert!(matches!(
            result.unwrap_err(),
            EventIndexError::SchemaConflict(_)
        ));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_require_unknown() {
        let resolver = resolver();
        let err = resolver.require("browser").unwrap_err();

        assert_eq!(err.alias, "browser");
        assert_eq!(err.to_string(), "Unknown field: browser");
    }

    #[test]
    fn test_resolve_all() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_all(&["os", "version"]).unwrap(),
            vec!["os", "data.@version"]
        );
        assert_eq!(
            resolver.resolve_all(&["os", "tag"]).unwrap_err(),
            UnresolvedAlias::new("tag")
        );
    }
}
