//! Alias mapping tables.
//!
//! A table is matched against a module name in a fixed order:
//! - Direct key hit (the name is itself a key, flags ignored)
//! - Exact pass (`{ value, exactMatch: true }` entries only)
//! - Partial pass (`alias` or `alias/...`, prefix rewritten)
//! - Wildcard handler
//! - Identity fallback

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Catch-all handler consulted when no alias matches.
pub type WildcardFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// A single alias rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEntry {
    /// Plain replacement string; matches the alias and any `alias/...` path.
    Direct(String),
    /// Replacement with an explicit flag. With `exact_match` set the rule
    /// never rewrites `alias/...` paths.
    Qualified { value: String, exact_match: bool },
}

impl MappingEntry {
    /// Create a direct alias.
    pub fn direct(value: impl Into<String>) -> Self {
        Self::Direct(value.into())
    }

    /// Create a qualified alias that only matches the exact name.
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Qualified {
            value: value.into(),
            exact_match: true,
        }
    }

    /// Create a qualified alias.
    pub fn qualified(value: impl Into<String>, exact_match: bool) -> Self {
        Self::Qualified {
            value: value.into(),
            exact_match,
        }
    }

    /// The replacement name.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Direct(value) | Self::Qualified { value, .. } => value,
        }
    }

    /// Whether the entry is restricted to exact matches.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(
            self,
            Self::Qualified {
                exact_match: true,
                ..
            }
        )
    }

    /// Decode a configuration value.
    ///
    /// Accepts a string or an object carrying a string `value` (with an
    /// optional boolean `exactMatch`). Anything else yields `None`.
    #[must_use]
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(s) => Some(Self::Direct(s.clone())),
            Value::Object(obj) => {
                let value = obj.get("value")?.as_str()?;
                let exact_match = obj
                    .get("exactMatch")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Some(Self::qualified(value, exact_match))
            }
            _ => None,
        }
    }

    /// Encode back into the configuration shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Direct(value) => Value::String(value.clone()),
            Self::Qualified { value, exact_match } => serde_json::json!({
                "value": value,
                "exactMatch": exact_match,
            }),
        }
    }
}

impl From<&str> for MappingEntry {
    fn from(value: &str) -> Self {
        Self::direct(value)
    }
}

impl From<String> for MappingEntry {
    fn from(value: String) -> Self {
        Self::Direct(value)
    }
}

/// Which rule produced a table's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    DirectKey,
    ExactMatch,
    PartialMatch,
    Wildcard,
    Identity,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DirectKey => "direct_key",
            Self::ExactMatch => "exact_match",
            Self::PartialMatch => "partial_match",
            Self::Wildcard => "wildcard",
            Self::Identity => "identity",
        };
        f.write_str(s)
    }
}

/// Outcome of matching one name against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatch {
    /// Rule that fired.
    pub kind: MatchKind,
    /// Alias key that matched, if the rule was keyed.
    pub alias: Option<String>,
    /// Resulting name.
    pub resolved: String,
}

impl AliasMatch {
    fn keyed(kind: MatchKind, alias: &str, resolved: String) -> Self {
        Self {
            kind,
            alias: Some(alias.to_string()),
            resolved,
        }
    }

    /// True unless the name fell through to identity.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.kind != MatchKind::Identity
    }
}

/// Insertion-ordered alias table with an optional wildcard handler.
#[derive(Clone, Default)]
pub struct MappingTable {
    entries: IndexMap<String, MappingEntry>,
    wildcard: Option<Arc<WildcardFn>>,
}

impl fmt::Debug for MappingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingTable")
            .field("entries", &self.entries)
            .field("wildcard", &self.wildcard.is_some())
            .finish()
    }
}

impl MappingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias, builder style.
    pub fn with(mut self, alias: impl Into<String>, entry: impl Into<MappingEntry>) -> Self {
        self.insert(alias, entry);
        self
    }

    /// Install the wildcard handler, builder style.
    pub fn with_wildcard<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.set_wildcard(handler);
        self
    }

    /// Insert or overwrite an alias. An overwritten alias keeps its position.
    pub fn insert(&mut self, alias: impl Into<String>, entry: impl Into<MappingEntry>) {
        self.entries.insert(alias.into(), entry.into());
    }

    /// Install or replace the wildcard handler.
    pub fn set_wildcard<F>(&mut self, handler: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.wildcard = Some(Arc::new(handler));
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.wildcard.is_some()
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&MappingEntry> {
        self.entries.get(alias)
    }

    /// Number of alias entries (the wildcard is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has neither entries nor a wildcard handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.wildcard.is_none()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow merge: entries from `other` overwrite duplicates, new aliases
    /// are appended, and a wildcard in `other` replaces ours.
    pub fn merge(&mut self, other: MappingTable) {
        for (alias, entry) in other.entries {
            self.entries.insert(alias, entry);
        }
        if other.wildcard.is_some() {
            self.wildcard = other.wildcard;
        }
    }

    /// Build a table from a JSON object, skipping malformed entries.
    ///
    /// Non-object input yields an empty table.
    #[must_use]
    pub fn from_json(raw: &Value) -> Self {
        match raw.as_object() {
            Some(obj) => Self::from_raw_entries(obj.iter().map(|(k, v)| (k.clone(), v))),
            None => Self::default(),
        }
    }

    fn from_raw_entries<'a>(raw: impl IntoIterator<Item = (String, &'a Value)>) -> Self {
        let mut table = Self::default();
        for (alias, value) in raw {
            match MappingEntry::from_json(value) {
                Some(entry) => table.insert(alias, entry),
                None => debug!(alias = %alias, "Skipping malformed mapping entry"),
            }
        }
        table
    }

    /// Map `name` through this table, always producing a name.
    #[must_use]
    pub fn resolve_one(&self, name: &str) -> String {
        self.lookup(name).resolved
    }

    /// Map `name` through this table, reporting which rule fired.
    #[must_use]
    pub fn lookup(&self, name: &str) -> AliasMatch {
        if let Some(entry) = self.entries.get(name) {
            return AliasMatch::keyed(MatchKind::DirectKey, name, entry.value().to_string());
        }

        self.match_exact(name)
            .or_else(|| self.match_partial(name))
            .or_else(|| self.match_wildcard(name))
            .unwrap_or_else(|| AliasMatch {
                kind: MatchKind::Identity,
                alias: None,
                resolved: name.to_string(),
            })
    }

    fn match_exact(&self, name: &str) -> Option<AliasMatch> {
        self.entries
            .iter()
            .find(|(alias, entry)| entry.is_exact() && alias.as_str() == name)
            .map(|(alias, entry)| {
                AliasMatch::keyed(MatchKind::ExactMatch, alias, entry.value().to_string())
            })
    }

    fn match_partial(&self, name: &str) -> Option<AliasMatch> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_exact())
            .find_map(|(alias, entry)| {
                let remainder = match_alias_prefix(alias, name)?;
                let resolved = format!("{}{remainder}", entry.value());
                Some(AliasMatch::keyed(MatchKind::PartialMatch, alias, resolved))
            })
    }

    fn match_wildcard(&self, name: &str) -> Option<AliasMatch> {
        let handler = self.wildcard.as_ref()?;
        let resolved = handler(name)?;
        Some(AliasMatch {
            kind: MatchKind::Wildcard,
            alias: None,
            resolved,
        })
    }
}

/// Match an alias against a name on a `/` boundary.
///
/// Returns the remainder after the alias (`""` for an exact hit, `"/..."`
/// for a path below the alias).
fn match_alias_prefix<'a>(alias: &str, name: &'a str) -> Option<&'a str> {
    let rest = name.strip_prefix(alias)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

impl<K, E> FromIterator<(K, E)> for MappingTable
where
    K: Into<String>,
    E: Into<MappingEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (alias, entry) in iter {
            table.insert(alias, entry);
        }
        table
    }
}

/// Serializes entries only; a wildcard handler has no data form.
impl Serialize for MappingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (alias, entry) in &self.entries {
            map.serialize_entry(alias, &entry.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MappingTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_raw_entries(raw.iter().map(|(k, v)| (k.clone(), v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn liferay_direct() -> MappingTable {
        MappingTable::new().with("liferay", "liferay@1.0.0")
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = MappingTable::new();
        assert!(table.is_empty());
        assert_eq!(table.resolve_one("liferay/html/js/ac.es"), "liferay/html/js/ac.es");
        assert_eq!(table.lookup("x").kind, MatchKind::Identity);
    }

    #[test]
    fn test_direct_alias_exact_name() {
        let m = liferay_direct().lookup("liferay");
        assert_eq!(m.kind, MatchKind::DirectKey);
        assert_eq!(m.resolved, "liferay@1.0.0");
    }

    #[test]
    fn test_direct_alias_rewrites_prefix() {
        let m = liferay_direct().lookup("liferay/html/js/ac.es");
        assert_eq!(m.kind, MatchKind::PartialMatch);
        assert_eq!(m.alias.as_deref(), Some("liferay"));
        assert_eq!(m.resolved, "liferay@1.0.0/html/js/ac.es");
    }

    #[test]
    fn test_partial_requires_slash_boundary() {
        let table = liferay_direct();
        assert_eq!(table.resolve_one("liferay-ui"), "liferay-ui");
        assert_eq!(table.resolve_one("liferayx/a"), "liferayx/a");
    }

    #[test]
    fn test_exact_flag_blocks_prefix() {
        let table = MappingTable::new().with("liferay", MappingEntry::exact("liferay@1.0.0"));
        assert_eq!(table.resolve_one("liferay/html/js/ac.es"), "liferay/html/js/ac.es");
        assert_eq!(table.resolve_one("liferay"), "liferay@1.0.0");
    }

    #[test]
    fn test_direct_key_ignores_exact_flag() {
        let table =
            MappingTable::new().with("liferay", MappingEntry::qualified("liferay@2.0.0", false));
        let m = table.lookup("liferay");
        assert_eq!(m.kind, MatchKind::DirectKey);
        assert_eq!(m.resolved, "liferay@2.0.0");
    }

    #[test]
    fn test_qualified_non_exact_rewrites_prefix() {
        let table =
            MappingTable::new().with("liferay", MappingEntry::qualified("liferay@2.0.0", false));
        assert_eq!(table.resolve_one("liferay/a/b"), "liferay@2.0.0/a/b");
    }

    #[test]
    fn test_partial_first_in_insertion_order_wins() {
        let table = MappingTable::new()
            .with("a", "first")
            .with("a/b", "second");
        // "a" is inserted first, so it claims "a/b/c" even though "a/b" is longer.
        assert_eq!(table.resolve_one("a/b/c"), "first/b/c");

        let reversed = MappingTable::new()
            .with("a/b", "second")
            .with("a", "first");
        assert_eq!(reversed.resolve_one("a/b/c"), "second/c");
    }

    #[test]
    fn test_wildcard_fallback() {
        let table = MappingTable::new().with_wildcard(|name| Some(name.to_uppercase()));
        let m = table.lookup("foo");
        assert_eq!(m.kind, MatchKind::Wildcard);
        assert_eq!(m.resolved, "FOO");
    }

    #[test]
    fn test_wildcard_only_after_aliases() {
        let table = liferay_direct().with_wildcard(|_| Some("wild".to_string()));
        assert_eq!(table.resolve_one("liferay/a"), "liferay@1.0.0/a");
        assert_eq!(table.resolve_one("other"), "wild");
    }

    #[test]
    fn test_wildcard_none_falls_through_to_identity() {
        let table = MappingTable::new().with_wildcard(|name| {
            name.starts_with("x").then(|| format!("mapped-{name}"))
        });
        assert_eq!(table.resolve_one("xy"), "mapped-xy");
        assert_eq!(table.lookup("ab").kind, MatchKind::Identity);
    }

    #[test]
    fn test_literal_star_alias_is_ordinary() {
        let table = MappingTable::new().with("*", "star");
        assert!(!table.has_wildcard());
        assert_eq!(table.resolve_one("*"), "star");
        assert_eq!(table.resolve_one("foo"), "foo");
    }

    #[test]
    fn test_from_json_skips_malformed_entries() {
        let table = MappingTable::from_json(&json!({
            "good": "good@1.0.0",
            "number": 42,
            "no_value": { "exactMatch": true },
            "bad_value": { "value": 7 },
            "exact": { "value": "exact@1.0.0", "exactMatch": true },
            "null": null
        }));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("good"), Some(&MappingEntry::direct("good@1.0.0")));
        assert_eq!(table.get("exact"), Some(&MappingEntry::exact("exact@1.0.0")));
        assert_eq!(table.resolve_one("number/x"), "number/x");
    }

    #[test]
    fn test_from_json_exact_match_defaults_false() {
        let table = MappingTable::from_json(&json!({ "a": { "value": "b" } }));
        assert_eq!(table.get("a"), Some(&MappingEntry::qualified("b", false)));
        assert_eq!(table.resolve_one("a/c"), "b/c");
    }

    #[test]
    fn test_from_json_non_object_is_empty() {
        assert!(MappingTable::from_json(&json!(["a", "b"])).is_empty());
        assert!(MappingTable::from_json(&json!("a")).is_empty());
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let table: MappingTable =
            serde_json::from_str(r#"{ "z": "1", "a": "2", "m": { "value": "3" } }"#).unwrap();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_merge_overwrites_in_place_and_appends() {
        let mut table = MappingTable::new().with("a", "1").with("b", "2");
        table.merge(MappingTable::new().with("c", "3").with("a", "4"));

        let entries: Vec<(&str, &str)> = table.iter().map(|(k, v)| (k, v.value())).collect();
        assert_eq!(entries, [("a", "4"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn test_merge_wildcard_replaced_only_when_present() {
        let mut table = MappingTable::new().with_wildcard(|_| Some("one".to_string()));
        table.merge(MappingTable::new().with("a", "b"));
        assert_eq!(table.resolve_one("zzz"), "one");

        table.merge(MappingTable::new().with_wildcard(|_| Some("two".to_string())));
        assert_eq!(table.resolve_one("zzz"), "two");
    }

    #[test]
    fn test_serialize_round_trips_config_shape() {
        let table = MappingTable::new()
            .with("a", "b")
            .with("c", MappingEntry::exact("d"))
            .with_wildcard(|_| None);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({ "a": "b", "c": { "value": "d", "exactMatch": true } })
        );
    }
}
