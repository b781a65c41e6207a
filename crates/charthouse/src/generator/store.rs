//! Relationship storage and conflict resolution
//!
//! A deduplicating collection keyed by (root, leaf, root-label, leaf-label).
//! At most one relationship exists per identity key; conflicts resolve by
//! symbol precedence, so the final contents do not depend on insertion
//! order. Iteration for rendering is explicitly sorted — the map's own
//! order carries no meaning.

use std::collections::HashMap;

use tracing::trace;

use crate::core::{PrecedenceTable, Relationship, RelationshipKey};

/// Precedence-aware relationship set
#[derive(Debug, Clone, Default)]
pub struct RelationshipStore {
    precedence: PrecedenceTable,
    items: HashMap<RelationshipKey, Relationship>,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precedence(precedence: PrecedenceTable) -> Self {
        Self {
            precedence,
            items: HashMap::new(),
        }
    }

    /// Insert a candidate, resolving identity-key conflicts by precedence.
    ///
    /// A stored entry is replaced when the candidate ranks strictly better
    /// or equal (most-recent wins on ties); otherwise the candidate is
    /// discarded.
    pub fn add(&mut self, candidate: Relationship) {
        let key = candidate.key();
        match self.items.get(&key) {
            Some(stored)
                if self.precedence.rank(&stored.symbol)
                    < self.precedence.rank(&candidate.symbol) =>
            {
                trace!(
                    stored = %stored.symbol,
                    candidate = %candidate.symbol,
                    "Discarding lower-precedence relationship candidate"
                );
            }
            _ => {
                self.items.insert(key, candidate);
            }
        }
    }

    /// Remove every listed relationship; other entries are untouched
    pub fn remove_all<'a>(&mut self, relationships: impl IntoIterator<Item = &'a Relationship>) {
        for relationship in relationships {
            self.items.remove(&relationship.key());
        }
    }

    /// Union with another store, applying the same conflict resolution
    pub fn merge(&mut self, other: RelationshipStore) {
        for (_, relationship) in other.items {
            self.add(relationship);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, relationship: &Relationship) -> bool {
        self.items.contains_key(&relationship.key())
    }

    pub fn get(&self, key: &RelationshipKey) -> Option<&Relationship> {
        self.items.get(key)
    }

    /// Deterministic render order: precedence rank, then (root, leaf)
    /// identifiers lexicographically
    pub fn iter_sorted(&self) -> Vec<&Relationship> {
        let mut relationships: Vec<&Relationship> = self.items.values().collect();
        relationships.sort_by(|a, b| {
            self.precedence
                .rank(&a.symbol)
                .cmp(&self.precedence.rank(&b.symbol))
                .then_with(|| a.root.identifier.cmp(&b.root.identifier))
                .then_with(|| a.leaf.identifier.cmp(&b.leaf.identifier))
        });
        relationships
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RelationshipKind, TypeRef};

    fn edge(root: &str, leaf: &str, kind: RelationshipKind) -> Relationship {
        Relationship::new(TypeRef::new(root), TypeRef::new(leaf), kind)
    }

    #[test]
    fn test_add_distinct_keys() {
        let mut store = RelationshipStore::new();
        store.add(edge("A", "B", RelationshipKind::Aggregation));
        store.add(edge("A", "C", RelationshipKind::Aggregation));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_higher_precedence_replaces_either_order() {
        let aggregation = edge("A", "B", RelationshipKind::Aggregation);
        let inheritance = edge("A", "B", RelationshipKind::Inheritance);

        let mut store = RelationshipStore::new();
        store.add(aggregation.clone());
        store.add(inheritance.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter_sorted()[0].symbol, "<|--");

        let mut store = RelationshipStore::new();
        store.add(inheritance);
        store.add(aggregation);
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter_sorted()[0].symbol, "<|--");
    }

    #[test]
    fn test_tie_keeps_most_recent() {
        let first = edge("A", "B", RelationshipKind::Aggregation).with_center_label("first");
        let second = edge("A", "B", RelationshipKind::Aggregation).with_center_label("second");

        let mut store = RelationshipStore::new();
        store.add(first);
        store.add(second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter_sorted()[0].center_label, "second");
    }

    #[test]
    fn test_custom_symbol_ranks_below_known_kinds() {
        let custom = Relationship::with_symbol(TypeRef::new("A"), TypeRef::new("B"), "..custom..>");
        let mut store = RelationshipStore::new();
        store.add(custom);
        store.add(edge("A", "B", RelationshipKind::Association));
        assert_eq!(store.iter_sorted()[0].symbol, "-->");
    }

    #[test]
    fn test_remove_all_leaves_others_untouched() {
        let target = edge("A", "B", RelationshipKind::Aggregation);
        let other = edge("A", "C", RelationshipKind::Aggregation);

        let mut store = RelationshipStore::new();
        store.add(target.clone());
        store.add(other.clone());
        store.remove_all([&target]);

        assert!(!store.contains(&target));
        assert!(store.contains(&other));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_resolves_conflicts() {
        let mut left = RelationshipStore::new();
        left.add(edge("A", "B", RelationshipKind::Aggregation));
        left.add(edge("A", "C", RelationshipKind::Nesting));

        let mut right = RelationshipStore::new();
        right.add(edge("A", "B", RelationshipKind::Composition));
        right.add(edge("D", "E", RelationshipKind::Realization));

        left.merge(right);
        assert_eq!(left.len(), 3);
        let key = edge("A", "B", RelationshipKind::Composition).key();
        assert_eq!(left.get(&key).unwrap().symbol, "*--");
    }

    #[test]
    fn test_iter_sorted_orders_by_rank_then_names() {
        let mut store = RelationshipStore::new();
        store.add(edge("B", "X", RelationshipKind::Aggregation));
        store.add(edge("A", "Y", RelationshipKind::Aggregation));
        store.add(edge("Z", "Z2", RelationshipKind::Inheritance));

        let symbols: Vec<String> = store
            .iter_sorted()
            .iter()
            .map(|r| format!("{} {}", r.root.identifier, r.symbol))
            .collect();
        assert_eq!(symbols, vec!["Z <|--", "A o--", "B o--"]);
    }
}
