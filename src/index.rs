//! The dependency index: a reverse map from source questions to the items
//! whose visibility depends on them.
//!
//! Built once per form definition and cached by definition identity. The
//! index is a pure function of the definition; it must be rebuilt whenever
//! the definition changes.

use crate::model::{CombineBehavior, FormDefinition, FormNode, VisibilityRule};
use ahash::{AHashMap, AHashSet};
use std::sync::Arc;

/// One indexed dependent: an item whose visibility hangs off at least one
/// source question.
///
/// Carries the item's full rule set, not just the rules watching any single
/// source, so combine semantics stay correct however the entry is reached.
#[derive(Debug, Clone)]
pub struct DependentEntry {
    /// linkId of the conditionally visible item.
    pub link_id: String,
    pub rules: Vec<VisibilityRule>,
    pub combine: CombineBehavior,
}

/// Reverse visibility map for one form definition.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    dependents: Vec<DependentEntry>,
    /// source linkId -> indices into `dependents`.
    by_source: AHashMap<String, Vec<usize>>,
    /// dependent linkId -> index into `dependents`.
    by_dependent: AHashMap<String, usize>,
    /// Every linkId that exists anywhere in the definition. Rules whose
    /// source is missing from this set can never fire.
    known_link_ids: AHashSet<String>,
}

impl DependencyIndex {
    /// Walks the definition depth-first in pre-order and indexes every item
    /// that declares visibility rules, keyed by each distinct source it
    /// references.
    ///
    /// A rule referencing a linkId that exists nowhere in the definition is
    /// indexed all the same; it is treated as permanently unmatched during
    /// evaluation rather than rejected here. Lenient, like real-world form
    /// authoring needs.
    pub fn build(definition: &FormDefinition) -> Self {
        let mut index = Self::default();
        for item in &definition.items {
            index.index_node(item);
        }
        log::debug!(
            "built dependency index: {} dependents, {} sources, {} known linkIds",
            index.dependents.len(),
            index.by_source.len(),
            index.known_link_ids.len()
        );
        index
    }

    fn index_node(&mut self, node: &FormNode) {
        self.known_link_ids.insert(node.link_id.clone());

        if !node.rules.is_empty() && !self.by_dependent.contains_key(&node.link_id) {
            let entry_index = self.dependents.len();
            self.dependents.push(DependentEntry {
                link_id: node.link_id.clone(),
                rules: node.rules.clone(),
                combine: node.combine,
            });
            self.by_dependent.insert(node.link_id.clone(), entry_index);

            let mut sources = AHashSet::new();
            for rule in &node.rules {
                rule.collect_sources(&mut sources);
            }
            for source in sources {
                self.by_source.entry(source).or_default().push(entry_index);
            }
        }

        for child in &node.children {
            self.index_node(child);
        }
    }

    /// The index entry for a conditionally visible item, if it has one.
    pub fn dependent(&self, link_id: &str) -> Option<&DependentEntry> {
        self.by_dependent
            .get(link_id)
            .map(|&entry_index| &self.dependents[entry_index])
    }

    /// Every item whose visibility depends on the given source question.
    /// Callers re-rendering on answer change use this for fan-out.
    pub fn dependents_of(&self, source: &str) -> impl Iterator<Item = &DependentEntry> {
        self.by_source
            .get(source)
            .into_iter()
            .flatten()
            .map(|&entry_index| &self.dependents[entry_index])
    }

    /// Whether a linkId exists anywhere in the definition.
    pub fn knows_link_id(&self, link_id: &str) -> bool {
        self.known_link_ids.contains(link_id)
    }

    /// Number of indexed dependents.
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}

/// Explicit per-definition cache for dependency indexes.
///
/// Owned by whichever layer holds the definitions, keyed by caller-supplied
/// definition identity. Invalidation is manual: discard the entry when the
/// definition it was built from changes. Deliberately not a process-wide
/// singleton.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: AHashMap<String, Arc<DependencyIndex>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached index for `key`, building it from `definition` on
    /// first use.
    pub fn get_or_build(&mut self, key: &str, definition: &FormDefinition) -> Arc<DependencyIndex> {
        if let Some(cached) = self.entries.get(key) {
            return Arc::clone(cached);
        }
        log::debug!("index cache miss for definition '{}'", key);
        let built = Arc::new(DependencyIndex::build(definition));
        self.entries.insert(key.to_string(), Arc::clone(&built));
        built
    }

    /// Drops the cached index for `key`. Returns whether an entry existed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
