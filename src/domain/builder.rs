//! Tree builder for turning seed records into a [`TaxonTree`].

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::{Taxon, TaxonTree};
use crate::domain::entities::NodeId;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::seed::{SeedTaxon, DINOSAUR_PHYLOGENY};

/// Constructs taxon trees from `(id, name, parent id)` records.
///
/// The first record must be the only one without a parent; every parent id
/// has to appear before the records that reference it. Children keep the
/// order in which they are listed.
pub struct TreeBuilder {
    index_by_id: HashMap<String, NodeId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            index_by_id: HashMap::new(),
        }
    }

    /// The bundled Amniota phylogeny.
    pub fn dinosaur_phylogeny() -> DomainResult<TaxonTree> {
        Self::new().build(DINOSAUR_PHYLOGENY)
    }

    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&mut self, records: &[SeedTaxon<'_>]) -> DomainResult<TaxonTree> {
        // Reset state for a fresh build
        self.index_by_id.clear();

        let (first, rest) = records
            .split_first()
            .ok_or_else(|| DomainError::InvalidSeed("no records".to_string()))?;
        if let Some(parent) = first.parent {
            return Err(DomainError::InvalidSeed(format!(
                "first record '{}' must be the root but names parent '{}'",
                first.id, parent
            )));
        }

        let mut tree = TaxonTree::from_root(Taxon::new(first.name)?.with_id(first.id));
        self.index_by_id.insert(first.id.to_string(), tree.root());

        for record in rest {
            let parent_id = record.parent.ok_or_else(|| {
                DomainError::InvalidSeed(format!("second root '{}'", record.id))
            })?;
            if self.index_by_id.contains_key(record.id) {
                return Err(DomainError::InvalidSeed(format!(
                    "duplicate id '{}'",
                    record.id
                )));
            }
            let parent = *self
                .index_by_id
                .get(parent_id)
                .ok_or_else(|| DomainError::ParentNotFound(parent_id.to_string()))?;

            let idx = tree.create_taxon(Taxon::new(record.name)?.with_id(record.id));
            if let Err(e) = tree.add_child(parent, idx) {
                tree.discard(idx);
                return Err(e);
            }
            self.index_by_id.insert(record.id.to_string(), idx);
        }

        debug!(nodes = tree.len(), depth = tree.depth(), "seed tree built");
        Ok(tree)
    }

    /// Node created for `id` during the last build.
    pub fn node_for(&self, id: &str) -> Option<NodeId> {
        self.index_by_id.get(id).copied()
    }
}
