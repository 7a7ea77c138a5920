//! Mutating transactions on a [`TaxonTree`].
//!
//! Every operation validates before it touches linkage, so a returned error
//! always leaves the tree in its last valid state.

use tracing::{debug, error, info, instrument, warn};

use crate::domain::arena::TaxonTree;
use crate::domain::entities::{same_name, AddResult, DeleteOutcome, DeletePolicy, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// A node moved during step 5 of the add transaction, with its old slot.
#[derive(Debug, Clone, Copy)]
struct Reassignment {
    node: NodeId,
    from_parent: NodeId,
    from_position: usize,
}

impl TaxonTree {
    /// Splices a new root above `current_root` and returns it.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_new_root(
        &mut self,
        new_root_name: &str,
        current_root: NodeId,
    ) -> DomainResult<NodeId> {
        let name = new_root_name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput(
                "node name is required for the new root node".to_string(),
            ));
        }
        if current_root != self.root() {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not the root of the tree",
                self.name(current_root)?
            )));
        }
        let current_name = self.name(current_root)?.to_string();
        if same_name(name, &current_name) {
            return Err(DomainError::DuplicateName {
                name: name.to_string(),
                parent: current_name,
            });
        }

        let new_root = self.create_node(name)?;
        self.add_child(new_root, current_root)?;
        self.set_root(new_root);
        info!(new_root = name, old_root = %current_name, "inserted new root");
        Ok(new_root)
    }

    /// Adds `node_name` under `parent_name` and moves `reassign_names` below it.
    ///
    /// Steps 1-3 validate and abort without changes. Reassignments are best
    /// effort: failures are collected as warnings. If the final attach fails,
    /// all reassignments are undone.
    #[instrument(level = "debug", skip(self, reassign_names))]
    pub fn add_node_with_reassignment<S: AsRef<str>>(
        &mut self,
        parent_name: &str,
        node_name: &str,
        reassign_names: &[S],
        root: NodeId,
    ) -> DomainResult<AddResult> {
        self.add_node_with(parent_name, node_name, reassign_names, root, |tree, parent, node| {
            tree.add_child(parent, node)
        })
    }

    pub(crate) fn add_node_with<S, F>(
        &mut self,
        parent_name: &str,
        node_name: &str,
        reassign_names: &[S],
        root: NodeId,
        attach: F,
    ) -> DomainResult<AddResult>
    where
        S: AsRef<str>,
        F: FnOnce(&mut TaxonTree, NodeId, NodeId) -> DomainResult<()>,
    {
        // 1. validate
        let node_name = node_name.trim();
        if node_name.is_empty() {
            return Err(DomainError::InvalidInput("node name is required".to_string()));
        }

        // 2. resolve parent
        let parent = self
            .find(root, parent_name)
            .ok_or_else(|| DomainError::ParentNotFound(parent_name.trim().to_string()))?;

        // 3. duplicate check
        if self.child_named(parent, node_name).is_some() {
            return Err(DomainError::DuplicateName {
                name: node_name.to_string(),
                parent: self.name(parent)?.to_string(),
            });
        }

        // 4. create
        let new_node = self.create_node(node_name)?;

        // 5. reassign, best effort
        let mut moves: Vec<Reassignment> = Vec::new();
        let mut reassigned = Vec::new();
        let mut warnings = Vec::new();
        for raw in reassign_names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.reassign_one(root, parent, new_node, name) {
                Ok(Some(moved)) => {
                    reassigned.push(self.name(moved.node)?.to_string());
                    moves.push(moved);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(name, error = %e, "reassignment skipped");
                    warnings.push(e);
                }
            }
        }

        // 6. attach, rolling back on failure
        if let Err(e) = attach(&mut *self, parent, new_node) {
            error!(error = %e, "attaching new node failed, rolling back reassignments");
            self.rollback(new_node, &moves);
            return Err(match e {
                dup @ DomainError::DuplicateName { .. } => dup,
                other => {
                    debug!(error = %other, "attach failure reported as duplicate");
                    DomainError::DuplicateName {
                        name: node_name.to_string(),
                        parent: self.name(parent)?.to_string(),
                    }
                }
            });
        }

        info!(
            node = node_name,
            parent = %self.name(parent)?,
            reassigned = reassigned.len(),
            warnings = warnings.len(),
            "node added"
        );
        Ok(AddResult {
            node: new_node,
            reassigned,
            warnings,
        })
    }

    fn reassign_one(
        &mut self,
        root: NodeId,
        parent: NodeId,
        new_node: NodeId,
        name: &str,
    ) -> DomainResult<Option<Reassignment>> {
        // a second request for the same name collides with the earlier move
        if self.child_named(new_node, name).is_some() {
            return Err(DomainError::DuplicateName {
                name: name.to_string(),
                parent: self.name(new_node)?.to_string(),
            });
        }
        let found = self
            .find(root, name)
            .ok_or_else(|| DomainError::NodeNotFound(name.to_string()))?;
        if self.is_ancestor_or_self(found, parent) {
            return Err(DomainError::CycleDetected {
                node: self.name(found)?.to_string(),
                target: self.name(new_node)?.to_string(),
            });
        }

        let Some((from_parent, from_position)) = self.detach_with_position(found)? else {
            return Ok(None);
        };
        if let Err(e) = self.add_child(new_node, found) {
            self.insert_child_at(from_parent, found, from_position)?;
            return Err(e);
        }
        Ok(Some(Reassignment {
            node: found,
            from_parent,
            from_position,
        }))
    }

    fn rollback(&mut self, new_node: NodeId, moves: &[Reassignment]) {
        for moved in moves.iter().rev() {
            let restored = self.detach(moved.node).and_then(|_| {
                self.insert_child_at(moved.from_parent, moved.node, moved.from_position)
            });
            if let Err(e) = restored {
                error!(error = %e, "rollback could not restore node");
            }
        }
        if let Err(e) = self.detach(new_node) {
            error!(error = %e, "rollback could not detach new node");
        }
        self.discard(new_node);
    }

    /// Renames `node`, keeping sibling names unique. Returns the old name.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, node: NodeId, new_name: &str) -> DomainResult<String> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(DomainError::InvalidInput("new name is required".to_string()));
        }
        if let Some(parent) = self.parent(node)? {
            if let Some(existing) = self.child_named(parent, new_name) {
                if existing != node {
                    return Err(DomainError::DuplicateName {
                        name: new_name.to_string(),
                        parent: self.name(parent)?.to_string(),
                    });
                }
            }
        }
        let old = std::mem::replace(&mut self.node_mut(node)?.data.name, new_name.to_string());
        info!(old = %old, new = new_name, "node renamed");
        Ok(old)
    }

    /// Moves `node` with its subtree to the end of `new_parent`'s children.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, node: NodeId, new_parent: NodeId) -> DomainResult<()> {
        let name = self.name(node)?.to_string();
        if node == self.root() {
            return Err(DomainError::InvalidInput(format!(
                "cannot move root node '{}'",
                name
            )));
        }
        if !self.is_attached(new_parent) {
            return Err(DomainError::NodeNotFound(self.name(new_parent)?.to_string()));
        }
        if self.is_ancestor_or_self(node, new_parent) {
            return Err(DomainError::CycleDetected {
                node: name,
                target: self.name(new_parent)?.to_string(),
            });
        }
        if self.parent(node)? == Some(new_parent) {
            debug!(node = %name, "already under requested parent");
            return Ok(());
        }
        if self.child_named(new_parent, &name).is_some() {
            return Err(DomainError::DuplicateName {
                name,
                parent: self.name(new_parent)?.to_string(),
            });
        }

        self.detach(node)?;
        self.add_child(new_parent, node)?;
        info!(node = %name, parent = %self.name(new_parent)?, "node moved");
        Ok(())
    }

    /// Deletes `node` following `policy`. The root can never be deleted.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, node: NodeId, policy: DeletePolicy) -> DomainResult<DeleteOutcome> {
        let name = self.name(node)?.to_string();
        if node == self.root() {
            return Err(DomainError::CannotDeleteRoot(name));
        }
        let Some(parent) = self.parent(node)? else {
            return Err(DomainError::InvalidInput(format!(
                "node '{}' is not attached to the tree",
                name
            )));
        };

        let outcome = match policy {
            DeletePolicy::Promote => self.delete_promoting(node, parent)?,
            DeletePolicy::Cascade => {
                let doomed: Vec<NodeId> = self.descendants(node).map(|(idx, _)| idx).collect();
                let removed = doomed
                    .iter()
                    .map(|&idx| self.name(idx).map(str::to_string))
                    .collect::<DomainResult<Vec<_>>>()?;
                self.detach(node)?;
                for idx in doomed {
                    self.discard(idx);
                }
                DeleteOutcome {
                    removed,
                    promoted: Vec::new(),
                }
            }
            DeletePolicy::RejectNonLeaf => {
                if !self.children(node)?.is_empty() {
                    return Err(DomainError::HasChildren(name));
                }
                self.detach(node)?;
                self.discard(node);
                DeleteOutcome {
                    removed: vec![name.clone()],
                    promoted: Vec::new(),
                }
            }
        };
        info!(node = %name, %policy, removed = outcome.removed.len(), "node deleted");
        Ok(outcome)
    }

    fn delete_promoting(&mut self, node: NodeId, parent: NodeId) -> DomainResult<DeleteOutcome> {
        let children = self.children(node)?.to_vec();
        let promoted = self.child_names(node)?;
        for child_name in &promoted {
            if let Some(existing) = self.child_named(parent, child_name) {
                if existing != node {
                    return Err(DomainError::DuplicateName {
                        name: child_name.clone(),
                        parent: self.name(parent)?.to_string(),
                    });
                }
            }
        }

        let name = self.name(node)?.to_string();
        let Some((_, position)) = self.detach_with_position(node)? else {
            return Err(DomainError::InvalidInput(format!(
                "node '{}' is not attached to the tree",
                name
            )));
        };
        for (offset, &child) in children.iter().enumerate() {
            self.detach(child)?;
            self.insert_child_at(parent, child, position + offset)?;
        }
        self.discard(node);
        Ok(DeleteOutcome {
            removed: vec![name],
            promoted,
        })
    }
}
