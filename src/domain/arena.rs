use generational_arena::Arena;
use std::fmt;
use tracing::instrument;

use crate::domain::entities::{name_key, same_name, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// Data payload for tree nodes: one taxon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    /// Display label, trimmed, original casing kept
    pub name: String,
    /// Stable identifier from seed data, None for interactively created nodes
    pub id: Option<String>,
}

impl Taxon {
    /// Validates and trims the name.
    pub fn new(name: &str) -> DomainResult<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput("node name is required".to_string()));
        }
        Ok(Self {
            name: trimmed.to_string(),
            id: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Taxon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based hierarchy.
#[derive(Debug)]
pub struct TaxonNode {
    /// Taxon carried by this node
    pub data: Taxon,
    /// Index of parent node in the arena, None for the root and detached nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in insertion order
    pub children: Vec<NodeId>,
}

/// Arena-based rooted tree of taxa.
///
/// The arena owns every node; parent links are plain indices, so ownership
/// flows strictly through the arena and no reference cycles can form.
/// Nodes created with [`TaxonTree::create_node`] live in the arena detached
/// until they are attached somewhere below the root.
#[derive(Debug)]
pub struct TaxonTree {
    /// Arena storage for all nodes, attached or not
    arena: Arena<TaxonNode>,
    /// Index of the current root
    root: NodeId,
}

impl TaxonTree {
    /// Creates a tree consisting of a single root.
    #[instrument(level = "debug")]
    pub fn new(root_name: &str) -> DomainResult<Self> {
        Ok(Self::from_root(Taxon::new(root_name)?))
    }

    pub(crate) fn from_root(taxon: Taxon) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TaxonNode {
            data: taxon,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, idx: NodeId) {
        self.root = idx;
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TaxonNode> {
        self.arena.get(idx)
    }

    /// Like [`get_node`](Self::get_node) but reports stale ids as errors.
    pub fn node(&self, idx: NodeId) -> DomainResult<&TaxonNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::StaleNode(format!("{:?}", idx)))
    }

    pub(crate) fn node_mut(&mut self, idx: NodeId) -> DomainResult<&mut TaxonNode> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| DomainError::StaleNode(format!("{:?}", idx)))
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    pub fn name(&self, idx: NodeId) -> DomainResult<&str> {
        Ok(self.node(idx)?.data.name.as_str())
    }

    pub fn parent(&self, idx: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.node(idx)?.parent)
    }

    pub fn children(&self, idx: NodeId) -> DomainResult<&[NodeId]> {
        Ok(self.node(idx)?.children.as_slice())
    }

    /// Names of the direct children, in order.
    pub fn child_names(&self, idx: NodeId) -> DomainResult<Vec<String>> {
        let node = self.node(idx)?;
        Ok(node
            .children
            .iter()
            .filter_map(|&c| self.get_node(c))
            .map(|c| c.data.name.clone())
            .collect())
    }

    /// Creates a detached node with no parent and no children.
    #[instrument(level = "trace", skip(self))]
    pub fn create_node(&mut self, name: &str) -> DomainResult<NodeId> {
        Ok(self.create_taxon(Taxon::new(name)?))
    }

    pub(crate) fn create_taxon(&mut self, taxon: Taxon) -> NodeId {
        self.arena.insert(TaxonNode {
            data: taxon,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Drops a node from the arena without touching any linkage.
    pub(crate) fn discard(&mut self, idx: NodeId) -> Option<TaxonNode> {
        self.arena.remove(idx)
    }

    /// Case-insensitive exact-name search below `start`, depth-first pre-order.
    ///
    /// The first match in traversal order wins.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, start: NodeId, name: &str) -> Option<NodeId> {
        let key = name_key(name);
        self.descendants(start)
            .find(|(_, node)| name_key(&node.data.name) == key)
            .map(|(idx, _)| idx)
    }

    /// [`find`](Self::find) starting at the current root.
    pub fn find_in_tree(&self, name: &str) -> Option<NodeId> {
        self.find(self.root, name)
    }

    /// Direct child of `parent` whose name matches case-insensitively.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let node = self.get_node(parent)?;
        node.children.iter().copied().find(|&c| {
            self.get_node(c)
                .map(|child| same_name(&child.data.name, name))
                .unwrap_or(false)
        })
    }

    fn ensure_unique_child(&self, parent: NodeId, name: &str) -> DomainResult<()> {
        if self.child_named(parent, name).is_some() {
            return Err(DomainError::DuplicateName {
                name: name.to_string(),
                parent: self.name(parent)?.to_string(),
            });
        }
        Ok(())
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// The duplicate check runs before any mutation. Cycles are not checked:
    /// callers guarantee `child` is not an ancestor of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        let position = self.children(parent)?.len();
        self.insert_child_at(parent, child, position)
    }

    /// Attaches `child` under `parent` at `position` (clamped to the end).
    pub(crate) fn insert_child_at(
        &mut self,
        parent: NodeId,
        child: NodeId,
        position: usize,
    ) -> DomainResult<()> {
        let child_node = self.node(child)?;
        let child_name = child_node.data.name.clone();
        if parent == child {
            return Err(DomainError::CycleDetected {
                node: child_name.clone(),
                target: child_name,
            });
        }
        if child_node.parent.is_some() {
            return Err(DomainError::InvalidInput(format!(
                "node '{}' is still attached, detach it first",
                child_name
            )));
        }
        self.ensure_unique_child(parent, &child_name)?;

        let parent_node = self.node_mut(parent)?;
        let position = position.min(parent_node.children.len());
        parent_node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Removes `node` from its parent's children and clears its parent link.
    ///
    /// Returns the former parent; a node without parent is left untouched and
    /// `None` is returned.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, node: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.detach_with_position(node)?.map(|(parent, _)| parent))
    }

    /// Detaches and reports the former parent and slot, for restoring later.
    pub(crate) fn detach_with_position(
        &mut self,
        node: NodeId,
    ) -> DomainResult<Option<(NodeId, usize)>> {
        let Some(parent) = self.node(node)?.parent else {
            return Ok(None);
        };
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings.iter().position(|&c| c == node);
        if let Some(pos) = position {
            siblings.remove(pos);
        }
        self.node_mut(node)?.parent = None;
        Ok(Some((parent, position.unwrap_or(0))))
    }

    /// Root-to-node names along the parent links, `node` last.
    #[instrument(level = "trace", skip(self))]
    pub fn lineage(&self, node: NodeId) -> DomainResult<Vec<String>> {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(idx) = current {
            let n = self.node(idx)?;
            names.push(n.data.name.clone());
            current = n.parent;
        }
        names.reverse();
        Ok(names)
    }

    /// True if `ancestor` equals `node` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(idx) = current {
            if idx == ancestor {
                return true;
            }
            current = self.get_node(idx).and_then(|n| n.parent);
        }
        false
    }

    /// True if `node` is reachable from the current root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(node) && self.is_ancestor_or_self(self.root, node)
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels, a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Names of all leaves below the root in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.name.clone())
            .collect()
    }

    /// Pre-order iteration over the whole tree.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.root)
    }

    /// Pre-order iteration over `start` and its descendants.
    pub fn descendants(&self, start: NodeId) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, start)
    }

    /// Pre-order iteration yielding the depth relative to `start`.
    pub fn descendants_with_depth(&self, start: NodeId) -> DepthIterator<'_> {
        DepthIterator::new(self, start)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a TaxonTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a TaxonTree, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a TaxonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct DepthIterator<'a> {
    tree: &'a TaxonTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> DepthIterator<'a> {
    fn new(tree: &'a TaxonTree, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, 0));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for DepthIterator<'a> {
    type Item = (usize, &'a TaxonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((depth, node));
            }
        }
        None
    }
}
