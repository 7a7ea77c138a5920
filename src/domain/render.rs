//! Textual views of a subtree: indented outline and `termtree` box drawing.

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TaxonTree;
use crate::domain::entities::NodeId;
use crate::domain::error::DomainResult;

/// Indent unit of the plain outline.
pub const DEFAULT_INDENT: usize = 1;

impl TaxonTree {
    /// Indented outline of `node` and all descendants, one line per node.
    ///
    /// Depth is relative to `node`; each level adds one space.
    pub fn render_subtree(&self, node: NodeId) -> DomainResult<String> {
        self.render_subtree_with(node, DEFAULT_INDENT)
    }

    /// Like [`render_subtree`](Self::render_subtree) with `indent_width`
    /// spaces per level.
    #[instrument(level = "trace", skip(self))]
    pub fn render_subtree_with(&self, node: NodeId, indent_width: usize) -> DomainResult<String> {
        self.node(node)?;
        let mut out = String::new();
        for (depth, n) in self.descendants_with_depth(node) {
            out.push_str(&" ".repeat(depth * indent_width));
            out.push_str(&n.data.name);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Conversion into a [`termtree::Tree`] for box-drawing output.
pub trait ToTermTree {
    fn to_termtree(&self, node: NodeId) -> DomainResult<Tree<String>>;
}

impl ToTermTree for TaxonTree {
    #[instrument(level = "trace", skip(self))]
    fn to_termtree(&self, node: NodeId) -> DomainResult<Tree<String>> {
        fn build(arena: &TaxonTree, node_idx: NodeId) -> DomainResult<Tree<String>> {
            let node = arena.node(node_idx)?;
            let leaves = node
                .children
                .iter()
                .map(|&child| build(arena, child))
                .collect::<DomainResult<Vec<_>>>()?;
            Ok(Tree::new(node.data.name.clone()).with_leaves(leaves))
        }

        build(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TaxonTree {
        let mut tree = TaxonTree::new("Tyrannosauridae").unwrap();
        let root = tree.root();
        let sub = tree.create_node("Tyrannosaurinae").unwrap();
        let genus = tree.create_node("Tyrannosaurus").unwrap();
        let species = tree.create_node("Tyrannosaurus rex").unwrap();
        let alb = tree.create_node("Albertosaurinae").unwrap();
        tree.add_child(root, sub).unwrap();
        tree.add_child(sub, genus).unwrap();
        tree.add_child(genus, species).unwrap();
        tree.add_child(root, alb).unwrap();
        tree
    }

    #[test]
    fn given_tree_when_rendering_then_indents_by_depth() {
        let tree = tree();
        let text = tree.render_subtree(tree.root()).unwrap();
        assert_eq!(
            text,
            "Tyrannosauridae\n \
             Tyrannosaurinae\n  \
             Tyrannosaurus\n   \
             Tyrannosaurus rex\n \
             Albertosaurinae\n"
        );
    }

    #[test]
    fn given_inner_node_when_rendering_then_depth_is_relative() {
        let tree = tree();
        let genus = tree.find_in_tree("tyrannosaurus").unwrap();
        assert_eq!(
            tree.render_subtree_with(genus, 4).unwrap(),
            "Tyrannosaurus\n    Tyrannosaurus rex\n"
        );
    }

    #[test]
    fn given_tree_when_converting_to_termtree_then_keeps_child_order() {
        let tree = tree();
        let rendered = tree.to_termtree(tree.root()).unwrap().to_string();
        let sub = rendered.find("Tyrannosaurinae").unwrap();
        let alb = rendered.find("Albertosaurinae").unwrap();
        assert!(rendered.starts_with("Tyrannosauridae"));
        assert!(sub < alb);
        assert!(rendered.contains("Tyrannosaurus rex"));
    }
}
