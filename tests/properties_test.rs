//! Whole-tree properties checked on the small Dinosauria tree and the seed.

use rstest::{fixture, rstest};

use phylotree::domain::{DomainError, TaxonTree, TreeBuilder};

/// Dinosauria -> { Tyrannosauridae -> { Tyrannosaurus } }
#[fixture]
fn small() -> TaxonTree {
    let mut tree = TaxonTree::new("Dinosauria").unwrap();
    let root = tree.root();
    let family = tree.create_node("Tyrannosauridae").unwrap();
    let genus = tree.create_node("Tyrannosaurus").unwrap();
    tree.add_child(root, family).unwrap();
    tree.add_child(family, genus).unwrap();
    tree
}

#[fixture]
fn seed() -> TaxonTree {
    TreeBuilder::dinosaur_phylogeny().unwrap()
}

#[rstest]
fn given_any_tree_when_finding_root_name_then_root(small: TaxonTree, seed: TaxonTree) {
    for tree in [small, seed] {
        let root = tree.root();
        assert_eq!(tree.find(root, tree.name(root).unwrap()), Some(root));
    }
}

#[rstest]
fn given_every_node_when_lineage_then_spans_root_to_node(seed: TaxonTree) {
    let root_name = seed.name(seed.root()).unwrap().to_string();
    for (idx, node) in seed.iter() {
        let lineage = seed.lineage(idx).unwrap();
        assert_eq!(lineage.first(), Some(&root_name));
        assert_eq!(lineage.last(), Some(&node.data.name));
    }
}

#[rstest]
fn given_every_node_when_checking_linkage_then_parent_and_children_agree(seed: TaxonTree) {
    for (idx, node) in seed.iter() {
        for &child in &node.children {
            assert_eq!(seed.parent(child).unwrap(), Some(idx));
        }
        if let Some(parent) = node.parent {
            assert!(seed.children(parent).unwrap().contains(&idx));
        }
    }
}

#[rstest]
fn given_new_child_when_finding_by_name_then_returns_it(mut small: TaxonTree) {
    // Arrange
    let root = small.root();
    let family = small.find(root, "Tyrannosauridae").unwrap();
    let genus = small.create_node("Tarbosaurus").unwrap();

    // Act
    small.add_child(family, genus).unwrap();

    // Assert
    assert_eq!(small.find(root, "Tarbosaurus"), Some(genus));
}

#[rstest]
fn given_case_insensitive_duplicate_when_add_child_then_children_unchanged(mut small: TaxonTree) {
    // Arrange
    let family = small.find_in_tree("Tyrannosauridae").unwrap();
    let before = small.children(family).unwrap().to_vec();
    let dup = small.create_node("TYRANNOSAURUS").unwrap();

    // Act
    let err = small.add_child(family, dup).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::DuplicateName { .. }));
    assert_eq!(small.children(family).unwrap(), before.as_slice());
}

#[rstest]
fn given_new_root_when_inserting_then_old_children_unaffected(mut small: TaxonTree) {
    // Arrange
    let old_root = small.root();
    let old_children = small.children(old_root).unwrap().to_vec();

    // Act
    let x = small.insert_new_root("X", old_root).unwrap();

    // Assert
    assert_eq!(small.children(x).unwrap(), &[old_root]);
    assert_eq!(small.parent(old_root).unwrap(), Some(x));
    assert_eq!(small.children(old_root).unwrap(), old_children.as_slice());
}

#[rstest]
fn given_root_name_when_inserting_new_root_then_duplicate(mut small: TaxonTree) {
    let root = small.root();
    assert!(matches!(
        small.insert_new_root("dinosauria", root).unwrap_err(),
        DomainError::DuplicateName { .. }
    ));
}

#[rstest]
fn given_missing_reassign_name_when_adding_then_warned_not_reassigned(mut small: TaxonTree) {
    // Arrange
    let root = small.root();

    // Act
    let result = small
        .add_node_with_reassignment("Dinosauria", "Ornithischia", &["Stegosaurus"], root)
        .unwrap();

    // Assert
    assert!(result
        .warnings
        .iter()
        .any(|w| w.to_string().contains("Stegosaurus")));
    assert!(!result.reassigned.iter().any(|n| n == "Stegosaurus"));
    assert_eq!(small.parent(result.node).unwrap(), Some(root));
}

#[rstest]
fn given_small_tree_when_adding_velociraptorinae_then_appended_last(mut small: TaxonTree) {
    // Arrange
    let root = small.root();

    // Act
    let result = small
        .add_node_with_reassignment::<&str>("Dinosauria", "Velociraptorinae", &[], root)
        .unwrap();

    // Assert
    assert_eq!(
        small.child_names(root).unwrap(),
        vec!["Tyrannosauridae", "Velociraptorinae"]
    );
    assert_eq!(small.find(root, "velociraptorinae"), Some(result.node));
}

#[rstest]
fn given_small_tree_when_adding_coelurosauria_then_family_reparented(mut small: TaxonTree) {
    // Arrange
    let root = small.root();
    let family = small.find_in_tree("Tyrannosauridae").unwrap();

    // Act
    let result = small
        .add_node_with_reassignment("Dinosauria", "Coelurosauria", &["Tyrannosauridae"], root)
        .unwrap();

    // Assert
    let new_parent = small.parent(family).unwrap().unwrap();
    assert_eq!(small.name(new_parent).unwrap(), "Coelurosauria");
    assert_eq!(small.parent(result.node).unwrap(), Some(root));
    assert!(!small.children(root).unwrap().contains(&family));
}

#[rstest]
fn given_no_mutation_when_rendering_twice_then_identical(seed: TaxonTree) {
    let root = seed.root();
    assert_eq!(
        seed.render_subtree(root).unwrap(),
        seed.render_subtree(root).unwrap()
    );
}
