//! Tree session service
//!
//! Holds the shared tree behind a reader/writer lock together with the
//! caller-owned edit-mode flag. Mutations take the write lock for the whole
//! transaction, so readers never see a half-moved node.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{RenderStyle, Settings};
use crate::domain::{
    DeleteOutcome, DeletePolicy, DomainError, NodeId, TaxonTree, ToTermTree, TreeBuilder,
};

/// Input of the "Add Node" action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddNodeRequest {
    /// Existing parent; must be empty when `new_root` is set
    pub parent: Option<String>,
    /// Name of the node to create
    pub name: String,
    /// Existing nodes to move under the new node, in order; must be empty
    /// when `new_root` is set
    pub reassign: Vec<String>,
    /// Splice the new node above the current root instead
    pub new_root: bool,
}

/// Name-level summary of a completed add transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    pub name: String,
    pub parent: String,
    pub reassigned: Vec<String>,
    pub warnings: Vec<DomainError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddNodeOutcome {
    Added(AddReport),
    NewRoot { name: String, old_root: String },
}

impl fmt::Display for AddNodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddNodeOutcome::Added(report) => {
                write!(f, "Node '{}' added under '{}'.", report.name, report.parent)?;
                if !report.reassigned.is_empty() {
                    write!(
                        f,
                        "\nNode '{}' is now the parent of: {}.",
                        report.name,
                        report.reassigned.join(", ")
                    )?;
                }
                Ok(())
            }
            AddNodeOutcome::NewRoot { name, .. } => write!(f, "New root node '{}' added.", name),
        }
    }
}

/// A successful search: lineage and subtree of the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub lineage: Vec<String>,
    pub separator: String,
    pub subtree: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchHit),
    NoResults { query: String },
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(hit) => write!(
                f,
                "Lineage:\n{}\n\nSubtree:\n{}",
                hit.lineage.join(&hit.separator),
                hit.subtree
            ),
            SearchOutcome::NoResults { query } => write!(f, "No results found for '{}'.", query),
        }
    }
}

/// Splits a comma-separated name field, dropping blank entries.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Interactive session over one taxon tree.
pub struct TreeSession {
    tree: RwLock<TaxonTree>,
    edit_mode: AtomicBool,
    settings: Arc<Settings>,
}

impl TreeSession {
    /// Create a session over `tree`; edit mode starts as configured.
    pub fn new(tree: TaxonTree, settings: Arc<Settings>) -> Self {
        let edit_mode = AtomicBool::new(settings.edit_mode);
        Self {
            tree: RwLock::new(tree),
            edit_mode,
            settings,
        }
    }

    /// Session over the bundled dinosaur/hominid phylogeny.
    pub fn with_seed(settings: Arc<Settings>) -> ApplicationResult<Self> {
        let tree = TreeBuilder::dinosaur_phylogeny()?;
        Ok(Self::new(tree, settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run `f` against the tree under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&TaxonTree) -> R) -> R {
        f(&self.tree.read())
    }

    // ============================================================
    // Edit mode
    // ============================================================

    pub fn edit_mode(&self) -> bool {
        self.edit_mode.load(Ordering::SeqCst)
    }

    /// Changes wait for in-flight tree access, so a mutation that passed
    /// the edit-mode check completes before the flag flips.
    pub fn set_edit_mode(&self, enabled: bool) {
        let _tree = self.tree.write();
        self.edit_mode.store(enabled, Ordering::SeqCst);
        info!(enabled, "edit mode changed");
    }

    /// Flip edit mode and return the new state.
    pub fn toggle_edit_mode(&self) -> bool {
        let _tree = self.tree.write();
        let enabled = !self.edit_mode.fetch_xor(true, Ordering::SeqCst);
        info!(enabled, "edit mode toggled");
        enabled
    }

    /// Callers hold the tree write lock while checking.
    fn require_edit_mode(&self, action: &str) -> ApplicationResult<()> {
        if self.edit_mode() {
            Ok(())
        } else {
            Err(ApplicationError::EditModeDisabled(action.to_string()))
        }
    }

    // ============================================================
    // Queries (shared lock)
    // ============================================================

    fn render(&self, tree: &TaxonTree, node: NodeId) -> ApplicationResult<String> {
        Ok(match self.settings.render_style {
            RenderStyle::Indent => tree.render_subtree_with(node, self.settings.indent_width)?,
            RenderStyle::Tree => format!("{}", tree.to_termtree(node)?),
        })
    }

    /// Whole tree in the configured render style.
    #[instrument(level = "debug", skip(self))]
    pub fn display_tree(&self) -> ApplicationResult<String> {
        let tree = self.tree.read();
        self.render(&tree, tree.root())
    }

    /// Find `query` and report its lineage and subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> ApplicationResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::InvalidInput("Please enter a search term.".to_string()).into());
        }
        let tree = self.tree.read();
        let Some(idx) = tree.find_in_tree(query) else {
            debug!(query, "no match");
            return Ok(SearchOutcome::NoResults {
                query: query.to_string(),
            });
        };
        Ok(SearchOutcome::Found(SearchHit {
            name: tree.name(idx)?.to_string(),
            lineage: tree.lineage(idx)?,
            separator: self.settings.lineage_separator.clone(),
            subtree: self.render(&tree, idx)?,
        }))
    }

    /// Root-to-node names of `name`.
    pub fn lineage(&self, name: &str) -> ApplicationResult<Vec<String>> {
        let tree = self.tree.read();
        let idx = resolve(&tree, name)?;
        Ok(tree.lineage(idx)?)
    }

    /// Name of the current root.
    pub fn root_name(&self) -> String {
        let tree = self.tree.read();
        tree.name(tree.root())
            .map(str::to_string)
            .unwrap_or_default()
    }

    // ============================================================
    // Mutations (exclusive lock, edit mode required)
    // ============================================================

    /// The "Add Node" action: new root, or add with reassignment.
    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&self, request: &AddNodeRequest) -> ApplicationResult<AddNodeOutcome> {
        let mut tree = self.tree.write();
        self.require_edit_mode("add a node")?;

        if request.new_root {
            if request.parent.as_deref().is_some_and(|p| !p.trim().is_empty()) {
                return Err(DomainError::InvalidInput(
                    "a new root node cannot have a parent".to_string(),
                )
                .into());
            }
            if request.reassign.iter().any(|r| !r.trim().is_empty()) {
                return Err(DomainError::InvalidInput(
                    "a new root node adopts the current root only, reassign is not allowed"
                        .to_string(),
                )
                .into());
            }
            let old_root = tree.root();
            let old_name = tree.name(old_root)?.to_string();
            let new_root = tree.insert_new_root(&request.name, old_root)?;
            return Ok(AddNodeOutcome::NewRoot {
                name: tree.name(new_root)?.to_string(),
                old_root: old_name,
            });
        }

        if request.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("node name is required".to_string()).into());
        }
        let parent_name = request
            .parent
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                DomainError::InvalidInput(
                    "parent node is required unless creating a new root".to_string(),
                )
            })?;

        let root = tree.root();
        let result = tree.add_node_with_reassignment(
            parent_name,
            &request.name,
            request.reassign.as_slice(),
            root,
        )?;
        let parent = tree
            .parent(result.node)?
            .map(|p| tree.name(p).map(str::to_string))
            .transpose()?
            .unwrap_or_default();
        Ok(AddNodeOutcome::Added(AddReport {
            name: tree.name(result.node)?.to_string(),
            parent,
            reassigned: result.reassigned,
            warnings: result.warnings,
        }))
    }

    /// Rename `name` to `new_name`; returns the previous name.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&self, name: &str, new_name: &str) -> ApplicationResult<String> {
        let mut tree = self.tree.write();
        self.require_edit_mode("edit a node")?;
        let idx = resolve(&tree, name)?;
        Ok(tree.rename(idx, new_name)?)
    }

    /// Move `name` with its subtree under `new_parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&self, name: &str, new_parent: &str) -> ApplicationResult<()> {
        let mut tree = self.tree.write();
        self.require_edit_mode("edit a node")?;
        let idx = resolve(&tree, name)?;
        let parent = tree
            .find_in_tree(new_parent)
            .ok_or_else(|| DomainError::ParentNotFound(new_parent.trim().to_string()))?;
        Ok(tree.move_node(idx, parent)?)
    }

    /// Delete `name`, using the configured policy unless one is given.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(
        &self,
        name: &str,
        policy: Option<DeletePolicy>,
    ) -> ApplicationResult<DeleteOutcome> {
        let mut tree = self.tree.write();
        self.require_edit_mode("delete a node")?;
        let policy = policy.unwrap_or(self.settings.delete_policy);
        let idx = resolve(&tree, name)?;
        Ok(tree.delete(idx, policy)?)
    }
}

impl fmt::Debug for TreeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSession")
            .field("root", &self.root_name())
            .field("edit_mode", &self.edit_mode())
            .finish()
    }
}

fn resolve(tree: &TaxonTree, name: &str) -> ApplicationResult<NodeId> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("node name is required".to_string()).into());
    }
    tree.find_in_tree(name)
        .ok_or_else(|| DomainError::NodeNotFound(name.trim().to_string()).into())
}

/// Comma-joined names for messages.
pub(crate) fn join_names(names: &[String]) -> String {
    names.iter().map(|n| format!("'{}'", n)).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("Homo", vec!["Homo"])]
    #[case(" Homo , ,Tarbosaurus Bataar,", vec!["Homo", "Tarbosaurus Bataar"])]
    fn given_comma_field_when_parsing_then_drops_blanks(
        #[case] input: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(parse_name_list(input), expected);
    }

    #[test]
    fn given_names_when_joining_then_quotes_each() {
        assert_eq!(
            join_names(&["Homo".to_string(), "Pan".to_string()]),
            "'Homo', 'Pan'"
        );
    }

    #[test]
    fn given_found_outcome_when_displaying_then_shows_lineage_and_subtree() {
        let outcome = SearchOutcome::Found(SearchHit {
            name: "Homo".into(),
            lineage: vec!["Hominidae".into(), "Homo".into()],
            separator: " > ".into(),
            subtree: "Homo\n Homo sapiens\n".into(),
        });
        assert_eq!(
            outcome.to_string(),
            "Lineage:\nHominidae > Homo\n\nSubtree:\nHomo\n Homo sapiens\n"
        );
    }
}
