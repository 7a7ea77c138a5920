//! Domain entities: results and policies of tree operations

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Identity of a node inside a [`TaxonTree`](crate::domain::TaxonTree).
///
/// Stays valid across moves and renames; goes stale once the node is deleted.
pub type NodeId = Index;

/// Outcome of the composite add-node transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    /// The freshly attached node
    pub node: NodeId,
    /// Stored names of the nodes moved under the new node, in request order
    pub reassigned: Vec<String>,
    /// Per-item reassignment failures; these never abort the transaction
    pub warnings: Vec<DomainError>,
}

/// What happens to the descendants of a deleted node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletePolicy {
    /// Children move up into the deleted node's slot under its parent
    #[default]
    Promote,
    /// The whole subtree is removed
    Cascade,
    /// Only leaves may be deleted
    RejectNonLeaf,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Promote => "promote",
            DeletePolicy::Cascade => "cascade",
            DeletePolicy::RejectNonLeaf => "reject-non-leaf",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "promote" => Ok(DeletePolicy::Promote),
            "cascade" => Ok(DeletePolicy::Cascade),
            "reject-non-leaf" | "reject" => Ok(DeletePolicy::RejectNonLeaf),
            other => Err(DomainError::InvalidInput(format!(
                "unknown delete policy '{}' (expected promote, cascade or reject-non-leaf)",
                other
            ))),
        }
    }
}

/// Outcome of deleting a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Names of all nodes removed from the tree, deleted node first
    pub removed: Vec<String>,
    /// Names of children moved up to the former parent
    pub promoted: Vec<String>,
}

/// Lowercase comparison key; storage keeps the original casing.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive name equality.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("promote", DeletePolicy::Promote)]
    #[case("Cascade", DeletePolicy::Cascade)]
    #[case("reject_non_leaf", DeletePolicy::RejectNonLeaf)]
    #[case(" reject ", DeletePolicy::RejectNonLeaf)]
    fn given_policy_text_when_parsing_then_returns_policy(
        #[case] input: &str,
        #[case] expected: DeletePolicy,
    ) {
        assert_eq!(input.parse::<DeletePolicy>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_policy_when_parsing_then_returns_invalid_input() {
        let err = "shred".parse::<DeletePolicy>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn given_mixed_case_names_when_comparing_then_ignores_case() {
        assert!(same_name("Tyrannosaurus Rex", "tyrannosaurus rex"));
        assert!(!same_name("Homo", "Homo sapiens"));
    }
}
