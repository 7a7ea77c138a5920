//! Domain layer: the taxon tree and its invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod edit;
pub mod entities;
pub mod error;
pub mod render;
pub mod seed;

pub use arena::{Taxon, TaxonNode, TaxonTree};
pub use builder::TreeBuilder;
pub use entities::{AddResult, DeleteOutcome, DeletePolicy, NodeId};
pub use error::{DomainError, DomainResult};
pub use render::ToTermTree;
pub use seed::{SeedTaxon, DINOSAUR_PHYLOGENY};
