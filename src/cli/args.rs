//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::DeletePolicy;

/// Interactive viewer and editor for taxonomic and phylogenetic hierarchies
#[derive(Parser, Debug)]
#[command(name = "phylotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "PHYLOTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable edit mode (required for add, rename, move, delete)
    #[arg(short, long, global = true)]
    pub edit: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Tree(TreeCommands),

    /// Interactive session on one tree
    Shell,

    /// Show effective settings
    Config {
        /// Print a commented template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Commands shared by the command line and the interactive shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TreeCommands {
    /// Print the whole tree
    Show,

    /// Show lineage and subtree of a node
    Search {
        /// Node name (case-insensitive)
        query: String,
    },

    /// Add a node, optionally adopting existing nodes
    Add {
        /// Name of the new node
        name: String,
        /// Existing parent node
        #[arg(short, long, required_unless_present = "new_root")]
        parent: Option<String>,
        /// Existing nodes to move under the new node (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        reassign: Vec<String>,
        /// Make the new node the root above the current root
        #[arg(long, conflicts_with_all = ["parent", "reassign"])]
        new_root: bool,
    },

    /// Rename a node
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },

    /// Move a node with its subtree under another parent
    Move {
        /// Node to move
        name: String,
        /// New parent
        new_parent: String,
    },

    /// Delete a node
    Delete {
        /// Node to delete
        name: String,
        /// What happens to its children (default from config)
        #[arg(long)]
        policy: Option<DeletePolicy>,
    },
}

/// One line typed into the interactive shell.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommands {
    #[command(flatten)]
    Tree(TreeCommands),

    /// Toggle edit mode, or set it explicitly
    Edit {
        #[arg(value_enum)]
        state: Option<EditState>,
    },

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    On,
    Off,
}
