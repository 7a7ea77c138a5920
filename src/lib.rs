//! phylotree: arena-backed taxonomic hierarchies with an editing session
//!
//! Layers:
//! - `domain`: the tree, its mutations and rendering
//! - `application`: the shared session and edit-mode gating
//! - `cli`: argument parsing, dispatch and the interactive shell

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
