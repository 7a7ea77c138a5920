//! Application layer: services and use cases
//!
//! This layer owns session state (shared tree, edit mode) and orchestrates
//! domain operations for the front ends.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
