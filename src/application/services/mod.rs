//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod session;

pub use session::{
    parse_name_list, AddNodeOutcome, AddNodeRequest, AddReport, SearchHit, SearchOutcome,
    TreeSession,
};
pub(crate) use session::join_names;
