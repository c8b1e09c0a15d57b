//! Recipe queries, their keys, and their resolution state
//!
//! A view describes what it wants as a [`LogicalQuery`], hands it to a
//! [`QuerySubscription`], and renders whatever [`QueryState`] comes back.

mod key;
mod orchestrator;
mod state;

pub use key::{build_key, normalize_text, LogicalQuery, QueryKey};
pub use orchestrator::{LoadMode, QueryOrchestrator, QuerySubscription};
pub use state::{QueryState, QueryStatus};
