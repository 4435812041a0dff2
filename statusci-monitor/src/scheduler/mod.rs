//! Scheduler layer for the monitor
//!
//! Every status source gets its own polling task. Containers spawn one child
//! task per child reference and cancel them when the children disappear.

pub mod poller;
pub mod tree;

pub use poller::{PollSettings, StatusPoller, WatchHandle};
pub use tree::resolve_tree;
