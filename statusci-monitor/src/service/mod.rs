//! Service layer
//!
//! Services contain the business logic of the monitor: resolving a status
//! source through config lookup, provider fetch and normalization.
//!
//! Time is injected through the `Clock` trait to keep resolution testable.

pub mod clock;
mod resolver;

pub use clock::{Clock, SystemClock};
pub use resolver::StatusResolver;
