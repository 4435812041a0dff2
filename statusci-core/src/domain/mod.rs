//! Core domain types
//!
//! This module contains the provider-neutral structures every status source
//! is reduced to, from classified job shapes down to the rendered `Status`.

pub mod build;
pub mod job;
pub mod status;
