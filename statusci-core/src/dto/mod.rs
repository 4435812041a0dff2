//! Provider wire formats
//!
//! DTOs mirror the JSON returned by each provider. Each top-level response
//! knows how to classify itself into a `Classified` job shape.

pub mod jenkins;
pub mod travis;
