//! StatusCI Core
//!
//! Core types and status logic for StatusCI.
//!
//! This crate contains:
//! - Domain types: the canonical `Status` model, build outcomes, classified job shapes
//! - DTOs: provider wire formats (Jenkins, Travis) and their classification
//! - Config: provider/authentication registry with longest-prefix resolution
//! - Normalization: classified response to `Status`, progress and age derivation

pub mod config;
pub mod domain;
pub mod dto;
pub mod normalize;
