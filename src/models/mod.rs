// src/models/mod.rs

//! Domain models for the archive application.

mod meta;
mod problem;

// Re-export all public types
pub use meta::SiteMetadata;
pub use problem::{Difficulty, ProblemRecord};
