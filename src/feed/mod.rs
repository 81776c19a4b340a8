// src/feed/mod.rs

//! Remote CSV feed retrieval and parsing.
//!
//! - `fetch`: the `FeedFetcher` trait and its reqwest-backed implementation
//! - `parse`: header-driven CSV decoding into domain models

pub mod fetch;
pub mod parse;

pub use fetch::{FeedFetcher, FeedPayload, HttpFetcher};
pub use parse::{parse_metadata, parse_problems};
