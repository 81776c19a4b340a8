// src/lib.rs

//! Integral Archive Sync Library

pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod query;
pub mod sync;
