// src/models/meta.rs

//! Singleton site text pulled from the metadata feed.

use serde::{Deserialize, Serialize};

/// Site-wide text blocks. Replaced wholesale on every successful
/// parse; fields default to empty independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteMetadata {
    /// Front-page quote
    pub quote: String,

    /// About-page body
    pub about: String,

    /// Hero welcome text
    pub welcome_text: String,

    /// Contact line, may be empty
    pub contact: String,

    /// GitHub link, may be empty
    pub github: String,

    /// Credits line, may be empty
    pub credits: String,
}

impl SiteMetadata {
    /// Hardcoded text shown when the feeds are unreachable and nothing
    /// was ever cached.
    pub fn fallback() -> Self {
        Self {
            quote: "Integration is an art, not just a calculation.".to_string(),
            about: "A public collection of elegant, brutal, and interesting calculus problems."
                .to_string(),
            welcome_text: "Welcome to the archive.".to_string(),
            contact: String::new(),
            github: String::new(),
            credits: String::new(),
        }
    }
}
