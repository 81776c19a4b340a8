// src/feed/fetch.rs

//! Feed retrieval.
//!
//! Both feeds are fetched together per sync attempt; an attempt counts
//! as successful only when both endpoints answer 2xx.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Raw CSV text of both feeds from one retrieval.
#[derive(Debug, Clone)]
pub struct FeedPayload {
    pub problems_csv: String,
    pub metadata_csv: String,
}

/// Trait for feed retrieval backends.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve both feeds. Fails if either retrieval fails.
    async fn fetch_feeds(&self) -> Result<FeedPayload>;
}

/// HTTP-backed feed fetcher for the published spreadsheet endpoints.
pub struct HttpFetcher {
    client: reqwest::Client,
    problems_url: String,
    metadata_url: String,
}

impl HttpFetcher {
    /// Create a fetcher with a configured HTTP client.
    ///
    /// Requests carry no cookies or credentials; the feeds are public.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            problems_url: config.feeds.problems_url.clone(),
            metadata_url: config.feeds.metadata_url.clone(),
        })
    }

    async fn fetch_one(&self, url: &str, feed: &'static str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::feed_status(feed, status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch_feeds(&self) -> Result<FeedPayload> {
        let (problems_csv, metadata_csv) = futures::try_join!(
            self.fetch_one(&self.problems_url, "problems"),
            self.fetch_one(&self.metadata_url, "metadata"),
        )?;

        Ok(FeedPayload {
            problems_csv,
            metadata_csv,
        })
    }
}
