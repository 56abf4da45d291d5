//! World News API client.
//!
//! Fetches the newest English-language European headlines from the
//! `top-news` endpoint and normalizes them into [`Article`]s.
//!
//! # Request
//!
//! ```text
//! GET {base}/top-news?source-country=eu&language=en&number={limit}&sort=publish-time&sort-direction=DESC
//! X-API-KEY: {key}
//! ```
//!
//! The response carries the articles in a `news` array; each entry may have
//! `title`, `text`, `summary`, `url` and `publish_date`.

use crate::config::NewsConfig;
use crate::error::NewsError;
use crate::models::{Article, NewsResponse};
use crate::utils::{endpoint, truncate_for_log};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Client for the World News API.
#[derive(Debug)]
pub struct NewsClient<'a> {
    http: Client,
    config: &'a NewsConfig,
}

impl<'a> NewsClient<'a> {
    /// Build a client with the configured request timeout.
    pub fn new(config: &'a NewsConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Fetch up to `limit` of the newest European articles.
    ///
    /// Never fails: any transport error, HTTP error status or malformed
    /// body is logged and yields an empty list.
    #[instrument(level = "info", skip_all, fields(limit = limit))]
    pub async fn fetch_top_news(&self, limit: usize) -> Vec<Article> {
        let t0 = Instant::now();
        match self.try_fetch(limit).await {
            Ok(articles) => {
                info!(
                    count = articles.len(),
                    newest = articles.first().map_or("-", |a| a.published_at.as_str()),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "Fetched top European news"
                );
                articles
            }
            Err(e) => {
                error!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis(),
                    "News fetch failed; continuing with no articles"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, limit: usize) -> Result<Vec<Article>, NewsError> {
        let url = endpoint(&self.config.base_url, &["top-news"]);
        let number = limit.to_string();
        debug!(%url, "Requesting top news");

        let response = self
            .http
            .get(url)
            .header("X-API-KEY", &self.config.api_key)
            .query(&[
                ("source-country", "eu"),
                ("language", "en"),
                ("number", number.as_str()),
                ("sort", "publish-time"),
                ("sort-direction", "DESC"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(NewsError::Request)?;

        let body = response.text().await.map_err(NewsError::Request)?;
        let parsed: NewsResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "News provider returned a malformed body"
            );
            NewsError::Decode(e)
        })?;

        let received = parsed.news.len();
        if received > limit {
            debug!(received, limit, "Provider returned more articles than requested");
        }

        Ok(parsed
            .news
            .into_iter()
            .take(limit)
            .map(Article::from)
            .collect())
    }
}
