//! News sources feeding the digest.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | World News API | [`worldnews`] | `GET /top-news` | `X-API-KEY` header; Europe, English, newest first |
//!
//! # Contract
//!
//! A source exposes `fetch_top_news(limit)` returning at most `limit`
//! normalized [`Article`](crate::models::Article)s. Fetching never fails:
//! transport errors, HTTP error statuses and malformed bodies are logged and
//! yield an empty list, which the orchestrator answers with the fallback
//! overview.

pub mod worldnews;
