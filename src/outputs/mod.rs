//! Digest rendering for every delivery channel.
//!
//! A single parameterized renderer turns a [`Digest`](crate::models::Digest)
//! into channel-specific text:
//!
//! - [`render::OutputMode::Plain`]: plain text (email plain part, Telegram without parse mode)
//! - [`render::OutputMode::TelegramHtml`]: Telegram's HTML subset
//! - [`render::OutputMode::EmailHtml`]: a self-contained HTML document
//!
//! # Output Shape
//!
//! ```text
//! 📰 Daily Europe News – 2024-01-15
//!
//! Here are the top 2 European news stories:
//!
//! 1) EU leaders meet in Brussels
//!    Heads of government gathered to discuss...
//!    https://news.example.eu/1
//!
//! 2) ...
//! ```
//!
//! Article text comes from a third party and is always escaped in the
//! markup modes. Telegram output is capped at 4000 characters after
//! rendering.

pub mod render;

pub use render::{EmailBody, OutputMode, render_email, render_telegram};
