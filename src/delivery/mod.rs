//! Delivery of the rendered digest.
//!
//! # Channels
//!
//! | Channel | Module | Transport | Failure |
//! |---------|--------|-----------|---------|
//! | Telegram | [`telegram`] | Bot API `sendMessage` over HTTPS | `ok: false`, HTTP and decode errors are raised |
//! | Email | [`email`] | SMTP with STARTTLS and login | any SMTP or transport error is raised |
//!
//! Unlike fetching, delivery has no degraded path: every error propagates
//! to the orchestrator, which fails the run.

pub mod email;
pub mod telegram;
