//! JiraFlow JIRA Integration
//!
//! Client library for fetching tickets from JIRA and loading local
//! export snapshots.

pub mod auth;
pub mod client;
pub mod error;
pub mod export;
pub mod types;

pub use client::JiraClient;
pub use error::{Error, Result};
pub use types::*;
