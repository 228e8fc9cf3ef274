//! JiraFlow Core
//!
//! Data models, JSON storage, and git repository access shared by the
//! JiraFlow workflow engine and CLI.

pub mod error;
pub mod git;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
