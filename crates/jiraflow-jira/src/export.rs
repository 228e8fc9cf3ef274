//! Local JIRA export snapshots
//!
//! Teams often work from static JSON exports of ticket metadata instead of
//! live API access. An export file is the raw issue JSON as returned by the
//! JIRA REST API.

use crate::types::JiraIssue;
use crate::{Error, Result};
use jiraflow_core::models::Ticket;
use std::path::Path;

/// Parse an export snapshot from a JSON string
pub fn parse_export(content: &str) -> Result<JiraIssue> {
    let issue: JiraIssue = serde_json::from_str(content)?;
    Ok(issue)
}

/// Load an export snapshot from a file
pub fn load_export(path: &Path) -> Result<JiraIssue> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Export file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    parse_export(&content)
}

/// Load an export snapshot and convert it to a core ticket
pub fn ticket_from_export(path: &Path) -> Result<Ticket> {
    let issue = load_export(path)?;
    let ticket = Ticket::from(issue);
    ticket.validate()?;
    Ok(ticket)
}
