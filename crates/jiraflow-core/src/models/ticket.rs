//! Ticket data model

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub status: String,
    pub components: Vec<String>,
    pub fix_versions: Vec<String>,
    pub testing: Option<TestingSpecification>,
    pub fetched_at: DateTime<Utc>,
}

/// Acceptance scenarios attached to a ticket, in given/when/then form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestingSpecification {
    pub scenarios: Vec<Scenario>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub given: String,
    pub when: String,
    pub then: String,
}

impl Ticket {
    /// Create a new ticket with the given key and summary
    pub fn new(key: String, summary: String) -> Result<Self> {
        let ticket = Self {
            key,
            summary,
            description: None,
            issue_type: "Task".to_string(),
            status: "Open".to_string(),
            components: Vec::new(),
            fix_versions: Vec::new(),
            testing: None,
            fetched_at: Utc::now(),
        };
        ticket.validate()?;
        Ok(ticket)
    }

    /// Validate the ticket data
    pub fn validate(&self) -> Result<()> {
        if self.summary.trim().is_empty() {
            return Err(Error::Validation(
                "Ticket summary cannot be empty".to_string(),
            ));
        }

        validate_key(&self.key)?;

        if let Some(ref testing) = self.testing {
            testing.validate()?;
        }

        Ok(())
    }

    /// Check if the ticket carries acceptance scenarios
    pub fn has_testing_specification(&self) -> bool {
        self.testing
            .as_ref()
            .map(|t| !t.scenarios.is_empty())
            .unwrap_or(false)
    }

    /// Number of acceptance scenarios on the ticket
    pub fn scenario_count(&self) -> usize {
        self.testing
            .as_ref()
            .map(|t| t.scenarios.len())
            .unwrap_or(0)
    }

    /// Project prefix of the ticket key (the part before the dash)
    pub fn project(&self) -> &str {
        self.key.split('-').next().unwrap_or(&self.key)
    }
}

impl TestingSpecification {
    /// Validate the testing specification
    pub fn validate(&self) -> Result<()> {
        for scenario in &self.scenarios {
            if scenario.name.trim().is_empty() {
                return Err(Error::Validation(
                    "Scenario name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Validate a ticket key of the `PROJ-123` shape
pub fn validate_key(key: &str) -> Result<()> {
    let valid = match key.split_once('-') {
        Some((project, number)) => {
            !project.is_empty()
                && project
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                && project.starts_with(|c: char| c.is_ascii_uppercase())
                && !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid ticket key '{}' (expected e.g. PROJ-123)",
            key
        )))
    }
}
