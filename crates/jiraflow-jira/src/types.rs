//! JIRA API types

use chrono::Utc;
use jiraflow_core::models::{Scenario, TestingSpecification, Ticket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraFields {
    pub summary: String,
    pub description: Option<String>,
    pub issuetype: Option<JiraIssueType>,
    pub status: Option<JiraStatus>,
    #[serde(default)]
    pub components: Vec<JiraComponent>,
    #[serde(rename = "fixVersions", default)]
    pub fix_versions: Vec<JiraVersion>,
    #[serde(rename = "testingSpecification")]
    pub testing_specification: Option<JiraTestingSpecification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueType {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatus {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraComponent {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraVersion {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTestingSpecification {
    #[serde(default)]
    pub scenarios: Vec<JiraScenario>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraScenario {
    #[serde(default)]
    pub name: String,
    pub given: String,
    pub when: String,
    pub then: String,
}

impl From<JiraIssue> for Ticket {
    fn from(issue: JiraIssue) -> Self {
        let fields = issue.fields;

        let testing = fields.testing_specification.map(|spec| {
            let scenarios = spec
                .scenarios
                .into_iter()
                .enumerate()
                .map(|(index, s)| Scenario {
                    name: if s.name.trim().is_empty() {
                        format!("Scenario {}", index + 1)
                    } else {
                        s.name
                    },
                    given: s.given,
                    when: s.when,
                    then: s.then,
                })
                .collect();
            TestingSpecification {
                scenarios,
                notes: spec.notes,
            }
        });

        Ticket {
            key: issue.key,
            summary: fields.summary,
            description: fields.description,
            issue_type: fields
                .issuetype
                .map(|t| t.name)
                .unwrap_or_else(|| "Task".to_string()),
            status: fields
                .status
                .map(|s| s.name)
                .unwrap_or_else(|| "Open".to_string()),
            components: fields.components.into_iter().map(|c| c.name).collect(),
            fix_versions: fields.fix_versions.into_iter().map(|v| v.name).collect(),
            testing,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const SAMPLE_ISSUE: &str = r#"{
        "key": "ACM-1234",
        "fields": {
            "summary": "ClusterCurator upgrade fails on digest lookup",
            "description": "Upgrades using image digests fail.",
            "issuetype": {"name": "Bug"},
            "status": {"name": "In Progress"},
            "components": [{"name": "Cluster Lifecycle"}],
            "fixVersions": [{"name": "2.6.0"}],
            "testingSpecification": {
                "scenarios": [
                    {
                        "name": "",
                        "given": "A managed cluster with a pending upgrade",
                        "when": "The curator resolves the image digest",
                        "then": "The upgrade proceeds to completion"
                    }
                ],
                "notes": "Requires a hub cluster"
            }
        }
    }"#;

    #[test]
    fn test_deserialize_issue() {
        let issue: JiraIssue = serde_json::from_str(SAMPLE_ISSUE).unwrap();
        assert_eq!(issue.key, "ACM-1234");
        assert_eq!(issue.fields.components.len(), 1);
        assert_eq!(issue.fields.fix_versions[0].name, "2.6.0");
    }

    #[test]
    fn test_issue_to_ticket() {
        let issue: JiraIssue = serde_json::from_str(SAMPLE_ISSUE).unwrap();
        let ticket = Ticket::from(issue);

        assert_eq!(ticket.key, "ACM-1234");
        assert_eq!(ticket.issue_type, "Bug");
        assert_eq!(ticket.status, "In Progress");
        assert!(ticket.has_testing_specification());
        // Unnamed scenarios get a positional name
        assert_eq!(
            ticket.testing.as_ref().unwrap().scenarios[0].name,
            "Scenario 1"
        );
        assert!(ticket.validate().is_ok());
    }

    #[test]
    fn test_minimal_issue() {
        let json = r#"{"key": "ACM-1", "fields": {"summary": "Minimal"}}"#;
        let issue: JiraIssue = serde_json::from_str(json).unwrap();
        let ticket = Ticket::from(issue);

        assert_eq!(ticket.issue_type, "Task");
        assert_eq!(ticket.status, "Open");
        assert!(ticket.components.is_empty());
        assert!(!ticket.has_testing_specification());
    }
}
