//! JIRA REST client

use crate::auth::JiraAuth;
use crate::types::JiraIssue;
use crate::{Error, Result};
use jiraflow_core::models::Ticket;
use reqwest::StatusCode;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JiraClient {
    base_url: String,
    auth: JiraAuth,
    http: reqwest::Client,
}

impl JiraClient {
    pub fn new(base_url: String, auth: JiraAuth) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            http,
        })
    }

    /// Fetch a single issue by key
    pub async fn fetch_issue(&self, key: &str) -> Result<JiraIssue> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, key);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth.to_basic_auth())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(format!("Issue '{}' not found", key))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(format!(
                "JIRA rejected credentials for '{}'",
                self.auth.username()
            ))),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Api(format!(
                    "Unexpected status {} fetching '{}': {}",
                    status,
                    key,
                    body.chars().take(200).collect::<String>()
                )))
            }
            _ => Ok(response.json::<JiraIssue>().await?),
        }
    }

    /// Fetch an issue and convert it to a core ticket
    pub async fn fetch_ticket(&self, key: &str) -> Result<Ticket> {
        let issue = self.fetch_issue(key).await?;
        let ticket = Ticket::from(issue);
        ticket.validate()?;
        Ok(ticket)
    }
}
