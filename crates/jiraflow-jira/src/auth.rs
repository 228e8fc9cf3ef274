//! JIRA authentication

use crate::{Error, Result};

const KEYRING_SERVICE: &str = "jiraflow";

pub struct JiraAuth {
    username: String,
    api_token: String,
}

impl JiraAuth {
    pub fn new(username: String, api_token: String) -> Self {
        Self {
            username,
            api_token,
        }
    }

    /// Load the API token for a user from the system keyring
    pub fn from_keyring(username: String) -> Result<Self> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &username)?;
        let api_token = entry
            .get_password()
            .map_err(|_| Error::Auth(format!("No stored API token for '{}'", username)))?;
        Ok(Self::new(username, api_token))
    }

    /// Store an API token for a user in the system keyring
    pub fn store_token(username: &str, api_token: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
        entry.set_password(api_token)?;
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_encoding() {
        let auth = JiraAuth::new("user@example.com".to_string(), "token123".to_string());
        // base64("user@example.com:token123")
        assert_eq!(
            auth.to_basic_auth(),
            "Basic dXNlckBleGFtcGxlLmNvbTp0b2tlbjEyMw=="
        );
    }
}
