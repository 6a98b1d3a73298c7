use crate::{config::JiraConfig, Error, Result};
use log::{debug, warn};
use reqwest::{header, Client as ReqwestClient, Url};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    fields: Option<IssueFields>,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    labels: Option<Vec<String>>,
}

/// Minimal client for the Jira Cloud REST API v3.
#[derive(Debug)]
pub struct JiraClient {
    base_url: String,
    email: String,
    api_token: String,
    client: ReqwestClient,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let client = ReqwestClient::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    // The key is a single, escaped path segment whatever characters it holds.
    fn issue_url(&self, issue_key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| format!("invalid Jira base-url: {}", e))?;
        url.path_segments_mut()
            .map_err(|_| "invalid Jira base-url: cannot be a base")?
            .pop_if_empty()
            .extend(&["rest", "api", "3", "issue", issue_key]);
        Ok(url)
    }

    /// Labels of an issue, or an empty list if the issue has none reported.
    ///
    /// Jira API docs: https://developer.atlassian.com/cloud/jira/platform/rest/v3/api-group-issues/#api-rest-api-3-issue-issueidorkey-get
    pub async fn fetch_labels(&self, issue_key: &str) -> Result<Vec<String>> {
        let url = self.issue_url(issue_key)?;
        let response = self
            .client
            .get(url)
            .query(&[("fields", "labels")])
            .basic_auth(&self.email, Some(&self.api_token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        debug!("Jira Response: {:#?}", response);

        if !response.status().is_success() {
            return Err(Error::Jira(response.status()));
        }

        let issue: IssueResponse = serde_json::from_str(&response.text().await?)?;
        match issue.fields.and_then(|fields| fields.labels) {
            Some(labels) => Ok(labels),
            None => {
                warn!("{}: Failed to find labels", issue_key);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::JiraClient;
    use crate::config::JiraConfig;

    fn client(base_url: &str) -> JiraClient {
        JiraClient::new(&JiraConfig {
            base_url: base_url.to_owned(),
            email: "dev@example.com".to_owned(),
            api_token: "jira-token".to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn issue_url() {
        let url = client("https://example.atlassian.net").issue_url("PROJ-7").unwrap();
        assert_eq!(url.as_str(), "https://example.atlassian.net/rest/api/3/issue/PROJ-7");

        let url = client("https://example.com/jira/").issue_url("PROJ-7").unwrap();
        assert_eq!(url.path(), "/jira/rest/api/3/issue/PROJ-7");
    }

    #[test]
    fn issue_key_cannot_escape_its_segment() {
        let url = client("https://example.atlassian.net/")
            .issue_url("PROJ-7/../../admin?x=1")
            .unwrap();
        assert_eq!(url.path(), "/rest/api/3/issue/PROJ-7%2F..%2F..%2Fadmin%3Fx=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn bad_base_url() {
        assert!(client("not a url").issue_url("PROJ-7").is_err());
    }
}
