//! Jira-style tracker REST client over basic auth.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::bridge::Tracker;
use crate::config::TrackerConfig;
use crate::models::ticket::TicketKey;
use crate::tracker::types::{CreatedIssue, NewIssue, Principal, Transition};
use crate::{AppError, Result};

/// Issue type used for tickets created from threads.
const ISSUE_TYPE: &str = "Task";

/// REST client for the configured tracker instance.
///
/// Constructed once at startup and shared by reference; every call is a
/// fresh, uncached request against the live tracker state.
pub struct TrackerClient {
    http: reqwest::Client,
    server_url: String,
    username: String,
    api_token: String,
    project_key: String,
    parent_key: Option<String>,
}

impl TrackerClient {
    /// Build a client from validated configuration.
    #[must_use]
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: config.server_url.clone(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            project_key: config.project_key.clone(),
            parent_key: config.parent_key.clone(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/rest/api/2/{path}", self.server_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.api(path))
            .basic_auth(&self.username, Some(&self.api_token))
    }
}

/// Fail with `AppError::Tracker` unless the response status is a success.
async fn expect_success(context: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Tracker(format!(
        "{context} returned {status}: {body}"
    )))
}

fn send_error(context: &str, err: &reqwest::Error) -> AppError {
    AppError::Tracker(format!("{context} request failed: {err}"))
}

#[derive(Debug, Deserialize)]
struct CreatedIssueResponse {
    key: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    transitions: Vec<Transition>,
}

#[async_trait]
impl Tracker for TrackerClient {
    async fn create_issue(&self, fields: &NewIssue) -> Result<CreatedIssue> {
        let mut issue_fields = json!({
            "project": { "key": self.project_key },
            "summary": fields.summary,
            "description": fields.description,
            "issuetype": { "name": ISSUE_TYPE },
        });
        if let Some(ref parent) = self.parent_key {
            issue_fields["parent"] = json!({ "key": parent });
        }

        let response = self
            .request(reqwest::Method::POST, "issue")
            .json(&json!({ "fields": issue_fields }))
            .send()
            .await
            .map_err(|err| send_error("create issue", &err))?;
        let response = expect_success("create issue", response).await?;

        let created: CreatedIssueResponse = response
            .json()
            .await
            .map_err(|err| AppError::Tracker(format!("create issue: invalid response: {err}")))?;

        debug!(ticket = %created.key, "issue created");
        let key = TicketKey(created.key);
        let url = self.browse_url(&key);
        Ok(CreatedIssue { key, url })
    }

    async fn transitions(&self, key: &TicketKey) -> Result<Vec<Transition>> {
        let response = self
            .request(reqwest::Method::GET, &format!("issue/{key}/transitions"))
            .send()
            .await
            .map_err(|err| send_error("get transitions", &err))?;
        let response = expect_success("get transitions", response).await?;

        let parsed: TransitionsResponse = response
            .json()
            .await
            .map_err(|err| AppError::Tracker(format!("get transitions: invalid response: {err}")))?;
        Ok(parsed.transitions)
    }

    async fn apply_transition(&self, key: &TicketKey, transition_id: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("issue/{key}/transitions"))
            .json(&json!({ "transition": { "id": transition_id } }))
            .send()
            .await
            .map_err(|err| send_error("apply transition", &err))?;
        expect_success("apply transition", response).await?;
        Ok(())
    }

    async fn search_users(&self, email: &str) -> Result<Vec<Principal>> {
        let response = self
            .request(reqwest::Method::GET, "user/search")
            .query(&[("query", email)])
            .send()
            .await
            .map_err(|err| send_error("search users", &err))?;
        let response = expect_success("search users", response).await?;

        response
            .json()
            .await
            .map_err(|err| AppError::Tracker(format!("search users: invalid response: {err}")))
    }

    async fn assign(&self, key: &TicketKey, account_id: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, &format!("issue/{key}/assignee"))
            .json(&json!({ "accountId": account_id }))
            .send()
            .await
            .map_err(|err| send_error("assign issue", &err))?;
        expect_success("assign issue", response).await?;
        Ok(())
    }

    async fn add_comment(&self, key: &TicketKey, body: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("issue/{key}/comment"))
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(|err| send_error("add comment", &err))?;
        expect_success("add comment", response).await?;
        Ok(())
    }

    async fn add_attachment(&self, key: &TicketKey, filename: &str, content: &[u8]) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(content.to_vec())
            .file_name(filename.to_owned())
            .mime_str("text/plain; charset=utf-8")
            .map_err(|err| AppError::Tracker(format!("add attachment: invalid part: {err}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .request(reqwest::Method::POST, &format!("issue/{key}/attachments"))
            .header("X-Atlassian-Token", "no-check")
            .multipart(form)
            .send()
            .await
            .map_err(|err| send_error("add attachment", &err))?;
        expect_success("add attachment", response).await?;
        Ok(())
    }

    fn browse_url(&self, key: &TicketKey) -> String {
        format!("{}/browse/{key}", self.server_url)
    }
}
