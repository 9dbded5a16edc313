use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const API_VERSION: &str = "7.1";

/// Errors from the Azure DevOps API, split by kind so callers can decide
/// per call site whether to skip, log, or abort.
#[derive(Debug, thiserror::Error)]
pub enum DevOpsError {
    #[error("Azure DevOps request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Azure DevOps API error while {operation}: {status} - {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    pub title: String,
    pub created_by: IdentityRef,
    pub creation_date: DateTime<Utc>,
    pub status: String,
    pub source_ref_name: String,
    pub target_ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
}

/// One push-driven revision of a pull request's diff.
#[derive(Debug, Clone, Deserialize)]
pub struct Iteration {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IterationChanges {
    #[serde(default)]
    change_entries: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    pub change_type: String,
    pub item: Option<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeItem {
    pub path: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
}

#[derive(Debug, Serialize)]
struct NewCommentThread<'a> {
    comments: Vec<NewComment<'a>>,
    status: &'a str,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    content: &'a str,
}

/// Client for the Azure DevOps Git REST API, scoped to one repository.
///
/// Authenticates every request with the personal access token via Basic
/// auth. Read-only towards pull request state; the only write is comment
/// thread creation.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    client: Client,
    /// `{organization}/{project}/_apis/git/repositories/{repository}`
    base_url: String,
    pat: String,
}

impl AzureDevOpsClient {
    pub fn new(
        organization_url: &str,
        project: &str,
        repository_id: &str,
        personal_access_token: &str,
    ) -> Self {
        let client = Client::builder()
            .user_agent("reviewbot/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        let base_url = format!(
            "{}/{}/_apis/git/repositories/{}",
            organization_url.trim_end_matches('/'),
            project,
            repository_id
        );

        Self {
            client,
            base_url,
            pat: personal_access_token.to_string(),
        }
    }

    pub async fn list_active_pull_requests(&self) -> Result<Vec<PullRequest>, DevOpsError> {
        let url = format!("{}/pullrequests", self.base_url);

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[
                ("searchCriteria.status", "active"),
                ("api-version", API_VERSION),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("listing pull requests", response).await);
        }

        let list: ListResponse<PullRequest> = response.json().await?;
        info!("Found {} active pull requests", list.value.len());

        Ok(list.value)
    }

    pub async fn get_pull_request(&self, pr_id: i64) -> Result<PullRequest, DevOpsError> {
        let url = format!("{}/pullrequests/{}", self.base_url, pr_id);

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("fetching pull request", response).await);
        }

        let pr: PullRequest = response.json().await?;
        info!(
            "Fetched PR #{} ({} -> {})",
            pr.pull_request_id, pr.source_ref_name, pr.target_ref_name
        );

        Ok(pr)
    }

    pub async fn list_iterations(&self, pr_id: i64) -> Result<Vec<Iteration>, DevOpsError> {
        let url = format!("{}/pullrequests/{}/iterations", self.base_url, pr_id);

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("listing iterations", response).await);
        }

        let list: ListResponse<Iteration> = response.json().await?;
        Ok(list.value)
    }

    pub async fn get_iteration_changes(
        &self,
        pr_id: i64,
        iteration_id: i64,
    ) -> Result<Vec<ChangeEntry>, DevOpsError> {
        let url = format!(
            "{}/pullrequests/{}/iterations/{}/changes",
            self.base_url, pr_id, iteration_id
        );

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("listing iteration changes", response).await);
        }

        let changes: IterationChanges = response.json().await?;
        Ok(changes.change_entries)
    }

    /// Fetch the raw content of one file at the tip of a branch.
    pub async fn get_item_content(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<String, DevOpsError> {
        let url = format!("{}/items", self.base_url);

        let response = self
            .client
            .get(&url)
            .basic_auth("", Some(&self.pat))
            .header("Accept", "text/plain")
            .query(&[
                ("path", path),
                ("versionDescriptor.versionType", "branch"),
                ("versionDescriptor.version", branch),
                ("includeContent", "true"),
                ("api-version", API_VERSION),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("fetching file content", response).await);
        }

        Ok(response.text().await?)
    }

    /// Open a new comment thread on a pull request, holding exactly one
    /// comment with `content` and thread status "active". No read-back
    /// verification is performed.
    pub async fn create_comment_thread(
        &self,
        pr_id: i64,
        content: &str,
    ) -> Result<(), DevOpsError> {
        let url = format!("{}/pullrequests/{}/threads", self.base_url, pr_id);

        let thread = NewCommentThread {
            comments: vec![NewComment { content }],
            status: "active",
        };

        let response = self
            .client
            .post(&url)
            .basic_auth("", Some(&self.pat))
            .query(&[("api-version", API_VERSION)])
            .json(&thread)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("creating comment thread", response).await);
        }

        info!("Posted review comment thread on PR #{}", pr_id);
        Ok(())
    }

    async fn api_error(operation: &'static str, response: Response) -> DevOpsError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        error!(
            "Azure DevOps API error while {}: {} - {}",
            operation, status, body
        );
        DevOpsError::Api {
            operation,
            status,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_deserializes_from_wire_form() {
        let json = r#"{
            "pullRequestId": 7,
            "title": "Add feature",
            "createdBy": { "displayName": "Jane Doe" },
            "creationDate": "2024-05-01T12:34:56Z",
            "status": "active",
            "sourceRefName": "refs/heads/feature",
            "targetRefName": "refs/heads/main"
        }"#;

        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.pull_request_id, 7);
        assert_eq!(pr.created_by.display_name, "Jane Doe");
        assert_eq!(pr.source_ref_name, "refs/heads/feature");
        assert_eq!(pr.status, "active");
    }

    #[test]
    fn iteration_changes_tolerate_missing_entries() {
        let changes: IterationChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.change_entries.is_empty());
    }

    #[test]
    fn change_entry_folder_flag_defaults_to_false() {
        let json = r#"{ "changeType": "edit", "item": { "path": "/src/a.py" } }"#;
        let entry: ChangeEntry = serde_json::from_str(json).unwrap();
        let item = entry.item.unwrap();
        assert_eq!(item.path.as_deref(), Some("/src/a.py"));
        assert!(!item.is_folder);
    }

    #[test]
    fn new_thread_serializes_one_active_comment() {
        let thread = NewCommentThread {
            comments: vec![NewComment { content: "looks good" }],
            status: "active",
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["comments"].as_array().unwrap().len(), 1);
        assert_eq!(json["comments"][0]["content"], "looks good");
    }
}
