use axum::async_trait;
use octocrab::Octocrab;

use crate::bot::{IssueClient, NewIssue};
use crate::github::api::operations::{create_issue, create_issue_comment, ApiCallError};
use crate::github::{GithubRepoName, PullRequestNumber};

/// Provides access to the issues of repositories of a single app installation using the
/// GitHub API.
pub struct GithubIssueClient {
    /// The client caches the access token for the installation and refreshes it once it
    /// expires.
    client: Octocrab,
}

impl GithubIssueClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IssueClient for GithubIssueClient {
    /// The comment will be posted as the GitHub App user of the bot.
    async fn create_comment(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        body: &str,
    ) -> Result<(), ApiCallError> {
        create_issue_comment(&self.client, repo, issue, body).await
    }

    async fn create_issue(
        &self,
        repo: &GithubRepoName,
        issue: &NewIssue,
    ) -> Result<(), ApiCallError> {
        create_issue(&self.client, repo, issue).await
    }
}
