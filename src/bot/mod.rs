use std::sync::Arc;

use axum::async_trait;
use octocrab::models::InstallationId;

use crate::github::{ApiCallError, GithubRepoName, PullRequestNumber};

pub mod event;
mod handlers;
mod router;

pub use handlers::{create_event_router, FailedCall, GithubOperation, HandlerError};
pub use handlers::{PullRequestOpenedHandler, PR_TASK_LABEL};
pub use router::{DispatchResult, EventHandler, EventRouter, RegistrationError};

/// Issue that should be opened in a repository.
#[derive(serde::Serialize, Clone, Debug, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Provides the issue operations that event handlers perform on a repository.
///
/// Every call is independent; a failed call does not affect the outcome of other calls.
#[async_trait]
pub trait IssueClient: Send + Sync {
    /// Post a comment to the issue or pull request with the given number.
    async fn create_comment(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        body: &str,
    ) -> Result<(), ApiCallError>;

    /// Open a new issue in the given repository.
    async fn create_issue(&self, repo: &GithubRepoName, issue: &NewIssue)
        -> Result<(), ApiCallError>;
}

/// Hands out API clients authenticated as a specific installation of the GitHub App.
/// It is behind a trait to allow easier mocking in tests.
pub trait InstallationClients: Send + Sync {
    fn for_installation(&self, installation: InstallationId) -> Arc<dyn IssueClient>;
}
