use http::StatusCode;
use octocrab::Octocrab;
use serde::Serialize;
use thiserror::Error;

use crate::bot::NewIssue;
use crate::github::{GithubRepoName, PullRequestNumber};

#[derive(Error, Debug)]
pub enum ApiCallError {
    #[error("Network error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("GitHub API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

impl From<octocrab::Error> for ApiCallError {
    fn from(error: octocrab::Error) -> Self {
        Self::Transport(Box::new(error))
    }
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Posts a comment on an issue or a pull request.
///
/// Documentation: https://docs.github.com/en/rest/issues/comments?apiVersion=2022-11-28#create-an-issue-comment
pub async fn create_issue_comment(
    client: &Octocrab,
    repo: &GithubRepoName,
    issue: PullRequestNumber,
    body: &str,
) -> Result<(), ApiCallError> {
    let route = repo_route(repo, &format!("issues/{issue}/comments"));
    post(client, route, &CommentRequest { body }).await
}

/// Opens a new issue.
///
/// Documentation: https://docs.github.com/en/rest/issues/issues?apiVersion=2022-11-28#create-an-issue
pub async fn create_issue(
    client: &Octocrab,
    repo: &GithubRepoName,
    issue: &NewIssue,
) -> Result<(), ApiCallError> {
    let route = repo_route(repo, "issues");
    post(client, route, issue).await
}

/// The route is relative, octocrab prefixes it with the base URI of the client
/// (which includes `/api/v3` on GitHub Enterprise Server).
fn repo_route(repo: &GithubRepoName, path: &str) -> String {
    format!("/repos/{}/{}/{path}", repo.owner(), repo.name())
}

async fn post<B: Serialize>(
    client: &Octocrab,
    route: String,
    body: &B,
) -> Result<(), ApiCallError> {
    let response = match client._post(route.as_str(), Some(body)).await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!("POST {route} failed: {error:?}");
            return Err(error.into());
        }
    };

    let status = response.status();
    let text = client.body_to_string(response).await.unwrap_or_default();
    tracing::trace!("Response from POST {route}: {status} ({text})");

    if status.is_success() {
        Ok(())
    } else {
        Err(ApiCallError::Api {
            status,
            message: error_message(&text),
        })
    }
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    message: String,
}

/// GitHub describes failures with a JSON object containing a `message` field.
fn error_message(text: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(text) {
        Ok(response) => response.message,
        Err(_) => text.to_string(),
    }
}
