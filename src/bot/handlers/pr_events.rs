use axum::async_trait;

use crate::bot::event::PullRequestOpenedPayload;
use crate::bot::handlers::{FailedCall, GithubOperation, HandlerError};
use crate::bot::{EventHandler, IssueClient, NewIssue};
use crate::github::ApiCallError;

/// Label attached to every tracking issue.
pub const PR_TASK_LABEL: &str = "pr-task";

/// Greets a newly opened pull request with a comment and opens an issue that tracks it.
///
/// Both GitHub calls are always attempted. Neither is retried, and a failure of the second one
/// does not undo the first one.
pub struct PullRequestOpenedHandler {
    comment_template: String,
}

impl PullRequestOpenedHandler {
    pub fn new(comment_template: String) -> Self {
        Self { comment_template }
    }
}

#[async_trait]
impl EventHandler for PullRequestOpenedHandler {
    async fn handle(
        &self,
        client: &dyn IssueClient,
        payload: &serde_json::Value,
    ) -> Result<(), HandlerError> {
        let payload = PullRequestOpenedPayload::from_payload(payload)
            .map_err(|error| HandlerError::MalformedPayload(error.to_string()))?;
        let pr_number = payload.number;
        tracing::info!("Received a pull request event for #{pr_number}");

        let mut failures = vec![];
        if let Err(error) = client
            .create_comment(&payload.repository, pr_number, &self.comment_template)
            .await
        {
            failures.push(failed_call(GithubOperation::CreateComment, error));
        }

        let issue = tracking_issue(&payload);
        if let Err(error) = client.create_issue(&payload.repository, &issue).await {
            failures.push(failed_call(GithubOperation::CreateIssue, error));
        }

        if failures.is_empty() {
            tracing::info!("Created tracking issue for PR #{pr_number}");
            Ok(())
        } else {
            Err(HandlerError::ApiCallsFailed(failures))
        }
    }
}

fn tracking_issue(payload: &PullRequestOpenedPayload) -> NewIssue {
    NewIssue {
        title: format!("🎯 {} - PR #{}", payload.title, payload.number),
        body: format!(
            "This issue is automatically created for tracking the tasks related to PR #{}.",
            payload.number
        ),
        labels: vec![PR_TASK_LABEL.to_string()],
    }
}

fn failed_call(operation: GithubOperation, error: ApiCallError) -> FailedCall {
    match &error {
        ApiCallError::Api { status, message } => {
            tracing::error!("Cannot {operation}: status {status}, message: {message}");
        }
        ApiCallError::Transport(source) => {
            tracing::error!("Cannot {operation} due to a network error: {source:?}");
        }
    }
    FailedCall { operation, error }
}
