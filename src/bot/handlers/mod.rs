use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::bot::event::EventKey;
use crate::bot::{EventRouter, RegistrationError};
use crate::github::ApiCallError;

mod pr_events;

pub use pr_events::{PullRequestOpenedHandler, PR_TASK_LABEL};

/// Creates the registration table with all event handlers of the bot.
pub fn create_event_router(pr_comment_template: &str) -> Result<EventRouter, RegistrationError> {
    let mut router = EventRouter::new();
    router.register(
        EventKey::pull_request_opened(),
        PullRequestOpenedHandler::new(pr_comment_template.to_string()),
    )?;
    Ok(router)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GithubOperation {
    CreateComment,
    CreateIssue,
}

impl Display for GithubOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubOperation::CreateComment => f.write_str("create comment"),
            GithubOperation::CreateIssue => f.write_str("create issue"),
        }
    }
}

#[derive(Debug)]
pub struct FailedCall {
    pub operation: GithubOperation,
    pub error: ApiCallError,
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("GitHub API calls failed: {}", format_failed_calls(.0))]
    ApiCallsFailed(Vec<FailedCall>),
}

fn format_failed_calls(calls: &[FailedCall]) -> String {
    calls
        .iter()
        .map(|call| format!("{} ({})", call.operation, call.error))
        .collect::<Vec<_>>()
        .join(", ")
}
