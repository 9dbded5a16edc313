use reviewbot_core::review::create_review_prompt;
use tracing::{error, info, warn};

use crate::devops::PullRequest;
use crate::extractor;
use crate::AppState;

/// What one review cycle did for one pull request.
///
/// Every failure mode degrades to an outcome instead of an error; nothing
/// in the pipeline propagates past the trigger layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// A comment thread was created with the generated feedback.
    Posted,
    /// No iterations or no qualifying file changes; nothing to review.
    NoChanges,
    /// The completion service failed or returned nothing usable.
    NoFeedback,
    /// Feedback was generated but the comment thread could not be created.
    PublishFailed,
}

/// Run one extract -> generate -> publish cycle for a pull request that
/// already passed the author filter.
pub async fn review_pull_request(state: &AppState, pr: &PullRequest) -> ReviewOutcome {
    info!(
        "Reviewing PR #{} - {} by {}",
        pr.pull_request_id, pr.title, pr.created_by.display_name
    );

    let changes = match extractor::extract_changes(&state.devops, pr).await {
        Ok(changes) => changes,
        Err(e) => {
            warn!(
                "Could not extract changes for PR #{}: {}",
                pr.pull_request_id, e
            );
            return ReviewOutcome::NoChanges;
        }
    };

    if changes.is_empty() {
        info!("No reviewable changes in PR #{}", pr.pull_request_id);
        return ReviewOutcome::NoChanges;
    }

    let prompt = create_review_prompt(&changes);

    let feedback = match state
        .openai
        .complete(&prompt, &state.config.model, state.config.max_tokens)
        .await
    {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!(
                "Completion service failed for PR #{}: {}",
                pr.pull_request_id, e
            );
            return ReviewOutcome::NoFeedback;
        }
    };

    if feedback.is_empty() {
        warn!("Empty feedback for PR #{}, not posting", pr.pull_request_id);
        return ReviewOutcome::NoFeedback;
    }

    match state
        .devops
        .create_comment_thread(pr.pull_request_id, &feedback)
        .await
    {
        Ok(()) => ReviewOutcome::Posted,
        Err(e) => {
            error!(
                "Failed to post review comment on PR #{}: {}",
                pr.pull_request_id, e
            );
            ReviewOutcome::PublishFailed
        }
    }
}
