use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use crate::devops::DevOpsError;
use crate::filter;
use crate::pipeline;
use crate::AppState;

/// Review all active pull requests on a fixed interval, forever.
///
/// A failed cycle is logged and the next tick proceeds; one PR's failure
/// never stops the rest of the batch.
pub async fn polling_loop(state: Arc<AppState>) {
    let period = Duration::from_secs(state.config.poll_interval_hours * 3600);
    let mut interval = interval(period);

    loop {
        interval.tick().await;

        if let Err(e) = review_active_pull_requests(&state).await {
            error!("Error reviewing pull requests: {}", e);
        }
    }
}

/// One polling cycle: list active PRs, filter, review each in turn.
pub async fn review_active_pull_requests(state: &AppState) -> Result<(), DevOpsError> {
    let pull_requests = state.devops.list_active_pull_requests().await?;
    let now = Utc::now();

    for pr in pull_requests {
        let author = &pr.created_by.display_name;

        if state.ignore.is_ignored(author) {
            info!("Ignoring PR #{} by {}", pr.pull_request_id, author);
            continue;
        }

        if !filter::is_recent(pr.creation_date, now) {
            info!(
                "Skipping PR #{} (created {}, older than 24h)",
                pr.pull_request_id, pr.creation_date
            );
            continue;
        }

        let outcome = pipeline::review_pull_request(state, &pr).await;
        info!("PR #{} review outcome: {:?}", pr.pull_request_id, outcome);
    }

    Ok(())
}
