use reviewbot_core::diff::{line_diff, ChangeKind, FileChange};
use tracing::{info, warn};

use crate::devops::{AzureDevOpsClient, ChangeEntry, DevOpsError, Iteration, PullRequest};

/// Collect the changed lines of a pull request's latest iteration.
///
/// Fetches both branch-tip contents for every edited or added file and
/// diffs them line by line. A PR with no iterations or no qualifying
/// changes yields an empty list, which callers treat as "nothing to
/// review". Per-file fetch or diff problems skip that file only; the
/// remaining files are still processed.
pub async fn extract_changes(
    client: &AzureDevOpsClient,
    pr: &PullRequest,
) -> Result<Vec<FileChange>, DevOpsError> {
    let iterations = client.list_iterations(pr.pull_request_id).await?;

    let Some(latest) = latest_iteration(&iterations) else {
        info!("PR #{} has no iterations", pr.pull_request_id);
        return Ok(Vec::new());
    };

    let entries = client
        .get_iteration_changes(pr.pull_request_id, latest)
        .await?;

    let source_branch = branch_short_name(&pr.source_ref_name);
    let target_branch = branch_short_name(&pr.target_ref_name);

    let mut changes = Vec::new();
    for entry in &entries {
        match file_change_for_entry(client, entry, source_branch, target_branch).await {
            Ok(Some(change)) => changes.push(change),
            Ok(None) => {}
            Err(e) => {
                let path = entry
                    .item
                    .as_ref()
                    .and_then(|item| item.path.as_deref())
                    .unwrap_or("<unknown>");
                warn!("Skipping {}: {}", path, e);
            }
        }
    }

    info!(
        "PR #{}: {} of {} change entries qualify for review",
        pr.pull_request_id,
        changes.len(),
        entries.len()
    );

    Ok(changes)
}

async fn file_change_for_entry(
    client: &AzureDevOpsClient,
    entry: &ChangeEntry,
    source_branch: &str,
    target_branch: &str,
) -> Result<Option<FileChange>, DevOpsError> {
    let Some(item) = &entry.item else {
        return Ok(None);
    };
    if item.is_folder {
        return Ok(None);
    }
    let Some(path) = &item.path else {
        return Ok(None);
    };

    match entry.change_type.as_str() {
        "edit" => {
            let source = client.get_item_content(path, source_branch).await?;
            let target = client.get_item_content(path, target_branch).await?;
            let diff = line_diff(&target, &source);
            if diff.is_empty() {
                return Ok(None);
            }
            Ok(Some(FileChange::new(path, ChangeKind::Edit, Some(diff))))
        }
        "add" => {
            // The file does not exist on the target branch; diff against
            // empty content so every line shows as added.
            let source = client.get_item_content(path, source_branch).await?;
            let diff = line_diff("", &source);
            if diff.is_empty() {
                return Ok(None);
            }
            Ok(Some(FileChange::new(path, ChangeKind::Add, Some(diff))))
        }
        "delete" => Ok(Some(FileChange::new(path, ChangeKind::Delete, None))),
        _ => Ok(None),
    }
}

fn latest_iteration(iterations: &[Iteration]) -> Option<i64> {
    iterations.iter().map(|iteration| iteration.id).max()
}

/// `refs/heads/feature` -> `feature`. Content fetches take the bare branch
/// name, not the full ref.
fn branch_short_name(ref_name: &str) -> &str {
    ref_name.strip_prefix("refs/heads/").unwrap_or(ref_name)
}
