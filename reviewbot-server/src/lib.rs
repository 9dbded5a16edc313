pub mod cache;
pub mod config;
pub mod devops;
pub mod extractor;
pub mod filter;
pub mod pipeline;
pub mod poller;
pub mod webhook;

use std::time::Duration;

pub use cache::ProcessedCache;
pub use config::{BotMode, Config};
pub use devops::AzureDevOpsClient;
pub use filter::IgnoreList;

use reviewbot_core::openai::OpenAiClient;

/// How long a webhook-processed PR id is remembered for deduplication.
const PROCESSED_TTL: Duration = Duration::from_secs(60 * 60);

/// Shared state for both trigger layers. Everything here is read-only
/// after startup except the idempotency cache.
pub struct AppState {
    pub config: Config,
    pub devops: AzureDevOpsClient,
    pub openai: OpenAiClient,
    pub ignore: IgnoreList,
    pub processed: ProcessedCache,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let devops = AzureDevOpsClient::new(
            &config.organization_url,
            &config.project,
            &config.repository_id,
            &config.personal_access_token,
        );
        let openai = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_api_base.clone(),
        );
        let ignore = IgnoreList::new(&config.ignored_authors);
        let processed = ProcessedCache::new(PROCESSED_TTL);

        Self {
            config,
            devops,
            openai,
            ignore,
            processed,
        }
    }
}
