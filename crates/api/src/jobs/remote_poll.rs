//! Remote poll job: pulls in appointments and notifications produced by
//! other sessions.

use std::sync::Arc;
use tracing::debug;

use crate::jobs::scheduler::{Job, JobFrequency};
use crate::services::SyncService;

pub struct RemotePollJob {
    sync: Arc<SyncService>,
    poll_secs: u64,
    notification_cap: u32,
}

impl RemotePollJob {
    pub fn new(sync: Arc<SyncService>, poll_secs: u64, notification_cap: u32) -> Self {
        Self {
            sync,
            poll_secs,
            notification_cap,
        }
    }
}

#[async_trait::async_trait]
impl Job for RemotePollJob {
    fn name(&self) -> &'static str {
        "remote_poll"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.poll_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let merged = self.sync.refresh().await.map_err(|e| e.to_string())?;
        let ingested = self
            .sync
            .poll_notifications(self.notification_cap)
            .await
            .map_err(|e| e.to_string())?;
        debug!(total = merged.len(), ingested, "Remote poll merged collection");
        Ok(())
    }
}
