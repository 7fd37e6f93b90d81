//! Outbox drain job: replays pending sync intents against the remote.

use std::sync::Arc;
use tracing::debug;

use crate::jobs::scheduler::{Job, JobFrequency};
use crate::services::SyncService;

pub struct OutboxDrainJob {
    sync: Arc<SyncService>,
    drain_secs: u64,
    batch_size: u32,
    retention_days: u32,
}

impl OutboxDrainJob {
    pub fn new(sync: Arc<SyncService>, drain_secs: u64, batch_size: u32, retention_days: u32) -> Self {
        Self {
            sync,
            drain_secs,
            batch_size,
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for OutboxDrainJob {
    fn name(&self) -> &'static str {
        "outbox_drain"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.drain_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let delivered = self
            .sync
            .process_pending(self.batch_size)
            .await
            .map_err(|e| e.to_string())?;
        debug!(delivered, "Outbox drain pass finished");

        let pruned = self
            .sync
            .prune_outbox(self.retention_days)
            .await
            .map_err(|e| e.to_string())?;
        if pruned > 0 {
            debug!(pruned, "Pruned settled outbox entries");
        }
        Ok(())
    }
}
