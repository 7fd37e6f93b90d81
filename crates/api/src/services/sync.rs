//! Outbox-backed synchronization with the remote store.
//!
//! Local mutations commit first and leave an intent in the outbox; this
//! service replays those intents against the remote collaborator and merges
//! the remote collection back in on refresh. Records with undelivered
//! intents are never overwritten by remote state.

use chrono::{Duration, Utc};
use domain::models::Appointment;
use persistence::entities::outbox::{OutboxEntity, OutboxOperation};
use persistence::repositories::{AppointmentRepository, NotificationRepository, OutboxRepository};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::services::remote::{RemoteClient, RemoteError};

pub struct SyncService {
    appointments: AppointmentRepository,
    notifications: NotificationRepository,
    outbox: OutboxRepository,
    remote: Option<Arc<RemoteClient>>,
}

impl SyncService {
    pub fn new(
        appointments: AppointmentRepository,
        notifications: NotificationRepository,
        outbox: OutboxRepository,
        remote: Option<Arc<RemoteClient>>,
    ) -> Self {
        Self {
            appointments,
            notifications,
            outbox,
            remote,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Records a create intent. The serialized record travels with the
    /// entry so the drain does not depend on the row still existing.
    pub async fn enqueue_create(&self, appointment: &Appointment) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_string(appointment)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        self.outbox
            .enqueue(OutboxOperation::CreateAppointment, &appointment.id, Some(&payload))
            .await?;
        Ok(())
    }

    pub async fn enqueue_update(&self, appointment: &Appointment) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_string(appointment)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        self.outbox
            .enqueue(OutboxOperation::UpdateAppointment, &appointment.id, Some(&payload))
            .await?;
        Ok(())
    }

    pub async fn enqueue_delete(&self, id: &str) -> Result<(), sqlx::Error> {
        self.outbox
            .enqueue(OutboxOperation::DeleteAppointment, id, None)
            .await?;
        Ok(())
    }

    pub async fn enqueue_mark_read(&self, notification_id: &str) -> Result<(), sqlx::Error> {
        self.outbox
            .enqueue(OutboxOperation::MarkNotificationRead, notification_id, None)
            .await?;
        Ok(())
    }

    /// Replays due outbox entries. Returns the number delivered. A no-op
    /// when no remote is configured: entries simply wait.
    pub async fn process_pending(&self, batch_size: u32) -> Result<usize, sqlx::Error> {
        let Some(remote) = &self.remote else {
            return Ok(0);
        };

        let due = self.outbox.find_due(Utc::now(), batch_size).await?;
        let mut delivered = 0;

        for entry in &due {
            match self.deliver(remote, entry).await {
                Ok(()) => {
                    self.outbox.mark_success(entry.id).await?;
                    delivered += 1;
                }
                Err(e) if e.is_permanent() => {
                    // The remote will never accept this one; retrying is noise.
                    warn!(entry = entry.id, record = %entry.record_id, error = %e,
                          "Dropping undeliverable sync entry");
                    self.outbox.mark_success(entry.id).await?;
                }
                Err(e) => {
                    debug!(entry = entry.id, record = %entry.record_id, error = %e,
                           "Sync attempt failed");
                    self.outbox.record_failure(entry, &e.to_string()).await?;
                }
            }
        }

        if delivered > 0 {
            info!(delivered, "Outbox entries synced to remote");
        }
        Ok(delivered)
    }

    async fn deliver(&self, remote: &RemoteClient, entry: &OutboxEntity) -> Result<(), RemoteError> {
        let operation: OutboxOperation = entry
            .operation
            .parse()
            .map_err(RemoteError::Config)?;

        match operation {
            OutboxOperation::CreateAppointment => {
                let local: Appointment = self.parse_payload(entry)?;
                let server = remote.create_appointment(&local).await?;
                // The server assigns its own id; swap the local record for it.
                if let Err(e) = self.appointments.replace(&entry.record_id, &server).await {
                    warn!(record = %entry.record_id, error = %e,
                          "Failed to adopt server id after create");
                }
                Ok(())
            }
            OutboxOperation::UpdateAppointment => {
                // Push current state, not the snapshot: later edits win.
                match self.appointments.find_by_id(&entry.record_id).await {
                    Ok(Some(current)) => {
                        remote.update_appointment(&current).await?;
                        Ok(())
                    }
                    Ok(None) => Ok(()), // deleted meanwhile, nothing to push
                    Err(e) => Err(RemoteError::Config(format!("local read failed: {}", e))),
                }
            }
            OutboxOperation::DeleteAppointment => remote.delete_appointment(&entry.record_id).await,
            OutboxOperation::MarkNotificationRead => {
                remote.mark_notification_read(&entry.record_id).await
            }
        }
    }

    fn parse_payload(&self, entry: &OutboxEntity) -> Result<Appointment, RemoteError> {
        let payload = entry
            .payload
            .as_deref()
            .ok_or_else(|| RemoteError::Config("outbox entry missing payload".into()))?;
        serde_json::from_str(payload)
            .map_err(|e| RemoteError::Config(format!("bad outbox payload: {}", e)))
    }

    /// Merges the remote collection into the local store and returns the
    /// resulting full list. Without a remote this is just the local list.
    ///
    /// Records with pending outbox intents keep their local state; remote
    /// records never clobber undelivered local edits. Local records absent
    /// from the remote and with nothing pending were deleted elsewhere and
    /// are dropped.
    pub async fn refresh(&self) -> Result<Vec<Appointment>, sqlx::Error> {
        let Some(remote) = &self.remote else {
            return self.appointments.list().await;
        };

        let fetched = match remote.fetch_appointments().await {
            Ok(fetched) => fetched,
            Err(e) => {
                // Best-effort: fall back to the local collection.
                warn!(error = %e, "Remote fetch failed, serving local collection");
                return self.appointments.list().await;
            }
        };

        let protected: HashSet<String> =
            self.outbox.pending_records().await?.into_iter().collect();
        let remote_ids: HashSet<&str> = fetched.iter().map(|a| a.id.as_str()).collect();

        for appointment in &fetched {
            if protected.contains(&appointment.id) {
                continue;
            }
            self.appointments.upsert(appointment).await?;
        }

        for local in self.appointments.list().await? {
            if !remote_ids.contains(local.id.as_str()) && !protected.contains(&local.id) {
                self.appointments.delete(&local.id).await?;
            }
        }

        self.appointments.list().await
    }

    /// Pulls the remote notification log into the local one and returns the
    /// number of new entries. Composite ids make repeated polls converge;
    /// the cap evicts the oldest entries as usual.
    pub async fn poll_notifications(&self, cap: u32) -> Result<usize, sqlx::Error> {
        let Some(remote) = &self.remote else {
            return Ok(0);
        };

        let fetched = match remote.fetch_notifications().await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(error = %e, "Remote notification fetch failed");
                return Ok(0);
            }
        };

        let inserted = self.notifications.ingest(&fetched, cap).await?;
        if !inserted.is_empty() {
            info!(count = inserted.len(), "Ingested remote notifications");
        }
        Ok(inserted.len())
    }

    /// Clears delivered and dead entries past the retention window.
    pub async fn prune_outbox(&self, retention_days: u32) -> Result<u64, sqlx::Error> {
        let cutoff = Utc::now() - Duration::days(retention_days as i64);
        self.outbox.prune(cutoff).await
    }
}
