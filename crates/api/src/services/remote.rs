//! HTTP client for the remote booking collaborator.
//!
//! The collaborator wraps every response in a `{ success, ... }` envelope
//! and authenticates with a bearer credential. Reads get a longer timeout
//! than mutations, which run inside the outbox drain and should fail fast.

use domain::models::{Appointment, Notification};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::RemoteConfig;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote returned status {0}")]
    Status(StatusCode),

    #[error("Remote rejected request: {0}")]
    Rejected(String),

    #[error("Remote client misconfigured: {0}")]
    Config(String),
}

impl RemoteError {
    /// Unknown-id responses are final; retrying cannot fix them.
    pub fn is_permanent(&self) -> bool {
        matches!(self, RemoteError::Status(StatusCode::NOT_FOUND))
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    appointments: Vec<Appointment>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotificationListEnvelope {
    success: bool,
    #[serde(default)]
    notifications: Vec<Notification>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope {
    success: bool,
    appointment: Option<Appointment>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    client_name: &'a str,
    client_email: &'a str,
    client_phone: &'a str,
    service: &'a str,
    date: &'a str,
    time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    total_price: f64,
}

/// Client for the remote appointment store.
pub struct RemoteClient {
    fetch: reqwest::Client,
    mutate: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        if !config.is_enabled() {
            return Err(RemoteError::Config(
                "remote base_url and anon_key must both be set".into(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let bearer = format!("Bearer {}", config.anon_key);
        let mut value = reqwest::header::HeaderValue::from_str(&bearer)
            .map_err(|_| RemoteError::Config("anon_key contains invalid characters".into()))?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let fetch = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .default_headers(headers.clone())
            .build()?;
        let mutate = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.mutate_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            fetch,
            mutate,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetches the full remote appointment collection.
    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, RemoteError> {
        let response = self.fetch.get(self.url("appointments")).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let envelope: ListEnvelope = response.json().await?;
        if !envelope.success {
            return Err(RemoteError::Rejected(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        Ok(envelope.appointments)
    }

    /// Fetches the remote notification log.
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, RemoteError> {
        let response = self.fetch.get(self.url("notifications")).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let envelope: NotificationListEnvelope = response.json().await?;
        if !envelope.success {
            return Err(RemoteError::Rejected(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        Ok(envelope.notifications)
    }

    /// Creates an appointment remotely. The server assigns its own id, so
    /// the returned record supersedes the local one.
    pub async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, RemoteError> {
        let body = CreateBody {
            client_name: &appointment.client_name,
            client_email: &appointment.client_email,
            client_phone: &appointment.client_phone,
            service: &appointment.service,
            date: &appointment.date,
            time: &appointment.time,
            notes: appointment.notes.as_deref(),
            total_price: appointment.total_price,
        };

        let response = self
            .mutate
            .post(self.url("appointments"))
            .json(&body)
            .send()
            .await?;
        self.unwrap_single(response).await
    }

    /// Pushes the full current state of an appointment.
    pub async fn update_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, RemoteError> {
        let response = self
            .mutate
            .put(self.url(&format!("appointments/{}", appointment.id)))
            .json(appointment)
            .send()
            .await?;
        self.unwrap_single(response).await
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<(), RemoteError> {
        let response = self
            .mutate
            .delete(self.url(&format!("appointments/{}", id)))
            .send()
            .await?;
        self.unwrap_ack(response).await
    }

    /// Mirrors a local read-marker to the remote notification log.
    pub async fn mark_notification_read(&self, id: &str) -> Result<(), RemoteError> {
        let response = self.mark_read_request(id).send().await?;
        self.unwrap_ack(response).await
    }

    // The remote exposes the read-marker as an idempotent PUT.
    fn mark_read_request(&self, id: &str) -> reqwest::RequestBuilder {
        self.mutate
            .put(self.url(&format!("notifications/{}/read", id)))
    }

    async fn unwrap_single(&self, response: reqwest::Response) -> Result<Appointment, RemoteError> {
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let envelope: SingleEnvelope = response.json().await?;
        match (envelope.success, envelope.appointment) {
            (true, Some(appointment)) => Ok(appointment),
            (true, None) => Err(RemoteError::Rejected("missing appointment in response".into())),
            (false, _) => Err(RemoteError::Rejected(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            )),
        }
    }

    async fn unwrap_ack(&self, response: reqwest::Response) -> Result<(), RemoteError> {
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let envelope: AckEnvelope = response.json().await?;
        if envelope.success {
            Ok(())
        } else {
            Err(RemoteError::Rejected(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn remote_config() -> RemoteConfig {
        let config = Config::load_for_test(&[
            ("remote.base_url", "https://booking.example.com/api/"),
            ("remote.anon_key", "a-key-long-enough"),
        ])
        .expect("config");
        config.remote
    }

    #[test]
    fn test_client_requires_enabled_config() {
        let disabled = RemoteConfig::default();
        assert!(RemoteClient::new(&disabled).is_err());
        assert!(RemoteClient::new(&remote_config()).is_ok());
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = RemoteClient::new(&remote_config()).expect("client");
        assert_eq!(
            client.url("appointments"),
            "https://booking.example.com/api/appointments"
        );
    }

    #[test]
    fn test_not_found_is_permanent() {
        assert!(RemoteError::Status(StatusCode::NOT_FOUND).is_permanent());
        assert!(!RemoteError::Status(StatusCode::BAD_GATEWAY).is_permanent());
        assert!(!RemoteError::Rejected("nope".into()).is_permanent());
    }

    #[test]
    fn test_list_envelope_parses_server_shape() {
        let json = r#"{
            "success": true,
            "appointments": [{
                "id": "a1",
                "clientName": "María García",
                "clientEmail": "maria@example.com",
                "clientPhone": "12345678",
                "service": "Corte de Cabello",
                "date": "2026-09-01",
                "time": "10:00",
                "status": "pending",
                "totalPrice": 25.0,
                "createdAt": "2026-08-28T12:00:00Z"
            }]
        }"#;
        let envelope: ListEnvelope = serde_json::from_str(json).expect("parse");
        assert!(envelope.success);
        assert_eq!(envelope.appointments.len(), 1);
        assert_eq!(envelope.appointments[0].client_name, "María García");
    }

    #[test]
    fn test_mark_read_is_a_put_on_the_read_resource() {
        let client = RemoteClient::new(&remote_config()).expect("client");
        let request = client
            .mark_read_request("upcoming-a1")
            .build()
            .expect("request");
        assert_eq!(request.method(), reqwest::Method::PUT);
        assert_eq!(request.url().path(), "/api/notifications/upcoming-a1/read");
    }

    #[test]
    fn test_notification_envelope_parses_server_shape() {
        let json = r#"{
            "success": true,
            "notifications": [{
                "id": "new_appointment-a1",
                "type": "new_appointment",
                "title": "Nueva cita",
                "message": "María García reservó Corte de Cabello",
                "appointmentId": "a1",
                "createdAt": "2026-08-28T12:00:00Z",
                "read": false,
                "priority": "normal"
            }]
        }"#;
        let envelope: NotificationListEnvelope = serde_json::from_str(json).expect("parse");
        assert!(envelope.success);
        assert_eq!(envelope.notifications.len(), 1);
        assert_eq!(
            envelope.notifications[0].kind,
            domain::models::NotificationKind::NewAppointment
        );
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"success": false, "error": "Appointment not found"}"#;
        let envelope: AckEnvelope = serde_json::from_str(json).expect("parse");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Appointment not found"));
    }
}
