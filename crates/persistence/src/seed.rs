//! Demo data seeding.
//!
//! An empty store running without a remote credential gets two example
//! appointments dated today, so a fresh install has something to show.

use chrono::Utc;
use domain::models::{Appointment, AppointmentStatus};
use tracing::info;

use crate::repositories::AppointmentRepository;

/// Seeds demo appointments when the store is empty. Returns how many
/// records were inserted (zero when the store already has data).
pub async fn seed_demo_appointments(
    repo: &AppointmentRepository,
) -> Result<usize, sqlx::Error> {
    if repo.count().await? > 0 {
        return Ok(0);
    }

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let now = Utc::now();

    let demos = [
        Appointment {
            id: "demo-1".to_string(),
            client_name: "María García".to_string(),
            client_email: "maria@example.com".to_string(),
            client_phone: "12345678".to_string(),
            service: "Corte + Color".to_string(),
            date: today.clone(),
            time: "10:00".to_string(),
            status: AppointmentStatus::Pending,
            notes: Some("Primera cita de demostración".to_string()),
            total_price: 500.0,
            created_at: now,
            reminder_sent: false,
        },
        Appointment {
            id: "demo-2".to_string(),
            client_name: "Ana López".to_string(),
            client_email: "ana@example.com".to_string(),
            client_phone: "87654321".to_string(),
            service: "Manicura Premium".to_string(),
            date: today,
            time: "14:30".to_string(),
            status: AppointmentStatus::Confirmed,
            notes: Some("Cliente frecuente".to_string()),
            total_price: 200.0,
            created_at: now,
            reminder_sent: false,
        },
    ];

    for demo in &demos {
        repo.create(demo).await?;
    }
    info!(count = demos.len(), "Seeded demo appointments");
    Ok(demos.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::test_pool;
    use domain::models::appointment::CreateAppointmentRequest;

    #[tokio::test]
    async fn test_seeds_empty_store() {
        let repo = AppointmentRepository::new(test_pool().await);
        assert_eq!(seed_demo_appointments(&repo).await.expect("seed"), 2);

        let all = repo.list().await.expect("list");
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|a| a.client_name == "María García"));
        assert!(all.iter().any(|a| a.status == AppointmentStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_skips_populated_store() {
        let repo = AppointmentRepository::new(test_pool().await);
        let existing = Appointment::new(CreateAppointmentRequest {
            client_name: "Carla Ruiz".to_string(),
            client_email: "carla@example.com".to_string(),
            client_phone: "11223344".to_string(),
            service: "Corte de Cabello".to_string(),
            date: "2026-09-01".to_string(),
            time: "09:30".to_string(),
            notes: None,
            total_price: 25.0,
        });
        repo.create(&existing).await.expect("create");

        assert_eq!(seed_demo_appointments(&repo).await.expect("seed"), 0);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seeding_twice_is_idempotent() {
        let repo = AppointmentRepository::new(test_pool().await);
        seed_demo_appointments(&repo).await.expect("first");
        assert_eq!(seed_demo_appointments(&repo).await.expect("second"), 0);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
