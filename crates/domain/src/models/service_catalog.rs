//! The fixed service catalog offered by the salon.
//!
//! The catalog is static data, not a database table: the `service` field on
//! an appointment is a free-text label with no referential integrity to it.

use serde::{Deserialize, Serialize};

/// A bookable salon service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonService {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Nominal duration in minutes. Informational only; slot availability
    /// does not consider it.
    pub duration: u32,
    pub description: String,
}

/// Returns the salon's service catalog.
pub fn service_catalog() -> Vec<SalonService> {
    [
        ("1", "Corte de Cabello", 25.0, 45, "Corte personalizado según tu estilo"),
        ("2", "Peinado Profesional", 20.0, 30, "Peinados para eventos especiales"),
        ("3", "Tinte Completo", 45.0, 120, "Color uniforme y duradero"),
        ("4", "Mechas & Balayage", 65.0, 180, "Técnicas modernas de iluminación"),
        ("5", "Manicura Clásica", 15.0, 30, "Cuidado completo de uñas"),
        ("6", "Pedicura Spa", 25.0, 45, "Relajación y cuidado de pies"),
    ]
    .into_iter()
    .map(|(id, name, price, duration, description)| SalonService {
        id: id.to_string(),
        name: name.to_string(),
        price,
        duration,
        description: description.to_string(),
    })
    .collect()
}
