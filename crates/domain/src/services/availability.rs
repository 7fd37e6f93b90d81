//! Slot availability for a calendar date.

use crate::models::Appointment;

/// The fixed half-hour booking grid, 09:00 through 17:30.
pub const BASE_SLOTS: [&str; 18] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

/// Returns the base slots for `date` minus slots already taken by an
/// appointment on that date.
///
/// Occupancy is an exact time-string match; a long service does not block
/// the following slots. Cancelled appointments still occupy their slot, as
/// the admin may revive them by hand.
pub fn available_slots(date: &str, appointments: &[Appointment]) -> Vec<String> {
    let occupied: Vec<&str> = appointments
        .iter()
        .filter(|a| a.date == date)
        .map(|a| a.time.as_str())
        .collect();

    BASE_SLOTS
        .iter()
        .filter(|slot| !occupied.contains(slot))
        .map(|slot| slot.to_string())
        .collect()
}
