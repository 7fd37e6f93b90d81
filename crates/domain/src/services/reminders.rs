//! Reminder evaluation over the appointment collection.
//!
//! Two pieces work together:
//!
//! - [`evaluate`] derives persistent notification candidates from the
//!   collection (upcoming / reminder / overdue / confirmation). It is pure
//!   and idempotent: the composite notification id makes repeated passes
//!   converge in the log.
//! - [`ReminderQueue`] schedules the sharp-edged alerts (24h, 2h, 30min,
//!   starting-now) as explicit wake times in a min-heap, so each threshold
//!   fires at most once per appointment even when scans are delayed or a
//!   whole window is slept through.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::models::{Appointment, AppointmentStatus, Notification, NotificationKind, Priority};

/// Minutes past the scheduled start before an overdue appointment escalates
/// to urgent.
pub const OVERDUE_ESCALATION_MINUTES: i64 = 15;

/// Hours a pending appointment may wait before a confirmation nag is raised.
pub const CONFIRMATION_NAG_HOURS: i64 = 24;

/// Derives notification candidates from the collection at `now`.
///
/// Wall-clock date/time fields carry no timezone; they are compared against
/// `now` in UTC. Appointments with malformed date/time strings are skipped.
pub fn evaluate(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Notification> {
    let now_naive = now.naive_utc();
    let mut candidates = Vec::new();

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Confirmed => {
                if let Some(starts_at) = appointment.starts_at() {
                    evaluate_confirmed(appointment, starts_at, now_naive, now, &mut candidates);
                }
            }
            AppointmentStatus::Pending => {
                let waiting = now.signed_duration_since(appointment.created_at);
                if waiting > Duration::hours(CONFIRMATION_NAG_HOURS) {
                    let hours = div_ceil(waiting.num_minutes(), 60);
                    candidates.push(Notification::for_appointment(
                        NotificationKind::Confirmation,
                        appointment,
                        "Unconfirmed appointment",
                        format!(
                            "{}'s appointment has waited {} hours for confirmation",
                            appointment.client_name, hours
                        ),
                        Priority::Medium,
                        now,
                    ));
                }
            }
            AppointmentStatus::Cancelled | AppointmentStatus::Completed => {}
        }
    }

    candidates
}

fn evaluate_confirmed(
    appointment: &Appointment,
    starts_at: NaiveDateTime,
    now_naive: NaiveDateTime,
    now: DateTime<Utc>,
    candidates: &mut Vec<Notification>,
) {
    // Compared at second granularity: truncating to whole minutes would
    // drop appointments less than a minute from their boundary.
    let delta = starts_at.signed_duration_since(now_naive);

    if delta > Duration::zero() && delta <= Duration::hours(24) {
        let hours_ceil = div_ceil(delta.num_seconds(), 3600);
        let priority = if delta <= Duration::hours(2) {
            Priority::High
        } else {
            Priority::Medium
        };
        candidates.push(Notification::for_appointment(
            NotificationKind::Upcoming,
            appointment,
            "Upcoming appointment",
            format!(
                "{} has an appointment in {} hour{}",
                appointment.client_name,
                hours_ceil,
                if hours_ceil == 1 { "" } else { "s" }
            ),
            priority,
            now,
        ));
    }

    if delta > Duration::zero() && delta <= Duration::hours(1) {
        let minutes_ceil = div_ceil(delta.num_seconds(), 60);
        candidates.push(Notification::for_appointment(
            NotificationKind::Reminder,
            appointment,
            "Appointment soon",
            format!(
                "{} has an appointment in {} minutes",
                appointment.client_name, minutes_ceil
            ),
            Priority::High,
            now,
        ));
    }

    if delta < Duration::zero() {
        let late = (-delta).num_minutes();
        let priority = if late > OVERDUE_ESCALATION_MINUTES {
            Priority::Urgent
        } else {
            Priority::High
        };
        let message = if late < 60 {
            format!(
                "{}'s appointment started {} minute{} ago",
                appointment.client_name,
                late,
                if late == 1 { "" } else { "s" }
            )
        } else {
            format!(
                "{}'s appointment started {} hours ago",
                appointment.client_name,
                div_ceil(late, 60)
            )
        };
        candidates.push(Notification::for_appointment(
            NotificationKind::Overdue,
            appointment,
            "Overdue appointment",
            message,
            priority,
            now,
        ));
    }
}

fn div_ceil(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}

/// The sharp alert thresholds relative to an appointment's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReminderThreshold {
    DayBefore,
    TwoHoursBefore,
    HalfHourBefore,
    StartingNow,
}

impl ReminderThreshold {
    pub const ALL: [ReminderThreshold; 4] = [
        ReminderThreshold::DayBefore,
        ReminderThreshold::TwoHoursBefore,
        ReminderThreshold::HalfHourBefore,
        ReminderThreshold::StartingNow,
    ];

    /// How long before the appointment start this threshold wakes up.
    pub fn offset(&self) -> Duration {
        match self {
            ReminderThreshold::DayBefore => Duration::hours(24),
            ReminderThreshold::TwoHoursBefore => Duration::hours(2),
            ReminderThreshold::HalfHourBefore => Duration::minutes(30),
            ReminderThreshold::StartingNow => Duration::zero(),
        }
    }

    /// Stable identifier used in notification ids.
    pub fn slug(&self) -> &'static str {
        match self {
            ReminderThreshold::DayBefore => "24h",
            ReminderThreshold::TwoHoursBefore => "2h",
            ReminderThreshold::HalfHourBefore => "30m",
            ReminderThreshold::StartingNow => "now",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReminderThreshold::DayBefore => "Appointment in 24 hours",
            ReminderThreshold::TwoHoursBefore => "Appointment in 2 hours",
            ReminderThreshold::HalfHourBefore => "Appointment in 30 minutes",
            ReminderThreshold::StartingNow => "Appointment starting now",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            ReminderThreshold::DayBefore => Priority::Low,
            ReminderThreshold::TwoHoursBefore => Priority::Medium,
            ReminderThreshold::HalfHourBefore => Priority::High,
            ReminderThreshold::StartingNow => Priority::Urgent,
        }
    }
}

/// A threshold that has come due for a specific appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub appointment_id: String,
    pub client_name: String,
    pub service: String,
    pub time: String,
    pub threshold: ReminderThreshold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueEntry {
    wake_at: NaiveDateTime,
    reminder: DueReminder,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.wake_at
            .cmp(&other.wake_at)
            .then_with(|| self.reminder.appointment_id.cmp(&other.reminder.appointment_id))
            .then_with(|| self.reminder.threshold.cmp(&other.reminder.threshold))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of scheduled reminder wake times.
///
/// Rebuilt from the current collection on every scan; the fired set keyed by
/// `(appointment id, threshold)` guarantees at-most-once delivery across
/// rebuilds. Wake times already in the past at rebuild are not armed, so a
/// threshold slept through while the service was down stays silent instead
/// of firing stale alerts (overdue handling is the evaluator's job).
#[derive(Debug, Default)]
pub struct ReminderQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
    fired: HashSet<(String, ReminderThreshold)>,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arms the queue from the current collection.
    ///
    /// Only confirmed appointments with a parseable schedule get wake times.
    /// Fired markers for appointments no longer in the collection are pruned.
    pub fn rebuild(&mut self, appointments: &[Appointment], now: DateTime<Utc>) {
        let now_naive = now.naive_utc();
        self.heap.clear();

        let live_ids: HashSet<&str> = appointments.iter().map(|a| a.id.as_str()).collect();
        self.fired.retain(|(id, _)| live_ids.contains(id.as_str()));

        for appointment in appointments {
            if appointment.status != AppointmentStatus::Confirmed {
                continue;
            }
            let Some(starts_at) = appointment.starts_at() else {
                continue;
            };
            for threshold in ReminderThreshold::ALL {
                if self.fired.contains(&(appointment.id.clone(), threshold)) {
                    continue;
                }
                let wake_at = starts_at - threshold.offset();
                if wake_at < now_naive {
                    continue;
                }
                self.heap.push(Reverse(QueueEntry {
                    wake_at,
                    reminder: DueReminder {
                        appointment_id: appointment.id.clone(),
                        client_name: appointment.client_name.clone(),
                        service: appointment.service.clone(),
                        time: appointment.time.clone(),
                        threshold,
                    },
                }));
            }
        }
    }

    /// Pops every reminder whose wake time has passed, marking it fired.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<DueReminder> {
        let now_naive = now.naive_utc();
        let mut due = Vec::new();

        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.wake_at > now_naive {
                break;
            }
            let Reverse(entry) = self.heap.pop().expect("peeked entry present");
            let key = (entry.reminder.appointment_id.clone(), entry.reminder.threshold);
            if self.fired.insert(key) {
                due.push(entry.reminder);
            }
        }

        due
    }

    /// The next scheduled wake time, if any.
    pub fn next_wake_at(&self) -> Option<NaiveDateTime> {
        self.heap.peek().map(|Reverse(entry)| entry.wake_at)
    }
}
