use chrono::NaiveTime;

use crate::model::id::UserId;

/// Last-writer-wins update of the singleton policy record. Fields left as
/// `None` keep their current value; the stored version is bumped on every
/// write.
#[derive(Debug)]
pub struct UpdatePolicy {
    pub min_lead_time_days: Option<i64>,
    pub max_duration_hours: Option<i64>,
    pub default_opens_at: Option<NaiveTime>,
    pub default_closes_at: Option<NaiveTime>,
    pub allow_weekend_bookings: Option<bool>,
    pub academic_priority: Option<bool>,
    pub reminder_lead_days: Option<i64>,
    pub notifications_enabled: Option<bool>,
    pub requested_by: UserId,
}
