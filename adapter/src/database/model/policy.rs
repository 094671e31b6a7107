use chrono::{DateTime, NaiveTime, Utc};
use kernel::model::policy::Policy;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct PolicyRow {
    pub version: i32,
    pub min_lead_time_days: i64,
    pub max_duration_hours: i64,
    pub default_opens_at: NaiveTime,
    pub default_closes_at: NaiveTime,
    pub allow_weekend_bookings: bool,
    pub academic_priority: bool,
    pub reminder_lead_days: i64,
    pub notifications_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<PolicyRow> for Policy {
    fn from(value: PolicyRow) -> Self {
        let PolicyRow {
            version,
            min_lead_time_days,
            max_duration_hours,
            default_opens_at,
            default_closes_at,
            allow_weekend_bookings,
            academic_priority,
            reminder_lead_days,
            notifications_enabled,
            updated_at,
        } = value;
        Policy {
            version,
            min_lead_time_days,
            max_duration_hours,
            default_opens_at,
            default_closes_at,
            allow_weekend_bookings,
            academic_priority,
            reminder_lead_days,
            notifications_enabled,
            updated_at,
        }
    }
}
