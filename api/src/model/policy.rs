use chrono::{DateTime, NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    id::UserId,
    policy::{event::UpdatePolicy, Policy},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
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

impl From<Policy> for PolicyResponse {
    fn from(value: Policy) -> Self {
        let Policy {
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
        Self {
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

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyRequest {
    #[garde(inner(range(min = 0)))]
    pub min_lead_time_days: Option<i64>,
    #[garde(inner(range(min = 1)))]
    pub max_duration_hours: Option<i64>,
    #[garde(skip)]
    pub default_opens_at: Option<NaiveTime>,
    #[garde(skip)]
    pub default_closes_at: Option<NaiveTime>,
    #[garde(skip)]
    pub allow_weekend_bookings: Option<bool>,
    #[garde(skip)]
    pub academic_priority: Option<bool>,
    #[garde(inner(range(min = 0)))]
    pub reminder_lead_days: Option<i64>,
    #[garde(skip)]
    pub notifications_enabled: Option<bool>,
}

impl UpdatePolicyRequest {
    pub fn into_event(self, requested_by: UserId) -> UpdatePolicy {
        let UpdatePolicyRequest {
            min_lead_time_days,
            max_duration_hours,
            default_opens_at,
            default_closes_at,
            allow_weekend_bookings,
            academic_priority,
            reminder_lead_days,
            notifications_enabled,
        } = self;
        UpdatePolicy {
            min_lead_time_days,
            max_duration_hours,
            default_opens_at,
            default_closes_at,
            allow_weekend_bookings,
            academic_priority,
            reminder_lead_days,
            notifications_enabled,
            requested_by,
        }
    }
}
