use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, Utc, Weekday};

use crate::model::interval::TimeWindow;
use crate::model::space::Space;

pub mod event;

/// System-wide booking constraints, owned by administrators.
///
/// The record is versioned; evaluation always works on the snapshot it was
/// handed, so a concurrent policy update cannot produce a half-old,
/// half-new verdict.
#[derive(Debug, Clone)]
pub struct Policy {
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

/// A candidate reservation as seen by the evaluator. Attendance is optional
/// so interactive availability checks can run before the requester has
/// filled in a head count.
#[derive(Debug, Clone, Copy)]
pub struct ReservationDraft {
    pub window: TimeWindow,
    pub expected_attendance: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    LeadTime { required_days: i64 },
    MaxDuration { max_hours: i64 },
    OutsideOperatingHours { opens_at: NaiveTime, closes_at: NaiveTime },
    WeekendNotAllowed,
    CapacityExceeded { capacity: i32, requested: i32 },
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleViolation::LeadTime { required_days } => write!(
                f,
                "reservations must be submitted at least {required_days} day(s) in advance"
            ),
            RuleViolation::MaxDuration { max_hours } => {
                write!(f, "reservations may not exceed {max_hours} hour(s)")
            }
            RuleViolation::OutsideOperatingHours { opens_at, closes_at } => write!(
                f,
                "the requested time falls outside operating hours ({opens_at}-{closes_at})"
            ),
            RuleViolation::WeekendNotAllowed => {
                write!(f, "weekend bookings are not allowed by the current policy")
            }
            RuleViolation::CapacityExceeded { capacity, requested } => write!(
                f,
                "expected attendance ({requested}) exceeds the space capacity ({capacity})"
            ),
        }
    }
}

/// Evaluates every policy rule against a candidate reservation.
///
/// Checks are independent and never short-circuit, so the caller can report
/// all problems at once instead of one per round trip.
pub fn evaluate(
    draft: &ReservationDraft,
    space: &Space,
    policy: &Policy,
    now: DateTime<Utc>,
) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if draft.window.start() - now < Duration::days(policy.min_lead_time_days) {
        violations.push(RuleViolation::LeadTime {
            required_days: policy.min_lead_time_days,
        });
    }

    if draft.window.duration() > Duration::hours(policy.max_duration_hours) {
        violations.push(RuleViolation::MaxDuration {
            max_hours: policy.max_duration_hours,
        });
    }

    let (opens_at, closes_at) =
        space.operating_hours(policy.default_opens_at, policy.default_closes_at);
    let (outside_hours, touches_weekend) = scan_days(&draft.window, opens_at, closes_at);

    if outside_hours {
        violations.push(RuleViolation::OutsideOperatingHours { opens_at, closes_at });
    }

    if touches_weekend && !policy.allow_weekend_bookings {
        violations.push(RuleViolation::WeekendNotAllowed);
    }

    if let Some(requested) = draft.expected_attendance {
        if requested > space.capacity {
            violations.push(RuleViolation::CapacityExceeded {
                capacity: space.capacity,
                requested,
            });
        }
    }

    violations
}

/// Walks every calendar day the window touches and reports whether any
/// daily segment escapes the operating hours, and whether any day is a
/// weekend day. The window is half-open, so an end exactly at midnight
/// belongs to the previous day.
fn scan_days(window: &TimeWindow, opens_at: NaiveTime, closes_at: NaiveTime) -> (bool, bool) {
    let mut outside_hours = false;
    let mut touches_weekend = false;

    let mut day = window.start().date_naive();
    let last_day = (window.end() - Duration::nanoseconds(1)).date_naive();

    while day <= last_day {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            touches_weekend = true;
        }

        let Some(next_day) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        let midnight = day.and_time(NaiveTime::MIN).and_utc();
        let next_midnight = next_day.and_time(NaiveTime::MIN).and_utc();

        let segment_start = window.start().max(midnight);
        let segment_end = window.end().min(next_midnight);

        if segment_start.time() < opens_at {
            outside_hours = true;
        }
        // A segment running up to midnight is past any closing time that a
        // NaiveTime can express, so it is always out of hours.
        if segment_end == next_midnight || segment_end.time() > closes_at {
            outside_hours = true;
        }

        day = next_day;
    }

    (outside_hours, touches_weekend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::SpaceId;
    use crate::model::space::SpaceStatus;
    use chrono::TimeZone;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn policy() -> Policy {
        Policy {
            version: 1,
            min_lead_time_days: 2,
            max_duration_hours: 8,
            default_opens_at: hm(8, 0),
            default_closes_at: hm(22, 0),
            allow_weekend_bookings: true,
            academic_priority: false,
            reminder_lead_days: 1,
            notifications_enabled: true,
            updated_at: Utc::now(),
        }
    }

    fn space() -> Space {
        Space {
            id: SpaceId::new(),
            name: "Sala Magna".into(),
            location: "Edificio B".into(),
            capacity: 50,
            equipment: vec![],
            opens_at: None,
            closes_at: None,
            status: SpaceStatus::Available,
            is_active: true,
        }
    }

    // 2025-06-02 is a Monday.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn draft(start: DateTime<Utc>, end: DateTime<Utc>, attendance: i32) -> ReservationDraft {
        ReservationDraft {
            window: TimeWindow::new(start, end).unwrap(),
            expected_attendance: Some(attendance),
        }
    }

    #[test]
    fn a_compliant_draft_has_no_violations() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 40), &space(), &policy(), now());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn lead_time_is_enforced() {
        let start = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 3, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations.contains(&RuleViolation::LeadTime { required_days: 2 }));
    }

    #[test]
    fn maximum_duration_is_enforced() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 17, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations.contains(&RuleViolation::MaxDuration { max_hours: 8 }));
    }

    #[test]
    fn bookings_before_opening_are_out_of_hours() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 7, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 9, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations.contains(&RuleViolation::OutsideOperatingHours {
            opens_at: hm(8, 0),
            closes_at: hm(22, 0),
        }));
    }

    #[test]
    fn bookings_past_closing_are_out_of_hours() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 20, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 23, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations
            .iter()
            .any(|v| matches!(v, RuleViolation::OutsideOperatingHours { .. })));
    }

    #[test]
    fn a_window_crossing_midnight_is_out_of_hours_even_within_duration() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 21, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 6, 2, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations
            .iter()
            .any(|v| matches!(v, RuleViolation::OutsideOperatingHours { .. })));
    }

    #[test]
    fn weekend_rule_applies_when_disabled() {
        let mut p = policy();
        p.allow_weekend_bookings = false;
        // 2025-06-07 is a Saturday.
        let start = Utc.with_ymd_and_hms(2025, 6, 7, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 7, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &p, now());
        assert!(violations.contains(&RuleViolation::WeekendNotAllowed));
    }

    #[test]
    fn weekend_bookings_pass_when_allowed() {
        let start = Utc.with_ymd_and_hms(2025, 6, 7, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 7, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &space(), &policy(), now());
        assert!(violations.is_empty());
    }

    #[test]
    fn capacity_is_enforced_independently_of_the_slot() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 60), &space(), &policy(), now());
        assert_eq!(
            violations,
            vec![RuleViolation::CapacityExceeded {
                capacity: 50,
                requested: 60,
            }]
        );
    }

    #[test]
    fn attendance_is_skipped_when_not_provided() {
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let d = ReservationDraft {
            window: TimeWindow::new(start, end).unwrap(),
            expected_attendance: None,
        };
        assert!(evaluate(&d, &space(), &policy(), now()).is_empty());
    }

    #[test]
    fn all_violations_are_reported_together() {
        // Too close in time, too long, and over capacity at once.
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 2, 21, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 60), &space(), &policy(), now());
        assert!(violations.contains(&RuleViolation::LeadTime { required_days: 2 }));
        assert!(violations.contains(&RuleViolation::MaxDuration { max_hours: 8 }));
        assert!(violations.contains(&RuleViolation::CapacityExceeded {
            capacity: 50,
            requested: 60,
        }));
    }

    #[test]
    fn per_space_hours_override_the_defaults() {
        let mut s = space();
        s.opens_at = Some(hm(14, 0));
        let start = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let violations = evaluate(&draft(start, end, 10), &s, &policy(), now());
        assert!(violations.contains(&RuleViolation::OutsideOperatingHours {
            opens_at: hm(14, 0),
            closes_at: hm(22, 0),
        }));
    }
}
