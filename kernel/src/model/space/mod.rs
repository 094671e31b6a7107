use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::id::SpaceId;

pub mod event;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[sqlx(type_name = "space_status", rename_all = "lowercase")]
pub enum SpaceStatus {
    Available,
    Reserved,
    Maintenance,
}

#[derive(Debug, Clone)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Vec<String>,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub status: SpaceStatus,
    pub is_active: bool,
}

impl Space {
    /// Booking users only see active spaces that are not under maintenance.
    /// Administrators list everything.
    pub fn is_visible(&self) -> bool {
        self.is_active && self.status != SpaceStatus::Maintenance
    }

    /// Operating hours, falling back to the system-wide defaults when the
    /// space does not declare its own.
    pub fn operating_hours(
        &self,
        default_opens_at: NaiveTime,
        default_closes_at: NaiveTime,
    ) -> (NaiveTime, NaiveTime) {
        (
            self.opens_at.unwrap_or(default_opens_at),
            self.closes_at.unwrap_or(default_closes_at),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(status: SpaceStatus, is_active: bool) -> Space {
        Space {
            id: SpaceId::new(),
            name: "Auditorio Central".into(),
            location: "Edificio A".into(),
            capacity: 50,
            equipment: vec!["proyector".into()],
            opens_at: None,
            closes_at: None,
            status,
            is_active,
        }
    }

    #[test]
    fn maintenance_spaces_are_not_visible() {
        assert!(!space(SpaceStatus::Maintenance, true).is_visible());
    }

    #[test]
    fn deactivated_spaces_are_not_visible() {
        assert!(!space(SpaceStatus::Available, false).is_visible());
    }

    #[test]
    fn active_available_spaces_are_visible() {
        assert!(space(SpaceStatus::Available, true).is_visible());
    }

    #[test]
    fn operating_hours_fall_back_to_defaults() {
        let opens = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let closes = NaiveTime::from_hms_opt(22, 0, 0).unwrap();

        let mut s = space(SpaceStatus::Available, true);
        assert_eq!(s.operating_hours(opens, closes), (opens, closes));

        let own_open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        s.opens_at = Some(own_open);
        assert_eq!(s.operating_hours(opens, closes), (own_open, closes));
    }
}
