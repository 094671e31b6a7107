use chrono::NaiveTime;

use crate::model::id::{SpaceId, UserId};
use crate::model::space::SpaceStatus;

pub struct CreateSpace {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Vec<String>,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub status: SpaceStatus,
}

#[derive(Debug)]
pub struct UpdateSpace {
    pub space_id: SpaceId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub equipment: Option<Vec<String>>,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub status: Option<SpaceStatus>,
    pub requested_by: UserId,
}

#[derive(Debug)]
pub struct DeactivateSpace {
    pub space_id: SpaceId,
    pub requested_by: UserId,
}
