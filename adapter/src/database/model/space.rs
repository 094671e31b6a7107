use chrono::NaiveTime;
use kernel::model::{
    id::SpaceId,
    space::{Space, SpaceStatus},
};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SpaceRow {
    pub space_id: SpaceId,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub equipment: Vec<String>,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub status: SpaceStatus,
    pub is_active: bool,
}

impl From<SpaceRow> for Space {
    fn from(value: SpaceRow) -> Self {
        let SpaceRow {
            space_id,
            name,
            location,
            capacity,
            equipment,
            opens_at,
            closes_at,
            status,
            is_active,
        } = value;
        Space {
            id: space_id,
            name,
            location,
            capacity,
            equipment,
            opens_at,
            closes_at,
            status,
            is_active,
        }
    }
}
