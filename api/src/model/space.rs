use chrono::NaiveTime;
use garde::Validate;
use kernel::model::{
    id::SpaceId,
    space::{
        event::{CreateSpace, UpdateSpace},
        Space, SpaceStatus,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    #[serde(default)]
    pub equipment: Vec<String>,
    #[garde(skip)]
    pub opens_at: Option<NaiveTime>,
    #[garde(skip)]
    pub closes_at: Option<NaiveTime>,
    #[garde(skip)]
    #[serde(default = "default_status")]
    pub status: SpaceStatus,
}

fn default_status() -> SpaceStatus {
    SpaceStatus::Available
}

impl From<CreateSpaceRequest> for CreateSpace {
    fn from(value: CreateSpaceRequest) -> Self {
        let CreateSpaceRequest {
            name,
            location,
            capacity,
            equipment,
            opens_at,
            closes_at,
            status,
        } = value;
        CreateSpace {
            name,
            location,
            capacity,
            equipment,
            opens_at,
            closes_at,
            status,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    #[garde(inner(length(min = 1)))]
    pub name: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub location: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub capacity: Option<i32>,
    #[garde(skip)]
    pub equipment: Option<Vec<String>>,
    #[garde(skip)]
    pub opens_at: Option<NaiveTime>,
    #[garde(skip)]
    pub closes_at: Option<NaiveTime>,
    #[garde(skip)]
    pub status: Option<SpaceStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacesResponse {
    pub items: Vec<SpaceResponse>,
}

impl From<Vec<Space>> for SpacesResponse {
    fn from(value: Vec<Space>) -> Self {
        Self {
            items: value.into_iter().map(SpaceResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
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

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space {
            id,
            name,
            location,
            capacity,
            equipment,
            opens_at,
            closes_at,
            status,
            is_active,
        } = value;
        Self {
            id,
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

pub struct UpdateSpaceRequestWithIds {
    space_id: SpaceId,
    requested_by: kernel::model::id::UserId,
    request: UpdateSpaceRequest,
}

impl UpdateSpaceRequestWithIds {
    pub fn new(
        space_id: SpaceId,
        requested_by: kernel::model::id::UserId,
        request: UpdateSpaceRequest,
    ) -> Self {
        Self {
            space_id,
            requested_by,
            request,
        }
    }
}

impl From<UpdateSpaceRequestWithIds> for UpdateSpace {
    fn from(value: UpdateSpaceRequestWithIds) -> Self {
        let UpdateSpaceRequestWithIds {
            space_id,
            requested_by,
            request,
        } = value;
        UpdateSpace {
            space_id,
            name: request.name,
            location: request.location,
            capacity: request.capacity,
            equipment: request.equipment,
            opens_at: request.opens_at,
            closes_at: request.closes_at,
            status: request.status,
            requested_by,
        }
    }
}
