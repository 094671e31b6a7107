use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{check_availability, show_occupancy};
use crate::handler::space::{
    deactivate_space, register_space, show_space, show_space_list, show_visible_spaces,
    update_space,
};

pub fn build_space_routers() -> Router<AppRegistry> {
    let spaces_routers = Router::new()
        .route("/", post(register_space))
        .route("/", get(show_space_list))
        .route("/visible", get(show_visible_spaces))
        .route("/:space_id", get(show_space))
        .route("/:space_id", put(update_space))
        .route("/:space_id", delete(deactivate_space))
        .route("/:space_id/availability", get(check_availability))
        .route("/:space_id/occupancy", get(show_occupancy));

    Router::new().nest("/spaces", spaces_routers)
}
