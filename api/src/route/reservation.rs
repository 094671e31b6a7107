use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    approve_reservation, cancel_reservation, reject_reservation, show_my_reservations,
    show_reservation, show_reservations_by_state, submit_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/", post(submit_reservation))
        .route("/", get(show_reservations_by_state))
        .route("/me", get(show_my_reservations))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/approve", put(approve_reservation))
        .route("/:reservation_id/reject", put(reject_reservation))
        .route("/:reservation_id/cancel", put(cancel_reservation));

    Router::new().nest("/reservations", reservations_routers)
}
