use super::{
    health::build_health_check_routers, policy::build_policy_routers,
    reservation::build_reservation_routers, space::build_space_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_space_routers())
        .merge(build_reservation_routers())
        .merge(build_policy_routers());
    Router::new().nest("/api/v1", router)
}
