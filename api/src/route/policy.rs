use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::policy::{show_policy, update_policy};

pub fn build_policy_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/policy", get(show_policy))
        .route("/policy", put(update_policy))
}
