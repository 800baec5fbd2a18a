use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::handlers::{health, sessions, users};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        // User routes
        .route("/users", post(users::create_user))
        .route("/users/doAuth", post(users::authenticate_user))
        // Session routes
        .route(
            "/sessions/{session_id}",
            get(sessions::get_session)
                .put(sessions::set_session_vars)
                .delete(sessions::destroy_session),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/v1", v1)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
