use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Postboard endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler))
        .route(
            "/posts",
            get(handler::list_posts)
                .post(handler::create_post)
                .fallback(handler::collection_method_not_allowed),
        )
        .route(
            "/posts/:id",
            get(handler::get_post)
                .put(handler::update_post)
                .delete(handler::delete_post)
                .fallback(handler::item_method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
