use axum::extract::DefaultBodyLimit;
use axum::Router;
use axum::routing::post;
use crate::handler::match_handler::detect_and_identify;
use crate::state::match_state::MatchState;

pub fn new_match_route(body_limit: usize) -> Router<MatchState> {

    let router = Router::new()
        .route("/detect_and_identify", post(detect_and_identify))
        .layer(DefaultBodyLimit::max(body_limit));
    router
}
