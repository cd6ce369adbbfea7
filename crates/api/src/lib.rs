mod response;
mod routes;
mod state;
mod utils;

use axum::Router;

pub use response::{AppError, AppSuccess, GenericResponse};
pub use routes::{
    batch_routes, evaluation_routes, misc_routes, panel_routes, question_routes, search_routes,
};
pub use state::CoachState;
pub use utils::setup_tracing;

/// Routes that answer within a single request timeout.
pub fn interactive_routes() -> Router<CoachState> {
    Router::new()
        .merge(search_routes())
        .merge(evaluation_routes())
        .merge(panel_routes())
        .merge(question_routes())
        .merge(misc_routes())
}

/// Every route, still waiting for its state.
pub fn coach_routes() -> Router<CoachState> {
    interactive_routes().merge(batch_routes())
}
