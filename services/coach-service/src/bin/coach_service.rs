use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use coach_common::{CoachEnv, EnvVars};
use coach_service_api::{batch_routes, interactive_routes, setup_tracing, CoachState};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let env = CoachEnv::load();
    let state = CoachState::from_env(&env);

    let cors = CorsLayer::very_permissive();
    let trace = TraceLayer::new_for_http();

    // batch evaluation runs one model call per pair and is left unbounded
    let app = Router::new()
        .merge(interactive_routes().layer(TimeoutLayer::new(REQUEST_TIMEOUT)))
        .merge(batch_routes())
        .layer(cors)
        .layer(trace)
        .with_state(state);

    let port = env.port;
    let listener = tokio::net::TcpListener::bind(format!(":::{port}")).await?;

    tracing::info!("LISTENING ON {port}");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
