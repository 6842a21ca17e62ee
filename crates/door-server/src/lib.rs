pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use door_core::config::DoorConfig;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(config: DoorConfig) -> Router {
    let app_state = state::AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Flow document
        .route("/api/door/flow", get(routes::flow::get_flow))
        // Hotlist
        .route("/api/door/hotlist", get(routes::hotlist::list_hotlist))
        .route("/api/door/hotlist", post(routes::hotlist::create_hotlist))
        .route("/api/door/quickadd", post(routes::hotlist::quick_add))
        // Door war
        .route("/api/door/doorwar", post(routes::doorwar::create_doorwar))
        // Warstack
        .route(
            "/api/door/warstack/start",
            post(routes::warstack::start_warstack),
        )
        .route(
            "/api/door/warstack/answer",
            post(routes::warstack::answer_warstack),
        )
        .route(
            "/api/door/warstack/{id}",
            get(routes::warstack::get_warstack),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Start the door flow API server.
pub async fn serve(config: DoorConfig, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(config, listener).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0`
/// and the OS picks a free port).
pub async fn serve_on(config: DoorConfig, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(config);

    tracing::info!("door flow API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
