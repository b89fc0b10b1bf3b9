//! FocusOS mail routes.
//!
//! Axum server for the transactional email endpoints the app calls when
//! friends are invited or accept.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let friend_routes = Router::new()
        .route("/send-request", post(routes::friends::send_request))
        .route("/accept", post(routes::friends::accept))
        .route("/test", get(routes::friends::mail_status));

    Router::new()
        .nest("/api/friends", friend_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run_server(state: AppState, bind: &str) -> anyhow::Result<()> {
    if !state.mail.is_configured() {
        tracing::warn!("RESEND_API_KEY not set; emails will be skipped");
    }
    let app = create_router(state);

    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Mail routes listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
