//! huddle-tf library - Team Formation microservice
//!
//! Coordinates timed Idea Jam sessions, consensus-based team finalization,
//! and candidate/team compatibility scoring.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod broadcast;
pub mod db;
pub mod finalize;
pub mod jam;
pub mod notify;
pub mod scoring;

use broadcast::JamBroadcaster;
use notify::{Notifier, TracingNotifier};
use scoring::personality::{LocalVibeAnalyser, PersonalityInference};

/// Application state shared across HTTP handlers
///
/// AppContext implements Clone, which gives us `FromRef<AppContext>` for
/// free via Axum's blanket implementation.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool
    pub db: SqlitePool,
    /// Per-jam-room event fan-out
    pub broadcaster: Arc<JamBroadcaster>,
    /// Side-effect sink for session-start notifications
    pub notifier: Arc<dyn Notifier>,
    /// Personality inference used by the scoring engine
    pub inference: Arc<dyn PersonalityInference>,
}

impl AppContext {
    /// Create application state with the default collaborators
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            broadcaster: Arc::new(JamBroadcaster::new(100)),
            notifier: Arc::new(TracingNotifier),
            inference: Arc::new(LocalVibeAnalyser),
        }
    }
}

/// Build application router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(api::health))
        // Idea Jam lifecycle
        .route("/jams/start/:team_id", post(api::jam::start_jam))
        .route("/jams/:jam_id", get(api::jam::get_jam))
        .route("/jams/:jam_id/entries", get(api::jam::list_entries))
        .route("/jams/:jam_id/entries", post(api::jam::submit_entry))
        .route(
            "/jams/:jam_id/entries/:entry_id/vote",
            post(api::jam::vote_entry),
        )
        .route("/jams/:jam_id/events", get(api::sse::jam_events))
        // Post-jam survey and finalization
        .route("/jams/:jam_id/survey", post(api::survey::submit_survey))
        .route("/jams/:jam_id/finalize", post(api::survey::finalize_team))
        // Match discovery
        .route("/match/score", get(api::matching::score))
        .route("/match/suggest/:team_id", get(api::matching::suggest_members))
        .route(
            "/match/teams-for-me/:hackathon_id",
            get(api::matching::teams_for_me),
        )
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
