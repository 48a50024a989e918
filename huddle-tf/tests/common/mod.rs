//! Shared helpers for the HTTP integration tests
//!
//! Each test gets its own in-memory database and a router built from the
//! real application state, exercised with `tower::ServiceExt::oneshot`.

// Not every test binary uses every helper
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use huddle_common::db::init_memory_database;
use huddle_tf::{build_router, AppContext};

pub async fn setup() -> (Router, AppContext) {
    let db = init_memory_database().await.expect("in-memory db");
    let ctx = AppContext::new(db);
    (build_router(ctx.clone()), ctx)
}

/// Make an HTTP request against the router and decode the JSON body
pub async fn make_request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let mut builder = Request::builder().method(method).uri(path);

    let request = if let Some(json_body) = body {
        builder = builder.header("content-type", "application/json");
        builder.body(Body::from(json_body.to_string())).unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };

    (status, json)
}

pub async fn seed_user(db: &SqlitePool, email: &str, name: &str, archetype: Option<&str>) -> i64 {
    sqlx::query("INSERT INTO users (email, full_name, archetype) VALUES (?, ?, ?)")
        .bind(email)
        .bind(name)
        .bind(archetype)
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn seed_capability(db: &SqlitePool, user_id: i64, name: &str, proficiency: &str) {
    sqlx::query("INSERT INTO capabilities (user_id, name, proficiency) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(name)
        .bind(proficiency)
        .execute(db)
        .await
        .unwrap();
}

pub async fn seed_hackathon(db: &SqlitePool, title: &str, required_tags: &[&str]) -> i64 {
    let tags = serde_json::to_string(required_tags).unwrap();
    sqlx::query("INSERT INTO hackathons (title, required_capabilities) VALUES (?, ?)")
        .bind(title)
        .bind(tags)
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Create a Forming team with the lead already enrolled as a member
pub async fn seed_team(
    db: &SqlitePool,
    name: &str,
    lead_id: i64,
    hackathon_id: Option<i64>,
) -> i64 {
    let team_id = sqlx::query("INSERT INTO teams (name, lead_id, hackathon_id) VALUES (?, ?, ?)")
        .bind(name)
        .bind(lead_id)
        .bind(hackathon_id)
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid();

    sqlx::query("INSERT INTO team_memberships (team_id, user_id, role) VALUES (?, ?, 'Lead')")
        .bind(team_id)
        .bind(lead_id)
        .execute(db)
        .await
        .unwrap();

    team_id
}

pub async fn add_member(db: &SqlitePool, team_id: i64, user_id: i64) {
    sqlx::query("INSERT INTO team_memberships (team_id, user_id) VALUES (?, ?)")
        .bind(team_id)
        .bind(user_id)
        .execute(db)
        .await
        .unwrap();
}

/// Insert a jam row directly, bypassing the start operation, so tests can
/// control the clock window
pub async fn seed_jam(
    db: &SqlitePool,
    team_id: i64,
    started_by: i64,
    ends_at: DateTime<Utc>,
    status: &str,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO idea_jams (team_id, started_by, started_at, ends_at, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(team_id)
    .bind(started_by)
    .bind(ends_at - Duration::minutes(10))
    .bind(ends_at)
    .bind(status)
    .execute(db)
    .await
    .unwrap()
    .last_insert_rowid()
}

/// A jam whose window closed a minute ago, still stored as Active
pub async fn seed_stale_jam(db: &SqlitePool, team_id: i64, started_by: i64) -> i64 {
    seed_jam(
        db,
        team_id,
        started_by,
        Utc::now() - Duration::minutes(1),
        "Active",
    )
    .await
}

/// A jam already in its Completed terminal state
pub async fn seed_completed_jam(db: &SqlitePool, team_id: i64, started_by: i64) -> i64 {
    seed_jam(
        db,
        team_id,
        started_by,
        Utc::now() - Duration::minutes(1),
        "Completed",
    )
    .await
}
