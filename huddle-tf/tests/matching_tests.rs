//! Integration tests for the match discovery endpoints

mod common;

use axum::http::{Method, StatusCode};

use common::*;

#[tokio::test]
async fn score_requires_a_known_user_and_team() {
    let (app, ctx) = setup().await;
    let user = seed_user(&ctx.db, "u@campus.edu", "U", None).await;
    let team = seed_team(&ctx.db, "Rustaceans", user, None).await;

    let (status, _) = make_request(
        &app,
        Method::GET,
        &format!("/match/score?user_id=999&team_id={}", team),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = make_request(
        &app,
        Method::GET,
        &format!("/match/score?user_id={}&team_id=999", user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn score_breaks_down_into_capability_and_vibe() {
    let (app, ctx) = setup().await;
    let lead = seed_user(&ctx.db, "lead@campus.edu", "Lead", Some("Designer")).await;
    let candidate = seed_user(&ctx.db, "cand@campus.edu", "Candidate", Some("Builder")).await;
    seed_capability(&ctx.db, candidate, "Python", "Expert").await;
    let hackathon = seed_hackathon(&ctx.db, "Campus Hack", &["python", "react"]).await;
    let team = seed_team(&ctx.db, "Rustaceans", lead, Some(hackathon)).await;

    let (status, body) = make_request(
        &app,
        Method::GET,
        &format!("/match/score?user_id={}&team_id={}", candidate, team),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();

    let score = body["score"].as_f64().unwrap();
    let capability = body["capability_score"].as_f64().unwrap();
    let vibe = body["vibe_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert!((0.0..=100.0).contains(&capability));
    assert!((0.0..=100.0).contains(&vibe));

    let matched: Vec<&str> = body["matched_capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(matched.contains(&"Python"));
}

#[tokio::test]
async fn team_without_a_hackathon_scores_neutral_capability() {
    let (app, ctx) = setup().await;
    let lead = seed_user(&ctx.db, "lead@campus.edu", "Lead", None).await;
    let candidate = seed_user(&ctx.db, "cand@campus.edu", "Candidate", None).await;
    seed_capability(&ctx.db, candidate, "Python", "Expert").await;
    let team = seed_team(&ctx.db, "Rustaceans", lead, None).await;

    let (_, body) = make_request(
        &app,
        Method::GET,
        &format!("/match/score?user_id={}&team_id={}", candidate, team),
        None,
    )
    .await;

    // No required tags means there is nothing to cover
    assert_eq!(body.unwrap()["capability_score"], 50.0);
}

#[tokio::test]
async fn score_is_deterministic_across_calls() {
    let (app, ctx) = setup().await;
    let lead = seed_user(&ctx.db, "lead@campus.edu", "Lead", None).await;
    let candidate = seed_user(&ctx.db, "cand@campus.edu", "Candidate", None).await;
    let team = seed_team(&ctx.db, "Rustaceans", lead, None).await;

    let path = format!("/match/score?user_id={}&team_id={}", candidate, team);
    let (_, first) = make_request(&app, Method::GET, &path, None).await;
    let (_, second) = make_request(&app, Method::GET, &path, None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn suggestions_are_lead_only() {
    let (app, ctx) = setup().await;
    let lead = seed_user(&ctx.db, "lead@campus.edu", "Lead", None).await;
    let mate = seed_user(&ctx.db, "mate@campus.edu", "Mate", None).await;
    let team = seed_team(&ctx.db, "Rustaceans", lead, None).await;
    add_member(&ctx.db, team, mate).await;

    let (status, _) = make_request(
        &app,
        Method::GET,
        &format!("/match/suggest/{}?user_id={}", team, mate),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn suggestions_exclude_members_and_rank_by_score() {
    let (app, ctx) = setup().await;
    let lead = seed_user(&ctx.db, "lead@campus.edu", "Lead", None).await;
    let mate = seed_user(&ctx.db, "mate@campus.edu", "Mate", None).await;
    let team = seed_team(&ctx.db, "Rustaceans", lead, None).await;
    add_member(&ctx.db, team, mate).await;

    let mut outsiders = Vec::new();
    for i in 0..4 {
        outsiders.push(
            seed_user(
                &ctx.db,
                &format!("person{}@campus.edu", i),
                &format!("Person {}", i),
                None,
            )
            .await,
        );
    }

    let (status, body) = make_request(
        &app,
        Method::GET,
        &format!("/match/suggest/{}?user_id={}", team, lead),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let suggestions = body.unwrap();
    let suggestions = suggestions.as_array().unwrap();
    assert_eq!(suggestions.len(), outsiders.len());

    let mut last = f64::INFINITY;
    for suggestion in suggestions {
        let id = suggestion["user_id"].as_i64().unwrap();
        assert!(id != lead && id != mate, "members must not be suggested");

        let score = suggestion["score"].as_f64().unwrap();
        assert!(score <= last, "suggestions must be sorted descending");
        last = score;
    }
}

#[tokio::test]
async fn teams_for_me_skips_own_teams() {
    let (app, ctx) = setup().await;
    let me = seed_user(&ctx.db, "me@campus.edu", "Me", None).await;
    let other_lead = seed_user(&ctx.db, "ol@campus.edu", "Other Lead", None).await;
    let hackathon = seed_hackathon(&ctx.db, "Campus Hack", &["python"]).await;

    let my_team = seed_team(&ctx.db, "Mine", me, Some(hackathon)).await;
    let open_team = seed_team(&ctx.db, "Open", other_lead, Some(hackathon)).await;

    let (status, body) = make_request(
        &app,
        Method::GET,
        &format!("/match/teams-for-me/{}?user_id={}", hackathon, me),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let matches = body.unwrap();
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["team_id"], open_team);
    assert_ne!(matches[0]["team_id"], my_team);
    assert_eq!(matches[0]["member_count"], 1);
}

#[tokio::test]
async fn teams_for_me_skips_teams_the_user_was_removed_from() {
    let (app, ctx) = setup().await;
    let me = seed_user(&ctx.db, "me@campus.edu", "Me", None).await;
    let other_lead = seed_user(&ctx.db, "ol@campus.edu", "Other Lead", None).await;
    let hackathon = seed_hackathon(&ctx.db, "Campus Hack", &[]).await;
    let old_team = seed_team(&ctx.db, "Old", other_lead, Some(hackathon)).await;
    add_member(&ctx.db, old_team, me).await;

    // Removed during a past finalization: left_at set, row preserved
    sqlx::query("UPDATE team_memberships SET left_at = CURRENT_TIMESTAMP WHERE team_id = ? AND user_id = ?")
        .bind(old_team)
        .bind(me)
        .execute(&ctx.db)
        .await
        .unwrap();

    let (_, body) = make_request(
        &app,
        Method::GET,
        &format!("/match/teams-for-me/{}?user_id={}", hackathon, me),
        None,
    )
    .await;

    assert!(body.unwrap().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn teams_for_me_requires_a_known_hackathon() {
    let (app, ctx) = setup().await;
    let me = seed_user(&ctx.db, "me@campus.edu", "Me", None).await;

    let (status, _) = make_request(
        &app,
        Method::GET,
        &format!("/match/teams-for-me/999?user_id={}", me),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
