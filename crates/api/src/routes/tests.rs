use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use engine::{Gamification, GamificationService, ManualClock, ServiceConfig};
use serde_json::{json, Value};
use store::{MemoryStore, StateStore};
use tower::ServiceExt;

use super::router;
use crate::state::AppState;

fn controller() -> Gamification<MemoryStore, ManualClock> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap());
    Gamification::with_clock(StateStore::new(MemoryStore::new()), clock)
}

fn app() -> Router {
    let config = ServiceConfig {
        toast_ttl: None,
        ..ServiceConfig::default()
    };
    let handle = GamificationService::spawn(controller(), config);
    router(Arc::new(AppState::new(handle)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_track_words_returns_unlock_and_progress() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/track/words",
        Some(json!({ "wordCount": 200 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unlocked"][0]["achievement"]["id"], "first-words");
    assert_eq!(body["unlocked"][0]["achievement"]["xpReward"], 100);
    assert_eq!(body["progress"]["totalXp"], 120);
    assert_eq!(body["progress"]["level"], 3);

    let (_, state) = send(&app, "GET", "/api/state", None).await;
    assert_eq!(state["stats"]["totalXP"], 120);
    assert_eq!(state["stats"]["totalWordsWritten"], 200);
    assert_eq!(state["achievements"][0]["unlocked"], true);
}

#[tokio::test]
async fn test_track_format_rejects_unknown_action() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/track/format",
        Some(json!({ "action": "strikethrough" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let (status, body) = send(
        &app,
        "POST",
        "/api/track/format",
        Some(json!({ "action": "bold" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["totalXp"], 10);
}

#[tokio::test]
async fn test_track_save() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/track/save",
        Some(json!({ "wordCount": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unlocked"][0]["achievement"]["id"], "first-save");
    assert_eq!(body["progress"]["totalXp"], 250);
}

#[tokio::test]
async fn test_huge_save_keeps_service_running() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/track/save",
        Some(json!({ "wordCount": u64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["totalXp"], u64::MAX);

    let (status, body) = send(
        &app,
        "POST",
        "/api/track/format",
        Some(json!({ "action": "bold" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"]["totalXp"], u64::MAX);
}

#[tokio::test]
async fn test_achievement_board_filters_by_category() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/achievements", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 20);
    assert_eq!(body["unlocked"], 0);

    let (_, body) = send(&app, "GET", "/api/achievements?category=markdown", None).await;
    assert_eq!(body["total"], 6);
    assert!(body["achievements"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["category"] == "markdown"));

    let (status, _) = send(&app, "GET", "/api/achievements?category=poetry", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dismiss_toast() {
    let app = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/track/words",
        Some(json!({ "wordCount": 250 })),
    )
    .await;
    let id = body["unlocked"][0]["id"].as_str().unwrap().to_string();

    let (_, toasts) = send(&app, "GET", "/api/toasts", None).await;
    assert_eq!(toasts.as_array().unwrap().len(), 1);

    let uri = format!("/api/toasts/{}", id);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, toasts) = send(&app, "GET", "/api/toasts", None).await;
    assert!(toasts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_disables_tracking() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);

    let (_, body) = send(
        &app,
        "POST",
        "/api/track/words",
        Some(json!({ "wordCount": 500 })),
    )
    .await;
    assert!(body["unlocked"].as_array().unwrap().is_empty());
    assert_eq!(body["progress"]["enabled"], false);
    assert_eq!(body["progress"]["totalXp"], 0);
}

#[tokio::test]
async fn test_progress_and_calendar() {
    let app = app();
    send(
        &app,
        "POST",
        "/api/track/words",
        Some(json!({ "wordCount": 60 })),
    )
    .await;

    let (status, progress) = send(&app, "GET", "/api/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["currentStreak"], 1);
    assert_eq!(progress["todayQualified"], true);
    assert_eq!(progress["title"], "Apprentice");

    let (status, calendar) = send(&app, "GET", "/api/streak/calendar", None).await;
    assert_eq!(status, StatusCode::OK);
    let cells = calendar.as_array().unwrap();
    assert_eq!(cells.len(), 30);
    assert_eq!(cells[29]["date"], "2026-06-01");
    assert_eq!(cells[29]["wordsWritten"], 60);
}

#[tokio::test]
async fn test_stopped_service_is_unavailable() {
    let (service, handle) = GamificationService::new(controller(), ServiceConfig::default());
    drop(service);
    let app = router(Arc::new(AppState::new(handle)));

    let (status, body) = send(&app, "GET", "/api/progress", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}
