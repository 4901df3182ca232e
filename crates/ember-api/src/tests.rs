//! Router tests against an in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{header, Request, StatusCode},
  Router,
};
use ember_store_sqlite::SqliteStore;
use serde_json::{json, Value};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn app() -> Router<()> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(
  app: &Router<()>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(value) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(value.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn create_user(app: &Router<()>) -> Uuid {
  let (status, body) = send(app, "POST", "/users", None).await;
  assert_eq!(status, StatusCode::CREATED);
  body["user_id"].as_str().unwrap().parse().unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_user() {
  let app = app().await;
  let id = create_user(&app).await;

  let (status, body) = send(&app, "GET", &format!("/users/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user_id"].as_str().unwrap(), id.to_string());
  assert_eq!(body["verified"], json!(false));
}

#[tokio::test]
async fn missing_user_is_404() {
  let app = app().await;
  let (status, body) =
    send(&app, "GET", &format!("/users/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

// ─── Swipes ──────────────────────────────────────────────────────────────────

async fn like(app: &Router<()>, actor: Uuid, target: Uuid) -> (StatusCode, Value) {
  send(
    app,
    "POST",
    &format!("/users/{actor}/swipes"),
    Some(json!({ "target_id": target, "kind": "like" })),
  )
  .await
}

#[tokio::test]
async fn mutual_like_over_http_creates_a_match() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;

  let (status, body) = like(&app, a, b).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["outcome"]["outcome"], json!("none"));

  let (status, body) = like(&app, b, a).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["outcome"]["outcome"], json!("created"));

  let (status, body) =
    send(&app, "GET", &format!("/users/{a}/matches"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_like_is_400() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;

  like(&app, a, b).await;
  let (status, _) = like(&app, a, b).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exhausted_super_likes_are_429() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;
  let c = create_user(&app).await;

  let super_like = |target: Uuid| {
    json!({ "target_id": target, "kind": "super_like" })
  };
  let (status, _) = send(
    &app,
    "POST",
    &format!("/users/{a}/swipes"),
    Some(super_like(b)),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(
    &app,
    "POST",
    &format!("/users/{a}/swipes"),
    Some(super_like(c)),
  )
  .await;
  assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn swiping_a_deleted_user_is_410() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;

  let (status, _) = send(&app, "DELETE", &format!("/users/{b}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = like(&app, a, b).await;
  assert_eq!(status, StatusCode::GONE);
}

// ─── Rewind ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rewind_with_no_history_is_404() {
  let app = app().await;
  let a = create_user(&app).await;

  let (status, _) =
    send(&app, "POST", &format!("/users/{a}/rewind"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rewind_flow_over_http() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;

  let (status, _) = send(
    &app,
    "PUT",
    &format!("/users/{a}/plan"),
    Some(json!({ "plan": "premium" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  send(
    &app,
    "POST",
    &format!("/users/{a}/swipes"),
    Some(json!({ "target_id": b, "kind": "pass" })),
  )
  .await;

  let (status, body) =
    send(&app, "POST", &format!("/users/{a}/rewind"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["action"]["kind"], json!("pass"));
  assert_eq!(body["remaining_rewinds"], json!(4));

  // The same action again, by id, conflicts.
  let action_id = body["action"]["action_id"].as_str().unwrap();
  let (status, _) = send(
    &app,
    "POST",
    &format!("/users/{a}/rewind/{action_id}"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_reveal_by_same_user_is_409() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;
  like(&app, a, b).await;
  let (_, body) = like(&app, b, a).await;
  let match_id = body["outcome"]["match_id"].as_str().unwrap().to_owned();

  let reveal = json!({ "user_id": a });
  let (status, _) = send(
    &app,
    "POST",
    &format!("/matches/{match_id}/reveal"),
    Some(reveal.clone()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    &app,
    "POST",
    &format!("/matches/{match_id}/reveal"),
    Some(reveal),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn outsider_reveal_is_403() {
  let app = app().await;
  let a = create_user(&app).await;
  let b = create_user(&app).await;
  let c = create_user(&app).await;
  like(&app, a, b).await;
  let (_, body) = like(&app, b, a).await;
  let match_id = body["outcome"]["match_id"].as_str().unwrap().to_owned();

  let (status, _) = send(
    &app,
    "POST",
    &format!("/matches/{match_id}/reveal"),
    Some(json!({ "user_id": c })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn deactivation_round_trip() {
  let app = app().await;
  let a = create_user(&app).await;

  let (status, body) = send(
    &app,
    "POST",
    &format!("/users/{a}/deactivate"),
    Some(json!({ "reason": "vacation" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["state"], json!("deactivated"));

  let (status, body) =
    send(&app, "POST", &format!("/users/{a}/reactivate"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["state"], json!("active"));

  let (status, _) =
    send(&app, "POST", &format!("/users/{a}/reactivate"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deletion_request_and_cancel() {
  let app = app().await;
  let a = create_user(&app).await;

  let (status, body) =
    send(&app, "POST", &format!("/users/{a}/deletion"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["state"], json!("deletion_requested"));
  assert!(body["purge_scheduled_for"].is_string());

  let (status, body) =
    send(&app, "DELETE", &format!("/users/{a}/deletion"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["state"], json!("active"));
}

#[tokio::test]
async fn throttled_export_is_400() {
  let app = app().await;
  let a = create_user(&app).await;

  let (status, _) = send(
    &app,
    "POST",
    &format!("/users/{a}/exports"),
    Some(json!({ "format": "json" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(
    &app,
    "POST",
    &format!("/users/{a}/exports"),
    Some(json!({ "format": "csv" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Moderation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_and_resolution_over_http() {
  let app = app().await;
  let reporter = create_user(&app).await;
  let reported = create_user(&app).await;
  let admin = create_user(&app).await;
  send(
    &app,
    "POST",
    &format!("/users/{admin}/admin"),
    Some(json!({ "admin": true })),
  )
  .await;

  let (status, body) = send(
    &app,
    "POST",
    "/reports",
    Some(json!({
      "reporter_id": reporter,
      "reported_id": reported,
      "reason": "bot_account",
      "details": "likes everything instantly",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let report_id = body["report_id"].as_str().unwrap().to_owned();

  let (status, body) = send(
    &app,
    "POST",
    &format!("/reports/{report_id}/resolve"),
    Some(json!({ "reviewer_id": admin })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], json!("resolved"));

  // Filing moved the score; it is served without recomputing.
  let (status, body) =
    send(&app, "GET", &format!("/users/{reported}/trust"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["report_count"], json!(1));
}
