//! Handlers for match, message, and block endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/matches` | Live matches only, newest first |
//! | `GET`  | `/matches/:id` | Includes retracted matches |
//! | `POST` | `/matches/:id/reveal` | One-shot per participant; 409 on repeat |
//! | `POST` | `/matches/:id/unmatch` | Soft delete; repeat is a no-op |
//! | `POST` | `/matches/:id/messages` | 404 once the match is retracted |
//! | `POST` | `/blocks` | Blocks are directional but gate both directions |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use ember_core::{
  matching::{Match, Message},
  store::PlatformStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/matches`
pub async fn list_for_user<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Match>>, ApiError> {
  let matches = store.matches_for(id).await.map_err(ApiError::store)?;
  Ok(Json(matches))
}

/// `GET /matches/:id`
pub async fn get_one<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Match>, ApiError> {
  let m = store
    .get_match(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("match {id} not found")))?;
  Ok(Json(m))
}

#[derive(Debug, Deserialize)]
pub struct ParticipantBody {
  pub user_id: Uuid,
}

/// `POST /matches/:id/reveal`
pub async fn reveal<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ParticipantBody>,
) -> Result<Json<Match>, ApiError> {
  let m = store
    .reveal(id, body.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(m))
}

/// `POST /matches/:id/unmatch`
pub async fn unmatch<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ParticipantBody>,
) -> Result<StatusCode, ApiError> {
  store
    .unmatch(id, body.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
  pub sender_id: Uuid,
  pub body:      String,
}

/// `POST /matches/:id/messages`
pub async fn send_message<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MessageBody>,
) -> Result<impl IntoResponse, ApiError> {
  let message: Message = store
    .record_message(id, body.sender_id, body.body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Deserialize)]
pub struct BlockBody {
  pub blocker_id: Uuid,
  pub blocked_id: Uuid,
}

/// `POST /blocks`
pub async fn block<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<BlockBody>,
) -> Result<StatusCode, ApiError> {
  store
    .block(body.blocker_id, body.blocked_id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
