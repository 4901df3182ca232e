//! Handlers for the action log and rewind endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users/:id/swipes` | Body: `{"target_id":…,"kind":"like"}` |
//! | `GET`  | `/users/:id/swipes/:target` | Directed history, oldest first |
//! | `GET`  | `/users/:id/rewindable` | The action `rewind` would reverse |
//! | `POST` | `/users/:id/rewind` | 404 when the history is exhausted |
//! | `POST` | `/users/:id/rewind/:action_id` | 409 when already rewound |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use ember_core::{
  action::{Action, RewindOutcome, SwipeKind},
  store::PlatformStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SwipeBody {
  pub target_id: Uuid,
  pub kind:      SwipeKind,
}

/// `POST /users/:id/swipes`
pub async fn record<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SwipeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let outcome = store
    .record_swipe(id, body.target_id, body.kind)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(outcome)))
}

/// `GET /users/:id/swipes/:target`
pub async fn history<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path((id, target)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Action>>, ApiError> {
  let actions = store
    .action_history(id, target)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(actions))
}

/// `GET /users/:id/rewindable`
pub async fn rewindable<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Option<Action>>, ApiError> {
  let action = store
    .latest_rewindable(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(action))
}

/// `POST /users/:id/rewind`
pub async fn rewind_latest<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RewindOutcome>, ApiError> {
  let outcome = store.rewind(id).await.map_err(ApiError::store)?;
  Ok(Json(outcome))
}

/// `POST /users/:id/rewind/:action_id`
pub async fn rewind_one<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path((id, action_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RewindOutcome>, ApiError> {
  let outcome = store
    .rewind_action(id, action_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(outcome))
}
