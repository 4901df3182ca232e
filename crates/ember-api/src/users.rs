//! Handlers for `/users` account and quota endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/users` | Creates an unverified account |
//! | `GET`    | `/users/:id` | 404 if not found |
//! | `DELETE` | `/users/:id` | Soft delete; the row survives for purge |
//! | `POST`   | `/users/:id/verify` | Body: `{"verified":true}` |
//! | `POST`   | `/users/:id/admin` | Body: `{"admin":true}` |
//! | `GET`    | `/users/:id/quota` | Lazily grants the plan's credits |
//! | `PUT`    | `/users/:id/plan` | Body: `{"plan":"premium"}` |
//! | `POST`   | `/users/:id/boost` | 429 when no boost credit remains |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use ember_core::{
  quota::{Plan, Quota},
  store::PlatformStore,
  user::User,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `POST /users`
pub async fn create<S: PlatformStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let user = store.add_user().await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/:id`
pub async fn get_one<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

/// `DELETE /users/:id`
pub async fn soft_delete<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.soft_delete_user(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub verified: bool,
}

/// `POST /users/:id/verify`
pub async fn verify<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .set_verified(id, body.verified)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct AdminBody {
  pub admin: bool,
}

/// `POST /users/:id/admin`
pub async fn admin<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AdminBody>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .set_admin(id, body.admin)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}

/// `GET /users/:id/quota`
pub async fn quota<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Quota>, ApiError> {
  let quota = store.quota(id).await.map_err(ApiError::store)?;
  Ok(Json(quota))
}

#[derive(Debug, Deserialize)]
pub struct PlanBody {
  pub plan: Plan,
}

/// `PUT /users/:id/plan`
pub async fn set_plan<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PlanBody>,
) -> Result<Json<Quota>, ApiError> {
  let quota = store
    .set_plan(id, body.plan)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(quota))
}

/// `POST /users/:id/boost`
pub async fn boost<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Quota>, ApiError> {
  let quota = store.activate_boost(id).await.map_err(ApiError::store)?;
  Ok(Json(quota))
}
