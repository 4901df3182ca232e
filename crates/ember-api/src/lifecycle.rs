//! Handlers for account lifecycle endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users/:id/account` | Computed state plus raw markers |
//! | `POST`   | `/users/:id/deactivate` | Body: `{"reason":"…"}`, optional |
//! | `POST`   | `/users/:id/reactivate` | 400 when not deactivated |
//! | `POST`   | `/users/:id/deletion` | Schedules the purge after grace |
//! | `DELETE` | `/users/:id/deletion` | Cancels inside the grace period |
//! | `POST`   | `/users/:id/exports` | Body: `{"format":"json"}`; throttled |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use ember_core::{
  lifecycle::{AccountState, AccountStatus, DataExport, ExportFormat},
  store::PlatformStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Account status with the state computed at response time.
#[derive(Debug, Serialize)]
pub struct AccountView {
  pub state: AccountState,
  #[serde(flatten)]
  pub status: AccountStatus,
}

impl AccountView {
  fn now(status: AccountStatus) -> Self {
    Self { state: status.state(Utc::now()), status }
  }
}

/// `GET /users/:id/account`
pub async fn account<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ApiError> {
  let status = store.account_status(id).await.map_err(ApiError::store)?;
  Ok(Json(AccountView::now(status)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeactivateBody {
  pub reason: Option<String>,
}

/// `POST /users/:id/deactivate`
pub async fn deactivate<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Option<Json<DeactivateBody>>,
) -> Result<Json<AccountView>, ApiError> {
  let reason = body.and_then(|Json(b)| b.reason);
  let status = store
    .deactivate(id, reason)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(AccountView::now(status)))
}

/// `POST /users/:id/reactivate`
pub async fn reactivate<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ApiError> {
  let status = store.reactivate(id).await.map_err(ApiError::store)?;
  Ok(Json(AccountView::now(status)))
}

/// `POST /users/:id/deletion`
pub async fn request_deletion<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ApiError> {
  let status = store.request_deletion(id).await.map_err(ApiError::store)?;
  Ok(Json(AccountView::now(status)))
}

/// `DELETE /users/:id/deletion`
pub async fn cancel_deletion<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ApiError> {
  let status = store.cancel_deletion(id).await.map_err(ApiError::store)?;
  Ok(Json(AccountView::now(status)))
}

#[derive(Debug, Deserialize)]
pub struct ExportBody {
  pub format: ExportFormat,
}

/// `POST /users/:id/exports`
pub async fn request_export<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ExportBody>,
) -> Result<impl IntoResponse, ApiError> {
  let export: DataExport = store
    .request_export(id, body.format)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(export)))
}
