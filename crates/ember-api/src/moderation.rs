//! Handlers for reports, fraud flags, and trust scores.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use ember_core::{
  store::PlatformStore,
  trust::{
    FraudFlag, FraudSignal, Report, ReportReason, Severity, TrustOutcome,
    TrustScore,
  },
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ReportBody {
  pub reporter_id: Uuid,
  pub reported_id: Uuid,
  pub reason:      ReportReason,
  pub details:     Option<String>,
}

/// `POST /reports`
pub async fn file_report<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<ReportBody>,
) -> Result<impl IntoResponse, ApiError> {
  let report: Report = store
    .file_report(body.reporter_id, body.reported_id, body.reason, body.details)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
  pub reviewer_id: Uuid,
  #[serde(default)]
  pub dismiss: bool,
}

/// `POST /reports/:id/resolve`
pub async fn resolve_report<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ResolveBody>,
) -> Result<Json<Report>, ApiError> {
  let report = store
    .resolve_report(id, body.reviewer_id, body.dismiss)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct FlagBody {
  pub user_id:  Uuid,
  pub signal:   FraudSignal,
  pub severity: Severity,
  #[serde(default)]
  pub details: serde_json::Value,
}

/// `POST /fraud-flags`
pub async fn raise_flag<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<FlagBody>,
) -> Result<impl IntoResponse, ApiError> {
  let flag: FraudFlag = store
    .raise_fraud_flag(body.user_id, body.signal, body.severity, body.details)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(flag)))
}

/// `POST /fraud-flags/:id/resolve`
pub async fn resolve_flag<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<FraudFlag>, ApiError> {
  let flag = store.resolve_fraud_flag(id).await.map_err(ApiError::store)?;
  Ok(Json(flag))
}

/// `POST /users/:id/fraud-scan`
pub async fn fraud_scan<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<FraudFlag>>, ApiError> {
  let raised = store.run_fraud_scan(id).await.map_err(ApiError::store)?;
  Ok(Json(raised))
}

/// `GET /users/:id/trust`
pub async fn trust<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TrustScore>, ApiError> {
  let score = store
    .trust_score(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no trust score computed for user {id}"))
    })?;
  Ok(Json(score))
}

/// `POST /users/:id/trust`
pub async fn recompute<S: PlatformStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TrustOutcome>, ApiError> {
  let outcome = store.recompute_trust(id).await.map_err(ApiError::store)?;
  Ok(Json(outcome))
}
