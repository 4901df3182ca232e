//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

use ember_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(CoreError),
}

impl ApiError {
  /// Lift a store failure into the API error space.
  pub fn store<E: Into<CoreError>>(err: E) -> Self { ApiError::Core(err.into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Core(e) => (core_status(e), e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

fn core_status(err: &CoreError) -> StatusCode {
  match err {
    CoreError::SelfAction(_)
    | CoreError::InvalidOperation(_)
    | CoreError::Serialization(_) => StatusCode::BAD_REQUEST,

    CoreError::UserNotFound(_)
    | CoreError::MatchNotFound(_)
    | CoreError::ActionNotFound(_)
    | CoreError::ReportNotFound(_)
    | CoreError::FlagNotFound(_)
    | CoreError::NothingToRewind(_) => StatusCode::NOT_FOUND,

    CoreError::QuotaExhausted(_) => StatusCode::TOO_MANY_REQUESTS,

    CoreError::AlreadyRewound(_)
    | CoreError::AlreadyRevealed(_)
    | CoreError::MatchAlreadyExists(_)
    | CoreError::PurgeBlocked { .. } => StatusCode::CONFLICT,

    CoreError::NotAParticipant { .. } => StatusCode::FORBIDDEN,

    CoreError::ParticipantUnavailable(_) => StatusCode::GONE,

    CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}
