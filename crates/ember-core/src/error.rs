//! Error taxonomy for the matching pipeline.
//!
//! Every quota, match, rewind, and lifecycle failure is returned to the
//! caller as one of these variants — never swallowed. `MatchAlreadyExists`
//! is the one deliberate exception: reconciliation reports it through
//! [`crate::action::MatchOutcome`] and treats it as success.

use thiserror::Error;
use uuid::Uuid;

use crate::quota::QuotaKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user {0} cannot act on themself")]
  SelfAction(Uuid),

  #[error("invalid operation: {0}")]
  InvalidOperation(String),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("match not found: {0}")]
  MatchNotFound(Uuid),

  #[error("action not found: {0}")]
  ActionNotFound(Uuid),

  #[error("report not found: {0}")]
  ReportNotFound(Uuid),

  #[error("fraud flag not found: {0}")]
  FlagNotFound(Uuid),

  #[error("no {0} credits remaining")]
  QuotaExhausted(QuotaKind),

  #[error("user {0} has no action eligible for rewind")]
  NothingToRewind(Uuid),

  #[error("action {0} has already been rewound")]
  AlreadyRewound(Uuid),

  #[error("an active match already exists for this pair")]
  MatchAlreadyExists(Uuid),

  #[error("participant {0} is unavailable")]
  ParticipantUnavailable(Uuid),

  #[error("user {user_id} is not a participant of match {match_id}")]
  NotAParticipant { match_id: Uuid, user_id: Uuid },

  #[error("match {0} is already revealed for this participant")]
  AlreadyRevealed(Uuid),

  #[error("purge of user {user_id} blocked by live {dependency} reference")]
  PurgeBlocked {
    user_id:    Uuid,
    dependency: &'static str,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Backend failure surfaced through the store trait boundary.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
