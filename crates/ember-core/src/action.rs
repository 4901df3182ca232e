//! Action — the fundamental unit of the pipeline's event log.
//!
//! An action is an immutable record of one user interaction. The log is
//! append-only: actions are never updated after creation except for the
//! soft-delete marker, and a rewound action is excluded from lookups by
//! joining against the rewind table, not by mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::Match;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The stored action kind. `undo` rows are appended by the rewind
/// controller; the log itself never rejects a syntactically valid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
  Like,
  Pass,
  Undo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
  Pending,
  Completed,
  Failed,
}

/// The request-level swipe variant. A super-like is stored as an ordinary
/// `like` action; the difference is the quota debit taken before the
/// insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeKind {
  Like,
  SuperLike,
  Pass,
}

impl SwipeKind {
  /// The [`ActionKind`] written to the log for this swipe.
  pub fn action_kind(self) -> ActionKind {
    match self {
      Self::Like | Self::SuperLike => ActionKind::Like,
      Self::Pass => ActionKind::Pass,
    }
  }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// An immutable event in the action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
  pub action_id:  Uuid,
  pub actor_id:   Uuid,
  /// Nulled (not cascaded) if the target user is purged, so the actor's
  /// history survives.
  pub target_id:  Option<Uuid>,
  pub kind:       ActionKind,
  pub status:     ActionStatus,
  /// Set by the reconciler on the like that completed a mutual pair.
  pub match_id:   Option<Uuid>,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What reconciliation produced for a recorded like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
  /// No reciprocal like yet.
  None,
  /// A new match was materialised by this action.
  Created(Match),
  /// An active match already existed for the pair. Success to callers.
  AlreadyMatched(Match),
}

impl MatchOutcome {
  /// The match this action materialised, if any. `AlreadyMatched` does not
  /// count: that match belongs to an earlier action.
  pub fn created(&self) -> Option<&Match> {
    match self {
      Self::Created(m) => Some(m),
      _ => None,
    }
  }

  pub fn matched(&self) -> Option<&Match> {
    match self {
      Self::None => None,
      Self::Created(m) | Self::AlreadyMatched(m) => Some(m),
    }
  }
}

/// Result of [`crate::store::PlatformStore::record_swipe`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeOutcome {
  pub action:  Action,
  pub outcome: MatchOutcome,
}

/// Result of [`crate::store::PlatformStore::rewind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewindOutcome {
  pub record: RewindRecord,
  /// The action that was reversed. Retained in the log but excluded from
  /// future most-recent-action lookups.
  pub action: Action,
  /// The match retracted as part of the same operation, if the rewound
  /// action had produced one.
  pub retracted_match: Option<Uuid>,
  pub remaining_rewinds: Option<u32>,
}

/// Links a user to the single action it reversed. One-to-one with the
/// action: a second rewind attempt fails with
/// [`crate::Error::AlreadyRewound`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewindRecord {
  pub rewind_id:   Uuid,
  pub user_id:     Uuid,
  pub action_id:   Uuid,
  pub recorded_at: DateTime<Utc>,
}
