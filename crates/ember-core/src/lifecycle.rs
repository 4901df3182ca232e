//! Account lifecycle records and the declared delete-policy registry.
//!
//! Every entity follows the same three-state lifecycle: active →
//! soft-deleted → purged. Soft-delete is a nullable timestamp on the row;
//! purge is the irreversible hard delete performed by the sweep once the
//! grace period has elapsed, consulting [`USER_RELATIONSHIPS`] for the
//! per-relationship on-delete policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Account status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
  Active,
  Deactivated,
  DeletionRequested,
}

/// Per-user lifecycle record. At most one active deactivation window at a
/// time; a new request replaces the window rather than stacking. A
/// scheduled purge timestamp is always strictly after the request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatus {
  pub user_id:              Uuid,
  pub deactivated_at:       Option<DateTime<Utc>>,
  pub deactivation_ends_at: Option<DateTime<Utc>>,
  pub deletion_requested_at: Option<DateTime<Utc>>,
  pub purge_scheduled_for:  Option<DateTime<Utc>>,
  pub reason:               Option<String>,
  pub updated_at:           DateTime<Utc>,
}

impl AccountStatus {
  /// The state at `now`. Deletion dominates deactivation; an expired
  /// deactivation window reads as active again.
  pub fn state(&self, now: DateTime<Utc>) -> AccountState {
    if self.deletion_requested_at.is_some() {
      return AccountState::DeletionRequested;
    }
    match (self.deactivated_at, self.deactivation_ends_at) {
      (Some(start), Some(end)) if start <= now && now < end => {
        AccountState::Deactivated
      }
      _ => AccountState::Active,
    }
  }

  pub fn purge_due(&self, now: DateTime<Utc>) -> bool {
    self.purge_scheduled_for.is_some_and(|t| t <= now)
  }
}

// ─── Data exports ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
  Json,
  Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
  Pending,
  Completed,
  Expired,
}

/// A requested data export. The download window is time-boxed; the sweep
/// marks overdue exports expired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataExport {
  pub export_id:  Uuid,
  pub user_id:    Uuid,
  pub format:     ExportFormat,
  pub status:     ExportStatus,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

// ─── Delete policies ─────────────────────────────────────────────────────────

/// What the purge sweep does to a relationship that references the user
/// being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
  /// Remove the referencing rows entirely.
  Cascade,
  /// Null the reference; the row survives for audit purposes.
  Nullify,
  /// A live referencing row blocks the purge. The participant-driven
  /// soft-delete must be resolved first.
  Restrict,
}

/// One foreign association from another table back to `users`.
#[derive(Debug, Clone, Copy)]
pub struct Relationship {
  pub table:  &'static str,
  pub column: &'static str,
  pub policy: DeletePolicy,
}

/// Every association the purge sweep must resolve, in execution order.
/// Child tables come before their parents so cascades never orphan a
/// foreign key.
pub const USER_RELATIONSHIPS: &[Relationship] = &[
  Relationship { table: "rewinds",       column: "user_id",     policy: DeletePolicy::Cascade },
  Relationship { table: "actions",       column: "actor_id",    policy: DeletePolicy::Cascade },
  Relationship { table: "actions",       column: "target_id",   policy: DeletePolicy::Nullify },
  Relationship { table: "matches",       column: "user_lo",     policy: DeletePolicy::Restrict },
  Relationship { table: "matches",       column: "user_hi",     policy: DeletePolicy::Restrict },
  Relationship { table: "messages",      column: "sender_id",   policy: DeletePolicy::Nullify },
  Relationship { table: "blocks",        column: "blocker_id",  policy: DeletePolicy::Cascade },
  Relationship { table: "blocks",        column: "blocked_id",  policy: DeletePolicy::Cascade },
  Relationship { table: "reports",       column: "reporter_id", policy: DeletePolicy::Nullify },
  Relationship { table: "reports",       column: "reported_id", policy: DeletePolicy::Cascade },
  Relationship { table: "fraud_flags",   column: "user_id",     policy: DeletePolicy::Cascade },
  Relationship { table: "trust_scores",  column: "user_id",     policy: DeletePolicy::Cascade },
  Relationship { table: "quotas",        column: "user_id",     policy: DeletePolicy::Cascade },
  Relationship { table: "data_exports",  column: "user_id",     policy: DeletePolicy::Cascade },
  Relationship { table: "account_status", column: "user_id",    policy: DeletePolicy::Cascade },
];

// ─── Purge report ────────────────────────────────────────────────────────────

/// Outcome of one purge sweep cycle. Blocked users are logged and retried
/// on the next cycle; a single blocked user never aborts the sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurgeReport {
  pub purged:          Vec<Uuid>,
  pub blocked:         Vec<Uuid>,
  pub exports_expired: usize,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn status(user_id: Uuid) -> AccountStatus {
    AccountStatus {
      user_id,
      deactivated_at: None,
      deactivation_ends_at: None,
      deletion_requested_at: None,
      purge_scheduled_for: None,
      reason: None,
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn deactivation_window_is_time_boxed() {
    let now = Utc::now();
    let mut s = status(Uuid::from_u128(1));
    s.deactivated_at = Some(now - Duration::days(1));
    s.deactivation_ends_at = Some(now + Duration::days(1));
    assert_eq!(s.state(now), AccountState::Deactivated);

    // Window elapsed: active again without any explicit transition.
    assert_eq!(s.state(now + Duration::days(2)), AccountState::Active);
  }

  #[test]
  fn deletion_dominates_deactivation() {
    let now = Utc::now();
    let mut s = status(Uuid::from_u128(1));
    s.deactivated_at = Some(now - Duration::hours(1));
    s.deactivation_ends_at = Some(now + Duration::hours(1));
    s.deletion_requested_at = Some(now);
    s.purge_scheduled_for = Some(now + Duration::days(30));
    assert_eq!(s.state(now), AccountState::DeletionRequested);
    assert!(!s.purge_due(now));
    assert!(s.purge_due(now + Duration::days(31)));
  }

  #[test]
  fn registry_lists_restrict_only_for_matches() {
    for rel in USER_RELATIONSHIPS {
      if rel.policy == DeletePolicy::Restrict {
        assert_eq!(rel.table, "matches");
      }
    }
  }
}
