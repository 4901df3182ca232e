//! User — the identity anchor every other entity references.
//!
//! A user owns nothing. Matches, actions, quotas, and trust records hold
//! non-owning identifier references back to it, resolved by lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  /// True once identity verification has completed.
  pub verified:   bool,
  pub admin:      bool,
  /// Soft-delete marker. A set value hides the user from the pipeline;
  /// the row survives until the purge sweep removes it.
  pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
  pub fn is_live(&self) -> bool { self.deleted_at.is_none() }
}
