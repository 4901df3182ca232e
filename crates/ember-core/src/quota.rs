//! Quota — per-user consumable credits for super-likes, boosts, rewinds.
//!
//! Counters are non-negative; consumption is atomic relative to concurrent
//! consumption attempts by the same user (the store serialises on the user
//! key). Replenishment is daily, topping counters up to the per-plan grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Plan ────────────────────────────────────────────────────────────────────

/// Subscription entitlement, sourced from an external billing system.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
  #[default]
  Free,
  Premium,
  Vip,
}

/// The credit categories tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaKind {
  SuperLike,
  Boost,
  Rewind,
}

impl std::fmt::Display for QuotaKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::SuperLike => "super-like",
      Self::Boost => "boost",
      Self::Rewind => "rewind",
    };
    f.write_str(s)
  }
}

// ─── Quota ───────────────────────────────────────────────────────────────────

/// The per-user ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
  pub user_id:         Uuid,
  pub plan:            Plan,
  pub super_likes:     u32,
  pub boosts:          u32,
  pub rewinds:         u32,
  /// End of the active boost window, if one has been activated.
  pub boost_expires_at: Option<DateTime<Utc>>,
  pub replenished_at:  DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Quota {
  pub fn boost_active(&self, now: DateTime<Utc>) -> bool {
    self.boost_expires_at.is_some_and(|t| now < t)
  }

  pub fn remaining(&self, kind: QuotaKind) -> u32 {
    match kind {
      QuotaKind::SuperLike => self.super_likes,
      QuotaKind::Boost => self.boosts,
      QuotaKind::Rewind => self.rewinds,
    }
  }
}
