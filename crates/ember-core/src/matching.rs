//! Match — the derived entity materialised by the reconciler.
//!
//! A match holds an unordered pair of user identifiers in canonical form
//! (smaller UUID first) so a uniqueness constraint on the pair can hold.
//! At most one active match exists per pair; only the reconciler creates
//! them, and only the rewind controller or the lifecycle cascade retires
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── PairKey ─────────────────────────────────────────────────────────────────

/// Canonical unordered pair of two distinct user identifiers.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct PairKey {
  pub lo: Uuid,
  pub hi: Uuid,
}

impl PairKey {
  /// Canonicalise `(a, b)`. Fails with [`Error::SelfAction`] on `a == b`.
  pub fn new(a: Uuid, b: Uuid) -> Result<Self> {
    if a == b {
      return Err(Error::SelfAction(a));
    }
    if a < b {
      Ok(Self { lo: a, hi: b })
    } else {
      Ok(Self { lo: b, hi: a })
    }
  }

  pub fn contains(&self, user_id: Uuid) -> bool {
    self.lo == user_id || self.hi == user_id
  }

  /// The counterpart of `user_id`, if they are a member of the pair.
  pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
    if self.lo == user_id {
      Some(self.hi)
    } else if self.hi == user_id {
      Some(self.lo)
    } else {
      None
    }
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
  pub match_id:            Uuid,
  pub pair:                PairKey,
  /// Supplied by external compatibility signals; the reconciler writes 0.
  pub compatibility_score: f64,
  /// Reveal flag for the `pair.lo` participant.
  pub reveal_lo:           bool,
  /// Reveal flag for the `pair.hi` participant.
  pub reveal_hi:           bool,
  pub created_at:          DateTime<Utc>,
  pub deleted_at:          Option<DateTime<Utc>>,
}

impl Match {
  pub fn is_live(&self) -> bool { self.deleted_at.is_none() }

  pub fn both_revealed(&self) -> bool { self.reveal_lo && self.reveal_hi }

  /// The reveal flag belonging to `user_id`, if they participate.
  pub fn reveal_for(&self, user_id: Uuid) -> Option<bool> {
    if self.pair.lo == user_id {
      Some(self.reveal_lo)
    } else if self.pair.hi == user_id {
      Some(self.reveal_hi)
    } else {
      None
    }
  }
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// A message inside a match conversation. Carried here only as far as the
/// pipeline needs it: a behavioral signal source and purge collateral
/// (sender reference nulled, row preserved for audit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub message_id: Uuid,
  pub match_id:   Option<Uuid>,
  pub sender_id:  Option<Uuid>,
  pub body:       String,
  pub created_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pair_key_orders_identifiers() {
    let a = Uuid::from_u128(2);
    let b = Uuid::from_u128(1);
    let pair = PairKey::new(a, b).unwrap();
    assert_eq!(pair.lo, b);
    assert_eq!(pair.hi, a);
    // Same pair regardless of argument order.
    assert_eq!(pair, PairKey::new(b, a).unwrap());
  }

  #[test]
  fn pair_key_rejects_self_pair() {
    let a = Uuid::from_u128(7);
    assert!(matches!(PairKey::new(a, a), Err(Error::SelfAction(_))));
  }

  #[test]
  fn pair_key_other_side() {
    let a = Uuid::from_u128(1);
    let b = Uuid::from_u128(2);
    let pair = PairKey::new(a, b).unwrap();
    assert_eq!(pair.other(a), Some(b));
    assert_eq!(pair.other(b), Some(a));
    assert_eq!(pair.other(Uuid::from_u128(3)), None);
  }
}
