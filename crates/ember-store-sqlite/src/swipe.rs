//! Swipe recording and match reconciliation.
//!
//! A swipe appends an action row and, for likes, reconciles the pair inside
//! the same transaction: if a live reciprocal like exists and no live match
//! does, the match is created atomically with the action that produced it.
//! The per-pair lock serializes reconciliation for one pair without stalling
//! unrelated pairs.

use chrono::Utc;
use uuid::Uuid;

use ember_core::{
  action::{Action, ActionStatus, MatchOutcome, SwipeKind, SwipeOutcome},
  matching::{Match, PairKey},
  quota::QuotaKind,
};

use crate::{
  encode::{encode_dt, encode_uuid},
  error::TxResult,
  store::{
    debit_tx, ensure_quota_tx, insert_action_tx, live_match_for_pair_tx,
    require_live_tx, require_user_tx,
  },
  Error, Result, SqliteStore,
};

pub(crate) async fn record_swipe(
  store: &SqliteStore,
  actor: Uuid,
  target: Uuid,
  kind: SwipeKind,
) -> Result<SwipeOutcome> {
  let pair = PairKey::new(actor, target).map_err(Error::Core)?;
  let policy = store.policy_arc();

  // Lock ordering is fixed (user before pair) so concurrent swipes and
  // rewinds cannot deadlock.
  let _user_guard = match kind {
    SwipeKind::SuperLike => Some(store.lock_user(actor).await),
    _ => None,
  };
  let _pair_guard = store.lock_pair(pair).await;

  store
    .call_tx(move |tx| {
      let now = Utc::now();

      require_live_tx(tx, actor)?;
      let target_user = require_user_tx(tx, target)?;
      if !target_user.is_live() {
        return Err(ember_core::Error::ParticipantUnavailable(target).into());
      }
      if pair_blocked_tx(tx, actor, target)? {
        return Err(ember_core::Error::ParticipantUnavailable(target).into());
      }

      let action_kind = kind.action_kind();
      if action_kind == ember_core::action::ActionKind::Like
        && live_like_exists_tx(tx, actor, target)?
      {
        return Err(
          ember_core::Error::InvalidOperation(
            "already liked this user".into(),
          )
          .into(),
        );
      }

      if kind == SwipeKind::SuperLike {
        let quota = ensure_quota_tx(tx, &policy, actor, now)?;
        let free = policy.quota.unlimited(quota.plan, QuotaKind::SuperLike)
          || quota.boost_active(now);
        if !free {
          debit_tx(tx, actor, QuotaKind::SuperLike, now)?;
        }
      }

      let outcome = if action_kind == ember_core::action::ActionKind::Like {
        reconcile_tx(tx, &pair, actor, target, now)?
      } else {
        MatchOutcome::None
      };

      let action = Action {
        action_id: Uuid::new_v4(),
        actor_id: actor,
        target_id: Some(target),
        kind: action_kind,
        status: ActionStatus::Completed,
        match_id: outcome.created().map(|m| m.match_id),
        created_at: now,
        deleted_at: None,
      };
      insert_action_tx(tx, &action)?;

      Ok(SwipeOutcome { action, outcome })
    })
    .await
}

/// A live block in either direction makes the pair unavailable.
fn pair_blocked_tx(
  tx: &rusqlite::Transaction<'_>,
  a: Uuid,
  b: Uuid,
) -> TxResult<bool> {
  let a_str = encode_uuid(a);
  let b_str = encode_uuid(b);
  let blocked: bool = tx.query_row(
    "SELECT EXISTS(
       SELECT 1 FROM blocks
       WHERE deleted_at IS NULL
         AND ((blocker_id = ?1 AND blocked_id = ?2)
           OR (blocker_id = ?2 AND blocked_id = ?1)))",
    rusqlite::params![a_str, b_str],
    |r| r.get(0),
  )?;
  Ok(blocked)
}

/// Is there a completed, non-deleted, non-rewound like from `actor` to
/// `target`?
fn live_like_exists_tx(
  tx: &rusqlite::Transaction<'_>,
  actor: Uuid,
  target: Uuid,
) -> TxResult<bool> {
  let exists: bool = tx.query_row(
    "SELECT EXISTS(
       SELECT 1 FROM actions a
       LEFT JOIN rewinds r ON r.action_id = a.action_id
       WHERE a.actor_id = ?1 AND a.target_id = ?2
         AND a.kind = 'like' AND a.status = 'completed'
         AND a.deleted_at IS NULL AND r.rewind_id IS NULL)",
    rusqlite::params![encode_uuid(actor), encode_uuid(target)],
    |r| r.get(0),
  )?;
  Ok(exists)
}

fn reconcile_tx(
  tx: &rusqlite::Transaction<'_>,
  pair: &PairKey,
  actor: Uuid,
  target: Uuid,
  now: chrono::DateTime<Utc>,
) -> TxResult<MatchOutcome> {
  if let Some(existing) = live_match_for_pair_tx(tx, pair)? {
    return Ok(MatchOutcome::AlreadyMatched(existing));
  }

  if !live_like_exists_tx(tx, target, actor)? {
    return Ok(MatchOutcome::None);
  }

  // Compatibility scoring belongs to an upstream service; new matches start
  // neutral.
  let m = Match {
    match_id: Uuid::new_v4(),
    pair: *pair,
    compatibility_score: 0.0,
    reveal_lo: false,
    reveal_hi: false,
    created_at: now,
    deleted_at: None,
  };
  tx.execute(
    "INSERT INTO matches
       (match_id, user_lo, user_hi, compatibility_score, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      encode_uuid(m.match_id),
      encode_uuid(m.pair.lo),
      encode_uuid(m.pair.hi),
      m.compatibility_score,
      encode_dt(m.created_at),
    ],
  )?;

  Ok(MatchOutcome::Created(m))
}

