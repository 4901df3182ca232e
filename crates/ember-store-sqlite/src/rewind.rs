//! The rewind controller.
//!
//! Rewinding consumes one rewind credit, records the one-per-action rewind
//! event, retracts the match the action produced (if any), and appends an
//! `undo` entry to the log. All of it happens in one transaction: a failed
//! debit leaves no rewind record, and a failed insert refunds the debit by
//! rolling back.

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ember_core::{
  action::{Action, ActionKind, ActionStatus, RewindOutcome, RewindRecord},
  policy::PlatformPolicy,
  quota::QuotaKind,
};

use crate::{
  encode::{encode_dt, encode_uuid, RawAction, ACTION_COLUMNS},
  error::TxResult,
  store::{debit_tx, ensure_quota_tx, insert_action_tx, require_live_tx},
  Result, SqliteStore,
};

pub(crate) async fn rewind_latest(
  store: &SqliteStore,
  actor: Uuid,
) -> Result<RewindOutcome> {
  let policy = store.policy_arc();
  let _guard = store.lock_user(actor).await;

  store
    .call_tx(move |tx| {
      require_live_tx(tx, actor)?;
      let action = latest_eligible_tx(tx, actor)?
        .ok_or(ember_core::Error::NothingToRewind(actor))?;
      rewind_tx(tx, &policy, actor, action)
    })
    .await
}

pub(crate) async fn rewind_action(
  store: &SqliteStore,
  actor: Uuid,
  action_id: Uuid,
) -> Result<RewindOutcome> {
  let policy = store.policy_arc();
  let _guard = store.lock_user(actor).await;

  store
    .call_tx(move |tx| {
      require_live_tx(tx, actor)?;

      let action = action_by_id_tx(tx, action_id)?
        .ok_or(ember_core::Error::ActionNotFound(action_id))?;
      if action.actor_id != actor {
        return Err(
          ember_core::Error::InvalidOperation(
            "action belongs to another user".into(),
          )
          .into(),
        );
      }
      if action.kind == ActionKind::Undo {
        return Err(
          ember_core::Error::InvalidOperation(
            "undo entries cannot be rewound".into(),
          )
          .into(),
        );
      }
      if action.status != ActionStatus::Completed || action.deleted_at.is_some()
      {
        return Err(
          ember_core::Error::InvalidOperation(
            "only completed actions can be rewound".into(),
          )
          .into(),
        );
      }
      if rewound_tx(tx, action_id)? {
        return Err(ember_core::Error::AlreadyRewound(action_id).into());
      }

      rewind_tx(tx, &policy, actor, action)
    })
    .await
}

/// The actor's most recent completed, non-deleted, non-rewound like or pass.
fn latest_eligible_tx(
  tx: &rusqlite::Transaction<'_>,
  actor: Uuid,
) -> TxResult<Option<Action>> {
  let raw: Option<RawAction> = tx
    .query_row(
      "SELECT a.action_id, a.actor_id, a.target_id, a.kind,
              a.status, a.match_id, a.created_at, a.deleted_at
         FROM actions a
         LEFT JOIN rewinds r ON r.action_id = a.action_id
         WHERE a.actor_id = ?1
           AND a.kind IN ('like', 'pass')
           AND a.status = 'completed'
           AND a.deleted_at IS NULL
           AND r.rewind_id IS NULL
         ORDER BY a.created_at DESC, a.rowid DESC
         LIMIT 1",
      rusqlite::params![encode_uuid(actor)],
      |r| RawAction::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_action().map_err(crate::error::TxError::from)).transpose()
}

fn action_by_id_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<Option<Action>> {
  let raw: Option<RawAction> = tx
    .query_row(
      &format!("SELECT {ACTION_COLUMNS} FROM actions WHERE action_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      |r| RawAction::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_action().map_err(crate::error::TxError::from)).transpose()
}

fn rewound_tx(tx: &rusqlite::Transaction<'_>, action_id: Uuid) -> TxResult<bool> {
  let exists: bool = tx.query_row(
    "SELECT EXISTS(SELECT 1 FROM rewinds WHERE action_id = ?1)",
    rusqlite::params![encode_uuid(action_id)],
    |r| r.get(0),
  )?;
  Ok(exists)
}

fn rewind_tx(
  tx: &rusqlite::Transaction<'_>,
  policy: &PlatformPolicy,
  actor: Uuid,
  action: Action,
) -> TxResult<RewindOutcome> {
  let now = Utc::now();

  let quota = ensure_quota_tx(tx, policy, actor, now)?;
  let unlimited = policy.quota.unlimited(quota.plan, QuotaKind::Rewind);
  if !unlimited {
    debit_tx(tx, actor, QuotaKind::Rewind, now)?;
  }

  let record = RewindRecord {
    rewind_id:   Uuid::new_v4(),
    user_id:     actor,
    action_id:   action.action_id,
    recorded_at: now,
  };
  tx.execute(
    "INSERT INTO rewinds (rewind_id, user_id, action_id, recorded_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_uuid(record.rewind_id),
      encode_uuid(record.user_id),
      encode_uuid(record.action_id),
      encode_dt(record.recorded_at),
    ],
  )?;

  // Retract the match this action materialised, if it is still live.
  let retracted_match = match action.match_id {
    Some(match_id) => {
      let changed = tx.execute(
        "UPDATE matches SET deleted_at = ?2
         WHERE match_id = ?1 AND deleted_at IS NULL",
        rusqlite::params![encode_uuid(match_id), encode_dt(now)],
      )?;
      (changed > 0).then_some(match_id)
    }
    None => None,
  };

  // The reversal itself is part of the history.
  let undo = Action {
    action_id:  Uuid::new_v4(),
    actor_id:   actor,
    target_id:  action.target_id,
    kind:       ActionKind::Undo,
    status:     ActionStatus::Completed,
    match_id:   None,
    created_at: now,
    deleted_at: None,
  };
  insert_action_tx(tx, &undo)?;

  let remaining_rewinds = if unlimited {
    None
  } else {
    let left: u32 = tx.query_row(
      "SELECT rewinds FROM quotas WHERE user_id = ?1",
      rusqlite::params![encode_uuid(actor)],
      |r| r.get(0),
    )?;
    Some(left)
  };

  Ok(RewindOutcome {
    record,
    action,
    retracted_match,
    remaining_rewinds,
  })
}
