//! [`SqliteStore`] — the SQLite implementation of [`PlatformStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ember_core::{
  action::{Action, RewindOutcome, SwipeKind, SwipeOutcome},
  lifecycle::{AccountStatus, DataExport, ExportFormat, PurgeReport},
  matching::{Match, Message, PairKey},
  policy::PlatformPolicy,
  quota::{Plan, Quota, QuotaKind},
  store::PlatformStore,
  trust::{
    FraudFlag, FraudSignal, Report, ReportReason, Severity, TrustOutcome,
    TrustScore,
  },
  user::User,
};

use crate::{
  encode::{
    encode_dt, encode_uuid, RawMatch, RawQuota, RawUser, ACTION_COLUMNS,
    MATCH_COLUMNS, QUOTA_COLUMNS,
  },
  error::{TxError, TxResult},
  keyed::KeyedLocks,
  lifecycle, rewind,
  schema::SCHEMA,
  swipe, trust, Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Ember store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and lock tables are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  policy:     Arc<PlatformPolicy>,
  user_locks: Arc<KeyedLocks<Uuid>>,
  pair_locks: Arc<KeyedLocks<PairKey>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(
    path: impl AsRef<Path>,
    policy: PlatformPolicy,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, policy).await
  }

  /// Open an in-memory store with default policy — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with(PlatformPolicy::default()).await
  }

  /// Open an in-memory store with a caller-supplied policy.
  pub async fn open_in_memory_with(policy: PlatformPolicy) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, policy).await
  }

  async fn init(
    conn: tokio_rusqlite::Connection,
    policy: PlatformPolicy,
  ) -> Result<Self> {
    let store = Self {
      conn,
      policy: Arc::new(policy),
      user_locks: Arc::new(KeyedLocks::new()),
      pair_locks: Arc::new(KeyedLocks::new()),
    };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub fn policy(&self) -> &PlatformPolicy { &self.policy }

  pub(crate) fn conn(&self) -> &tokio_rusqlite::Connection { &self.conn }

  pub(crate) fn policy_arc(&self) -> Arc<PlatformPolicy> {
    Arc::clone(&self.policy)
  }

  pub(crate) async fn lock_user(
    &self,
    user: Uuid,
  ) -> tokio::sync::OwnedMutexGuard<()> {
    self.user_locks.lock(user).await
  }

  pub(crate) async fn lock_pair(
    &self,
    pair: PairKey,
  ) -> tokio::sync::OwnedMutexGuard<()> {
    self.pair_locks.lock(pair).await
  }

  /// Run `f` inside one SQLite transaction on the connection thread.
  ///
  /// A `Domain` failure rolls the whole transaction back before surfacing,
  /// so multi-step contracts are all-or-nothing.
  pub(crate) async fn call_tx<R, F>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&rusqlite::Transaction<'_>) -> TxResult<R> + Send + 'static,
    R: Send + 'static,
  {
    let out = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(TxError::Domain(e)) => Ok(Err(e)),
          Err(TxError::Sql(e)) => Err(e.into()),
        }
      })
      .await?;
    out.map_err(Error::Core)
  }
}

// ─── Shared transaction helpers ──────────────────────────────────────────────

pub(crate) fn user_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<Option<User>> {
  let raw: Option<RawUser> = tx
    .query_row(
      "SELECT user_id, created_at, verified, admin, deleted_at
       FROM users WHERE user_id = ?1",
      rusqlite::params![encode_uuid(id)],
      |r| RawUser::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_user().map_err(TxError::from)).transpose()
}

/// The user must exist; soft-deleted users are still returned.
pub(crate) fn require_user_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<User> {
  user_tx(tx, id)?.ok_or_else(|| ember_core::Error::UserNotFound(id).into())
}

/// The user must exist and not be soft-deleted.
pub(crate) fn require_live_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<User> {
  let user = require_user_tx(tx, id)?;
  if !user.is_live() {
    return Err(ember_core::Error::ParticipantUnavailable(id).into());
  }
  Ok(user)
}

/// Fetch the quota row, inserting the plan's standing grant on first touch.
pub(crate) fn ensure_quota_tx(
  tx: &rusqlite::Transaction<'_>,
  policy: &PlatformPolicy,
  user: Uuid,
  now: DateTime<Utc>,
) -> TxResult<Quota> {
  let id_str = encode_uuid(user);
  let existing: Option<RawQuota> = tx
    .query_row(
      &format!("SELECT {QUOTA_COLUMNS} FROM quotas WHERE user_id = ?1"),
      rusqlite::params![id_str],
      |r| RawQuota::from_row(r),
    )
    .optional()?;

  if let Some(raw) = existing {
    return raw.into_quota().map_err(TxError::from);
  }

  let grant = policy.quota.grant(Plan::Free);
  let now_str = encode_dt(now);
  tx.execute(
    "INSERT INTO quotas
       (user_id, plan, super_likes, boosts, rewinds, replenished_at, updated_at)
     VALUES (?1, 'free', ?2, ?3, ?4, ?5, ?5)",
    rusqlite::params![
      id_str,
      grant.super_likes,
      grant.boosts,
      grant.rewinds,
      now_str
    ],
  )?;

  Ok(Quota {
    user_id:          user,
    plan:             Plan::Free,
    super_likes:      grant.super_likes,
    boosts:           grant.boosts,
    rewinds:          grant.rewinds,
    boost_expires_at: None,
    replenished_at:   now,
    updated_at:       now,
  })
}

/// Consume one credit of `kind`, or fail with `QuotaExhausted`.
///
/// The decrement is conditional on a positive balance, so concurrent debits
/// can never push a counter below zero.
pub(crate) fn debit_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
  kind: QuotaKind,
  now: DateTime<Utc>,
) -> TxResult<()> {
  let column = match kind {
    QuotaKind::SuperLike => "super_likes",
    QuotaKind::Boost => "boosts",
    QuotaKind::Rewind => "rewinds",
  };
  let changed = tx.execute(
    &format!(
      "UPDATE quotas SET {column} = {column} - 1, updated_at = ?2
       WHERE user_id = ?1 AND {column} > 0"
    ),
    rusqlite::params![encode_uuid(user), encode_dt(now)],
  )?;
  if changed == 0 {
    return Err(ember_core::Error::QuotaExhausted(kind).into());
  }
  Ok(())
}

pub(crate) fn quota_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
) -> TxResult<Option<Quota>> {
  let raw: Option<RawQuota> = tx
    .query_row(
      &format!("SELECT {QUOTA_COLUMNS} FROM quotas WHERE user_id = ?1"),
      rusqlite::params![encode_uuid(user)],
      |r| RawQuota::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_quota().map_err(TxError::from)).transpose()
}

pub(crate) fn match_by_id_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<Option<Match>> {
  let raw: Option<RawMatch> = tx
    .query_row(
      &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      |r| RawMatch::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_match().map_err(TxError::from)).transpose()
}

pub(crate) fn live_match_for_pair_tx(
  tx: &rusqlite::Transaction<'_>,
  pair: &PairKey,
) -> TxResult<Option<Match>> {
  let raw: Option<RawMatch> = tx
    .query_row(
      &format!(
        "SELECT {MATCH_COLUMNS} FROM matches
         WHERE user_lo = ?1 AND user_hi = ?2 AND deleted_at IS NULL"
      ),
      rusqlite::params![encode_uuid(pair.lo), encode_uuid(pair.hi)],
      |r| RawMatch::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_match().map_err(TxError::from)).transpose()
}

pub(crate) fn insert_action_tx(
  tx: &rusqlite::Transaction<'_>,
  action: &Action,
) -> TxResult<()> {
  tx.execute(
    "INSERT INTO actions
       (action_id, actor_id, target_id, kind, status, match_id, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      encode_uuid(action.action_id),
      encode_uuid(action.actor_id),
      action.target_id.map(encode_uuid),
      crate::encode::encode_action_kind(action.kind),
      crate::encode::encode_action_status(action.status),
      action.match_id.map(encode_uuid),
      encode_dt(action.created_at),
    ],
  )?;
  Ok(())
}

// ─── PlatformStore impl ──────────────────────────────────────────────────────

impl PlatformStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      created_at: Utc::now(),
      verified:   false,
      admin:      false,
      deleted_at: None,
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, created_at) VALUES (?1, ?2)",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, created_at, verified, admin, deleted_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |r| RawUser::from_row(r),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_user()).transpose()
  }

  async fn set_verified(&self, id: Uuid, verified: bool) -> Result<User> {
    let user = self
      .call_tx(move |tx| {
        let mut user = require_user_tx(tx, id)?;
        tx.execute(
          "UPDATE users SET verified = ?2 WHERE user_id = ?1",
          rusqlite::params![encode_uuid(id), verified],
        )?;
        user.verified = verified;
        Ok(user)
      })
      .await?;

    // Verification moves the trust score; refresh it in-line.
    trust::recompute(self, id).await?;
    Ok(user)
  }

  async fn set_admin(&self, id: Uuid, admin: bool) -> Result<User> {
    self
      .call_tx(move |tx| {
        let mut user = require_user_tx(tx, id)?;
        tx.execute(
          "UPDATE users SET admin = ?2 WHERE user_id = ?1",
          rusqlite::params![encode_uuid(id), admin],
        )?;
        user.admin = admin;
        Ok(user)
      })
      .await
  }

  async fn soft_delete_user(&self, id: Uuid) -> Result<()> {
    self
      .call_tx(move |tx| {
        require_user_tx(tx, id)?;
        tx.execute(
          "UPDATE users SET deleted_at = ?2
           WHERE user_id = ?1 AND deleted_at IS NULL",
          rusqlite::params![encode_uuid(id), encode_dt(Utc::now())],
        )?;
        Ok(())
      })
      .await
  }

  // ── Action log ────────────────────────────────────────────────────────────

  async fn record_swipe(
    &self,
    actor: Uuid,
    target: Uuid,
    kind: SwipeKind,
  ) -> Result<SwipeOutcome> {
    swipe::record_swipe(self, actor, target, kind).await
  }

  async fn action_history(
    &self,
    actor: Uuid,
    target: Uuid,
  ) -> Result<Vec<Action>> {
    let actor_str = encode_uuid(actor);
    let target_str = encode_uuid(target);

    let raws: Vec<crate::encode::RawAction> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTION_COLUMNS} FROM actions
           WHERE actor_id = ?1 AND target_id = ?2 AND deleted_at IS NULL
           ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![actor_str, target_str], |r| {
            crate::encode::RawAction::from_row(r)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_action()).collect()
  }

  async fn latest_rewindable(&self, actor: Uuid) -> Result<Option<Action>> {
    let actor_str = encode_uuid(actor);

    let raw: Option<crate::encode::RawAction> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
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
              rusqlite::params![actor_str],
              |r| crate::encode::RawAction::from_row(r),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_action()).transpose()
  }

  // ── Rewind controller ─────────────────────────────────────────────────────

  async fn rewind(&self, actor: Uuid) -> Result<RewindOutcome> {
    rewind::rewind_latest(self, actor).await
  }

  async fn rewind_action(
    &self,
    actor: Uuid,
    action_id: Uuid,
  ) -> Result<RewindOutcome> {
    rewind::rewind_action(self, actor, action_id).await
  }

  // ── Quota ledger ──────────────────────────────────────────────────────────

  async fn quota(&self, user: Uuid) -> Result<Quota> {
    let policy = self.policy_arc();
    self
      .call_tx(move |tx| {
        require_user_tx(tx, user)?;
        ensure_quota_tx(tx, &policy, user, Utc::now())
      })
      .await
  }

  async fn set_plan(&self, user: Uuid, plan: Plan) -> Result<Quota> {
    let policy = self.policy_arc();
    let _guard = self.lock_user(user).await;

    self
      .call_tx(move |tx| {
        require_user_tx(tx, user)?;
        let now = Utc::now();
        ensure_quota_tx(tx, &policy, user, now)?;

        // Plan changes top counters up to the new grant, never down.
        let grant = policy.quota.grant(plan);
        tx.execute(
          "UPDATE quotas SET
             plan = ?2,
             super_likes = MAX(super_likes, ?3),
             boosts = MAX(boosts, ?4),
             rewinds = MAX(rewinds, ?5),
             updated_at = ?6
           WHERE user_id = ?1",
          rusqlite::params![
            encode_uuid(user),
            crate::encode::encode_plan(plan),
            grant.super_likes,
            grant.boosts,
            grant.rewinds,
            encode_dt(now),
          ],
        )?;

        quota_tx(tx, user)?
          .ok_or_else(|| ember_core::Error::UserNotFound(user).into())
      })
      .await
  }

  async fn activate_boost(&self, user: Uuid) -> Result<Quota> {
    let policy = self.policy_arc();
    let _guard = self.lock_user(user).await;

    self
      .call_tx(move |tx| {
        require_live_tx(tx, user)?;
        let now = Utc::now();
        ensure_quota_tx(tx, &policy, user, now)?;
        debit_tx(tx, user, QuotaKind::Boost, now)?;

        let until = now + policy.quota.boost_window();
        tx.execute(
          "UPDATE quotas SET boost_expires_at = ?2, updated_at = ?3
           WHERE user_id = ?1",
          rusqlite::params![encode_uuid(user), encode_dt(until), encode_dt(now)],
        )?;

        quota_tx(tx, user)?
          .ok_or_else(|| ember_core::Error::UserNotFound(user).into())
      })
      .await
  }

  async fn replenish_all(&self, now: DateTime<Utc>) -> Result<usize> {
    let policy = self.policy_arc();
    let cutoff = encode_dt(now - chrono::Duration::hours(24));
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        let mut total = 0;
        for plan in [Plan::Free, Plan::Premium, Plan::Vip] {
          let grant = policy.quota.grant(plan);
          total += conn.execute(
            "UPDATE quotas SET
               super_likes = MAX(super_likes, ?3),
               boosts = MAX(boosts, ?4),
               rewinds = MAX(rewinds, ?5),
               replenished_at = ?6,
               updated_at = ?6
             WHERE plan = ?1 AND replenished_at <= ?2",
            rusqlite::params![
              crate::encode::encode_plan(plan),
              cutoff,
              grant.super_likes,
              grant.boosts,
              grant.rewinds,
              now_str,
            ],
          )?;
        }
        Ok(total)
      })
      .await
      .map_err(Error::from)
  }

  // ── Match reconciler ──────────────────────────────────────────────────────

  async fn get_match(&self, id: Uuid) -> Result<Option<Match>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = ?1"
              ),
              rusqlite::params![id_str],
              |r| RawMatch::from_row(r),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_match()).transpose()
  }

  async fn matches_for(&self, user: Uuid) -> Result<Vec<Match>> {
    let id_str = encode_uuid(user);

    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MATCH_COLUMNS} FROM matches
           WHERE (user_lo = ?1 OR user_hi = ?1) AND deleted_at IS NULL
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |r| RawMatch::from_row(r))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_match()).collect()
  }

  async fn reveal(&self, match_id: Uuid, user: Uuid) -> Result<Match> {
    self
      .call_tx(move |tx| {
        let m = match_by_id_tx(tx, match_id)?
          .filter(Match::is_live)
          .ok_or(ember_core::Error::MatchNotFound(match_id))?;

        let column = if m.pair.lo == user {
          "reveal_lo"
        } else if m.pair.hi == user {
          "reveal_hi"
        } else {
          return Err(
            ember_core::Error::NotAParticipant { match_id, user_id: user }
              .into(),
          );
        };

        let changed = tx.execute(
          &format!(
            "UPDATE matches SET {column} = 1
             WHERE match_id = ?1 AND {column} = 0"
          ),
          rusqlite::params![encode_uuid(match_id)],
        )?;
        if changed == 0 {
          return Err(ember_core::Error::AlreadyRevealed(match_id).into());
        }

        match_by_id_tx(tx, match_id)?
          .ok_or_else(|| ember_core::Error::MatchNotFound(match_id).into())
      })
      .await
  }

  async fn unmatch(&self, match_id: Uuid, user: Uuid) -> Result<()> {
    self
      .call_tx(move |tx| {
        let m = match_by_id_tx(tx, match_id)?
          .ok_or(ember_core::Error::MatchNotFound(match_id))?;
        if !m.pair.contains(user) {
          return Err(
            ember_core::Error::NotAParticipant { match_id, user_id: user }
              .into(),
          );
        }
        // Unmatching an already-retracted match is a no-op.
        tx.execute(
          "UPDATE matches SET deleted_at = ?2
           WHERE match_id = ?1 AND deleted_at IS NULL",
          rusqlite::params![encode_uuid(match_id), encode_dt(Utc::now())],
        )?;
        Ok(())
      })
      .await
  }

  async fn block(&self, blocker: Uuid, blocked: Uuid) -> Result<()> {
    if blocker == blocked {
      return Err(Error::Core(ember_core::Error::SelfAction(blocker)));
    }

    self
      .call_tx(move |tx| {
        require_user_tx(tx, blocker)?;
        require_user_tx(tx, blocked)?;
        tx.execute(
          "INSERT INTO blocks (block_id, blocker_id, blocked_id, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (blocker_id, blocked_id) DO NOTHING",
          rusqlite::params![
            encode_uuid(Uuid::new_v4()),
            encode_uuid(blocker),
            encode_uuid(blocked),
            encode_dt(Utc::now()),
          ],
        )?;
        Ok(())
      })
      .await
  }

  async fn record_message(
    &self,
    match_id: Uuid,
    sender: Uuid,
    body: String,
  ) -> Result<Message> {
    self
      .call_tx(move |tx| {
        let m = match_by_id_tx(tx, match_id)?
          .filter(Match::is_live)
          .ok_or(ember_core::Error::MatchNotFound(match_id))?;
        if !m.pair.contains(sender) {
          return Err(
            ember_core::Error::NotAParticipant { match_id, user_id: sender }
              .into(),
          );
        }

        let message = Message {
          message_id: Uuid::new_v4(),
          match_id:   Some(match_id),
          sender_id:  Some(sender),
          body,
          created_at: Utc::now(),
          deleted_at: None,
        };
        tx.execute(
          "INSERT INTO messages (message_id, match_id, sender_id, body, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(message.message_id),
            encode_uuid(match_id),
            encode_uuid(sender),
            message.body,
            encode_dt(message.created_at),
          ],
        )?;
        Ok(message)
      })
      .await
  }

  // ── Trust & fraud ─────────────────────────────────────────────────────────

  async fn file_report(
    &self,
    reporter: Uuid,
    reported: Uuid,
    reason: ReportReason,
    details: Option<String>,
  ) -> Result<Report> {
    trust::file_report(self, reporter, reported, reason, details).await
  }

  async fn resolve_report(
    &self,
    report_id: Uuid,
    reviewer: Uuid,
    dismiss: bool,
  ) -> Result<Report> {
    trust::resolve_report(self, report_id, reviewer, dismiss).await
  }

  async fn raise_fraud_flag(
    &self,
    user: Uuid,
    signal: FraudSignal,
    severity: Severity,
    details: serde_json::Value,
  ) -> Result<FraudFlag> {
    trust::raise_flag(self, user, signal, severity, details).await
  }

  async fn resolve_fraud_flag(&self, flag_id: Uuid) -> Result<FraudFlag> {
    trust::resolve_flag(self, flag_id).await
  }

  async fn run_fraud_scan(&self, user: Uuid) -> Result<Vec<FraudFlag>> {
    trust::run_scan(self, user).await
  }

  async fn recompute_trust(&self, user: Uuid) -> Result<TrustOutcome> {
    trust::recompute(self, user).await
  }

  async fn trust_score(&self, user: Uuid) -> Result<Option<TrustScore>> {
    trust::latest_score(self, user).await
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn account_status(&self, user: Uuid) -> Result<AccountStatus> {
    lifecycle::account_status(self, user).await
  }

  async fn deactivate(
    &self,
    user: Uuid,
    reason: Option<String>,
  ) -> Result<AccountStatus> {
    lifecycle::deactivate(self, user, reason).await
  }

  async fn reactivate(&self, user: Uuid) -> Result<AccountStatus> {
    lifecycle::reactivate(self, user).await
  }

  async fn request_deletion(&self, user: Uuid) -> Result<AccountStatus> {
    lifecycle::request_deletion(self, user).await
  }

  async fn cancel_deletion(&self, user: Uuid) -> Result<AccountStatus> {
    lifecycle::cancel_deletion(self, user).await
  }

  async fn request_export(
    &self,
    user: Uuid,
    format: ExportFormat,
  ) -> Result<DataExport> {
    lifecycle::request_export(self, user, format).await
  }

  async fn run_purge_sweep(&self, now: DateTime<Utc>) -> Result<PurgeReport> {
    lifecycle::run_purge_sweep(self, now).await
  }
}
