//! Trust scoring, fraud flags, and the report pipeline.
//!
//! Recomputation is pulled, not pushed: every mutation that moves a
//! sub-score (reports, flags, verification) recomputes the affected user's
//! score before returning, and reads between mutations serve the stored
//! value. Deactivation never triggers recomputation.

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ember_core::trust::{
  FraudFlag, FraudSignal, Report, ReportReason, ReportStatus, Severity,
  TrustInputs, TrustOutcome, TrustScore,
};

use crate::{
  encode::{
    encode_dt, encode_reason, encode_severity, encode_signal, encode_uuid,
    RawFraudFlag, RawReport, RawTrustScore, FLAG_COLUMNS, REPORT_COLUMNS,
  },
  error::{TxError, TxResult},
  store::{require_user_tx, user_tx},
  Result, SqliteStore,
};

/// Completed likes/passes inside this window before a rapid-action flag.
const RAPID_ACTION_LIMIT: u32 = 30;
const RAPID_WINDOW_MINUTES: i64 = 5;

/// Messages inside one hour before a mass-message flag.
const MESSAGE_LIMIT: u32 = 20;

// ─── Reports ─────────────────────────────────────────────────────────────────

pub(crate) async fn file_report(
  store: &SqliteStore,
  reporter: Uuid,
  reported: Uuid,
  reason: ReportReason,
  details: Option<String>,
) -> Result<Report> {
  if reporter == reported {
    return Err(crate::Error::Core(ember_core::Error::SelfAction(reporter)));
  }

  let report = store
    .call_tx(move |tx| {
      require_user_tx(tx, reporter)?;
      require_user_tx(tx, reported)?;

      let duplicate: bool = tx.query_row(
        "SELECT EXISTS(
           SELECT 1 FROM reports
           WHERE reporter_id = ?1 AND reported_id = ?2
             AND status = 'pending' AND deleted_at IS NULL)",
        rusqlite::params![encode_uuid(reporter), encode_uuid(reported)],
        |r| r.get(0),
      )?;
      if duplicate {
        return Err(
          ember_core::Error::InvalidOperation(
            "an open report against this user already exists".into(),
          )
          .into(),
        );
      }

      let report = Report {
        report_id:   Uuid::new_v4(),
        reporter_id: Some(reporter),
        reported_id: reported,
        reason,
        details,
        status:      ReportStatus::Pending,
        created_at:  Utc::now(),
        deleted_at:  None,
      };
      tx.execute(
        "INSERT INTO reports
           (report_id, reporter_id, reported_id, reason, details, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
          encode_uuid(report.report_id),
          encode_uuid(reporter),
          encode_uuid(reported),
          encode_reason(reason),
          report.details,
          encode_dt(report.created_at),
        ],
      )?;
      Ok(report)
    })
    .await?;

  recompute(store, reported).await?;
  Ok(report)
}

pub(crate) async fn resolve_report(
  store: &SqliteStore,
  report_id: Uuid,
  reviewer: Uuid,
  dismiss: bool,
) -> Result<Report> {
  let suspension_count = store.policy().suspension_report_count;

  let (report, suspended) = store
    .call_tx(move |tx| {
      let reviewer_user = require_user_tx(tx, reviewer)?;
      if !reviewer_user.admin {
        return Err(
          ember_core::Error::InvalidOperation(
            "reviewer lacks moderation rights".into(),
          )
          .into(),
        );
      }

      let mut report = report_by_id_tx(tx, report_id)?
        .ok_or(ember_core::Error::ReportNotFound(report_id))?;
      if report.status != ReportStatus::Pending {
        return Err(
          ember_core::Error::InvalidOperation(
            "report already reviewed".into(),
          )
          .into(),
        );
      }

      report.status =
        if dismiss { ReportStatus::Dismissed } else { ReportStatus::Resolved };
      tx.execute(
        "UPDATE reports SET status = ?2 WHERE report_id = ?1",
        rusqlite::params![
          encode_uuid(report_id),
          crate::encode::encode_report_status(report.status),
        ],
      )?;

      // Enough upheld reports suspend the account.
      let mut suspended = false;
      if report.status == ReportStatus::Resolved {
        let resolved: u32 = tx.query_row(
          "SELECT COUNT(*) FROM reports
           WHERE reported_id = ?1 AND status = 'resolved'
             AND deleted_at IS NULL",
          rusqlite::params![encode_uuid(report.reported_id)],
          |r| r.get(0),
        )?;
        if resolved >= suspension_count {
          let changed = tx.execute(
            "UPDATE users SET deleted_at = ?2
             WHERE user_id = ?1 AND deleted_at IS NULL",
            rusqlite::params![
              encode_uuid(report.reported_id),
              encode_dt(Utc::now()),
            ],
          )?;
          suspended = changed > 0;
        }
      }

      Ok((report, suspended))
    })
    .await?;

  if suspended {
    tracing::warn!(
      user_id = %report.reported_id,
      report_id = %report_id,
      "account suspended after upheld reports"
    );
  }

  recompute(store, report.reported_id).await?;
  Ok(report)
}

fn report_by_id_tx(
  tx: &rusqlite::Transaction<'_>,
  id: Uuid,
) -> TxResult<Option<Report>> {
  let raw: Option<RawReport> = tx
    .query_row(
      &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      |r| RawReport::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_report().map_err(TxError::from)).transpose()
}

// ─── Fraud flags ─────────────────────────────────────────────────────────────

pub(crate) async fn raise_flag(
  store: &SqliteStore,
  user: Uuid,
  signal: FraudSignal,
  severity: Severity,
  details: serde_json::Value,
) -> Result<FraudFlag> {
  let flag = store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      insert_flag_tx(tx, user, signal, severity, details)
    })
    .await?;

  recompute(store, user).await?;
  Ok(flag)
}

pub(crate) async fn resolve_flag(
  store: &SqliteStore,
  flag_id: Uuid,
) -> Result<FraudFlag> {
  let flag = store
    .call_tx(move |tx| {
      let raw: Option<RawFraudFlag> = tx
        .query_row(
          &format!(
            "SELECT {FLAG_COLUMNS} FROM fraud_flags WHERE flag_id = ?1"
          ),
          rusqlite::params![encode_uuid(flag_id)],
          |r| RawFraudFlag::from_row(r),
        )
        .optional()?;
      let mut flag = raw
        .map(|r| r.into_flag().map_err(TxError::from))
        .transpose()?
        .ok_or(ember_core::Error::FlagNotFound(flag_id))?;

      tx.execute(
        "UPDATE fraud_flags SET resolved = 1 WHERE flag_id = ?1",
        rusqlite::params![encode_uuid(flag_id)],
      )?;
      flag.resolved = true;
      Ok(flag)
    })
    .await?;

  recompute(store, flag.user_id).await?;
  Ok(flag)
}

fn insert_flag_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
  signal: FraudSignal,
  severity: Severity,
  details: serde_json::Value,
) -> TxResult<FraudFlag> {
  let flag = FraudFlag {
    flag_id: Uuid::new_v4(),
    user_id: user,
    signal,
    severity,
    details,
    resolved: false,
    created_at: Utc::now(),
  };
  tx.execute(
    "INSERT INTO fraud_flags
       (flag_id, user_id, signal, severity, details, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      encode_uuid(flag.flag_id),
      encode_uuid(user),
      encode_signal(signal),
      encode_severity(severity),
      serde_json::to_string(&flag.details)?,
      encode_dt(flag.created_at),
    ],
  )?;
  Ok(flag)
}

/// An unresolved flag for the same signal suppresses a repeat.
fn unresolved_signal_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
  signal: FraudSignal,
) -> TxResult<bool> {
  let exists: bool = tx.query_row(
    "SELECT EXISTS(
       SELECT 1 FROM fraud_flags
       WHERE user_id = ?1 AND signal = ?2 AND resolved = 0)",
    rusqlite::params![encode_uuid(user), encode_signal(signal)],
    |r| r.get(0),
  )?;
  Ok(exists)
}

pub(crate) async fn run_scan(
  store: &SqliteStore,
  user: Uuid,
) -> Result<Vec<FraudFlag>> {
  let raised = store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let now = Utc::now();
      let mut raised = Vec::new();

      let actions: u32 = tx.query_row(
        "SELECT COUNT(*) FROM actions
         WHERE actor_id = ?1 AND kind IN ('like', 'pass')
           AND status = 'completed' AND deleted_at IS NULL
           AND created_at >= ?2",
        rusqlite::params![
          encode_uuid(user),
          encode_dt(now - Duration::minutes(RAPID_WINDOW_MINUTES)),
        ],
        |r| r.get(0),
      )?;
      if actions > RAPID_ACTION_LIMIT
        && !unresolved_signal_tx(tx, user, FraudSignal::RapidActions)?
      {
        raised.push(insert_flag_tx(
          tx,
          user,
          FraudSignal::RapidActions,
          Severity::Medium,
          serde_json::json!({
            "count": actions,
            "window_minutes": RAPID_WINDOW_MINUTES,
          }),
        )?);
      }

      let messages: u32 = tx.query_row(
        "SELECT COUNT(*) FROM messages
         WHERE sender_id = ?1 AND deleted_at IS NULL AND created_at >= ?2",
        rusqlite::params![
          encode_uuid(user),
          encode_dt(now - Duration::hours(1)),
        ],
        |r| r.get(0),
      )?;
      if messages > MESSAGE_LIMIT
        && !unresolved_signal_tx(tx, user, FraudSignal::MassMessages)?
      {
        raised.push(insert_flag_tx(
          tx,
          user,
          FraudSignal::MassMessages,
          Severity::High,
          serde_json::json!({ "count": messages, "window_hours": 1 }),
        )?);
      }

      Ok(raised)
    })
    .await?;

  if !raised.is_empty() {
    recompute(store, user).await?;
  }
  Ok(raised)
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

pub(crate) async fn recompute(
  store: &SqliteStore,
  user: Uuid,
) -> Result<TrustOutcome> {
  let policy = store.policy_arc();

  let outcome = store
    .call_tx(move |tx| {
      let now = Utc::now();
      let inputs = gather_inputs_tx(tx, user, now)?;
      let score =
        TrustScore::compute(user, &inputs, &policy.trust_weights, now);

      tx.execute(
        "INSERT INTO trust_scores
           (user_id, verification, longevity, behavior, fraud, activity,
            overall, report_count, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (user_id) DO UPDATE SET
           verification = excluded.verification,
           longevity = excluded.longevity,
           behavior = excluded.behavior,
           fraud = excluded.fraud,
           activity = excluded.activity,
           overall = excluded.overall,
           report_count = excluded.report_count,
           computed_at = excluded.computed_at",
        rusqlite::params![
          encode_uuid(user),
          score.verification,
          score.longevity,
          score.behavior,
          score.fraud,
          score.activity,
          score.overall,
          score.report_count,
          encode_dt(score.computed_at),
        ],
      )?;

      let review = score.overall < policy.review_threshold;
      Ok(TrustOutcome { score, review })
    })
    .await?;

  if outcome.review {
    tracing::warn!(
      user_id = %user,
      overall = outcome.score.overall,
      "trust score below review threshold"
    );
  }
  Ok(outcome)
}

/// Missing inputs stay `None` and score neutral rather than failing the
/// whole recomputation.
fn gather_inputs_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
  now: chrono::DateTime<Utc>,
) -> TxResult<TrustInputs> {
  let user_row =
    user_tx(tx, user)?.ok_or(ember_core::Error::UserNotFound(user))?;
  let id_str = encode_uuid(user);

  let report_count: u32 = tx.query_row(
    "SELECT COUNT(*) FROM reports
     WHERE reported_id = ?1 AND status != 'dismissed' AND deleted_at IS NULL",
    rusqlite::params![id_str],
    |r| r.get(0),
  )?;

  let unresolved_flags: Vec<Severity> = {
    let mut stmt = tx.prepare(
      "SELECT severity FROM fraud_flags WHERE user_id = ?1 AND resolved = 0",
    )?;
    let severities = stmt
      .query_map(rusqlite::params![id_str], |r| r.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    severities
      .iter()
      .map(|s| crate::encode::decode_severity(s).map_err(TxError::from))
      .collect::<TxResult<Vec<_>>>()?
  };

  let hour_ago = encode_dt(now - Duration::hours(1));
  let actions_last_hour: u32 = tx.query_row(
    "SELECT COUNT(*) FROM actions
     WHERE actor_id = ?1 AND status = 'completed'
       AND deleted_at IS NULL AND created_at >= ?2",
    rusqlite::params![id_str, hour_ago],
    |r| r.get(0),
  )?;
  let messages_last_hour: u32 = tx.query_row(
    "SELECT COUNT(*) FROM messages
     WHERE sender_id = ?1 AND deleted_at IS NULL AND created_at >= ?2",
    rusqlite::params![id_str, hour_ago],
    |r| r.get(0),
  )?;

  Ok(TrustInputs {
    verified: Some(user_row.verified),
    account_age_days: Some((now - user_row.created_at).num_days()),
    report_count,
    unresolved_flags,
    actions_last_hour: Some(actions_last_hour),
    messages_last_hour: Some(messages_last_hour),
  })
}

pub(crate) async fn latest_score(
  store: &SqliteStore,
  user: Uuid,
) -> Result<Option<TrustScore>> {
  let id_str = encode_uuid(user);

  let raw: Option<RawTrustScore> = store
    .conn()
    .call(move |conn| {
      Ok(
        conn
          .query_row(
            "SELECT user_id, verification, longevity, behavior, fraud,
                    activity, overall, report_count, computed_at
             FROM trust_scores WHERE user_id = ?1",
            rusqlite::params![id_str],
            |r| RawTrustScore::from_row(r),
          )
          .optional()?,
      )
    })
    .await?;

  raw.map(|r| r.into_score()).transpose()
}
