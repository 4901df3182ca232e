//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Fraud flag details are
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.
//! Enum discriminants are stored as the lowercase strings the wire format
//! uses, so stored rows and serialized payloads agree.

use chrono::{DateTime, Utc};
use ember_core::{
  action::{Action, ActionKind, ActionStatus},
  lifecycle::{AccountStatus, ExportFormat},
  matching::{Match, PairKey},
  quota::{Plan, Quota},
  trust::{
    FraudFlag, FraudSignal, Report, ReportReason, ReportStatus, Severity,
    TrustScore,
  },
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── ActionKind ──────────────────────────────────────────────────────────────

pub fn encode_action_kind(k: ActionKind) -> &'static str {
  match k {
    ActionKind::Like => "like",
    ActionKind::Pass => "pass",
    ActionKind::Undo => "undo",
  }
}

pub fn decode_action_kind(s: &str) -> Result<ActionKind> {
  match s {
    "like" => Ok(ActionKind::Like),
    "pass" => Ok(ActionKind::Pass),
    "undo" => Ok(ActionKind::Undo),
    other => Err(Error::Decode(format!("unknown action kind: {other:?}"))),
  }
}

// ─── ActionStatus ────────────────────────────────────────────────────────────

pub fn encode_action_status(s: ActionStatus) -> &'static str {
  match s {
    ActionStatus::Pending => "pending",
    ActionStatus::Completed => "completed",
    ActionStatus::Failed => "failed",
  }
}

pub fn decode_action_status(s: &str) -> Result<ActionStatus> {
  match s {
    "pending" => Ok(ActionStatus::Pending),
    "completed" => Ok(ActionStatus::Completed),
    "failed" => Ok(ActionStatus::Failed),
    other => Err(Error::Decode(format!("unknown action status: {other:?}"))),
  }
}

// ─── Plan ────────────────────────────────────────────────────────────────────

pub fn encode_plan(p: Plan) -> &'static str {
  match p {
    Plan::Free => "free",
    Plan::Premium => "premium",
    Plan::Vip => "vip",
  }
}

pub fn decode_plan(s: &str) -> Result<Plan> {
  match s {
    "free" => Ok(Plan::Free),
    "premium" => Ok(Plan::Premium),
    "vip" => Ok(Plan::Vip),
    other => Err(Error::Decode(format!("unknown plan: {other:?}"))),
  }
}

// ─── Severity ────────────────────────────────────────────────────────────────

pub fn encode_severity(s: Severity) -> &'static str {
  match s {
    Severity::Low => "low",
    Severity::Medium => "medium",
    Severity::High => "high",
  }
}

pub fn decode_severity(s: &str) -> Result<Severity> {
  match s {
    "low" => Ok(Severity::Low),
    "medium" => Ok(Severity::Medium),
    "high" => Ok(Severity::High),
    other => Err(Error::Decode(format!("unknown severity: {other:?}"))),
  }
}

// ─── FraudSignal ─────────────────────────────────────────────────────────────

pub fn encode_signal(s: FraudSignal) -> &'static str {
  match s {
    FraudSignal::RapidActions => "rapid_actions",
    FraudSignal::MassMessages => "mass_messages",
    FraudSignal::DuplicatePhotos => "duplicate_photos",
    FraudSignal::FakeLocation => "fake_location",
    FraudSignal::BotBehavior => "bot_behavior",
    FraudSignal::SuspiciousPattern => "suspicious_pattern",
  }
}

pub fn decode_signal(s: &str) -> Result<FraudSignal> {
  match s {
    "rapid_actions" => Ok(FraudSignal::RapidActions),
    "mass_messages" => Ok(FraudSignal::MassMessages),
    "duplicate_photos" => Ok(FraudSignal::DuplicatePhotos),
    "fake_location" => Ok(FraudSignal::FakeLocation),
    "bot_behavior" => Ok(FraudSignal::BotBehavior),
    "suspicious_pattern" => Ok(FraudSignal::SuspiciousPattern),
    other => Err(Error::Decode(format!("unknown fraud signal: {other:?}"))),
  }
}

// ─── ReportReason ────────────────────────────────────────────────────────────

pub fn encode_reason(r: ReportReason) -> &'static str {
  match r {
    ReportReason::InappropriateProfile => "inappropriate_profile",
    ReportReason::HarassingMessages => "harassing_messages",
    ReportReason::BotAccount => "bot_account",
    ReportReason::Catfish => "catfish",
    ReportReason::ExplicitContent => "explicit_content",
    ReportReason::Scam => "scam",
    ReportReason::Other => "other",
  }
}

pub fn decode_reason(s: &str) -> Result<ReportReason> {
  match s {
    "inappropriate_profile" => Ok(ReportReason::InappropriateProfile),
    "harassing_messages" => Ok(ReportReason::HarassingMessages),
    "bot_account" => Ok(ReportReason::BotAccount),
    "catfish" => Ok(ReportReason::Catfish),
    "explicit_content" => Ok(ReportReason::ExplicitContent),
    "scam" => Ok(ReportReason::Scam),
    "other" => Ok(ReportReason::Other),
    other => Err(Error::Decode(format!("unknown report reason: {other:?}"))),
  }
}

// ─── ReportStatus ────────────────────────────────────────────────────────────

pub fn encode_report_status(s: ReportStatus) -> &'static str {
  match s {
    ReportStatus::Pending => "pending",
    ReportStatus::Resolved => "resolved",
    ReportStatus::Dismissed => "dismissed",
  }
}

pub fn decode_report_status(s: &str) -> Result<ReportStatus> {
  match s {
    "pending" => Ok(ReportStatus::Pending),
    "resolved" => Ok(ReportStatus::Resolved),
    "dismissed" => Ok(ReportStatus::Dismissed),
    other => Err(Error::Decode(format!("unknown report status: {other:?}"))),
  }
}

// ─── Export format ───────────────────────────────────────────────────────────

pub fn encode_export_format(f: ExportFormat) -> &'static str {
  match f {
    ExportFormat::Json => "json",
    ExportFormat::Csv => "csv",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub created_at: String,
  pub verified:   bool,
  pub admin:      bool,
  pub deleted_at: Option<String>,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      created_at: row.get(1)?,
      verified:   row.get(2)?,
      admin:      row.get(3)?,
      deleted_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      verified:   self.verified,
      admin:      self.admin,
      deleted_at: decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from an `actions` row.
pub struct RawAction {
  pub action_id:  String,
  pub actor_id:   String,
  pub target_id:  Option<String>,
  pub kind:       String,
  pub status:     String,
  pub match_id:   Option<String>,
  pub created_at: String,
  pub deleted_at: Option<String>,
}

impl RawAction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      action_id:  row.get(0)?,
      actor_id:   row.get(1)?,
      target_id:  row.get(2)?,
      kind:       row.get(3)?,
      status:     row.get(4)?,
      match_id:   row.get(5)?,
      created_at: row.get(6)?,
      deleted_at: row.get(7)?,
    })
  }

  pub fn into_action(self) -> Result<Action> {
    Ok(Action {
      action_id:  decode_uuid(&self.action_id)?,
      actor_id:   decode_uuid(&self.actor_id)?,
      target_id:  decode_opt_uuid(self.target_id.as_deref())?,
      kind:       decode_action_kind(&self.kind)?,
      status:     decode_action_status(&self.status)?,
      match_id:   decode_opt_uuid(self.match_id.as_deref())?,
      created_at: decode_dt(&self.created_at)?,
      deleted_at: decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Column list matching [`RawAction::from_row`] positions.
pub const ACTION_COLUMNS: &str =
  "action_id, actor_id, target_id, kind, status, match_id, created_at, \
   deleted_at";

/// Raw strings read directly from a `matches` row.
pub struct RawMatch {
  pub match_id:            String,
  pub user_lo:             String,
  pub user_hi:             String,
  pub compatibility_score: f64,
  pub reveal_lo:           bool,
  pub reveal_hi:           bool,
  pub created_at:          String,
  pub deleted_at:          Option<String>,
}

impl RawMatch {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      match_id:            row.get(0)?,
      user_lo:             row.get(1)?,
      user_hi:             row.get(2)?,
      compatibility_score: row.get(3)?,
      reveal_lo:           row.get(4)?,
      reveal_hi:           row.get(5)?,
      created_at:          row.get(6)?,
      deleted_at:          row.get(7)?,
    })
  }

  pub fn into_match(self) -> Result<Match> {
    let lo = decode_uuid(&self.user_lo)?;
    let hi = decode_uuid(&self.user_hi)?;
    let pair = PairKey::new(lo, hi).map_err(Error::Core)?;
    Ok(Match {
      match_id: decode_uuid(&self.match_id)?,
      pair,
      compatibility_score: self.compatibility_score,
      reveal_lo: self.reveal_lo,
      reveal_hi: self.reveal_hi,
      created_at: decode_dt(&self.created_at)?,
      deleted_at: decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Column list matching [`RawMatch::from_row`] positions.
pub const MATCH_COLUMNS: &str =
  "match_id, user_lo, user_hi, compatibility_score, reveal_lo, reveal_hi, \
   created_at, deleted_at";

/// Raw strings read directly from a `quotas` row.
pub struct RawQuota {
  pub user_id:          String,
  pub plan:             String,
  pub super_likes:      u32,
  pub boosts:           u32,
  pub rewinds:          u32,
  pub boost_expires_at: Option<String>,
  pub replenished_at:   String,
  pub updated_at:       String,
}

impl RawQuota {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:          row.get(0)?,
      plan:             row.get(1)?,
      super_likes:      row.get(2)?,
      boosts:           row.get(3)?,
      rewinds:          row.get(4)?,
      boost_expires_at: row.get(5)?,
      replenished_at:   row.get(6)?,
      updated_at:       row.get(7)?,
    })
  }

  pub fn into_quota(self) -> Result<Quota> {
    Ok(Quota {
      user_id:          decode_uuid(&self.user_id)?,
      plan:             decode_plan(&self.plan)?,
      super_likes:      self.super_likes,
      boosts:           self.boosts,
      rewinds:          self.rewinds,
      boost_expires_at: decode_opt_dt(self.boost_expires_at.as_deref())?,
      replenished_at:   decode_dt(&self.replenished_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawQuota::from_row`] positions.
pub const QUOTA_COLUMNS: &str =
  "user_id, plan, super_likes, boosts, rewinds, boost_expires_at, \
   replenished_at, updated_at";

/// Raw strings read directly from a `reports` row.
pub struct RawReport {
  pub report_id:   String,
  pub reporter_id: Option<String>,
  pub reported_id: String,
  pub reason:      String,
  pub details:     Option<String>,
  pub status:      String,
  pub created_at:  String,
  pub deleted_at:  Option<String>,
}

impl RawReport {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      report_id:   row.get(0)?,
      reporter_id: row.get(1)?,
      reported_id: row.get(2)?,
      reason:      row.get(3)?,
      details:     row.get(4)?,
      status:      row.get(5)?,
      created_at:  row.get(6)?,
      deleted_at:  row.get(7)?,
    })
  }

  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      report_id:   decode_uuid(&self.report_id)?,
      reporter_id: decode_opt_uuid(self.reporter_id.as_deref())?,
      reported_id: decode_uuid(&self.reported_id)?,
      reason:      decode_reason(&self.reason)?,
      details:     self.details,
      status:      decode_report_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      deleted_at:  decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Column list matching [`RawReport::from_row`] positions.
pub const REPORT_COLUMNS: &str =
  "report_id, reporter_id, reported_id, reason, details, status, created_at, \
   deleted_at";

/// Raw strings read directly from a `fraud_flags` row.
pub struct RawFraudFlag {
  pub flag_id:    String,
  pub user_id:    String,
  pub signal:     String,
  pub severity:   String,
  pub details:    String,
  pub resolved:   bool,
  pub created_at: String,
}

impl RawFraudFlag {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      flag_id:    row.get(0)?,
      user_id:    row.get(1)?,
      signal:     row.get(2)?,
      severity:   row.get(3)?,
      details:    row.get(4)?,
      resolved:   row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_flag(self) -> Result<FraudFlag> {
    Ok(FraudFlag {
      flag_id:    decode_uuid(&self.flag_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      signal:     decode_signal(&self.signal)?,
      severity:   decode_severity(&self.severity)?,
      details:    serde_json::from_str(&self.details)?,
      resolved:   self.resolved,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawFraudFlag::from_row`] positions.
pub const FLAG_COLUMNS: &str =
  "flag_id, user_id, signal, severity, details, resolved, created_at";

/// Raw strings read directly from a `trust_scores` row.
pub struct RawTrustScore {
  pub user_id:      String,
  pub verification: f64,
  pub longevity:    f64,
  pub behavior:     f64,
  pub fraud:        f64,
  pub activity:     f64,
  pub overall:      f64,
  pub report_count: u32,
  pub computed_at:  String,
}

impl RawTrustScore {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:      row.get(0)?,
      verification: row.get(1)?,
      longevity:    row.get(2)?,
      behavior:     row.get(3)?,
      fraud:        row.get(4)?,
      activity:     row.get(5)?,
      overall:      row.get(6)?,
      report_count: row.get(7)?,
      computed_at:  row.get(8)?,
    })
  }

  pub fn into_score(self) -> Result<TrustScore> {
    Ok(TrustScore {
      user_id:      decode_uuid(&self.user_id)?,
      verification: self.verification,
      longevity:    self.longevity,
      behavior:     self.behavior,
      fraud:        self.fraud,
      activity:     self.activity,
      overall:      self.overall,
      report_count: self.report_count,
      computed_at:  decode_dt(&self.computed_at)?,
    })
  }
}

/// Raw strings read directly from an `account_status` row.
pub struct RawAccountStatus {
  pub user_id:               String,
  pub deactivated_at:        Option<String>,
  pub deactivation_ends_at:  Option<String>,
  pub deletion_requested_at: Option<String>,
  pub purge_scheduled_for:   Option<String>,
  pub reason:                Option<String>,
  pub updated_at:            String,
}

impl RawAccountStatus {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:               row.get(0)?,
      deactivated_at:        row.get(1)?,
      deactivation_ends_at:  row.get(2)?,
      deletion_requested_at: row.get(3)?,
      purge_scheduled_for:   row.get(4)?,
      reason:                row.get(5)?,
      updated_at:            row.get(6)?,
    })
  }

  pub fn into_status(self) -> Result<AccountStatus> {
    Ok(AccountStatus {
      user_id: decode_uuid(&self.user_id)?,
      deactivated_at: decode_opt_dt(self.deactivated_at.as_deref())?,
      deactivation_ends_at: decode_opt_dt(
        self.deactivation_ends_at.as_deref(),
      )?,
      deletion_requested_at: decode_opt_dt(
        self.deletion_requested_at.as_deref(),
      )?,
      purge_scheduled_for: decode_opt_dt(self.purge_scheduled_for.as_deref())?,
      reason: self.reason,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawAccountStatus::from_row`] positions.
pub const STATUS_COLUMNS: &str =
  "user_id, deactivated_at, deactivation_ends_at, deletion_requested_at, \
   purge_scheduled_for, reason, updated_at";
