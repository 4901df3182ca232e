//! The `PlatformStore` trait.
//!
//! Implemented by storage backends (e.g. `ember-store-sqlite`). Higher
//! layers (`ember-api`, `ember-server`) depend on this abstraction, not on
//! any concrete backend.
//!
//! The action log is append-only. Reversals are expressed as lifecycle
//! events (rewind records, soft-delete markers), which are themselves
//! append-only; hard deletion happens only inside the purge sweep.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  action::{Action, RewindOutcome, SwipeKind, SwipeOutcome},
  lifecycle::{AccountStatus, DataExport, ExportFormat, PurgeReport},
  matching::{Match, Message},
  quota::{Plan, Quota},
  trust::{
    FraudFlag, FraudSignal, Report, ReportReason, Severity, TrustOutcome,
    TrustScore,
  },
  user::User,
};

/// Abstraction over a matching-pipeline backend.
pub trait PlatformStore: Send + Sync {
  /// Backend errors must convert into the core taxonomy so callers can
  /// react to typed failures without naming the backend.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user, unverified, non-admin.
  fn add_user(
    &self,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Change verification state. Triggers a trust recompute.
  fn set_verified(
    &self,
    id: Uuid,
    verified: bool,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Grant or revoke moderation rights.
  fn set_admin(
    &self,
    id: Uuid,
    admin: bool,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Soft-delete a user. The row survives for the purge sweep.
  fn soft_delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Action log & reconciler ───────────────────────────────────────────

  /// Append a swipe to the action log and reconcile matches.
  ///
  /// A super-like debits one super-like credit first and fails with
  /// `QuotaExhausted` when none remain (unless the plan or an active
  /// boost window grants unlimited use). Likes against a reciprocal
  /// completed, non-rewound like materialise the canonical match exactly
  /// once; an existing active match is reported as
  /// [`crate::action::MatchOutcome::AlreadyMatched`].
  fn record_swipe(
    &self,
    actor: Uuid,
    target: Uuid,
    kind: SwipeKind,
  ) -> impl Future<Output = Result<SwipeOutcome, Self::Error>> + Send + '_;

  /// Full history between an ordered (actor, target) pair, oldest first.
  fn action_history(
    &self,
    actor: Uuid,
    target: Uuid,
  ) -> impl Future<Output = Result<Vec<Action>, Self::Error>> + Send + '_;

  /// The actor's most recent completed, non-rewound, non-deleted like or
  /// pass — the action `rewind` would reverse. `None` when the history
  /// is exhausted.
  fn latest_rewindable(
    &self,
    actor: Uuid,
  ) -> impl Future<Output = Result<Option<Action>, Self::Error>> + Send + '_;

  // ── Rewind controller ─────────────────────────────────────────────────

  /// Reverse the actor's most recent eligible action: consume one rewind
  /// credit, record the one-per-action rewind event, retract the match
  /// the action produced (if any), and append an `undo` entry — all
  /// atomically.
  fn rewind(
    &self,
    actor: Uuid,
  ) -> impl Future<Output = Result<RewindOutcome, Self::Error>> + Send + '_;

  /// Reverse one specific action belonging to the actor. Fails with
  /// `AlreadyRewound` when a rewind event already exists for it.
  fn rewind_action(
    &self,
    actor: Uuid,
    action_id: Uuid,
  ) -> impl Future<Output = Result<RewindOutcome, Self::Error>> + Send + '_;

  // ── Quota ledger ──────────────────────────────────────────────────────

  /// The user's ledger row, created lazily with the plan's daily grant.
  fn quota(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Quota, Self::Error>> + Send + '_;

  /// Apply an external entitlement change and re-grant credits.
  fn set_plan(
    &self,
    user_id: Uuid,
    plan: Plan,
  ) -> impl Future<Output = Result<Quota, Self::Error>> + Send + '_;

  /// Consume one boost credit and open a boost window.
  fn activate_boost(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Quota, Self::Error>> + Send + '_;

  /// Daily replenishment: top every ledger row due for a refresh back up
  /// to its plan grant. Returns the number of rows replenished.
  fn replenish_all(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Matches ───────────────────────────────────────────────────────────

  fn get_match(
    &self,
    match_id: Uuid,
  ) -> impl Future<Output = Result<Option<Match>, Self::Error>> + Send + '_;

  /// All non-deleted matches involving `user_id`.
  fn matches_for(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + '_;

  /// Set the participant's reveal flag. Fails if already set.
  fn reveal(
    &self,
    match_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Participant-driven soft-delete of a match.
  fn unmatch(
    &self,
    match_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Blocks & messages ─────────────────────────────────────────────────

  /// Record a block. Blocked pairs cannot like each other.
  fn block(
    &self,
    blocker: Uuid,
    blocked: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Append a message to a live match conversation.
  fn record_message(
    &self,
    match_id: Uuid,
    sender: Uuid,
    body: String,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  // ── Trust & fraud ─────────────────────────────────────────────────────

  /// File an abuse report. Triggers a trust recompute for the reported
  /// user.
  fn file_report(
    &self,
    reporter: Uuid,
    reported: Uuid,
    reason: ReportReason,
    details: Option<String>,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Resolve or dismiss a report (moderation path). Enough resolved
  /// reports suspend the reported user via soft-delete.
  fn resolve_report(
    &self,
    report_id: Uuid,
    reviewer: Uuid,
    dismiss: bool,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  fn raise_fraud_flag(
    &self,
    user_id: Uuid,
    signal: FraudSignal,
    severity: Severity,
    details: serde_json::Value,
  ) -> impl Future<Output = Result<FraudFlag, Self::Error>> + Send + '_;

  fn resolve_fraud_flag(
    &self,
    flag_id: Uuid,
  ) -> impl Future<Output = Result<FraudFlag, Self::Error>> + Send + '_;

  /// Behavioral scan: raise flags for rapid swiping and mass messaging.
  fn run_fraud_scan(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<FraudFlag>, Self::Error>> + Send + '_;

  /// Recompute the composite trust score from current signals. Stale
  /// reads are acceptable; recomputing twice with the same inputs yields
  /// the same score.
  fn recompute_trust(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<TrustOutcome, Self::Error>> + Send + '_;

  /// The last stored composite, if any recompute has run.
  fn trust_score(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<TrustScore>, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// The user's lifecycle record, created lazily in the active state.
  fn account_status(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<AccountStatus, Self::Error>> + Send + '_;

  /// Open (or replace — windows never stack) a deactivation window.
  fn deactivate(
    &self,
    user_id: Uuid,
    reason: Option<String>,
  ) -> impl Future<Output = Result<AccountStatus, Self::Error>> + Send + '_;

  /// Close an open deactivation window early.
  fn reactivate(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<AccountStatus, Self::Error>> + Send + '_;

  /// Schedule a purge one grace period in the future.
  fn request_deletion(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<AccountStatus, Self::Error>> + Send + '_;

  /// Cancel a scheduled purge; valid until the purge instant.
  fn cancel_deletion(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<AccountStatus, Self::Error>> + Send + '_;

  /// Request a data export, throttled per policy.
  fn request_export(
    &self,
    user_id: Uuid,
    format: ExportFormat,
  ) -> impl Future<Output = Result<DataExport, Self::Error>> + Send + '_;

  /// Purge every user whose scheduled time has elapsed, consulting the
  /// delete-policy registry, and expire overdue exports. Blocked users
  /// are reported and retried next cycle.
  fn run_purge_sweep(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<PurgeReport, Self::Error>> + Send + '_;
}
