//! Integration tests for `SqliteStore` against an in-memory database.

use ember_core::{
  action::{ActionKind, MatchOutcome, SwipeKind},
  lifecycle::{AccountState, ExportFormat},
  policy::PlatformPolicy,
  quota::{Plan, QuotaKind},
  store::PlatformStore,
  trust::{FraudSignal, ReportReason, Severity},
  user::User,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

async fn two_users(s: &SqliteStore) -> (User, User) {
  let a = s.add_user().await.unwrap();
  let b = s.add_user().await.unwrap();
  (a, b)
}

fn is_core(err: &Error, check: impl Fn(&ember_core::Error) -> bool) -> bool {
  matches!(err, Error::Core(e) if check(e))
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = s.add_user().await.unwrap();
  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert!(!fetched.verified);
  assert!(fetched.is_live());
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Swipes and reconciliation ───────────────────────────────────────────────

#[tokio::test]
async fn one_sided_like_creates_no_match() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  let out = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  assert_eq!(out.action.kind, ActionKind::Like);
  assert!(matches!(out.outcome, MatchOutcome::None));
}

#[tokio::test]
async fn mutual_like_creates_exactly_one_match() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let out = s
    .record_swipe(b.user_id, a.user_id, SwipeKind::Like)
    .await
    .unwrap();

  let m = match out.outcome {
    MatchOutcome::Created(m) => m,
    other => panic!("expected created match, got {other:?}"),
  };
  assert!(m.pair.lo < m.pair.hi);
  assert!(m.pair.contains(a.user_id) && m.pair.contains(b.user_id));
  assert_eq!(out.action.match_id, Some(m.match_id));

  assert_eq!(s.matches_for(a.user_id).await.unwrap().len(), 1);
  assert_eq!(s.matches_for(b.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn self_swipe_is_rejected() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let err = s
    .record_swipe(a.user_id, a.user_id, SwipeKind::Like)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::SelfAction(_))
  }));
}

#[tokio::test]
async fn duplicate_like_is_rejected() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let err = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::InvalidOperation(_))
  }));
}

#[tokio::test]
async fn blocked_pair_cannot_swipe() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.block(b.user_id, a.user_id).await.unwrap();
  let err = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::ParticipantUnavailable(_))
  }));
}

#[tokio::test]
async fn soft_deleted_target_is_unavailable() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.soft_delete_user(b.user_id).await.unwrap();
  let err = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::ParticipantUnavailable(id) if *id == b.user_id)
  }));
}

#[tokio::test]
async fn concurrent_mutual_likes_create_one_match() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  let s1 = s.clone();
  let s2 = s.clone();
  let (a_id, b_id) = (a.user_id, b.user_id);
  let t1 =
    tokio::spawn(
      async move { s1.record_swipe(a_id, b_id, SwipeKind::Like).await },
    );
  let t2 =
    tokio::spawn(
      async move { s2.record_swipe(b_id, a_id, SwipeKind::Like).await },
    );
  t1.await.unwrap().unwrap();
  t2.await.unwrap().unwrap();

  assert_eq!(s.matches_for(a.user_id).await.unwrap().len(), 1);
}

// ─── Quota ledger ────────────────────────────────────────────────────────────

#[tokio::test]
async fn free_plan_gets_the_standing_grant() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let q = s.quota(a.user_id).await.unwrap();
  assert_eq!(q.plan, Plan::Free);
  assert_eq!(q.super_likes, 1);
  assert_eq!(q.rewinds, 0);
}

#[tokio::test]
async fn super_like_debits_until_exhausted() {
  let s = store().await;
  let (a, b) = two_users(&s).await;
  let c = s.add_user().await.unwrap();

  s.record_swipe(a.user_id, b.user_id, SwipeKind::SuperLike)
    .await
    .unwrap();
  assert_eq!(s.quota(a.user_id).await.unwrap().super_likes, 0);

  let err = s
    .record_swipe(a.user_id, c.user_id, SwipeKind::SuperLike)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::QuotaExhausted(QuotaKind::SuperLike))
  }));

  // The failed debit left no action behind.
  assert!(s.action_history(a.user_id, c.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn vip_super_likes_are_unlimited() {
  let s = store().await;
  let a = s.add_user().await.unwrap();
  s.set_plan(a.user_id, Plan::Vip).await.unwrap();

  for _ in 0..15 {
    let b = s.add_user().await.unwrap();
    s.record_swipe(a.user_id, b.user_id, SwipeKind::SuperLike)
      .await
      .unwrap();
  }
  assert_eq!(s.quota(a.user_id).await.unwrap().super_likes, 10);
}

#[tokio::test]
async fn boost_window_makes_super_likes_free() {
  let s = store().await;
  let a = s.add_user().await.unwrap();
  s.set_plan(a.user_id, Plan::Premium).await.unwrap();

  let q = s.activate_boost(a.user_id).await.unwrap();
  assert_eq!(q.boosts, 0);
  assert!(q.boost_expires_at.is_some());

  let b = s.add_user().await.unwrap();
  s.record_swipe(a.user_id, b.user_id, SwipeKind::SuperLike)
    .await
    .unwrap();
  assert_eq!(s.quota(a.user_id).await.unwrap().super_likes, 5);
}

#[tokio::test]
async fn boost_on_free_plan_is_exhausted() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let err = s.activate_boost(a.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::QuotaExhausted(QuotaKind::Boost))
  }));
}

#[tokio::test]
async fn replenish_tops_counters_back_up() {
  let s = store().await;
  let a = s.add_user().await.unwrap();
  s.record_swipe(a.user_id, s.add_user().await.unwrap().user_id, SwipeKind::SuperLike)
    .await
    .unwrap();
  assert_eq!(s.quota(a.user_id).await.unwrap().super_likes, 0);

  // A sweep dated one day out is past every replenish cutoff.
  let later = chrono::Utc::now() + chrono::Duration::days(1);
  let touched = s.replenish_all(later).await.unwrap();
  assert_eq!(touched, 1);
  assert_eq!(s.quota(a.user_id).await.unwrap().super_likes, 1);
}

// ─── Rewind controller ───────────────────────────────────────────────────────

async fn premium_user(s: &SqliteStore) -> User {
  let u = s.add_user().await.unwrap();
  s.set_plan(u.user_id, Plan::Premium).await.unwrap();
  u
}

#[tokio::test]
async fn rewind_reverses_latest_action_and_appends_undo() {
  let s = store().await;
  let a = premium_user(&s).await;
  let b = s.add_user().await.unwrap();

  s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
    .await
    .unwrap();
  let out = s.rewind(a.user_id).await.unwrap();
  assert_eq!(out.action.kind, ActionKind::Pass);
  assert_eq!(out.remaining_rewinds, Some(4));

  let history = s.action_history(a.user_id, b.user_id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[1].kind, ActionKind::Undo);

  // The rewound pass is no longer eligible.
  assert!(s.latest_rewindable(a.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn rewind_with_no_history_fails() {
  let s = store().await;
  let a = premium_user(&s).await;

  let err = s.rewind(a.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::NothingToRewind(_))
  }));
}

#[tokio::test]
async fn rewind_without_credits_leaves_log_untouched() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
    .await
    .unwrap();
  let err = s.rewind(a.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::QuotaExhausted(QuotaKind::Rewind))
  }));

  // No rewind record, no undo entry; the pass is still the latest.
  let history = s.action_history(a.user_id, b.user_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert!(s.latest_rewindable(a.user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn rewinding_a_match_producing_like_retracts_the_match() {
  let s = store().await;
  let a = premium_user(&s).await;
  let b = s.add_user().await.unwrap();

  s.record_swipe(b.user_id, a.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let out = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let match_id = out.outcome.created().unwrap().match_id;

  let rewound = s.rewind(a.user_id).await.unwrap();
  assert_eq!(rewound.retracted_match, Some(match_id));
  assert!(s.matches_for(a.user_id).await.unwrap().is_empty());

  let m = s.get_match(match_id).await.unwrap().unwrap();
  assert!(m.deleted_at.is_some());
}

#[tokio::test]
async fn pair_can_rematch_after_rewind() {
  let s = store().await;
  let a = premium_user(&s).await;
  let b = s.add_user().await.unwrap();

  s.record_swipe(b.user_id, a.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let first = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  s.rewind(a.user_id).await.unwrap();

  // The retracted match no longer blocks the pair.
  let second = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let m = second.outcome.created().unwrap();
  assert_ne!(m.match_id, first.outcome.created().unwrap().match_id);
}

#[tokio::test]
async fn rewinding_one_action_twice_fails() {
  let s = store().await;
  let a = premium_user(&s).await;
  let b = s.add_user().await.unwrap();

  let out = s
    .record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
    .await
    .unwrap();
  s.rewind_action(a.user_id, out.action.action_id)
    .await
    .unwrap();

  let err = s
    .rewind_action(a.user_id, out.action.action_id)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::AlreadyRewound(id) if *id == out.action.action_id)
  }));
}

#[tokio::test]
async fn concurrent_rewinds_respect_the_credit_balance() {
  let mut policy = PlatformPolicy::default();
  policy.quota.premium.rewinds = 2;
  let s = SqliteStore::open_in_memory_with(policy).await.unwrap();

  let a = s.add_user().await.unwrap();
  s.set_plan(a.user_id, Plan::Premium).await.unwrap();
  for _ in 0..6 {
    let b = s.add_user().await.unwrap();
    s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
      .await
      .unwrap();
  }

  let mut handles = Vec::new();
  for _ in 0..6 {
    let s2 = s.clone();
    let actor = a.user_id;
    handles.push(tokio::spawn(async move { s2.rewind(actor).await }));
  }

  let mut ok = 0;
  let mut exhausted = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => ok += 1,
      Err(err) => {
        assert!(is_core(&err, |e| {
          matches!(e, ember_core::Error::QuotaExhausted(QuotaKind::Rewind))
        }));
        exhausted += 1;
      }
    }
  }
  assert_eq!(ok, 2);
  assert_eq!(exhausted, 4);
  assert_eq!(s.quota(a.user_id).await.unwrap().rewinds, 0);
}

// ─── Matches ─────────────────────────────────────────────────────────────────

async fn matched_pair(s: &SqliteStore) -> (User, User, Uuid) {
  let (a, b) = two_users(s).await;
  s.record_swipe(a.user_id, b.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let out = s
    .record_swipe(b.user_id, a.user_id, SwipeKind::Like)
    .await
    .unwrap();
  let id = out.outcome.created().unwrap().match_id;
  (a, b, id)
}

#[tokio::test]
async fn reveal_is_per_participant_and_one_shot() {
  let s = store().await;
  let (a, b, match_id) = matched_pair(&s).await;

  let m = s.reveal(match_id, a.user_id).await.unwrap();
  assert!(!m.both_revealed());

  let err = s.reveal(match_id, a.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::AlreadyRevealed(_))
  }));

  let m = s.reveal(match_id, b.user_id).await.unwrap();
  assert!(m.both_revealed());
}

#[tokio::test]
async fn reveal_by_outsider_is_rejected() {
  let s = store().await;
  let (_, _, match_id) = matched_pair(&s).await;
  let outsider = s.add_user().await.unwrap();

  let err = s.reveal(match_id, outsider.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::NotAParticipant { .. })
  }));
}

#[tokio::test]
async fn unmatch_soft_deletes() {
  let s = store().await;
  let (a, _, match_id) = matched_pair(&s).await;

  s.unmatch(match_id, a.user_id).await.unwrap();
  assert!(s.matches_for(a.user_id).await.unwrap().is_empty());

  // Repeat unmatch is a no-op.
  s.unmatch(match_id, a.user_id).await.unwrap();
}

#[tokio::test]
async fn messages_require_a_live_match() {
  let s = store().await;
  let (a, _, match_id) = matched_pair(&s).await;

  s.record_message(match_id, a.user_id, "hi".into())
    .await
    .unwrap();

  s.unmatch(match_id, a.user_id).await.unwrap();
  let err = s
    .record_message(match_id, a.user_id, "still there?".into())
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::MatchNotFound(_))
  }));
}

// ─── Trust and fraud ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_lower_the_trust_score() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  let before = s.recompute_trust(b.user_id).await.unwrap().score;
  s.file_report(
    a.user_id,
    b.user_id,
    ReportReason::BotAccount,
    Some("auto-liked 200 profiles".into()),
  )
  .await
  .unwrap();

  let after = s.trust_score(b.user_id).await.unwrap().unwrap();
  assert!(after.overall < before.overall);
  assert_eq!(after.report_count, 1);
}

#[tokio::test]
async fn duplicate_open_report_is_rejected() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  s.file_report(a.user_id, b.user_id, ReportReason::Scam, None)
    .await
    .unwrap();
  let err = s
    .file_report(a.user_id, b.user_id, ReportReason::Scam, None)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::InvalidOperation(_))
  }));
}

#[tokio::test]
async fn resolving_reports_suspends_after_the_threshold() {
  let s = store().await;
  let target = s.add_user().await.unwrap();
  let admin = s.add_user().await.unwrap();
  s.set_admin(admin.user_id, true).await.unwrap();

  for _ in 0..3 {
    let reporter = s.add_user().await.unwrap();
    let report = s
      .file_report(
        reporter.user_id,
        target.user_id,
        ReportReason::HarassingMessages,
        None,
      )
      .await
      .unwrap();
    s.resolve_report(report.report_id, admin.user_id, false)
      .await
      .unwrap();
  }

  let user = s.get_user(target.user_id).await.unwrap().unwrap();
  assert!(user.deleted_at.is_some());
}

#[tokio::test]
async fn non_admin_cannot_resolve_reports() {
  let s = store().await;
  let (a, b) = two_users(&s).await;

  let report = s
    .file_report(a.user_id, b.user_id, ReportReason::Other, None)
    .await
    .unwrap();
  let err = s
    .resolve_report(report.report_id, a.user_id, false)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::InvalidOperation(_))
  }));
}

#[tokio::test]
async fn fraud_flags_lower_the_score_until_resolved() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let baseline = s.recompute_trust(a.user_id).await.unwrap().score;
  let flag = s
    .raise_fraud_flag(
      a.user_id,
      FraudSignal::FakeLocation,
      Severity::High,
      serde_json::json!({ "jumps": 4 }),
    )
    .await
    .unwrap();

  let flagged = s.trust_score(a.user_id).await.unwrap().unwrap();
  assert!(flagged.fraud < baseline.fraud);

  s.resolve_fraud_flag(flag.flag_id).await.unwrap();
  let resolved = s.trust_score(a.user_id).await.unwrap().unwrap();
  assert_eq!(resolved.fraud, baseline.fraud);
}

#[tokio::test]
async fn rapid_action_scan_raises_one_flag() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  for _ in 0..35 {
    let b = s.add_user().await.unwrap();
    s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
      .await
      .unwrap();
  }

  let raised = s.run_fraud_scan(a.user_id).await.unwrap();
  assert_eq!(raised.len(), 1);
  assert_eq!(raised[0].signal, FraudSignal::RapidActions);

  // The open flag suppresses a duplicate on the next scan.
  assert!(s.run_fraud_scan(a.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn verification_raises_the_score() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let before = s.recompute_trust(a.user_id).await.unwrap().score;
  s.set_verified(a.user_id, true).await.unwrap();
  let after = s.trust_score(a.user_id).await.unwrap().unwrap();
  assert!(after.overall > before.overall);
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_and_reactivate() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let status = s
    .deactivate(a.user_id, Some("taking a break".into()))
    .await
    .unwrap();
  assert_eq!(status.state(chrono::Utc::now()), AccountState::Deactivated);

  let status = s.reactivate(a.user_id).await.unwrap();
  assert_eq!(status.state(chrono::Utc::now()), AccountState::Active);

  let err = s.reactivate(a.user_id).await.unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::InvalidOperation(_))
  }));
}

#[tokio::test]
async fn deletion_request_schedules_a_future_purge() {
  let s = store().await;
  let a = s.add_user().await.unwrap();
  let now = chrono::Utc::now();

  let status = s.request_deletion(a.user_id).await.unwrap();
  assert_eq!(status.state(chrono::Utc::now()), AccountState::DeletionRequested);
  assert!(status.purge_scheduled_for.unwrap() > now);

  // Nothing is purged inside the grace period.
  let report = s.run_purge_sweep(now).await.unwrap();
  assert!(report.purged.is_empty());
  assert!(s.get_user(a.user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn cancelled_deletion_never_purges() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  s.request_deletion(a.user_id).await.unwrap();
  s.cancel_deletion(a.user_id).await.unwrap();

  let later = chrono::Utc::now() + chrono::Duration::days(31);
  let report = s.run_purge_sweep(later).await.unwrap();
  assert!(report.purged.is_empty());
  assert!(s.get_user(a.user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn purge_removes_the_user_after_the_grace_period() {
  let s = store().await;
  let (a, b) = two_users(&s).await;
  s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
    .await
    .unwrap();

  s.request_deletion(a.user_id).await.unwrap();
  let later = chrono::Utc::now() + chrono::Duration::days(31);
  let report = s.run_purge_sweep(later).await.unwrap();

  assert_eq!(report.purged, vec![a.user_id]);
  assert!(s.get_user(a.user_id).await.unwrap().is_none());
  // The bystander survives.
  assert!(s.get_user(b.user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn live_match_blocks_the_purge_until_resolved() {
  let s = store().await;
  let (a, _, match_id) = matched_pair(&s).await;

  s.request_deletion(a.user_id).await.unwrap();
  let later = chrono::Utc::now() + chrono::Duration::days(31);

  let report = s.run_purge_sweep(later).await.unwrap();
  assert_eq!(report.blocked, vec![a.user_id]);
  assert!(s.get_user(a.user_id).await.unwrap().is_some());

  s.unmatch(match_id, a.user_id).await.unwrap();
  let report = s.run_purge_sweep(later).await.unwrap();
  assert_eq!(report.purged, vec![a.user_id]);
  assert!(s.get_user(a.user_id).await.unwrap().is_none());
  assert!(s.get_match(match_id).await.unwrap().is_none());
}

#[tokio::test]
async fn purge_nullifies_the_other_side_of_history() {
  let s = store().await;
  let (a, b) = two_users(&s).await;
  s.record_swipe(a.user_id, b.user_id, SwipeKind::Pass)
    .await
    .unwrap();

  s.request_deletion(b.user_id).await.unwrap();
  let later = chrono::Utc::now() + chrono::Duration::days(31);
  s.run_purge_sweep(later).await.unwrap();

  // A's history row survives with the target nulled.
  let history = s.action_history(a.user_id, b.user_id).await.unwrap();
  assert!(history.is_empty());
  let latest = s.latest_rewindable(a.user_id).await.unwrap().unwrap();
  assert_eq!(latest.target_id, None);
}

#[tokio::test]
async fn export_requests_are_throttled_and_expire() {
  let s = store().await;
  let a = s.add_user().await.unwrap();

  let export = s
    .request_export(a.user_id, ExportFormat::Json)
    .await
    .unwrap();
  assert!(export.expires_at > export.created_at);

  let err = s
    .request_export(a.user_id, ExportFormat::Csv)
    .await
    .unwrap_err();
  assert!(is_core(&err, |e| {
    matches!(e, ember_core::Error::InvalidOperation(_))
  }));

  let later = chrono::Utc::now() + chrono::Duration::days(8);
  let report = s.run_purge_sweep(later).await.unwrap();
  assert_eq!(report.exports_expired, 1);
}
