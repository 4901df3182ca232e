//! Trust & fraud types, and the pure composite-score computation.
//!
//! The score is a weighted combination of five sub-scores, each bounded to
//! [0, 1]: verification, account longevity, report behavior, fraud flags,
//! and recent activity. The weighting is policy
//! ([`crate::policy::TrustWeights`]); the structural guarantees are that
//! the overall score is monotonically non-increasing in report and flag
//! count and non-decreasing in verification strength, and that recomputing
//! with unchanged inputs yields an identical score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::TrustWeights;

// ─── Fraud flags ─────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

/// The behavioral signal that raised a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudSignal {
  RapidActions,
  MassMessages,
  DuplicatePhotos,
  FakeLocation,
  BotBehavior,
  SuspiciousPattern,
}

/// A suspected-fraud record. Unresolved flags depress the fraud sub-score
/// and may push the account below the review threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudFlag {
  pub flag_id:    Uuid,
  pub user_id:    Uuid,
  pub signal:     FraudSignal,
  pub severity:   Severity,
  /// Detector context, stored as JSON.
  pub details:    serde_json::Value,
  pub resolved:   bool,
  pub created_at: DateTime<Utc>,
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
  InappropriateProfile,
  HarassingMessages,
  BotAccount,
  Catfish,
  ExplicitContent,
  Scam,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
  Pending,
  Resolved,
  Dismissed,
}

/// An abuse report filed by one user against another. The reporter
/// reference is nulled (not cascaded) on purge so the moderation record
/// survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:   Uuid,
  pub reporter_id: Option<Uuid>,
  pub reported_id: Uuid,
  pub reason:      ReportReason,
  pub details:     Option<String>,
  pub status:      ReportStatus,
  pub created_at:  DateTime<Utc>,
  pub deleted_at:  Option<DateTime<Utc>>,
}

// ─── Score inputs ────────────────────────────────────────────────────────────

/// Everything the aggregator reads before recomputing. A missing signal is
/// carried as `None` and contributes its neutral baseline instead of
/// failing the whole aggregation.
#[derive(Debug, Clone, Default)]
pub struct TrustInputs {
  pub verified:           Option<bool>,
  pub account_age_days:   Option<i64>,
  /// Non-dismissed reports against the user.
  pub report_count:       u32,
  /// Severities of unresolved fraud flags.
  pub unresolved_flags:   Vec<Severity>,
  pub actions_last_hour:  Option<u32>,
  pub messages_last_hour: Option<u32>,
}

const NEUTRAL: f64 = 0.5;

// ─── TrustScore ──────────────────────────────────────────────────────────────

/// The stored composite. Recomputed whenever a contributing signal
/// changes; never on account deactivation alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustScore {
  pub user_id:      Uuid,
  pub verification: f64,
  pub longevity:    f64,
  pub behavior:     f64,
  pub fraud:        f64,
  pub activity:     f64,
  pub overall:      f64,
  pub report_count: u32,
  pub computed_at:  DateTime<Utc>,
}

impl TrustScore {
  /// Pure, deterministic computation. Idempotent by construction: the
  /// same inputs and weights always produce the same sub-scores.
  pub fn compute(
    user_id: Uuid,
    inputs: &TrustInputs,
    weights: &TrustWeights,
    now: DateTime<Utc>,
  ) -> Self {
    let verification = match inputs.verified {
      Some(true) => 1.0,
      Some(false) => 0.3,
      None => NEUTRAL,
    };

    // Full marks after 30 days of account age.
    let longevity = match inputs.account_age_days {
      Some(days) => (days.max(0) as f64 / 30.0).min(1.0),
      None => NEUTRAL,
    };

    // Each non-dismissed report costs a fifth of the sub-score.
    let behavior = (1.0 - 0.2 * f64::from(inputs.report_count)).max(0.0);

    let fraud_penalty: f64 = inputs
      .unresolved_flags
      .iter()
      .map(|s| match s {
        Severity::Low => 0.10,
        Severity::Medium => 0.25,
        Severity::High => 0.50,
      })
      .sum();
    let fraud = (1.0 - fraud_penalty).max(0.0);

    let activity = match (inputs.actions_last_hour, inputs.messages_last_hour)
    {
      (None, None) => NEUTRAL,
      (actions, messages) => {
        let a = rate_score(actions.unwrap_or(0), 120);
        let m = rate_score(messages.unwrap_or(0), 20);
        a.min(m)
      }
    };

    let overall = weights
      .combine(verification, longevity, behavior, fraud, activity)
      .clamp(0.0, 1.0);

    Self {
      user_id,
      verification,
      longevity,
      behavior,
      fraud,
      activity,
      overall,
      report_count: inputs.report_count,
      computed_at: now,
    }
  }
}

/// 1.0 at or below `threshold` events per hour, decaying towards zero as
/// the rate overshoots. Monotonically non-increasing in `count`.
fn rate_score(count: u32, threshold: u32) -> f64 {
  if count <= threshold {
    1.0
  } else {
    f64::from(threshold) / f64::from(count)
  }
}

/// Result of a recompute, including the moderation-review signal. The
/// signal is externally visible only; it never mutates account status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustOutcome {
  pub score:  TrustScore,
  /// True when `overall` fell below the configured review threshold.
  pub review: bool,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::policy::TrustWeights;

  fn compute(inputs: &TrustInputs) -> TrustScore {
    TrustScore::compute(
      Uuid::from_u128(1),
      inputs,
      &TrustWeights::default(),
      Utc::now(),
    )
  }

  #[test]
  fn all_sub_scores_bounded() {
    let score = compute(&TrustInputs {
      verified:           Some(false),
      account_age_days:   Some(10_000),
      report_count:       50,
      unresolved_flags:   vec![Severity::High; 10],
      actions_last_hour:  Some(10_000),
      messages_last_hour: Some(10_000),
    });
    for s in [
      score.verification,
      score.longevity,
      score.behavior,
      score.fraud,
      score.activity,
      score.overall,
    ] {
      assert!((0.0..=1.0).contains(&s), "out of bounds: {s}");
    }
  }

  #[test]
  fn more_reports_never_raise_the_score() {
    let mut previous = f64::INFINITY;
    for reports in 0..8 {
      let score = compute(&TrustInputs {
        report_count: reports,
        ..Default::default()
      });
      assert!(score.overall <= previous);
      previous = score.overall;
    }
  }

  #[test]
  fn verification_never_lowers_the_score() {
    let unverified = compute(&TrustInputs {
      verified: Some(false),
      ..Default::default()
    });
    let verified = compute(&TrustInputs {
      verified: Some(true),
      ..Default::default()
    });
    assert!(verified.overall >= unverified.overall);
  }

  #[test]
  fn missing_signals_default_to_neutral() {
    let score = compute(&TrustInputs::default());
    assert_eq!(score.verification, 0.5);
    assert_eq!(score.longevity, 0.5);
    assert_eq!(score.activity, 0.5);
  }

  #[test]
  fn recompute_with_same_inputs_is_identical() {
    let inputs = TrustInputs {
      verified:           Some(true),
      account_age_days:   Some(12),
      report_count:       2,
      unresolved_flags:   vec![Severity::Medium],
      actions_last_hour:  Some(40),
      messages_last_hour: Some(3),
    };
    let a = compute(&inputs);
    let b = compute(&inputs);
    assert_eq!(a.overall, b.overall);
    assert_eq!(a.fraud, b.fraud);
  }

  #[test]
  fn high_severity_flags_cost_more() {
    let low = compute(&TrustInputs {
      unresolved_flags: vec![Severity::Low],
      ..Default::default()
    });
    let high = compute(&TrustInputs {
      unresolved_flags: vec![Severity::High],
      ..Default::default()
    });
    assert!(high.fraud < low.fraud);
    assert!(high.overall < low.overall);
  }
}
