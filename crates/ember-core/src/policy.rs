//! Tunable policy knobs, separated from the structural invariants.
//!
//! Quota grants, trust weights, and retention windows are configuration,
//! not schema. The store receives one [`PlatformPolicy`] at open time.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::quota::{Plan, QuotaKind};

// ─── Quota policy ────────────────────────────────────────────────────────────

/// Daily credit grant for one plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaGrant {
  pub super_likes: u32,
  pub boosts:      u32,
  pub rewinds:     u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaPolicy {
  pub free:    QuotaGrant,
  pub premium: QuotaGrant,
  pub vip:     QuotaGrant,
  /// Length of one boost window, in hours.
  pub boost_window_hours: i64,
}

impl Default for QuotaPolicy {
  fn default() -> Self {
    Self {
      free:    QuotaGrant { super_likes: 1, boosts: 0, rewinds: 0 },
      premium: QuotaGrant { super_likes: 5, boosts: 1, rewinds: 5 },
      vip:     QuotaGrant { super_likes: 10, boosts: 3, rewinds: 10 },
      boost_window_hours: 24,
    }
  }
}

impl QuotaPolicy {
  pub fn grant(&self, plan: Plan) -> QuotaGrant {
    match plan {
      Plan::Free => self.free,
      Plan::Premium => self.premium,
      Plan::Vip => self.vip,
    }
  }

  /// Whether `plan` consumes no credits for `kind` at all.
  pub fn unlimited(&self, plan: Plan, kind: QuotaKind) -> bool {
    matches!(
      (plan, kind),
      (Plan::Vip, QuotaKind::SuperLike) | (Plan::Vip, QuotaKind::Rewind)
    )
  }

  pub fn boost_window(&self) -> Duration {
    Duration::hours(self.boost_window_hours)
  }
}

// ─── Trust weights ───────────────────────────────────────────────────────────

/// Weights for the five trust sub-scores. Any fixed weighting is
/// acceptable as long as the combination of bounded sub-scores stays
/// bounded; the defaults sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrustWeights {
  pub verification: f64,
  pub longevity:    f64,
  pub behavior:     f64,
  pub fraud:        f64,
  pub activity:     f64,
}

impl Default for TrustWeights {
  fn default() -> Self {
    Self {
      verification: 0.25,
      longevity:    0.15,
      behavior:     0.25,
      fraud:        0.25,
      activity:     0.10,
    }
  }
}

impl TrustWeights {
  pub fn combine(
    &self,
    verification: f64,
    longevity: f64,
    behavior: f64,
    fraud: f64,
    activity: f64,
  ) -> f64 {
    let total = self.verification
      + self.longevity
      + self.behavior
      + self.fraud
      + self.activity;
    if total <= 0.0 {
      return 0.0;
    }
    (self.verification * verification
      + self.longevity * longevity
      + self.behavior * behavior
      + self.fraud * fraud
      + self.activity * activity)
      / total
  }
}

// ─── Lifecycle policy ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LifecyclePolicy {
  /// Days between a deletion request and the scheduled purge.
  pub deletion_grace_days: i64,
  /// Length of a deactivation window, in days.
  pub deactivation_window_days: i64,
  /// Days before a data-export download link expires.
  pub export_ttl_days: i64,
  /// Hours a user must wait before requesting another export.
  pub export_throttle_hours: i64,
}

impl Default for LifecyclePolicy {
  fn default() -> Self {
    Self {
      deletion_grace_days: 30,
      deactivation_window_days: 30,
      export_ttl_days: 7,
      export_throttle_hours: 24,
    }
  }
}

impl LifecyclePolicy {
  pub fn grace(&self) -> Duration { Duration::days(self.deletion_grace_days) }

  pub fn deactivation_window(&self) -> Duration {
    Duration::days(self.deactivation_window_days)
  }

  pub fn export_ttl(&self) -> Duration { Duration::days(self.export_ttl_days) }

  pub fn export_throttle(&self) -> Duration {
    Duration::hours(self.export_throttle_hours)
  }
}

// ─── Bundle ──────────────────────────────────────────────────────────────────

/// Everything the store needs to apply policy uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPolicy {
  #[serde(default)]
  pub quota: QuotaPolicy,
  #[serde(default)]
  pub trust_weights: TrustWeights,
  /// Overall trust score below which the moderation-review signal fires.
  #[serde(default = "default_review_threshold")]
  pub review_threshold: f64,
  /// Resolved (non-dismissed) reports against a user that trigger
  /// suspension on the next resolution.
  #[serde(default = "default_suspension_reports")]
  pub suspension_report_count: u32,
  #[serde(default)]
  pub lifecycle: LifecyclePolicy,
}

fn default_review_threshold() -> f64 { 0.35 }

fn default_suspension_reports() -> u32 { 3 }

impl Default for PlatformPolicy {
  fn default() -> Self {
    Self {
      quota: QuotaPolicy::default(),
      trust_weights: TrustWeights::default(),
      review_threshold: default_review_threshold(),
      suspension_report_count: default_suspension_reports(),
      lifecycle: LifecyclePolicy::default(),
    }
  }
}
