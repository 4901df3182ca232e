//! JSON REST API for Ember.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ember_core::store::PlatformStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ember_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod lifecycle;
pub mod matches;
pub mod moderation;
pub mod swipes;
pub mod users;

use std::sync::Arc;

use axum::{
  routing::{get, post, put},
  Router,
};
use ember_core::store::PlatformStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PlatformStore + Clone + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>).delete(users::soft_delete::<S>),
    )
    .route("/users/{id}/verify", post(users::verify::<S>))
    .route("/users/{id}/admin", post(users::admin::<S>))
    // Quota ledger
    .route("/users/{id}/quota", get(users::quota::<S>))
    .route("/users/{id}/plan", put(users::set_plan::<S>))
    .route("/users/{id}/boost", post(users::boost::<S>))
    // Action log & rewind
    .route("/users/{id}/swipes", post(swipes::record::<S>))
    .route("/users/{id}/swipes/{target}", get(swipes::history::<S>))
    .route("/users/{id}/rewindable", get(swipes::rewindable::<S>))
    .route("/users/{id}/rewind", post(swipes::rewind_latest::<S>))
    .route(
      "/users/{id}/rewind/{action_id}",
      post(swipes::rewind_one::<S>),
    )
    // Matches
    .route("/users/{id}/matches", get(matches::list_for_user::<S>))
    .route("/matches/{id}", get(matches::get_one::<S>))
    .route("/matches/{id}/reveal", post(matches::reveal::<S>))
    .route("/matches/{id}/unmatch", post(matches::unmatch::<S>))
    .route("/matches/{id}/messages", post(matches::send_message::<S>))
    .route("/blocks", post(matches::block::<S>))
    // Trust & moderation
    .route("/reports", post(moderation::file_report::<S>))
    .route("/reports/{id}/resolve", post(moderation::resolve_report::<S>))
    .route("/fraud-flags", post(moderation::raise_flag::<S>))
    .route(
      "/fraud-flags/{id}/resolve",
      post(moderation::resolve_flag::<S>),
    )
    .route("/users/{id}/fraud-scan", post(moderation::fraud_scan::<S>))
    .route(
      "/users/{id}/trust",
      get(moderation::trust::<S>).post(moderation::recompute::<S>),
    )
    // Lifecycle
    .route("/users/{id}/account", get(lifecycle::account::<S>))
    .route("/users/{id}/deactivate", post(lifecycle::deactivate::<S>))
    .route("/users/{id}/reactivate", post(lifecycle::reactivate::<S>))
    .route(
      "/users/{id}/deletion",
      post(lifecycle::request_deletion::<S>)
        .delete(lifecycle::cancel_deletion::<S>),
    )
    .route("/users/{id}/exports", post(lifecycle::request_export::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
