//! SQLite backend for the Ember persistence layer.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-step contracts (swipe, rewind,
//! purge) execute as single SQLite transactions, with per-user and per-pair
//! async locks narrowing the critical sections above them.

mod encode;
mod keyed;
mod lifecycle;
mod rewind;
mod schema;
mod store;
mod swipe;
mod trust;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
