//! Error type for `ember-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ember_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored discriminant column held a value this build does not know.
  #[error("column decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for ember_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::Json(e) => ember_core::Error::Serialization(e),
      other => ember_core::Error::Storage(other.to_string()),
    }
  }
}

/// Error used inside blocking transaction helpers. At the `conn.call`
/// boundary a `Domain` failure rolls the transaction back and surfaces as
/// [`ember_core::Error`], while a `Sql` failure surfaces as a database error.
#[derive(Debug)]
pub(crate) enum TxError {
  Domain(ember_core::Error),
  Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for TxError {
  fn from(err: rusqlite::Error) -> Self { TxError::Sql(err) }
}

impl From<ember_core::Error> for TxError {
  fn from(err: ember_core::Error) -> Self { TxError::Domain(err) }
}

impl From<Error> for TxError {
  fn from(err: Error) -> Self { TxError::Domain(err.into()) }
}

impl From<serde_json::Error> for TxError {
  fn from(err: serde_json::Error) -> Self {
    TxError::Domain(ember_core::Error::Serialization(err))
  }
}

pub(crate) type TxResult<T> = std::result::Result<T, TxError>;
