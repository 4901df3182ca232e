//! Account lifecycle: deactivation windows, deletion grace periods, data
//! exports, and the purge sweep.
//!
//! Deactivation and deletion are bookkeeping on the `account_status` row;
//! computed state lives in [`AccountStatus::state`]. The sweep is the only
//! code path that hard-deletes rows, and each user's purge runs as one
//! transaction driven by the relationship registry.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ember_core::lifecycle::{
  AccountStatus, DataExport, DeletePolicy, ExportFormat, ExportStatus,
  PurgeReport, USER_RELATIONSHIPS,
};

use crate::{
  encode::{
    decode_uuid, encode_dt, encode_export_format, encode_uuid,
    RawAccountStatus, STATUS_COLUMNS,
  },
  error::{TxError, TxResult},
  store::require_user_tx,
  Error, Result, SqliteStore,
};

pub(crate) async fn account_status(
  store: &SqliteStore,
  user: Uuid,
) -> Result<AccountStatus> {
  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      ensure_status_tx(tx, user)
    })
    .await
}

pub(crate) async fn deactivate(
  store: &SqliteStore,
  user: Uuid,
  reason: Option<String>,
) -> Result<AccountStatus> {
  let window = store.policy().lifecycle.deactivation_window();

  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let status = ensure_status_tx(tx, user)?;
      if status.deletion_requested_at.is_some() {
        return Err(
          ember_core::Error::InvalidOperation(
            "deletion already requested".into(),
          )
          .into(),
        );
      }

      let now = Utc::now();
      let ends = now + window;
      tx.execute(
        "UPDATE account_status SET
           deactivated_at = ?2, deactivation_ends_at = ?3,
           reason = ?4, updated_at = ?5
         WHERE user_id = ?1",
        rusqlite::params![
          encode_uuid(user),
          encode_dt(now),
          encode_dt(ends),
          reason,
          encode_dt(now),
        ],
      )?;
      status_tx(tx, user)
    })
    .await
}

pub(crate) async fn reactivate(
  store: &SqliteStore,
  user: Uuid,
) -> Result<AccountStatus> {
  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let status = ensure_status_tx(tx, user)?;
      if status.deactivated_at.is_none() {
        return Err(
          ember_core::Error::InvalidOperation(
            "account is not deactivated".into(),
          )
          .into(),
        );
      }

      tx.execute(
        "UPDATE account_status SET
           deactivated_at = NULL, deactivation_ends_at = NULL,
           reason = NULL, updated_at = ?2
         WHERE user_id = ?1",
        rusqlite::params![encode_uuid(user), encode_dt(Utc::now())],
      )?;
      status_tx(tx, user)
    })
    .await
}

pub(crate) async fn request_deletion(
  store: &SqliteStore,
  user: Uuid,
) -> Result<AccountStatus> {
  let grace = store.policy().lifecycle.grace();

  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let status = ensure_status_tx(tx, user)?;
      if status.deletion_requested_at.is_some() {
        return Err(
          ember_core::Error::InvalidOperation(
            "deletion already requested".into(),
          )
          .into(),
        );
      }

      // The scheduled time is strictly in the future: the request itself
      // never makes the account immediately purgeable.
      let now = Utc::now();
      tx.execute(
        "UPDATE account_status SET
           deletion_requested_at = ?2, purge_scheduled_for = ?3,
           updated_at = ?2
         WHERE user_id = ?1",
        rusqlite::params![
          encode_uuid(user),
          encode_dt(now),
          encode_dt(now + grace),
        ],
      )?;
      status_tx(tx, user)
    })
    .await
}

pub(crate) async fn cancel_deletion(
  store: &SqliteStore,
  user: Uuid,
) -> Result<AccountStatus> {
  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let status = ensure_status_tx(tx, user)?;
      if status.deletion_requested_at.is_none() {
        return Err(
          ember_core::Error::InvalidOperation(
            "no deletion scheduled".into(),
          )
          .into(),
        );
      }

      tx.execute(
        "UPDATE account_status SET
           deletion_requested_at = NULL, purge_scheduled_for = NULL,
           updated_at = ?2
         WHERE user_id = ?1",
        rusqlite::params![encode_uuid(user), encode_dt(Utc::now())],
      )?;
      status_tx(tx, user)
    })
    .await
}

pub(crate) async fn request_export(
  store: &SqliteStore,
  user: Uuid,
  format: ExportFormat,
) -> Result<DataExport> {
  let lifecycle = store.policy().lifecycle;

  store
    .call_tx(move |tx| {
      require_user_tx(tx, user)?;
      let now = Utc::now();

      let recent: bool = tx.query_row(
        "SELECT EXISTS(
           SELECT 1 FROM data_exports
           WHERE user_id = ?1 AND created_at >= ?2)",
        rusqlite::params![
          encode_uuid(user),
          encode_dt(now - lifecycle.export_throttle()),
        ],
        |r| r.get(0),
      )?;
      if recent {
        return Err(
          ember_core::Error::InvalidOperation(
            "an export was already requested recently".into(),
          )
          .into(),
        );
      }

      let export = DataExport {
        export_id:  Uuid::new_v4(),
        user_id:    user,
        format,
        status:     ExportStatus::Pending,
        created_at: now,
        expires_at: now + lifecycle.export_ttl(),
      };
      tx.execute(
        "INSERT INTO data_exports
           (export_id, user_id, format, status, created_at, expires_at)
         VALUES (?1, ?2, ?3, 'pending', ?4, ?5)",
        rusqlite::params![
          encode_uuid(export.export_id),
          encode_uuid(user),
          encode_export_format(format),
          encode_dt(export.created_at),
          encode_dt(export.expires_at),
        ],
      )?;
      Ok(export)
    })
    .await
}

// ─── Purge sweep ─────────────────────────────────────────────────────────────

pub(crate) async fn run_purge_sweep(
  store: &SqliteStore,
  now: DateTime<Utc>,
) -> Result<PurgeReport> {
  let mut report = PurgeReport::default();

  let now_str = encode_dt(now);
  report.exports_expired = store
    .conn()
    .call(move |conn| {
      Ok(conn.execute(
        "UPDATE data_exports SET status = 'expired'
         WHERE status = 'pending' AND expires_at <= ?1",
        rusqlite::params![now_str],
      )?)
    })
    .await?;

  let due = due_users(store, now).await?;

  for user in due {
    match purge_user(store, user).await {
      Ok(true) => report.purged.push(user),
      Ok(false) => {}
      Err(Error::Core(ember_core::Error::PurgeBlocked {
        user_id,
        dependency,
      })) => {
        tracing::error!(
          user_id = %user_id,
          dependency,
          "purge blocked by unresolved dependency"
        );
        report.blocked.push(user_id);
      }
      Err(e) => return Err(e),
    }
  }

  tracing::info!(
    purged = report.purged.len(),
    blocked = report.blocked.len(),
    exports_expired = report.exports_expired,
    "purge sweep finished"
  );
  Ok(report)
}

async fn due_users(
  store: &SqliteStore,
  now: DateTime<Utc>,
) -> Result<Vec<Uuid>> {
  let now_str = encode_dt(now);

  let ids: Vec<String> = store
    .conn()
    .call(move |conn| {
      let mut stmt = conn.prepare(
        "SELECT user_id FROM account_status
         WHERE purge_scheduled_for IS NOT NULL AND purge_scheduled_for <= ?1",
      )?;
      let rows = stmt
        .query_map(rusqlite::params![now_str], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await?;

  ids.iter().map(|s| decode_uuid(s)).collect()
}

/// Hard-delete one user and every row the registry ties to them.
///
/// Returns `Ok(false)` when the user row is already gone.
async fn purge_user(store: &SqliteStore, user: Uuid) -> Result<bool> {
  store
    .call_tx(move |tx| {
      let id_str = encode_uuid(user);
      let exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1)",
        rusqlite::params![id_str],
        |r| r.get(0),
      )?;
      if !exists {
        return Ok(false);
      }

      // Restrict relationships veto the purge while a live row remains.
      for rel in USER_RELATIONSHIPS {
        if rel.policy != DeletePolicy::Restrict {
          continue;
        }
        let live: bool = tx.query_row(
          &format!(
            "SELECT EXISTS(
               SELECT 1 FROM {} WHERE {} = ?1 AND deleted_at IS NULL)",
            rel.table, rel.column
          ),
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        if live {
          return Err(
            ember_core::Error::PurgeBlocked {
              user_id: user,
              dependency: rel.table,
            }
            .into(),
          );
        }
      }

      // Everything left under restrict tables is already soft-deleted;
      // sweep those rows so the user row can go.
      tx.execute(
        "DELETE FROM matches WHERE user_lo = ?1 OR user_hi = ?1",
        rusqlite::params![id_str],
      )?;

      for rel in USER_RELATIONSHIPS {
        match rel.policy {
          DeletePolicy::Cascade => {
            tx.execute(
              &format!("DELETE FROM {} WHERE {} = ?1", rel.table, rel.column),
              rusqlite::params![id_str],
            )?;
          }
          DeletePolicy::Nullify => {
            tx.execute(
              &format!(
                "UPDATE {} SET {} = NULL WHERE {} = ?1",
                rel.table, rel.column, rel.column
              ),
              rusqlite::params![id_str],
            )?;
          }
          DeletePolicy::Restrict => {}
        }
      }

      tx.execute(
        "DELETE FROM users WHERE user_id = ?1",
        rusqlite::params![id_str],
      )?;
      Ok(true)
    })
    .await
}

// ─── Status row helpers ──────────────────────────────────────────────────────

fn ensure_status_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
) -> TxResult<AccountStatus> {
  if let Some(status) = raw_status_tx(tx, user)? {
    return Ok(status);
  }

  let now = Utc::now();
  tx.execute(
    "INSERT INTO account_status (user_id, updated_at) VALUES (?1, ?2)",
    rusqlite::params![encode_uuid(user), encode_dt(now)],
  )?;
  Ok(AccountStatus {
    user_id: user,
    deactivated_at: None,
    deactivation_ends_at: None,
    deletion_requested_at: None,
    purge_scheduled_for: None,
    reason: None,
    updated_at: now,
  })
}

fn status_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
) -> TxResult<AccountStatus> {
  raw_status_tx(tx, user)?
    .ok_or_else(|| ember_core::Error::UserNotFound(user).into())
}

fn raw_status_tx(
  tx: &rusqlite::Transaction<'_>,
  user: Uuid,
) -> TxResult<Option<AccountStatus>> {
  let raw: Option<RawAccountStatus> = tx
    .query_row(
      &format!(
        "SELECT {STATUS_COLUMNS} FROM account_status WHERE user_id = ?1"
      ),
      rusqlite::params![encode_uuid(user)],
      |r| RawAccountStatus::from_row(r),
    )
    .optional()?;
  raw.map(|r| r.into_status().map_err(TxError::from)).transpose()
}
