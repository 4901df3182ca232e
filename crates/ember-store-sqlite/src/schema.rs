//! SQL schema for the Ember SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    verified    INTEGER NOT NULL DEFAULT 0,
    admin       INTEGER NOT NULL DEFAULT 0,
    deleted_at  TEXT
);

-- The action log is append-only: rows are never updated after insert except
-- for the soft-delete marker, and never hard-deleted outside the purge sweep.
CREATE TABLE IF NOT EXISTS actions (
    action_id   TEXT PRIMARY KEY,
    actor_id    TEXT NOT NULL REFERENCES users(user_id),
    target_id   TEXT REFERENCES users(user_id),
    kind        TEXT NOT NULL,   -- 'like' | 'pass' | 'undo'
    status      TEXT NOT NULL,   -- 'pending' | 'completed' | 'failed'
    match_id    TEXT REFERENCES matches(match_id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL,
    deleted_at  TEXT
);

-- Pair columns are canonically ordered so (lo, hi) names a pair exactly once.
-- The partial unique index allows a new match for a pair whose earlier match
-- was retracted.
CREATE TABLE IF NOT EXISTS matches (
    match_id            TEXT PRIMARY KEY,
    user_lo             TEXT NOT NULL REFERENCES users(user_id),
    user_hi             TEXT NOT NULL REFERENCES users(user_id),
    compatibility_score REAL NOT NULL DEFAULT 0,
    reveal_lo           INTEGER NOT NULL DEFAULT 0,
    reveal_hi           INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT NOT NULL,
    deleted_at          TEXT,
    CHECK (user_lo < user_hi)
);
CREATE UNIQUE INDEX IF NOT EXISTS matches_live_pair_idx
    ON matches(user_lo, user_hi) WHERE deleted_at IS NULL;

-- One rewind event per action, ever.
CREATE TABLE IF NOT EXISTS rewinds (
    rewind_id   TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    action_id   TEXT NOT NULL REFERENCES actions(action_id),
    recorded_at TEXT NOT NULL,
    UNIQUE (action_id)
);

CREATE TABLE IF NOT EXISTS quotas (
    user_id          TEXT PRIMARY KEY REFERENCES users(user_id),
    plan             TEXT NOT NULL DEFAULT 'free',
    super_likes      INTEGER NOT NULL DEFAULT 0 CHECK (super_likes >= 0),
    boosts           INTEGER NOT NULL DEFAULT 0 CHECK (boosts >= 0),
    rewinds          INTEGER NOT NULL DEFAULT 0 CHECK (rewinds >= 0),
    boost_expires_at TEXT,
    replenished_at   TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS blocks (
    block_id    TEXT PRIMARY KEY,
    blocker_id  TEXT NOT NULL REFERENCES users(user_id),
    blocked_id  TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    deleted_at  TEXT,
    UNIQUE (blocker_id, blocked_id)
);

CREATE TABLE IF NOT EXISTS messages (
    message_id  TEXT PRIMARY KEY,
    match_id    TEXT REFERENCES matches(match_id) ON DELETE SET NULL,
    sender_id   TEXT REFERENCES users(user_id),
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    deleted_at  TEXT
);

CREATE TABLE IF NOT EXISTS reports (
    report_id   TEXT PRIMARY KEY,
    reporter_id TEXT REFERENCES users(user_id),
    reported_id TEXT NOT NULL REFERENCES users(user_id),
    reason      TEXT NOT NULL,
    details     TEXT,
    status      TEXT NOT NULL DEFAULT 'pending',
    created_at  TEXT NOT NULL,
    deleted_at  TEXT
);

CREATE TABLE IF NOT EXISTS fraud_flags (
    flag_id     TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    signal      TEXT NOT NULL,
    severity    TEXT NOT NULL,   -- 'low' | 'medium' | 'high'
    details     TEXT NOT NULL DEFAULT '{}',
    resolved    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- Latest computed score per user; history is not kept.
CREATE TABLE IF NOT EXISTS trust_scores (
    user_id      TEXT PRIMARY KEY REFERENCES users(user_id),
    verification REAL NOT NULL,
    longevity    REAL NOT NULL,
    behavior     REAL NOT NULL,
    fraud        REAL NOT NULL,
    activity     REAL NOT NULL,
    overall      REAL NOT NULL,
    report_count INTEGER NOT NULL,
    computed_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS account_status (
    user_id              TEXT PRIMARY KEY REFERENCES users(user_id),
    deactivated_at       TEXT,
    deactivation_ends_at TEXT,
    deletion_requested_at TEXT,
    purge_scheduled_for  TEXT,
    reason               TEXT,
    updated_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS data_exports (
    export_id   TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    format      TEXT NOT NULL,   -- 'json' | 'csv'
    status      TEXT NOT NULL DEFAULT 'pending',
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS actions_actor_idx      ON actions(actor_id, created_at);
CREATE INDEX IF NOT EXISTS actions_pair_idx       ON actions(actor_id, target_id);
CREATE INDEX IF NOT EXISTS matches_lo_idx         ON matches(user_lo);
CREATE INDEX IF NOT EXISTS matches_hi_idx         ON matches(user_hi);
CREATE INDEX IF NOT EXISTS messages_sender_idx    ON messages(sender_id, created_at);
CREATE INDEX IF NOT EXISTS reports_reported_idx   ON reports(reported_id);
CREATE INDEX IF NOT EXISTS fraud_flags_user_idx   ON fraud_flags(user_id);

PRAGMA user_version = 1;
";
