//! SQL schema for the rideshare SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every reference carries a foreign key, and memberships are keyed on the
/// `(ride_id, passenger_id)` pair, so two concurrent joins of the same user
/// cannot both commit.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,     -- argon2 PHC string
    role        TEXT NOT NULL DEFAULT 'user',
    settings    TEXT NOT NULL DEFAULT '{}',
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS car_categories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    passenger_count INTEGER NOT NULL CHECK (passenger_count > 0)
);

CREATE TABLE IF NOT EXISTS car_makes (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS car_models (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL REFERENCES car_categories(id),
    make_id     INTEGER NOT NULL REFERENCES car_makes(id),
    name        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cars (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    license_plate TEXT NOT NULL,
    year          INTEGER NOT NULL,
    model_id      INTEGER NOT NULL REFERENCES car_models(id),
    UNIQUE (user_id, license_plate)
);

CREATE TABLE IF NOT EXISTS rides (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    vehicle_id    INTEGER NOT NULL REFERENCES cars(id) ON DELETE CASCADE,
    start_date    TEXT NOT NULL,   -- 'YYYY-MM-DD HH:MM:SS', UTC
    start_city    TEXT NOT NULL,
    start_address TEXT NOT NULL,
    end_city      TEXT NOT NULL,
    end_address   TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ride_passengers (
    ride_id      INTEGER NOT NULL REFERENCES rides(id) ON DELETE CASCADE,
    passenger_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    PRIMARY KEY (ride_id, passenger_id)
);

CREATE TABLE IF NOT EXISTS user_feedback (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    ride_id     INTEGER NOT NULL REFERENCES rides(id) ON DELETE CASCADE,
    score       INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rides_owner     ON rides(owner_user_id);
CREATE INDEX IF NOT EXISTS idx_cars_user       ON cars(user_id);
CREATE INDEX IF NOT EXISTS idx_feedback_ride   ON user_feedback(ride_id);
CREATE INDEX IF NOT EXISTS idx_feedback_author ON user_feedback(user_id);
";
