/// Primary key of every table (`BIGSERIAL`).
pub type DbId = i64;

/// `TIMESTAMPTZ` columns, always read as UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
