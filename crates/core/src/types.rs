/// All database primary keys are MySQL `BIGINT` auto-increment columns.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
