/// All entity ids are 64-bit integers.
pub type DbId = i64;

/// A job is identified by the id of the tool it runs for; there is no
/// independent job identity.
pub type JobId = DbId;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
