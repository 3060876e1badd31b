/// Project identifiers. Zero is reserved and never names a written project.
pub type ProjectId = u64;

/// Milestone identifiers, unique across the whole ledger. Zero is reserved.
pub type MilestoneId = u64;

/// Opaque caller identity. No verification beyond the numeric value.
pub type Identity = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The zero timestamp carried by default-valued records.
pub const ZERO_TIMESTAMP: Timestamp = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
