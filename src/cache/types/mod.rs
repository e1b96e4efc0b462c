/// Defines the type for a moment in time expressed as seconds since the unix epoch
pub type UnixSeconds = u64;

/// Defines the type for the total number of worker threads in the rebuild pool
pub type TotalRebuildWorkers = usize;

/// Defines the type for the number of attempts made to acquire a lock
pub type LockAttempts = u32;

/// Defines the type for the identifiers produced by the id generator,
/// a timestamp component packed with a daily sequence
pub type SequencedId = i64;

/// Defines the type for the per-prefix, per-day sequence counter maintained by the backing store
pub type SequenceCount = i64;
