// Time types used in the project.
//
// SystemTime::now() is non-deterministic: it only ever feeds the block
// timestamp field, which is explicitly excluded from determinism
// guarantees. Everything hashed for identity takes its timestamp as a
// parameter instead of reading the clock.

use std::time::{SystemTime, UNIX_EPOCH};

// Seconds timestamps used to determine it using its type
pub type TimestampSeconds = u64;

// Return timestamp in seconds
pub fn get_current_time_in_seconds() -> TimestampSeconds {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Incorrect time returned from SystemTime")
        .as_secs()
}
