use chrono::DateTime;
use chrono::Utc;
use core::fmt::Debug;

/// Provide OS specific methods
pub trait OSManager: Debug {
    fn current_time(&self) -> DateTime<Utc>;

    /// Timestamps are stored as whole Unix seconds in an f32.
    fn timestamp(&self) -> f32 {
        return self.current_time().timestamp() as f32;
    }

    /// A pseudo random, non-negative disk signature derived from the clock.
    fn disk_signature(&self) -> i32 {
        let now = self.current_time();
        let mixed = (now.timestamp() as u64).wrapping_mul(6_364_136_223_846_793_005)
            ^ now.timestamp_subsec_nanos() as u64;

        return (mixed >> 33) as i32 & i32::MAX;
    }
}
