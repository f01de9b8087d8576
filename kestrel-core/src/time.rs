//! Millisecond timestamps
//!
//! The firmware feeds a free-running `u32` millisecond counter that wraps
//! after roughly 49 days. All comparisons go through these helpers.

/// Milliseconds since boot (wrapping)
pub type Millis = u32;

/// Milliseconds elapsed between `since` and `now`
pub fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

/// Whether `deadline` has been reached at `now`
///
/// A deadline more than half the counter range behind `now` is treated
/// as lying in the future.
pub fn reached(now: Millis, deadline: Millis) -> bool {
    now.wrapping_sub(deadline) < (1 << 31)
}
