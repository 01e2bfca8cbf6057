//! Wait strategy for sequence exhaustion
//!
//! Spins briefly for the next millisecond before the caller falls back to
//! sleeping on the clock.

use std::thread;

use crate::config::GeneratorConfig;

/// Sleep used when the sequence of a millisecond is exhausted
pub(crate) const EXHAUSTED_SLEEP_MS: u64 = 1;

/// Perform spin-wait loop, checking for timestamp advancement
///
/// Returns Some(new_ts) if timestamp advanced, None if spin loops exhausted
#[inline]
pub(crate) fn spin_wait<F>(
    from_timestamp: u64,
    config: &GeneratorConfig,
    get_time: F,
) -> Option<u64>
where
    F: Fn() -> u64,
{
    if !config.spin_enabled() || config.spin_loops() == 0 {
        return None;
    }

    let yield_every = config.spin_yield_every();

    for i in 0..config.spin_loops() {
        let new_ts = get_time();
        if new_ts > from_timestamp {
            return Some(new_ts);
        }

        std::hint::spin_loop();

        if yield_every != 0 && i % yield_every == yield_every - 1 {
            thread::yield_now();
        }
    }

    None
}
