//! Sequence state for timestamp + sequence
//!
//! The pair is only ever touched while the generator's lock is held, so it is
//! a plain value rather than an atomic. Deciding the next slot and committing
//! it are separate steps, so a caller can reject a slot without side effects.

/// Outcome of planning the next (timestamp, sequence) slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The slot is free and may be committed
    Ready { timestamp: u64, sequence: u16 },
    /// No slot is available; the caller must wait and retry
    Wait(Wait),
}

/// Why a caller has to wait before retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wait {
    /// The clock reads earlier than the last minted timestamp
    ClockBehind { ms: u64 },
    /// All sequence values of the current millisecond are used
    SequenceExhausted,
}

impl Wait {
    /// Milliseconds to wait before the next attempt can succeed
    #[inline]
    pub(crate) const fn millis(&self) -> u64 {
        match self {
            Wait::ClockBehind { ms } => *ms,
            Wait::SequenceExhausted => 1,
        }
    }
}

/// Last minted Unix timestamp and the sequence used within it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SequenceState {
    last_timestamp: Option<u64>,
    sequence: u16,
}

impl SequenceState {
    pub(crate) const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    #[cfg(test)]
    pub(crate) const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    #[cfg(test)]
    pub(crate) const fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Plan the next slot at `now` without changing the state
    ///
    /// A new millisecond starts at sequence 0. Within the same millisecond the
    /// sequence moves up by `step`; once that would pass `max_sequence` the
    /// millisecond is exhausted, so no value is ever handed out twice.
    #[inline]
    pub(crate) fn next(&self, now: u64, max_sequence: u16, step: u16) -> Advance {
        match self.last_timestamp {
            Some(last) if now < last => Advance::Wait(Wait::ClockBehind { ms: last - now }),
            Some(last) if now == last => {
                match self.sequence.checked_add(step) {
                    Some(sequence) if sequence <= max_sequence => Advance::Ready {
                        timestamp: now,
                        sequence,
                    },
                    _ => Advance::Wait(Wait::SequenceExhausted),
                }
            }
            _ => Advance::Ready {
                timestamp: now,
                sequence: 0,
            },
        }
    }

    /// Record a slot returned by [`next`](Self::next) as used
    #[inline]
    pub(crate) fn commit(&mut self, timestamp: u64, sequence: u16) {
        self.last_timestamp = Some(timestamp);
        self.sequence = sequence;
    }
}
