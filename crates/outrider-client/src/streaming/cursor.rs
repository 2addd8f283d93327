//! Delivered-byte tracking for resumable transfers.

use crate::request::HttpRange;

/// Tracks how much of a transfer the consumer has already received, and
/// derives the range to request on the next attempt. Bytes count as
/// delivered only once they have been handed to the consumer, so a retry
/// never re-sends data the consumer already saw.
pub(crate) struct StreamCursor {
    original: Option<HttpRange>,
    bytes_delivered: u64,
}

impl StreamCursor {
    pub(crate) fn new(original: Option<HttpRange>) -> Self {
        Self {
            original,
            bytes_delivered: 0,
        }
    }

    /// Range for the next attempt. Untouched transfers repeat the caller's
    /// request exactly, including the no-range case; once bytes flowed, the
    /// start moves past them.
    pub(crate) fn next_range(&self) -> Option<HttpRange> {
        if self.bytes_delivered == 0 {
            return self.original;
        }
        Some(match self.original {
            Some(range) => range.shifted_by(self.bytes_delivered),
            None => HttpRange::from_offset(self.bytes_delivered),
        })
    }

    pub(crate) fn advance(&mut self, delivered: u64) {
        self.bytes_delivered += delivered;
    }

    pub(crate) fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered
    }

    /// Bytes still owed when the caller asked for a closed range. `None`
    /// when the transfer length is unknown, in which case a clean end of
    /// stream is trusted.
    pub(crate) fn remaining(&self) -> Option<u64> {
        self.original
            .and_then(|range| range.len())
            .map(|len| len.saturating_sub(self.bytes_delivered))
    }
}
