//! HTTP byte ranges with inclusive ends, plus resume-offset math.

use crate::error::ClientError;

/// A byte range `[start, end]` (inclusive end, as in the HTTP Range header).
/// `end == None` means "from start to the end of the object".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpRange {
    start: u64,
    end: Option<u64>,
}

impl HttpRange {
    /// Closed range `[start, end]`. Rejects `end < start`.
    pub fn of(start: u64, end: u64) -> Result<Self, ClientError> {
        if end < start {
            return Err(ClientError::Validation(format!(
                "invalid range: end {end} is before start {start}"
            )));
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Open-ended range `[start, ...]`.
    pub fn from_offset(start: u64) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> Option<u64> {
        self.end
    }

    /// Number of bytes covered, when the range is closed.
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end - self.start + 1)
    }

    /// Range for resuming after `delivered` bytes were already consumed:
    /// same end, start shifted forward.
    pub fn shifted_by(&self, delivered: u64) -> Self {
        Self {
            start: self.start + delivered,
            end: self.end,
        }
    }

    /// Value for the `Range` request header.
    pub fn header_value(&self) -> String {
        match self.end {
            Some(end) => format!("bytes={}-{}", self.start, end),
            None => format!("bytes={}-", self.start),
        }
    }
}
