// SPDX-License-Identifier: MIT OR Apache-2.0
use std::io;
use thiserror::Error;

/**
The aggregate outcome of a flush in which at least one sink's write failed.

Delivery is best-effort: a failing sink never prevents the remaining sinks
from receiving the flushed content, and the content is not requeued. The
error records, per failing sink, its index in registration order and the
underlying I/O error, so callers can tell a transient disk-full on one sink
apart from every sink being broken.
*/
#[derive(Debug, Error)]
#[error("flush failed for {} of {} registered sinks", .failures.len(), .sink_count)]
pub struct FlushError {
    sink_count: usize,
    failures: Vec<(usize, io::Error)>,
}

impl FlushError {
    pub(crate) fn new(sink_count: usize, failures: Vec<(usize, io::Error)>) -> Self {
        debug_assert!(!failures.is_empty());
        FlushError {
            sink_count,
            failures,
        }
    }

    /// The write failures, as `(registration index, error)` pairs. Never empty.
    pub fn failures(&self) -> &[(usize, io::Error)] {
        &self.failures
    }

    /// The number of sinks registered at the time of the flush.
    pub fn sink_count(&self) -> usize {
        self.sink_count
    }
}
