// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ordered, append-only set of sinks a writer fans out to.
//!
//! The registry carries no lock of its own; [`FanoutWriter`](crate::FanoutWriter)
//! owns it behind an instance-scoped mutex so that distinct writers never
//! contend with each other.

use crate::sink::SinkHandle;

/// Registration-ordered sink list. Entries are never removed or reordered
/// for the writer's lifetime.
#[derive(Debug, Default)]
pub(crate) struct SinkRegistry {
    sinks: Vec<SinkHandle>,
}

impl SinkRegistry {
    pub(crate) const fn new() -> Self {
        SinkRegistry { sinks: Vec::new() }
    }

    pub(crate) fn add(&mut self, handle: SinkHandle) {
        self.sinks.push(handle);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Visits sinks in registration order, so every flush writes the same
    /// content to every sink in a deterministic order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &SinkHandle> {
        self.sinks.iter()
    }
}
