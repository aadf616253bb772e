// SPDX-License-Identifier: MIT OR Apache-2.0
use std::time::Duration;

/// How long an empty buffer may go unflushed before an idle sweep evicts it.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(120);

/// How many flushes elapse between idle sweeps.
pub const DEFAULT_CLEANUP_TRIGGER_COUNT: u32 = 100;

/**
Tuning knobs for buffer reclamation.

Sweeps are piggybacked on the flush path: every `cleanup_trigger_count`
flushes, the writer walks its buffer table and evicts entries that are empty
and have not been flushed for longer than `idle_threshold`. A
`cleanup_trigger_count` of zero disables sweeping entirely, in which case the
table grows with the number of distinct producer threads.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    pub idle_threshold: Duration,
    pub cleanup_trigger_count: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            cleanup_trigger_count: DEFAULT_CLEANUP_TRIGGER_COUNT,
        }
    }
}

/*
Boilerplate notes.

Copy is fine: two Copy-able fields, and the writer stores its own copy.
PartialEq/Eq derived so tests can compare configs.
Ord makes no sense.
Hash omitted; configs are not keys.
*/
