// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread accumulation buffers and the table that owns them.
//!
//! Each producer thread gets its own [`ThreadBuffer`], created lazily on the
//! thread's first append or flush. The buffer holds the thread's unflushed
//! text plus the time of its last flush, both behind a single per-buffer
//! mutex. [`BufferTable`] maps thread identity to buffer and is the only
//! place buffers are created or evicted.
//!
//! # Locking discipline
//!
//! [`BufferTable::get_or_create`] acquires the per-buffer lock *while still
//! holding the table lock* and hands the caller an owning guard. Because the
//! idle sweep also needs the table lock, no buffer can be evicted between a
//! thread looking its buffer up and locking it. An appended character is
//! therefore never lost to a concurrent eviction: a sweep either observes
//! the buffer locked (and skips it) or runs strictly before or after the
//! whole lookup-and-append.
//!
//! The sweep itself only ever `try_lock`s a buffer. A buffer whose lock is
//! held is presumed in active use by its owning thread, and the sweep must
//! never block on a live writer.

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::{Duration, Instant};

/// One thread's unflushed text and the time its buffer was last flushed.
///
/// Both fields are covered by the same per-buffer mutex: appends mutate
/// `content`, a flush empties `content` and refreshes `last_flush`, and the
/// idle sweep reads both to decide eviction.
#[derive(Debug)]
pub(crate) struct ThreadBuffer {
    pub(crate) content: String,
    pub(crate) last_flush: Instant,
}

impl ThreadBuffer {
    fn new() -> Self {
        ThreadBuffer {
            content: String::new(),
            last_flush: Instant::now(),
        }
    }
}

/// Owning guard over a thread's buffer; keeps the buffer alive even if the
/// entry is evicted from the table while the guard is held.
pub(crate) type BufferGuard = ArcMutexGuard<RawMutex, ThreadBuffer>;

/// Maps thread identity to its accumulation buffer.
#[derive(Debug, Default)]
pub(crate) struct BufferTable {
    map: Mutex<HashMap<ThreadId, Arc<Mutex<ThreadBuffer>>>>,
}

impl BufferTable {
    pub(crate) fn new() -> Self {
        BufferTable {
            map: Mutex::new(HashMap::new()),
        }
    }

    /**
    Returns the buffer for `id` with its lock already held, creating the
    buffer on first touch.

    Creation happens under the table lock, so two racing first-uses by the
    same thread identity can never produce two buffers. The per-buffer lock
    is acquired before the table lock is released; see the module docs for
    why that ordering matters.

    Blocking on the buffer lock here cannot deadlock: only the owning thread
    and the sweep touch a buffer's lock, the sweep never blocks on it and
    never runs while we hold the table lock, and a single thread cannot
    re-enter its own append or flush.
    */
    pub(crate) fn get_or_create(&self, id: ThreadId) -> BufferGuard {
        let mut map = self.map.lock();
        let buffer = map
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(ThreadBuffer::new())))
            .clone();
        buffer.lock_arc()
    }

    /**
    Evicts buffers that are both empty and idle.

    For each entry the sweep tries the per-buffer lock without blocking; a
    buffer it cannot lock immediately is in use and is kept. A locked buffer
    is evicted only when it has no pending content and has not been flushed
    for longer than `idle_threshold`. This bounds memory growth from
    short-lived threads at the cost of occasionally evicting and later
    recreating a buffer for a thread that resumes after a long pause.
    */
    pub(crate) fn sweep(&self, idle_threshold: Duration) {
        let now = Instant::now();
        let mut map = self.map.lock();
        map.retain(|_, buffer| {
            let Some(state) = buffer.try_lock() else {
                // Lock held: the owning thread is mid-append or mid-flush.
                return true;
            };
            !(state.content.is_empty()
                && now.duration_since(state.last_flush) > idle_threshold)
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.map.lock().len()
    }
}
