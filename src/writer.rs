// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fan-out writer: per-thread append, serialized multi-sink flush.
//!
//! # Concurrency model
//!
//! [`FanoutWriter`] is built so producer threads never contend on
//! character-level writes. Each thread accumulates into its own buffer
//! behind its own lock; the only cross-thread serialization is the registry
//! lock taken for the sink-visible portion of a flush. That serialization is
//! intentional: it guarantees that the byte ranges written by two concurrent
//! flushes are never interleaved within a single sink.
//!
//! Ordering guarantees:
//!
//! - Bytes appended by one thread between two flushes appear contiguously,
//!   in append order, in every sink.
//! - For a single flush, every sink receives identical content, visited in
//!   registration order.
//! - Flushes from different threads land in whichever order they acquire the
//!   registry lock; no global sequence is assigned.
//!
//! # Example
//!
//! ```
//! use fanlog::{FanoutWriter, MemorySink};
//! use std::sync::Arc;
//!
//! let writer = FanoutWriter::new();
//! let sink = Arc::new(MemorySink::new());
//! writer.add_shared_sink(sink.clone());
//!
//! writer.append("hello ");
//! writer.append("world");
//! writer.flush().expect("memory sink cannot fail");
//!
//! assert_eq!(sink.contents(), b"hello world");
//! ```

use crate::buffer::BufferTable;
use crate::config::WriterConfig;
use crate::error::FlushError;
use crate::registry::SinkRegistry;
use crate::sink::{Sink, SinkHandle};
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Instant;

/**
A concurrent, multi-sink logging writer.

Many threads may append text through a shared `FanoutWriter`; each thread's
output accumulates in its own buffer until that thread flushes, at which
point the buffered content is written to every registered sink. Buffers for
threads that have gone quiet are reclaimed periodically so memory does not
grow without bound when callers spawn many short-lived threads.

Sinks are registered once, up front, and never unregistered; registration
while logging is in progress is safe but expected to be rare.
*/
#[derive(Debug, Default)]
pub struct FanoutWriter {
    registry: Mutex<SinkRegistry>,
    buffers: BufferTable,
    flush_count: AtomicU32,
    config: WriterConfig,
}

impl FanoutWriter {
    /// Creates a writer with the default reclamation knobs
    /// ([`DEFAULT_IDLE_THRESHOLD`](crate::DEFAULT_IDLE_THRESHOLD),
    /// [`DEFAULT_CLEANUP_TRIGGER_COUNT`](crate::DEFAULT_CLEANUP_TRIGGER_COUNT)).
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    pub fn with_config(config: WriterConfig) -> Self {
        FanoutWriter {
            registry: Mutex::new(SinkRegistry::new()),
            buffers: BufferTable::new(),
            flush_count: AtomicU32::new(0),
            config,
        }
    }

    /// Registers a sink the writer takes ownership of; it is dropped with
    /// the writer.
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.registry.lock().add(SinkHandle::Owned(sink));
    }

    /// Registers a sink the caller retains; the writer holds a reference
    /// count, so the caller's clone stays usable after the writer is gone.
    pub fn add_shared_sink(&self, sink: Arc<dyn Sink>) {
        self.registry.lock().add(SinkHandle::Shared(sink));
    }

    /// The number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// The number of live per-thread buffers, including evictable idle ones.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /**
    Appends `text` to the calling thread's buffer.

    Only the calling thread's buffer lock is taken, and only for the duration
    of the append; appends from distinct threads never contend with each
    other, nor with the fan-out phase of a concurrent flush. Nothing reaches
    any sink until the calling thread flushes.
    */
    pub fn append(&self, text: &str) {
        let mut buffer = self.buffers.get_or_create(thread::current().id());
        buffer.content.push_str(text);
    }

    /// Single-character form of [`append`](Self::append).
    pub fn append_char(&self, c: char) {
        let mut buffer = self.buffers.get_or_create(thread::current().id());
        buffer.content.push(c);
    }

    /**
    Empties the calling thread's buffer into every registered sink.

    Every sink receives the buffered content in registration order, and is
    asked to flush afterward whether or not its write succeeded. A failing
    sink is recorded and skipped past, never retried: delivery is best-effort
    and at-most-once. On return the thread's buffer is empty and its idle
    timer reset, even when some sinks failed.

    Flushing with nothing appended is legal; every sink receives an empty
    write, and the buffer's idle timer is refreshed.

    # Panics

    Panics if no sinks are registered. Flushing into the void is a programmer
    error, not a runtime condition.
    */
    pub fn flush(&self) -> Result<(), FlushError> {
        assert!(
            self.sink_count() > 0,
            "FanoutWriter::flush called with no sinks registered"
        );

        let snapshot = {
            let mut buffer = self.buffers.get_or_create(thread::current().id());
            buffer.last_flush = Instant::now();
            mem::take(&mut buffer.content)
        };

        let result = {
            let registry = self.registry.lock();
            let mut failures = Vec::new();
            for (index, handle) in registry.iter().enumerate() {
                let sink = handle.as_sink();
                if let Err(error) = sink.write(snapshot.as_bytes()) {
                    failures.push((index, error));
                }
                // Only write failures are reported.
                let _ = sink.flush();
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(FlushError::new(registry.len(), failures))
            }
        };

        self.maybe_sweep();
        result
    }

    /// Runs the idle sweep every `cleanup_trigger_count`-th flush; zero
    /// disables it.
    fn maybe_sweep(&self) {
        let trigger = self.config.cleanup_trigger_count;
        if trigger == 0 {
            return;
        }
        let count = self.flush_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % trigger == 0 {
            self.buffers.sweep(self.config.idle_threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use std::time::Duration;

    fn sweep_every_flush() -> WriterConfig {
        WriterConfig {
            idle_threshold: Duration::from_millis(10),
            cleanup_trigger_count: 1,
        }
    }

    #[test]
    fn appends_concatenate_in_order() {
        let writer = FanoutWriter::new();
        let sink = Arc::new(MemorySink::new());
        writer.add_shared_sink(sink.clone());

        writer.append("one ");
        writer.append_char('2');
        writer.append(" three");
        writer.flush().expect("memory sink write");

        assert_eq!(sink.contents(), b"one 2 three");
    }

    #[test]
    fn flushed_content_is_not_replayed() {
        let writer = FanoutWriter::new();
        let sink = Arc::new(MemorySink::new());
        writer.add_shared_sink(sink.clone());

        writer.append("first");
        writer.flush().expect("memory sink write");
        writer.append("second");
        writer.flush().expect("memory sink write");

        assert_eq!(sink.contents(), b"firstsecond");
    }

    #[test]
    #[should_panic(expected = "no sinks registered")]
    fn flush_without_sinks_panics() {
        let writer = FanoutWriter::new();
        writer.append("lost");
        let _ = writer.flush();
    }

    #[test]
    fn owned_sink_dropped_with_writer() {
        let writer = FanoutWriter::new();
        writer.add_sink(Box::new(MemorySink::new()));
        assert_eq!(writer.sink_count(), 1);
        drop(writer);
    }

    #[test]
    fn failing_sink_does_not_starve_the_others() {
        let writer = FanoutWriter::new();
        let healthy_before = Arc::new(MemorySink::new());
        let broken = Arc::new(MemorySink::new());
        let healthy_after = Arc::new(MemorySink::new());
        writer.add_shared_sink(healthy_before.clone());
        writer.add_shared_sink(broken.clone());
        writer.add_shared_sink(healthy_after.clone());

        broken.fail_next_writes(1);
        writer.append("payload");
        let error = writer.flush().expect_err("broken sink must surface");

        assert_eq!(error.sink_count(), 3);
        assert_eq!(error.failures().len(), 1);
        assert_eq!(error.failures()[0].0, 1, "failure should name sink 1");
        assert_eq!(healthy_before.contents(), b"payload");
        assert_eq!(healthy_after.contents(), b"payload");
        assert!(broken.contents().is_empty());
    }

    #[test]
    fn buffer_is_cleared_even_when_every_sink_fails() {
        let writer = FanoutWriter::new();
        let sink = Arc::new(MemorySink::new());
        writer.add_shared_sink(sink.clone());

        sink.fail_next_writes(1);
        writer.append("doomed");
        writer.flush().expect_err("write failure must surface");

        // At-most-once: the content is gone, not requeued.
        writer.flush().expect("second flush is empty and succeeds");
        assert_eq!(sink.contents(), b"");
    }

    #[test]
    fn idle_buffer_is_evicted_and_recreated_fresh() {
        let writer = Arc::new(FanoutWriter::with_config(sweep_every_flush()));
        writer.add_shared_sink(Arc::new(MemorySink::new()));

        writer.append("main thread line");
        writer.flush().expect("memory sink write");
        assert_eq!(writer.buffer_count(), 1);

        std::thread::sleep(Duration::from_millis(30));

        // Another thread's flush trips the sweep; the main thread's buffer
        // is empty and past the idle threshold, so it goes away.
        let writer_clone = writer.clone();
        std::thread::spawn(move || {
            writer_clone.flush().expect("memory sink write");
        })
        .join()
        .expect("helper thread");
        assert_eq!(writer.buffer_count(), 1, "only the helper's buffer remains");

        // Resuming on the main thread recreates a brand-new buffer.
        writer.append("back again");
        assert_eq!(writer.buffer_count(), 2);
        writer.flush().expect("memory sink write");
    }

    #[test]
    fn zero_trigger_count_disables_sweeping() {
        let writer = FanoutWriter::with_config(WriterConfig {
            idle_threshold: Duration::from_millis(1),
            cleanup_trigger_count: 0,
        });
        writer.add_shared_sink(Arc::new(MemorySink::new()));
        writer.flush().expect("memory sink write");
        std::thread::sleep(Duration::from_millis(10));
        writer.flush().expect("memory sink write");
        assert_eq!(writer.buffer_count(), 1);
    }
}
