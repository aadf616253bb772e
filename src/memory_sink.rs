// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-memory sink
//!
//! [`MemorySink`] captures everything written to it in a byte buffer instead
//! of touching any real output. It exists for testing and debugging: assert
//! on what a writer fanned out, count how many flushes reached the sink, or
//! inject write failures to exercise the best-effort delivery path.

use crate::sink::Sink;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/**
A sink that buffers written bytes in memory.

Thread-safe; share it behind an [`Arc`](std::sync::Arc) and register it with
[`add_shared_sink`](crate::FanoutWriter::add_shared_sink) to keep a handle
for inspection while the writer fans out to it.

```
use fanlog::{FanoutWriter, MemorySink};
use std::sync::Arc;

let writer = FanoutWriter::new();
let sink = Arc::new(MemorySink::new());
writer.add_shared_sink(sink.clone());

writer.append("captured");
writer.flush().expect("memory sink cannot fail");
assert_eq!(sink.contents(), b"captured");
```
*/
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<Vec<u8>>,
    write_count: AtomicUsize,
    failures_remaining: AtomicU32,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink {
            buffer: Mutex::new(Vec::new()),
            write_count: AtomicUsize::new(0),
            failures_remaining: AtomicU32::new(0),
        }
    }

    /// A copy of everything successfully written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// The captured bytes as text, with invalid UTF-8 replaced.
    pub fn contents_utf8(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Takes the captured bytes, leaving the sink empty.
    pub fn drain(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buffer.lock())
    }

    /// The number of writes accepted, including empty ones. Each flush of a
    /// fan-out writer issues exactly one write per sink.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Makes the next `count` writes fail with [`io::ErrorKind::BrokenPipe`].
    /// Failed writes capture nothing and do not count as accepted.
    pub fn fail_next_writes(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::Relaxed);
    }
}

impl Sink for MemorySink {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if self
            .failures_remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
        {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "injected write failure",
            ));
        }
        self.buffer.lock().extend_from_slice(bytes);
        self.write_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        // Nothing buffered beyond the capture itself.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_writes_in_order() {
        let sink = MemorySink::new();
        sink.write(b"ab").expect("write");
        sink.write(b"").expect("empty write");
        sink.write(b"cd").expect("write");
        assert_eq!(sink.contents(), b"abcd");
        assert_eq!(sink.contents_utf8(), "abcd");
        assert_eq!(sink.write_count(), 3);
    }

    #[test]
    fn drain_empties_the_capture() {
        let sink = MemorySink::new();
        sink.write(b"once").expect("write");
        assert_eq!(sink.drain(), b"once");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn injected_failures_are_consumed() {
        let sink = MemorySink::new();
        sink.fail_next_writes(2);
        assert_eq!(
            sink.write(b"x").expect_err("first injected failure").kind(),
            io::ErrorKind::BrokenPipe
        );
        sink.write(b"y").expect_err("second injected failure");
        sink.write(b"z").expect("failures exhausted");
        assert_eq!(sink.contents(), b"z");
        assert_eq!(sink.write_count(), 1);
    }
}
