//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# fanlog

fanlog is a concurrent, multi-sink logging writer.

# The problem

Handing every thread the same locked stream makes threads fight over every
character and lets their output interleave mid-line. Giving every thread its
own stream keeps them apart but scatters the output across destinations.

fanlog does neither. Each producer thread accumulates text in a buffer of its
own, with no contention against other threads' appends. When a thread
flushes, the buffered text is written atomically to *every* registered sink,
so each sink sees whole per-thread blocks, never interleaved fragments.

# The model

* A [`Sink`] is any byte-oriented, flushable destination: a file, stderr, a
  socket. Register as many as you like, before logging begins; the sink list
  is append-only for the writer's lifetime.
* [`FanoutWriter::append`] buffers text for the calling thread.
* [`FanoutWriter::flush`] empties the calling thread's buffer into every
  sink, in registration order. Concurrent flushes are serialized, so the
  byte ranges two threads flush never interleave within a sink.
* Buffers of threads that have gone quiet are evicted after an idle
  threshold so memory does not grow with every ephemeral thread; see
  [`WriterConfig`].

Delivery is best-effort and at-most-once: one broken sink cannot block or
fail the others, and flushed content is never replayed.

# Example

```
use fanlog::{FanoutWriter, MemorySink};
use std::sync::Arc;

let writer = Arc::new(FanoutWriter::new());
let sink = Arc::new(MemorySink::new());
writer.add_shared_sink(sink.clone());

let threads: Vec<_> = (0..4)
    .map(|n| {
        let writer = writer.clone();
        std::thread::spawn(move || {
            writer.append(&format!("thread {n} "));
            writer.append("reporting\n");
            writer.flush().expect("memory sink cannot fail");
        })
    })
    .collect();
for thread in threads {
    thread.join().expect("producer thread");
}

// Four whole lines, each contiguous; their relative order is up to the OS.
let output = sink.contents_utf8();
for n in 0..4 {
    assert!(output.contains(&format!("thread {n} reporting\n")));
}
```

For line-oriented callers, [`FanoutWriter::line_writer`] adapts the writer to
[`std::fmt::Write`] with conventional flush-on-newline semantics.

# What fanlog is not

No levels, no structured fields, no rotation, no delivery guarantees beyond
"a flush was attempted at most once per sink." Formatters (timestamps,
columns) belong in front of the writer; destinations go behind a [`Sink`]
impl, and [`WriteSink`] covers anything implementing [`std::io::Write`].
*/

mod buffer;
mod config;
mod error;
mod line;
mod memory_sink;
mod registry;
mod sink;
mod write_sink;
mod writer;

pub use config::{DEFAULT_CLEANUP_TRIGGER_COUNT, DEFAULT_IDLE_THRESHOLD, WriterConfig};
pub use error::FlushError;
pub use line::LineWriter;
pub use memory_sink::MemorySink;
pub use sink::{Sink, SinkHandle};
pub use write_sink::WriteSink;
pub use writer::FanoutWriter;
