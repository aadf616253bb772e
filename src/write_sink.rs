// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter turning any [`io::Write`] into a [`Sink`].
//!
//! The fan-out engine deals in sinks; concrete destinations are plain
//! writers (stderr, a file, a socket). [`WriteSink`] is the boundary between
//! the two: it wraps the writer behind a mutex so the engine's `&self` sink
//! interface can drive it.

use crate::sink::Sink;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

/**
A [`Sink`] wrapping an arbitrary [`io::Write`] destination.

```no_run
use fanlog::{FanoutWriter, WriteSink};
use std::fs::File;

let writer = FanoutWriter::new();
let file = File::create("app.log")?;
writer.add_sink(Box::new(WriteSink::new(file)));
writer.add_sink(Box::new(WriteSink::stderr()));
# Ok::<(), std::io::Error>(())
```
*/
pub struct WriteSink<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        WriteSink {
            inner: Mutex::new(inner),
        }
    }

    /// Recovers the wrapped destination.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl WriteSink<io::Stderr> {
    /// A sink over the process's stderr.
    pub fn stderr() -> Self {
        WriteSink::new(io::stderr())
    }
}

impl<W: Write + Send> Sink for WriteSink<W> {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(bytes)
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

// The wrapped writer rarely implements Debug, so don't require it.
impl<W: Write + Send> fmt::Debug for WriteSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_bytes_through_verbatim() {
        let sink = WriteSink::new(Vec::new());
        sink.write(b"one").expect("vec write");
        sink.write(b"two").expect("vec write");
        sink.flush().expect("vec flush");
        assert_eq!(sink.into_inner(), b"onetwo");
    }
}
