// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flush-on-newline adapter over [`FanoutWriter`].
//!
//! Line-oriented callers usually want conventional log semantics: characters
//! accumulate until a line terminator, and the terminator publishes the
//! line. [`LineWriter`] composes that behavior on top of a writer's
//! `append`/`flush` surface so callers can use `write!`/`writeln!` without
//! the writer pretending to be a stream type.

use crate::error::FlushError;
use crate::writer::FanoutWriter;
use std::fmt;

/**
A [`fmt::Write`] view of a [`FanoutWriter`] that flushes at every `'\n'`.

Text up to and including each newline is appended to the calling thread's
buffer and flushed; a trailing fragment without a newline stays buffered for
the next write. Because [`fmt::Error`] carries no payload, the flush error
behind a failed `write!` is retained and can be retrieved with
[`take_last_error`](Self::take_last_error).

```
use fanlog::{FanoutWriter, MemorySink};
use std::fmt::Write as _;
use std::sync::Arc;

let writer = FanoutWriter::new();
let sink = Arc::new(MemorySink::new());
writer.add_shared_sink(sink.clone());

let mut lines = writer.line_writer();
writeln!(lines, "job {} done", 7).expect("memory sink cannot fail");
write!(lines, "partial").expect("no newline, nothing flushed");

assert_eq!(sink.contents(), b"job 7 done\n");
```
*/
#[derive(Debug)]
pub struct LineWriter<'a> {
    writer: &'a FanoutWriter,
    last_error: Option<FlushError>,
}

impl FanoutWriter {
    /// A line-oriented view of this writer for the calling thread.
    pub fn line_writer(&self) -> LineWriter<'_> {
        LineWriter {
            writer: self,
            last_error: None,
        }
    }
}

impl LineWriter<'_> {
    /// Takes the flush error behind the most recent `fmt::Error`, if any.
    pub fn take_last_error(&mut self) -> Option<FlushError> {
        self.last_error.take()
    }
}

impl fmt::Write for LineWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut remaining = s;
        while let Some(newline) = remaining.find('\n') {
            let (line, rest) = remaining.split_at(newline + 1);
            self.writer.append(line);
            if let Err(error) = self.writer.flush() {
                self.last_error = Some(error);
                return Err(fmt::Error);
            }
            remaining = rest;
        }
        if !remaining.is_empty() {
            self.writer.append(remaining);
        }
        Ok(())
    }
}
