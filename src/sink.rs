// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Debug;
use std::io;
use std::sync::Arc;

/**
A byte-oriented, flushable output destination.

Implementations take `&self` and handle their own interior mutability, so a
single sink can be shared behind an [`Arc`] while the writer fans out to it.
The writer places no framing or encoding requirements on the bytes; whatever
a producer thread appended between two flushes is passed through verbatim.
*/
pub trait Sink: Debug + Send + Sync {
    /**
    Writes all of `bytes` to the destination.

    A failure here is recorded by the flush that issued the write, but never
    prevents the remaining sinks from receiving the same content.
    */
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /**
    Pushes any buffered bytes to the underlying destination.

    Called once per sink at the end of every flush, regardless of whether the
    preceding write succeeded.
    */
    fn flush(&self) -> io::Result<()>;
}

/**
A registered sink together with who is responsible for its lifetime.

`Owned` sinks are dropped when the writer is dropped; `Shared` sinks live as
long as any caller-held clone does.
*/
#[derive(Debug)]
pub enum SinkHandle {
    /// The writer owns the sink and releases it on drop.
    Owned(Box<dyn Sink>),
    /// The caller retains ownership; the writer holds a reference count.
    Shared(Arc<dyn Sink>),
}

impl SinkHandle {
    /// Borrows the sink regardless of the ownership tag.
    pub fn as_sink(&self) -> &dyn Sink {
        match self {
            SinkHandle::Owned(sink) => sink.as_ref(),
            SinkHandle::Shared(sink) => sink.as_ref(),
        }
    }
}

impl From<Box<dyn Sink>> for SinkHandle {
    fn from(sink: Box<dyn Sink>) -> Self {
        SinkHandle::Owned(sink)
    }
}

impl From<Arc<dyn Sink>> for SinkHandle {
    fn from(sink: Arc<dyn Sink>) -> Self {
        SinkHandle::Shared(sink)
    }
}

/*
Boilerplate notes.

# Sink

Clone on Sink makes no sense; sinks typically hold unique resources.
PartialEq/Eq are possible but it's unclear whether we'd mean data equality or
provenance, so neither is required.
Default is not sensible since who knows how a sink is constructed (does it
need a filename, a socket, etc.)
Send + Sync are required: the registry is shared by every producer thread.

# SinkHandle

Clone is deliberately not implemented: cloning an Owned handle would need to
duplicate the sink, which contradicts it being owned.
*/
