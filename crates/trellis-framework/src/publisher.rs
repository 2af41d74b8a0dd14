//! Output publishers.
//!
//! A [`Publisher`] is the sink a dispatch writes the handler's output to.
//! [`StdoutPublisher`] is the default. [`WritePublisher`] writes to any other
//! sink, and [`TrapPublisher`] keeps the last output in memory for tests.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use trellis_core::Output;

/// Emits a handler's output.
pub trait Publisher: Send + Sync {
    /// Publishes one output.
    fn publish(&self, output: &Output) -> io::Result<()>;
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, output: &Output) -> io::Result<()> {
        (**self).publish(output)
    }
}

/// Writes outputs to any [`Write`] sink.
///
/// Strings are written as-is, `null` writes nothing and every other value is
/// written as JSON. No trailing newline is added. The writer is flushed after
/// every output.
#[derive(Debug, Default)]
pub struct WritePublisher<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WritePublisher<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Locks the underlying writer.
    pub fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Publisher for WritePublisher<W> {
    fn publish(&self, output: &Output) -> io::Result<()> {
        write_output(&mut *self.writer.lock(), output)
    }
}

/// Writes outputs to standard output, the same way [`WritePublisher`] does.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPublisher;

impl StdoutPublisher {
    /// Creates a stdout publisher.
    pub fn new() -> Self {
        Self
    }
}

impl Publisher for StdoutPublisher {
    fn publish(&self, output: &Output) -> io::Result<()> {
        write_output(&mut io::stdout().lock(), output)
    }
}

fn write_output(writer: &mut impl Write, output: &Output) -> io::Result<()> {
    write!(writer, "{output}")?;
    writer.flush()
}

/// Keeps the most recently published output in memory.
///
/// Each publish replaces the previous output, so a trap shared by a
/// long-running host holds at most one output.
#[derive(Debug, Default, Clone)]
pub struct TrapPublisher {
    last: Arc<Mutex<Option<Output>>>,
}

impl TrapPublisher {
    /// Creates an empty trap.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published output, rendered as text.
    ///
    /// Empty if nothing was published yet.
    pub fn output(&self) -> String {
        self.last().map(|output| output.to_string()).unwrap_or_default()
    }

    /// The most recently published output.
    pub fn last(&self) -> Option<Output> {
        self.last.lock().clone()
    }

    /// Forgets the captured output.
    pub fn clear(&self) {
        self.last.lock().take();
    }
}

impl Publisher for TrapPublisher {
    fn publish(&self, output: &Output) -> io::Result<()> {
        *self.last.lock() = Some(output.clone());
        Ok(())
    }
}
