//! Explicit output sinks for user-facing progress lines.
//!
//! Ingestion and delete operations report what they did ("3 of 3 new records
//! inserted", "Deleting 2 rows from `lab`") through an [`OutputSink`] handed
//! in by the caller instead of printing to the process stdout. Teardown code
//! that wants silence wraps the sink in a [`QuietScope`]:
//!
//! ```
//! use wf_core::output::{Capture, OutputSink};
//!
//! let capture = Capture::default();
//! let mut out = OutputSink::from_writer(capture.clone());
//! {
//!     let mut quiet = out.quiet();
//!     quiet.line("swallowed").unwrap();
//! }
//! out.line("visible").unwrap();
//! assert_eq!(capture.contents(), "visible\n");
//! ```

use std::fmt;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

/// A writable destination for progress lines.
pub struct OutputSink {
    writer: Box<dyn Write + Send>,
}

impl OutputSink {
    /// Sink writing to the process stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Sink that drops everything.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    /// Sink writing to an arbitrary writer.
    #[must_use]
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Write one newline-terminated line.
    ///
    /// # Errors
    ///
    /// Returns the underlying writer's I/O error unchanged.
    pub fn line(&mut self, msg: impl fmt::Display) -> io::Result<()> {
        writeln!(self.writer, "{msg}")
    }

    /// Silence this sink until the returned guard is dropped.
    ///
    /// The original writer is restored when the guard drops, including while
    /// unwinding from a panic. Scopes are not meant to be nested; a nested
    /// scope restores the discard writer of its parent, which is harmless.
    pub fn quiet(&mut self) -> QuietScope<'_> {
        let original = std::mem::replace(&mut self.writer, Box::new(io::sink()));
        QuietScope {
            sink: self,
            original: Some(original),
        }
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Guard returned by [`OutputSink::quiet`]. Derefs to the silenced sink.
pub struct QuietScope<'a> {
    sink: &'a mut OutputSink,
    original: Option<Box<dyn Write + Send>>,
}

impl Deref for QuietScope<'_> {
    type Target = OutputSink;

    fn deref(&self) -> &Self::Target {
        &*self.sink
    }
}

impl DerefMut for QuietScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.sink
    }
}

impl Drop for QuietScope<'_> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.sink.writer = original;
        }
    }
}

/// Cloneable in-memory writer for inspecting sink output.
#[derive(Debug, Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
