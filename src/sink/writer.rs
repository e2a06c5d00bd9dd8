use std::io::Write;

use super::JsonSink;

/// A [`JsonSink`] that forwards to a [`std::io::Write`].
///
/// [`JsonSink::put`] cannot report failure, so the first I/O error is
/// latched and all subsequent bytes are discarded. Check
/// [`error()`](Self::error) after emitting. The writer is unbuffered here;
/// wrap it in a [`std::io::BufWriter`] when a syscall per byte matters.
pub struct WriterJsonSink<W> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W> WriterJsonSink<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        WriterJsonSink {
            writer,
            error: None,
        }
    }

    /// The first I/O error encountered, if any.
    pub fn error(&self) -> Option<&std::io::Error> {
        self.error.as_ref()
    }

    /// Take the latched error, re-arming the sink.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Give up the sink and return the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> JsonSink for WriterJsonSink<W>
where
    W: Write,
{
    fn put(&mut self, b: u8) {
        if self.error.is_none() {
            if let Err(e) = self.writer.write_all(&[b]) {
                self.error = Some(e);
            }
        }
    }
}
