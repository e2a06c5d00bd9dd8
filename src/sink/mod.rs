mod slice;
mod writer;

pub use slice::SliceJsonSink;
pub use writer::WriterJsonSink;

/// A sink consumes the [`JsonEmitter`](crate::JsonEmitter)'s output one
/// byte at a time.
///
/// `put` cannot fail: the emitter has no runtime errors by contract.
/// Implementations that can run out of room or hit I/O errors record the
/// condition and discard further bytes (see [`SliceJsonSink`] and
/// [`WriterJsonSink`]).
///
/// The sink is invoked synchronously and must not call back into the
/// emitter that is writing to it.
pub trait JsonSink {
    /// Consume one byte of emitter output.
    fn put(&mut self, b: u8);
}

impl<S: JsonSink + ?Sized> JsonSink for &mut S {
    fn put(&mut self, b: u8) {
        (**self).put(b)
    }
}

/// The hosted convenience sink: bytes are appended to the vector.
impl JsonSink for Vec<u8> {
    fn put(&mut self, b: u8) {
        self.push(b);
    }
}
