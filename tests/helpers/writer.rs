use std::io;

/// A writer that collects output in memory and can be made to fail.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
    writes: usize,
    fail: bool,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a writer whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// The number of write calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    #[track_caller]
    pub fn into_string(self) -> String {
        String::from_utf8(self.buf).unwrap()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
