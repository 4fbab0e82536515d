//! Unrecoverable errors.
//!
//! A scheduler that is too small for the build is a configuration mistake
//! that no retry can fix. Such errors go to a [`FatalSink`], which reports
//! them and never returns.

use core::fmt;

use crate::error::{Error, Result};

/// Terminal error handler.
pub trait FatalSink {
    /// Report `message` and never return.
    fn fatal(&mut self, message: &str) -> !;
}

/// Reports a fatal message over a byte stream, forever.
///
/// Nobody may be attached when the error happens, so the message is written
/// again and again, one line at a time, until reset.
pub struct SerialSink<W> {
    writer: W,
}

impl<W: embedded_io::Write> SerialSink<W> {
    /// Wrap a serial port or other writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: embedded_io::Write> FatalSink for SerialSink<W> {
    fn fatal(&mut self, message: &str) -> ! {
        error!("fatal: {=str}", message);
        loop {
            // A broken port has nowhere else to report to; keep trying.
            let _ = self.writer.write_all(message.as_bytes());
            let _ = self.writer.write_all(b"\r\n");
            let _ = self.writer.flush();
        }
    }
}

/// Routes an error to a [`FatalSink`].
pub trait OrFatal<T> {
    /// Unwrap the value, or hand the error's message to `sink`.
    fn or_fatal<S: FatalSink + ?Sized>(self, sink: &mut S) -> T;
}

impl<T> OrFatal<T> for Result<T> {
    fn or_fatal<S: FatalSink + ?Sized>(self, sink: &mut S) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                let mut message: heapless::String<128> = heapless::String::new();
                // Messages longer than the buffer are cut short.
                let _ = fmt::write(&mut message, format_args!("{}", Inner(&error)));
                sink.fatal(message.as_str())
            }
        }
    }
}

/// Displays the innermost error without the category prefix.
struct Inner<'e>(&'e Error);

impl fmt::Display for Inner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Error::Config(e) => fmt::Display::fmt(e, f),
            Error::Scheduler(e) => fmt::Display::fmt(e, f),
            Error::Axis(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use core::convert::Infallible;

    struct PanicSink;

    impl FatalSink for PanicSink {
        fn fatal(&mut self, message: &str) -> ! {
            panic!("{}", message);
        }
    }

    /// Collects output and gives up after a few writes.
    struct LimitedWriter {
        output: std::vec::Vec<u8>,
        writes_left: usize,
    }

    impl embedded_io::ErrorType for LimitedWriter {
        type Error = Infallible;
    }

    impl embedded_io::Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Infallible> {
            if self.writes_left == 0 {
                let text = std::string::String::from_utf8_lossy(&self.output).into_owned();
                panic!("{}", text);
            }
            self.writes_left -= 1;
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn test_ok_passes_through() {
        let value: Result<u8> = Ok(7);
        assert_eq!(value.or_fatal(&mut PanicSink), 7);
    }

    #[test]
    #[should_panic(expected = "Exceeded maximum controllable stepper outputs (4)")]
    fn test_capacity_message() {
        let result: Result<()> = Err(SchedulerError::CapacityExceeded { capacity: 4 }.into());
        result.or_fatal(&mut PanicSink);
    }

    #[test]
    #[should_panic(expected = "boom\r\nboom\r\n")]
    fn test_serial_sink_repeats() {
        let mut sink = SerialSink::new(LimitedWriter {
            output: std::vec::Vec::new(),
            writes_left: 4,
        });
        sink.fatal("boom");
    }
}
