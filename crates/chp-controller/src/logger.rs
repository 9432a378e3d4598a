//! Deterministic line-format logger.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::clock::Clock;

/// A logger that emits exactly one line per call.
///
/// Line format: `<timestamp> [<LEVEL>]: <text>`, terminated by a line
/// break. The timestamp comes from the injected [`Clock`], never from the
/// ambient system time, so tests can pin it. Output goes to the injected
/// sink (stdout by default); write failures are swallowed — logging never
/// takes down the caller.
pub struct Logger {
    clock: Arc<dyn Clock>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Create a logger writing to stdout.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_sink(clock, Box::new(std::io::stdout()))
    }

    /// Create a logger writing to the given sink.
    pub fn with_sink(clock: Arc<dyn Clock>, sink: Box<dyn Write + Send>) -> Self {
        Self {
            clock,
            sink: Mutex::new(sink),
        }
    }

    /// Log an informational message.
    pub fn log_info(&self, text: &str) {
        self.emit("INFO", text);
    }

    /// Log an error message.
    pub fn log_error(&self, text: &str) {
        self.emit("ERROR", text);
    }

    /// Log an error value with its type, message and — when one was
    /// captured — a backtrace.
    pub fn log_exception<E: Error>(&self, error: &E) {
        let mut text = format!(
            "Exception encountered: {}: {}",
            std::any::type_name::<E>(),
            error
        );
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            text.push('\n');
            text.push_str(backtrace.to_string().trim_end());
        }
        self.emit("ERROR", &text);
    }

    fn emit(&self, level: &str, text: &str) {
        let timestamp = self.clock.now().format("%-m/%-d/%Y %-I:%M:%S %p %:z");
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(sink, "{timestamp} [{level}]: {text}");
        let _ = sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use thiserror::Error;

    /// Sink that keeps a readable handle on everything written.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Error)]
    #[error("index 3 outside range")]
    struct FakeIndexError;

    fn logger() -> (Logger, SharedBuf) {
        let buf = SharedBuf::default();
        let logger = Logger::with_sink(
            Arc::new(FixedClock::minimum()),
            Box::new(buf.clone()),
        );
        (logger, buf)
    }

    #[test]
    fn test_log_info_exact_line() {
        let (logger, buf) = logger();
        logger.log_info("some message");
        assert_eq!(
            buf.contents(),
            "1/1/0001 12:00:00 AM +00:00 [INFO]: some message\n"
        );
    }

    #[test]
    fn test_log_error_exact_line() {
        let (logger, buf) = logger();
        logger.log_error("some message");
        assert_eq!(
            buf.contents(),
            "1/1/0001 12:00:00 AM +00:00 [ERROR]: some message\n"
        );
    }

    #[test]
    fn test_each_call_emits_one_line() {
        let (logger, buf) = logger();
        logger.log_info("first");
        logger.log_error("second");
        let contents = buf.contents();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with("second\n"));
    }

    #[test]
    fn test_log_exception_names_type_and_message() {
        let (logger, buf) = logger();
        logger.log_exception(&FakeIndexError);
        let contents = buf.contents();
        assert!(contents.starts_with(
            "1/1/0001 12:00:00 AM +00:00 [ERROR]: Exception encountered: "
        ));
        assert!(contents.contains("FakeIndexError"));
        assert!(contents.contains(": index 3 outside range"));
        assert!(contents.ends_with('\n'));
    }
}
