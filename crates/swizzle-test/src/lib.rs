//! Test-support call log
//!
//! Replacement implementations installed during tests append markers here
//! so that call order can be asserted afterwards. The engine itself has no
//! dependency on this crate; it exists for the test suites only.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use parking_lot::Mutex;

/// Append-only log string shared between test code and installed hooks.
///
/// Wrap in an `Arc` to share one log between the test body and the
/// closures it installs. Each test owns its own log, so parallel test
/// execution does not interleave records.
#[derive(Debug, Default)]
pub struct CallLog {
    buf: Mutex<String>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker to the log
    pub fn append(&self, line: &str) {
        self.buf.lock().push_str(line);
    }

    /// Discard everything recorded so far
    pub fn clear(&self) {
        self.buf.lock().clear();
    }

    /// Compare the full log against an expected string
    pub fn compare(&self, expected: &str) -> bool {
        *self.buf.lock() == expected
    }

    /// The full log recorded so far
    pub fn dump(&self) -> String {
        self.buf.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_dump() {
        let log = CallLog::new();
        log.append("a;");
        log.append("b;");
        assert_eq!(log.dump(), "a;b;");
    }

    #[test]
    fn test_compare() {
        let log = CallLog::new();
        log.append("enter>");
        log.append("exit;");
        assert!(log.compare("enter>exit;"));
        assert!(!log.compare("enter>"));
    }

    #[test]
    fn test_clear() {
        let log = CallLog::new();
        log.append("x");
        log.clear();
        assert!(log.compare(""));
        assert_eq!(log.dump(), "");
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(CallLog::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let log = Arc::clone(&log);
                thread::spawn(move || log.append("."))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(log.compare("...."));
    }
}
