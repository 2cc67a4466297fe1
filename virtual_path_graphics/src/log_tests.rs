//! Unit tests for log.rs
//!
//! Tests LogSeverity ordering, LogEntry, DefaultLogger filtering and formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "vpgfx::Frame".to_string(),
        message: "resized to 800x600".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// DEFAULT LOGGER
// ============================================================================

#[test]
fn test_default_logger_min_severity_is_info() {
    assert_eq!(DefaultLogger::default().min_severity, LogSeverity::Info);
}

#[test]
fn test_format_entry_without_file_line() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Info, None, None));
    assert!(line.contains("vpgfx::Frame"));
    assert!(line.ends_with("resized to 800x600"));
}

#[test]
fn test_format_entry_with_file_line() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Error, Some("frame.rs"), Some(42)));
    assert!(line.ends_with("(frame.rs:42)"));
}

#[test]
fn test_format_entry_ignores_half_location() {
    let line = DefaultLogger::format_entry(&entry(LogSeverity::Error, Some("frame.rs"), None));
    assert!(!line.contains("frame.rs"));
}

#[test]
fn test_default_logger_all_severities() {
    // Should not panic for any severity, filtered or not
    let logger = DefaultLogger::new(LogSeverity::Trace);
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
    }
}

// ============================================================================
// CUSTOM LOGGER
// ============================================================================

struct CapturingLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[test]
fn test_custom_logger_implementation() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let logger = CapturingLogger { entries: entries.clone() };

    logger.log(&entry(LogSeverity::Warn, None, None));
    logger.log(&entry(LogSeverity::Error, Some("a.rs"), Some(1)));

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Warn);
    assert_eq!(captured[1].line, Some(1));
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<Box<dyn Logger>>();
}
