#![allow(clippy::unwrap_used)]

use std::io;
use std::sync::{Arc, Mutex};

use libinjection_sqli::detect_sqli;
use tracing_subscriber::EnvFilter;

/// In-memory sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a subscriber at `directive` and returns what it logged.
fn capture(directive: &str, f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    buf.contents()
}

#[test]
fn test_conditional_comment_emits_detection_event() {
    let output = capture("libinjection_sqli=debug", || {
        assert!(detect_sqli(b"1 /*!UNION*/ SELECT 1").is_injection());
    });

    let detected: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("sqli detected"))
        .collect();
    assert_eq!(detected.len(), 1, "{output}");
    assert!(detected[0].contains("DEBUG"), "{output}");
    assert!(detected[0].contains("fingerprint=1UE1"), "{output}");
    assert!(detected[0].contains("SQL_MYSQL"), "{output}");
    // attempt events sit below the debug level
    assert!(!output.contains("sqli attempt"), "{output}");
}

#[test]
fn test_attempts_are_traced_per_context() {
    let output = capture("libinjection_sqli=trace", || {
        assert!(detect_sqli(b"1 /*!UNION*/ SELECT 1").is_injection());
    });

    // none/ANSI misses, then none/MySQL matches
    let attempts: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("sqli attempt"))
        .collect();
    assert_eq!(attempts.len(), 2, "{output}");
    assert!(attempts[0].contains("matched=false"), "{output}");
    assert!(attempts[1].contains("matched=true"), "{output}");
    assert!(output.contains("sqli detected"), "{output}");
}

#[test]
fn test_benign_input_emits_no_detection_event() {
    let output = capture("libinjection_sqli=trace", || {
        assert!(!detect_sqli(b"Hello World").is_injection());
    });

    assert!(output.contains("sqli attempt"), "{output}");
    assert!(!output.contains("sqli detected"), "{output}");
}
