#![doc = include_str!("../README.md")]
//!
//! ## API Guide
//!
//! ### For End Users
//!
//! Most applications should use the high-level detection functions:
//!
//! - [`detect_sqli`] - Main SQL injection detection (recommended)
//! - [`detect_sqli_with_flags`] - detection pinned to one quote context and dialect
//! - [`detect_sqli_len`] - detection over a caller-declared prefix of a buffer
//! - [`version`] - Library version information
//!
//! Input must already be decoded. The detector does no URL or HTML decoding
//! of its own.
//!
//! ### For Advanced Users and Debugging
//!
//! - [`SqliState`] - per-attempt state: raw tokens, folded tokens, counters
//!   and the rule that settled the verdict
//! - [`SqliDetector`] - reusable detector with pinned flags or a custom [`Matcher`]
//! - [`Fingerprint`] - the token-shape pattern a verdict is based on

use thiserror::Error;

pub mod sqli;

pub use sqli::{
    is_sqli, DefaultMatcher, Dialect, Fingerprint, Matcher, QuoteContext, Reason, SqliDetector,
    SqliFlags, SqliResult, SqliState, Token, TokenType,
};

/// Caller misuse. Classification itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("declared length {len} exceeds the {available} bytes supplied")]
    LengthOutOfBounds { len: usize, available: usize },
}

/// Result of a detection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionResult {
    is_injection: bool,
    /// Pattern of the attempt that matched
    pub fingerprint: Option<Fingerprint>,
    /// Quote context and dialect of the attempt that matched
    pub flags: Option<SqliFlags>,
}

impl DetectionResult {
    /// Returns `true` if injection was detected, `false` otherwise.
    pub fn is_injection(&self) -> bool {
        self.is_injection
    }
}

impl From<SqliResult> for DetectionResult {
    fn from(result: SqliResult) -> Self {
        Self {
            is_injection: result.is_injection(),
            fingerprint: result.fingerprint().copied(),
            flags: result.flags(),
        }
    }
}

/// Detects SQL injection in the given input.
///
/// The input is tried with no enclosing quote, then as if it followed an
/// unterminated single-quoted literal, then a double-quoted one. The MySQL
/// comment dialect is tried whenever the ANSI pass saw something MySQL
/// reads differently.
///
/// # Examples
///
/// ```
/// use libinjection_sqli::detect_sqli;
///
/// // Safe input
/// let result = detect_sqli(b"hello world");
/// assert!(!result.is_injection());
///
/// // SQL injection
/// let result = detect_sqli(b"1' OR '1'='1");
/// assert!(result.is_injection());
/// assert_eq!(result.fingerprint.unwrap().as_str(), "s&sos");
/// ```
pub fn detect_sqli(input: &[u8]) -> DetectionResult {
    SqliDetector::new().detect(input).into()
}

/// Detects SQL injection under a single quote context and dialect.
///
/// Prefer [`detect_sqli`] unless the embedding context is known.
///
/// ```
/// use libinjection_sqli::{detect_sqli_with_flags, SqliFlags};
///
/// let result = detect_sqli_with_flags(
///     b"1' OR '1'='1",
///     SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI,
/// );
/// assert!(result.is_injection());
///
/// let result = detect_sqli_with_flags(b"1' OR '1'='1", SqliFlags::QUOTE_NONE);
/// assert!(!result.is_injection());
/// ```
pub fn detect_sqli_with_flags(input: &[u8], flags: SqliFlags) -> DetectionResult {
    SqliDetector::new().with_flags(flags).detect(input).into()
}

/// Like [`detect_sqli`] but only inspects the first `len` bytes.
///
/// ```
/// use libinjection_sqli::{detect_sqli_len, Error};
///
/// let input = b"1 UNION SELECT 1 -- padding";
/// assert!(detect_sqli_len(input, 16)?.is_injection());
/// assert_eq!(
///     detect_sqli_len(input, 100),
///     Err(Error::LengthOutOfBounds { len: 100, available: input.len() })
/// );
/// # Ok::<(), Error>(())
/// ```
pub fn detect_sqli_len(input: &[u8], len: usize) -> Result<DetectionResult, Error> {
    let input = input.get(..len).ok_or(Error::LengthOutOfBounds {
        len,
        available: input.len(),
    })?;
    Ok(detect_sqli(input))
}

/// Returns the version of this crate.
///
/// ```
/// println!("libinjection-sqli {}", libinjection_sqli::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
