//! SQL injection detection.
//!
//! The pipeline is tokenizer → folder → fingerprint → blacklist/whitelist,
//! run once per assumed quoting context by [`SqliState::detect_with`].

use core::fmt;

use memchr::memchr;
use tracing::{debug, trace};

use crate::Error;

mod blacklist;
mod fingerprint;
mod fold;
mod sqli_data;
pub mod tokenizer;
mod whitelist;


pub use blacklist::{get_blacklist, is_blacklisted};
pub use fingerprint::Fingerprint;
pub use fold::{TokenWindow, MAX_TOKENS, WINDOW_SIZE};
pub use tokenizer::{CommentStats, SqliTokenizer, Token, TokenType, TokenValue};

bitflags::bitflags! {
    /// Quote context and comment dialect for one tokenization attempt.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SqliFlags: u32 {
        const NONE = 0;
        const QUOTE_NONE = 1 << 0;
        const QUOTE_SINGLE = 1 << 1;
        const QUOTE_DOUBLE = 1 << 2;
        const SQL_ANSI = 1 << 3;
        const SQL_MYSQL = 1 << 4;
    }
}

impl SqliFlags {
    /// No enclosing quote, ANSI comments.
    pub const DEFAULT: Self = Self::QUOTE_NONE.union(Self::SQL_ANSI);

    pub fn from_parts(quote: QuoteContext, dialect: Dialect) -> Self {
        let quote = match quote {
            QuoteContext::None => Self::QUOTE_NONE,
            QuoteContext::Single => Self::QUOTE_SINGLE,
            QuoteContext::Double => Self::QUOTE_DOUBLE,
        };
        let dialect = match dialect {
            Dialect::Ansi => Self::SQL_ANSI,
            Dialect::Mysql => Self::SQL_MYSQL,
        };
        quote | dialect
    }

    /// Fills in a missing quote or dialect bit with the defaults.
    pub fn normalized(self) -> Self {
        let mut flags = self;
        if !flags.intersects(Self::QUOTE_NONE | Self::QUOTE_SINGLE | Self::QUOTE_DOUBLE) {
            flags |= Self::QUOTE_NONE;
        }
        if !flags.intersects(Self::SQL_ANSI | Self::SQL_MYSQL) {
            flags |= Self::SQL_ANSI;
        }
        flags
    }

    /// Single quote wins if both quote bits are set.
    pub fn quote_context(self) -> QuoteContext {
        if self.contains(Self::QUOTE_SINGLE) {
            QuoteContext::Single
        } else if self.contains(Self::QUOTE_DOUBLE) {
            QuoteContext::Double
        } else {
            QuoteContext::None
        }
    }

    pub fn dialect(self) -> Dialect {
        if self.contains(Self::SQL_MYSQL) {
            Dialect::Mysql
        } else {
            Dialect::Ansi
        }
    }

    pub fn quote_delimiter(self) -> Option<u8> {
        self.quote_context().delimiter()
    }
}

impl Default for SqliFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The quoted literal the input is assumed to sit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteContext {
    #[default]
    None,
    Single,
    Double,
}

impl QuoteContext {
    pub fn delimiter(self) -> Option<u8> {
        match self {
            QuoteContext::None => None,
            QuoteContext::Single => Some(b'\''),
            QuoteContext::Double => Some(b'"'),
        }
    }
}

/// Comment dialect. MySQL turns `--x` and `#` into comments and expands
/// `/*! ... */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Ansi,
    Mysql,
}

/// Which rule settled the last verdict. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reason {
    #[default]
    Undecided,
    EmptyInput,
    NoFingerprint,
    NotBlacklisted,
    /// Blacklisted and no whitelist exception applied.
    Blacklisted,
    SpPassword,
    BareUnion,
    UnionWithExtras,
    HashComment,
    BarewordLineComment,
    NumberBlockComment,
    FoldedNumberComment,
    NumberThenComment,
    NumberInsideWord,
    DashCommentScan,
    StringConcatenation,
    StringComparison,
    UnfoldedShortLogic,
    KeywordNotInto,
}

/// Per-attempt classification state.
pub struct SqliState<'a> {
    tokenizer: SqliTokenizer<'a>,
    window: TokenWindow,
    token_count: usize,
    raw_tokens: usize,
    fingerprint: Fingerprint,
    reason: Reason,
    stats_folds: u32,
}

impl<'a> SqliState<'a> {
    pub fn new(input: &'a [u8], flags: SqliFlags) -> Self {
        Self {
            tokenizer: SqliTokenizer::new(input, flags),
            window: TokenWindow::default(),
            token_count: 0,
            raw_tokens: 0,
            fingerprint: Fingerprint::default(),
            reason: Reason::Undecided,
            stats_folds: 0,
        }
    }

    /// Like [`SqliState::new`] but only looks at the first `len` bytes.
    pub fn with_len(input: &'a [u8], len: usize, flags: SqliFlags) -> Result<Self, Error> {
        let input = input.get(..len).ok_or(Error::LengthOutOfBounds {
            len,
            available: input.len(),
        })?;
        Ok(Self::new(input, flags))
    }

    /// Rewind the cursor and clear all counters for another attempt.
    pub fn reset(&mut self, flags: SqliFlags) {
        self.tokenizer.reset(flags);
        self.window = TokenWindow::default();
        self.token_count = 0;
        self.raw_tokens = 0;
        self.fingerprint = Fingerprint::default();
        self.reason = Reason::Undecided;
        self.stats_folds = 0;
    }

    pub fn input(&self) -> &'a [u8] {
        self.tokenizer.input()
    }

    pub fn flags(&self) -> SqliFlags {
        self.tokenizer.flags()
    }

    /// Raw tokenizer step, no folding. The token also lands in the window,
    /// which rotates after [`WINDOW_SIZE`] tokens.
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokenizer.next_token()?;
        self.window[self.raw_tokens % WINDOW_SIZE] = token;
        self.raw_tokens += 1;
        Some(token)
    }

    /// Pattern from the last [`SqliState::fingerprint`] call.
    pub fn current_fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Folded tokens backing the current fingerprint.
    pub fn tokens(&self) -> &[Token] {
        &self.window.as_slice()[..self.token_count]
    }

    pub fn stats(&self) -> &CommentStats {
        self.tokenizer.stats()
    }

    pub fn folds(&self) -> u32 {
        self.stats_folds
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// The last attempt saw something the MySQL dialect reads differently.
    pub fn reparse_as_mysql(&self) -> bool {
        let stats = self.stats();
        stats.ddx > 0 || stats.hash > 0 || stats.mysql > 0
    }

    /// Default matcher: blacklisted and not excused by a whitelist rule.
    pub fn check_fingerprint(&mut self) -> bool {
        self.blacklist() && self.not_whitelist()
    }

    /// Runs every applicable context with the default matcher.
    pub fn is_sqli(&mut self) -> bool {
        self.detect_with(&DefaultMatcher).is_some()
    }

    /// Tries each context in turn and returns the flags of the first one the
    /// matcher accepts. The state keeps the matching fingerprint.
    pub fn detect_with<M: Matcher + ?Sized>(&mut self, matcher: &M) -> Option<SqliFlags> {
        let input = self.input();
        if input.is_empty() {
            self.reset(SqliFlags::DEFAULT);
            self.reason = Reason::EmptyInput;
            return None;
        }

        let none_ansi = SqliFlags::QUOTE_NONE | SqliFlags::SQL_ANSI;
        if self.attempt(none_ansi, matcher) {
            return Some(none_ansi);
        }
        let none_mysql = SqliFlags::QUOTE_NONE | SqliFlags::SQL_MYSQL;
        if self.reparse_as_mysql() && self.attempt(none_mysql, matcher) {
            return Some(none_mysql);
        }

        if memchr(b'\'', input).is_some() {
            let single_ansi = SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI;
            if self.attempt(single_ansi, matcher) {
                return Some(single_ansi);
            }
            let single_mysql = SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_MYSQL;
            if self.reparse_as_mysql() && self.attempt(single_mysql, matcher) {
                return Some(single_mysql);
            }
        }

        if memchr(b'"', input).is_some() {
            let double_mysql = SqliFlags::QUOTE_DOUBLE | SqliFlags::SQL_MYSQL;
            if self.attempt(double_mysql, matcher) {
                return Some(double_mysql);
            }
        }
        None
    }

    fn attempt<M: Matcher + ?Sized>(&mut self, flags: SqliFlags, matcher: &M) -> bool {
        let fingerprint = self.fingerprint(flags);
        let matched = matcher.matches(self);
        trace!(
            ?flags,
            %fingerprint,
            matched,
            reason = ?self.reason,
            "sqli attempt"
        );
        if matched {
            debug!(?flags, %fingerprint, "sqli detected");
        }
        matched
    }
}

impl fmt::Debug for SqliState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliState")
            .field("flags", &self.flags())
            .field("fingerprint", &self.fingerprint)
            .field("tokens", &self.tokens())
            .field("stats", self.stats())
            .field("folds", &self.stats_folds)
            .field("reason", &self.reason)
            .finish()
    }
}

/// Decides whether a fingerprinted attempt is an injection.
///
/// Any `Fn(&mut SqliState) -> bool` is a matcher; it may inspect the
/// fingerprint, the folded tokens and the counters.
pub trait Matcher {
    fn matches(&self, state: &mut SqliState<'_>) -> bool;
}

/// Blacklist lookup followed by the whitelist exceptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl Matcher for DefaultMatcher {
    fn matches(&self, state: &mut SqliState<'_>) -> bool {
        state.check_fingerprint()
    }
}

impl<F> Matcher for F
where
    F: Fn(&mut SqliState<'_>) -> bool,
{
    fn matches(&self, state: &mut SqliState<'_>) -> bool {
        self(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliResult {
    Safe,
    Injection {
        fingerprint: Fingerprint,
        /// Context and dialect of the attempt that matched.
        flags: SqliFlags,
    },
}

impl SqliResult {
    pub fn is_injection(&self) -> bool {
        matches!(self, SqliResult::Injection { .. })
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            SqliResult::Injection { fingerprint, .. } => Some(fingerprint),
            SqliResult::Safe => None,
        }
    }

    pub fn flags(&self) -> Option<SqliFlags> {
        match self {
            SqliResult::Injection { flags, .. } => Some(*flags),
            SqliResult::Safe => None,
        }
    }
}

impl fmt::Display for SqliResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqliResult::Safe => write!(f, "Safe"),
            SqliResult::Injection { fingerprint, .. } => {
                write!(f, "SQL Injection detected: {}", fingerprint)
            }
        }
    }
}

/// Reusable detector.
///
/// By default every context is tried in turn; [`SqliDetector::with_flags`]
/// pins a single context and dialect instead.
#[derive(Debug, Clone)]
pub struct SqliDetector<M = DefaultMatcher> {
    flags: Option<SqliFlags>,
    matcher: M,
}

impl Default for SqliDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliDetector {
    pub fn new() -> Self {
        Self {
            flags: None,
            matcher: DefaultMatcher,
        }
    }
}

impl<M: Matcher> SqliDetector<M> {
    pub fn with_flags(mut self, flags: SqliFlags) -> Self {
        self.flags = Some(flags.normalized());
        self
    }

    pub fn with_matcher<N: Matcher>(self, matcher: N) -> SqliDetector<N> {
        SqliDetector {
            flags: self.flags,
            matcher,
        }
    }

    pub fn detect(&self, input: &[u8]) -> SqliResult {
        let mut state = SqliState::new(input, self.flags.unwrap_or_default());
        let matched = match self.flags {
            None => state.detect_with(&self.matcher),
            Some(_) if input.is_empty() => None,
            Some(flags) => {
                state.fingerprint(flags);
                self.matcher.matches(&mut state).then_some(flags)
            }
        };
        match matched {
            Some(flags) => SqliResult::Injection {
                fingerprint: state.current_fingerprint(),
                flags,
            },
            None => SqliResult::Safe,
        }
    }

    /// Fingerprint under the pinned flags, or the default context.
    pub fn fingerprint(&self, input: &[u8]) -> Fingerprint {
        let flags = self.flags.unwrap_or_default();
        SqliState::new(input, flags).fingerprint(flags)
    }
}

/// Shorthand for the full multi-context check with the default matcher.
pub fn is_sqli(input: &[u8]) -> bool {
    SqliState::new(input, SqliFlags::DEFAULT).is_sqli()
}
