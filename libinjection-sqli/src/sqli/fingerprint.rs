use core::fmt;

use super::fold::MAX_TOKENS;
use super::tokenizer::{Token, TokenType};
use super::{SqliFlags, SqliState};

/// Shape of the first [`MAX_TOKENS`] folded tokens, one character per token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint {
    codes: [u8; MAX_TOKENS],
    len: u8,
}

impl Fingerprint {
    pub const CAPACITY: usize = MAX_TOKENS;

    pub(crate) fn from_tokens(tokens: &[Token]) -> Self {
        let mut fp = Self::default();
        for token in tokens.iter().take(MAX_TOKENS) {
            fp.codes[usize::from(fp.len)] = token.token_type.code();
            fp.len += 1;
        }
        fp
    }

    pub(crate) fn evil() -> Self {
        let mut fp = Self::default();
        fp.codes[0] = TokenType::Evil.code();
        fp.len = 1;
        fp
    }

    pub fn as_str(&self) -> &str {
        // codes are always ASCII
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.codes[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn token_types(&self) -> impl Iterator<Item = TokenType> + '_ {
        self.as_str().chars().filter_map(TokenType::from_char)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:?})", self.as_str())
    }
}

impl PartialEq<str> for Fingerprint {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Fingerprint {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl SqliState<'_> {
    /// Resets the state to `flags`, folds the whole input and returns its
    /// pattern. The pattern and folded tokens stay available on the state.
    pub fn fingerprint(&mut self, flags: SqliFlags) -> Fingerprint {
        self.reset(flags);
        let mut tlen = self.fold();

        // PHP strips a trailing unclosed backtick, so "foo`" acts like a comment
        if tlen > 2 {
            let last = &mut self.window[tlen - 1];
            if last.token_type == TokenType::Bareword
                && last.str_open == Some(b'`')
                && last.is_empty()
                && last.str_close.is_none()
            {
                last.token_type = TokenType::Comment;
            }
        }

        let tokens = &self.window.as_slice()[..tlen];
        let fingerprint = if tokens.iter().any(|t| t.token_type == TokenType::Evil) {
            let pos = tokens.first().map_or(0, |t| t.pos);
            self.window[0] = Token::new(TokenType::Evil, pos, b"X");
            tlen = 1;
            Fingerprint::evil()
        } else {
            Fingerprint::from_tokens(tokens)
        };

        self.token_count = tlen.min(MAX_TOKENS);
        self.fingerprint = fingerprint;
        fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fingerprint(input: &str, flags: SqliFlags) -> String {
        SqliState::new(input.as_bytes(), flags)
            .fingerprint(flags)
            .to_string()
    }

    #[test]
    fn test_fingerprint_shapes() {
        let ansi = SqliFlags::DEFAULT;
        assert_eq!(fingerprint("1 OR 1=1", ansi), "1&1");
        assert_eq!(fingerprint("Hello World", ansi), "nn");
        assert_eq!(fingerprint("1 UNION SELECT password FROM users", ansi), "1UEnk");
        assert_eq!(fingerprint("", ansi), "");
    }

    #[test]
    fn test_quote_context_changes_shape() {
        let input = "' OR '1'='1";
        assert_eq!(fingerprint(input, SqliFlags::DEFAULT), "s1s1");
        assert_eq!(
            fingerprint(input, SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI),
            "s&sos"
        );
    }

    #[test]
    fn test_evil_replaces_whole_pattern() {
        let mut state = SqliState::new(b"1 AND /* /* */ 1", SqliFlags::DEFAULT);
        let fp = state.fingerprint(SqliFlags::DEFAULT);
        assert_eq!(fp, "X");
        assert_eq!(state.tokens().len(), 1);
        assert_eq!(state.tokens()[0].token_type, TokenType::Evil);
    }

    #[test]
    fn test_php_backtick_becomes_comment() {
        assert_eq!(fingerprint("1 OR 1 `", SqliFlags::DEFAULT), "1&1c");
    }

    #[test]
    fn test_pattern_is_stored_on_state() {
        let mut state = SqliState::new(b"admin'--", SqliFlags::QUOTE_SINGLE);
        let fp = state.fingerprint(SqliFlags::QUOTE_SINGLE);
        assert_eq!(fp, "sc");
        assert_eq!(state.current_fingerprint(), fp);
        assert_eq!(
            fp.token_types().collect::<Vec<_>>(),
            vec![TokenType::String, TokenType::Comment]
        );
    }
}
