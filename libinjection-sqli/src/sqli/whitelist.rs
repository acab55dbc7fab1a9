//! Exceptions for blacklisted shapes that also come from ordinary input.

use memchr::memmem;

use super::tokenizer::TokenType;
use super::{Reason, SqliState};

impl SqliState<'_> {
    /// Run after a blacklist hit. Returns false only when an exception rule
    /// recognizes the input as benign.
    pub fn not_whitelist(&mut self) -> bool {
        let (verdict, reason) = self.whitelist_verdict();
        self.reason = reason;
        verdict
    }

    fn whitelist_verdict(&self) -> (bool, Reason) {
        let fp = self.fingerprint.as_bytes();
        let tokens = self.tokens();
        let stats_tokens = self.stats().tokens;

        // SQL Server keeps statements mentioning sp_password out of its audit log
        if fp.len() > 1
            && fp.last() == Some(&TokenType::Comment.code())
            && memmem::find(self.input(), b"sp_password").is_some()
        {
            return (true, Reason::SpPassword);
        }

        match (fp.len(), tokens) {
            (2, [first, second]) => {
                if second.token_type == TokenType::Union {
                    return if stats_tokens == 2 {
                        (false, Reason::BareUnion)
                    } else {
                        (true, Reason::UnionWithExtras)
                    };
                }
                if second.value.first() == Some(b'#') {
                    return (false, Reason::HashComment);
                }
                let comment_starts_with_slash = second.value.first() == Some(b'/');
                if first.token_type == TokenType::Bareword
                    && second.token_type == TokenType::Comment
                    && !comment_starts_with_slash
                {
                    return (false, Reason::BarewordLineComment);
                }
                if first.token_type == TokenType::Number && second.token_type == TokenType::Comment {
                    if comment_starts_with_slash {
                        return (true, Reason::NumberBlockComment);
                    }
                    if stats_tokens > 2 {
                        return (true, Reason::FoldedNumberComment);
                    }
                    // "1234--" is an attack, "1234-ABCDEF--" is an id
                    let input = self.input();
                    let after = first.pos + first.len();
                    return match (input.get(after), input.get(after + 1)) {
                        (Some(&ch), _) if ch <= 32 => (true, Reason::NumberThenComment),
                        (Some(b'/'), Some(b'*')) | (Some(b'-'), Some(b'-')) => {
                            (true, Reason::NumberThenComment)
                        }
                        _ => (false, Reason::NumberInsideWord),
                    };
                }
                // scanners appending "--" to every parameter
                if second.len() > 2 && second.value.first() == Some(b'-') {
                    return (false, Reason::DashCommentScan);
                }
            }
            (3, [first, second, third]) => match fp {
                b"sos" | b"s&s" => {
                    // ...foo' + 'bar...
                    if first.str_open.is_none()
                        && third.str_close.is_none()
                        && first.str_close == third.str_open
                    {
                        return (true, Reason::StringConcatenation);
                    }
                    return (false, Reason::StringComparison);
                }
                b"s&n" | b"n&1" | b"1&1" | b"1&v" | b"1&s" => {
                    if stats_tokens == 3 {
                        return (false, Reason::UnfoldedShortLogic);
                    }
                }
                _ if second.token_type == TokenType::Keyword => {
                    let value = second.value.as_bytes();
                    let is_into = value.len() >= 5 && value[..4].eq_ignore_ascii_case(b"INTO");
                    if !is_into {
                        return (false, Reason::KeywordNotInto);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        (true, Reason::Blacklisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqli::SqliFlags;

    fn verdict(input: &str, flags: SqliFlags) -> (String, bool, Reason) {
        let mut state = SqliState::new(input.as_bytes(), flags);
        let fp = state.fingerprint(flags);
        let result = state.not_whitelist();
        (fp.to_string(), result, state.reason())
    }

    #[test]
    fn test_short_logic_without_folding_is_benign() {
        let (fp, result, reason) = verdict("1 AND 1", SqliFlags::DEFAULT);
        assert_eq!(fp, "1&1");
        assert!(!result);
        assert_eq!(reason, Reason::UnfoldedShortLogic);

        let (fp, result, _) = verdict("1 OR 1=1", SqliFlags::DEFAULT);
        assert_eq!(fp, "1&1");
        assert!(result);
    }

    #[test]
    fn test_bare_union() {
        let (fp, result, reason) = verdict("1 UNION", SqliFlags::DEFAULT);
        assert_eq!(fp, "1U");
        assert!(!result);
        assert_eq!(reason, Reason::BareUnion);

        let (fp, result, reason) = verdict("1 UNION ALL", SqliFlags::DEFAULT);
        assert_eq!(fp, "1U");
        assert!(result);
        assert_eq!(reason, Reason::UnionWithExtras);
    }

    #[test]
    fn test_number_comment_boundary() {
        assert!(verdict("1234--", SqliFlags::DEFAULT).1);
        assert!(verdict("1234 -- x", SqliFlags::DEFAULT).1);
        assert!(verdict("1 /* x */", SqliFlags::DEFAULT).1);
        let (fp, result, reason) = verdict("1234#", SqliFlags::SQL_MYSQL);
        assert_eq!(fp, "1c");
        assert!(!result);
        assert_eq!(reason, Reason::HashComment);
    }

    #[test]
    fn test_bareword_line_comment_is_benign() {
        let (fp, result, reason) = verdict("foo -- bar", SqliFlags::DEFAULT);
        assert_eq!(fp, "nc");
        assert!(!result);
        assert_eq!(reason, Reason::BarewordLineComment);
        assert!(verdict("foo /* bar */", SqliFlags::DEFAULT).1);
    }

    #[test]
    fn test_sp_password_forces_detection() {
        let (fp, result, reason) = verdict("foo -- sp_password", SqliFlags::DEFAULT);
        assert_eq!(fp, "nc");
        assert!(result);
        assert_eq!(reason, Reason::SpPassword);
    }

    #[test]
    fn test_string_pairs() {
        let single = SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI;
        let (fp, result, reason) = verdict("foo' + 'bar", single);
        assert_eq!(fp, "sos");
        assert!(result);
        assert_eq!(reason, Reason::StringConcatenation);

        let (fp, result, reason) = verdict("'a' = 'b'", SqliFlags::DEFAULT);
        assert_eq!(fp, "sos");
        assert!(!result);
        assert_eq!(reason, Reason::StringComparison);
    }

    #[test]
    fn test_keyword_in_middle() {
        let (fp, result, reason) = verdict("1 FROM x", SqliFlags::DEFAULT);
        assert_eq!(fp, "1kn");
        assert!(!result);
        assert_eq!(reason, Reason::KeywordNotInto);
    }
}
