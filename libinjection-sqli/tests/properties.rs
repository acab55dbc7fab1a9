#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use libinjection_sqli::sqli::{SqliTokenizer, TokenValue, MAX_TOKENS};
use libinjection_sqli::{detect_sqli, SqliFlags, SqliState, TokenType};
use proptest::prelude::*;

const CONTEXTS: [SqliFlags; 5] = [
    SqliFlags::QUOTE_NONE.union(SqliFlags::SQL_ANSI),
    SqliFlags::QUOTE_NONE.union(SqliFlags::SQL_MYSQL),
    SqliFlags::QUOTE_SINGLE.union(SqliFlags::SQL_ANSI),
    SqliFlags::QUOTE_SINGLE.union(SqliFlags::SQL_MYSQL),
    SqliFlags::QUOTE_DOUBLE.union(SqliFlags::SQL_MYSQL),
];

/// Inputs built from fragments that exercise most tokenizer paths.
fn sqlish() -> impl Strategy<Value = String> {
    let fragment = prop::sample::select(vec![
        " ", "'", "\"", "`", "1", "0x1f", "1e5", ".", ",", ";", "(", ")", "{", "}", "--", "-",
        "#", "/*", "*/", "/*!", "@", "@@", "$$", "\\", "=", "<=>", "||", "OR", "AND", "UNION",
        "SELECT", "FROM", "IN", "NOT", "USER", "x", "foo", "N'", "q'[", "::", "[", "]",
    ]);
    prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn pattern_never_exceeds_five(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut state = SqliState::new(&input, SqliFlags::DEFAULT);
        for flags in CONTEXTS {
            let fp = state.fingerprint(flags);
            prop_assert!(fp.len() <= MAX_TOKENS);
            prop_assert!(state.tokens().len() <= MAX_TOKENS);
        }
    }

    #[test]
    fn sqlish_pattern_never_exceeds_five(input in sqlish()) {
        let mut state = SqliState::new(input.as_bytes(), SqliFlags::DEFAULT);
        for flags in CONTEXTS {
            prop_assert!(state.fingerprint(flags).len() <= MAX_TOKENS);
        }
    }

    #[test]
    fn detection_is_deterministic(input in sqlish()) {
        let first = detect_sqli(input.as_bytes());
        let second = detect_sqli(input.as_bytes());
        prop_assert_eq!(first, second);

        let mut a = SqliState::new(input.as_bytes(), SqliFlags::DEFAULT);
        let mut b = SqliState::new(input.as_bytes(), SqliFlags::DEFAULT);
        prop_assert_eq!(a.is_sqli(), b.is_sqli());
        prop_assert_eq!(a.reason(), b.reason());
        prop_assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn refingerprinting_is_stable(input in sqlish()) {
        let mut state = SqliState::new(input.as_bytes(), SqliFlags::DEFAULT);
        for flags in CONTEXTS {
            let first = state.fingerprint(flags);
            let folds = state.folds();
            prop_assert_eq!(state.fingerprint(flags), first);
            prop_assert_eq!(state.folds(), folds);
        }
    }

    #[test]
    fn long_words_truncate_without_changing_type(word in "[a-z_]{32,80}") {
        let mut tokenizer = SqliTokenizer::new(word.as_bytes(), SqliFlags::DEFAULT);
        let token = tokenizer.next_token().unwrap();
        prop_assert_eq!(token.token_type, TokenType::Bareword);
        prop_assert_eq!(token.value.len(), TokenValue::CAPACITY);
        prop_assert_eq!(token.value.as_bytes(), &word.as_bytes()[..TokenValue::CAPACITY]);
        prop_assert!(tokenizer.next_token().is_none());
    }

    #[test]
    fn long_strings_truncate_without_changing_type(body in "[a-z ]{40,120}") {
        let input = format!("'{body}'");
        let mut tokenizer = SqliTokenizer::new(input.as_bytes(), SqliFlags::DEFAULT);
        let token = tokenizer.next_token().unwrap();
        prop_assert_eq!(token.token_type, TokenType::String);
        prop_assert_eq!(token.value.as_bytes(), &body.as_bytes()[..TokenValue::CAPACITY]);
        prop_assert_eq!(token.str_open, Some(b'\''));
        prop_assert_eq!(token.str_close, Some(b'\''));
    }

    #[test]
    fn empty_prefix_is_safe(input in prop::collection::vec(any::<u8>(), 0..64)) {
        let result = libinjection_sqli::detect_sqli_len(&input, 0).unwrap();
        prop_assert!(!result.is_injection());
    }
}
