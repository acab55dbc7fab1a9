#![no_main]
use libfuzzer_sys::fuzz_target;
use libinjection_sqli::{detect_sqli, Fingerprint, SqliFlags, SqliState};

const CONTEXTS: [SqliFlags; 5] = [
    SqliFlags::QUOTE_NONE.union(SqliFlags::SQL_ANSI),
    SqliFlags::QUOTE_NONE.union(SqliFlags::SQL_MYSQL),
    SqliFlags::QUOTE_SINGLE.union(SqliFlags::SQL_ANSI),
    SqliFlags::QUOTE_SINGLE.union(SqliFlags::SQL_MYSQL),
    SqliFlags::QUOTE_DOUBLE.union(SqliFlags::SQL_MYSQL),
];

fuzz_target!(|data: &[u8]| {
    let result = detect_sqli(data);
    if data.is_empty() {
        assert!(!result.is_injection());
    }
    if result.is_injection() {
        assert!(result.fingerprint.is_some());
    }

    let mut state = SqliState::new(data, SqliFlags::DEFAULT);
    for flags in CONTEXTS {
        let fp = state.fingerprint(flags);
        assert!(fp.len() <= Fingerprint::CAPACITY);
        assert!(state.tokens().len() <= Fingerprint::CAPACITY);
        assert_eq!(state.fingerprint(flags), fp);
    }
});
