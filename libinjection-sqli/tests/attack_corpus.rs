#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use libinjection_sqli::{detect_sqli, SqliFlags};
use pretty_assertions::assert_eq;

/// Query-string payloads as they arrive on the wire. Callers decode before
/// detection; the detector does no decoding of its own.
const ENCODED_ATTACKS: &[&str] = &[
    "1%27%20OR%20%271%27%3D%271",
    "1%20OR%201%3D1",
    "admin%27--",
    "1%20UNION%20SELECT%20password%20FROM%20users",
    "1%27%20AND%20SLEEP(5)--",
    "%27%20UNION%20SELECT%20NULL--",
    "-1%20UNION%20ALL%20SELECT%201%2C2%2C3",
    "1%3B%20DROP%20TABLE%20users",
    "1%20%2F*!UNION*%2F%20SELECT%201",
    "1%20AND%20%2F*%20%2F*%20*%2F%201",
];

const BENIGN: &[&str] = &[
    "Hello World",
    "the quick brown fox",
    "john.doe@example.com",
    "O'Reilly",
    "price < 100",
    "10-20",
    "SELECT",
    "1 AND 1",
    "foo -- bar",
    "--",
    "123",
];

#[test]
fn test_decoded_attacks_are_detected() {
    for encoded in ENCODED_ATTACKS {
        let decoded = urlencoding::decode(encoded).unwrap();
        let result = detect_sqli(decoded.as_bytes());
        assert!(result.is_injection(), "missed {decoded:?}");
        let fp = result.fingerprint.unwrap();
        assert!(!fp.is_empty() && fp.len() <= 5, "{decoded:?} -> {fp}");
        assert!(result.flags.is_some());
    }
}

#[test]
fn test_benign_inputs_pass() {
    for input in BENIGN {
        let result = detect_sqli(input.as_bytes());
        assert!(!result.is_injection(), "false positive on {input:?}");
        assert_eq!(result.fingerprint, None);
        assert_eq!(result.flags, None);
    }
}

#[test]
fn test_reported_context() {
    let cases: &[(&str, &str, SqliFlags)] = &[
        ("1 OR 1=1", "1&1", SqliFlags::QUOTE_NONE | SqliFlags::SQL_ANSI),
        ("admin'--", "sc", SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI),
        (
            "1 /*!UNION*/ SELECT 1",
            "1UE1",
            SqliFlags::QUOTE_NONE | SqliFlags::SQL_MYSQL,
        ),
        (
            "\" OR \"1\"=\"1",
            "s&sos",
            SqliFlags::QUOTE_DOUBLE | SqliFlags::SQL_MYSQL,
        ),
    ];
    for (input, fingerprint, flags) in cases {
        let result = detect_sqli(input.as_bytes());
        assert_eq!(result.fingerprint.unwrap().as_str(), *fingerprint, "{input}");
        assert_eq!(result.flags, Some(*flags), "{input}");
    }
}

/// Verdict, fingerprint and context per input, one tab-separated row each.
const CORPUS: &str = include_str!("data/sqli_corpus.txt");

struct CorpusCase<'a> {
    line: usize,
    injection: bool,
    fingerprint: Option<&'a str>,
    flags: Option<SqliFlags>,
    input: &'a str,
}

fn parse_context(name: &str) -> Option<SqliFlags> {
    let flags = match name {
        "none-ansi" => SqliFlags::QUOTE_NONE | SqliFlags::SQL_ANSI,
        "none-mysql" => SqliFlags::QUOTE_NONE | SqliFlags::SQL_MYSQL,
        "single-ansi" => SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_ANSI,
        "single-mysql" => SqliFlags::QUOTE_SINGLE | SqliFlags::SQL_MYSQL,
        "double-mysql" => SqliFlags::QUOTE_DOUBLE | SqliFlags::SQL_MYSQL,
        "-" => return None,
        other => panic!("unknown context {other:?}"),
    };
    Some(flags)
}

fn corpus_cases() -> Vec<CorpusCase<'static>> {
    CORPUS
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(idx, line)| {
            let fields: Vec<&str> = line.splitn(4, '\t').collect();
            assert_eq!(fields.len(), 4, "line {}: {line:?}", idx + 1);
            let injection = match fields[0] {
                "sqli" => true,
                "safe" => false,
                other => panic!("line {}: unknown verdict {other:?}", idx + 1),
            };
            CorpusCase {
                line: idx + 1,
                injection,
                fingerprint: (fields[1] != "-").then_some(fields[1]),
                flags: parse_context(fields[2]),
                input: fields[3],
            }
        })
        .collect()
}

#[test]
fn test_corpus_file() {
    let cases = corpus_cases();
    assert!(cases.iter().filter(|c| c.injection).count() >= 15);
    assert!(cases.iter().filter(|c| !c.injection).count() >= 10);

    for case in &cases {
        let result = detect_sqli(case.input.as_bytes());
        let context = format!("line {}: {:?}", case.line, case.input);
        assert_eq!(result.is_injection(), case.injection, "{context}");
        assert_eq!(
            result.fingerprint.as_ref().map(|fp| fp.as_str()),
            case.fingerprint,
            "{context}"
        );
        assert_eq!(result.flags, case.flags, "{context}");
    }
}

#[test]
fn test_corpus_rows_are_consistent() {
    for case in corpus_cases() {
        assert_eq!(
            case.injection,
            case.fingerprint.is_some(),
            "line {}",
            case.line
        );
        assert_eq!(
            case.fingerprint.is_some(),
            case.flags.is_some(),
            "line {}",
            case.line
        );
    }
}
