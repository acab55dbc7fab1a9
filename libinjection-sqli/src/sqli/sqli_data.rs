//! Static lookup tables for the SQL tokenizer.
//!
//! Everything in here is read-only after first use: the byte dispatch table
//! is a `const`, and the keyword table is built once behind a [`OnceLock`].

use std::collections::HashMap;
use std::sync::OnceLock;

use super::tokenizer::TokenType;

/// Longest word (in bytes) that is ever looked up in the keyword table.
pub(crate) const MAX_WORD_LEN: usize = 31;

/// What the tokenizer should do when it sees a given byte at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    White,
    Operator1,
    Operator2,
    Char,
    String,
    Hash,
    Money,
    Dash,
    Number,
    Slash,
    Backslash,
    Word,
    BWord,
    BString,
    EString,
    NQString,
    QString,
    UString,
    XString,
    Tick,
    Var,
    Other,
}

const fn classify(b: u8) -> CharClass {
    match b {
        0..=32 | 127 | 160 => CharClass::White,
        b'!' | b'&' | b'*' | b':' | b'<' | b'=' | b'>' | b'|' => CharClass::Operator2,
        b'%' | b'+' | b'^' | b'~' => CharClass::Operator1,
        b'"' | b'\'' => CharClass::String,
        b'#' => CharClass::Hash,
        b'$' => CharClass::Money,
        b'(' | b')' | b',' | b';' | b'{' | b'}' => CharClass::Char,
        b'-' => CharClass::Dash,
        b'.' | b'0'..=b'9' => CharClass::Number,
        b'/' => CharClass::Slash,
        b'?' | b']' => CharClass::Other,
        b'@' => CharClass::Var,
        b'[' => CharClass::BWord,
        b'\\' => CharClass::Backslash,
        b'`' => CharClass::Tick,
        b'B' | b'b' => CharClass::BString,
        b'E' | b'e' => CharClass::EString,
        b'N' | b'n' => CharClass::NQString,
        b'Q' | b'q' => CharClass::QString,
        b'U' | b'u' => CharClass::UString,
        b'X' | b'x' => CharClass::XString,
        _ => CharClass::Word,
    }
}

const fn build_char_map() -> [CharClass; 256] {
    let mut map = [CharClass::Word; 256];
    let mut i = 0;
    while i < 256 {
        map[i] = classify(i as u8);
        i += 1;
    }
    map
}

/// Dispatch table covering every possible input byte.
pub(crate) static CHAR_MAP: [CharClass; 256] = build_char_map();

#[inline]
pub(crate) fn char_class(b: u8) -> CharClass {
    CHAR_MAP[usize::from(b)]
}

/// Whitespace as far as comment and number boundaries are concerned.
#[inline]
pub(crate) fn is_white(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r' | 0xa0 | 0)
}

/// Bytes that terminate a bare word.
#[inline]
pub(crate) fn is_word_delim(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'['
            | b']'
            | b'{'
            | b'}'
            | b'<'
            | b'>'
            | b':'
            | b'\\'
            | b'?'
            | b'='
            | b'@'
            | b'!'
            | b'#'
            | b'~'
            | b'+'
            | b'-'
            | b'*'
            | b'/'
            | b'&'
            | b'|'
            | b'^'
            | b'%'
            | b'('
            | b')'
            | b','
            | b'\''
            | b';'
            | b'\t'
            | b'\n'
            | 0x0b
            | 0x0c
            | b'\r'
            | b'"'
            | 0xa0
            | 0
    )
}

/// Bytes that terminate a `@variable` name.
#[inline]
pub(crate) fn is_var_delim(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'<'
            | b'>'
            | b':'
            | b'\\'
            | b'?'
            | b'='
            | b'@'
            | b'!'
            | b'#'
            | b'~'
            | b'+'
            | b'-'
            | b'*'
            | b'/'
            | b'&'
            | b'|'
            | b'^'
            | b'%'
            | b'('
            | b')'
            | b','
            | b';'
            | b'\t'
            | b'\n'
            | 0x0b
            | 0x0c
            | b'\r'
            | b'\''
            | b'`'
            | b'"'
            | 0
    )
}

/// Two-byte operators, longest match wins over the single-byte form.
pub(crate) fn lookup_operator2(pair: [u8; 2]) -> Option<TokenType> {
    match &pair {
        b"&&" | b"||" => Some(TokenType::LogicOperator),
        b"!=" | b"<>" | b"<=" | b">=" | b"<<" | b">>" | b"::" | b":=" | b"!<" | b"!>" | b"!!"
        | b"!~" | b"~*" | b"*=" | b"+=" | b"-=" | b"/=" | b"%=" | b"&=" | b"|=" | b"^="
        | b"<@" | b"@>" | b"|/" | b"=*" | b"==" => Some(TokenType::Operator),
        _ => None,
    }
}

use TokenType::{
    Collate as A, Expression as E, Function as F, Group as B, Keyword as K,
    LogicOperator as L, Number as N1, Operator as O, SqlType as T, Tsql as TS, Union as U,
    Variable as V,
};

/// Words with a non-bareword classification. Multi-word entries are only
/// reachable through the folder, which joins adjacent words with one space.
const KEYWORDS: &[(&str, TokenType)] = &[
    // set operators
    ("UNION", U),
    ("UNION ALL", U),
    ("UNION DISTINCT", U),
    ("EXCEPT", U),
    ("EXCEPT ALL", U),
    ("INTERSECT", U),
    ("INTERSECT ALL", U),
    ("MINUS", U),
    // statement starters
    ("SELECT", E),
    ("SELECT ALL", E),
    ("SELECT DISTINCT", E),
    ("INSERT", E),
    ("INSERT INTO", E),
    ("UPDATE", E),
    ("DELETE", E),
    ("DELETE FROM", E),
    ("DECLARE", E),
    ("CASE", E),
    ("MERGE", E),
    ("SHOW", E),
    ("EXPLAIN", E),
    ("REPLACE INTO", E),
    // grouping clauses
    ("GROUP BY", B),
    ("ORDER BY", B),
    ("PARTITION BY", B),
    ("HAVING", B),
    ("LIMIT", B),
    // logic
    ("AND", L),
    ("OR", L),
    ("XOR", L),
    // word operators
    ("NOT", O),
    ("LIKE", O),
    ("NOT LIKE", O),
    ("ILIKE", O),
    ("RLIKE", O),
    ("NOT RLIKE", O),
    ("REGEXP", O),
    ("NOT REGEXP", O),
    ("SOUNDS LIKE", O),
    ("SIMILAR TO", O),
    ("IS", O),
    ("IS NOT", O),
    ("DIV", O),
    ("MOD", O),
    ("BETWEEN", O),
    ("NOT BETWEEN", O),
    ("ESCAPE", O),
    // keywords
    ("IN", K),
    ("NOT IN", K),
    ("IN BOOLEAN", K),
    ("IN BOOLEAN MODE", K),
    ("FROM", K),
    ("WHERE", K),
    ("INTO", K),
    ("INTO OUTFILE", K),
    ("INTO DUMPFILE", K),
    ("TABLE", K),
    ("AS", K),
    ("ON", K),
    ("USING", K),
    ("JOIN", K),
    ("INNER JOIN", K),
    ("CROSS JOIN", K),
    ("LEFT JOIN", K),
    ("RIGHT JOIN", K),
    ("LEFT OUTER", K),
    ("LEFT OUTER JOIN", K),
    ("RIGHT OUTER", K),
    ("RIGHT OUTER JOIN", K),
    ("FULL OUTER", K),
    ("FULL OUTER JOIN", K),
    ("NATURAL JOIN", K),
    ("STRAIGHT_JOIN", K),
    ("WHEN", K),
    ("THEN", K),
    ("ELSE", K),
    ("END", K),
    ("BEGIN", K),
    ("DROP", K),
    ("DROP TABLE", K),
    ("CREATE", K),
    ("ALTER", K),
    ("ALTER TABLE", K),
    ("TRUNCATE", K),
    ("TRUNCATE TABLE", K),
    ("RENAME", K),
    ("GRANT", K),
    ("REVOKE", K),
    ("EXEC", K),
    ("EXECUTE", K),
    ("WAITFOR", K),
    ("WAITFOR DELAY", K),
    ("WAITFOR TIME", K),
    ("SHUTDOWN", K),
    ("DESC", K),
    ("ASC", K),
    ("DISTINCT", K),
    ("ALL", K),
    ("ANY", K),
    ("SOME", K),
    ("VALUES", K),
    ("SET", K),
    ("TOP", K),
    ("OFFSET", K),
    ("FETCH", K),
    ("FOR UPDATE", K),
    ("WITH ROLLUP", K),
    ("CHARACTER SET", K),
    ("PROCEDURE", K),
    ("USE", K),
    // T-SQL control flow
    ("GOTO", TS),
    ("WHILE", TS),
    // literals
    ("NULL", N1),
    ("TRUE", N1),
    ("FALSE", N1),
    // pseudo-variables
    ("CURRENT_USER", V),
    ("CURRENT_DATE", V),
    ("CURRENT_TIME", V),
    ("CURRENT_TIMESTAMP", V),
    ("LOCALTIME", V),
    ("LOCALTIMESTAMP", V),
    ("SESSION_USER", V),
    ("SYSTEM_USER", V),
    // types
    ("INT", T),
    ("INTEGER", T),
    ("BIGINT", T),
    ("SMALLINT", T),
    ("TINYINT", T),
    ("MEDIUMINT", T),
    ("CHARACTER", T),
    ("NCHAR", T),
    ("VARCHAR", T),
    ("VARCHAR2", T),
    ("NVARCHAR", T),
    ("NVARCHAR2", T),
    ("TEXT", T),
    ("NTEXT", T),
    ("TINYTEXT", T),
    ("MEDIUMTEXT", T),
    ("LONGTEXT", T),
    ("BLOB", T),
    ("TINYBLOB", T),
    ("MEDIUMBLOB", T),
    ("LONGBLOB", T),
    ("BINARY", T),
    ("VARBINARY", T),
    ("BOOLEAN", T),
    ("BOOL", T),
    ("BIT", T),
    ("DECIMAL", T),
    ("DEC", T),
    ("NUMERIC", T),
    ("NUMBER", T),
    ("FLOAT", T),
    ("DOUBLE", T),
    ("DOUBLE PRECISION", T),
    ("REAL", T),
    ("DATE", T),
    ("DATETIME", T),
    ("TIME", T),
    ("TIMESTAMP", T),
    ("SIGNED", T),
    ("UNSIGNED", T),
    ("MONEY", T),
    ("SMALLMONEY", T),
    ("CLOB", T),
    ("NCLOB", T),
    ("SERIAL", T),
    ("BIGSERIAL", T),
    ("UNIQUEIDENTIFIER", T),
    ("SQL_VARIANT", T),
    ("XML", T),
    ("JSON", T),
    ("COLLATE", A),
    // functions
    ("ABS", F),
    ("ACOS", F),
    ("ADDDATE", F),
    ("AES_DECRYPT", F),
    ("AES_ENCRYPT", F),
    ("ANALYSE", F),
    ("ASCII", F),
    ("ASIN", F),
    ("ATAN", F),
    ("AVG", F),
    ("BENCHMARK", F),
    ("BIN", F),
    ("BIT_AND", F),
    ("BIT_COUNT", F),
    ("BIT_LENGTH", F),
    ("BIT_OR", F),
    ("CAST", F),
    ("CEIL", F),
    ("CEILING", F),
    ("CHAR", F),
    ("CHARINDEX", F),
    ("CHAR_LENGTH", F),
    ("CHARACTER_LENGTH", F),
    ("CHARSET", F),
    ("CHR", F),
    ("COALESCE", F),
    ("COERCIBILITY", F),
    ("COMPRESS", F),
    ("CONCAT", F),
    ("CONCAT_WS", F),
    ("CONNECTION_ID", F),
    ("CONV", F),
    ("CONVERT", F),
    ("COS", F),
    ("COT", F),
    ("COUNT", F),
    ("CRC32", F),
    ("CURDATE", F),
    ("CURTIME", F),
    ("DATEADD", F),
    ("DATEDIFF", F),
    ("DATE_FORMAT", F),
    ("DAYNAME", F),
    ("DB_ID", F),
    ("DB_NAME", F),
    ("DBMS_PIPE.RECEIVE_MESSAGE", F),
    ("DECODE", F),
    ("DEGREES", F),
    ("DES_DECRYPT", F),
    ("DES_ENCRYPT", F),
    ("ELT", F),
    ("ENCODE", F),
    ("ENCRYPT", F),
    ("EXISTS", F),
    ("EXP", F),
    ("EXPORT_SET", F),
    ("EXTRACT", F),
    ("EXTRACTVALUE", F),
    ("FIELD", F),
    ("FIND_IN_SET", F),
    ("FLOOR", F),
    ("FORMAT", F),
    ("FOUND_ROWS", F),
    ("FROM_BASE64", F),
    ("FROM_UNIXTIME", F),
    ("GET_LOCK", F),
    ("GETDATE", F),
    ("GREATEST", F),
    ("GROUP_CONCAT", F),
    ("GTID_SUBSET", F),
    ("HEX", F),
    ("HOST_NAME", F),
    ("IF", F),
    ("IFNULL", F),
    ("IIF", F),
    ("INET_ATON", F),
    ("INET_NTOA", F),
    ("INSTR", F),
    ("IS_SRVROLEMEMBER", F),
    ("ISNULL", F),
    ("JSON_EXTRACT", F),
    ("JSON_KEYS", F),
    ("LAST_INSERT_ID", F),
    ("LCASE", F),
    ("LEAST", F),
    ("LEFT", F),
    ("LEN", F),
    ("LENGTH", F),
    ("LN", F),
    ("LOAD_FILE", F),
    ("LOCATE", F),
    ("LOG", F),
    ("LOG10", F),
    ("LOG2", F),
    ("LOWER", F),
    ("LPAD", F),
    ("LTRIM", F),
    ("MAKE_SET", F),
    ("MASTER_POS_WAIT", F),
    ("MAX", F),
    ("MD5", F),
    ("MID", F),
    ("MIN", F),
    ("NAME_CONST", F),
    ("NOW", F),
    ("NULLIF", F),
    ("NVL", F),
    ("OBJECT_ID", F),
    ("OCT", F),
    ("OCTET_LENGTH", F),
    ("OPENDATASOURCE", F),
    ("OPENQUERY", F),
    ("OPENROWSET", F),
    ("ORD", F),
    ("PG_SLEEP", F),
    ("PI", F),
    ("POSITION", F),
    ("POW", F),
    ("POWER", F),
    ("QUOTE", F),
    ("RADIANS", F),
    ("RAND", F),
    ("RANDOMBLOB", F),
    ("RELEASE_LOCK", F),
    ("REPEAT", F),
    ("REPLACE", F),
    ("REVERSE", F),
    ("RIGHT", F),
    ("ROUND", F),
    ("ROW_COUNT", F),
    ("RPAD", F),
    ("RTRIM", F),
    ("SCHEMA", F),
    ("SHA", F),
    ("SHA1", F),
    ("SHA2", F),
    ("SIGN", F),
    ("SIN", F),
    ("SLEEP", F),
    ("SOUNDEX", F),
    ("SPACE", F),
    ("SP_EXECUTESQL", F),
    ("SQRT", F),
    ("STRCMP", F),
    ("STR_TO_DATE", F),
    ("SUBSTR", F),
    ("SUBSTRING", F),
    ("SUBSTRING_INDEX", F),
    ("SUM", F),
    ("SUSER_NAME", F),
    ("SYS_CONTEXT", F),
    ("SYSDATE", F),
    ("TAN", F),
    ("TO_BASE64", F),
    ("TO_CHAR", F),
    ("TRIM", F),
    ("UCASE", F),
    ("UNCOMPRESS", F),
    ("UNHEX", F),
    ("UPDATEXML", F),
    ("UPPER", F),
    ("USERENV", F),
    ("UTL_HTTP.REQUEST", F),
    ("UTL_INADDR.GET_HOST_ADDRESS", F),
    ("UTL_INADDR.GET_HOST_NAME", F),
    ("UUID", F),
    ("VERSION", F),
    ("XP_CMDSHELL", F),
];

static KEYWORD_MAP: OnceLock<HashMap<&'static [u8], TokenType>> = OnceLock::new();

fn keyword_map() -> &'static HashMap<&'static [u8], TokenType> {
    KEYWORD_MAP.get_or_init(|| {
        KEYWORDS
            .iter()
            .map(|&(word, token_type)| (word.as_bytes(), token_type))
            .collect()
    })
}

/// Case-insensitive keyword lookup. Words longer than [`MAX_WORD_LEN`]
/// are never keywords.
pub(crate) fn lookup_word(word: &[u8]) -> Option<TokenType> {
    if word.is_empty() || word.len() > MAX_WORD_LEN {
        return None;
    }
    let mut upper = [0u8; MAX_WORD_LEN];
    let upper = &mut upper[..word.len()];
    upper.copy_from_slice(word);
    upper.make_ascii_uppercase();
    keyword_map().get(&*upper).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_map_dispatch() {
        assert_eq!(char_class(b' '), CharClass::White);
        assert_eq!(char_class(0xa0), CharClass::White);
        assert_eq!(char_class(0x7f), CharClass::White);
        assert_eq!(char_class(0xc3), CharClass::Word);
        assert_eq!(char_class(b'\''), CharClass::String);
        assert_eq!(char_class(b'x'), CharClass::XString);
        assert_eq!(char_class(b'.'), CharClass::Number);
        assert_eq!(char_class(b'@'), CharClass::Var);
    }

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(lookup_word(b"select"), Some(TokenType::Expression));
        assert_eq!(lookup_word(b"UnIoN aLl"), Some(TokenType::Union));
        assert_eq!(lookup_word(b"or"), Some(TokenType::LogicOperator));
        assert_eq!(lookup_word(b"sleep"), Some(TokenType::Function));
        assert_eq!(lookup_word(b"hello"), None);
        assert_eq!(lookup_word(b""), None);
    }

    #[test]
    fn test_column_like_functions_stay_barewords() {
        for word in [&b"user"[..], b"database", b"password", b"user_id", b"user_name"] {
            assert_eq!(lookup_word(word), None);
        }
    }

    #[test]
    fn test_overlong_words_are_not_looked_up() {
        let long = [b'A'; MAX_WORD_LEN + 1];
        assert_eq!(lookup_word(&long), None);
    }

    #[test]
    fn test_operator_table() {
        assert_eq!(lookup_operator2(*b"||"), Some(TokenType::LogicOperator));
        assert_eq!(lookup_operator2(*b"<>"), Some(TokenType::Operator));
        assert_eq!(lookup_operator2(*b"=("), None);
    }
}
