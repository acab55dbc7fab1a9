//! Byte-level SQL tokenizer.
//!
//! [`SqliTokenizer`] walks the input once, dispatching on the byte under the
//! cursor. It never fails: unterminated strings and comments simply run to
//! the end of input.

use core::fmt;
use std::borrow::Cow;

use memchr::{memchr, memmem};

use super::sqli_data::{self, CharClass, MAX_WORD_LEN};
use super::{Dialect, SqliFlags};

/// Token kinds. Each kind maps to one fingerprint character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenType {
    #[default]
    None,
    Keyword,
    Union,
    Group,
    Expression,
    SqlType,
    Function,
    Bareword,
    Number,
    Variable,
    String,
    Operator,
    LogicOperator,
    Comment,
    Collate,
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,
    Dot,
    Comma,
    Colon,
    Semicolon,
    Tsql,
    Unknown,
    Evil,
    Backslash,
}

impl TokenType {
    /// Fingerprint code for this kind. `None` has no code and maps to `'\0'`.
    pub fn to_char(self) -> char {
        char::from(self.code())
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            TokenType::None => 0,
            TokenType::Keyword => b'k',
            TokenType::Union => b'U',
            TokenType::Group => b'B',
            TokenType::Expression => b'E',
            TokenType::SqlType => b't',
            TokenType::Function => b'f',
            TokenType::Bareword => b'n',
            TokenType::Number => b'1',
            TokenType::Variable => b'v',
            TokenType::String => b's',
            TokenType::Operator => b'o',
            TokenType::LogicOperator => b'&',
            TokenType::Comment => b'c',
            TokenType::Collate => b'A',
            TokenType::LeftParenthesis => b'(',
            TokenType::RightParenthesis => b')',
            TokenType::LeftBrace => b'{',
            TokenType::RightBrace => b'}',
            TokenType::Dot => b'.',
            TokenType::Comma => b',',
            TokenType::Colon => b':',
            TokenType::Semicolon => b';',
            TokenType::Tsql => b'T',
            TokenType::Unknown => b'?',
            TokenType::Evil => b'X',
            TokenType::Backslash => b'\\',
        }
    }

    /// Inverse of [`TokenType::to_char`].
    pub fn from_char(c: char) -> Option<Self> {
        let t = match c {
            'k' => TokenType::Keyword,
            'U' => TokenType::Union,
            'B' => TokenType::Group,
            'E' => TokenType::Expression,
            't' => TokenType::SqlType,
            'f' => TokenType::Function,
            'n' => TokenType::Bareword,
            '1' => TokenType::Number,
            'v' => TokenType::Variable,
            's' => TokenType::String,
            'o' => TokenType::Operator,
            '&' => TokenType::LogicOperator,
            'c' => TokenType::Comment,
            'A' => TokenType::Collate,
            '(' => TokenType::LeftParenthesis,
            ')' => TokenType::RightParenthesis,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            '.' => TokenType::Dot,
            ',' => TokenType::Comma,
            ':' => TokenType::Colon,
            ';' => TokenType::Semicolon,
            'T' => TokenType::Tsql,
            '?' => TokenType::Unknown,
            'X' => TokenType::Evil,
            '\\' => TokenType::Backslash,
            _ => return None,
        };
        Some(t)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Bounded copy of a token's source text.
///
/// Holds at most [`TokenValue::CAPACITY`] bytes; longer runs are cut at the
/// capacity boundary. Truncation never affects the token's type.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenValue {
    bytes: [u8; TokenValue::CAPACITY],
    len: u8,
}

impl TokenValue {
    pub const CAPACITY: usize = MAX_WORD_LEN;

    pub const fn empty() -> Self {
        Self {
            bytes: [0; Self::CAPACITY],
            len: 0,
        }
    }

    pub fn new(src: &[u8]) -> Self {
        let n = src.len().min(Self::CAPACITY);
        let mut bytes = [0; Self::CAPACITY];
        bytes[..n].copy_from_slice(&src[..n]);
        Self {
            bytes,
            // n <= 31
            len: n as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other)
    }
}

impl Default for TokenValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str_lossy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub token_type: TokenType,
    /// Byte offset of the token in the input.
    pub pos: usize,
    pub value: TokenValue,
    /// Opening quote, `None` for unquoted tokens and simulated quotes.
    pub str_open: Option<u8>,
    /// Closing quote, `None` when the literal ran off the end of input.
    pub str_close: Option<u8>,
    /// Number of leading `@` on a variable.
    pub count: u8,
}

impl Token {
    pub fn new(token_type: TokenType, pos: usize, src: &[u8]) -> Self {
        Self {
            token_type,
            pos,
            value: TokenValue::new(src),
            ..Self::default()
        }
    }

    fn from_byte(token_type: TokenType, pos: usize, b: u8) -> Self {
        Self::new(token_type, pos, &[b])
    }

    /// Stored (possibly truncated) length of the value.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// `+ - ! ~`, `!!` and `NOT`.
    pub fn is_unary_op(&self) -> bool {
        if self.token_type != TokenType::Operator {
            return false;
        }
        match self.value.as_bytes() {
            [b'+' | b'-' | b'!' | b'~'] | b"!!" => true,
            v if v.len() == 3 => v.eq_ignore_ascii_case(b"NOT"),
            _ => false,
        }
    }

    pub fn is_arithmetic_op(&self) -> bool {
        self.token_type == TokenType::Operator
            && matches!(
                self.value.as_bytes(),
                [b'-' | b'+' | b'~' | b'!' | b'/' | b'%' | b'*']
            )
    }
}

/// Counters collected while tokenizing one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentStats {
    /// `--` followed by whitespace or end of input.
    pub ddw: u32,
    /// `--` followed by anything else.
    pub ddx: u32,
    /// `/* */` block comments.
    pub c: u32,
    /// `/*!` conditional comments.
    pub mysql: u32,
    /// `#` seen.
    pub hash: u32,
    /// Tokens produced.
    pub tokens: u32,
}

pub struct SqliTokenizer<'a> {
    input: &'a [u8],
    flags: SqliFlags,
    pos: usize,
    in_comment: bool,
    stats: CommentStats,
}

impl<'a> SqliTokenizer<'a> {
    pub fn new(input: &'a [u8], flags: SqliFlags) -> Self {
        Self {
            input,
            flags: flags.normalized(),
            pos: 0,
            in_comment: false,
            stats: CommentStats::default(),
        }
    }

    /// Rewind to the start of input under new flags.
    pub fn reset(&mut self, flags: SqliFlags) {
        *self = Self::new(self.input, flags);
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn flags(&self) -> SqliFlags {
        self.flags
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn stats(&self) -> &CommentStats {
        &self.stats
    }

    /// Scan forward to the next token. Returns `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.input.is_empty() {
            return None;
        }

        if self.pos == 0 {
            if let Some(delim) = self.flags.quote_delimiter() {
                let token = self.parse_string_core(0, delim, 0);
                self.stats.tokens += 1;
                return Some(token);
            }
        }

        while self.pos < self.input.len() {
            let b = self.input[self.pos];
            if let Some(token) = self.dispatch(b) {
                self.stats.tokens += 1;
                return Some(token);
            }
        }
        None
    }

    fn dispatch(&mut self, b: u8) -> Option<Token> {
        match sqli_data::char_class(b) {
            CharClass::White => {
                self.pos += 1;
                None
            }
            CharClass::Operator1 => self.parse_operator1(),
            CharClass::Operator2 => self.parse_operator2(),
            CharClass::Char => self.parse_char(),
            CharClass::String => self.parse_string(),
            CharClass::Hash => self.parse_hash(),
            CharClass::Money => self.parse_money(),
            CharClass::Dash => self.parse_dash(),
            CharClass::Number => self.parse_number(),
            CharClass::Slash => self.parse_slash(),
            CharClass::Backslash => self.parse_backslash(),
            CharClass::Word => self.parse_word(),
            CharClass::BWord => self.parse_bword(),
            CharClass::BString => self.parse_prefixed_number(is_bin_digit),
            CharClass::XString => self.parse_prefixed_number(is_hex_digit),
            CharClass::EString => self.parse_estring(),
            CharClass::NQString => self.parse_nqstring(),
            CharClass::QString => self.parse_qstring_core(0),
            CharClass::UString => self.parse_ustring(),
            CharClass::Tick => Some(self.parse_tick()),
            CharClass::Var => self.parse_var(),
            CharClass::Other => {
                let pos = self.pos;
                self.pos += 1;
                Some(Token::from_byte(TokenType::Unknown, pos, self.input[pos]))
            }
        }
    }

    fn is_mysql(&self) -> bool {
        self.flags.dialect() == Dialect::Mysql
    }

    fn peek(&self, at: usize) -> Option<u8> {
        self.input.get(at).copied()
    }

    fn parse_operator1(&mut self) -> Option<Token> {
        let pos = self.pos;
        self.pos += 1;
        Some(Token::from_byte(TokenType::Operator, pos, self.input[pos]))
    }

    fn parse_operator2(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;

        if self.in_comment && s[pos..].starts_with(b"*/") {
            self.in_comment = false;
            self.pos = pos + 2;
            return None;
        }

        let Some(next) = self.peek(pos + 1) else {
            return self.parse_operator1();
        };

        if s[pos..].starts_with(b"<=>") {
            self.pos = pos + 3;
            return Some(Token::new(TokenType::Operator, pos, &s[pos..pos + 3]));
        }

        if let Some(token_type) = sqli_data::lookup_operator2([s[pos], next]) {
            self.pos = pos + 2;
            return Some(Token::new(token_type, pos, &s[pos..pos + 2]));
        }

        if s[pos] == b':' {
            self.pos = pos + 1;
            return Some(Token::from_byte(TokenType::Colon, pos, b':'));
        }
        self.parse_operator1()
    }

    fn parse_char(&mut self) -> Option<Token> {
        let pos = self.pos;
        let b = self.input[pos];
        let token_type = match b {
            b'(' => TokenType::LeftParenthesis,
            b')' => TokenType::RightParenthesis,
            b'{' => TokenType::LeftBrace,
            b'}' => TokenType::RightBrace,
            b',' => TokenType::Comma,
            b';' => TokenType::Semicolon,
            _ => TokenType::Unknown,
        };
        self.pos = pos + 1;
        Some(Token::from_byte(token_type, pos, b))
    }

    fn parse_eol_comment(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        match memchr(b'\n', &s[pos..]) {
            None => {
                self.pos = s.len();
                Some(Token::new(TokenType::Comment, pos, &s[pos..]))
            }
            Some(i) => {
                self.pos = pos + i + 1;
                Some(Token::new(TokenType::Comment, pos, &s[pos..pos + i]))
            }
        }
    }

    fn parse_hash(&mut self) -> Option<Token> {
        self.stats.hash += 1;
        if self.is_mysql() {
            return self.parse_eol_comment();
        }
        let pos = self.pos;
        self.pos += 1;
        Some(Token::from_byte(TokenType::Operator, pos, b'#'))
    }

    fn parse_dash(&mut self) -> Option<Token> {
        let pos = self.pos;
        if self.peek(pos + 1) == Some(b'-') {
            match self.peek(pos + 2) {
                None => {
                    self.stats.ddw += 1;
                    return self.parse_eol_comment();
                }
                Some(b) if sqli_data::is_white(b) => {
                    self.stats.ddw += 1;
                    return self.parse_eol_comment();
                }
                Some(_) => {
                    self.stats.ddx += 1;
                    if self.is_mysql() {
                        return self.parse_eol_comment();
                    }
                }
            }
        }
        // ANSI `--x` falls through here twice: once per minus sign.
        self.pos = pos + 1;
        Some(Token::from_byte(TokenType::Operator, pos, b'-'))
    }

    fn parse_slash(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        if self.peek(pos + 1) != Some(b'*') {
            return self.parse_operator1();
        }

        if self.peek(pos + 2) == Some(b'!') {
            self.stats.mysql += 1;
            if self.is_mysql() {
                self.in_comment = true;
                let start = pos + 3;
                let digits = s[start..]
                    .iter()
                    .take(5)
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                self.pos = start + digits;
                return None;
            }
        }

        self.stats.c += 1;
        let body = &s[pos + 2..];
        let (clen, token_type) = match memmem::find(body, b"*/") {
            None => (s.len() - pos, TokenType::Comment),
            Some(i) => {
                // a second opener before the close is PostgreSQL-style nesting
                let token_type = if memmem::find(&body[..=i], b"/*").is_some() {
                    TokenType::Evil
                } else {
                    TokenType::Comment
                };
                (i + 4, token_type)
            }
        };
        self.pos = pos + clen;
        Some(Token::new(token_type, pos, &s[pos..pos + clen]))
    }

    fn parse_backslash(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        if self.peek(pos + 1) == Some(b'N') {
            self.pos = pos + 2;
            return Some(Token::new(TokenType::Number, pos, &s[pos..pos + 2]));
        }
        self.pos = pos + 1;
        Some(Token::from_byte(TokenType::Backslash, pos, b'\\'))
    }

    /// Scans a literal whose body starts at `pos + offset`. An `offset` of 0
    /// is a simulated quote: the opening delimiter is assumed, not present.
    fn parse_string_core(&mut self, pos: usize, delim: u8, offset: usize) -> Token {
        let s = self.input;
        let start = pos + offset;
        let str_open = (offset > 0).then_some(delim);
        let mut search = start;

        loop {
            match memchr(delim, &s[search..]).map(|i| search + i) {
                None => {
                    self.pos = s.len();
                    let mut token = Token::new(TokenType::String, start, &s[start..]);
                    token.str_open = str_open;
                    return token;
                }
                Some(q) if is_backslash_escaped(&s[start..q]) => search = q + 1,
                Some(q) if s.get(q + 1) == Some(&delim) => search = q + 2,
                Some(q) => {
                    self.pos = q + 1;
                    let mut token = Token::new(TokenType::String, start, &s[start..q]);
                    token.str_open = str_open;
                    token.str_close = Some(delim);
                    return token;
                }
            }
        }
    }

    fn parse_string(&mut self) -> Option<Token> {
        let pos = self.pos;
        let delim = self.input[pos];
        Some(self.parse_string_core(pos, delim, 1))
    }

    /// `E'...'` and `N'...'`
    fn parse_estring(&mut self) -> Option<Token> {
        let pos = self.pos;
        if pos + 2 >= self.input.len() || self.input[pos + 1] != b'\'' {
            return self.parse_word();
        }
        Some(self.parse_string_core(pos, b'\'', 2))
    }

    /// `U&'...'`
    fn parse_ustring(&mut self) -> Option<Token> {
        let pos = self.pos;
        if self.peek(pos + 1) == Some(b'&') && self.peek(pos + 2) == Some(b'\'') {
            let mut token = self.parse_string_core(pos + 2, b'\'', 1);
            token.str_open = Some(b'u');
            if token.str_close == Some(b'\'') {
                token.str_close = Some(b'u');
            }
            return Some(token);
        }
        self.parse_word()
    }

    fn parse_nqstring(&mut self) -> Option<Token> {
        let pos = self.pos;
        if pos + 2 < self.input.len() && self.input[pos + 1] == b'\'' {
            return self.parse_estring();
        }
        self.parse_qstring_core(1)
    }

    /// Oracle `q'(...)'`, optionally prefixed by `n`.
    fn parse_qstring_core(&mut self, offset: usize) -> Option<Token> {
        let s = self.input;
        let pos = self.pos + offset;
        if !matches!(self.peek(pos), Some(b'q' | b'Q'))
            || pos + 2 >= s.len()
            || s[pos + 1] != b'\''
        {
            return self.parse_word();
        }

        let close = match s[pos + 2] {
            b if b < 33 => return self.parse_word(),
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            b'<' => b'>',
            b => b,
        };

        let start = pos + 3;
        let body = &s[start..];
        let mut token = match memmem::find(body, &[close, b'\'']) {
            None => {
                self.pos = s.len();
                Token::new(TokenType::String, start, body)
            }
            Some(i) => {
                self.pos = start + i + 2;
                let mut token = Token::new(TokenType::String, start, &body[..i]);
                token.str_close = Some(b'q');
                token
            }
        };
        token.str_open = Some(b'q');
        Some(token)
    }

    /// `b'0101'` and `x'beef'`: numbers when the body is well formed.
    fn parse_prefixed_number(&mut self, accept: fn(u8) -> bool) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        if pos + 2 >= s.len() || s[pos + 1] != b'\'' {
            return self.parse_word();
        }
        let wlen = s[pos + 2..].iter().take_while(|&&b| accept(b)).count();
        if self.peek(pos + 2 + wlen) != Some(b'\'') {
            return self.parse_word();
        }
        let end = pos + wlen + 3;
        self.pos = end;
        Some(Token::new(TokenType::Number, pos, &s[pos..end]))
    }

    /// `[tsql identifier]`
    fn parse_bword(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        let end = memchr(b']', &s[pos..]).map_or(s.len(), |i| pos + i + 1);
        self.pos = end;
        Some(Token::new(TokenType::Bareword, pos, &s[pos..end]))
    }

    fn parse_word(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        let wlen = s[pos..]
            .iter()
            .position(|&b| sqli_data::is_word_delim(b))
            .unwrap_or(s.len() - pos);
        let word = &s[pos..pos + wlen];

        // `SELECT.1` or `UNION`SELECT`: split after a leading keyword
        let value = TokenValue::new(word);
        for (i, &b) in value.as_bytes().iter().enumerate() {
            if b != b'.' && b != b'`' {
                continue;
            }
            match sqli_data::lookup_word(&word[..i]) {
                Some(token_type) if token_type != TokenType::Bareword => {
                    self.pos = pos + i;
                    return Some(Token::new(token_type, pos, &word[..i]));
                }
                _ => {}
            }
        }

        let token_type = if wlen <= MAX_WORD_LEN {
            sqli_data::lookup_word(word).unwrap_or(TokenType::Bareword)
        } else {
            TokenType::Bareword
        };
        self.pos = pos + wlen;
        Some(Token::new(token_type, pos, word))
    }

    /// Backtick identifier. MySQL treats these as names, unless the body is
    /// a known function.
    fn parse_tick(&mut self) -> Token {
        let mut token = self.parse_string_core(self.pos, b'`', 1);
        token.token_type = match sqli_data::lookup_word(token.value.as_bytes()) {
            Some(TokenType::Function) => TokenType::Function,
            _ => TokenType::Bareword,
        };
        token
    }

    fn parse_var(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        let mut pos1 = pos + 1;
        let mut count = 1;
        if self.peek(pos1) == Some(b'@') {
            pos1 += 1;
            count = 2;
        }

        let quoted = match self.peek(pos1) {
            Some(b'`') => {
                self.pos = pos1;
                Some(self.parse_tick())
            }
            Some(delim @ (b'\'' | b'"')) => Some(self.parse_string_core(pos1, delim, 1)),
            _ => None,
        };
        if let Some(mut token) = quoted {
            token.token_type = TokenType::Variable;
            token.count = count;
            return Some(token);
        }

        let xlen = s[pos1..]
            .iter()
            .position(|&b| sqli_data::is_var_delim(b))
            .unwrap_or(s.len() - pos1);
        let end = pos1 + xlen;
        self.pos = end;
        let mut token = Token::new(TokenType::Variable, pos, &s[pos..end]);
        token.count = count;
        Some(token)
    }

    /// `$1,000.00`, `$$string$$` and `$tag$string$tag$`.
    fn parse_money(&mut self) -> Option<Token> {
        let s = self.input;
        let pos = self.pos;
        if pos + 1 == s.len() {
            self.pos = s.len();
            return Some(Token::from_byte(TokenType::Bareword, pos, b'$'));
        }

        let xlen = s[pos + 1..]
            .iter()
            .take_while(|&&b| b.is_ascii_digit() || b == b'.' || b == b',')
            .count();

        if xlen == 1 && s[pos + 1] == b'.' {
            return self.parse_word();
        }
        if xlen > 0 {
            let end = pos + 1 + xlen;
            self.pos = end;
            return Some(Token::new(TokenType::Number, pos, &s[pos..end]));
        }

        let (tag_len, start) = if s[pos + 1] == b'$' {
            (2, pos + 2)
        } else {
            let alpha = s[pos + 1..]
                .iter()
                .take_while(|b| b.is_ascii_alphabetic())
                .count();
            if alpha == 0 || self.peek(pos + alpha + 1) != Some(b'$') {
                self.pos = pos + 1;
                return Some(Token::from_byte(TokenType::Bareword, pos, b'$'));
            }
            (alpha + 2, pos + alpha + 2)
        };

        let tag = &s[pos..pos + tag_len];
        let body = &s[start..];
        let mut token = match memmem::find(body, tag) {
            None => {
                self.pos = s.len();
                Token::new(TokenType::String, start, body)
            }
            Some(i) => {
                self.pos = start + i + tag_len;
                let mut token = Token::new(TokenType::String, start, &body[..i]);
                token.str_close = Some(b'$');
                token
            }
        };
        token.str_open = Some(b'$');
        Some(token)
    }

    fn parse_number(&mut self) -> Option<Token> {
        let s = self.input;
        let start = self.pos;

        if s[start] == b'0' {
            let accept: Option<fn(u8) -> bool> = match self.peek(start + 1) {
                Some(b'x' | b'X') => Some(is_hex_digit),
                Some(b'b' | b'B') => Some(is_bin_digit),
                _ => None,
            };
            if let Some(accept) = accept {
                let xlen = s[start + 2..].iter().take_while(|&&b| accept(b)).count();
                let token_type = if xlen == 0 {
                    TokenType::Bareword
                } else {
                    TokenType::Number
                };
                self.pos = start + 2 + xlen;
                return Some(Token::new(token_type, start, &s[start..self.pos]));
            }
        }

        let digits_from = |at: usize| s[at..].iter().take_while(|b| b.is_ascii_digit()).count();

        let mut pos = start + digits_from(start);
        if self.peek(pos) == Some(b'.') {
            pos += 1;
            pos += digits_from(pos);
            if pos - start == 1 {
                self.pos = pos;
                return Some(Token::from_byte(TokenType::Dot, start, b'.'));
            }
        }

        let mut have_e = false;
        let mut have_exp = false;
        if matches!(self.peek(pos), Some(b'e' | b'E')) {
            have_e = true;
            pos += 1;
            if matches!(self.peek(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            let exp = digits_from(pos);
            have_exp = exp > 0;
            pos += exp;
        }

        // Oracle float/double suffix, only when it cannot start a word
        if matches!(self.peek(pos), Some(b'd' | b'D' | b'f' | b'F')) {
            match self.peek(pos + 1) {
                None => pos += 1,
                Some(b) if sqli_data::is_white(b) || b == b';' => pos += 1,
                Some(b'u' | b'U') => pos += 1,
                Some(_) => {}
            }
        }

        let token_type = if have_e && !have_exp {
            TokenType::Bareword
        } else {
            TokenType::Number
        };
        self.pos = pos;
        Some(Token::new(token_type, start, &s[start..pos]))
    }
}

impl Iterator for SqliTokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

/// True when the run ends in an odd number of backslashes.
fn is_backslash_escaped(prefix: &[u8]) -> bool {
    prefix.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}
