//! Token folding.
//!
//! Folding pulls tokens from the tokenizer into a fixed six-slot window and
//! collapses adjacent tokens into a canonical shape, so that padding like
//! `1 + - + 1` or `UNION ALL` reads the same as `1` or `UNION`. Only the
//! first [`MAX_TOKENS`] folded tokens matter; the sixth slot is lookahead.

use core::ops::{Index, IndexMut};

use tracing::trace;

use super::sqli_data::{lookup_word, MAX_WORD_LEN};
use super::tokenizer::{Token, TokenType, TokenValue};
use super::SqliState;

/// Significant tokens kept in a fingerprint.
pub const MAX_TOKENS: usize = 5;

/// Window slots: the significant tokens plus one lookahead.
pub const WINDOW_SIZE: usize = MAX_TOKENS + 1;

/// Fixed-capacity token window. Never grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenWindow {
    slots: [Token; WINDOW_SIZE],
}

impl TokenWindow {
    pub fn as_slice(&self) -> &[Token] {
        &self.slots
    }
}

impl Index<usize> for TokenWindow {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.slots[index]
    }
}

impl IndexMut<usize> for TokenWindow {
    fn index_mut(&mut self, index: usize) -> &mut Token {
        &mut self.slots[index]
    }
}

/// MySQL and T-SQL names that are columns unless called.
const COLUMN_LIKE_FUNCTIONS: &[&[u8]] = &[
    b"USER_ID",
    b"USER_NAME",
    b"DATABASE",
    b"PASSWORD",
    b"USER",
    b"CURRENT_USER",
    b"CURRENT_DATE",
    b"CURRENT_TIME",
    b"CURRENT_TIMESTAMP",
    b"LOCALTIME",
    b"LOCALTIMESTAMP",
];

fn is_column_like_function(token: &Token) -> bool {
    COLUMN_LIKE_FUNCTIONS
        .iter()
        .any(|name| token.value.eq_ignore_ascii_case(name))
}

fn is_word_like(token_type: TokenType) -> bool {
    matches!(
        token_type,
        TokenType::Keyword
            | TokenType::Bareword
            | TokenType::Operator
            | TokenType::Union
            | TokenType::Function
            | TokenType::Expression
            | TokenType::Tsql
            | TokenType::SqlType
    )
}

/// Joins two words with a space and keeps the result if it names a
/// multi-word keyword such as `UNION ALL` or `NOT IN`.
fn merge_words(a: &Token, b: &Token) -> Option<Token> {
    if !is_word_like(a.token_type)
        || !(is_word_like(b.token_type) || b.token_type == TokenType::LogicOperator)
    {
        return None;
    }
    let merged_len = a.len() + b.len() + 1;
    if merged_len > MAX_WORD_LEN {
        return None;
    }

    let mut buf = [0u8; MAX_WORD_LEN];
    buf[..a.len()].copy_from_slice(a.value.as_bytes());
    buf[a.len()] = b' ';
    buf[a.len() + 1..merged_len].copy_from_slice(b.value.as_bytes());
    let merged_text = &buf[..merged_len];

    let token_type = lookup_word(merged_text)?;
    let mut merged = *a;
    merged.token_type = token_type;
    merged.value = TokenValue::new(merged_text);
    Some(merged)
}

fn is_skipped_prefix(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::Comment | TokenType::LeftParenthesis | TokenType::SqlType
    ) || token.is_unary_op()
}

impl SqliState<'_> {
    /// Fills the window with folded tokens and returns how many are
    /// significant. Only the `{` + empty-word case may return one more than
    /// [`MAX_TOKENS`], and that result always holds an evil token.
    pub(crate) fn fold(&mut self) -> usize {
        use TokenType as T;

        let mut last_comment: Option<Token> = None;
        let mut left: usize = 0;

        loop {
            match self.tokenizer.next_token() {
                None => return 0,
                Some(token) if is_skipped_prefix(&token) => continue,
                Some(token) => {
                    self.window[0] = token;
                    break;
                }
            }
        }
        let mut pos: usize = 1;
        let mut more = true;

        loop {
            if pos >= MAX_TOKENS && self.is_short_expression() {
                if pos > MAX_TOKENS {
                    self.window[1] = self.window[MAX_TOKENS];
                    pos = 2;
                } else {
                    pos = 1;
                }
                left = 0;
            }

            if !more || left >= MAX_TOKENS {
                left = pos;
                break;
            }

            while more && pos <= MAX_TOKENS && pos - left < 2 {
                more = self.pull(&mut pos, &mut last_comment);
            }
            if pos - left < 2 {
                left = pos;
                continue;
            }

            let a = self.window[left];
            let b = self.window[left + 1];

            if a.token_type == T::String && b.token_type == T::String {
                pos -= 1;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Semicolon && b.token_type == T::Semicolon {
                pos -= 1;
                self.stats_folds += 1;
                continue;
            } else if matches!(a.token_type, T::Operator | T::LogicOperator)
                && (b.is_unary_op() || b.token_type == T::SqlType)
            {
                pos -= 1;
                self.stats_folds += 1;
                left = 0;
                continue;
            } else if a.token_type == T::LeftParenthesis && b.is_unary_op() {
                pos -= 1;
                self.stats_folds += 1;
                left = left.saturating_sub(1);
                continue;
            } else if let Some(merged) = merge_words(&a, &b) {
                self.window[left] = merged;
                pos -= 1;
                self.stats_folds += 1;
                left = left.saturating_sub(1);
                continue;
            } else if a.token_type == T::Semicolon
                && b.token_type == T::Function
                && b.value
                    .as_bytes()
                    .get(..2)
                    .is_some_and(|p| p.eq_ignore_ascii_case(b"IF"))
            {
                // T-SQL `; IF ...` is control flow, not the function
                self.window[left + 1].token_type = T::Tsql;
                continue;
            } else if matches!(a.token_type, T::Bareword | T::Variable)
                && b.token_type == T::LeftParenthesis
                && is_column_like_function(&a)
            {
                self.window[left].token_type = T::Function;
                continue;
            } else if a.token_type == T::Keyword
                && (a.value.eq_ignore_ascii_case(b"IN") || a.value.eq_ignore_ascii_case(b"NOT IN"))
            {
                self.window[left].token_type = if b.token_type == T::LeftParenthesis {
                    T::Operator
                } else {
                    T::Bareword
                };
                continue;
            } else if a.token_type == T::Operator
                && (a.value.eq_ignore_ascii_case(b"LIKE")
                    || a.value.eq_ignore_ascii_case(b"NOT LIKE"))
            {
                if b.token_type == T::LeftParenthesis {
                    self.window[left].token_type = T::Function;
                }
            } else if a.token_type == T::SqlType
                && matches!(
                    b.token_type,
                    T::Bareword
                        | T::Number
                        | T::SqlType
                        | T::LeftParenthesis
                        | T::Function
                        | T::Variable
                        | T::String
                )
            {
                self.window[left] = b;
                pos -= 1;
                self.stats_folds += 1;
                left = 0;
                continue;
            } else if a.token_type == T::Collate && b.token_type == T::Bareword {
                // collation names all carry an underscore
                if b.value.as_bytes().contains(&b'_') {
                    self.window[left + 1].token_type = T::SqlType;
                    left = 0;
                }
            } else if a.token_type == T::Backslash {
                if b.is_arithmetic_op() {
                    // T-SQL reads `\%1` as `0 % 1`
                    self.window[left].token_type = T::Number;
                } else {
                    self.window[left] = b;
                    pos -= 1;
                    self.stats_folds += 1;
                }
                left = 0;
                continue;
            } else if (a.token_type == T::LeftParenthesis && b.token_type == T::LeftParenthesis)
                || (a.token_type == T::RightParenthesis && b.token_type == T::RightParenthesis)
            {
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::LeftBrace && b.token_type == T::Bareword {
                // MySQL accepts `{ ``.``.id }` and nothing else like it
                if b.is_empty() {
                    self.window[left + 1].token_type = T::Evil;
                    trace!(pos = b.pos, "empty word after brace");
                    return left + 2;
                }
                // ODBC `{foo expr}`: drop `{ foo`
                left = 0;
                pos -= 2;
                self.stats_folds += 2;
                continue;
            } else if b.token_type == T::RightBrace {
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            }

            while more && pos <= MAX_TOKENS && pos - left < 3 {
                more = self.pull(&mut pos, &mut last_comment);
            }
            if pos - left < 3 {
                left = pos;
                continue;
            }

            let a = self.window[left];
            let b = self.window[left + 1];
            let c = self.window[left + 2];

            if a.token_type == T::Number && b.token_type == T::Operator && c.token_type == T::Number {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Operator
                && b.token_type != T::LeftParenthesis
                && c.token_type == T::Operator
            {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::LogicOperator && c.token_type == T::LogicOperator {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Variable
                && b.token_type == T::Operator
                && matches!(c.token_type, T::Variable | T::Number | T::Bareword)
            {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if matches!(a.token_type, T::Bareword | T::Number)
                && b.token_type == T::Operator
                && matches!(c.token_type, T::Number | T::Bareword)
            {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if matches!(a.token_type, T::Bareword | T::Number | T::Variable | T::String)
                && b.token_type == T::Operator
                && b.value.as_bytes() == b"::"
                && c.token_type == T::SqlType
            {
                pos -= 2;
                left = 0;
                self.stats_folds += 2;
                continue;
            } else if matches!(a.token_type, T::Bareword | T::Number | T::String | T::Variable)
                && b.token_type == T::Comma
                && matches!(c.token_type, T::Number | T::Bareword | T::String | T::Variable)
            {
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if matches!(a.token_type, T::Expression | T::Group | T::Comma)
                && b.is_unary_op()
                && c.token_type == T::LeftParenthesis
            {
                // `SELECT - (` → `SELECT (`
                self.window[left + 1] = c;
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if matches!(a.token_type, T::Keyword | T::Expression | T::Group)
                && b.is_unary_op()
                && matches!(
                    c.token_type,
                    T::Number | T::Bareword | T::Variable | T::String | T::Function
                )
            {
                // `SELECT -1` → `SELECT 1`
                self.window[left + 1] = c;
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Comma
                && b.is_unary_op()
                && matches!(c.token_type, T::Number | T::Bareword | T::Variable | T::String)
            {
                // `1,-1` → `1`; back up so the comma rule can fire again.
                // pos - left >= 3 here.
                self.window[left + 1] = c;
                left = 0;
                pos -= 3;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Comma && b.is_unary_op() && c.token_type == T::Function {
                self.window[left + 1] = c;
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Bareword
                && b.token_type == T::Dot
                && c.token_type == T::Bareword
            {
                // schema.table
                pos -= 2;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Expression
                && b.token_type == T::Dot
                && c.token_type == T::Bareword
            {
                self.window[left + 1] = c;
                pos -= 1;
                left = 0;
                self.stats_folds += 1;
                continue;
            } else if a.token_type == T::Function
                && b.token_type == T::LeftParenthesis
                && c.token_type != T::RightParenthesis
                && a.value.eq_ignore_ascii_case(b"USER")
            {
                // USER() takes no arguments, so USER(x) is something else
                self.window[left].token_type = T::Bareword;
            }

            left += 1;
        }

        if left < MAX_TOKENS {
            if let Some(comment) = last_comment {
                self.window[left] = comment;
                left += 1;
            }
        }
        left.min(MAX_TOKENS)
    }

    /// Tokenizes into `window[pos]`. Comments are held aside and do not
    /// advance `pos`. Returns false at end of input.
    fn pull(&mut self, pos: &mut usize, last_comment: &mut Option<Token>) -> bool {
        let Some(token) = self.tokenizer.next_token() else {
            return false;
        };
        if token.token_type == TokenType::Comment {
            *last_comment = Some(token);
        } else {
            *last_comment = None;
            self.window[*pos] = token;
            *pos += 1;
        }
        true
    }

    /// Five-token shapes such as `1,(1)` or `n)o(n` that stand for one value.
    fn is_short_expression(&self) -> bool {
        use TokenType as T;
        let w = &self.window;
        let t = |i: usize| w[i].token_type;

        (t(0) == T::Number
            && matches!(t(1), T::Operator | T::Comma)
            && t(2) == T::LeftParenthesis
            && t(3) == T::Number
            && t(4) == T::RightParenthesis)
            || (t(0) == T::Bareword
                && t(1) == T::Operator
                && t(2) == T::LeftParenthesis
                && matches!(t(3), T::Bareword | T::Number)
                && t(4) == T::RightParenthesis)
            || (t(0) == T::Number
                && t(1) == T::RightParenthesis
                && t(2) == T::Comma
                && t(3) == T::LeftParenthesis
                && t(4) == T::Number)
            || (t(0) == T::Bareword
                && t(1) == T::RightParenthesis
                && t(2) == T::Operator
                && t(3) == T::LeftParenthesis
                && t(4) == T::Bareword)
    }
}
