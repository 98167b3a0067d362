//! General-purpose expression lexer.
//!
//! Reserved for a future scripting layer; the interactive command line goes
//! through [`super::command::tokenize`] instead and never reaches this code.
//! Unlike the command tokenizer this one understands quoted strings, number
//! literals, comparison operators and `#` comments, and tracks line/column
//! positions for diagnostics.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprTokenKind {
    Identifier,
    StringLiteral,
    NumberLiteral,
    Operator,   // + - * / %
    Assign,     // =
    Comparison, // == != < > <= >=
    LogicalAnd, // and
    LogicalOr,  // or
    Not,        // not
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Dot,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprToken {
    pub kind: ExprTokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl ExprToken {
    fn new(kind: ExprTokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        ExprToken {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprLexError {
    #[error("unexpected character '{0}' at {1}:{2}")]
    UnexpectedChar(char, usize, usize),
    #[error("unterminated string literal starting at {0}:{1}")]
    UnterminatedString(usize, usize),
}

pub struct ExprLexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl ExprLexer {
    pub fn new(input: &str) -> Self {
        ExprLexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<ExprToken>, ExprLexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == ExprTokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<ExprToken, ExprLexError> {
        self.skip_whitespace_and_comments();

        let (line, column) = (self.line, self.column);
        let Some(&c) = self.chars.get(self.pos) else {
            return Ok(ExprToken::new(ExprTokenKind::Eof, "", line, column));
        };

        if c == '"' || c == '\'' {
            return self.string_literal(c);
        }

        if c.is_ascii_digit() {
            let text = self.take_while(|c| c.is_ascii_digit());
            return Ok(ExprToken::new(
                ExprTokenKind::NumberLiteral,
                text,
                line,
                column,
            ));
        }

        if c.is_alphabetic() || c == '_' {
            let text = self.take_while(|c| c.is_alphanumeric() || c == '_');
            let kind = match text.as_str() {
                "and" => ExprTokenKind::LogicalAnd,
                "or" => ExprTokenKind::LogicalOr,
                "not" => ExprTokenKind::Not,
                _ => ExprTokenKind::Identifier,
            };
            return Ok(ExprToken::new(kind, text, line, column));
        }

        match c {
            '+' | '-' | '*' | '/' | '%' => {
                self.advance();
                Ok(ExprToken::new(ExprTokenKind::Operator, c, line, column))
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(ExprToken::new(ExprTokenKind::Comparison, "==", line, column))
                } else {
                    Ok(ExprToken::new(ExprTokenKind::Assign, "=", line, column))
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(ExprToken::new(ExprTokenKind::Comparison, "!=", line, column))
                } else {
                    Err(ExprLexError::UnexpectedChar('!', line, column))
                }
            }
            '<' | '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(ExprToken::new(
                        ExprTokenKind::Comparison,
                        format!("{c}="),
                        line,
                        column,
                    ))
                } else {
                    Ok(ExprToken::new(ExprTokenKind::Comparison, c, line, column))
                }
            }
            '(' => self.single(ExprTokenKind::LParen, c),
            ')' => self.single(ExprTokenKind::RParen, c),
            '{' => self.single(ExprTokenKind::LBrace, c),
            '}' => self.single(ExprTokenKind::RBrace, c),
            '[' => self.single(ExprTokenKind::LBracket, c),
            ']' => self.single(ExprTokenKind::RBracket, c),
            ':' => self.single(ExprTokenKind::Colon, c),
            ',' => self.single(ExprTokenKind::Comma, c),
            '.' => self.single(ExprTokenKind::Dot, c),
            '\n' => {
                self.pos += 1;
                self.line += 1;
                self.column = 1;
                Ok(ExprToken::new(ExprTokenKind::Newline, "\n", line, column))
            }
            other => Err(ExprLexError::UnexpectedChar(other, line, column)),
        }
    }

    fn single(&mut self, kind: ExprTokenKind, c: char) -> Result<ExprToken, ExprLexError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        Ok(ExprToken::new(kind, c, line, column))
    }

    fn string_literal(&mut self, quote: char) -> Result<ExprToken, ExprLexError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.chars.get(self.pos) {
                Some(&c) if c == quote => {
                    self.advance();
                    return Ok(ExprToken::new(
                        ExprTokenKind::StringLiteral,
                        text,
                        line,
                        column,
                    ));
                }
                // A literal may not span lines.
                Some('\n') | None => return Err(ExprLexError::UnterminatedString(line, column)),
                Some(&c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.get(self.pos) {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&c) = self.chars.get(self.pos) {
            if c == '#' {
                while let Some(&c) = self.chars.get(self.pos) {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<ExprTokenKind> {
        ExprLexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let tokens = ExprLexer::new("foo and bar_2 or not baz").tokenize().unwrap();
        let got: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (ExprTokenKind::Identifier, "foo"),
                (ExprTokenKind::LogicalAnd, "and"),
                (ExprTokenKind::Identifier, "bar_2"),
                (ExprTokenKind::LogicalOr, "or"),
                (ExprTokenKind::Not, "not"),
                (ExprTokenKind::Identifier, "baz"),
                (ExprTokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_literals_and_operators() {
        assert_eq!(
            kinds("x = 12 + 3 * 'ok'"),
            vec![
                ExprTokenKind::Identifier,
                ExprTokenKind::Assign,
                ExprTokenKind::NumberLiteral,
                ExprTokenKind::Operator,
                ExprTokenKind::NumberLiteral,
                ExprTokenKind::Operator,
                ExprTokenKind::StringLiteral,
                ExprTokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            kinds("a == b != c <= d > e"),
            vec![
                ExprTokenKind::Identifier,
                ExprTokenKind::Comparison,
                ExprTokenKind::Identifier,
                ExprTokenKind::Comparison,
                ExprTokenKind::Identifier,
                ExprTokenKind::Comparison,
                ExprTokenKind::Identifier,
                ExprTokenKind::Comparison,
                ExprTokenKind::Identifier,
                ExprTokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = ExprLexer::new("a\n  b").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!(tokens[1].kind, ExprTokenKind::Newline);
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a # trailing comment\nb"),
            vec![
                ExprTokenKind::Identifier,
                ExprTokenKind::Newline,
                ExprTokenKind::Identifier,
                ExprTokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = ExprLexer::new("x = \"oops").tokenize().unwrap_err();
        assert_eq!(err, ExprLexError::UnterminatedString(1, 5));
    }

    #[test]
    fn test_unexpected_character() {
        let err = ExprLexer::new("a ? b").tokenize().unwrap_err();
        assert_eq!(err, ExprLexError::UnexpectedChar('?', 1, 3));
    }

    #[test]
    fn test_bare_bang_is_rejected() {
        let err = ExprLexer::new("!x").tokenize().unwrap_err();
        assert_eq!(err, ExprLexError::UnexpectedChar('!', 1, 1));
    }
}
