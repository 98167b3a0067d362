#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,          // Command name or argument
    Pipe,          // |
    Redirect,      // >
    Background,    // &
    Semicolon,     // ;
    And,           // &&
    Or,            // ||
    SubshellOpen,  // (
    SubshellClose, // )
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}
