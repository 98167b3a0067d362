mod command;
mod expr;
mod token;

pub use command::tokenize;
pub use expr::{ExprLexError, ExprLexer, ExprToken, ExprTokenKind};
pub use token::{Token, TokenKind};
