//! Lexical analysis module
//!
//! This module handles tokenization of Quill source code.

pub mod token;
pub mod scanner;

pub use token::{Token, TokenType, Keyword, Operator, Delimiter};
pub use scanner::{Lexer, MAX_LEXEME_LEN};
