//! Token definitions for the Quill language
//!
//! This module defines all token types used in lexical analysis.

use crate::error::{LexErrorKind, SourceLocation};
use std::fmt;

/// A token in the Quill language
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, lexeme: String, location: SourceLocation) -> Self {
        Self {
            token_type,
            lexeme,
            location,
        }
    }

    /// Lexical error carried by this token, if it is an error token
    pub fn error(&self) -> Option<LexErrorKind> {
        match self.token_type {
            TokenType::Error(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

/// Token types in the Quill language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Eof,
    Number,
    Operator(Operator),
    Identifier,
    Assign,
    Keyword(Keyword),
    String,
    Delimiter(Delimiter),
    Error(LexErrorKind),
}

/// Binary operators, including the relational ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Less,       // <
    Greater,    // >
    EqualEqual, // ==
}

impl Operator {
    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Less | Self::Greater | Self::EqualEqual => 1,
            Self::Plus | Self::Minus => 2,
            Self::Star | Self::Slash | Self::Percent => 3,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.precedence() == 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Less => "<",
            Self::Greater => ">",
            Self::EqualEqual => "==",
        }
    }
}

/// Single-character punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Semicolon,  // ;
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
}

impl Delimiter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ';' => Some(Self::Semicolon),
            '(' => Some(Self::LeftParen),
            ')' => Some(Self::RightParen),
            '{' => Some(Self::LeftBrace),
            '}' => Some(Self::RightBrace),
            ',' => Some(Self::Comma),
            _ => None,
        }
    }
}

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Int,
    Repeat,
    Until,
    While,
    Print,
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "if" => Some(Self::If),
            "int" => Some(Self::Int),
            "repeat" => Some(Self::Repeat),
            "until" => Some(Self::Until),
            "while" => Some(Self::While),
            "print" => Some(Self::Print),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Int => "int",
            Self::Repeat => "repeat",
            Self::Until => "until",
            Self::While => "while",
            Self::Print => "print",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "EOF"),
            Self::Number => write!(f, "NUMBER"),
            Self::Operator(_) => write!(f, "OPERATOR"),
            Self::Identifier => write!(f, "IDENTIFIER"),
            Self::Assign => write!(f, "ASSIGN"),
            Self::Keyword(_) => write!(f, "KEYWORD"),
            Self::String => write!(f, "STRING"),
            Self::Delimiter(_) => write!(f, "DELIMITER"),
            Self::Error(kind) => write!(f, "ERROR({})", kind),
        }
    }
}
