//! Abstract Syntax Tree definitions
//!
//! This module defines the AST node types for the Quill language. Every node
//! keeps the token that anchors it in the source, and owns its children
//! outright, so a whole program is released by dropping its root.

use crate::error::SourceLocation;
use crate::lexer::{Operator, Token};

/// Name of the only built-in function
pub const FACTORIAL: &str = "factorial";

/// Root AST node representing a complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in execution order
    pub statements: Vec<Stmt>,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration: int x;
    VarDecl {
        name: Token,
    },

    /// Assignment: x = expr;
    Assign {
        target: Token,
        value: Expr,
    },

    /// Print statement: print expr;
    Print {
        token: Token,
        value: Expr,
    },

    /// Bare call used as a statement: factorial(3);
    Expression {
        expr: Expr,
    },

    /// If statement: if (cond) stmt
    If {
        token: Token,
        condition: Expr,
        body: Box<Stmt>,
    },

    /// While loop: while (cond) stmt
    While {
        token: Token,
        condition: Expr,
        body: Box<Stmt>,
    },

    /// Repeat loop: repeat stmt until (cond)
    RepeatUntil {
        token: Token,
        body: Box<Stmt>,
        condition: Expr,
    },

    /// Block statement: { stmt* }
    Block {
        token: Token,
        statements: Vec<Stmt>,
    },
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal, possibly negative
    Number {
        token: Token,
        value: i64,
    },

    /// Variable reference
    Identifier {
        token: Token,
    },

    /// Function call: name(args)
    FunctionCall {
        name: Token,
        arguments: Vec<Expr>,
    },

    /// Arithmetic operation: + - * / %
    BinaryOp {
        operator: Operator,
        token: Token,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Relational operation: < > ==
    Comparison {
        operator: Operator,
        token: Token,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary minus on anything but a literal
    Negate {
        token: Token,
        operand: Box<Expr>,
    },
}

impl Expr {
    /// Build a binary node, picking `Comparison` for relational operators
    pub fn binary(operator: Operator, token: Token, left: Expr, right: Expr) -> Self {
        let left = Box::new(left);
        let right = Box::new(right);
        if operator.is_comparison() {
            Expr::Comparison {
                operator,
                token,
                left,
                right,
            }
        } else {
            Expr::BinaryOp {
                operator,
                token,
                left,
                right,
            }
        }
    }

    /// Token anchoring this expression
    pub fn token(&self) -> &Token {
        match self {
            Expr::Number { token, .. }
            | Expr::Identifier { token }
            | Expr::FunctionCall { name: token, .. }
            | Expr::BinaryOp { token, .. }
            | Expr::Comparison { token, .. }
            | Expr::Negate { token, .. } => token,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.token().location
    }
}
