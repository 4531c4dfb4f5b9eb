//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST).

pub mod ast;
pub mod parser;
pub mod printer;

pub use ast::{Expr, Program, Stmt, FACTORIAL};
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use printer::render;
