//! Type definitions
//!
//! This module defines the type system for Quill.

use std::fmt;

/// Type of a variable or expression. Comparisons also produce `Int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
        }
    }
}
