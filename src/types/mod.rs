//! Type system module
//!
//! Quill has a single value type; this module names it.

pub mod type_def;

pub use type_def::Type;
