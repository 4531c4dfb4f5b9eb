//! Scoped symbol table
//!
//! One map per active scope, innermost last. Leaving a scope drops its map,
//! which evicts every symbol declared inside it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::types::Type;

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    /// Nesting depth of the declaring scope (root is 0)
    pub scope_level: usize,
    pub line_declared: usize,
    pub initialized: bool,
}

/// Stack of scopes mapping names to symbols
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Level of the innermost scope
    pub fn current_scope(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!(level = self.current_scope(), "entered scope");
    }

    /// Leave the innermost scope. The root scope is never removed.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                trace!(level = self.scopes.len(), evicted = scope.len(), "exited scope");
            }
        }
    }

    /// Declare `name` in the current scope, uninitialized. Returns the
    /// existing symbol instead if the name is already taken at this level.
    pub fn declare(&mut self, name: &str, ty: Type, line: usize) -> Result<(), &Symbol> {
        let scope_level = self.current_scope();

        match self.scopes[scope_level].entry(name.to_string()) {
            Entry::Occupied(existing) => Err(existing.into_mut()),
            Entry::Vacant(slot) => {
                slot.insert(Symbol {
                    name: name.to_string(),
                    ty,
                    scope_level,
                    line_declared: line,
                    initialized: false,
                });
                Ok(())
            }
        }
    }

    /// Find `name` in the innermost scope that declares it
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }

    /// Find `name` in the current scope only
    pub fn lookup_current_scope(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    pub fn len(&self) -> usize {
        self.scopes.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
