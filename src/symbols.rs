use crate::common::Scope;
use crate::value::Value;
use std::collections::{BTreeSet, HashMap};

/// Variable storage owned by the host. Each [`Scope`] is a separate namespace.
pub trait SymbolTable {
    fn get(&self, scope: Scope, name: &str) -> Option<&Value>;

    fn set(&mut self, scope: Scope, name: &str, value: Value);

    fn names(&self, scope: Scope) -> BTreeSet<String>;

    fn contains(&self, scope: Scope, name: &str) -> bool {
        self.get(scope, name).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultSymbolTable {
    scopes: [HashMap<String, Value>; 3],
}

impl DefaultSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, scope: Scope) -> usize {
        self.scopes[scope.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.iter().all(HashMap::is_empty)
    }

    pub fn clear(&mut self, scope: Scope) {
        self.scopes[scope.index()].clear();
    }
}

impl SymbolTable for DefaultSymbolTable {
    fn get(&self, scope: Scope, name: &str) -> Option<&Value> {
        self.scopes[scope.index()].get(name)
    }

    fn set(&mut self, scope: Scope, name: &str, value: Value) {
        self.scopes[scope.index()].insert(name.to_owned(), value);
    }

    fn names(&self, scope: Scope) -> BTreeSet<String> {
        self.scopes[scope.index()].keys().cloned().collect()
    }
}
