//! Variable binding and scoping.
//!
//! A [`VariableStore`] is the host-facing storage contract. The evaluator
//! reads variables through the [`Environment`] trait, implemented by the root
//! [`EvaluationContext`] and by [`EvaluationStack`], which chains a scope of
//! local declarations onto a parent environment without copying it.

use el_types::{ElError, ElResult, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Stores
// ══════════════════════════════════════════════════════════════════════════════

/// Host-supplied variable storage.
pub trait VariableStore: Send {
    /// The value bound to `name`, or [`Value::UNDEFINED`] when unbound.
    fn value(&self, name: &str) -> Value;

    /// All bound names.
    fn names(&self) -> BTreeSet<String>;

    fn contains(&self, name: &str) -> bool {
        self.names().contains(name)
    }

    /// Bind `name`. Whether redeclaring an existing name is allowed is up to
    /// the store.
    fn declare(&mut self, name: &str, value: Value) -> ElResult<()>;

    /// Rebind an already declared `name`.
    fn assign(&mut self, name: &str, value: Value) -> ElResult<()>;

    fn clone_store(&self) -> Box<dyn VariableStore>;
}

/// Map-backed store. Redeclaring a name overwrites it.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: BTreeMap<String, Value>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl VariableStore for VariableTable {
    fn value(&self, name: &str) -> Value {
        self.variables.get(name).cloned().unwrap_or(Value::UNDEFINED)
    }

    fn names(&self) -> BTreeSet<String> {
        self.variables.keys().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    fn declare(&mut self, name: &str, value: Value) -> ElResult<()> {
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    fn assign(&mut self, name: &str, value: Value) -> ElResult<()> {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ElError::evaluation(format!(
                "cannot assign to undeclared variable '{name}'"
            ))),
        }
    }

    fn clone_store(&self) -> Box<dyn VariableStore> {
        Box::new(self.clone())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Environments
// ══════════════════════════════════════════════════════════════════════════════

/// What the evaluator needs from a scope.
pub trait Environment {
    /// The value of `name`, or [`Value::UNDEFINED`] when unbound. Never fails.
    fn variable_value(&self, name: &str) -> Value;

    /// Declare `name` in this scope.
    fn declare_variable(&mut self, name: &str, value: Value) -> ElResult<()>;
}

/// Root scope backed by a [`VariableStore`].
pub struct EvaluationContext {
    store: Box<dyn VariableStore>,
}

impl EvaluationContext {
    /// An empty context backed by a [`VariableTable`].
    pub fn new() -> Self {
        Self::with_store(VariableTable::new())
    }

    pub fn with_store(store: impl VariableStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn store(&self) -> &dyn VariableStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn VariableStore {
        self.store.as_mut()
    }

    /// Whether `name` is bound in this scope.
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EvaluationContext {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone_store(),
        }
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("names", &self.store.names())
            .finish()
    }
}

impl Environment for EvaluationContext {
    fn variable_value(&self, name: &str) -> Value {
        self.store.value(name)
    }

    fn declare_variable(&mut self, name: &str, value: Value) -> ElResult<()> {
        self.store.declare(name, value)
    }
}

/// A nested scope. Declarations land in the local scope and shadow the
/// parent; lookups fall back to the parent. The parent is only borrowed.
pub struct EvaluationStack<'a> {
    next: &'a dyn Environment,
    locals: EvaluationContext,
}

impl<'a> EvaluationStack<'a> {
    pub fn new(next: &'a dyn Environment) -> Self {
        Self {
            next,
            locals: EvaluationContext::new(),
        }
    }

    /// The local scope only.
    pub fn locals(&self) -> &EvaluationContext {
        &self.locals
    }
}

impl Environment for EvaluationStack<'_> {
    fn variable_value(&self, name: &str) -> Value {
        if self.locals.contains(name) {
            self.locals.variable_value(name)
        } else {
            self.next.variable_value(name)
        }
    }

    fn declare_variable(&mut self, name: &str, value: Value) -> ElResult<()> {
        self.locals.declare_variable(name, value)
    }
}
