//! The variable store of a running program

use crate::value::Value;
use indexmap::IndexMap;
use thiserror::Error;

/// A variable's current value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    value: Value,
    constant: bool,
}

impl Binding {
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether this binding was declared `const`
    pub fn is_constant(&self) -> bool {
        self.constant
    }
}

/// A flat mapping from names to values, kept in declaration order.
///
/// There is no lexical scoping, every name has exactly one binding.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    bindings: IndexMap<String, Binding>,
}

impl Environment {
    /// Creates a new, empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable. Declaring an existing name replaces its binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value, constant: bool) {
        self.bindings
            .insert(name.into(), Binding { value, constant });
    }

    /// Replaces the value of an existing, non-constant variable
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvError> {
        let binding = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| EnvError::Undefined(name.to_string()))?;
        if binding.constant {
            return Err(EnvError::Constant(name.to_string()));
        }
        binding.value = value;
        Ok(())
    }

    /// Gets a copy of a variable's value
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).map(|binding| binding.value.clone())
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Iterates over every binding in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// An error occurred while assigning to a variable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("undefined variable {0:?}")]
    Undefined(String),
    #[error("can not assign to constant {0:?}")]
    Constant(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        assert!(env.is_empty());
        env.define("x", Value::Int(1), false);
        assert_eq!(env.get("x"), Some(Value::Int(1)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_assign() {
        let mut env = Environment::new();
        env.define("x", Value::Int(1), false);
        env.assign("x", Value::from("two")).unwrap();
        assert_eq!(env.get("x"), Some(Value::from("two")));
        assert_eq!(
            env.assign("y", Value::Null),
            Err(EnvError::Undefined("y".to_string()))
        );
    }

    #[test]
    fn test_constants_are_protected() {
        let mut env = Environment::new();
        env.define("pi", Value::Double(2.5), true);
        assert_eq!(
            env.assign("pi", Value::Int(3)),
            Err(EnvError::Constant("pi".to_string()))
        );
        assert_eq!(env.get("pi"), Some(Value::Double(2.5)));
        assert!(env.binding("pi").unwrap().is_constant());
    }

    #[test]
    fn test_redeclaration_keeps_order() {
        let mut env = Environment::new();
        env.define("a", Value::Int(1), false);
        env.define("b", Value::Int(2), false);
        env.define("a", Value::Int(3), true);
        let names = env.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("a"), Some(Value::Int(3)));
    }
}
