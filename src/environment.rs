// Lexical scope chain: variable bind/lookup/assign.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime_error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    // Stores or overwrites a binding in this frame only. Redeclaring an
    // existing name at the same scope is not an error; the later define
    // just overwrites the slot.
    pub fn define(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::undefined_variable(name))
    }

    // Like get, but mutates the found slot. Never creates a new binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::undefined_variable(name))
    }

    // Walks exactly `distance` enclosing links up from `env`. The resolver
    // computes `distance` from the static scope nesting, so by construction
    // it never runs past the frame that actually holds the binding.
    fn ancestor(env: Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = env;
        for _ in 0..distance {
            let next = environment
                .borrow()
                .enclosing
                .clone()
                .expect("resolved distance should not exceed the scope chain");
            environment = next;
        }
        environment
    }

    // Reads a binding the resolver has already proven exists exactly
    // `distance` frames up - no walk-until-found, no not-found case.
    pub fn get_at(env: Rc<RefCell<Environment>>, distance: usize, name: &str) -> Value {
        Self::ancestor(env, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .expect("resolver guarantees the binding exists at this depth")
    }

    pub fn assign_at(env: Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Value) {
        Self::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }
}
