use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope: a flat map of names to values plus a link to the
/// enclosing scope. Chained `Rc<RefCell<Environment>>`s let a closure share
/// its defining scope with whatever called it without copying it.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize, start: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        let mut environment = start;
        for _ in 0..distance {
            let parent = environment.borrow().enclosing.clone()
                .expect("resolver-reported distance to match the runtime scope chain");
            environment = parent;
        }
        environment
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Assigns in the environment `distance` hops up from `self`. `self`
    /// must be wrapped in the same `Rc<RefCell<_>>` the caller holds, which
    /// is why this takes it explicitly rather than walking `self.enclosing`.
    pub fn assign_at(
        this: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Object,
    ) {
        let target = this.borrow().ancestor(distance, Rc::clone(this));
        target.borrow_mut().variables.insert(name.lexeme.clone(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(this: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let target = this.borrow().ancestor(distance, Rc::clone(this));
        let borrowed = target.borrow();
        borrowed.variables.get(&name.lexeme).cloned().ok_or_else(|| RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
