use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environments are shared, not owned: a closure keeps its defining frame
/// alive for as long as the closure itself is reachable, so frames sit
/// behind `Rc<RefCell<...>>` and form a parent-linked chain rooted at the
/// program environment.
pub type SharedEnvironment = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<SharedEnvironment>,
}

impl Environment {
    /// The program environment: no enclosing frame.
    pub fn root() -> SharedEnvironment {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A new local frame nested inside the given outer one. Function bodies
    /// and the bodies of `if` / `while` / `for` each get one per entry.
    pub fn nested(enclosing: &SharedEnvironment) -> SharedEnvironment {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// A new variable is always declared in the current innermost frame.
    /// There is no hoisting into outer frames.
    pub fn define(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    /// Walks the chain outward; the first frame containing the name wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.enclosing
            .as_ref()
            .and_then(|outer| outer.borrow().get(name))
    }

    /// The key difference from `define` is that `assign` never creates: it
    /// mutates the frame where the name was originally found and reports
    /// whether any frame in the chain had it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => false,
        }
    }
}
