//! Lexical frames: a binding table plus a link to the enclosing frame

use super::{RuntimeError, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Env = Rc<Frame>;

#[derive(Default)]
pub struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Env>,
}

impl Frame {
    pub fn root() -> Env {
        Rc::new(Frame::default())
    }

    pub fn child(parent: &Env) -> Env {
        Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Walk the chain outwards.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            frame = frame.parent.as_deref()?;
        }
    }

    /// Membership in this frame only.
    pub fn has_own(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn declare(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Overwrite the binding in the nearest frame that owns `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut frame = self;
        loop {
            if frame.has_own(name) {
                frame.bindings.borrow_mut().insert(name.to_string(), value);
                return Ok(());
            }
            frame = match frame.parent.as_deref() {
                Some(parent) => parent,
                None => {
                    return Err(RuntimeError::reference(format!(
                        "tried setting an undefined variable: {name} using = []"
                    )));
                }
            };
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }
}
