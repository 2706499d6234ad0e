//! Runtime shared by the interpreter and the Lua host: values, frames, errors and the
//! builtin operator table.

mod env;
mod errors;
mod map;
pub mod ops;
mod value;

pub use env::{Env, Frame};
pub use errors::{ErrorKind, RuntimeError};
pub use map::{MAX_KEY_LENGTH, OrderedMap};
pub use value::{
    Closure, Function, Kind, MapRef, NativeFn, NativeFunction, ScalarKey, SeqRef, Value,
    format_number,
};

/// Extra bindings installed before a program runs, in registration order.
#[derive(Clone, Default)]
pub struct Builtins {
    entries: Vec<(String, Value)>,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations of the same name replace earlier ones.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, value));
        self
    }

    pub fn function(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> &mut Self {
        let name = name.into();
        let value = Value::Function(Function::native(name.clone(), func));
        self.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install every entry into `frame`.
    pub fn install(&self, frame: &Frame) {
        for (name, value) in &self.entries {
            frame.declare(name.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, Value)> for Builtins {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut builtins = Builtins::new();
        for (name, value) in iter {
            builtins.insert(name, value);
        }
        builtins
    }
}
