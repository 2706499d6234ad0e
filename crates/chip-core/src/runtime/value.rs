use super::{Env, OrderedMap, RuntimeError};
use crate::ast::Expr;
use crate::sequence::Sequence;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type SeqRef = Rc<RefCell<Sequence<Value>>>;
pub type MapRef = Rc<RefCell<OrderedMap>>;

/// Runtime values
#[derive(Clone)]
pub enum Value {
    Void,
    Number(f64),
    String(String),
    Sequence(SeqRef),
    Map(MapRef),
    Function(Function),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Void,
    Number,
    String,
    Sequence,
    Map,
    Function,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Void => "void",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Sequence => ".: []",
            Kind::Map => ":: []",
            Kind::Function => "-> []",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hashable stand-in for a value under scalar equality: numbers by value (with every
/// NaN equal, and `-0` and Void equal to `0`), strings by content, everything else by
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Number(u64),
    String(String),
    Identity(usize),
}

impl Value {
    pub fn sequence(items: Sequence<Value>) -> Self {
        Value::Sequence(Rc::new(RefCell::new(items)))
    }

    pub fn map(map: OrderedMap) -> Self {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    pub fn bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Void => Kind::Void,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Sequence(_) => Kind::Sequence,
            Value::Map(_) => Kind::Map,
            Value::Function(_) => Kind::Function,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Sequence(_) | Value::Map(_) | Value::Function(_) => true,
        }
    }

    /// Numeric view of an operand; Void reads as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Void => Some(0.0),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The equality behind `==`, set algebra and identity checks. Void is zero.
    pub fn scalar_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Void, Value::Number(n)) | (Value::Number(n), Value::Void) => *n == 0.0,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.identity() == b.identity(),
            _ => false,
        }
    }

    /// Structural equality: recurses into sequences and maps (key order ignored) and
    /// treats NaN as equal to itself.
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Sequence(a), Value::Sequence(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.deep_eq(y)))
            }
            _ => self.scalar_eq(other),
        }
    }

    pub fn scalar_key(&self) -> ScalarKey {
        match self {
            Value::Void => ScalarKey::Number(0f64.to_bits()),
            Value::Number(n) if n.is_nan() => ScalarKey::Number(f64::NAN.to_bits()),
            Value::Number(n) if *n == 0.0 => ScalarKey::Number(0f64.to_bits()),
            Value::Number(n) => ScalarKey::Number(n.to_bits()),
            Value::String(s) => ScalarKey::String(s.clone()),
            Value::Sequence(s) => ScalarKey::Identity(Rc::as_ptr(s) as *const () as usize),
            Value::Map(m) => ScalarKey::Identity(Rc::as_ptr(m) as *const () as usize),
            Value::Function(f) => ScalarKey::Identity(f.identity()),
        }
    }

    /// Display form with strings quoted, as used for nested elements.
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }
}

/// Numbers print without a trailing `.0`, and non-finite values use their
/// conventional names.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Sequence(items) => {
                let items: Vec<String> = items.borrow().iter().map(Value::repr).collect();
                write!(f, ".:[{}]", items.join("; "))
            }
            Value::Map(map) => {
                let entries: Vec<String> = map
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("\"{k}\"; {}", v.repr()))
                    .collect();
                write!(f, "::[{}]", entries.join("; "))
            }
            Value::Function(_) => f.write_str("-> []"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Function(func) => write!(f, "{func:?}"),
            other => f.write_str(&other.repr()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::sequence(Sequence::from_vec(items))
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::map(map)
    }
}

pub type NativeFn = dyn Fn(&[Value], Option<&Value>) -> Result<Value, RuntimeError>;

/// Anything a program can call
#[derive(Clone)]
pub enum Function {
    Closure(Rc<Closure>),
    Native(Rc<NativeFunction>),
    /// A callable read out of a map, remembering that map as its receiver.
    Bound {
        receiver: MapRef,
        target: Rc<Function>,
    },
}

pub struct Closure {
    pub params: Vec<String>,
    pub body: Rc<Expr>,
    pub env: Env,
}

pub struct NativeFunction {
    pub name: String,
    /// Stable identity for callables owned by a foreign runtime; the allocation address
    /// is used otherwise.
    pub identity: Option<usize>,
    pub func: Box<NativeFn>,
}

impl Function {
    pub fn native(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Function::Native(Rc::new(NativeFunction {
            name: name.into(),
            identity: None,
            func: Box::new(move |args, _| func(args)),
        }))
    }

    pub fn native_with_receiver(
        name: impl Into<String>,
        identity: Option<usize>,
        func: impl Fn(&[Value], Option<&Value>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Function::Native(Rc::new(NativeFunction {
            name: name.into(),
            identity,
            func: Box::new(func),
        }))
    }

    pub fn bind(self, receiver: MapRef) -> Self {
        match self {
            Function::Bound { target, .. } => Function::Bound { receiver, target },
            other => Function::Bound {
                receiver,
                target: Rc::new(other),
            },
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        self.call_with_receiver(args, None)
    }

    pub fn call_with_receiver(
        &self,
        args: &[Value],
        receiver: Option<&Value>,
    ) -> Result<Value, RuntimeError> {
        match self {
            Function::Closure(closure) => crate::interpreter::call_closure(closure, args),
            Function::Native(native) => (native.func)(args, receiver),
            Function::Bound { receiver, target } => {
                target.call_with_receiver(args, Some(&Value::Map(receiver.clone())))
            }
        }
    }

    /// Equal identities mean the same callable; binding does not change identity.
    pub fn identity(&self) -> usize {
        match self {
            Function::Closure(closure) => Rc::as_ptr(closure) as *const () as usize,
            Function::Native(native) => native
                .identity
                .unwrap_or(Rc::as_ptr(native) as *const () as usize),
            Function::Bound { target, .. } => target.identity(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Closure(_) => "->",
            Function::Native(native) => &native.name,
            Function::Bound { target, .. } => target.name(),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Closure(closure) => write!(f, "->[{}]", closure.params.join("; ")),
            Function::Native(native) => write!(f, "<native {}>", native.name),
            Function::Bound { target, .. } => write!(f, "<bound {target:?}>"),
        }
    }
}
