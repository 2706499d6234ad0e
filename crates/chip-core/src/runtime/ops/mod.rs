//! The builtin operator table.
//!
//! Every builtin is described once here: its name, how many arguments it accepts and
//! whether it controls evaluation of its arguments (a special form) or receives them
//! already evaluated (an eager operator). The interpreter dispatches on this table at
//! runtime; the compiler consults it to emit either inline control flow or a call into
//! the same eager implementations registered with the host.

use super::{RuntimeError, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

mod args;
pub mod arith;
pub mod collections;
pub mod forms;
pub mod maps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
    /// An even count of at least `min`, for name/value pair lists.
    Even { min: usize },
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::Even { min } => count >= min && count % 2 == 0,
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Arity::Exact(n) => format!("{n}"),
            Arity::AtLeast(n) => format!("at least {n}"),
            Arity::Between(lo, hi) => format!("{lo} to {hi}"),
            Arity::Even { min } => format!("an even number (at least {min})"),
        }
    }

    /// The arity check both backends perform before touching any argument.
    pub fn check(&self, op: &str, count: usize) -> Result<(), RuntimeError> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(RuntimeError::range(format!(
                "invalid number of arguments to {op} [] (expected {}, got {count})",
                self.describe()
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOp {
    Add,
    Subtract,
    Multiply,
}

/// Operators that receive their argument nodes unevaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Block,
    Declare,
    Assign,
    Compound(CompoundOp),
    Lambda,
    And,
    Or,
    Branch,
    Symbols,
    Rebind,
    Import,
    Pipe,
    DestructureMap,
    DestructureSequence,
}

pub type EagerFn = fn(&[Value]) -> Result<Value, RuntimeError>;

#[derive(Debug, Clone, Copy)]
pub enum Form {
    Special(Special),
    Eager(EagerFn),
}

#[derive(Debug)]
pub struct OperatorSpec {
    pub name: &'static str,
    pub arity: Arity,
    pub form: Form,
}

const fn special(name: &'static str, arity: Arity, form: Special) -> OperatorSpec {
    OperatorSpec {
        name,
        arity,
        form: Form::Special(form),
    }
}

const fn eager(name: &'static str, arity: Arity, func: EagerFn) -> OperatorSpec {
    OperatorSpec {
        name,
        arity,
        form: Form::Eager(func),
    }
}

use Arity::{AtLeast, Between, Even, Exact};

pub static OPERATORS: &[OperatorSpec] = &[
    // control
    special(":", AtLeast(0), Special::Block),
    special(":=", Even { min: 2 }, Special::Declare),
    special("=", Exact(2), Special::Assign),
    special("+=", Between(1, 2), Special::Compound(CompoundOp::Add)),
    special("-=", Between(1, 2), Special::Compound(CompoundOp::Subtract)),
    special("*=", Between(1, 2), Special::Compound(CompoundOp::Multiply)),
    special("->", AtLeast(1), Special::Lambda),
    special("&&", AtLeast(1), Special::And),
    special("||", AtLeast(1), Special::Or),
    special("?", AtLeast(2), Special::Branch),
    special("'", AtLeast(1), Special::Symbols),
    special("~=", Between(1, 2), Special::Rebind),
    special("<-", AtLeast(1), Special::Import),
    special("|>", Exact(1), Special::Pipe),
    special("<-::", AtLeast(2), Special::DestructureMap),
    special("<-.:", AtLeast(2), Special::DestructureSequence),
    // scalars
    eager("+", AtLeast(2), arith::add),
    eager("-", AtLeast(2), arith::subtract),
    eager("*", AtLeast(2), arith::multiply),
    eager("/", AtLeast(1), arith::divide),
    eager("%", Exact(2), arith::remainder),
    eager("|", Between(1, 2), arith::round),
    eager("~", AtLeast(2), arith::concat),
    eager("!", Exact(1), arith::not),
    eager("==", AtLeast(2), arith::equal),
    eager("!=", AtLeast(2), arith::not_equal),
    eager("<", AtLeast(2), arith::less),
    eager(">", AtLeast(2), arith::greater),
    eager("<=", AtLeast(2), arith::less_equal),
    eager(">=", AtLeast(2), arith::greater_equal),
    eager("===", AtLeast(2), arith::deep_equal),
    eager("!==", AtLeast(2), arith::deep_not_equal),
    eager("!throw", Between(1, 2), arith::assert),
    eager("?==", AtLeast(2), arith::same_kind),
    eager("`", Exact(1), arith::cast),
    eager("=>", Exact(2), arith::apply),
    eager("*loop", Exact(2), arith::repeat),
    // maps
    eager("::", Even { min: 0 }, maps::literal),
    eager(".", Exact(2), maps::get),
    eager(".?", Exact(2), maps::has),
    eager(".=", Exact(3), maps::set),
    eager(".!=", Exact(2), maps::delete),
    eager("::entries", Exact(1), maps::entries),
    eager("::keys", Exact(1), maps::keys),
    eager("::values", Exact(1), maps::values),
    eager("::size", Exact(1), maps::size),
    // sequences
    eager(".:", AtLeast(0), collections::literal),
    eager("^", Exact(2), collections::at),
    eager("^=", Exact(3), collections::set_at),
    eager("...", AtLeast(2), collections::spread),
    eager(">>", Exact(2), collections::scan_forward),
    eager("<<", Exact(2), collections::scan_backward),
    eager(".:filter", Exact(2), collections::filter),
    eager(".:map>>", Exact(2), collections::map_forward),
    eager(".:map<<", Exact(2), collections::map_backward),
    eager(".:flatten", Exact(2), collections::flatten),
    eager(".:reduce>>", Exact(3), collections::reduce_forward),
    eager(".:reduce<<", Exact(3), collections::reduce_backward),
    eager(".:find>>", Exact(2), collections::find_forward),
    eager(".:find<<", Exact(2), collections::find_backward),
    eager(".:find_index>>", Exact(2), collections::find_index_forward),
    eager(".:find_index<<", Exact(2), collections::find_index_backward),
    eager(".:every", Exact(2), collections::every),
    eager(".:some", Exact(2), collections::some),
    eager(".:first", Exact(1), collections::first),
    eager(".:last", Exact(1), collections::last),
    eager(".:is_in_bounds", Exact(2), collections::is_in_bounds),
    eager(".:append", AtLeast(2), collections::append),
    eager(".:prepend", AtLeast(2), collections::prepend),
    eager(".:add_at", AtLeast(3), collections::add_at),
    eager(".:remove_from", Exact(3), collections::remove_from),
    eager(".:head", Exact(1), collections::head),
    eager(".:tail", Exact(1), collections::tail),
    eager(".:cut", Exact(1), collections::cut),
    eager(".:chop", Exact(1), collections::chop),
    eager(".:length", Exact(1), collections::length),
    eager(".:seq", Exact(1), collections::range),
    eager(".:from_string", Exact(2), collections::from_string),
    eager(".:to_string", Exact(2), collections::to_string),
    eager(".:chunks", Exact(2), collections::chunks),
    eager(".:matrix", AtLeast(1), collections::matrix),
    eager(".:group", Exact(2), collections::group),
    eager(".:rotate", Exact(3), collections::rotate),
    eager(".:flat", Between(1, 2), collections::flat),
    eager(".:slice", Between(2, 3), collections::slice),
    eager(".:quick_sort", Exact(2), collections::quick_sort),
    eager(".:merge_sort", Exact(2), collections::merge_sort),
    eager(".:union", Exact(2), collections::union),
    eager(".:intersection", Exact(2), collections::intersection),
    eager(".:difference", Exact(2), collections::difference),
    eager(".:xor", Exact(2), collections::xor),
    eager(".:unique", Exact(1), collections::unique),
    eager(".:duplicates", Exact(1), collections::duplicates),
    eager(".:reverse", Exact(1), collections::reverse),
    eager(".:take", Exact(2), collections::take),
    eager(".:take_right", Exact(2), collections::take_right),
    eager(".:concat", AtLeast(2), collections::concat),
    eager(".:copy", Exact(1), collections::copy),
    eager(".:splice", AtLeast(3), collections::splice),
    eager(".:clear", Exact(1), collections::clear),
    eager(".:balance", Exact(1), collections::balance),
];

pub fn lookup(name: &str) -> Option<&'static OperatorSpec> {
    static INDEX: OnceLock<HashMap<&'static str, &'static OperatorSpec>> = OnceLock::new();
    INDEX
        .get_or_init(|| OPERATORS.iter().map(|spec| (spec.name, spec)).collect())
        .get(name)
        .copied()
}

pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

/// Eager operators, in table order. The host registers exactly these.
pub fn eager_operators() -> impl Iterator<Item = (&'static str, EagerFn)> {
    OPERATORS.iter().filter_map(|spec| match spec.form {
        Form::Eager(func) => Some((spec.name, func)),
        Form::Special(_) => None,
    })
}
