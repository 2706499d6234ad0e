//! `.:` sequence operators.
//!
//! Callback-driven operators iterate over a snapshot of the items, so a callback that
//! mutates the sequence it is scanning never observes a half-applied borrow.

use super::args::{self, items};
use crate::runtime::{Function, OrderedMap, RuntimeError, SeqRef, Value, format_number};
use crate::sequence::{Sequence, SortDirection};
use std::cmp::Ordering;

fn index_value(i: usize) -> Value {
    Value::Number(i as f64)
}

/// `callback(item, index, sequence)`
fn visit(callback: &Function, item: &Value, i: usize, seq: &SeqRef) -> Result<Value, RuntimeError> {
    callback.call(&[item.clone(), index_value(i), Value::Sequence(seq.clone())])
}

fn rest(operands: &[Value], from: usize) -> &[Value] {
    operands.get(from..).unwrap_or(&[])
}

fn out_of_bounds(op: &str, index: i64, len: usize) -> RuntimeError {
    RuntimeError::range(format!("index out of bounds {op} [{index}] .: [{len}]"))
}

pub fn literal(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::from(operands.to_vec()))
}

pub fn at(operands: &[Value]) -> Result<Value, RuntimeError> {
    let index = args::integer("^", operands, 1)?;
    match args::arg("^", operands, 0)? {
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let len = chars.len() as i64;
            let resolved = if index < 0 { len + index } else { index };
            if resolved < 0 || resolved >= len {
                return Err(out_of_bounds("^", index, chars.len()));
            }
            Ok(Value::String(chars[resolved as usize].to_string()))
        }
        _ => {
            let seq = args::sequence("^", operands, 0)?;
            let seq = seq.borrow();
            seq.at(index as isize)
                .cloned()
                .ok_or_else(|| out_of_bounds("^", index, seq.len()))
        }
    }
}

pub fn set_at(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence("^=", operands, 0)?;
    let index = args::integer("^=", operands, 1)?;
    let value = args::arg("^=", operands, 2)?.clone();
    {
        let mut inner = seq.borrow_mut();
        let len = inner.len();
        let slot = inner
            .resolve_index(index as isize)
            .ok_or_else(|| out_of_bounds("^=", index, len))?;
        if inner.set(slot, value).is_err() {
            return Err(out_of_bounds("^=", index, len));
        }
    }
    Ok(Value::Sequence(seq))
}

/// Appends the items of every later sequence onto the first.
pub fn spread(operands: &[Value]) -> Result<Value, RuntimeError> {
    let target = args::sequence("...", operands, 0)?;
    let mut extra = Vec::new();
    for i in 1..operands.len() {
        extra.extend(items(&args::sequence("...", operands, i)?));
    }
    target.borrow_mut().extend(extra);
    Ok(Value::Sequence(target))
}

pub fn scan_forward(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(">>", operands, 0)?;
    let callback = args::function(">>", operands, 1)?;
    for (i, item) in items(&seq).iter().enumerate() {
        visit(callback, item, i, &seq)?;
    }
    Ok(Value::Sequence(seq))
}

pub fn scan_backward(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence("<<", operands, 0)?;
    let callback = args::function("<<", operands, 1)?;
    for (i, item) in items(&seq).iter().enumerate().rev() {
        visit(callback, item, i, &seq)?;
    }
    Ok(Value::Sequence(seq))
}

pub fn filter(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:filter", operands, 0)?;
    let callback = args::function(".:filter", operands, 1)?;
    let mut out = Sequence::new();
    for (i, item) in items(&seq).into_iter().enumerate() {
        if visit(callback, &item, i, &seq)?.is_truthy() {
            out.push(item);
        }
    }
    Ok(Value::sequence(out))
}

pub fn map_forward(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:map>>", operands, 0)?;
    let callback = args::function(".:map>>", operands, 1)?;
    let mut out = Sequence::new();
    for (i, item) in items(&seq).iter().enumerate() {
        out.push(visit(callback, item, i, &seq)?);
    }
    Ok(Value::sequence(out))
}

/// Visits from the back; results are collected in visiting order.
pub fn map_backward(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:map<<", operands, 0)?;
    let callback = args::function(".:map<<", operands, 1)?;
    let mut out = Sequence::new();
    for (i, item) in items(&seq).iter().enumerate().rev() {
        out.push(visit(callback, item, i, &seq)?);
    }
    Ok(Value::sequence(out))
}

/// Maps every item, descending one level into nested sequences.
pub fn flatten(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:flatten", operands, 0)?;
    let callback = args::function(".:flatten", operands, 1)?;
    let mut out = Sequence::new();
    for (i, item) in items(&seq).iter().enumerate() {
        match item {
            Value::Sequence(inner) => {
                for (j, nested) in items(inner).iter().enumerate() {
                    out.push(visit(callback, nested, j, inner)?);
                }
            }
            _ => {
                out.push(visit(callback, item, i, &seq)?);
            }
        }
    }
    Ok(Value::sequence(out))
}

fn reduce(op: &str, operands: &[Value], backward: bool) -> Result<Value, RuntimeError> {
    let seq = args::sequence(op, operands, 0)?;
    let callback = args::function(op, operands, 1)?;
    let mut acc = args::arg(op, operands, 2)?.clone();
    let snapshot = items(&seq);
    let order: Box<dyn Iterator<Item = (usize, &Value)> + '_> = if backward {
        Box::new(snapshot.iter().enumerate().rev())
    } else {
        Box::new(snapshot.iter().enumerate())
    };
    for (i, item) in order {
        acc = callback.call(&[acc, item.clone(), index_value(i), Value::Sequence(seq.clone())])?;
    }
    Ok(acc)
}

pub fn reduce_forward(operands: &[Value]) -> Result<Value, RuntimeError> {
    reduce(".:reduce>>", operands, false)
}

pub fn reduce_backward(operands: &[Value]) -> Result<Value, RuntimeError> {
    reduce(".:reduce<<", operands, true)
}

/// Position of the first item (from the chosen end) the callback accepts.
fn position(
    op: &str,
    operands: &[Value],
    backward: bool,
) -> Result<Option<(usize, Value)>, RuntimeError> {
    let seq = args::sequence(op, operands, 0)?;
    let callback = args::function(op, operands, 1)?;
    let snapshot = items(&seq);
    let indices: Box<dyn Iterator<Item = usize>> = if backward {
        Box::new((0..snapshot.len()).rev())
    } else {
        Box::new(0..snapshot.len())
    };
    for i in indices {
        let item = &snapshot[i];
        if visit(callback, item, i, &seq)?.is_truthy() {
            return Ok(Some((i, item.clone())));
        }
    }
    Ok(None)
}

pub fn find_forward(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(position(".:find>>", operands, false)?.map_or(Value::Void, |(_, item)| item))
}

pub fn find_backward(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(position(".:find<<", operands, true)?.map_or(Value::Void, |(_, item)| item))
}

pub fn find_index_forward(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(
        position(".:find_index>>", operands, false)?.map_or(-1.0, |(i, _)| i as f64),
    ))
}

pub fn find_index_backward(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(
        position(".:find_index<<", operands, true)?.map_or(-1.0, |(i, _)| i as f64),
    ))
}

pub fn every(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:every", operands, 0)?;
    let callback = args::function(".:every", operands, 1)?;
    for (i, item) in items(&seq).iter().enumerate() {
        if !visit(callback, item, i, &seq)?.is_truthy() {
            return Ok(Value::bool(false));
        }
    }
    Ok(Value::bool(true))
}

pub fn some(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::bool(
        position(".:some", operands, false)?.is_some(),
    ))
}

pub fn first(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:first", operands, 0)?;
    let first = seq.borrow().first().cloned();
    Ok(first.unwrap_or(Value::Void))
}

pub fn last(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:last", operands, 0)?;
    let last = seq.borrow().last().cloned();
    Ok(last.unwrap_or(Value::Void))
}

pub fn is_in_bounds(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:is_in_bounds", operands, 0)?;
    let index = args::number(".:is_in_bounds", operands, 1)?;
    let len = seq.borrow().len() as f64;
    Ok(Value::bool(index.abs() < len))
}

pub fn append(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:append", operands, 0)?;
    seq.borrow_mut().extend(rest(operands, 1).iter().cloned());
    Ok(Value::Sequence(seq))
}

/// Items land at the front in the order given.
pub fn prepend(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:prepend", operands, 0)?;
    {
        let mut inner = seq.borrow_mut();
        for item in rest(operands, 1).iter().rev() {
            inner.prepend(item.clone());
        }
    }
    Ok(Value::Sequence(seq))
}

pub fn add_at(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:add_at", operands, 0)?;
    let index = args::integer(".:add_at", operands, 1)?;
    let len = seq.borrow().len();
    let slot = usize::try_from(index)
        .ok()
        .filter(|&i| i <= len)
        .ok_or_else(|| out_of_bounds(".:add_at", index, len))?;
    seq.borrow_mut()
        .add_at(slot, rest(operands, 2).iter().cloned());
    Ok(Value::Sequence(seq))
}

pub fn remove_from(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:remove_from", operands, 0)?;
    let index = args::integer(".:remove_from", operands, 1)?;
    let amount = args::count(".:remove_from", operands, 2)?;
    let len = seq.borrow().len();
    let slot = usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| out_of_bounds(".:remove_from", index, len))?;
    seq.borrow_mut().remove_from(slot, amount);
    Ok(Value::Sequence(seq))
}

pub fn head(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:head", operands, 0)?;
    seq.borrow_mut().head();
    Ok(Value::Sequence(seq))
}

pub fn tail(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:tail", operands, 0)?;
    seq.borrow_mut().tail();
    Ok(Value::Sequence(seq))
}

pub fn cut(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:cut", operands, 0)?;
    let removed = seq.borrow_mut().cut();
    Ok(removed.unwrap_or(Value::Void))
}

pub fn chop(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:chop", operands, 0)?;
    let removed = seq.borrow_mut().chop();
    Ok(removed.unwrap_or(Value::Void))
}

pub fn length(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:length", operands, 0)?;
    let len = seq.borrow().len();
    Ok(Value::Number(len as f64))
}

/// `0..n`
pub fn range(operands: &[Value]) -> Result<Value, RuntimeError> {
    let n = args::count(".:seq", operands, 0)?;
    Ok(Value::sequence((0..n).map(index_value).collect()))
}

/// Splits a string; an empty separator splits into characters.
pub fn from_string(operands: &[Value]) -> Result<Value, RuntimeError> {
    let text = args::string(".:from_string", operands, 0)?;
    let separator = args::string(".:from_string", operands, 1)?;
    let parts: Sequence<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(separator).map(Value::from).collect()
    };
    Ok(Value::sequence(parts))
}

pub fn to_string(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:to_string", operands, 0)?;
    let separator = args::string(".:to_string", operands, 1)?;
    let parts: Vec<String> = seq.borrow().iter().map(Value::to_string).collect();
    Ok(Value::String(parts.join(separator)))
}

pub fn chunks(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:chunks", operands, 0)?;
    let size = args::count(".:chunks", operands, 1)?;
    if size == 0 {
        return Err(RuntimeError::range(
            "second argument of .:chunks [] must be at least 1",
        ));
    }
    let parts = seq.borrow().partition(size);
    Ok(Value::sequence(
        parts.into_iter().map(Value::sequence).collect(),
    ))
}

pub fn matrix(operands: &[Value]) -> Result<Value, RuntimeError> {
    let dimensions = (0..operands.len())
        .map(|i| args::count(".:matrix", operands, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Sequence::matrix(dimensions, &|| Value::Void, &Value::sequence))
}

/// Buckets items into a map keyed by the callback result.
pub fn group(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:group", operands, 0)?;
    let callback = args::function(".:group", operands, 1)?;
    let snapshot = Sequence::from_vec(items(&seq));
    let groups = snapshot.try_group_by(|item, i| {
        match visit(callback, item, i, &seq)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(format_number(n)),
            other => Err(RuntimeError::type_error(format!(
                "callback of .:group [] must return a string or number but got {}",
                other.kind()
            ))),
        }
    })?;
    let map: OrderedMap = groups
        .into_iter()
        .map(|(key, members)| (key, Value::sequence(members)))
        .collect();
    Ok(Value::map(map))
}

fn direction(op: &str, operands: &[Value], i: usize) -> Result<f64, RuntimeError> {
    let dir = args::number(op, operands, i)?;
    if dir == 1.0 || dir == -1.0 {
        Ok(dir)
    } else {
        Err(RuntimeError::range(format!(
            "direction of {op} [] must be either -1 or 1 but got {}",
            format_number(dir)
        )))
    }
}

/// Direction 1 rotates left, -1 rotates right.
pub fn rotate(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:rotate", operands, 0)?;
    let n = args::count(".:rotate", operands, 1)?;
    let dir = direction(".:rotate", operands, 2)?;
    {
        let mut inner = seq.borrow_mut();
        if dir > 0.0 {
            inner.rotate_left(n);
        } else {
            inner.rotate_right(n);
        }
    }
    Ok(Value::Sequence(seq))
}

pub fn flat(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:flat", operands, 0)?;
    let depth = if operands.len() > 1 {
        args::count(".:flat", operands, 1)?
    } else {
        1
    };
    let flattened = seq.borrow().flat_with(depth, &|item| match item {
        Value::Sequence(inner) => Some(inner.borrow().copy()),
        _ => None,
    });
    Ok(Value::sequence(flattened))
}

pub fn slice(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:slice", operands, 0)?;
    let start = args::integer(".:slice", operands, 1)?;
    let end = if operands.len() > 2 {
        Some(args::integer(".:slice", operands, 2)? as isize)
    } else {
        None
    };
    let sliced = seq.borrow().slice(start as isize, end);
    Ok(Value::sequence(sliced))
}

/// Natural order over numbers (Void as zero) or strings.
fn natural_order(a: &Value, b: &Value) -> Result<Ordering, RuntimeError> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => Ok(a.total_cmp(&b)),
            _ => Err(RuntimeError::type_error(format!(
                ".:quick_sort [] cannot compare {} with {}",
                a.kind(),
                b.kind()
            ))),
        },
    }
}

pub fn quick_sort(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:quick_sort", operands, 0)?;
    let dir = direction(".:quick_sort", operands, 1)?;
    let order = SortDirection::from_sign(dir).unwrap_or(SortDirection::Ascending);
    seq.borrow_mut().quick_sort_by(order, natural_order)?;
    Ok(Value::Sequence(seq))
}

/// Stable sort into a new sequence; a positive callback result orders the first
/// argument after the second.
pub fn merge_sort(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:merge_sort", operands, 0)?;
    let callback = args::function(".:merge_sort", operands, 1)?;
    let snapshot = Sequence::from_vec(items(&seq));
    let sorted = snapshot.merge_sort_by(|a, b| {
        let result = callback.call(&[a.clone(), b.clone()])?;
        match result.as_number() {
            Some(n) if n > 0.0 => Ok(Ordering::Greater),
            Some(_) => Ok(Ordering::Less),
            None => Err(RuntimeError::type_error(format!(
                "callback of .:merge_sort [] must return a number but got {}",
                result.kind()
            ))),
        }
    })?;
    Ok(Value::sequence(sorted))
}

fn set_operation(
    op: &str,
    operands: &[Value],
    combine: fn(&Sequence<Value>, &Sequence<Value>) -> Sequence<Value>,
) -> Result<Value, RuntimeError> {
    let a = Sequence::from_vec(items(&args::sequence(op, operands, 0)?));
    let b = Sequence::from_vec(items(&args::sequence(op, operands, 1)?));
    Ok(Value::sequence(combine(&a, &b)))
}

pub fn union(operands: &[Value]) -> Result<Value, RuntimeError> {
    set_operation(".:union", operands, |a, b| a.union_by(b, Value::scalar_key))
}

pub fn intersection(operands: &[Value]) -> Result<Value, RuntimeError> {
    set_operation(".:intersection", operands, |a, b| {
        a.intersection_by(b, Value::scalar_key)
    })
}

pub fn difference(operands: &[Value]) -> Result<Value, RuntimeError> {
    set_operation(".:difference", operands, |a, b| {
        a.difference_by(b, Value::scalar_key)
    })
}

pub fn xor(operands: &[Value]) -> Result<Value, RuntimeError> {
    set_operation(".:xor", operands, |a, b| a.xor_by(b, Value::scalar_key))
}

pub fn unique(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:unique", operands, 0)?;
    let out = seq.borrow().unique_by(Value::scalar_key);
    Ok(Value::sequence(out))
}

pub fn duplicates(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:duplicates", operands, 0)?;
    let out = seq.borrow().duplicates_by(Value::scalar_key);
    Ok(Value::sequence(out))
}

pub fn reverse(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:reverse", operands, 0)?;
    seq.borrow_mut().reverse();
    Ok(Value::Sequence(seq))
}

pub fn take(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:take", operands, 0)?;
    let n = args::count(".:take", operands, 1)?;
    let out = seq.borrow().take(n);
    Ok(Value::sequence(out))
}

pub fn take_right(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:take_right", operands, 0)?;
    let n = args::count(".:take_right", operands, 1)?;
    let out = seq.borrow().take_right(n);
    Ok(Value::sequence(out))
}

pub fn concat(operands: &[Value]) -> Result<Value, RuntimeError> {
    let mut out = Vec::new();
    for i in 0..operands.len() {
        out.extend(items(&args::sequence(".:concat", operands, i)?));
    }
    Ok(Value::from(out))
}

pub fn copy(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:copy", operands, 0)?;
    let out = seq.borrow().copy();
    Ok(Value::sequence(out))
}

/// Returns the removed items; inserted items take their place.
pub fn splice(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:splice", operands, 0)?;
    let start = args::integer(".:splice", operands, 1)?;
    let count = args::count(".:splice", operands, 2)?;
    let len = seq.borrow().len() as i64;
    let start = (if start < 0 { (len + start).max(0) } else { start.min(len) }) as usize;
    let removed = seq
        .borrow_mut()
        .splice(start, count, rest(operands, 3).iter().cloned());
    Ok(Value::sequence(removed))
}

pub fn clear(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:clear", operands, 0)?;
    seq.borrow_mut().clear();
    Ok(Value::Sequence(seq))
}

pub fn balance(operands: &[Value]) -> Result<Value, RuntimeError> {
    let seq = args::sequence(".:balance", operands, 0)?;
    seq.borrow_mut().balance();
    Ok(Value::Sequence(seq))
}
