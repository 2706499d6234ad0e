//! `::` map construction, member access and views

use super::args;
use crate::runtime::{MAX_KEY_LENGTH, OrderedMap, RuntimeError, Value};
use crate::sequence::Sequence;

/// Keys written by programs are limited to `MAX_KEY_LENGTH` characters.
pub fn check_key(key: &str) -> Result<(), RuntimeError> {
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(RuntimeError::range(format!(
            "key name \"{key}\" is too long. Max length is {MAX_KEY_LENGTH} characters!"
        )));
    }
    Ok(())
}

pub fn literal(operands: &[Value]) -> Result<Value, RuntimeError> {
    let mut map = OrderedMap::new();
    for pair in operands.chunks(2) {
        let key = match &pair[0] {
            Value::String(key) => key.clone(),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "invalid use of operation :: [] (only strings can be used as keys) setting {}",
                    other.repr()
                )));
            }
        };
        check_key(&key)?;
        let value = pair.get(1).cloned().unwrap_or(Value::Void);
        map.insert(key, value);
    }
    Ok(Value::map(map))
}

/// Member read. Callables come back bound to the map they were read from.
pub fn get(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map(".", operands, 0)?;
    let key = args::key(".", operands, 1)?;
    let value = map.borrow().get(&key).cloned();
    match value {
        Some(Value::Function(f)) => Ok(Value::Function(f.bind(map))),
        Some(value) => Ok(value),
        None => Err(RuntimeError::range(format!(
            ":: [] doesn't have a . [{key}]"
        ))),
    }
}

pub fn has(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map(".?", operands, 0)?;
    let key = args::key(".?", operands, 1)?;
    let found = map.borrow().contains_key(&key);
    Ok(Value::bool(found))
}

pub fn set(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map(".=", operands, 0)?;
    let key = args::key(".=", operands, 1)?;
    check_key(&key)?;
    let value = args::arg(".=", operands, 2)?.clone();
    map.borrow_mut().insert(key, value);
    Ok(Value::Map(map))
}

pub fn delete(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map(".!=", operands, 0)?;
    let key = args::key(".!=", operands, 1)?;
    let removed = map.borrow_mut().remove(&key);
    match removed {
        Some(_) => Ok(Value::Map(map)),
        None => Err(RuntimeError::range(format!(
            ":: \"{key}\" doesn't exist in :: at .!= []"
        ))),
    }
}

pub fn entries(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map("::entries", operands, 0)?;
    let entries: Sequence<Value> = map
        .borrow()
        .iter()
        .map(|(k, v)| Value::from(vec![Value::from(k), v.clone()]))
        .collect();
    Ok(Value::sequence(entries))
}

pub fn keys(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map("::keys", operands, 0)?;
    let keys: Sequence<Value> = map.borrow().keys().map(Value::from).collect();
    Ok(Value::sequence(keys))
}

pub fn values(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map("::values", operands, 0)?;
    let values: Sequence<Value> = map.borrow().values().cloned().collect();
    Ok(Value::sequence(values))
}

pub fn size(operands: &[Value]) -> Result<Value, RuntimeError> {
    let map = args::map("::size", operands, 0)?;
    let size = map.borrow().len();
    Ok(Value::Number(size as f64))
}
