//! Value conversions across the Lua boundary.
//!
//! Void is `nil`, numbers and strings map to their Lua counterparts, and sequences,
//! maps and Rust-side callables travel as userdata handles so they keep their
//! identity on the way back. Lua functions become native callables.

use crate::interpreter::{CALL_DEPTH_MESSAGE, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::runtime::{Function, MapRef, RuntimeError, SeqRef, Value};
use mlua::prelude::*;
use mlua::{MetaMethod, UserData, UserDataMethods, Variadic};

pub(super) struct SequenceHandle(SeqRef);
pub(super) struct MapHandle(MapRef);
pub(super) struct FunctionHandle(Function);

impl UserData for SequenceHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(Value::Sequence(this.0.clone()).to_string())
        });
    }
}

impl UserData for MapHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(Value::Map(this.0.clone()).to_string())
        });
    }
}

impl UserData for FunctionHandle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Call, |_, this, args: Variadic<Value>| {
            this.0.call(&args).map_err(LuaError::external)
        });
        methods.add_meta_method(MetaMethod::ToString, |_, _, ()| Ok("-> []"));
    }
}

pub(super) fn is_function_handle(value: &LuaValue) -> bool {
    matches!(value, LuaValue::UserData(ud) if ud.is::<FunctionHandle>())
}

impl IntoLua for Value {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        match self {
            Value::Void => Ok(LuaValue::Nil),
            Value::Number(n) => Ok(LuaValue::Number(n)),
            Value::String(s) => lua.create_string(&s).map(LuaValue::String),
            Value::Sequence(seq) => lua
                .create_userdata(SequenceHandle(seq))
                .map(LuaValue::UserData),
            Value::Map(map) => lua.create_userdata(MapHandle(map)).map(LuaValue::UserData),
            Value::Function(function) => lua
                .create_userdata(FunctionHandle(function))
                .map(LuaValue::UserData),
        }
    }
}

impl FromLua for Value {
    fn from_lua(value: LuaValue, _lua: &Lua) -> LuaResult<Self> {
        match value {
            LuaValue::Nil => Ok(Value::Void),
            LuaValue::Boolean(b) => Ok(Value::bool(b)),
            LuaValue::Integer(i) => Ok(Value::Number(i as f64)),
            LuaValue::Number(n) => Ok(Value::Number(n)),
            LuaValue::String(s) => Ok(Value::String(s.to_str()?.to_string())),
            LuaValue::Function(function) => Ok(Value::Function(wrap_lua_function(function))),
            LuaValue::UserData(ud) => from_userdata(&ud),
            other => Err(LuaError::external(RuntimeError::host(format!(
                "a Lua {} has no Chip counterpart",
                other.type_name()
            )))),
        }
    }
}

fn from_userdata(ud: &LuaAnyUserData) -> LuaResult<Value> {
    if let Ok(seq) = ud.borrow::<SequenceHandle>() {
        return Ok(Value::Sequence(seq.0.clone()));
    }
    if let Ok(map) = ud.borrow::<MapHandle>() {
        return Ok(Value::Map(map.0.clone()));
    }
    if let Ok(function) = ud.borrow::<FunctionHandle>() {
        return Ok(Value::Function(function.0.clone()));
    }
    Err(LuaError::external(RuntimeError::host(
        "foreign userdata has no Chip counterpart",
    )))
}

/// The Lua function's address is its identity, so converting the same function
/// twice yields callables that compare equal. Calls re-enter Lua on the current
/// native stack, so they grow it the way interpretation does.
fn wrap_lua_function(function: LuaFunction) -> Function {
    let identity = function.to_pointer() as usize;
    Function::native_with_receiver("lua", Some(identity), move |args, _receiver| {
        let args: Variadic<Value> = args.iter().cloned().collect();
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || function.call::<Value>(args))
            .map_err(|err| runtime_error(&err))
    })
}

/// Lua gives up on deep nesting before the call-depth counter does when callbacks
/// cross into Rust and back.
fn is_stack_exhaustion(err: &LuaError) -> bool {
    match err {
        LuaError::StackError => true,
        LuaError::RuntimeError(message) => {
            message.contains("stack overflow") || message.contains("error in error handling")
        }
        _ => false,
    }
}

/// Recover the `RuntimeError` carried by a Lua error, looking through callback and
/// context wrappers. Stack exhaustion is the call-depth RangeError; anything else
/// raised by Lua itself becomes a HostError.
pub fn runtime_error(err: &LuaError) -> RuntimeError {
    match err {
        err if is_stack_exhaustion(err) => RuntimeError::range(CALL_DEPTH_MESSAGE),
        LuaError::CallbackError { cause, .. } | LuaError::WithContext { cause, .. } => {
            runtime_error(cause)
        }
        LuaError::ExternalError(external) => match external.downcast_ref::<RuntimeError>() {
            Some(runtime) => runtime.clone(),
            None => RuntimeError::host(external.to_string()),
        },
        other => RuntimeError::host(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ErrorKind;

    #[test]
    fn test_scalars_round_trip() {
        let lua = Lua::new();
        for value in [Value::Void, Value::Number(1.5), Value::from("text")] {
            let back = Value::from_lua(value.clone().into_lua(&lua).unwrap(), &lua).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_sequences_keep_identity() {
        let lua = Lua::new();
        let seq = Value::from(vec![Value::Number(1.0)]);
        let back = Value::from_lua(seq.clone().into_lua(&lua).unwrap(), &lua).unwrap();
        assert!(back.scalar_eq(&seq));
    }

    #[test]
    fn test_stack_exhaustion_is_the_call_depth_error() {
        let overflow = LuaError::RuntimeError("chip:1: C stack overflow".to_string());
        let wrapped = LuaError::CallbackError {
            traceback: String::new(),
            cause: std::sync::Arc::new(overflow),
        };
        let err = runtime_error(&wrapped);
        assert_eq!(err.kind, ErrorKind::Range);
        assert_eq!(err.message, CALL_DEPTH_MESSAGE);

        let other = runtime_error(&LuaError::RuntimeError("attempt to index nil".to_string()));
        assert_eq!(other.kind, ErrorKind::Host);
    }

    #[test]
    fn test_lua_integers_become_numbers() {
        let lua = Lua::new();
        let value: Value = lua.load("return 3").eval().unwrap();
        assert_eq!(value, Value::Number(3.0));
    }

    #[test]
    fn test_lua_functions_are_callable() {
        let lua = Lua::new();
        let value: Value = lua.load("return function(a, b) return a .. b end").eval().unwrap();
        let function = value.as_function().unwrap();
        let result = function.call(&[Value::from("a"), Value::from("b")]).unwrap();
        assert_eq!(result, Value::from("ab"));
    }

    #[test]
    fn test_external_errors_are_recovered() {
        let lua = Lua::new();
        let fail = lua
            .create_function(|_, ()| -> LuaResult<()> {
                Err(LuaError::external(RuntimeError::range("too far")))
            })
            .unwrap();
        lua.globals().set("fail", fail).unwrap();
        let err = lua.load("fail()").exec().unwrap_err();
        let recovered = runtime_error(&err);
        assert_eq!(recovered.kind, ErrorKind::Range);
        assert_eq!(recovered.message, "too far");

        let err = lua.load("error('boom')").exec().unwrap_err();
        assert_eq!(runtime_error(&err).kind, ErrorKind::Host);
    }
}
