//! Executes compiled programs in an embedded Lua 5.4 state.
//!
//! Each execution gets a fresh environment table holding the shared operator table,
//! the form helpers and the extra builtins. Reads and writes of names the program
//! never declared raise ReferenceError through the environment's metatable.

use crate::compiler::{CompiledProgram, demangle, helpers, mangle};
use crate::interpreter::MAX_CALL_DEPTH;
use crate::runtime::ops::{self, forms};
use crate::runtime::{Builtins, ErrorKind, RuntimeError, Value};
use mlua::Variadic;
use mlua::prelude::*;

mod convert;

pub use convert::runtime_error;

const PRELUDE: &str = include_str!("prelude.lua");

pub struct LuaHost {
    lua: Lua,
}

/// A chunk environment that can run several compiled programs in turn.
pub struct Environment {
    table: LuaTable,
    reset_depth: LuaFunction,
}

impl LuaHost {
    pub fn new() -> Self {
        LuaHost { lua: Lua::new() }
    }

    pub fn execute(
        &self,
        program: &CompiledProgram,
        builtins: &Builtins,
    ) -> Result<Value, RuntimeError> {
        let env = self
            .environment(builtins)
            .map_err(|err| runtime_error(&err))?;
        self.execute_in(&env, program)
    }

    /// Run `program` against an existing environment. Globals set by earlier
    /// programs stay visible.
    pub fn execute_in(
        &self,
        env: &Environment,
        program: &CompiledProgram,
    ) -> Result<Value, RuntimeError> {
        let result = self.run(env, program);
        if result.is_err() {
            env.reset_depth
                .call::<()>(())
                .map_err(|err| runtime_error(&err))?;
        }
        result.map_err(|err| runtime_error(&err))
    }

    fn run(&self, env: &Environment, program: &CompiledProgram) -> LuaResult<Value> {
        let source = program.source();
        tracing::debug!(bytes = source.len(), "executing compiled program");
        self.lua
            .load(source.as_str())
            .set_name("=chip")
            .set_environment(env.table.clone())
            .call::<Value>(())
    }

    /// Build a chunk environment with `builtins` bound as globals.
    pub fn environment(&self, builtins: &Builtins) -> LuaResult<Environment> {
        let lua = &self.lua;
        let env = lua.create_table()?;

        let raiser = lua.create_function(raise)?;
        env.raw_set(helpers::RAISE, raiser.clone())?;
        env.raw_set(helpers::OPS_TABLE, self.operator_table()?)?;
        env.raw_set(
            helpers::IMPORT,
            lua.create_function(|_, (module, name): (Value, String)| {
                forms::import_member(&module, &name).map_err(LuaError::external)
            })?,
        )?;
        env.raw_set(
            helpers::COMPOUND,
            lua.create_function(|_, (symbol, current, amount): (String, Value, Value)| {
                let op = forms::compound_from_symbol(&symbol).ok_or_else(|| {
                    LuaError::external(RuntimeError::host(format!(
                        "unknown compound assignment {symbol}"
                    )))
                })?;
                forms::compound(op, &current, &amount).map_err(LuaError::external)
            })?,
        )?;
        env.raw_set(
            helpers::DESTRUCTURE_MAP,
            lua.create_function(|_, (source, names): (Value, Variadic<String>)| {
                forms::destructure_map(&source, &names)
                    .map(|values| values.into_iter().collect::<Variadic<Value>>())
                    .map_err(LuaError::external)
            })?,
        )?;
        env.raw_set(
            helpers::DESTRUCTURE_SEQUENCE,
            lua.create_function(|_, (source, count): (Value, f64)| {
                forms::destructure_sequence(&source, count as usize)
                    .map(|values| values.into_iter().collect::<Variadic<Value>>())
                    .map_err(LuaError::external)
            })?,
        )?;

        for (name, value) in builtins.iter() {
            env.raw_set(mangle(name), value.clone())?;
        }

        let demangler = lua.create_function(|_, name: String| Ok(demangle(&name)))?;
        let is_handle =
            lua.create_function(|_, value: LuaValue| Ok(convert::is_function_handle(&value)))?;
        let reset_depth = lua
            .load(PRELUDE)
            .set_name("=chip prelude")
            .call::<LuaFunction>((env.clone(), raiser, demangler, is_handle, MAX_CALL_DEPTH))?;
        Ok(Environment {
            table: env,
            reset_depth,
        })
    }

    /// Every eager operator, keyed by its Chip name.
    fn operator_table(&self) -> LuaResult<LuaTable> {
        let table = self.lua.create_table()?;
        for (name, func) in ops::eager_operators() {
            let function = self.lua.create_function(move |_, args: Variadic<Value>| {
                func(&args).map_err(LuaError::external)
            })?;
            table.raw_set(name, function)?;
        }
        Ok(table)
    }
}

impl Default for LuaHost {
    fn default() -> Self {
        Self::new()
    }
}

fn raise(_: &Lua, (kind, message): (String, String)) -> LuaResult<()> {
    let kind = ErrorKind::from_name(&kind).unwrap_or(ErrorKind::Host);
    Err(LuaError::external(RuntimeError::new(kind, message)))
}

/// Run `program` in a fresh Lua state with `builtins` bound as globals.
pub fn execute(program: &CompiledProgram, builtins: &Builtins) -> Result<Value, RuntimeError> {
    LuaHost::new().execute(program, builtins)
}
