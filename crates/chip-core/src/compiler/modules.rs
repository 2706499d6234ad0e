//! Module usage gathered from import sites, and narrowing of a library down to it.

use crate::ast::{Expr, Literal};
use crate::runtime::{OrderedMap, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Module name to the member names imported from it.
pub type ModuleUsage = BTreeMap<String, BTreeSet<String>>;

/// Name of the root library map; its own entry is never copied by [`narrow`].
pub const LIBRARY: &str = "LIBRARY";

/// Records `<-[names..][module]`. Returns false when the module expression is not
/// something a name can be given to.
pub fn record_import(usage: &mut ModuleUsage, names: &[Expr], module: &Expr) -> bool {
    let Some(module) = module_name(usage, module) else {
        return false;
    };
    let members = usage.entry(module).or_default();
    for name in names {
        if let Some(name) = name.identifier_name() {
            members.insert(name.to_string());
        }
    }
    true
}

/// `MATH` names itself; `.[LIBRARY; "MATH"]` names `MATH` and records it as a
/// member of `LIBRARY`.
fn module_name(usage: &mut ModuleUsage, module: &Expr) -> Option<String> {
    match module {
        Expr::Identifier { name, .. } => Some(name.clone()),
        Expr::Apply { args, .. } if module.operator_name() == Some(".") => {
            let [parent, Expr::Literal { value: Literal::String(member), .. }] = args.as_slice()
            else {
                return None;
            };
            let parent = module_name(usage, parent)?;
            usage.entry(parent).or_default().insert(member.clone());
            Some(member.clone())
        }
        _ => None,
    }
}

/// Minimal copy of `library` holding only the modules and members in `usage`.
/// Sub-modules are narrowed by their own usage entry; a module with no entry of its own
/// is copied whole, since the program may read any of its members dynamically.
pub fn narrow(library: &OrderedMap, usage: &ModuleUsage) -> OrderedMap {
    let mut narrowed = OrderedMap::new();
    let modules = usage
        .keys()
        .filter(|module| *module != LIBRARY)
        .chain(usage.get(LIBRARY).into_iter().flatten());
    for module in modules {
        if narrowed.contains_key(module) {
            continue;
        }
        match library.get(module) {
            Some(Value::Map(members)) => {
                let members = narrow_module(&members.borrow(), module, usage, 0);
                narrowed.insert(module.clone(), Value::map(members));
            }
            Some(value) => {
                narrowed.insert(module.clone(), value.clone());
            }
            None => {}
        }
    }
    narrowed
}

const MAX_NESTING: usize = 32;

fn narrow_module(module: &OrderedMap, name: &str, usage: &ModuleUsage, depth: usize) -> OrderedMap {
    let Some(wanted) = usage.get(name) else {
        return module.clone();
    };
    let mut narrowed = OrderedMap::new();
    for member in wanted {
        match module.get(member) {
            Some(Value::Map(sub)) if depth < MAX_NESTING => {
                let sub = narrow_module(&sub.borrow(), member, usage, depth + 1);
                narrowed.insert(member.clone(), Value::map(sub));
            }
            Some(value) => {
                narrowed.insert(member.clone(), value.clone());
            }
            None => {}
        }
    }
    narrowed
}
