//! Interpreting a program and executing its compiled Lua must agree on the result
//! value or the error kind.
#![cfg(feature = "lua")]

mod common;

use chip_core::runtime::{Builtins, ErrorKind, RuntimeError, Value};
use common::{run_compiled_with, run_with};

const CORPUS: &[&str] = &[
    // arithmetic and strings
    "+[1; 2; 3]",
    "-[10; 3; 2]",
    "/[4]",
    "/[1; 0]",
    "%[-7; 3]",
    "|[3.14159; 2]",
    "|[1; 101]",
    "~[\"a\"; \"b\"]",
    "~[\"a\"; 1]",
    "+[1; \"a\"]",
    "`[\"42\"]",
    "`[\"12px\"]",
    "`[1.5]",
    "![\"\"]",
    "?==[1; 2; 3]",
    // arity is checked before arguments are evaluated
    "+[1]",
    "+[undefined]",
    "%[1; 2; 3]",
    ":=[x]",
    // comparisons and equality
    "<[1; 2; 3]",
    "<[2; 3; 1]",
    ">=[\"b\"; \"a\"]",
    "<[1; \"a\"]",
    "==[.:[1]; .:[1]]",
    ":=[s; .:[1]]; ==[s; s]",
    "===[.:[1; .:[2]]; .:[1; .:[2]]]",
    "===[::[\"a\"; 1; \"b\"; 2]; ::[\"b\"; 2; \"a\"; 1]]",
    "!==[1; 2]",
    "==[?[0; 1]; 0]",
    "!=[?[0; 1]; 0]",
    "===[?[0; 1]; 0]",
    "===[.:[?[0; 1]]; .:[0]]",
    ".:unique[.:[0; ?[0; 1]]]",
    "==[?[0; 1]; \"\"]",
    // control forms
    "&&[1; \"x\"; 0; undefined]",
    "||[0; \"\"; \"hit\"; undefined]",
    "&&[1; 2]",
    "?[0; 1; 0; 2; 3]",
    "?[0; 1]",
    "?[1; \"yes\"; undefined]",
    ":[]",
    ":[1; 2; 3]",
    ":[:=[a; 1]; +[a; 1]]",
    "|>[5; ->[x; +[x; 1]]; ->[x; *[x; 2]]]",
    "|>[10; -[3]; /[7]]",
    // declarations and assignment
    ":=[x; 5; y; +[x; 2]]",
    ":=[x; 5; y; +[x; 2]]; .:[x; y]",
    ":=[x; 1]; =[x; 5]; x",
    ":=[x; 1]; +=[x]; *=[x; 10]; -=[x; 5]",
    ":=[x; \"a\"]; +=[x]",
    "=[ghost; 1]",
    "=[\"a\"; 1]",
    "+=[\"a\"]",
    ":=[a.b; 1]",
    ":=[\"a\"; 1]",
    ":=[a; 1; b-c; 2]; a",
    "'[red; green]; ~[red; green]",
    "'[1]",
    "~=[v]; +[v; 4]",
    "~=[v; 3]; v",
    "missing",
    "+[missing; 1]",
    // functions
    ":=[add; ->[a; b; +[a; b]]]; add[2; 3]",
    ":=[f; ->[a; b; b]]; f[1]",
    ":=[f; ->[a; a]]; f[1; 2; 3]",
    ":=[f; ->[1; a]]",
    ":=[x; 1]; x[2]",
    "=>[4; ->[x; *[x; x]]]",
    ":=[out; .:[]]; *loop[3; ->[i; .:append[out; i]]]; out",
    ":=[make; ->[:[:=[count; 0]; ->[+=[count]]]]]; :=[next; make[]]; next[]; next[]; next[]",
    ":=[fib; ->[n; ?[<[n; 2]; n; +[fib[-[n; 1]]; fib[-[n; 2]]]]]]; fib[12]",
    ":=[f; ->[n; :[:=[t; *[n; 2]]; t]]]; f[4]",
    ":=[down; ->[n; ?[>[n; 0]; down[-[n; 1]]; 0]]]; down[100]",
    ":=[down; ->[n; ?[>[n; 0]; down[-[n; 1]]; 0]]]; down[1000]",
    "~=[count; ->[n; acc; ?[>[n; 0]; count[-[n; 1]; +[acc; 1]]; acc]]]; count[1000; 0]",
    "~=[f; 1]",
    ":=[deep; ->[n; ?[>[n; 0]; .:reduce>>[.:[1]; ->[acc; x; deep[-[n; 1]]]; 0]; 0]]]; deep[40]",
    ":=[deep; ->[n; ?[>[n; 0]; .:reduce>>[.:[1]; ->[acc; x; deep[-[n; 1]]]; 0]; 0]]]; deep[250]",
    // assertions
    "!throw[1]",
    "!throw[0]",
    "!throw[==[1; 2]; \"equality\"]",
    // maps
    ":=[m; ::[\"a\"; 1; \"b\"; 2]]; .=[m; \"c\"; 3]; .!=[m; \"a\"]; ::entries[m]",
    "::size[::[\"a\"; 1]]",
    ".?[::[\"a\"; 1]; \"b\"]",
    ".[::[\"a\"; 1]; \"b\"]",
    ".!=[::[]; \"b\"]",
    "::[1; 2]",
    "::[\"abcdefghijk\"; 1]",
    ".=[::[]; \"abcdefghijk\"; 1]",
    ":=[m; ::[\"f\"; ->[x; *[x; 3]]]]; .[m; \"f\"][7]",
    "::values[::[\"a\"; .:[1]; \"b\"; \"s\"]]",
    // sequences
    "^[.:[1; 2; 3]; -1]",
    "^[.:[1; 2; 3]; 5]",
    "^[\"abc\"; 1]",
    "^[.:[1]; 0.5]",
    ":=[s; .:[1; 2]]; ^=[s; 0; 9]; s",
    ":=[s; .:[1; 2]]; ...[s; .:[3]; .:[4]]; s",
    ".:prepend[.:[3]; 1; 2]",
    ".:map>>[.:[1; 2]; ->[x; i; +[x; i]]]",
    ".:map<<[.:[1; 2; 3]; ->[x; *[x; 2]]]",
    ".:filter[.:[1; 2; 3; 4]; ->[x; %[x; 2]]]",
    ".:reduce>>[.:[1; 2; 3]; ->[acc; x; +[acc; x]]; 0]",
    ".:reduce<<[.:[\"a\"; \"b\"]; ->[acc; x; ~[acc; x]]; \"\"]",
    ".:flatten[.:[1; .:[2; 3]]; ->[x; *[x; 10]]]",
    ".:find>>[.:[1; 5; 7]; ->[x; >[x; 4]]]",
    ".:find_index<<[.:[1; 5; 7]; ->[x; >[x; 4]]]",
    ".:every[.:[2; 4]; ->[x; ![%[x; 2]]]]",
    ".:some[.:[]; ->[x; 1]]",
    ".:first[.:[]]",
    ".:last[.:[1; 2]]",
    ".:is_in_bounds[.:[1; 2]; -2]",
    ".:add_at[.:[1; 3]; 1; 2]",
    ".:add_at[.:[1]; 5; 2]",
    ".:remove_from[.:[1; 2; 3]; 0; 2]",
    ".:head[.:[1; 2; 3]]",
    ".:tail[.:[1; 2; 3]]",
    ":=[s; .:[1; 2]]; .:cut[s]; s",
    ".:chop[.:[]]",
    ".:length[.:seq[5]]",
    ".:matrix[2; 3]",
    ".:from_string[\"a,b\"; \",\"]",
    ".:to_string[.:[1; \"x\"]; \"-\"]",
    ".:chunks[.:[1; 2; 3]; 2]",
    ".:chunks[.:[1]; 0]",
    ".:group[.:[1; 2; 3; 4]; ->[x; ?[%[x; 2]; \"odd\"; \"even\"]]]",
    ".:rotate[.:[1; 2; 3]; 1; 1]",
    ".:rotate[.:[1; 2; 3]; 1; 0]",
    ".:flat[.:[1; .:[2; .:[3]]]; 2]",
    ".:slice[.:[1; 2; 3; 4]; 1; -1]",
    ".:quick_sort[.:[3; 1; 2]; -1]",
    ".:quick_sort[.:[3; \"a\"]; 1]",
    ".:merge_sort[.:[3; 1; 2]; ->[a; b; -[a; b]]]",
    ".:union[.:[1; 2]; .:[2; 3]]",
    ".:intersection[.:[1; 2; 3]; .:[3; 2]]",
    ".:difference[.:[1; 2; 3]; .:[2]]",
    ".:xor[.:[1; 2]; .:[2; 3]]",
    ".:unique[.:[1; 1; 2; 1]]",
    ".:duplicates[.:[1; 2; 2; 1; 1]]",
    ".:reverse[.:[1; 2; 3]]",
    ".:take[.:[1; 2; 3]; 2]",
    ".:concat[.:[1]; .:[2]; .:[3]]",
    ".:splice[.:[1; 2; 3]; 1; 1; 9]",
    ":=[s; .:[1; 2]]; ==[.:clear[s]; s]",
    ".:balance[.:prepend[.:[1]; 0]]",
    ">>[.:[1; 2]; ->[x; x]]",
    // imports and destructuring
    ":=[M; ::[\"sq\"; ->[x; *[x; x]]; \"k\"; 3]]; <-[sq; k][M]; sq[k]",
    ":=[M; ::[]]; <-[sq][M]",
    "<-[sq][1]",
    ":=[M; ::[\"a\"; 1]]; <-[constructor][M]",
    ":=[M; ::[\"a\"; 1]]; <-[1][M]",
    ":=[L; ::[\"S\"; ::[\"up\"; 2]]]; <-[up][.[L; \"S\"]]; up",
    "<-::[a; b; ::[\"a\"; 1; \"b\"; 2]]; -[b; a]",
    "<-.:[x; y; .:[1; 2; 3]]; y",
    "<-::[z; ::[\"a\"; 1]]",
    "<-.:[a; 1]",
    "<-.:[1; .:[1]]",
];

fn describe(result: &Result<Value, RuntimeError>) -> String {
    match result {
        Ok(value) => format!("{value:?}"),
        Err(err) => err.kind.to_string(),
    }
}

/// Void and zero compare equal as values, so the kinds are checked as well.
fn agree(left: &Result<Value, RuntimeError>, right: &Result<Value, RuntimeError>) -> bool {
    match (left, right) {
        (Ok(a), Ok(b)) => a.kind() == b.kind() && a == b,
        (Err(a), Err(b)) => a.kind == b.kind,
        _ => false,
    }
}

fn mismatches<S: AsRef<str>>(corpus: &[S], builtins: &Builtins) -> Vec<String> {
    corpus
        .iter()
        .map(|source| source.as_ref())
        .filter_map(|source| {
            let interpreted = run_with(source, builtins);
            let compiled = run_compiled_with(source, builtins);
            (!agree(&interpreted, &compiled)).then(|| {
                format!(
                    "{source}\n  interpreted: {}\n  compiled:    {}",
                    describe(&interpreted),
                    describe(&compiled)
                )
            })
        })
        .collect()
}

#[test]
fn test_backends_agree_on_corpus() {
    let failures = mismatches(CORPUS, &Builtins::new());
    assert!(failures.is_empty(), "backends disagree:\n{}", failures.join("\n"));
}

fn declarations(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!(":=[{prefix}{i}; {i}]; "))
        .collect()
}

#[test]
fn test_backends_agree_on_large_scopes() {
    let top = declarations("v", 250);
    let nested = declarations("w", 250);
    let programs = [
        format!("{top}+[v0; v249]"),
        format!("{top}=[v200; 7]; .:[v119; v120; v200]"),
        format!("{top}+=[v249]; :=[get; ->[v249]]; get[]"),
        format!(":=[f; ->[n; :[{nested}+[n; w249]]]]; f[1]"),
        format!(":=[f; ->[n; :[{nested}->[w248]]]]; f[1][]"),
    ];
    let failures = mismatches(&programs, &Builtins::new());
    assert!(failures.is_empty(), "backends disagree:\n{}", failures.join("\n"));
    assert_eq!(run_with(&programs[0], &Builtins::new()).unwrap(), Value::Number(249.0));
}

#[test]
fn test_names_read_before_declaration() {
    let builtins = host_builtins();
    let early = "+[x; 1]; :=[x; 1]";
    assert_eq!(run_with(early, &builtins).unwrap_err().kind, ErrorKind::Reference);
    assert!(matches!(run_compiled_with(early, &builtins).unwrap(), Value::Number(n) if n == 1.0));

    let shadowed = ":=[r; twice[2]]; :=[twice; 5]; r";
    assert_eq!(run_with(shadowed, &builtins).unwrap(), Value::Number(4.0));
    assert_eq!(run_compiled_with(shadowed, &builtins).unwrap_err().kind, ErrorKind::Type);
}

const HOST_CORPUS: &[&str] = &[
    "twice[21]",
    ":=[f; twice]; f[4]",
    ".:map>>[.:[1; 2]; twice]",
    "=[twice; 3]; twice",
    "<-[twice][TOOLS]; twice[2]",
    "fail[]",
];

fn host_builtins() -> Builtins {
    let mut builtins = Builtins::new();
    builtins.function("twice", |args| {
        let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
        Ok(Value::Number(n * 2.0))
    });
    builtins.function("fail", |_| Err(RuntimeError::range("out of range")));
    let tools = builtins.get("twice").cloned().unwrap_or(Value::Void);
    let mut module = chip_core::runtime::OrderedMap::new();
    module.insert("twice", tools);
    builtins.insert("TOOLS", Value::map(module));
    builtins
}

#[test]
fn test_backends_agree_with_extra_builtins() {
    let failures = mismatches(HOST_CORPUS, &host_builtins());
    assert!(failures.is_empty(), "backends disagree:\n{}", failures.join("\n"));
}
