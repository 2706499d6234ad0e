//! Programs importing from `LIBRARY`, run through both backends

use chip_core::ErrorKind;
use chip_core::Value;
use chip_core::pipeline::PipelineResult;
use chip_stdlib::{library, run_compiled, run_program};

fn both(source: &str) -> (PipelineResult<Value>, PipelineResult<Value>) {
    (
        run_program(source.to_string(), "lib.chip".to_string()),
        run_compiled(source.to_string(), "lib.chip".to_string()),
    )
}

fn assert_output(source: &str, expected: Value) {
    let (interpreted, compiled) = both(source);
    assert_eq!(interpreted.unwrap(), expected, "interpreted {source}");
    assert_eq!(compiled.unwrap(), expected, "compiled {source}");
}

fn assert_fails(source: &str, kind: ErrorKind) {
    let (interpreted, compiled) = both(source);
    assert_eq!(interpreted.unwrap_err().kind(), kind.as_str(), "interpreted {source}");
    assert_eq!(compiled.unwrap_err().kind(), kind.as_str(), "compiled {source}");
}

#[test]
fn test_library_lists_modules_in_order() {
    let library = library();
    assert_eq!(
        library.keys().collect::<Vec<_>>(),
        ["NAME", "MATH", "STRING", "CONVERT", "CONSOLE", "LOGIC", "LOOP", "ARRAY"]
    );
}

#[test]
fn test_member_imports() {
    assert_output(
        "<-[MATH][LIBRARY]; <-[sqrt; pow][MATH]; +[sqrt[16]; pow[2; 3]]",
        Value::Number(12.0),
    );
    assert_output(
        r#"<-[STRING][LIBRARY]; <-[upper_case; sp][STRING]; ~[upper_case["a"]; sp; "b"]"#,
        Value::from("A b"),
    );
}

#[test]
fn test_whole_module_import_keeps_every_member() {
    assert_output(
        r#"<-[MATH][LIBRARY]; .[MATH; "factorial"][5]"#,
        Value::Number(120.0),
    );
}

#[test]
fn test_program_callbacks_run_inside_natives() {
    let source = r#"
        <-[LOOP][LIBRARY];
        <-[repeat][LOOP];
        :=[total; 0];
        repeat[4; ->[i; +=[total; i]]];
        total
    "#;
    assert_output(source, Value::Number(6.0));
}

#[test]
fn test_natives_can_return_functions() {
    let source = r#"
        <-[LOOP][LIBRARY];
        <-[counter][LOOP];
        :=[next; counter[1]];
        next[];
        next[]
    "#;
    assert_output(source, Value::Number(2.0));
}

#[test]
fn test_generated_sequences_work_with_operators() {
    let source = r#"
        <-[ARRAY][LIBRARY];
        <-[range][ARRAY];
        .:reduce>>[range[1; 4]; ->[acc; x; +[acc; x]]; 0]
    "#;
    assert_output(source, Value::Number(10.0));
}

#[test]
fn test_errors_keep_their_kind_across_natives() {
    assert_fails("<-[MATH][LIBRARY]; <-[nope][MATH]", ErrorKind::Range);
    assert_fails("<-[STRING][LIBRARY]; <-[trim][STRING]; trim[1]", ErrorKind::Type);
    assert_fails(
        "<-[LOOP][LIBRARY]; <-[repeat][LOOP]; repeat[2; ->[i; !throw[0]]]",
        ErrorKind::Assertion,
    );
}

#[test]
fn test_print_returns_its_last_argument() {
    assert_output(r#"print["hello"; 42]"#, Value::Number(42.0));
}
