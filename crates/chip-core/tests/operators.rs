//! Builtin operators exercised through whole programs

mod common;

use chip_core::runtime::{ErrorKind, Value};
use common::{assert_program_fails, assert_program_output, num, seq, strings};

#[test]
fn test_arithmetic() {
    assert_program_output("-[10; 3; 2]", num(5.0));
    assert_program_output("/[4]", num(0.25));
    assert_program_output("%[-7; 3]", num(-1.0));
    assert_program_output("|[3.14159; 2]", num(3.14));
    assert_program_output("|[2.5]", num(3.0));
    assert_program_fails("/[1; 0]", ErrorKind::Range);
    assert_program_fails("+[1; \"a\"]", ErrorKind::Type);
    assert_program_fails("|[1; 101]", ErrorKind::Range);
}

#[test]
fn test_void_reads_as_zero_in_numeric_positions() {
    assert_program_output("~=[v]; +[v; 4]", num(4.0));
}

#[test]
fn test_arity_is_range_error() {
    assert_program_fails("+[1]", ErrorKind::Range);
    assert_program_fails("%[1; 2; 3]", ErrorKind::Range);
    assert_program_fails(":=[x]", ErrorKind::Range);
}

#[test]
fn test_comparisons_check_first_against_rest() {
    assert_program_output("<[1; 2; 3]", num(1.0));
    assert_program_output("<[2; 3; 1]", num(0.0));
    assert_program_output("==[1; 1; 1]", num(1.0));
    assert_program_output("!=[1; 2; 3]", num(1.0));
    assert_program_output(">=[\"b\"; \"a\"]", num(1.0));
    assert_program_fails("<[1; \"a\"]", ErrorKind::Type);
}

#[test]
fn test_scalar_equality_is_identity_for_collections() {
    assert_program_output("==[.:[1]; .:[1]]", num(0.0));
    assert_program_output(":=[s; .:[1]]; ==[s; s]", num(1.0));
    assert_program_output("===[.:[1]; .:[1]]", num(1.0));
    assert_program_output("!==[1; 2]", num(1.0));
}

#[test]
fn test_void_equals_zero() {
    assert_program_output("==[?[0; 1]; 0]", num(1.0));
    assert_program_output("!=[?[0; 1]; 0]", num(0.0));
    assert_program_output("===[?[0; 1]; 0]", num(1.0));
    assert_program_output("===[.:[1; ?[0; 1]]; .:[1; 0]]", num(1.0));
    assert_program_output("?==[?[0; 1]; 7]", num(1.0));
    assert_program_output(".:length[.:unique[.:[0; ?[0; 1]; 0]]]", num(1.0));
    assert_program_output("==[?[0; 1]; \"\"]", num(0.0));
}

#[test]
fn test_logic_returns_deciding_operand() {
    assert_program_output("&&[1; \"x\"; 0; undefined]", num(0.0));
    assert_program_output("||[0; \"\"; \"hit\"; undefined]", Value::from("hit"));
    assert_program_output("![\"\"]", num(1.0));
}

#[test]
fn test_branches() {
    assert_program_output("?[0; 1; 0; 2; 3]", num(3.0));
    assert_program_output("?[0; 1]", Value::Void);
    assert_program_output("?[1; \"yes\"; undefined]", Value::from("yes"));
}

#[test]
fn test_strings_and_casts() {
    assert_program_output("~[\"a\"; \"b\"; \"c\"]", Value::from("abc"));
    assert_program_output("`[\"42\"]", num(42.0));
    assert_program_output("`[\" \"]", num(0.0));
    assert_program_output("`[1.5]", Value::from("1.5"));
    assert_program_output("?==[1; 2; 3]", num(1.0));
    assert_program_output("?==[1; \"2\"]", num(0.0));
    let nan = common::run_program("`[\"12px\"]").unwrap();
    assert!(matches!(nan, Value::Number(n) if n.is_nan()));
}

#[test]
fn test_assignment_forms() {
    assert_program_output(":=[x; 1]; =[x; 5]; x", num(5.0));
    assert_program_output(":=[x; 1]; +=[x]; *=[x; 10]; -=[x; 5]", num(15.0));
    assert_program_fails("=[ghost; 1]", ErrorKind::Reference);
    assert_program_fails(":=[a.b; 1]", ErrorKind::Syntax);
    assert_program_fails(":=[\"a\"; 1]", ErrorKind::Syntax);
    assert_program_fails("=[\"a\"; 1]", ErrorKind::Type);
}

#[test]
fn test_symbols_and_calls() {
    assert_program_output("'[red; green]; ~[red; green]", Value::from("redgreen"));
    assert_program_output("=>[4; ->[x; *[x; x]]]", num(16.0));
    assert_program_output(
        ":=[out; .:[]]; *loop[3; ->[i; .:append[out; i]]]; out",
        seq(&[0.0, 1.0, 2.0]),
    );
}

#[test]
fn test_maps() {
    let source = r#"
        :=[m; ::["a"; 1; "b"; 2]];
        .=[m; "c"; 3];
        .!=[m; "a"];
        ::keys[m]
    "#;
    assert_program_output(source, strings(&["b", "c"]));
    assert_program_output("::size[::[\"a\"; 1]]", num(1.0));
    assert_program_output(".?[::[\"a\"; 1]; \"b\"]", num(0.0));
    assert_program_fails(".[::[\"a\"; 1]; \"b\"]", ErrorKind::Range);
    assert_program_fails(".!=[::[]; \"b\"]", ErrorKind::Range);
    assert_program_fails("::[1; 2]", ErrorKind::Type);
}

#[test]
fn test_methods_read_from_maps_see_their_receiver() {
    let source = r#"
        :=[m; ::["n"; 2; "f"; ->[x; *[x; 3]]]];
        .[m; "f"][7]
    "#;
    assert_program_output(source, num(21.0));
}

#[test]
fn test_indexing() {
    assert_program_output("^[.:[1; 2; 3]; -1]", num(3.0));
    assert_program_output("^[\"abc\"; 1]", Value::from("b"));
    assert_program_output(":=[s; .:[1; 2]]; ^=[s; 0; 9]; s", seq(&[9.0, 2.0]));
    assert_program_fails("^[.:[1]; 0.5]", ErrorKind::Type);
    assert_program_fails("^=[.:[1]; 3; 0]", ErrorKind::Range);
}

#[test]
fn test_sequence_mutation_returns_same_instance() {
    assert_program_output(":=[s; .:[1]]; ==[.:append[s; 2]; s]", num(1.0));
    assert_program_output(":=[s; .:[1]]; ==[.:copy[s]; s]", num(0.0));
    assert_program_output(":=[s; .:[1; 2]]; ...[s; .:[3]; .:[4]]; s", seq(&[1.0, 2.0, 3.0, 4.0]));
    assert_program_output(".:prepend[.:[3]; 1; 2]", seq(&[1.0, 2.0, 3.0]));
}

#[test]
fn test_sequence_queries() {
    assert_program_output(".:map>>[.:[1; 2]; ->[x; i; +[x; i]]]", seq(&[1.0, 3.0]));
    assert_program_output(".:filter[.:[1; 2; 3; 4]; ->[x; %[x; 2]]]", seq(&[1.0, 3.0]));
    assert_program_output(".:reduce<<[.:[\"a\"; \"b\"]; ->[acc; x; ~[acc; x]]; \"\"]", Value::from("ba"));
    assert_program_output(".:find>>[.:[1; 5; 7]; ->[x; >[x; 4]]]", num(5.0));
    assert_program_output(".:find<<[.:[1; 5; 7]; ->[x; >[x; 4]]]", num(7.0));
    assert_program_output(".:find_index>>[.:[1]; ->[x; >[x; 4]]]", num(-1.0));
    assert_program_output(".:every[.:[2; 4]; ->[x; ![%[x; 2]]]]", num(1.0));
    assert_program_output(".:some[.:[]; ->[x; 1]]", num(0.0));
    assert_program_output(".:first[.:[]]", Value::Void);
    assert_program_output(".:is_in_bounds[.:[1; 2]; -2]", num(0.0));
}

#[test]
fn test_sequence_shapes() {
    assert_program_output(".:seq[3]", seq(&[0.0, 1.0, 2.0]));
    assert_program_output(".:length[.:matrix[2; 3]]", num(3.0));
    assert_program_output(".:length[^[.:matrix[2; 3]; 0]]", num(2.0));
    assert_program_output(".:flat[.:[1; .:[2; .:[3]]]; 2]", seq(&[1.0, 2.0, 3.0]));
    assert_program_output(".:slice[.:[1; 2; 3; 4]; 1; -1]", seq(&[2.0, 3.0]));
    assert_program_output(".:rotate[.:[1; 2; 3]; 1; 1]", seq(&[2.0, 3.0, 1.0]));
    assert_program_output(".:rotate[.:[1; 2; 3]; 1; -1]", seq(&[3.0, 1.0, 2.0]));
    assert_program_fails(".:rotate[.:[1]; 1; 0]", ErrorKind::Range);
    assert_program_output(".:from_string[\"ab\"; \"\"]", strings(&["a", "b"]));
    assert_program_output(".:to_string[.:[1; 2]; \"-\"]", Value::from("1-2"));
    assert_program_output(".:splice[.:[1; 2; 3]; 1; 1; 9]", seq(&[2.0]));
    assert_program_output(".:take_right[.:[1; 2; 3]; 2]", seq(&[2.0, 3.0]));
}

#[test]
fn test_grouping_and_chunks() {
    let source = r#"
        :=[g; .:group[.:[1; 2; 3; 4]; ->[x; ?[%[x; 2]; "odd"; "even"]]]];
        .[g; "even"]
    "#;
    assert_program_output(source, seq(&[2.0, 4.0]));
    assert_program_output(".:length[.:chunks[.:[1; 2; 3]; 2]]", num(2.0));
    assert_program_fails(".:chunks[.:[1]; 0]", ErrorKind::Range);
}

#[test]
fn test_sorting() {
    assert_program_output(".:quick_sort[.:[3; 1; 2]; 1]", seq(&[1.0, 2.0, 3.0]));
    assert_program_output(".:quick_sort[.:[3; 1; 2]; -1]", seq(&[3.0, 2.0, 1.0]));
    assert_program_fails(".:quick_sort[.:[3; 1]; 2]", ErrorKind::Range);
    assert_program_output(
        ".:merge_sort[.:[3; 1; 2]; ->[a; b; -[a; b]]]",
        seq(&[1.0, 2.0, 3.0]),
    );
}

#[test]
fn test_set_algebra() {
    assert_program_output(".:union[.:[1; 2]; .:[2; 3]]", seq(&[1.0, 2.0, 3.0]));
    assert_program_output(".:intersection[.:[1; 2; 3]; .:[3; 2]]", seq(&[2.0, 3.0]));
    assert_program_output(".:difference[.:[1; 2; 3]; .:[2]]", seq(&[1.0, 3.0]));
    assert_program_output(".:xor[.:[1; 2]; .:[2; 3]]", seq(&[1.0, 3.0]));
    assert_program_output(".:unique[.:[1; 1; 2; 1]]", seq(&[1.0, 2.0]));
    assert_program_output(".:duplicates[.:[1; 2; 2; 1; 1]]", seq(&[2.0, 1.0]));
}

#[test]
fn test_imports() {
    let source = r#"
        :=[M; ::["sq"; ->[x; *[x; x]]; "k"; 3]];
        <-[sq; k][M];
        sq[k]
    "#;
    assert_program_output(source, num(9.0));
    assert_program_fails(":=[M; ::[]]; <-[sq][M]", ErrorKind::Range);
    assert_program_fails("<-[sq][1]", ErrorKind::Type);
    assert_program_fails(":=[M; ::[]]; <-[constructor][M]", ErrorKind::Type);
}

#[test]
fn test_destructuring() {
    assert_program_output(
        "<-::[a; b; ::[\"a\"; 1; \"b\"; 2]]; -[b; a]",
        num(1.0),
    );
    assert_program_output("<-.:[x; y; .:[1; 2; 3]]; y", seq(&[2.0, 3.0]));
    assert_program_fails("<-::[z; ::[\"a\"; 1]]", ErrorKind::Type);
}

#[test]
fn test_assertions() {
    assert_program_output("!throw[1]", Value::Void);
    assert_program_fails("!throw[0]", ErrorKind::Assertion);
}
