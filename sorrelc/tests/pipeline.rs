//! End-to-end scenarios: full source through tokenize → parse → lower →
//! compile → run, asserting captured PRINT lines.

use sorrel_common::SorrelError;
use sorrel_parser::parse;
use sorrel_vm::{ScriptedHost, Vm};

fn run_source(src: &str, input: Vec<&str>) -> Vec<String> {
    try_run(src, input).expect("program faulted")
}

fn try_run(src: &str, input: Vec<&str>) -> Result<Vec<String>, SorrelError> {
    let ast = parse(src)?;
    let ir = sorrel_ir::lower(&ast)?;
    let code = sorrel_compiler::compile(&ir)?;
    let (host, out) = ScriptedHost::new(input);
    let mut vm = Vm::with_host(code, Box::new(host));
    vm.run()?;
    let lines = out.borrow().clone();
    Ok(lines)
}

#[test]
fn precedence_scenario() {
    let out = run_source("LET X = 2 + 3 * 4\nPRINT X", vec![]);
    assert_eq!(out, vec!["14"]);
}

#[test]
fn while_scenario() {
    let src = "\
LET I = 0
WHILE I < 3
  PRINT I
  LET I = I + 1
WEND
";
    assert_eq!(run_source(src, vec![]), vec!["0", "1", "2"]);
}

#[test]
fn for_scenario() {
    let src = "\
FOR I = 1 TO 3
  PRINT I
NEXT I
";
    assert_eq!(run_source(src, vec![]), vec!["1", "2", "3"]);
}

#[test]
fn array_sum_scenario() {
    let src = "\
LET A = ARRAY(3)
LET A[0] = 10
LET A[1] = 20
LET A[2] = 30
LET S = 0
LET I = 0
WHILE I < 3
  LET S = S + A[I]
  LET I = I + 1
WEND
PRINT S
";
    assert_eq!(run_source(src, vec![]), vec!["60"]);
}

#[test]
fn if_else_scenario() {
    let src = "\
LET X = 5
IF X > 3 THEN
  PRINT \"big\"
ELSE
  PRINT \"small\"
END IF
";
    assert_eq!(run_source(src, vec![]), vec!["big"]);
}

#[test]
fn repeat_scenario() {
    // the loop exits after one pass: Z becomes INT 1, so JZ does not jump
    let src = "\
REPEAT
  PRINT \"x\"
  LET Z = 1
UNTIL Z
";
    assert_eq!(run_source(src, vec![]), vec!["x"]);
}

#[test]
fn for_step_that_skips_the_bound_terminates() {
    let src = "\
FOR I = 1 TO 4 STEP 2
  PRINT I
NEXT
";
    // 1, 3, then 5 > 4 exits
    assert_eq!(run_source(src, vec![]), vec!["1", "3"]);
}

#[test]
fn for_with_from_past_to_runs_zero_times() {
    let out = run_source("FOR I = 1 TO 0\n  PRINT I\nNEXT\nPRINT \"done\"", vec![]);
    assert_eq!(out, vec!["done"]);
}

#[test]
fn descending_for_exits_immediately() {
    // step sign is not validated: counting down exits before the first pass
    let out = run_source("FOR I = 3 TO 1 STEP 0 - 1\n  PRINT I\nNEXT", vec![]);
    assert!(out.is_empty());
}

#[test]
fn print_emits_only_the_first_of_several_expressions() {
    assert_eq!(run_source("PRINT 1, 2, 3", vec![]), vec!["1"]);
}

#[test]
fn bare_print_emits_a_blank_line() {
    assert_eq!(run_source("PRINT", vec![]), vec![""]);
}

#[test]
fn input_scenario() {
    let src = "\
INPUT A
PRINT A + 1
";
    assert_eq!(run_source(src, vec!["41\n"]), vec!["? ", "42"]);
}

#[test]
fn input_falls_back_to_string() {
    let src = "\
INPUT NAME
PRINT NAME
";
    assert_eq!(run_source(src, vec!["world\n"]), vec!["? ", "world"]);
}

#[test]
fn relational_on_strings() {
    let src = "IF \"apple\" < \"banana\" THEN\nPRINT \"yes\"\nEND IF";
    assert_eq!(run_source(src, vec![]), vec!["yes"]);
}

#[test]
fn le_and_ge_agree_with_the_plain_notion() {
    for a in -2i64..=2 {
        for b in -2i64..=2 {
            let src = format!("LET A = {a}\nLET B = {b}\nPRINT A <= B\nPRINT A >= B");
            let out = run_source(&src, vec![]);
            assert_eq!(out[0], (a <= b).to_string(), "{a} <= {b}");
            assert_eq!(out[1], (a >= b).to_string(), "{a} >= {b}");
        }
    }
}

#[test]
fn boolean_connectives() {
    let src = "\
LET X = 3
IF X > 1 AND X < 5 THEN
  PRINT \"in\"
END IF
IF X < 1 OR X == 3 THEN
  PRINT \"or\"
END IF
PRINT NOT (1 == 2)
";
    assert_eq!(run_source(src, vec![]), vec!["in", "or", "true"]);
}

#[test]
fn unary_minus_and_modulo() {
    let out = run_source("PRINT -5\nPRINT -(-5)\nPRINT 7 % 3\nPRINT 1 != 2", vec![]);
    assert_eq!(out, vec!["-5", "5", "1", "true"]);
}

#[test]
fn nested_loops() {
    let src = "\
FOR I = 1 TO 2
  FOR J = 1 TO 2
    PRINT I * 10 + J
  NEXT J
NEXT I
";
    assert_eq!(run_source(src, vec![]), vec!["11", "12", "21", "22"]);
}

#[test]
fn arrays_are_reference_values_in_source() {
    let src = "\
LET A = ARRAY(2)
LET B = A
LET A[0] = 5
PRINT B[0]
PRINT B
";
    assert_eq!(run_source(src, vec![]), vec!["5", "[5, null]"]);
}

#[test]
fn runtime_type_fault_carries_ip() {
    let err = try_run("PRINT 1 + \"a\"", vec![]).unwrap_err();
    match err {
        SorrelError::Type { .. } => assert!(err.ip().is_some()),
        other => panic!("expected type fault, got {other:?}"),
    }
}

#[test]
fn whole_pipeline_fault_stages() {
    // tokenizer
    assert!(matches!(try_run("LET a = 1 ~", vec![]), Err(SorrelError::Tokenize { .. })));
    // parser
    assert!(matches!(try_run("LET = 5", vec![]), Err(SorrelError::Parse { .. })));
    // emitter
    assert!(matches!(try_run("PRINT missing", vec![]), Err(SorrelError::Emit { .. })));
    // runtime
    assert!(matches!(try_run("PRINT 1 / 0", vec![]), Err(SorrelError::Domain { .. })));
}

#[test]
fn repeat_with_scripted_input_runs_until_match() {
    let src = "\
LET SECRET = 7
LET TRIES = 0
REPEAT
  INPUT G
  LET TRIES = TRIES + 1
UNTIL G == SECRET
PRINT \"got it\"
PRINT TRIES
";
    let out = run_source(src, vec!["3\n", "9\n", "7\n"]);
    assert_eq!(out, vec!["? ", "? ", "? ", "got it", "3"]);
}

#[test]
fn if_with_false_condition_and_no_else_skips_the_body() {
    let out = run_source("LET X = 1\nIF X > 3 THEN\n  PRINT \"no\"\nEND IF\nPRINT \"after\"", vec![]);
    assert_eq!(out, vec!["after"]);
}

#[test]
fn while_condition_with_connectives() {
    let src = "\
LET I = 0
WHILE I < 10 AND NOT (I == 4)
  LET I = I + 1
WEND
PRINT I
";
    assert_eq!(run_source(src, vec![]), vec!["4"]);
}

#[test]
fn empty_array_prints_brackets() {
    assert_eq!(run_source("LET A = ARRAY(0)\nPRINT A", vec![]), vec!["[]"]);
}

#[test]
fn array_index_fault_surfaces_from_source() {
    let err = try_run("LET A = ARRAY(2)\nPRINT A[5]", vec![]).unwrap_err();
    assert!(matches!(err, SorrelError::Memory { .. }));
}

#[test]
fn single_line_blocks_execute() {
    assert_eq!(run_source("IF 1 THEN PRINT \"one\" END IF", vec![]), vec!["one"]);
}

#[test]
fn keywords_are_case_insensitive_end_to_end() {
    let src = "let x = 2\nprint x * 21\n";
    assert_eq!(run_source(src, vec![]), vec!["42"]);
}

#[test]
fn identifiers_fold_to_one_case() {
    // COUNT, count, and Count are the same variable
    let src = "LET COUNT = 1\nLET Count = count + 1\nPRINT COUNT\n";
    assert_eq!(run_source(src, vec![]), vec!["2"]);
}
