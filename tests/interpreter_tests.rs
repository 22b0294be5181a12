use rlox::error::ErrorReporter;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::runtime_error::RuntimeError;
use rlox::scanner::Scanner;
use rlox::stmt::Stmt;

/// Lexes, parses, resolves, and interprets `source` against a fresh
/// interpreter. Panics if scanning, parsing, or resolving reports an error -
/// callers that expect a static error should inspect `ErrorReporter`
/// directly instead of going through this helper.
fn run(source: &str) -> Result<(), RuntimeError> {
    let mut reporter = ErrorReporter::new();
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    assert!(!reporter.had_error(), "scan error for {source:?}");

    let statements = Parser::new(tokens).parse(&mut reporter).expect("parses");
    assert!(!reporter.had_error(), "parse error for {source:?}");

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
    assert!(!reporter.had_error(), "resolve error for {source:?}");

    interpreter.interpret(&statements)
}

fn statements_of(source: &str) -> Vec<Stmt> {
    let mut reporter = ErrorReporter::new();
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    Parser::new(tokens).parse(&mut reporter).unwrap_or_default()
}

#[test]
fn arithmetic_honors_precedence() {
    assert!(run("var x = 1 + 2 * 3 - 4 / 2; if (x != 5) assertionFailed;").is_ok());
}

#[test]
fn string_concatenation_and_mixed_type_error() {
    assert!(run("var s = \"a\" + \"b\"; if (s != \"ab\") assertionFailed;").is_ok());

    let err = run("var bad = \"a\" + 1;").unwrap_err();
    assert!(!err.is_control_flow());
    assert!(err.to_string().contains("Operands must be two numbers or two strings."));
}

#[test]
fn closures_capture_the_defining_scope() {
    let source = r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = makeCounter();
        var first = counter();
        var second = counter();
        if (first != 1 or second != 2) assertionFailed;
    "#;
    assert!(run(source).is_ok());
}

#[test]
fn recursive_fibonacci() {
    let source = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        var result = fib(10);
        if (result != 55) assertionFailed;
    "#;
    assert!(run(source).is_ok());
}

#[test]
fn logical_operators_short_circuit_and_return_the_operand() {
    let source = r#"
        fun boom() {
            return nil;
        }
        var a = false and boom();
        if (a != false) assertionFailed;
        var b = true or boom();
        if (b != true) assertionFailed;
    "#;
    assert!(run(source).is_ok());
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let err = run("print missing;").unwrap_err();
    assert!(err.to_string().contains("Undefined variable 'missing'."));
}

#[test]
fn calling_a_function_with_the_wrong_arity_errors() {
    let err = run("fun one(a) { return a; } one(1, 2);").unwrap_err();
    assert!(err.to_string().contains("Expected 1 arguments but got 2."));
}

#[test]
fn calling_a_non_callable_value_errors() {
    let err = run("var notAFunction = 1; notAFunction();").unwrap_err();
    assert!(err.to_string().contains("Can only call functions and classes."));
}

#[test]
fn clock_is_callable_with_zero_arguments() {
    assert!(run("var t = clock(); if (t < 0) assertionFailed;").is_ok());
}

#[test]
fn interpreter_restores_global_scope_after_a_runtime_error() {
    let mut interpreter = Interpreter::new();
    let statements = statements_of("{ var x = 1; print y; }");
    let _ = interpreter.interpret(&statements);
    assert!(interpreter.is_at_global_scope());
}

#[test]
fn interpreter_restores_global_scope_after_a_return_from_a_nested_call() {
    let mut interpreter = Interpreter::new();
    let statements = statements_of("fun f() { { return 1; } } f();");
    let result = interpreter.interpret(&statements);
    assert!(result.is_ok());
    assert!(interpreter.is_at_global_scope());
}

#[test]
fn reading_a_local_in_its_own_initializer_is_a_static_error() {
    let mut reporter = ErrorReporter::new();
    let tokens = Scanner::new("var a = \"outer\"; { var a = a; }", &mut reporter).scan_tokens();
    let statements = Parser::new(tokens).parse(&mut reporter).expect("parses");
    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
    assert!(reporter.had_error());
}

#[test]
fn returning_from_top_level_code_is_a_static_error() {
    let mut reporter = ErrorReporter::new();
    let tokens = Scanner::new("return 1;", &mut reporter).scan_tokens();
    let statements = Parser::new(tokens).parse(&mut reporter).expect("parses");
    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
    assert!(reporter.had_error());
}

#[test]
fn a_closure_only_sees_bindings_that_existed_when_it_was_created() {
    let source = r#"
        var a = "global";
        var seenFirst = nil;
        var seenSecond = nil;
        {
            fun show() {
                return a;
            }
            seenFirst = show();
            var a = "inner";
            seenSecond = show();
        }
        if (seenFirst != "global" or seenSecond != "global") assertionFailed;
    "#;
    assert!(run(source).is_ok());
}
