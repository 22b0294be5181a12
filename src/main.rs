use std::io::{self, Write};
use std::process;

use clap::Parser as ClapParser;
use log::info;

use rlox::ast_printer::AstPrinter;
use rlox::error::ErrorReporter;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner::Scanner;
use rlox::stmt::Stmt;

/// A tree-walking interpreter for Lox.
#[derive(ClapParser)]
#[command(name = "rlox", about = "A tree-walking interpreter for Lox")]
struct Cli {
    /// Script to run. Omit to start an interactive prompt.
    script: Option<String>,

    /// Print the parenthesized form of each top-level expression before evaluating it.
    #[arg(long)]
    print_ast: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut error_reporter = ErrorReporter::new();
    let mut interpreter = Interpreter::new();

    match &cli.script {
        Some(path) => run_file(path, &mut interpreter, &mut error_reporter, cli.print_ast),
        None => run_prompt(&mut interpreter, &mut error_reporter, cli.print_ast),
    }
}

fn run_file(path: &str, interpreter: &mut Interpreter, error_reporter: &mut ErrorReporter, print_ast: bool) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading file '{}': {}", path, err);
            process::exit(66);
        }
    };

    match run(&source, interpreter, error_reporter, print_ast, false) {
        RunOutcome::Ok => {}
        RunOutcome::StaticError => process::exit(65),
        RunOutcome::RuntimeError => process::exit(70),
    }
}

fn run_prompt(interpreter: &mut Interpreter, error_reporter: &mut ErrorReporter, print_ast: bool) {
    info!("starting interactive prompt");
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF (Ctrl-D)
            Ok(_) => {
                run(&line, interpreter, error_reporter, print_ast, true);
                error_reporter.reset();
                debug_assert!(interpreter.is_at_global_scope());
            }
            Err(err) => {
                eprintln!("Error reading input: {}", err);
                break;
            }
        }
    }
}

enum RunOutcome {
    Ok,
    StaticError,
    RuntimeError,
}

fn run(source: &str, interpreter: &mut Interpreter, error_reporter: &mut ErrorReporter, print_ast: bool, repl: bool) -> RunOutcome {
    let tokens = Scanner::new(source, error_reporter).scan_tokens();
    if error_reporter.had_error() {
        return RunOutcome::StaticError;
    }

    let statements = match Parser::new(tokens).parse(error_reporter) {
        Some(statements) => statements,
        None => return RunOutcome::StaticError,
    };
    if error_reporter.had_error() {
        return RunOutcome::StaticError;
    }

    Resolver::new(interpreter, error_reporter).resolve(&statements);
    if error_reporter.had_error() {
        return RunOutcome::StaticError;
    }

    if print_ast {
        print_statements(&statements);
    }

    // The REPL convenience from the book: a single bare expression statement
    // echoes its value instead of requiring an explicit `print`. Only the
    // prompt gets this; a file whose whole program is one expression
    // statement still just evaluates and discards it.
    if repl {
        if let [Stmt::Expression { expression }] = statements.as_slice() {
            return match expression.accept(interpreter) {
                Ok(value) => {
                    println!("{}", value);
                    RunOutcome::Ok
                }
                Err(err) => {
                    eprintln!("{}", err);
                    RunOutcome::RuntimeError
                }
            };
        }
    }

    match interpreter.interpret(&statements) {
        Ok(()) => RunOutcome::Ok,
        Err(err) => {
            eprintln!("{}", err);
            RunOutcome::RuntimeError
        }
    }
}

fn print_statements(statements: &[Stmt]) {
    let mut printer = AstPrinter::new();
    for statement in statements {
        if let Stmt::Expression { expression } = statement {
            eprintln!("{}", printer.print(expression));
        }
    }
}
