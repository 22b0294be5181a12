// Static pass run once between parsing and interpretation. Catches a couple
// of scoping mistakes the evaluator would otherwise only notice at runtime
// (or, in the read-own-initializer case, never notice at all):
//
//   var a = "outer";
//   {
//     var a = a; // error: can't read 'a' in its own initializer
//   }
//
//   return 1; // error at top level: nothing to return to
//
// It also computes, for every variable reference and assignment, how many
// enclosing scopes separate it from the scope that declares it, and feeds
// that distance into the interpreter via `Interpreter::resolve`. This is
// not just an optimization: without it, a closure captures its environment
// by reference, and a later `var` of the same name in that same block would
// otherwise become visible retroactively to a closure created before it.
// Resolving by fixed distance, computed from where names are declared in
// source order rather than by walking the live environment at call time,
// is what keeps a closure seeing only the bindings that existed when it was
// created.

use std::collections::HashMap;

use crate::error::ErrorReporter;
use crate::expr::{Expr, ExprVisitor};
use crate::interpreter::Interpreter;
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
}

pub struct Resolver<'a, 'b> {
    interpreter: &'a mut Interpreter,
    error_reporter: &'b mut ErrorReporter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
}

impl<'a, 'b> Resolver<'a, 'b> {
    pub fn new(interpreter: &'a mut Interpreter, error_reporter: &'b mut ErrorReporter) -> Self {
        Self {
            interpreter,
            error_reporter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, statement: &Stmt) {
        statement.accept(self);
    }

    fn resolve_expr(&mut self, expression: &Expr) {
        expression.accept(self);
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    // Scans scopes from innermost outward; the hop count to the first scope
    // that declares `name` is the distance the interpreter jumps by by at
    // runtime. No match means the variable is global, left unresolved here.
    fn resolve_local(&mut self, expr: &Expr, name: &Token) {
        for (i, scope) in self.scopes.iter().enumerate().rev() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(expr, self.scopes.len() - 1 - i);
                return;
            }
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], function_type: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = function_type;

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}

impl<'a, 'b> StmtVisitor<()> for Resolver<'a, 'b> {
    fn visit_expression_stmt(&mut self, _stmt: &Stmt, expression: &Expr) {
        self.resolve_expr(expression);
    }

    fn visit_print_stmt(&mut self, _stmt: &Stmt, expression: &Expr) {
        self.resolve_expr(expression);
    }

    fn visit_var_stmt(&mut self, _stmt: &Stmt, name: &Token, initializer: &Option<Box<Expr>>) {
        self.declare(name);
        if let Some(init) = initializer {
            self.resolve_expr(init);
        }
        self.define(name);
    }

    fn visit_block_stmt(&mut self, _stmt: &Stmt, statements: Vec<Stmt>) {
        self.begin_scope();
        self.resolve(&statements);
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, _stmt: &Stmt, condition: &Expr, then_branch: &Stmt, else_branch: &Option<Box<Stmt>>) {
        self.resolve_expr(condition);
        self.resolve_stmt(then_branch);
        if let Some(else_stmt) = else_branch {
            self.resolve_stmt(else_stmt);
        }
    }

    fn visit_while_stmt(&mut self, _stmt: &Stmt, condition: &Expr, body: &Stmt) {
        self.resolve_expr(condition);
        self.resolve_stmt(body);
    }

    fn visit_function_stmt(&mut self, _stmt: &Stmt, name: &Token, params: &[Token], body: &[Stmt]) {
        self.declare(name);
        self.define(name);
        self.resolve_function(params, body, FunctionType::Function);
    }

    fn visit_return_stmt(&mut self, _stmt: &Stmt, keyword: &Token, value: &Option<Box<Expr>>) {
        if self.current_function == FunctionType::None {
            self.error_reporter.report(keyword.line, "", "Can't return from top-level code.");
        }
        if let Some(v) = value {
            self.resolve_expr(v);
        }
    }
}

impl<'a, 'b> ExprVisitor<()> for Resolver<'a, 'b> {
    fn visit_literal_expr(&mut self, _expr: &Expr, _value: &Option<crate::token::LiteralValue>) {}

    fn visit_grouping_expr(&mut self, _expr: &Expr, expression: &Expr) {
        self.resolve_expr(expression);
    }

    fn visit_unary_expr(&mut self, _expr: &Expr, _operator: &Token, right: &Expr) {
        self.resolve_expr(right);
    }

    fn visit_binary_expr(&mut self, _expr: &Expr, left: &Expr, _operator: &Token, right: &Expr) {
        self.resolve_expr(left);
        self.resolve_expr(right);
    }

    fn visit_variable_expr(&mut self, expr: &Expr, name: &Token) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&name.lexeme) == Some(&false) {
                self.error_reporter.report(
                    name.line,
                    "",
                    "Can't read local variable in its own initializer.",
                );
            }
        }
        self.resolve_local(expr, name);
    }

    fn visit_assign_expr(&mut self, expr: &Expr, name: &Token, value: &Expr) {
        self.resolve_expr(value);
        self.resolve_local(expr, name);
    }

    fn visit_logical_expr(&mut self, _expr: &Expr, left: &Expr, _operator: &Token, right: &Expr) {
        self.resolve_expr(left);
        self.resolve_expr(right);
    }

    fn visit_call_expr(&mut self, _expr: &Expr, callee: &Expr, _paren: &Token, arguments: &[Expr]) {
        self.resolve_expr(callee);
        for argument in arguments {
            self.resolve_expr(argument);
        }
    }
}
