/*
Interpreter.rs: Evaluation/Execution

Input: AST nodes
Output: Runtime values and side effects (printing, variable storage, etc.)
Walks the tree using the visitor pattern and executes as it goes.
*/

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::callable::Callable;
use crate::environment::Environment;
use crate::expr::{Expr, ExprVisitor};
use crate::function::{FunctionDeclaration, LoxFunction};
use crate::native::Clock;
use crate::runtime_error::RuntimeError;
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{LiteralValue, Token, TokenType};
use crate::value::Value;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    // Scope-hop distance for each variable reference/assignment the resolver
    // has classified as local, keyed by the expression node itself (`Expr`
    // can't be hashed, so this is a linear-scan association list - see the
    // note on `Expr`'s `PartialEq` derive). A reference absent from this
    // list is global and is looked up in `globals` directly.
    locals: Vec<(Expr, usize)>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        globals
            .borrow_mut()
            .define("clock".to_string(), Value::Callable(Rc::new(Clock)));

        Self {
            globals: globals.clone(),
            environment: globals,
            locals: Vec::new(),
        }
    }

    /// Records that `expr` (a `Variable` or `Assign` node) resolves to a
    /// binding `depth` enclosing-scope hops from wherever it is evaluated.
    /// Called by the resolver, once per reference, before interpretation.
    pub fn resolve(&mut self, expr: &Expr, depth: usize) {
        if let Some(entry) = self.locals.iter_mut().find(|(e, _)| e == expr) {
            entry.1 = depth;
        } else {
            self.locals.push((expr.clone(), depth));
        }
    }

    fn distance_of(&self, expr: &Expr) -> Option<usize> {
        self.locals.iter().find(|(e, _)| e == expr).map(|(_, d)| *d)
    }

    fn lookup_variable(&self, expr: &Expr, name: &Token) -> Result<Value, RuntimeError> {
        match self.distance_of(expr) {
            Some(distance) => Ok(Environment::get_at(self.environment.clone(), distance, &name.lexeme)),
            None => self.globals.borrow().get(name),
        }
    }

    /// True once `self.environment` is back to the global frame - the
    /// scope-restoration invariant every `interpret` call must leave intact,
    /// whether it returned normally or raised.
    pub fn is_at_global_scope(&self) -> bool {
        Rc::ptr_eq(&self.environment, &self.globals)
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            trace!("executing top-level statement");
            // A `return` that leaks to top level (the resolver normally
            // rejects this statically) is silently discarded rather than
            // surfaced as a runtime error, matching the book's behavior.
            match statement.accept(self) {
                Ok(()) => {}
                Err(err) if err.is_control_flow() => return Ok(()),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Executes `statements` in `environment`, restoring the interpreter's
    /// previous environment on every exit path - normal completion, an
    /// early return, or a genuine runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                statement.accept(self)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn check_number_operand(&self, operator: &Token, operand: &Value) -> Result<f64, RuntimeError> {
        match operand {
            Value::Number(n) => Ok(*n),
            _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
        }
    }

    fn check_number_operands(
        &self,
        operator: &Token,
        left: &Value,
        right: &Value,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
            _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
        }
    }
}

impl StmtVisitor<Result<(), RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, _stmt: &Stmt, expression: &Expr) -> Result<(), RuntimeError> {
        expression.accept(self)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, _stmt: &Stmt, expression: &Expr) -> Result<(), RuntimeError> {
        let value = expression.accept(self)?;
        println!("{}", value);
        Ok(())
    }

    fn visit_var_stmt(
        &mut self,
        _stmt: &Stmt,
        name: &Token,
        initializer: &Option<Box<Expr>>,
    ) -> Result<(), RuntimeError> {
        let value = match initializer {
            Some(init) => init.accept(self)?,
            None => Value::Nil,
        };

        self.environment.borrow_mut().define(name.lexeme.clone(), value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, _stmt: &Stmt, statements: Vec<Stmt>) -> Result<(), RuntimeError> {
        let block_env = Environment::with_enclosing(self.environment.clone());
        self.execute_block(&statements, block_env)
    }

    fn visit_if_stmt(
        &mut self,
        _stmt: &Stmt,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: &Option<Box<Stmt>>,
    ) -> Result<(), RuntimeError> {
        if condition.accept(self)?.is_truthy() {
            then_branch.accept(self)?;
        } else if let Some(else_stmt) = else_branch {
            else_stmt.accept(self)?;
        }
        Ok(())
    }

    fn visit_while_stmt(&mut self, _stmt: &Stmt, condition: &Expr, body: &Stmt) -> Result<(), RuntimeError> {
        while condition.accept(self)?.is_truthy() {
            body.accept(self)?;
        }
        Ok(())
    }

    fn visit_function_stmt(
        &mut self,
        _stmt: &Stmt,
        name: &Token,
        params: &[Token],
        body: &[Stmt],
    ) -> Result<(), RuntimeError> {
        let declaration = Rc::new(FunctionDeclaration {
            name: name.clone(),
            params: params.to_vec(),
            body: body.to_vec(),
        });

        // The closure is whatever environment is current right now, which
        // already contains this function's own name once define() below
        // runs - that's what makes recursive calls resolve.
        let function = LoxFunction::new(declaration, self.environment.clone());
        debug!("declared function '{}'", name.lexeme);
        self.environment
            .borrow_mut()
            .define(name.lexeme.clone(), Value::Callable(Rc::new(function)));

        Ok(())
    }

    fn visit_return_stmt(
        &mut self,
        _stmt: &Stmt,
        _keyword: &Token,
        value: &Option<Box<Expr>>,
    ) -> Result<(), RuntimeError> {
        let val = match value {
            Some(v) => v.accept(self)?,
            None => Value::Nil,
        };

        // Not a real error - this is how a `return` unwinds to the nearest
        // enclosing function call. See RuntimeError::Return's docs.
        Err(RuntimeError::Return(val))
    }
}

impl ExprVisitor<Result<Value, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, _expr: &Expr, value: &Option<LiteralValue>) -> Result<Value, RuntimeError> {
        Ok(match value {
            Some(LiteralValue::Boolean(b)) => Value::Boolean(*b),
            Some(LiteralValue::Nil) | None => Value::Nil,
            Some(LiteralValue::Number(n)) => Value::Number(*n),
            Some(LiteralValue::String(s)) => Value::String(s.clone()),
        })
    }

    fn visit_grouping_expr(&mut self, _expr: &Expr, expression: &Expr) -> Result<Value, RuntimeError> {
        expression.accept(self)
    }

    fn visit_unary_expr(&mut self, _expr: &Expr, operator: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let right_value = right.accept(self)?;
        match operator.token_type {
            TokenType::Bang => Ok(Value::Boolean(!right_value.is_truthy())),
            TokenType::Minus => {
                let num = self.check_number_operand(operator, &right_value)?;
                Ok(Value::Number(-num))
            }
            _ => Err(RuntimeError::new(
                operator,
                format!("Unreachable: unknown unary operator {:?}.", operator.token_type),
            )),
        }
    }

    fn visit_binary_expr(
        &mut self,
        _expr: &Expr,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left_value = left.accept(self)?;
        let right_value = right.accept(self)?;

        match operator.token_type {
            TokenType::Plus => match (&left_value, &right_value) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(format!("{}{}", l, r))),
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenType::Minus => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Number(l - r))
            }
            TokenType::Star => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Number(l * r))
            }
            TokenType::Slash => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                // Division by zero follows IEEE-754 (+/-inf or NaN); not a runtime error.
                Ok(Value::Number(l / r))
            }
            TokenType::Greater => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Boolean(l > r))
            }
            TokenType::GreaterEqual => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Boolean(l >= r))
            }
            TokenType::Less => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Boolean(l < r))
            }
            TokenType::LessEqual => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Boolean(l <= r))
            }
            TokenType::EqualEqual => Ok(Value::Boolean(left_value.is_equal(&right_value))),
            TokenType::BangEqual => Ok(Value::Boolean(!left_value.is_equal(&right_value))),
            _ => Err(RuntimeError::new(
                operator,
                format!("Unreachable: unknown binary operator {:?}.", operator.token_type),
            )),
        }
    }

    fn visit_variable_expr(&mut self, expr: &Expr, name: &Token) -> Result<Value, RuntimeError> {
        self.lookup_variable(expr, name)
    }

    fn visit_assign_expr(&mut self, expr: &Expr, name: &Token, value: &Expr) -> Result<Value, RuntimeError> {
        let val = value.accept(self)?;
        match self.distance_of(expr) {
            Some(distance) => Environment::assign_at(self.environment.clone(), distance, name, val.clone()),
            None => self.globals.borrow_mut().assign(name, val.clone())?,
        }
        Ok(val)
    }

    fn visit_logical_expr(
        &mut self,
        _expr: &Expr,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left_value = left.accept(self)?;

        match operator.token_type {
            TokenType::Or => {
                if left_value.is_truthy() {
                    Ok(left_value)
                } else {
                    right.accept(self)
                }
            }
            TokenType::And => {
                if !left_value.is_truthy() {
                    Ok(left_value)
                } else {
                    right.accept(self)
                }
            }
            _ => Err(RuntimeError::new(
                operator,
                format!("Unreachable: unknown logical operator {:?}.", operator.token_type),
            )),
        }
    }

    fn visit_call_expr(
        &mut self,
        _expr: &Expr,
        callee: &Expr,
        paren: &Token,
        arguments: &[Expr],
    ) -> Result<Value, RuntimeError> {
        let callee_value = callee.accept(self)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(argument.accept(self)?);
        }

        let Value::Callable(function) = callee_value else {
            return Err(RuntimeError::new(paren, "Can only call functions and classes."));
        };

        if args.len() != function.arity() {
            return Err(RuntimeError::new(
                paren,
                format!("Expected {} arguments but got {}.", function.arity(), args.len()),
            ));
        }

        function.call(self, args)
    }
}
