use thiserror::Error;

use crate::token::Token;
use crate::value::Value;

/// Errors raised while walking the AST.
///
/// `Return` is not a user-visible error; it is the control-flow channel a
/// `return` statement uses to unwind to the nearest enclosing function call,
/// in place of a mutable "returning" flag threaded through every statement
/// visitor.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("[Line {line}] Error '{lexeme}': {message}")]
    Error {
        line: usize,
        lexeme: String,
        message: String,
    },

    #[error("return (internal control flow, not a user-visible error)")]
    Return(Value),
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError::Error {
            line: token.line,
            lexeme: token.lexeme.clone(),
            message: message.into(),
        }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        Self::new(name, format!("Undefined variable '{}'.", name.lexeme))
    }

    /// Some non-local exit (a `return`) masquerading as an error. Lets
    /// callers that only want to propagate genuine errors tell the
    /// difference from a `return` unwinding through them.
    pub fn is_control_flow(&self) -> bool {
        matches!(self, RuntimeError::Return(_))
    }
}
