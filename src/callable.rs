use std::fmt;

use crate::interpreter::Interpreter;
use crate::runtime_error::RuntimeError;
use crate::value::Value;

/// Anything that can be called from Lox source: user-defined functions and
/// native (host-provided) functions alike.
pub trait Callable: fmt::Debug {
    fn arity(&self) -> usize;

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError>;

    /// The string shown by `print` and string concatenation, e.g. "<fn add>".
    fn display(&self) -> String;
}
