use std::time::{SystemTime, UNIX_EPOCH};

use crate::callable::Callable;
use crate::interpreter::Interpreter;
use crate::runtime_error::RuntimeError;
use crate::value::Value;

/// The single required built-in: `clock()`, returning the wall-clock time in
/// seconds since the Unix epoch. The book truncates to whole seconds via a
/// `duration_cast`; sub-second precision is kept here instead (tests must
/// not depend on it either way).
#[derive(Debug, Clone, Copy)]
pub struct Clock;

impl Callable for Clock {
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _interpreter: &mut Interpreter, _arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Ok(Value::Number(now.as_secs_f64()))
    }

    fn display(&self) -> String {
        "<fn clock>".to_string()
    }
}
