use std::rc::Rc;

use crate::{environment::prelude::Context, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorType {
    DivisionByZero,
    UndefinedVariable { name: String },
    NotCallable,
    ArityMismatch { passed: usize, expected: usize },
    EmptyList,
    IntegerOverflow,
    // arithmetic on a function value
    IllegalOperation,
    RecursionLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: SrcSpan,
    pub context: Rc<Context>,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, location: SrcSpan, context: &Rc<Context>) -> Self {
        Self {
            error,
            location,
            context: context.clone(),
        }
    }

    pub fn details(&self) -> (&'static str, String) {
        let message = match &self.error {
            RuntimeErrorType::DivisionByZero => "Division by zero".to_string(),
            RuntimeErrorType::UndefinedVariable { name } => format!("'{name}' is not defined"),
            RuntimeErrorType::NotCallable => "Identifier is not a function".to_string(),
            RuntimeErrorType::ArityMismatch { passed, expected } => {
                format!("{passed} args passed, {expected} expected")
            },
            RuntimeErrorType::EmptyList => "Cannot perform operation on empty list".to_string(),
            RuntimeErrorType::IntegerOverflow => "Integer overflow".to_string(),
            RuntimeErrorType::IllegalOperation => "Illegal operation".to_string(),
            RuntimeErrorType::RecursionLimit { limit } => {
                format!("Maximum call depth of {limit} exceeded")
            },
        };

        ("Runtime Error", message)
    }
}
