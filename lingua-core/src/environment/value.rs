use std::{fmt::Display, rc::Rc};

use crate::{
    eval::prelude::RuntimeErrorType,
    parser::prelude::{FuncDef, Number},
    resolver::prelude::Operator,
    utils::prelude::SrcSpan,
};
use super::environment::Scope;

/// A runtime value stamped with the span of the expression that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub location: SrcSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Number(Number),
    Function(Function),
}

/// A function bundled with the live scope it was defined in.
#[derive(Clone)]
pub struct Function {
    pub def: Rc<FuncDef>,
    pub scope: Scope,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.def.name.value
    }

    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

// The scope may hold the function itself, so neither impl looks inside it.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def) && Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Value {
    pub fn new(kind: ValueKind, location: SrcSpan) -> Self {
        Self { kind, location }
    }

    pub fn int(value: i64, location: SrcSpan) -> Self {
        Self::new(ValueKind::Number(Number::Int(value)), location)
    }

    /// The same value reported at another span.
    pub fn at(mut self, location: SrcSpan) -> Self {
        self.location = location;
        self
    }

    pub fn as_number(&self) -> Option<Number> {
        match &self.kind {
            ValueKind::Number(number) => Some(*number),
            ValueKind::Function(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValueKind::Number(number) => write!(f, "{number}"),
            ValueKind::Function(function) => write!(f, "<function {}>", function.name()),
        }
    }
}

impl Number {
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
        }
    }

    /// `self <operator> rhs`. Integers stay integers except under division,
    /// which always produces a float.
    pub fn apply(self, operator: Operator, rhs: Number) -> Result<Number, RuntimeErrorType> {
        if operator == Operator::Divide {
            if rhs.is_zero() {
                return Err(RuntimeErrorType::DivisionByZero);
            }

            return Ok(Number::Float(self.as_f64() / rhs.as_f64()));
        }

        match (self, rhs) {
            (Number::Int(lhs), Number::Int(rhs)) => {
                let result = match operator {
                    Operator::Add => lhs.checked_add(rhs),
                    Operator::Subtract => lhs.checked_sub(rhs),
                    Operator::Multiply => lhs.checked_mul(rhs),
                    Operator::Divide => None,
                };

                result
                    .map(Number::Int)
                    .ok_or(RuntimeErrorType::IntegerOverflow)
            },
            (lhs, rhs) => {
                let (lhs, rhs) = (lhs.as_f64(), rhs.as_f64());

                Ok(Number::Float(match operator {
                    Operator::Add => lhs + rhs,
                    Operator::Subtract => lhs - rhs,
                    Operator::Multiply => lhs * rhs,
                    Operator::Divide => lhs / rhs,
                }))
            }
        }
    }
}
