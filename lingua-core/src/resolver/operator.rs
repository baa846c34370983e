use std::fmt::Display;

use thiserror::Error;

use crate::lexer::prelude::Token;

/// One of the four arithmetic operators an operation word can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol.trim() {
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            _ => return None,
        })
    }

    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Subtract,
            Token::Star => Self::Multiply,
            Token::Slash => Self::Divide,
            _ => return None,
        })
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, Self::Add | Self::Subtract)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Why a word could not be turned into an operator. Unknown words and
/// backend failures look the same to the parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ResolutionError {
    pub reason: String,
}

impl ResolutionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}
