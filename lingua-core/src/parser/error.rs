use crate::{lexer::prelude::Token, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedFunctionName,
    ExpectedAsOrTaking,
    ExpectedNumber,
    ExpectedFactor,
    // a specific keyword or punctuation token
    Expected { token: Token },
    UnexpectedToken { token: Token },
    // an operation word in a list or natural phrase the resolver refused
    Unresolved { word: String, reason: String },
    NestingLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, String) {
        let message = match &self.error {
            ParseErrorType::ExpectedIdent => "Expected identifier".to_string(),
            ParseErrorType::ExpectedFunctionName => "Expected Function Name".to_string(),
            ParseErrorType::ExpectedAsOrTaking => "Expected 'as' or 'taking'".to_string(),
            ParseErrorType::ExpectedNumber => "Expected number".to_string(),
            ParseErrorType::ExpectedFactor => "Expected int, float, identifier, or '('".to_string(),
            ParseErrorType::Expected { token } => format!("Expected '{}'", token.as_literal()),
            ParseErrorType::UnexpectedToken { .. } => "Unexpected token".to_string(),
            ParseErrorType::Unresolved { reason, .. } => reason.clone(),
            ParseErrorType::NestingLimit { limit } => format!("Maximum nesting depth of {limit} exceeded"),
        };

        ("Invalid Syntax", message)
    }
}
