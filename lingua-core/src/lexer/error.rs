use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    NumberTooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan,
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, String) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => ("Illegal Character", format!("'{tok}'")),
            LexicalErrorType::NumberTooLarge => ("Illegal Character", "Number is too large".to_string()),
        }
    }
}
