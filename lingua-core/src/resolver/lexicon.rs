use std::{collections::HashMap, path::Path};

use thiserror::Error;

use super::operator::{Operator, ResolutionError};
use super::resolver::Resolver;

const STANDARD_WORDS: &[(&str, Operator)] = &[
    ("sum", Operator::Add),
    ("add", Operator::Add),
    ("plus", Operator::Add),
    ("total", Operator::Add),
    ("accumulate", Operator::Add),
    ("combine", Operator::Add),
    ("aggregate", Operator::Add),
    ("subtract", Operator::Subtract),
    ("minus", Operator::Subtract),
    ("difference", Operator::Subtract),
    ("take", Operator::Subtract),
    ("remove", Operator::Subtract),
    ("multiply", Operator::Multiply),
    ("times", Operator::Multiply),
    ("product", Operator::Multiply),
    ("divide", Operator::Divide),
    ("split", Operator::Divide),
    ("quotient", Operator::Divide),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexiconError {
    #[error("line {line}: expected `word = symbol`")]
    Malformed { line: usize },
    #[error("line {line}: `{symbol}` is not one of +, -, *, /")]
    UnknownSymbol { line: usize, symbol: String },
    #[error("line {line}: `{word}` is not a single word")]
    InvalidWord { line: usize, word: String },
    #[error("could not read lexicon file")]
    StdIo { err: std::io::ErrorKind },
}

/// In-process synonym table. Words are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    words: HashMap<String, Operator>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

impl Lexicon {
    pub fn empty() -> Self {
        Self { words: HashMap::new() }
    }

    /// The built-in English synonyms for the four operators.
    pub fn standard() -> Self {
        let mut lexicon = Self::empty();

        for (word, operator) in STANDARD_WORDS {
            lexicon.insert(word, *operator);
        }

        lexicon
    }

    pub fn insert(&mut self, word: &str, operator: Operator) -> Option<Operator> {
        self.words.insert(word.to_lowercase(), operator)
    }

    pub fn get(&self, word: &str) -> Option<Operator> {
        self.words.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Adds every `word = symbol` line of `text`. Blank lines and `#`
    /// comments are skipped. Nothing is inserted if any line is invalid.
    pub fn extend_from_str(&mut self, text: &str) -> Result<usize, LexiconError> {
        let mut entries = vec![];

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = match line.split_once('#') {
                Some((content, _)) => content,
                None => line,
            }.trim();

            if line.is_empty() {
                continue;
            }

            let (word, symbol) = line.split_once('=')
                .ok_or(LexiconError::Malformed { line: line_no })?;

            let word = word.trim();

            if word.is_empty() || !word.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(LexiconError::InvalidWord { line: line_no, word: word.to_string() });
            }

            let operator = Operator::from_symbol(symbol)
                .ok_or_else(|| LexiconError::UnknownSymbol {
                    line: line_no,
                    symbol: symbol.trim().to_string(),
                })?;

            entries.push((word, operator));
        }

        let count = entries.len();

        for (word, operator) in entries {
            self.insert(word, operator);
        }

        Ok(count)
    }

    /// The standard lexicon extended with the entries of the file at `path`.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| LexiconError::StdIo { err: err.kind() })?;

        let mut lexicon = Self::standard();
        lexicon.extend_from_str(&text)?;

        Ok(lexicon)
    }
}

impl Resolver for Lexicon {
    fn resolve(&self, word: &str) -> Result<Operator, ResolutionError> {
        self.get(word)
            .ok_or_else(|| ResolutionError::new(format!("Unknown operation word: '{word}'")))
    }
}
