use std::{cell::RefCell, collections::HashMap};

use super::operator::{Operator, ResolutionError};

/// Maps an operation word to one of the four operators.
///
/// Lookups are case-insensitive. Implementations may block (a network backed
/// oracle, for example) and may fail; the parser treats every failure the
/// same way.
pub trait Resolver {
    fn resolve(&self, word: &str) -> Result<Operator, ResolutionError>;
}

impl<F> Resolver for F
    where F: Fn(&str) -> Result<Operator, ResolutionError>
{
    fn resolve(&self, word: &str) -> Result<Operator, ResolutionError> {
        self(word)
    }
}

/// Rejects every word, so only symbolic operators are understood.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl Resolver for NullResolver {
    fn resolve(&self, word: &str) -> Result<Operator, ResolutionError> {
        Err(ResolutionError::new(format!(
            "Cannot resolve operation word '{word}' without a resolver"
        )))
    }
}

/// Remembers every answer of the wrapped resolver, failures included, keyed by
/// the lowercased word.
#[derive(Debug)]
pub struct CachingResolver<R: Resolver> {
    inner: R,
    cache: RefCell<HashMap<String, Result<Operator, ResolutionError>>>,
}

impl<R: Resolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<R: Resolver> Resolver for CachingResolver<R> {
    fn resolve(&self, word: &str) -> Result<Operator, ResolutionError> {
        let key = word.to_lowercase();

        if let Some(answer) = self.cache.borrow().get(&key) {
            return answer.clone();
        }

        let answer = self.inner.resolve(word);
        self.cache.borrow_mut().insert(key, answer.clone());

        answer
    }
}
