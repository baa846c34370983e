use std::{path::{Path, PathBuf}, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Context, Environment, Scope, Value},
    eval::prelude::eval,
    lexer::prelude::tokenize,
    parser::prelude::parse_tokens,
    resolver::prelude::{Lexicon, Resolver},
    utils::prelude::{Error, EventEmitter},
};

/// Name used for text that did not come from a file.
pub const STDIN: &str = "<stdin>";

/// Owns the global scope and the resolver. Bindings made by one `run` are
/// visible to every later one, including those of runs that failed part way.
pub struct Session {
    globals: Scope,
    resolver: Rc<dyn Resolver>,
    events: EventEmitter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Rc::new(Lexicon::standard()))
    }
}

impl Session {
    pub fn new(resolver: Rc<dyn Resolver>) -> Self {
        Self {
            globals: Environment::new_scope(),
            resolver,
            events: EventEmitter::null(),
        }
    }

    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }

    /// Lexes, parses and evaluates `text`. Exactly one of a value or the first
    /// error is returned.
    pub fn run(&self, path: impl AsRef<Path>, text: &str) -> Result<Value, Error> {
        let path = path.as_ref();

        let tokens = tokenize(text).map_err(|error| Error::Lex {
            path: path.to_path_buf(),
            src: text.to_string(),
            error,
        })?;

        let program = parse_tokens(tokens, &*self.resolver, self.events.clone())
            .map_err(|error| Error::Parse {
                path: path.to_path_buf(),
                src: text.to_string(),
                error,
            })?;

        eval(&program, &self.globals, &Context::root()).map_err(|error| Error::Runtime {
            path: path.to_path_buf(),
            src: text.to_string(),
            error,
        })
    }

    /// Reads the file at `path` as UTF-8 and runs it.
    pub fn run_file(&self, path: PathBuf) -> Result<Value, Error> {
        let src = read_source(&path)?;

        self.run(path, &src)
    }
}

pub fn read_source(path: &Path) -> Result<String, Error> {
    let file = std::fs::File::open(path)?;

    let file_size = file.metadata()?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);

    for ch in reader.chars() {
        src.push(ch?);
    }

    Ok(src)
}

#[cfg(test)]
mod tests;
