pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod environment;
pub mod eval;
pub mod session;
pub mod utils;
