pub mod operator;
pub mod resolver;
pub mod lexicon;

pub mod prelude {
    pub use super::{
        operator::*,
        resolver::*,
        lexicon::*
    };
}
