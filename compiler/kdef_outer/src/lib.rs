//! Outer syntax of K definition files.
//!
//! - [`lexer`]: `logos`-based tokenizer
//! - [`parser`]: recursive descent over requires, modules and sentences
//! - [`markdown`]: literate-source extraction with tag selectors
//!
//! Rule bodies are read in a fixed KAST-like notation
//! (`` `_+_`(X, 1) => X ``); the grammar generated from user productions
//! is not handled here.

mod error;
pub mod lexer;
pub mod markdown;
pub mod parser;

pub use error::ParseError;
pub use markdown::{extract_markdown, MdSelector, SelectorError};
pub use parser::{parse_definition, parse_term};
