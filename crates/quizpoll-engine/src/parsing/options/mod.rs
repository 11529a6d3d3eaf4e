//! # Option Lexing
//!
//! Turns the raw text between `{` and `}` into answer options. General
//! feedback (`####`) is cut off first, then the remainder is split at answer
//! markers either line by line or inline, depending on how the block is laid
//! out.

pub mod cursor;
pub mod kinds;
pub mod lexer;

pub use lexer::{LexedBlock, RawOption, clean_markup, lex};
