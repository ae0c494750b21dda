//! An interpreter for combinatory logic over I, K, S, B, C and W.
//!
//! ```text
//! Ia = a
//! Kab = a
//! Sabc = ac(bc)
//! Babc = a(bc)
//! Cabc = acb
//! Wab = abb
//! ```
//!
//! Programs may also be written in Iota (`*`, `i`) or Jot (`0`, `1`); all
//! three notations parse to the same [`Term`] trees.

pub mod evaluator;
pub mod iota;
pub mod jot;
pub mod lexer;
pub mod parser;
pub mod prelude;
pub mod ski;
pub mod term;

pub use evaluator::{reduce, reduce_traced, simplify, simplify_traced, Tracer};
pub use parser::{parse, Notation, ParseError};
pub use term::{apply, full_string, short_string, Combinator, Leaf, Term, TermRef};
