//! ECMAScript/TypeScript parser front end for cjs2esm.
//!
//! Wraps the standard SWC parser and keeps what the transform needs next to
//! the module: the comment store (so untouched code keeps its comments) and
//! the source map (for codegen and source maps).

pub mod error;
pub mod parse;

pub use error::ParseError;
pub use parse::{parse_commonjs, syntax_for, ParseResult};
