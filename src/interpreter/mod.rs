//! Tree-walking execution engine
//!
//! - [`engine`]: the [`Interpreter`] itself, function calls and `main()`
//! - [`errors`]: runtime error types
//!
//! Statements report how they finished through [`ControlFlow`]; `break`,
//! `continue` and `return` travel outward as values rather than unwinding.
//! Expressions read the types the validation pass recorded for them, so the
//! tree is never re-checked while running.

pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod loops;
mod ops;
mod statements;

pub use engine::{ControlFlow, Interpreter};
pub use errors::{AssertionFailure, RuntimeError};
