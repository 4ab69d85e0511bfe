//! Source parser
//!
//! - [`lexer`]: source text → tokens
//! - [`parser`]: tokens → [`ast::GlobalScope`]
//! - [`ast`]: node definitions
//!
//! Hand-written recursive descent with precedence climbing for binary
//! operators. Every expression and declaration gets a [`ast::NodeId`] so the
//! validation pass can attach types without touching the tree.

pub mod ast;
pub mod lexer;
pub mod parser;
