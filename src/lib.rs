//! # Introduction
//!
//! xlang parses, validates and runs programs written in a small statically
//! typed language with structs, enums, arrays, by-reference parameters and a
//! single `loop` construct.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → GlobalScope → validation_pass → Program → Interpreter
//! ```
//!
//! 1. [`parser`] tokenises the source and builds the global scope.
//! 2. [`semantic`] resolves types, infers literal types and checks every
//!    function body, producing a [`semantic::Program`].
//! 3. [`interpreter`] walks the validated tree; printed output is collected
//!    in a [`terminal::Terminal`].
//! 4. [`builtins`] holds the native functions and methods both stages share.
//! 5. [`diagnostics`] renders any [`error::Error`] against its source.
//!
//! ```
//! let terminal = xlang::run("func main() { print(1 + 2); }").unwrap();
//! assert_eq!(terminal.get_output(), vec!["3"]);
//! ```

pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod semantic;
pub mod terminal;

use error::Result;
use interpreter::Interpreter;
use parser::ast::GlobalScope;
use parser::parser::Parser;
use semantic::Program;
use terminal::Terminal;

/// Parse source text into its global scope
pub fn parse(source: &str) -> Result<GlobalScope> {
    Parser::new(source)?.parse_program()
}

/// Parse and validate
pub fn compile(source: &str) -> Result<Program> {
    let globals = parse(source)?;
    semantic::validation_pass(&globals)
}

/// Parse, validate and run `main()`, returning everything it printed
pub fn run(source: &str) -> Result<Terminal> {
    let program = compile(source)?;
    let mut interpreter = Interpreter::new(&program);
    interpreter.run()?;
    Ok(interpreter.into_terminal())
}
