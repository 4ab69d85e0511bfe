use crate::parser::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// What went wrong while checking a program.
///
/// `DuplicateDefinition` is the only definition error; every other kind is a
/// type error raised while checking signatures or function bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    DuplicateDefinition,
    UnknownType,
    TypeMismatch,
    UnknownVariable,
    UnknownFunction,
    UnknownField,
    UnknownEnumMember,
    UnknownMethod,
    ArgumentCount,
    InvalidReferenceArgument,
    ConstAssignment,
    Redeclaration,
    LoopControlOutsideLoop,
    InvalidReturn,
    LiteralOutOfRange,
    DivisionByZero,
    MissingField,
    InvalidStatement,
    NoDefaultValue,
}

impl CompileErrorKind {
    pub fn is_definition_error(self) -> bool {
        self == CompileErrorKind::DuplicateDefinition
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_definition_error() {
            write!(f, "Definition error")
        } else {
            write!(f, "Type error")
        }
    }
}

/// The function whose body was being checked when an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionContext {
    pub name: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {location}: {message}{}", in_function_suffix(.function))]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub message: String,
    pub location: SourceLocation,
    pub function: Option<FunctionContext>,
}

fn in_function_suffix(function: &Option<FunctionContext>) -> String {
    match function {
        Some(ctx) => format!(" (in function '{}' at {})", ctx.name, ctx.location),
        None => String::new(),
    }
}

impl CompileError {
    pub fn new(
        kind: CompileErrorKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
            function: None,
        }
    }

    pub fn duplicate(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(CompileErrorKind::DuplicateDefinition, message, location)
    }

    pub fn mismatch(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(CompileErrorKind::TypeMismatch, message, location)
    }

    /// Attach the enclosing function, keeping the innermost one if already set.
    pub fn in_function(mut self, name: &str, location: SourceLocation) -> Self {
        if self.function.is_none() {
            self.function = Some(FunctionContext {
                name: name.to_string(),
                location,
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_function() {
        let err = CompileError::mismatch("Cannot assign", SourceLocation::new(3, 5))
            .in_function("main", SourceLocation::new(1, 1));
        assert_eq!(
            err.to_string(),
            "Type error at line 3, column 5: Cannot assign (in function 'main' at line 1, column 1)"
        );
    }

    #[test]
    fn test_in_function_keeps_first_context() {
        let err = CompileError::mismatch("x", SourceLocation::new(1, 1))
            .in_function("inner", SourceLocation::new(2, 1))
            .in_function("outer", SourceLocation::new(9, 1));
        assert_eq!(err.function.map(|f| f.name), Some("inner".to_string()));
    }

    #[test]
    fn test_definition_kind() {
        let err = CompileError::duplicate("Duplicate function 'f'", SourceLocation::new(1, 1));
        assert!(err.kind.is_definition_error());
        assert!(err.to_string().starts_with("Definition error"));
    }
}
