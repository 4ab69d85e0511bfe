// Constants for the interpreter

/// Deepest allowed chain of nested user function calls.
///
/// Past this depth the call fails with a stack overflow error.
pub const MAX_CALL_DEPTH: usize = 512;

/// Remaining native stack below which calls and evaluation grow the stack
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated native stack segment
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;
