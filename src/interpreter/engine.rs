// Execution engine for the interpreter

use crate::builtins::BuiltinRegistry;
use crate::error::Result;
use crate::interpreter::constants::{MAX_CALL_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::errors::RuntimeError;
use crate::memory::stack::ScopeStack;
use crate::memory::value::Value;
use crate::memory::Slot;
use crate::parser::ast::{Function, NodeId, SourceLocation};
use crate::semantic::types::VariableType;
use crate::semantic::Program;
use crate::terminal::Terminal;
use log::{debug, trace};

/// How a statement finished.
///
/// Anything other than `Normal` unwinds enclosing blocks until a loop
/// (`Break`, `Continue`) or the function call (`Return`) consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// Tree-walking interpreter over a validated [`Program`]
pub struct Interpreter<'p> {
    /// Validated program: resolved globals plus the node type table
    pub(crate) program: &'p Program,

    /// Scopes of the function currently executing
    pub(crate) scopes: ScopeStack<Slot>,

    /// Output of the print builtins
    pub(crate) terminal: Terminal,

    pub(crate) builtins: &'static BuiltinRegistry,

    call_depth: usize,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Interpreter {
            program,
            scopes: ScopeStack::new(),
            terminal: Terminal::new(false),
            builtins: BuiltinRegistry::global(),
            call_depth: 0,
        }
    }

    /// Also write printed lines to stdout as they are produced
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.terminal = Terminal::new(echo);
        self
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn into_terminal(self) -> Terminal {
        self.terminal
    }

    /// Resolved type the validation pass recorded for a node
    pub(crate) fn type_of(&self, id: NodeId, location: SourceLocation) -> Result<&'p VariableType> {
        let program: &'p Program = self.program;
        Ok(program.types.expect(id, location)?)
    }

    /// Run `main()` to completion
    pub fn run(&mut self) -> Result<()> {
        let program = self.program;
        let main = program
            .globals
            .functions
            .get("main")
            .ok_or(RuntimeError::NoMainFunction)?;

        if !main.params.is_empty() {
            return Err(RuntimeError::InvalidMainSignature {
                location: main.location,
            }
            .into());
        }

        debug!("starting execution at main()");
        self.call_function(main, Vec::new(), main.location)?;
        debug!(
            "execution finished, {} lines printed",
            self.terminal.lines.len()
        );
        Ok(())
    }

    /// Execute a user function with already bound argument slots.
    ///
    /// The callee gets a fresh scope stack; the caller's is restored
    /// afterwards whatever the outcome. The native stack grows on demand,
    /// so only `MAX_CALL_DEPTH` bounds recursion.
    pub(crate) fn call_function(
        &mut self,
        function: &'p Function,
        args: Vec<Slot>,
        location: SourceLocation,
    ) -> Result<Option<Value>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.call_function_inner(function, args, location)
        })
    }

    fn call_function_inner(
        &mut self,
        function: &'p Function,
        args: Vec<Slot>,
        location: SourceLocation,
    ) -> Result<Option<Value>> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow {
                function: function.name.clone(),
                limit: MAX_CALL_DEPTH,
                location,
            }
            .into());
        }
        trace!("calling '{}' at depth {}", function.name, self.call_depth);

        let mut callee_scopes = ScopeStack::new();
        for (param, slot) in function.params.iter().zip(args) {
            callee_scopes.define(&param.name, slot);
        }

        let caller_scopes = std::mem::replace(&mut self.scopes, callee_scopes);
        self.call_depth += 1;
        let outcome = self.execute_block(&function.body);
        self.call_depth -= 1;
        self.scopes = caller_scopes;

        let returned = match outcome? {
            ControlFlow::Return(value) => value,
            _ => None,
        };

        match (&function.return_type, returned) {
            (Some(return_type), Some(value)) => Ok(Some(value.coerce_to(return_type))),
            (Some(_), None) => Err(RuntimeError::MissingReturnValue {
                function: function.name.clone(),
                location,
            }
            .into()),
            (None, _) => Ok(None),
        }
    }
}
