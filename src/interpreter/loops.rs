//! `loop { ... }` execution.
//!
//! The body runs statement by statement under an index. `continue` rewinds
//! the index to the first statement, `break` leaves the loop, and `return`
//! unwinds through it. There is no step budget: a loop without a reachable
//! `break` or `return` runs forever.

use crate::error::Result;
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::parser::ast::Statement;
use log::trace;

impl<'p> Interpreter<'p> {
    pub(crate) fn execute_loop(&mut self, body: &'p [Statement]) -> Result<ControlFlow> {
        self.scopes.push_scope();
        let outcome = self.run_loop_body(body);
        self.scopes.pop_scope();
        outcome
    }

    fn run_loop_body(&mut self, body: &'p [Statement]) -> Result<ControlFlow> {
        let mut index = 0;

        loop {
            let Some(statement) = body.get(index) else {
                // End of an iteration: each pass starts with an empty frame
                index = 0;
                self.scopes.clear_top();
                continue;
            };

            match self.execute_statement(statement)? {
                ControlFlow::Normal => index += 1,
                ControlFlow::Continue => {
                    trace!("continue at {}", statement.location());
                    index = 0;
                    self.scopes.clear_top();
                }
                ControlFlow::Break => return Ok(ControlFlow::Normal),
                flow @ ControlFlow::Return(_) => return Ok(flow),
            }
        }
    }
}
