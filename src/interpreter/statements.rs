//! Statement execution
//!
//! Adds `impl Interpreter` methods for every statement form except `loop`,
//! which lives in `loops.rs`.

use crate::error::{InternalCompilerError, Result};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::memory::new_slot;
use crate::memory::value::Value;
use crate::parser::ast::{Expression, ExpressionKind, SourceLocation, Statement};

impl<'p> Interpreter<'p> {
    /// Run statements in order, stopping at the first non-`Normal` signal
    pub(crate) fn execute_block(&mut self, statements: &'p [Statement]) -> Result<ControlFlow> {
        for statement in statements {
            let flow = self.execute_statement(statement)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn execute_scoped_block(&mut self, statements: &'p [Statement]) -> Result<ControlFlow> {
        self.scopes.push_scope();
        let outcome = self.execute_block(statements);
        self.scopes.pop_scope();
        outcome
    }

    pub(crate) fn execute_statement(&mut self, statement: &'p Statement) -> Result<ControlFlow> {
        match statement {
            Statement::VariableDeclaration {
                id, name, location, ..
            } => {
                let ty = self.type_of(*id, *location)?;
                let value = self.default_value(ty, *location)?;
                self.define_variable(name, value, *location)?;
                Ok(ControlFlow::Normal)
            }

            Statement::VariableDefinition {
                id,
                name,
                value,
                location,
                ..
            } => {
                let ty = self.type_of(*id, *location)?;
                let value = self.evaluate(value)?.coerce_to(ty);
                self.define_variable(name, value, *location)?;
                Ok(ControlFlow::Normal)
            }

            Statement::VariableAssign { target, value, .. } => {
                let value = self.evaluate(value)?;
                let access = match &target.kind {
                    ExpressionKind::VariableAccess(access) => access,
                    _ => {
                        return Err(InternalCompilerError::at(
                            "Assignment target is not a variable access",
                            target.location,
                        )
                        .into())
                    }
                };
                let ty = self.type_of(target.id, target.location)?;
                self.assign(access, value.coerce_to(ty))?;
                Ok(ControlFlow::Normal)
            }

            Statement::Loop { body, .. } => self.execute_loop(body),

            Statement::If {
                condition,
                body,
                elifs,
                else_body,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    return self.execute_scoped_block(body);
                }
                for elif in elifs {
                    if self.evaluate_condition(&elif.condition)? {
                        return self.execute_scoped_block(&elif.body);
                    }
                }
                match else_body {
                    Some(else_body) => self.execute_scoped_block(else_body),
                    None => Ok(ControlFlow::Normal),
                }
            }

            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => Some(self.evaluate(expr)?),
                    None => None,
                };
                Ok(ControlFlow::Return(value))
            }

            Statement::Break { .. } => Ok(ControlFlow::Break),
            Statement::Continue { .. } => Ok(ControlFlow::Continue),

            Statement::FunctionCall { call, .. } => match &call.kind {
                ExpressionKind::FunctionCall(function_call) => {
                    self.evaluate_call(function_call)?;
                    Ok(ControlFlow::Normal)
                }
                _ => Err(InternalCompilerError::at("Call statement without a call", call.location).into()),
            },

            Statement::MethodCall { access, .. } => match &access.kind {
                ExpressionKind::VariableAccess(variable_access) => {
                    self.evaluate_access(variable_access)?;
                    Ok(ControlFlow::Normal)
                }
                _ => Err(InternalCompilerError::at(
                    "Method call statement without an access",
                    access.location,
                )
                .into()),
            },
        }
    }

    fn evaluate_condition(&mut self, condition: &'p Expression) -> Result<bool> {
        let value = self.evaluate(condition)?;
        value.as_bool().ok_or_else(|| {
            InternalCompilerError::at(
                format!("Condition evaluated to {}", value.kind_name()),
                condition.location,
            )
            .into()
        })
    }

    fn define_variable(&mut self, name: &str, value: Value, location: SourceLocation) -> Result<()> {
        if self.scopes.define(name, new_slot(value)) {
            Ok(())
        } else {
            Err(InternalCompilerError::at(
                format!("Variable '{}' defined twice in one scope", name),
                location,
            )
            .into())
        }
    }
}
