//! Statement checking for one function body.

use super::access::AccessInfo;
use super::errors::{CompileError, CompileErrorKind};
use super::types::{is_assignable, resolve, PrimitiveType, VariableType};
use super::{has_default_value, TypeTable};
use crate::builtins::BuiltinRegistry;
use crate::error::{InternalCompilerError, Result};
use crate::memory::stack::ScopeStack;
use crate::parser::ast::{
    ElifBranch, Expression, ExpressionKind, Function, GlobalScope, SourceLocation,
    Statement, VariableAccess,
};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mutability {
    Mutable,
    Const,
    /// The name may not be rebound; the callee's private copy may still be
    /// mutated through members, indexes and methods.
    ValueParameter,
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub ty: VariableType,
    pub mutability: Mutability,
}

pub(crate) struct Typeifier<'a> {
    pub(crate) globals: &'a GlobalScope,
    pub(crate) types: &'a mut TypeTable,
    pub(crate) function: &'a Function,
    pub(crate) scopes: ScopeStack<Binding>,
    pub(crate) builtins: &'static BuiltinRegistry,
    inside_loop: bool,
}

impl<'a> Typeifier<'a> {
    pub(crate) fn new(
        globals: &'a GlobalScope,
        types: &'a mut TypeTable,
        function: &'a Function,
    ) -> Self {
        Self {
            globals,
            types,
            function,
            scopes: ScopeStack::new(),
            builtins: BuiltinRegistry::global(),
            inside_loop: false,
        }
    }

    pub(crate) fn check(mut self) -> Result<()> {
        let function = self.function;
        for param in &function.params {
            let mutability = if param.reference {
                Mutability::Mutable
            } else {
                Mutability::ValueParameter
            };
            self.declare(&param.name, param.param_type.clone(), mutability, param.location)?;
        }

        self.check_block(&function.body)
    }

    fn check_block(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.check_statement(statement)?;
        }
        Ok(())
    }

    fn check_scoped_block(&mut self, statements: &[Statement]) -> Result<()> {
        self.scopes.push_scope();
        let result = self.check_block(statements);
        self.scopes.pop_scope();
        result
    }

    fn check_statement(&mut self, statement: &Statement) -> Result<()> {
        trace!("checking statement at {}", statement.location());

        match statement {
            Statement::VariableDeclaration {
                id,
                name,
                var_type,
                location,
            } => {
                let ty = resolve(var_type, self.globals, *location)?;
                if !has_default_value(&ty, self.globals) {
                    return Err(CompileError::new(
                        CompileErrorKind::NoDefaultValue,
                        format!("Variable '{}' of type {} must be initialized", name, ty),
                        *location,
                    )
                    .into());
                }
                self.types.insert(*id, ty.clone());
                self.declare(name, ty, Mutability::Mutable, *location)
            }

            Statement::VariableDefinition {
                id,
                name,
                var_type,
                value,
                is_const,
                location,
            } => {
                let ty = resolve(var_type, self.globals, *location)?;
                let value_type = self.expression(value)?;
                if !is_assignable(&ty, &value_type) {
                    return Err(CompileError::mismatch(
                        format!(
                            "Cannot assign value of type {} to variable '{}' of type {}",
                            value_type, name, ty
                        ),
                        value.location,
                    )
                    .into());
                }
                self.types.insert(*id, ty.clone());
                let mutability = if *is_const {
                    Mutability::Const
                } else {
                    Mutability::Mutable
                };
                self.declare(name, ty, mutability, *location)
            }

            Statement::VariableAssign {
                target,
                value,
                location,
            } => self.check_assignment(target, value, *location),

            Statement::Loop { body, .. } => {
                let saved = self.inside_loop;
                self.inside_loop = true;
                let result = self.check_scoped_block(body);
                self.inside_loop = saved;
                result
            }

            Statement::If {
                condition,
                body,
                elifs,
                else_body,
                ..
            } => {
                self.check_condition(condition)?;
                self.check_scoped_block(body)?;
                for ElifBranch { condition, body } in elifs {
                    self.check_condition(condition)?;
                    self.check_scoped_block(body)?;
                }
                if let Some(else_body) = else_body {
                    self.check_scoped_block(else_body)?;
                }
                Ok(())
            }

            Statement::Return { value, location } => self.check_return(value.as_ref(), *location),

            Statement::Break { location } => self.check_loop_control("break", *location),
            Statement::Continue { location } => self.check_loop_control("continue", *location),

            Statement::FunctionCall { call, .. } => match &call.kind {
                ExpressionKind::FunctionCall(function_call) => {
                    if let Some(ty) = self.function_call(function_call)? {
                        self.types.insert(call.id, ty);
                    }
                    Ok(())
                }
                _ => Err(InternalCompilerError::at("Call statement without a call", call.location).into()),
            },

            Statement::MethodCall { access, location } => {
                let variable_access = self.expect_access(access)?;
                if variable_access.method.is_none() {
                    return Err(CompileError::new(
                        CompileErrorKind::InvalidStatement,
                        "Variable access as statement must end with a method call",
                        *location,
                    )
                    .into());
                }
                if let Some(ty) = self.access(variable_access)?.ty {
                    self.types.insert(access.id, ty);
                }
                Ok(())
            }
        }
    }

    fn check_assignment(
        &mut self,
        target: &Expression,
        value: &Expression,
        location: SourceLocation,
    ) -> Result<()> {
        let access = self.expect_access(target)?;
        let value_type = self.expression(value)?;

        match self.scopes.get(&access.name).map(|b| b.mutability) {
            Some(Mutability::Const) => {
                return Err(CompileError::new(
                    CompileErrorKind::ConstAssignment,
                    format!("Cannot assign to constant '{}'", access.name),
                    location,
                )
                .into())
            }
            Some(Mutability::ValueParameter) if access.accessors.is_empty() => {
                return Err(CompileError::new(
                    CompileErrorKind::ConstAssignment,
                    format!("Cannot reassign value parameter '{}'", access.name),
                    location,
                )
                .into())
            }
            Some(_) => {}
            None if self.globals.enums.contains_key(&access.name) => {
                return Err(CompileError::new(
                    CompileErrorKind::ConstAssignment,
                    format!("Cannot assign to enum '{}'", access.name),
                    location,
                )
                .into())
            }
            None => {}
        }

        let AccessInfo {
            ty,
            through_string_index,
        } = self.access(access)?;
        if through_string_index {
            return Err(CompileError::mismatch(
                "Cannot assign to a character of a string",
                location,
            )
            .into());
        }
        let target_type = ty.ok_or_else(|| {
            InternalCompilerError::at("Assignment target ends in a method call", location)
        })?;
        self.types.insert(target.id, target_type.clone());

        if !is_assignable(&target_type, &value_type) {
            return Err(CompileError::mismatch(
                format!(
                    "Cannot assign value of type {} to '{}' of type {}",
                    value_type, access.name, target_type
                ),
                value.location,
            )
            .into());
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Expression) -> Result<()> {
        let ty = self.expression(condition)?;
        if !ty.is_primitive(PrimitiveType::Bool) {
            return Err(CompileError::mismatch(
                format!("Condition must be bool, got {}", ty),
                condition.location,
            )
            .into());
        }
        Ok(())
    }

    fn check_return(&mut self, value: Option<&Expression>, location: SourceLocation) -> Result<()> {
        let function = self.function;
        match (value, &function.return_type) {
            (Some(value), Some(return_type)) => {
                let ty = self.expression(value)?;
                if !is_assignable(return_type, &ty) {
                    return Err(CompileError::new(
                        CompileErrorKind::InvalidReturn,
                        format!(
                            "Cannot return value of type {} from function '{}' returning {}",
                            ty, function.name, return_type
                        ),
                        value.location,
                    )
                    .into());
                }
                Ok(())
            }
            (Some(_), None) => Err(CompileError::new(
                CompileErrorKind::InvalidReturn,
                format!("Function '{}' does not declare a return type", function.name),
                location,
            )
            .into()),
            (None, Some(return_type)) => Err(CompileError::new(
                CompileErrorKind::InvalidReturn,
                format!(
                    "Function '{}' must return a value of type {}",
                    function.name, return_type
                ),
                location,
            )
            .into()),
            (None, None) => Ok(()),
        }
    }

    fn check_loop_control(&self, keyword: &str, location: SourceLocation) -> Result<()> {
        if self.inside_loop {
            Ok(())
        } else {
            Err(CompileError::new(
                CompileErrorKind::LoopControlOutsideLoop,
                format!("'{}' outside of a loop", keyword),
                location,
            )
            .into())
        }
    }

    pub(crate) fn declare(
        &mut self,
        name: &str,
        ty: VariableType,
        mutability: Mutability,
        location: SourceLocation,
    ) -> Result<()> {
        if self.scopes.define(name, Binding { ty, mutability }) {
            Ok(())
        } else {
            Err(CompileError::new(
                CompileErrorKind::Redeclaration,
                format!("Variable '{}' is already defined in this scope", name),
                location,
            )
            .into())
        }
    }

    pub(crate) fn expect_access<'e>(&self, expr: &'e Expression) -> Result<&'e VariableAccess> {
        match &expr.kind {
            ExpressionKind::VariableAccess(access) => Ok(access),
            _ => Err(InternalCompilerError::at("Expected a variable access", expr.location).into()),
        }
    }
}
