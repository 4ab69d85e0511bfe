//! Variable access chains, method calls and function calls.

use super::errors::{CompileError, CompileErrorKind};
use super::expressions::enum_member_type;
use super::typeifier::{Mutability, Typeifier};
use super::types::{is_assignable, PrimitiveType, VariableType};
use crate::error::{InternalCompilerError, Result};
use crate::parser::ast::{
    Accessor, Expression, ExpressionKind, FunctionCall, Parameter, VariableAccess,
};

pub(crate) struct AccessInfo {
    /// `None` when the chain ends in a method without a return value
    pub ty: Option<VariableType>,
    /// Some step indexed into a string
    pub through_string_index: bool,
}

impl Typeifier<'_> {
    /// Type a variable access chain: root lookup (variable, else enum), then
    /// each index / member step in order, then the trailing method call.
    pub(crate) fn access(&mut self, access: &VariableAccess) -> Result<AccessInfo> {
        let mut steps = access.accessors.iter();

        let mut ty = match self.scopes.get(&access.name) {
            Some(binding) => binding.ty.clone(),
            None if self.globals.enums.contains_key(&access.name) => match steps.next() {
                Some(Accessor::Member { name, location }) => {
                    enum_member_type(self.globals, &access.name, name, *location)?
                }
                _ => {
                    return Err(CompileError::mismatch(
                        format!("Enum '{}' must be used as '{}.Member'", access.name, access.name),
                        access.location,
                    )
                    .into())
                }
            },
            None => {
                return Err(CompileError::new(
                    CompileErrorKind::UnknownVariable,
                    format!("Unknown variable '{}'", access.name),
                    access.location,
                )
                .into())
            }
        };

        let mut through_string_index = false;
        for step in steps {
            ty = match step {
                Accessor::Index(index) => {
                    let index_type = self.expression(index)?;
                    if !index_type.as_primitive().is_some_and(|p| p.is_integer()) {
                        return Err(CompileError::mismatch(
                            format!("Index must be an integer, got {}", index_type),
                            index.location,
                        )
                        .into());
                    }
                    match ty {
                        VariableType::Array(element) => *element,
                        VariableType::Primitive(PrimitiveType::String) => {
                            through_string_index = true;
                            PrimitiveType::Char.into()
                        }
                        other => {
                            return Err(CompileError::mismatch(
                                format!("Indexing not supported for {}", other),
                                index.location,
                            )
                            .into())
                        }
                    }
                }
                Accessor::Member { name, location } => match &ty {
                    VariableType::Struct(struct_name) => {
                        let struct_type = self.globals.structs.get(struct_name).ok_or_else(|| {
                            InternalCompilerError::at(
                                format!("Struct '{}' missing from global scope", struct_name),
                                *location,
                            )
                        })?;
                        let member = struct_type.member(name).ok_or_else(|| {
                            CompileError::new(
                                CompileErrorKind::UnknownField,
                                format!("Struct '{}' has no member '{}'", struct_name, name),
                                *location,
                            )
                        })?;
                        member.member_type.clone()
                    }
                    other => {
                        return Err(CompileError::mismatch(
                            format!("{} has no member '{}'", other, name),
                            *location,
                        )
                        .into())
                    }
                },
            };
        }

        let ty = match &access.method {
            Some(call) => self.method_call(access, ty, call)?,
            None => Some(ty),
        };

        Ok(AccessInfo {
            ty,
            through_string_index,
        })
    }

    fn method_call(
        &mut self,
        access: &VariableAccess,
        receiver: VariableType,
        call: &FunctionCall,
    ) -> Result<Option<VariableType>> {
        let builtins = self.builtins;
        let method = match &receiver {
            VariableType::Array(_) => builtins.array_method(&call.name),
            VariableType::Primitive(primitive) => builtins.primitive_method(*primitive, &call.name),
            VariableType::Struct(name) => {
                return Err(CompileError::new(
                    CompileErrorKind::UnknownMethod,
                    format!("Struct '{}' does not support method calls", name),
                    call.location,
                )
                .into())
            }
            VariableType::Enum(name) => {
                return Err(CompileError::new(
                    CompileErrorKind::UnknownMethod,
                    format!("Enum '{}' does not support method calls", name),
                    call.location,
                )
                .into())
            }
            other => {
                return Err(InternalCompilerError::at(
                    format!("Method call on unresolved type {}", other),
                    call.location,
                )
                .into())
            }
        };

        let method = method.ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::UnknownMethod,
                format!("{} has no method '{}'", receiver, call.name),
                call.location,
            )
        })?;

        if method.receiver_by_reference {
            match self.scopes.get(&access.name).map(|b| b.mutability) {
                Some(Mutability::Const) => {
                    return Err(CompileError::new(
                        CompileErrorKind::ConstAssignment,
                        format!("Cannot call '{}' on constant '{}'", call.name, access.name),
                        call.location,
                    )
                    .into())
                }
                Some(_) => {}
                None => {
                    return Err(InternalCompilerError::at(
                        "Mutating method on a receiver that is not a variable",
                        call.location,
                    )
                    .into())
                }
            }
        }

        // A generic array method parameter is bound to the element type
        let element = match &receiver {
            VariableType::Array(element) => Some(element.as_ref()),
            _ => None,
        };
        let params: Vec<Parameter> = method
            .params
            .iter()
            .map(|param| match (&param.param_type, element) {
                (VariableType::BuiltinGeneric, Some(element)) => Parameter {
                    param_type: element.clone(),
                    ..param.clone()
                },
                _ => param.clone(),
            })
            .collect();

        self.check_arguments(&call.name, &params, call)?;
        Ok(method.return_type.clone())
    }

    /// Type a call to a user function (looked up first) or a builtin.
    pub(crate) fn function_call(&mut self, call: &FunctionCall) -> Result<Option<VariableType>> {
        let globals = self.globals;
        if let Some(function) = globals.functions.get(&call.name) {
            self.check_arguments(&call.name, &function.params, call)?;
            return Ok(function.return_type.clone());
        }

        let builtins = self.builtins;
        if let Some(builtin) = builtins.function(&call.name) {
            self.check_arguments(&call.name, &builtin.params, call)?;
            return Ok(builtin.return_type.clone());
        }

        Err(CompileError::new(
            CompileErrorKind::UnknownFunction,
            format!("Unknown function '{}'", call.name),
            call.location,
        )
        .into())
    }

    fn check_arguments(
        &mut self,
        name: &str,
        params: &[Parameter],
        call: &FunctionCall,
    ) -> Result<()> {
        if params.len() != call.args.len() {
            return Err(CompileError::new(
                CompileErrorKind::ArgumentCount,
                format!(
                    "'{}' expects {} argument{}, got {}",
                    name,
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    call.args.len()
                ),
                call.location,
            )
            .into());
        }

        for (param, arg) in params.iter().zip(&call.args) {
            if param.reference {
                self.check_reference_argument(name, param, arg)?;
                continue;
            }

            let arg_type = self.expression(arg)?;
            if !is_assignable(&param.param_type, &arg_type) {
                return Err(CompileError::mismatch(
                    format!(
                        "Argument '{}' of '{}' expects {}, got {}",
                        param.name, name, param.param_type, arg_type
                    ),
                    arg.location,
                )
                .into());
            }
        }
        Ok(())
    }

    /// A reference argument must name a mutable variable of exactly the
    /// parameter's type.
    fn check_reference_argument(
        &mut self,
        name: &str,
        param: &Parameter,
        arg: &Expression,
    ) -> Result<()> {
        let variable = match &arg.kind {
            ExpressionKind::VariableAccess(access) if access.is_bare() => access,
            _ => {
                return Err(CompileError::new(
                    CompileErrorKind::InvalidReferenceArgument,
                    format!(
                        "Argument for reference parameter '{}' of '{}' must be a variable",
                        param.name, name
                    ),
                    arg.location,
                )
                .into())
            }
        };

        let binding = self.scopes.get(&variable.name).cloned().ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::UnknownVariable,
                format!("Unknown variable '{}'", variable.name),
                arg.location,
            )
        })?;

        if binding.mutability != Mutability::Mutable {
            return Err(CompileError::new(
                CompileErrorKind::InvalidReferenceArgument,
                format!("Cannot pass '{}' by reference: it is read-only", variable.name),
                arg.location,
            )
            .into());
        }

        if binding.ty != param.param_type {
            return Err(CompileError::mismatch(
                format!(
                    "Reference parameter '{}' of '{}' expects {}, got {}",
                    param.name, name, param.param_type, binding.ty
                ),
                arg.location,
            )
            .into());
        }

        self.types.insert(arg.id, binding.ty);
        Ok(())
    }
}
