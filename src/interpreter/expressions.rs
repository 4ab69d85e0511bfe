//! Expression evaluation, calls, and value construction.

use crate::builtins::CallContext;
use crate::error::{InternalCompilerError, Result};
use crate::interpreter::constants::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::engine::Interpreter;
use crate::memory::value::Value;
use crate::memory::{new_slot, Slot};
use crate::parser::ast::{
    Accessor, Expression, ExpressionKind, FieldInitializer, FunctionCall, Literal, SourceLocation,
    StructMember,
};
use crate::semantic::types::{PrimitiveType, VariableType};
use log::trace;
use rustc_hash::FxHashMap;

impl<'p> Interpreter<'p> {
    pub(crate) fn evaluate(&mut self, expr: &'p Expression) -> Result<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &'p Expression) -> Result<Value> {
        match &expr.kind {
            ExpressionKind::Constant(literal) => self.evaluate_constant(expr, literal),

            ExpressionKind::VariableAccess(access) => {
                self.evaluate_access(access)?.ok_or_else(|| {
                    InternalCompilerError::at("Method call produced no value", expr.location).into()
                })
            }

            ExpressionKind::FunctionCall(call) => self.evaluate_call(call)?.ok_or_else(|| {
                InternalCompilerError::at(
                    format!("Function '{}' produced no value", call.name),
                    expr.location,
                )
                .into()
            }),

            ExpressionKind::Math { op, left, right } => self.evaluate_math(expr, *op, left, right),

            ExpressionKind::Compare { op, left, right } => {
                self.evaluate_compare(*op, left, right, expr.location)
            }

            ExpressionKind::Unary { op, operand } => self.evaluate_unary(expr, *op, operand),

            ExpressionKind::StructInitializer {
                struct_name,
                fields,
            } => self.build_struct(struct_name, fields, expr.location),
        }
    }

    fn evaluate_constant(&self, expr: &'p Expression, literal: &Literal) -> Result<Value> {
        let value = match literal {
            Literal::Integer(value) => {
                let ty = self.type_of(expr.id, expr.location)?;
                let primitive = ty.as_primitive().filter(|p| p.is_integer()).ok_or_else(|| {
                    InternalCompilerError::at(
                        format!("Integer literal typed as {}", ty),
                        expr.location,
                    )
                })?;
                Value::int(*value, primitive)
            }
            Literal::Float(value) => Value::Float(*value as f32),
            Literal::String(value) => Value::Str(value.clone()),
            Literal::Char(value) => Value::Char(*value),
            Literal::Bool(value) => Value::Bool(*value),
        };
        Ok(value)
    }

    /// Call a user function (looked up first) or a builtin
    pub(crate) fn evaluate_call(&mut self, call: &'p FunctionCall) -> Result<Option<Value>> {
        let program = self.program;

        if let Some(function) = program.globals.functions.get(&call.name) {
            let mut slots = Vec::with_capacity(call.args.len());
            for (param, arg) in function.params.iter().zip(&call.args) {
                slots.push(self.bind_argument(param.reference, &param.param_type, arg)?);
            }
            return self.call_function(function, slots, call.location);
        }

        let builtins = self.builtins;
        let builtin = builtins.function(&call.name).ok_or_else(|| {
            InternalCompilerError::at(format!("Unknown function '{}'", call.name), call.location)
        })?;
        trace!("calling builtin '{}'", builtin.name);

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.evaluate(arg)?);
        }
        let mut ctx = CallContext {
            location: call.location,
            terminal: &mut self.terminal,
        };
        (builtin.native)(args, &mut ctx)
    }

    /// Reference parameters share the caller's slot; value parameters get a
    /// fresh slot holding a deep copy.
    fn bind_argument(
        &mut self,
        reference: bool,
        param_type: &VariableType,
        arg: &'p Expression,
    ) -> Result<Slot> {
        if reference {
            let name = match &arg.kind {
                ExpressionKind::VariableAccess(access) if access.is_bare() => &access.name,
                _ => {
                    return Err(InternalCompilerError::at(
                        "Reference argument is not a variable",
                        arg.location,
                    )
                    .into())
                }
            };
            return self.lookup_slot(name, arg.location);
        }

        let value = self.evaluate(arg)?;
        Ok(new_slot(value.coerce_to(param_type)))
    }

    fn build_struct(
        &mut self,
        struct_name: &str,
        fields: &'p [FieldInitializer],
        location: SourceLocation,
    ) -> Result<Value> {
        let program = self.program;
        let struct_type = program.globals.structs.get(struct_name).ok_or_else(|| {
            InternalCompilerError::at(format!("Unknown struct '{}'", struct_name), location)
        })?;

        let mut values = FxHashMap::default();
        for field in fields {
            let member = struct_type.member(&field.name).ok_or_else(|| {
                InternalCompilerError::at(
                    format!("Struct '{}' has no member '{}'", struct_name, field.name),
                    field.location,
                )
            })?;
            let value = self.evaluate(&field.value)?.coerce_to(&member.member_type);
            values.insert(field.name.clone(), value);
        }

        for member in &struct_type.members {
            if !values.contains_key(&member.name) {
                let value = self.member_default(member, location)?;
                values.insert(member.name.clone(), value);
            }
        }

        Ok(Value::Struct {
            name: struct_name.to_string(),
            fields: values,
        })
    }

    /// Value a declared-but-uninitialized variable starts with
    pub(crate) fn default_value(&mut self, ty: &VariableType, location: SourceLocation) -> Result<Value> {
        let value = match ty {
            VariableType::Primitive(primitive) => match primitive {
                PrimitiveType::F32 => Value::Float(0.0),
                PrimitiveType::String => Value::Str(String::new()),
                PrimitiveType::Bool => Value::Bool(false),
                PrimitiveType::Char => Value::Char('\0'),
                integer => Value::int(0, *integer),
            },
            VariableType::Array(element) => Value::Array {
                element: element.as_ref().clone(),
                items: Vec::new(),
            },
            VariableType::Struct(name) => {
                let program = self.program;
                let struct_type = program.globals.structs.get(name).ok_or_else(|| {
                    InternalCompilerError::at(format!("Unknown struct '{}'", name), location)
                })?;
                let mut fields = FxHashMap::default();
                for member in &struct_type.members {
                    let value = self.member_default(member, location)?;
                    fields.insert(member.name.clone(), value);
                }
                Value::Struct {
                    name: name.clone(),
                    fields,
                }
            }
            other => {
                return Err(InternalCompilerError::at(
                    format!("Type {} has no default value", other),
                    location,
                )
                .into())
            }
        };
        Ok(value)
    }

    fn member_default(
        &mut self,
        member: &'p StructMember,
        location: SourceLocation,
    ) -> Result<Value> {
        let Some(default) = &member.default else {
            return self.default_value(&member.member_type, location);
        };

        let value = match &default.kind {
            ExpressionKind::Constant(literal) => self.evaluate_constant(default, literal)?,
            ExpressionKind::VariableAccess(access) => match access.accessors.as_slice() {
                [Accessor::Member { name, .. }] => Value::Enum {
                    name: access.name.clone(),
                    member: name.clone(),
                },
                _ => {
                    return Err(InternalCompilerError::at(
                        "Malformed enum default value",
                        default.location,
                    )
                    .into())
                }
            },
            _ => {
                return Err(InternalCompilerError::at(
                    "Struct member default is not a constant",
                    default.location,
                )
                .into())
            }
        };
        Ok(value.coerce_to(&member.member_type))
    }
}
