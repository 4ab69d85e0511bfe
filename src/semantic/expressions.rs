//! Expression typing and constant folding.

use super::errors::{CompileError, CompileErrorKind};
use super::folding::{fold_math, Folded};
use super::typeifier::Typeifier;
use super::types::{infer_integer_literal_type, is_assignable, PrimitiveType, VariableType};
use super::has_default_value;
use crate::error::Result;
use crate::parser::ast::{
    CompareOperator, Expression, ExpressionKind, FieldInitializer, GlobalScope, Literal,
    MathOperator, SourceLocation, UnaryOperator,
};

/// Type of a literal. Integers get the narrowest type that holds them.
pub fn constant_type(
    literal: &Literal,
    location: SourceLocation,
) -> std::result::Result<VariableType, CompileError> {
    let primitive = match literal {
        Literal::Integer(value) => infer_integer_literal_type(*value, location)?,
        Literal::Float(_) => PrimitiveType::F32,
        Literal::String(_) => PrimitiveType::String,
        Literal::Char(_) => PrimitiveType::Char,
        Literal::Bool(_) => PrimitiveType::Bool,
    };
    Ok(primitive.into())
}

/// Type of `Enum.Member`, checking that the member exists.
pub fn enum_member_type(
    globals: &GlobalScope,
    enum_name: &str,
    member: &str,
    location: SourceLocation,
) -> std::result::Result<VariableType, CompileError> {
    let has_entry = globals
        .enums
        .get(enum_name)
        .is_some_and(|e| e.has_entry(member));
    if !has_entry {
        return Err(CompileError::new(
            CompileErrorKind::UnknownEnumMember,
            format!("Enum '{}' has no member '{}'", enum_name, member),
            location,
        ));
    }
    Ok(VariableType::Enum(enum_name.to_string()))
}

/// Value of a numeric literal operand. Only literals written directly in
/// the source fold; nested arithmetic is typed like any other operand.
fn literal_operand(expr: &Expression) -> Option<Folded> {
    match &expr.kind {
        ExpressionKind::Constant(Literal::Integer(value)) => Some(Folded::Int(*value)),
        ExpressionKind::Constant(Literal::Float(value)) => Some(Folded::Float(*value as f32)),
        _ => None,
    }
}

impl Typeifier<'_> {
    /// Type an expression and record it in the side table.
    pub(crate) fn expression(&mut self, expr: &Expression) -> Result<VariableType> {
        let ty = match &expr.kind {
            ExpressionKind::Constant(literal) => constant_type(literal, expr.location)?,

            ExpressionKind::VariableAccess(access) => {
                let info = self.access(access)?;
                info.ty.ok_or_else(|| {
                    let method = access.method.as_ref().map_or("", |m| m.name.as_str());
                    CompileError::mismatch(
                        format!("Method '{}' does not return a value", method),
                        expr.location,
                    )
                })?
            }

            ExpressionKind::FunctionCall(call) => self.function_call(call)?.ok_or_else(|| {
                CompileError::mismatch(
                    format!("Function '{}' does not return a value", call.name),
                    expr.location,
                )
            })?,

            ExpressionKind::Math { op, left, right } => {
                self.math(expr, *op, left, right)?
            }

            ExpressionKind::Compare { op, left, right } => {
                self.compare(*op, left, right, expr.location)?
            }

            ExpressionKind::Unary { op, operand } => self.unary(expr, *op, operand)?,

            ExpressionKind::StructInitializer {
                struct_name,
                fields,
            } => self.struct_initializer(struct_name, fields, expr.location)?,
        };

        self.types.insert(expr.id, ty.clone());
        Ok(ty)
    }

    fn math(
        &mut self,
        expr: &Expression,
        op: MathOperator,
        left: &Expression,
        right: &Expression,
    ) -> Result<VariableType> {
        let left_type = self.expression(left)?;
        let right_type = self.expression(right)?;

        if let (Some(a), Some(b)) = (literal_operand(left), literal_operand(right)) {
            if let Some(folded) = fold_math(op, a, b, expr.location)? {
                return Ok(match folded {
                    Folded::Int(value) => infer_integer_literal_type(value, expr.location)?.into(),
                    Folded::Float(_) => PrimitiveType::F32.into(),
                });
            }
        }

        let ty = if is_assignable(&left_type, &right_type) {
            left_type
        } else if is_assignable(&right_type, &left_type) {
            right_type
        } else {
            return Err(CompileError::mismatch(
                format!(
                    "Cannot apply '{}' to {} and {}",
                    op.symbol(),
                    left_type,
                    right_type
                ),
                expr.location,
            )
            .into());
        };

        let supported = match ty.as_primitive() {
            Some(PrimitiveType::String) => op == MathOperator::Add,
            Some(primitive) => primitive.is_numeric(),
            None => false,
        };
        if !supported {
            return Err(CompileError::mismatch(
                format!("Operator '{}' is not supported for {}", op.symbol(), ty),
                expr.location,
            )
            .into());
        }
        Ok(ty)
    }

    fn compare(
        &mut self,
        op: CompareOperator,
        left: &Expression,
        right: &Expression,
        location: SourceLocation,
    ) -> Result<VariableType> {
        let left_type = self.expression(left)?;
        let right_type = self.expression(right)?;

        let common = if is_assignable(&left_type, &right_type) {
            &left_type
        } else if is_assignable(&right_type, &left_type) {
            &right_type
        } else {
            return Err(CompileError::mismatch(
                format!(
                    "Cannot compare {} with {} using '{}'",
                    left_type,
                    right_type,
                    op.symbol()
                ),
                location,
            )
            .into());
        };

        if op.is_ordering() {
            let ordered = common.as_primitive().is_some_and(|p| {
                p.is_numeric() || matches!(p, PrimitiveType::Char | PrimitiveType::String)
            });
            if !ordered {
                return Err(CompileError::mismatch(
                    format!("Operator '{}' is not supported for {}", op.symbol(), common),
                    location,
                )
                .into());
            }
        }

        Ok(PrimitiveType::Bool.into())
    }

    fn unary(
        &mut self,
        expr: &Expression,
        op: UnaryOperator,
        operand: &Expression,
    ) -> Result<VariableType> {
        let ty = self.expression(operand)?;

        match op {
            UnaryOperator::Not => {
                if !ty.is_primitive(PrimitiveType::Bool) {
                    return Err(CompileError::mismatch(
                        format!("Operator 'not' requires bool, got {}", ty),
                        expr.location,
                    )
                    .into());
                }
                Ok(ty)
            }
            UnaryOperator::Negate => {
                let negatable = ty
                    .as_primitive()
                    .is_some_and(|p| p.is_signed_integer() || p == PrimitiveType::F32);
                if !negatable {
                    return Err(CompileError::mismatch(
                        format!("Cannot negate a value of type {}", ty),
                        expr.location,
                    )
                    .into());
                }
                Ok(ty)
            }
        }
    }

    fn struct_initializer(
        &mut self,
        struct_name: &str,
        fields: &[FieldInitializer],
        location: SourceLocation,
    ) -> Result<VariableType> {
        let globals = self.globals;
        let struct_type = globals.structs.get(struct_name).ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::UnknownType,
                format!("Unknown struct '{}'", struct_name),
                location,
            )
        })?;

        for (index, field) in fields.iter().enumerate() {
            let member = struct_type.member(&field.name).ok_or_else(|| {
                CompileError::new(
                    CompileErrorKind::UnknownField,
                    format!("Struct '{}' has no member '{}'", struct_name, field.name),
                    field.location,
                )
            })?;

            if fields[..index].iter().any(|f| f.name == field.name) {
                return Err(CompileError::duplicate(
                    format!("Member '{}' is initialized more than once", field.name),
                    field.location,
                )
                .into());
            }

            let value_type = self.expression(&field.value)?;
            if !is_assignable(&member.member_type, &value_type) {
                return Err(CompileError::mismatch(
                    format!(
                        "Cannot initialize member '{}' of type {} with {}",
                        field.name, member.member_type, value_type
                    ),
                    field.value.location,
                )
                .into());
            }
        }

        for member in &struct_type.members {
            let provided = fields.iter().any(|f| f.name == member.name);
            if !provided
                && member.default.is_none()
                && !has_default_value(&member.member_type, globals)
            {
                return Err(CompileError::new(
                    CompileErrorKind::MissingField,
                    format!(
                        "Member '{}' of struct '{}' has no default value and must be initialized",
                        member.name, struct_name
                    ),
                    location,
                )
                .into());
            }
        }

        Ok(VariableType::Struct(struct_name.to_string()))
    }
}
