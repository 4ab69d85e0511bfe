use crate::error::{InternalCompilerError, Result};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{CompareOperator, Expression, MathOperator, SourceLocation};
use crate::semantic::folding::{float_math, int_math};
use crate::semantic::types::PrimitiveType;
use std::cmp::Ordering;

impl<'p> Interpreter<'p> {
    /// Arithmetic on two evaluated operands, tagged with the expression's type
    pub(crate) fn evaluate_math(
        &mut self,
        expr: &'p Expression,
        op: MathOperator,
        left: &'p Expression,
        right: &'p Expression,
    ) -> Result<Value> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;
        let location = expr.location;

        match (left_val, right_val) {
            (Value::Int { value: a, .. }, Value::Int { value: b, .. }) => {
                let ty = self.integer_type_of(expr)?;
                let operation = format!("{} {} {}", a, op.symbol(), b);

                if is_division(op) && b == 0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation,
                        location,
                    }
                    .into());
                }

                match int_math(op, a, b) {
                    Some(result) if ty.fits(result) => Ok(Value::int(result, ty)),
                    _ => Err(RuntimeError::IntegerOverflow {
                        operation,
                        ty: ty.name().to_string(),
                        location,
                    }
                    .into()),
                }
            }

            (Value::Float(a), Value::Float(b)) => {
                if is_division(op) && b == 0.0 {
                    return Err(RuntimeError::DivisionByZero {
                        operation: format!("{} {} {}", a, op.symbol(), b),
                        location,
                    }
                    .into());
                }
                Ok(Value::Float(float_math(op, a, b)))
            }

            (Value::Str(mut a), Value::Str(b)) if op == MathOperator::Add => {
                a.push_str(&b);
                Ok(Value::Str(a))
            }

            (l, r) => Err(InternalCompilerError::at(
                format!(
                    "Cannot apply '{}' to {} and {}",
                    op.symbol(),
                    l.kind_name(),
                    r.kind_name()
                ),
                location,
            )
            .into()),
        }
    }

    pub(crate) fn evaluate_compare(
        &mut self,
        op: CompareOperator,
        left: &'p Expression,
        right: &'p Expression,
        location: SourceLocation,
    ) -> Result<Value> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        let result = match op {
            CompareOperator::Equal => left_val.equals(&right_val),
            CompareOperator::NotEqual => !left_val.equals(&right_val),
            _ => {
                let ordering = compare_values(&left_val, &right_val).ok_or_else(|| {
                    InternalCompilerError::at(
                        format!(
                            "Cannot order {} and {}",
                            left_val.kind_name(),
                            right_val.kind_name()
                        ),
                        location,
                    )
                })?;
                match op {
                    CompareOperator::Less => ordering == Some(Ordering::Less),
                    CompareOperator::LessEqual => {
                        matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                    }
                    CompareOperator::Greater => ordering == Some(Ordering::Greater),
                    CompareOperator::GreaterEqual => {
                        matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
                    }
                    CompareOperator::Equal | CompareOperator::NotEqual => false,
                }
            }
        };

        Ok(Value::Bool(result))
    }

    /// Integer primitive recorded for an arithmetic node
    pub(crate) fn integer_type_of(&self, expr: &'p Expression) -> Result<PrimitiveType> {
        let ty = self.type_of(expr.id, expr.location)?;
        ty.as_primitive()
            .filter(|p| p.is_integer())
            .ok_or_else(|| {
                InternalCompilerError::at(
                    format!("Integer arithmetic typed as {}", ty),
                    expr.location,
                )
                .into()
            })
    }
}

fn is_division(op: MathOperator) -> bool {
    matches!(op, MathOperator::Divide | MathOperator::Modulo)
}

/// Outer `None`: the values are not orderable. Inner `None`: NaN involved.
fn compare_values(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    match (left, right) {
        (Value::Int { value: a, .. }, Value::Int { value: b, .. }) => Some(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Some(a.partial_cmp(b)),
        (Value::Char(a), Value::Char(b)) => Some(Some(a.cmp(b))),
        (Value::Str(a), Value::Str(b)) => Some(Some(a.cmp(b))),
        _ => None,
    }
}
