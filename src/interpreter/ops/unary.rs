use crate::error::{InternalCompilerError, Result};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Expression, UnaryOperator};

impl<'p> Interpreter<'p> {
    pub(crate) fn evaluate_unary(
        &mut self,
        expr: &'p Expression,
        op: UnaryOperator,
        operand: &'p Expression,
    ) -> Result<Value> {
        let value = self.evaluate(operand)?;

        match (op, value) {
            (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

            (UnaryOperator::Negate, Value::Int { value, .. }) => {
                let ty = self.integer_type_of(expr)?;
                match value.checked_neg() {
                    Some(negated) if ty.fits(negated) => Ok(Value::int(negated, ty)),
                    _ => Err(RuntimeError::IntegerOverflow {
                        operation: format!("-{}", value),
                        ty: ty.name().to_string(),
                        location: expr.location,
                    }
                    .into()),
                }
            }

            (UnaryOperator::Negate, Value::Float(f)) => Ok(Value::Float(-f)),

            (op, value) => Err(InternalCompilerError::at(
                format!("Cannot apply {:?} to {}", op, value.kind_name()),
                expr.location,
            )
            .into()),
        }
    }
}
