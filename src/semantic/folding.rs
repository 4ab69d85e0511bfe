//! Integer and float arithmetic shared by constant folding and evaluation.
//!
//! Division rounds toward negative infinity and the remainder takes the sign
//! of the divisor: `-7 / 2 == -4`, `7 % -2 == -1`.

use crate::parser::ast::{MathOperator, SourceLocation};
use crate::semantic::errors::{CompileError, CompileErrorKind};

/// Floor division. `None` on division by zero or overflow.
pub fn floor_div(a: i128, b: i128) -> Option<i128> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

/// Remainder of [`floor_div`]. `None` on division by zero.
pub fn floor_mod(a: i128, b: i128) -> Option<i128> {
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

pub fn float_floor_mod(a: f32, b: f32) -> f32 {
    let remainder = a % b;
    if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
        remainder + b
    } else {
        remainder
    }
}

/// Checked integer arithmetic. `None` means overflow or a zero divisor.
pub fn int_math(op: MathOperator, a: i128, b: i128) -> Option<i128> {
    match op {
        MathOperator::Add => a.checked_add(b),
        MathOperator::Subtract => a.checked_sub(b),
        MathOperator::Multiply => a.checked_mul(b),
        MathOperator::Divide => floor_div(a, b),
        MathOperator::Modulo => floor_mod(a, b),
    }
}

pub fn float_math(op: MathOperator, a: f32, b: f32) -> f32 {
    match op {
        MathOperator::Add => a + b,
        MathOperator::Subtract => a - b,
        MathOperator::Multiply => a * b,
        MathOperator::Divide => a / b,
        MathOperator::Modulo => float_floor_mod(a, b),
    }
}

fn is_division(op: MathOperator) -> bool {
    matches!(op, MathOperator::Divide | MathOperator::Modulo)
}

/// Compile-time value of a constant numeric expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Folded {
    Int(i128),
    Float(f32),
}

/// Fold `left op right` when both sides are constants of the same kind.
///
/// Mixed int/float operands are left alone for the type check to reject.
pub fn fold_math(
    op: MathOperator,
    left: Folded,
    right: Folded,
    location: SourceLocation,
) -> Result<Option<Folded>, CompileError> {
    match (left, right) {
        (Folded::Int(a), Folded::Int(b)) => {
            if is_division(op) && b == 0 {
                return Err(division_by_zero(location));
            }
            int_math(op, a, b).map(|v| Some(Folded::Int(v))).ok_or_else(|| {
                CompileError::new(
                    CompileErrorKind::LiteralOutOfRange,
                    format!("Constant expression '{} {} {}' overflows", a, op.symbol(), b),
                    location,
                )
            })
        }
        (Folded::Float(a), Folded::Float(b)) => {
            if is_division(op) && b == 0.0 {
                return Err(division_by_zero(location));
            }
            Ok(Some(Folded::Float(float_math(op, a, b))))
        }
        _ => Ok(None),
    }
}

fn division_by_zero(location: SourceLocation) -> CompileError {
    CompileError::new(
        CompileErrorKind::DivisionByZero,
        "Division by zero in constant expression",
        location,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
        assert_eq!(floor_div(6, -3), Some(-2));
        assert_eq!(floor_div(1, 0), None);
    }

    #[test]
    fn test_floor_modulo_sign_follows_divisor() {
        assert_eq!(floor_mod(7, 2), Some(1));
        assert_eq!(floor_mod(-7, 2), Some(1));
        assert_eq!(floor_mod(7, -2), Some(-1));
        assert_eq!(floor_mod(-7, -2), Some(-1));
        assert_eq!(floor_mod(6, 3), Some(0));
        assert_eq!(floor_mod(1, 0), None);
    }

    #[test]
    fn test_float_modulo() {
        assert_eq!(float_floor_mod(7.5, 2.0), 1.5);
        assert_eq!(float_floor_mod(-7.5, 2.0), 0.5);
    }

    #[test]
    fn test_fold_constant_division_by_zero() {
        let loc = SourceLocation::new(1, 1);
        let err = fold_math(MathOperator::Modulo, Folded::Int(3), Folded::Int(0), loc).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::DivisionByZero);

        let folded = fold_math(MathOperator::Divide, Folded::Int(7), Folded::Int(2), loc).unwrap();
        assert_eq!(folded, Some(Folded::Int(3)));

        let mixed = fold_math(MathOperator::Add, Folded::Int(1), Folded::Float(1.0), loc).unwrap();
        assert_eq!(mixed, None);
    }
}
