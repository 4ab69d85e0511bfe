//! The type model and the three utilities both passes lean on: resolving
//! placeholder names, typing integer literals, and the widening table.

use crate::error::{InternalCompilerError, Result};
use crate::parser::ast::{GlobalScope, SourceLocation};
use crate::semantic::errors::{CompileError, CompileErrorKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    String,
    Bool,
    Char,
}

impl PrimitiveType {
    /// Look up a primitive by its source spelling. `int` is an alias for `i64`.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "i8" => PrimitiveType::I8,
            "i16" => PrimitiveType::I16,
            "i32" => PrimitiveType::I32,
            "i64" | "int" => PrimitiveType::I64,
            "u8" => PrimitiveType::U8,
            "u16" => PrimitiveType::U16,
            "u32" => PrimitiveType::U32,
            "u64" => PrimitiveType::U64,
            "f32" => PrimitiveType::F32,
            "string" => PrimitiveType::String,
            "bool" => PrimitiveType::Bool,
            "char" => PrimitiveType::Char,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::String => "string",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
        }
    }

    pub fn is_integer(self) -> bool {
        self.integer_range().is_some()
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 | PrimitiveType::I64
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self == PrimitiveType::F32
    }

    /// Inclusive bounds of an integer type, `None` for everything else.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        let range = match self {
            PrimitiveType::I8 => (i8::MIN as i128, i8::MAX as i128),
            PrimitiveType::I16 => (i16::MIN as i128, i16::MAX as i128),
            PrimitiveType::I32 => (i32::MIN as i128, i32::MAX as i128),
            PrimitiveType::I64 => (i64::MIN as i128, i64::MAX as i128),
            PrimitiveType::U8 => (0, u8::MAX as i128),
            PrimitiveType::U16 => (0, u16::MAX as i128),
            PrimitiveType::U32 => (0, u32::MAX as i128),
            PrimitiveType::U64 => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(range)
    }

    pub fn fits(self, value: i128) -> bool {
        self.integer_range()
            .is_some_and(|(min, max)| value >= min && value <= max)
    }

    /// Source types accepted when assigning into `self`.
    fn widens_from(self) -> &'static [PrimitiveType] {
        use PrimitiveType::*;
        match self {
            U8 => &[U8],
            I8 => &[I8],
            U16 => &[U8, U16],
            I16 => &[U8, I8, I16],
            U32 => &[U8, U16, U32],
            I32 => &[U8, U16, I8, I16, I32],
            U64 => &[U8, U16, U32, U64],
            I64 => &[U8, U16, U32, I8, I16, I32, I64],
            F32 => &[F32],
            String => &[String],
            Bool => &[Bool],
            Char => &[Char],
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A type as written in source (`Unknown`) or after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// A name the parser could not classify yet.
    Unknown(String),
    Primitive(PrimitiveType),
    Array(Box<VariableType>),
    Struct(String),
    Enum(String),
    /// Accepts any argument. Only builtin parameters use it.
    BuiltinGeneric,
}

impl VariableType {
    pub fn is_resolved(&self) -> bool {
        match self {
            VariableType::Unknown(_) => false,
            VariableType::Array(element) => element.is_resolved(),
            _ => true,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            VariableType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_primitive(&self, primitive: PrimitiveType) -> bool {
        self.as_primitive() == Some(primitive)
    }
}

impl From<PrimitiveType> for VariableType {
    fn from(primitive: PrimitiveType) -> Self {
        VariableType::Primitive(primitive)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Unknown(name) => write!(f, "{}", name),
            VariableType::Primitive(p) => write!(f, "{}", p),
            VariableType::Array(element) => write!(f, "[{}]", element),
            VariableType::Struct(name) => write!(f, "struct {}", name),
            VariableType::Enum(name) => write!(f, "enum {}", name),
            VariableType::BuiltinGeneric => write!(f, "any"),
        }
    }
}

/// Turn a parser placeholder into a concrete type.
///
/// Names are looked up as primitive, then struct, then enum. Arrays resolve
/// their element. Already concrete types come back unchanged.
pub fn resolve(
    ty: &VariableType,
    globals: &GlobalScope,
    location: SourceLocation,
) -> Result<VariableType> {
    match ty {
        VariableType::Unknown(name) => {
            if let Some(primitive) = PrimitiveType::from_name(name) {
                Ok(VariableType::Primitive(primitive))
            } else if globals.structs.contains_key(name) {
                Ok(VariableType::Struct(name.clone()))
            } else if globals.enums.contains_key(name) {
                Ok(VariableType::Enum(name.clone()))
            } else {
                Err(CompileError::new(
                    CompileErrorKind::UnknownType,
                    format!("Unknown type '{}'", name),
                    location,
                )
                .into())
            }
        }
        VariableType::Array(element) => match element.as_ref() {
            VariableType::Unknown(_) => Ok(VariableType::Array(Box::new(resolve(
                element, globals, location,
            )?))),
            other => Err(InternalCompilerError::at(
                format!("Array element type '{}' was resolved before validation", other),
                location,
            )
            .into()),
        },
        concrete => Ok(concrete.clone()),
    }
}

/// The narrowest integer type holding `value`: unsigned when non-negative,
/// signed otherwise.
pub fn infer_integer_literal_type(
    value: i128,
    location: SourceLocation,
) -> std::result::Result<PrimitiveType, CompileError> {
    let candidates: &[PrimitiveType] = if value >= 0 {
        &[
            PrimitiveType::U8,
            PrimitiveType::U16,
            PrimitiveType::U32,
            PrimitiveType::U64,
        ]
    } else {
        &[
            PrimitiveType::I8,
            PrimitiveType::I16,
            PrimitiveType::I32,
            PrimitiveType::I64,
        ]
    };

    candidates
        .iter()
        .copied()
        .find(|ty| ty.fits(value))
        .ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::LiteralOutOfRange,
                format!("Integer literal {} does not fit any integer type", value),
                location,
            )
        })
}

/// Whether a value of type `source` may be stored into `target`.
///
/// Not symmetric: `i32` accepts `u8` but `u8` does not accept `i32`.
pub fn is_assignable(target: &VariableType, source: &VariableType) -> bool {
    match (target, source) {
        (VariableType::BuiltinGeneric, _) => true,
        (VariableType::Primitive(t), VariableType::Primitive(s)) => t.widens_from().contains(s),
        (VariableType::Array(t), VariableType::Array(s)) => is_assignable(t, s),
        (VariableType::Struct(t), VariableType::Struct(s)) => t == s,
        (VariableType::Enum(t), VariableType::Enum(s)) => t == s,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimitiveType::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    fn infer(value: i128) -> PrimitiveType {
        infer_integer_literal_type(value, loc()).unwrap()
    }

    #[test]
    fn test_literal_inference_boundaries() {
        assert_eq!(infer(0), U8);
        assert_eq!(infer(255), U8);
        assert_eq!(infer(256), U16);
        assert_eq!(infer(65535), U16);
        assert_eq!(infer(65536), U32);
        assert_eq!(infer(4294967295), U32);
        assert_eq!(infer(4294967296), U64);
        assert_eq!(infer(u64::MAX as i128), U64);
        assert_eq!(infer(-1), I8);
        assert_eq!(infer(-128), I8);
        assert_eq!(infer(-129), I16);
        assert_eq!(infer(-32769), I32);
        assert_eq!(infer(i64::MIN as i128), I64);
    }

    #[test]
    fn test_literal_out_of_range() {
        let err = infer_integer_literal_type(u64::MAX as i128 + 1, loc()).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::LiteralOutOfRange);
        assert!(infer_integer_literal_type(i64::MIN as i128 - 1, loc()).is_err());
    }

    #[test]
    fn test_widening_is_directional() {
        assert!(is_assignable(&I32.into(), &U8.into()));
        assert!(!is_assignable(&U8.into(), &I32.into()));
        assert!(is_assignable(&I64.into(), &U32.into()));
        assert!(!is_assignable(&I64.into(), &U64.into()));
        assert!(!is_assignable(&U32.into(), &I8.into()));
        assert!(is_assignable(&I16.into(), &I8.into()));
        assert!(!is_assignable(&F32.into(), &I32.into()));
        assert!(!is_assignable(&String.into(), &Char.into()));
    }

    #[test]
    fn test_composite_assignability() {
        let array_i32 = VariableType::Array(Box::new(I32.into()));
        let array_u8 = VariableType::Array(Box::new(U8.into()));
        assert!(is_assignable(&array_i32, &array_u8));
        assert!(!is_assignable(&array_u8, &array_i32));

        let point = VariableType::Struct("Point".to_string());
        let other = VariableType::Struct("Other".to_string());
        assert!(is_assignable(&point, &point));
        assert!(!is_assignable(&point, &other));
        assert!(!is_assignable(&point, &VariableType::Enum("Point".to_string())));
        assert!(is_assignable(&VariableType::BuiltinGeneric, &point));
    }

    #[test]
    fn test_resolve_priority() {
        let mut globals = GlobalScope::new();
        globals
            .add_enum(crate::parser::ast::EnumType {
                name: "Color".to_string(),
                entries: vec!["Red".to_string()],
                location: loc(),
            })
            .unwrap();

        let resolved = resolve(&VariableType::Unknown("int".to_string()), &globals, loc()).unwrap();
        assert_eq!(resolved, I64.into());

        let resolved = resolve(
            &VariableType::Array(Box::new(VariableType::Unknown("Color".to_string()))),
            &globals,
            loc(),
        )
        .unwrap();
        assert_eq!(
            resolved,
            VariableType::Array(Box::new(VariableType::Enum("Color".to_string())))
        );

        let err = resolve(&VariableType::Unknown("Nope".to_string()), &globals, loc()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Compile(CompileError { kind: CompileErrorKind::UnknownType, .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_concrete_array_element() {
        let globals = GlobalScope::new();
        let err = resolve(
            &VariableType::Array(Box::new(I32.into())),
            &globals,
            loc(),
        )
        .unwrap_err();
        assert!(err.is_internal());
    }
}
