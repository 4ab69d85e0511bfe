//! Runtime value representation
//!
//! Values are tagged: integers remember which primitive type they were
//! produced as, arrays remember their element type, structs and enums their
//! declared name. Cloning a [`Value`] is always a deep copy.

use crate::semantic::types::{PrimitiveType, VariableType};
use rustc_hash::FxHashMap;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int { value: i128, ty: PrimitiveType },
    Float(f32),
    Str(String),
    Bool(bool),
    Char(char),
    Struct {
        name: String,
        fields: FxHashMap<String, Value>, // Field name -> field value
    },
    Enum { name: String, member: String },
    Array {
        element: VariableType,
        items: Vec<Value>,
    },
}

impl Value {
    pub fn int(value: i128, ty: PrimitiveType) -> Self {
        Value::Int { value, ty }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short description used in internal error messages
    pub fn kind_name(&self) -> String {
        match self {
            Value::Int { ty, .. } => ty.name().to_string(),
            Value::Float(_) => "f32".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Struct { name, .. } => format!("struct {}", name),
            Value::Enum { name, .. } => format!("enum {}", name),
            Value::Array { element, .. } => format!("[{}]", element),
        }
    }

    /// Structural equality that ignores integer tags: `5u8 == 5i32`.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int { value: a, .. }, Value::Int { value: b, .. }) => a == b,
            (Value::Struct { name: a, fields: fa }, Value::Struct { name: b, fields: fb }) => {
                a == b
                    && fa.len() == fb.len()
                    && fa
                        .iter()
                        .all(|(key, value)| fb.get(key).is_some_and(|other| value.equals(other)))
            }
            (Value::Array { items: a, .. }, Value::Array { items: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            _ => self == other,
        }
    }

    /// Re-tag this value as `target`.
    ///
    /// Only integer tags and array element types change; widening has already
    /// been checked, so the numeric value always fits.
    pub fn coerce_to(self, target: &VariableType) -> Value {
        match (self, target) {
            (Value::Int { value, .. }, VariableType::Primitive(ty)) if ty.is_integer() => {
                Value::Int { value, ty: *ty }
            }
            (Value::Array { items, .. }, VariableType::Array(element)) => Value::Array {
                items: items
                    .into_iter()
                    .map(|item| item.coerce_to(element))
                    .collect(),
                element: element.as_ref().clone(),
            },
            (value, _) => value,
        }
    }
}

/// Render a float the way the language prints it: always with a fractional part.
fn format_float(f: &mut fmt::Formatter<'_>, value: f32) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int { value, .. } => write!(f, "{}", value),
            Value::Float(value) => format_float(f, *value),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Enum { name, member } => write!(f, "{}.{}", name, member),
            Value::Array { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Struct { name, fields } => {
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();
                write!(f, "{} {{", name)?;
                for (i, field) in names.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field, fields[field])?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_ignores_integer_tags() {
        let a = Value::int(5, PrimitiveType::U8);
        let b = Value::int(5, PrimitiveType::I64);
        assert!(a.equals(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_coerce_array_retags_items() {
        let array = Value::Array {
            element: PrimitiveType::U8.into(),
            items: vec![Value::int(1, PrimitiveType::U8)],
        };
        let target = VariableType::Array(Box::new(PrimitiveType::I32.into()));
        match array.coerce_to(&target) {
            Value::Array { element, items } => {
                assert_eq!(element, PrimitiveType::I32.into());
                assert_eq!(items, vec![Value::int(1, PrimitiveType::I32)]);
            }
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");

        let mut fields = FxHashMap::default();
        fields.insert("y".to_string(), Value::int(2, PrimitiveType::I32));
        fields.insert("x".to_string(), Value::int(1, PrimitiveType::I32));
        let point = Value::Struct {
            name: "Point".to_string(),
            fields,
        };
        assert_eq!(point.to_string(), "Point { x: 1, y: 2 }");

        let colors = Value::Array {
            element: VariableType::Enum("Color".to_string()),
            items: vec![Value::Enum {
                name: "Color".to_string(),
                member: "Red".to_string(),
            }],
        };
        assert_eq!(colors.to_string(), "[Color.Red]");
    }
}
