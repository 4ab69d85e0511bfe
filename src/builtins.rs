//! Builtin registry
//!
//! Free functions (`print`, `assert`, ...), array methods and per-primitive
//! methods, each with a declared signature the validation pass checks calls
//! against and a native implementation the interpreter invokes with already
//! evaluated arguments.
//!
//! The registry is built once and shared; nothing mutates it afterwards.

use crate::error::{InternalCompilerError, Result};
use crate::interpreter::errors::{AssertionFailure, RuntimeError};
use crate::memory::value::Value;
use crate::parser::ast::{Parameter, SourceLocation};
use crate::semantic::types::{PrimitiveType, VariableType};
use crate::terminal::Terminal;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// What a native implementation gets to see besides its arguments
pub struct CallContext<'a> {
    pub location: SourceLocation,
    pub terminal: &'a mut Terminal,
}

pub type NativeFunction = fn(Vec<Value>, &mut CallContext<'_>) -> Result<Option<Value>>;
pub type NativeMethod = fn(&mut Value, Vec<Value>, &mut CallContext<'_>) -> Result<Option<Value>>;

pub struct BuiltinFunction {
    pub name: &'static str,
    pub params: Vec<Parameter>,
    pub return_type: Option<VariableType>,
    pub native: NativeFunction,
}

pub struct BuiltinMethod {
    pub name: &'static str,
    pub params: Vec<Parameter>,
    pub return_type: Option<VariableType>,
    /// The method mutates its receiver, so the receiver must be a place.
    pub receiver_by_reference: bool,
    pub native: NativeMethod,
}

pub struct BuiltinRegistry {
    functions: FxHashMap<&'static str, BuiltinFunction>,
    array_methods: FxHashMap<&'static str, BuiltinMethod>,
    primitive_methods: FxHashMap<PrimitiveType, FxHashMap<&'static str, BuiltinMethod>>,
}

impl BuiltinRegistry {
    pub fn global() -> &'static BuiltinRegistry {
        static REGISTRY: OnceLock<BuiltinRegistry> = OnceLock::new();
        REGISTRY.get_or_init(BuiltinRegistry::new)
    }

    fn new() -> Self {
        let mut registry = BuiltinRegistry {
            functions: FxHashMap::default(),
            array_methods: FxHashMap::default(),
            primitive_methods: FxHashMap::default(),
        };

        registry.add_function("print", VariableType::BuiltinGeneric, print);
        registry.add_function("prints", PrimitiveType::String.into(), print);
        registry.add_function("printi", PrimitiveType::I64.into(), print);
        registry.add_function("printf", PrimitiveType::F32.into(), print);
        registry.add_function("printb", PrimitiveType::Bool.into(), print);
        registry.add_function("assert", PrimitiveType::Bool.into(), assert);

        registry.array_methods.insert(
            "append",
            BuiltinMethod {
                name: "append",
                params: vec![param("value", VariableType::BuiltinGeneric)],
                return_type: None,
                receiver_by_reference: true,
                native: array_append,
            },
        );
        registry.array_methods.insert("length", length_method(array_length));

        let strings = registry
            .primitive_methods
            .entry(PrimitiveType::String)
            .or_default();
        strings.insert("length", length_method(string_length));
        strings.insert(
            "toLowerCase",
            string_method("toLowerCase", string_to_lower_case),
        );
        strings.insert(
            "toUpperCase",
            string_method("toUpperCase", string_to_upper_case),
        );

        registry
            .primitive_methods
            .entry(PrimitiveType::Char)
            .or_default()
            .insert(
                "int",
                BuiltinMethod {
                    name: "int",
                    params: Vec::new(),
                    return_type: Some(PrimitiveType::U32.into()),
                    receiver_by_reference: false,
                    native: char_code_point,
                },
            );

        registry
    }

    fn add_function(&mut self, name: &'static str, arg: VariableType, native: NativeFunction) {
        self.functions.insert(
            name,
            BuiltinFunction {
                name,
                params: vec![param("value", arg)],
                return_type: None,
                native,
            },
        );
    }

    pub fn function(&self, name: &str) -> Option<&BuiltinFunction> {
        self.functions.get(name)
    }

    pub fn array_method(&self, name: &str) -> Option<&BuiltinMethod> {
        self.array_methods.get(name)
    }

    pub fn primitive_method(&self, ty: PrimitiveType, name: &str) -> Option<&BuiltinMethod> {
        self.primitive_methods.get(&ty)?.get(name)
    }
}

fn param(name: &str, param_type: VariableType) -> Parameter {
    Parameter {
        name: name.to_string(),
        param_type,
        reference: false,
        location: SourceLocation::default(),
    }
}

fn length_method(native: NativeMethod) -> BuiltinMethod {
    BuiltinMethod {
        name: "length",
        params: Vec::new(),
        return_type: Some(PrimitiveType::U32.into()),
        receiver_by_reference: false,
        native,
    }
}

fn string_method(name: &'static str, native: NativeMethod) -> BuiltinMethod {
    BuiltinMethod {
        name,
        params: Vec::new(),
        return_type: Some(PrimitiveType::String.into()),
        receiver_by_reference: false,
        native,
    }
}

fn single_arg(args: Vec<Value>, ctx: &CallContext<'_>) -> Result<Value> {
    let count = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(InternalCompilerError::at(
            format!("Builtin expected 1 argument, got {}", count),
            ctx.location,
        )
        .into()),
    }
}

fn unexpected_receiver(receiver: &Value, ctx: &CallContext<'_>) -> crate::error::Error {
    InternalCompilerError::at(
        format!("Builtin method called on {}", receiver.kind_name()),
        ctx.location,
    )
    .into()
}

fn print(args: Vec<Value>, ctx: &mut CallContext<'_>) -> Result<Option<Value>> {
    let value = single_arg(args, ctx)?;
    ctx.terminal.print_line(value.to_string(), ctx.location);
    Ok(None)
}

fn assert(args: Vec<Value>, ctx: &mut CallContext<'_>) -> Result<Option<Value>> {
    match single_arg(args, ctx)? {
        Value::Bool(true) => Ok(None),
        Value::Bool(false) => Err(AssertionFailure {
            location: ctx.location,
        }
        .into()),
        other => Err(InternalCompilerError::at(
            format!("assert expects bool, got {}", other.kind_name()),
            ctx.location,
        )
        .into()),
    }
}

fn array_append(
    receiver: &mut Value,
    args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    let value = single_arg(args, ctx)?;
    match receiver {
        Value::Array { element, items } => {
            items.push(value.coerce_to(element));
            Ok(None)
        }
        other => Err(unexpected_receiver(other, ctx)),
    }
}

fn count_to_u32(count: usize, ctx: &CallContext<'_>) -> Result<Option<Value>> {
    let count = u32::try_from(count).map_err(|_| RuntimeError::IntegerOverflow {
        operation: "length()".to_string(),
        ty: PrimitiveType::U32.name().to_string(),
        location: ctx.location,
    })?;
    Ok(Some(Value::int(count as i128, PrimitiveType::U32)))
}

fn array_length(
    receiver: &mut Value,
    _args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    match receiver {
        Value::Array { items, .. } => count_to_u32(items.len(), ctx),
        other => Err(unexpected_receiver(other, ctx)),
    }
}

fn string_length(
    receiver: &mut Value,
    _args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    match receiver {
        Value::Str(s) => count_to_u32(s.chars().count(), ctx),
        other => Err(unexpected_receiver(other, ctx)),
    }
}

fn string_to_lower_case(
    receiver: &mut Value,
    _args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    match receiver {
        Value::Str(s) => Ok(Some(Value::Str(s.to_lowercase()))),
        other => Err(unexpected_receiver(other, ctx)),
    }
}

fn string_to_upper_case(
    receiver: &mut Value,
    _args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    match receiver {
        Value::Str(s) => Ok(Some(Value::Str(s.to_uppercase()))),
        other => Err(unexpected_receiver(other, ctx)),
    }
}

fn char_code_point(
    receiver: &mut Value,
    _args: Vec<Value>,
    ctx: &mut CallContext<'_>,
) -> Result<Option<Value>> {
    match receiver {
        Value::Char(c) => Ok(Some(Value::int(*c as u32 as i128, PrimitiveType::U32))),
        other => Err(unexpected_receiver(other, ctx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn ctx(terminal: &mut Terminal) -> CallContext<'_> {
        CallContext {
            location: SourceLocation::new(4, 2),
            terminal,
        }
    }

    #[test]
    fn test_lookup() {
        let registry = BuiltinRegistry::global();
        assert!(registry.function("assert").is_some());
        assert!(registry.function("nope").is_none());
        assert!(registry.array_method("append").is_some_and(|m| m.receiver_by_reference));
        assert!(registry
            .primitive_method(PrimitiveType::String, "toUpperCase")
            .is_some());
        assert!(registry.primitive_method(PrimitiveType::I32, "toUpperCase").is_none());
    }

    #[test]
    fn test_printb_prints_lowercase_words() {
        let mut terminal = Terminal::new(false);
        let printb = BuiltinRegistry::global().function("printb").unwrap();
        (printb.native)(vec![Value::Bool(false)], &mut ctx(&mut terminal)).unwrap();
        assert_eq!(terminal.get_output(), vec!["false"]);
    }

    #[test]
    fn test_assert_false_is_assertion_failure() {
        let mut terminal = Terminal::new(false);
        let assert = BuiltinRegistry::global().function("assert").unwrap();
        let err = (assert.native)(vec![Value::Bool(false)], &mut ctx(&mut terminal)).unwrap_err();
        match err {
            Error::Assertion(failure) => assert_eq!(failure.location, SourceLocation::new(4, 2)),
            other => panic!("Expected assertion failure, got {:?}", other),
        }
    }

    #[test]
    fn test_append_retags_to_element_type() {
        let mut terminal = Terminal::new(false);
        let mut array = Value::Array {
            element: PrimitiveType::I64.into(),
            items: Vec::new(),
        };
        let append = BuiltinRegistry::global().array_method("append").unwrap();
        (append.native)(
            &mut array,
            vec![Value::int(7, PrimitiveType::U8)],
            &mut ctx(&mut terminal),
        )
        .unwrap();
        assert_eq!(
            array,
            Value::Array {
                element: PrimitiveType::I64.into(),
                items: vec![Value::int(7, PrimitiveType::I64)],
            }
        );
    }

    #[test]
    fn test_string_methods() {
        let mut terminal = Terminal::new(false);
        let registry = BuiltinRegistry::global();
        let mut text = Value::Str("MiXeD".to_string());

        let lower = registry
            .primitive_method(PrimitiveType::String, "toLowerCase")
            .unwrap();
        let result = (lower.native)(&mut text, Vec::new(), &mut ctx(&mut terminal)).unwrap();
        assert_eq!(result, Some(Value::Str("mixed".to_string())));
        assert_eq!(text, Value::Str("MiXeD".to_string()));

        let length = registry.primitive_method(PrimitiveType::String, "length").unwrap();
        let result = (length.native)(&mut text, Vec::new(), &mut ctx(&mut terminal)).unwrap();
        assert_eq!(result, Some(Value::int(5, PrimitiveType::U32)));
    }
}
