//! Variable access chains: `name[i].field[j]`, optionally ending in a method.
//!
//! Index expressions are evaluated before the variable's cell is borrowed, so
//! an index may read the same variable it indexes into.

use crate::builtins::CallContext;
use crate::error::{InternalCompilerError, Result};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::memory::Slot;
use crate::parser::ast::{Accessor, FunctionCall, SourceLocation, VariableAccess};
use crate::semantic::types::PrimitiveType;
use log::trace;
use std::rc::Rc;

/// One resolved step of an access chain
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step<'p> {
    Field(&'p str, SourceLocation),
    Index(i128, SourceLocation),
}

fn checked_index(index: i128, len: usize, location: SourceLocation) -> Result<usize> {
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(RuntimeError::IndexOutOfBounds {
            index,
            len,
            location,
        }
        .into()),
    }
}

fn string_char(s: &str, index: i128, location: SourceLocation) -> Result<char> {
    let len = s.chars().count();
    let i = checked_index(index, len, location)?;
    s.chars().nth(i).ok_or_else(|| {
        InternalCompilerError::at("String index past the last character", location).into()
    })
}

fn bad_step(value: &Value, step: &Step<'_>) -> crate::error::Error {
    let (what, location) = match step {
        Step::Field(name, location) => (format!("member '{}'", name), *location),
        Step::Index(_, location) => ("an index".to_string(), *location),
    };
    InternalCompilerError::at(
        format!("Cannot access {} of {}", what, value.kind_name()),
        location,
    )
    .into()
}

/// Copy of the value at the end of `steps`
fn read_path(root: &Value, steps: &[Step<'_>]) -> Result<Value> {
    let mut current = root;
    for (position, step) in steps.iter().enumerate() {
        current = match (current, step) {
            (Value::Struct { fields, .. }, Step::Field(name, _)) => {
                fields.get(*name).ok_or_else(|| bad_step(current, step))?
            }
            (Value::Array { items, .. }, Step::Index(index, location)) => {
                &items[checked_index(*index, items.len(), *location)?]
            }
            (Value::Str(s), Step::Index(index, location)) if position + 1 == steps.len() => {
                return Ok(Value::Char(string_char(s, *index, *location)?));
            }
            _ => return Err(bad_step(current, step)),
        };
    }
    Ok(current.clone())
}

fn step_mut<'v>(value: &'v mut Value, step: &Step<'_>) -> Result<&'v mut Value> {
    match (value, step) {
        (Value::Struct { fields, .. }, Step::Field(name, location)) => {
            fields.get_mut(*name).ok_or_else(|| {
                InternalCompilerError::at(format!("Missing member '{}'", name), *location).into()
            })
        }
        (Value::Array { items, .. }, Step::Index(index, location)) => {
            let i = checked_index(*index, items.len(), *location)?;
            Ok(&mut items[i])
        }
        (value, step) => Err(bad_step(value, step)),
    }
}

/// The place a method is called on. A character read out of a string is
/// materialized into `scratch`, since it has no storage of its own.
fn receiver_mut<'v>(
    root: &'v mut Value,
    steps: &[Step<'_>],
    scratch: &'v mut Option<Value>,
) -> Result<&'v mut Value> {
    let mut current = root;
    for (position, step) in steps.iter().enumerate() {
        if let (Value::Str(s), Step::Index(index, location)) = (&*current, step) {
            if position + 1 != steps.len() {
                return Err(bad_step(current, step));
            }
            let c = string_char(s, *index, *location)?;
            return Ok(scratch.insert(Value::Char(c)));
        }
        current = step_mut(current, step)?;
    }
    Ok(current)
}

impl<'p> Interpreter<'p> {
    /// Storage cell of a variable visible in the current function
    pub(crate) fn lookup_slot(&self, name: &str, location: SourceLocation) -> Result<Slot> {
        self.scopes.get(name).map(Rc::clone).ok_or_else(|| {
            InternalCompilerError::at(format!("Unknown variable '{}'", name), location).into()
        })
    }

    fn resolve_steps(&mut self, accessors: &'p [Accessor]) -> Result<Vec<Step<'p>>> {
        let mut steps = Vec::with_capacity(accessors.len());
        for accessor in accessors {
            let step = match accessor {
                Accessor::Member { name, location } => Step::Field(name, *location),
                Accessor::Index(expr) => {
                    let value = self.evaluate(expr)?;
                    let index = value.as_int().ok_or_else(|| {
                        InternalCompilerError::at(
                            format!("Index evaluated to {}", value.kind_name()),
                            expr.location,
                        )
                    })?;
                    Step::Index(index, expr.location)
                }
            };
            steps.push(step);
        }
        Ok(steps)
    }

    /// `Enum.Member` where `Enum` is not shadowed by a variable
    fn enum_access(&self, access: &'p VariableAccess) -> Result<Value> {
        let is_enum = self.program.globals.enums.contains_key(&access.name);
        match access.accessors.as_slice() {
            [Accessor::Member { name, .. }] if is_enum && access.method.is_none() => {
                Ok(Value::Enum {
                    name: access.name.clone(),
                    member: name.clone(),
                })
            }
            _ => Err(InternalCompilerError::at(
                format!("Unknown variable '{}'", access.name),
                access.location,
            )
            .into()),
        }
    }

    /// Read an access chain. `None` only when it ends in a method that
    /// returns nothing.
    pub(crate) fn evaluate_access(&mut self, access: &'p VariableAccess) -> Result<Option<Value>> {
        if !self.scopes.contains(&access.name) {
            return self.enum_access(access).map(Some);
        }

        let slot = self.lookup_slot(&access.name, access.location)?;
        let steps = self.resolve_steps(&access.accessors)?;

        match &access.method {
            Some(method) => self.call_method(&slot, &steps, method),
            None => {
                let root = slot.try_borrow().map_err(|_| {
                    InternalCompilerError::at("Variable is already borrowed", access.location)
                })?;
                read_path(&root, &steps).map(Some)
            }
        }
    }

    /// Store `value` at the place an access chain names
    pub(crate) fn assign(&mut self, access: &'p VariableAccess, value: Value) -> Result<()> {
        let slot = self.lookup_slot(&access.name, access.location)?;
        let steps = self.resolve_steps(&access.accessors)?;

        let mut root = slot.try_borrow_mut().map_err(|_| {
            InternalCompilerError::at("Variable is already borrowed", access.location)
        })?;
        let mut target = &mut *root;
        for step in &steps {
            target = step_mut(target, step)?;
        }
        *target = value;
        Ok(())
    }

    fn call_method(
        &mut self,
        slot: &Slot,
        steps: &[Step<'p>],
        method: &'p FunctionCall,
    ) -> Result<Option<Value>> {
        let mut args = Vec::with_capacity(method.args.len());
        for arg in &method.args {
            args.push(self.evaluate(arg)?);
        }

        let builtins = self.builtins;
        let mut root = slot.try_borrow_mut().map_err(|_| {
            InternalCompilerError::at("Variable is already borrowed", method.location)
        })?;
        let mut scratch = None;
        let receiver = receiver_mut(&mut root, steps, &mut scratch)?;

        let builtin = match &*receiver {
            Value::Array { .. } => builtins.array_method(&method.name),
            Value::Str(_) => builtins.primitive_method(PrimitiveType::String, &method.name),
            Value::Char(_) => builtins.primitive_method(PrimitiveType::Char, &method.name),
            Value::Bool(_) => builtins.primitive_method(PrimitiveType::Bool, &method.name),
            Value::Float(_) => builtins.primitive_method(PrimitiveType::F32, &method.name),
            Value::Int { ty, .. } => builtins.primitive_method(*ty, &method.name),
            Value::Struct { .. } | Value::Enum { .. } => None,
        }
        .ok_or_else(|| {
            InternalCompilerError::at(
                format!(
                    "No method '{}' on {}",
                    method.name,
                    receiver.kind_name()
                ),
                method.location,
            )
        })?;
        trace!("calling builtin method '{}'", builtin.name);

        let mut ctx = CallContext {
            location: method.location,
            terminal: &mut self.terminal,
        };
        (builtin.native)(receiver, args, &mut ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::types::VariableType;
    use rustc_hash::FxHashMap;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    fn numbers() -> Value {
        Value::Array {
            element: PrimitiveType::I32.into(),
            items: vec![
                Value::int(10, PrimitiveType::I32),
                Value::int(20, PrimitiveType::I32),
            ],
        }
    }

    #[test]
    fn test_read_path_through_struct_and_array() {
        let mut fields = FxHashMap::default();
        fields.insert("items".to_string(), numbers());
        let root = Value::Struct {
            name: "Bag".to_string(),
            fields,
        };
        let steps = [Step::Field("items", loc()), Step::Index(1, loc())];
        assert_eq!(
            read_path(&root, &steps).unwrap(),
            Value::int(20, PrimitiveType::I32)
        );
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = read_path(&numbers(), &[Step::Index(2, loc())]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Runtime(RuntimeError::IndexOutOfBounds { index: 2, len: 2, .. })
        ));
        let err = read_path(&numbers(), &[Step::Index(-1, loc())]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Runtime(RuntimeError::IndexOutOfBounds { index: -1, .. })
        ));
    }

    #[test]
    fn test_string_index_reads_char() {
        let root = Value::Str("héllo".to_string());
        assert_eq!(
            read_path(&root, &[Step::Index(1, loc())]).unwrap(),
            Value::Char('é')
        );
    }

    #[test]
    fn test_receiver_for_string_char_uses_scratch() {
        let mut root = Value::Str("abc".to_string());
        let mut scratch = None;
        let receiver = receiver_mut(&mut root, &[Step::Index(2, loc())], &mut scratch).unwrap();
        assert_eq!(*receiver, Value::Char('c'));
    }

    #[test]
    fn test_step_mut_writes_element() {
        let mut root = numbers();
        *step_mut(&mut root, &Step::Index(0, loc())).unwrap() = Value::int(7, PrimitiveType::I32);
        assert_eq!(
            root,
            Value::Array {
                element: VariableType::Primitive(PrimitiveType::I32),
                items: vec![
                    Value::int(7, PrimitiveType::I32),
                    Value::int(20, PrimitiveType::I32),
                ],
            }
        );
    }
}
