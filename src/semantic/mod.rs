//! Validation pass
//!
//! Resolves every placeholder type, infers literal types, and checks
//! assignability, call signatures, constness and loop-control placement.
//! The parsed tree is left untouched: the result is a [`Program`] holding a
//! copy of the global scope with resolved signatures plus a [`TypeTable`]
//! mapping node ids to their resolved types.
//!
//! Checking happens in three stages:
//! 1. struct member types and default values,
//! 2. function parameter and return types,
//! 3. function bodies, in source order; the first error in a body is
//!    annotated with the enclosing function.

pub mod access;
pub mod errors;
pub mod expressions;
pub mod folding;
pub mod typeifier;
pub mod types;

use crate::error::{Error, InternalCompilerError, Result};
use crate::parser::ast::{
    Accessor, Expression, ExpressionKind, GlobalScope, NodeId, SourceLocation, StructType,
};
use errors::{CompileError, CompileErrorKind};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use typeifier::Typeifier;
use types::{is_assignable, resolve, VariableType};

/// Resolved type of every expression and declaration node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    types: FxHashMap<NodeId, VariableType>,
}

impl TypeTable {
    pub fn insert(&mut self, id: NodeId, ty: VariableType) {
        self.types.insert(id, ty);
    }

    pub fn get(&self, id: NodeId) -> Option<&VariableType> {
        self.types.get(&id)
    }

    /// Type of a node the validation pass must have visited
    pub fn expect(
        &self,
        id: NodeId,
        location: SourceLocation,
    ) -> std::result::Result<&VariableType, InternalCompilerError> {
        self.get(id).ok_or_else(|| {
            InternalCompilerError::at(format!("Node {} was never typed", id), location)
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A program that passed validation, ready to run
#[derive(Debug, Clone)]
pub struct Program {
    pub globals: GlobalScope,
    pub types: TypeTable,
}

pub fn validation_pass(globals: &GlobalScope) -> Result<Program> {
    let mut resolved = globals.clone();
    let mut types = TypeTable::default();

    // Stage 1: struct members
    for struct_type in globals.structs_in_order() {
        resolve_struct(struct_type, &mut resolved, &mut types)?;
    }
    check_struct_cycles(&resolved)?;
    debug!("resolved {} struct definitions", resolved.structs.len());

    // Stage 2: signatures
    for function in globals.functions_in_order() {
        let mut params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            params.push(resolve(&param.param_type, globals, param.location)?);
        }
        let return_type = match &function.return_type {
            Some(ty) => Some(resolve(ty, globals, function.location)?),
            None => None,
        };

        let target = resolved.functions.get_mut(&function.name).ok_or_else(|| {
            InternalCompilerError::at(
                format!("Function '{}' vanished during resolution", function.name),
                function.location,
            )
        })?;
        for (param, ty) in target.params.iter_mut().zip(params) {
            param.param_type = ty;
        }
        target.return_type = return_type;
    }
    debug!("resolved {} function signatures", resolved.functions.len());

    // Stage 3: bodies
    for function in resolved.functions_in_order() {
        debug!("validating function '{}'", function.name);
        Typeifier::new(&resolved, &mut types, function)
            .check()
            .map_err(|err| match err {
                Error::Compile(e) => Error::Compile(e.in_function(&function.name, function.location)),
                other => other,
            })?;
    }

    debug!("validation finished, {} typed nodes", types.len());
    Ok(Program {
        globals: resolved,
        types,
    })
}

fn resolve_struct(
    struct_type: &StructType,
    resolved: &mut GlobalScope,
    types: &mut TypeTable,
) -> Result<()> {
    let mut member_types = Vec::with_capacity(struct_type.members.len());

    for member in &struct_type.members {
        let ty = resolve(&member.member_type, resolved, member.location)?;
        if let Some(default) = &member.default {
            let default_type = member_default_type(default, resolved, types)?;
            if !is_assignable(&ty, &default_type) {
                return Err(CompileError::mismatch(
                    format!(
                        "Default value of type {} cannot initialize member '{}' of type {}",
                        default_type, member.name, ty
                    ),
                    default.location,
                )
                .into());
            }
        }
        member_types.push(ty);
    }

    if let Some(target) = resolved.structs.get_mut(&struct_type.name) {
        for (member, ty) in target.members.iter_mut().zip(member_types) {
            member.member_type = ty;
        }
    }
    Ok(())
}

/// Defaults are restricted to literals and `Enum.Member`.
fn member_default_type(
    default: &Expression,
    globals: &GlobalScope,
    types: &mut TypeTable,
) -> Result<VariableType> {
    let ty = match &default.kind {
        ExpressionKind::Constant(literal) => expressions::constant_type(literal, default.location)?,
        ExpressionKind::VariableAccess(access)
            if access.method.is_none() && globals.enums.contains_key(&access.name) =>
        {
            match access.accessors.as_slice() {
                [Accessor::Member { name, location }] => {
                    expressions::enum_member_type(globals, &access.name, name, *location)?
                }
                _ => return Err(invalid_default(default.location)),
            }
        }
        _ => return Err(invalid_default(default.location)),
    };
    types.insert(default.id, ty.clone());
    Ok(ty)
}

fn invalid_default(location: SourceLocation) -> Error {
    CompileError::mismatch(
        "Struct member default must be a constant or an enum member",
        location,
    )
    .into()
}

/// A struct may not contain itself through plain struct members.
fn check_struct_cycles(globals: &GlobalScope) -> Result<()> {
    fn visit<'a>(
        name: &'a str,
        globals: &'a GlobalScope,
        path: &mut Vec<&'a str>,
        done: &mut FxHashSet<&'a str>,
    ) -> std::result::Result<(), CompileError> {
        if done.contains(name) {
            return Ok(());
        }
        let Some(struct_type) = globals.structs.get(name) else {
            return Ok(());
        };
        if path.contains(&name) {
            return Err(CompileError::new(
                CompileErrorKind::TypeMismatch,
                format!("Struct '{}' contains itself", name),
                struct_type.location,
            ));
        }
        path.push(name);
        for member in &struct_type.members {
            if let VariableType::Struct(inner) = &member.member_type {
                visit(inner, globals, path, done)?;
            }
        }
        path.pop();
        done.insert(name);
        Ok(())
    }

    let mut done = FxHashSet::default();
    for struct_type in globals.structs_in_order() {
        visit(&struct_type.name, globals, &mut Vec::new(), &mut done)?;
    }
    Ok(())
}

/// Whether a variable of this type can be created without an initializer.
///
/// Enums have no zero member, so neither do structs holding an enum member
/// without a declared default.
pub fn has_default_value(ty: &VariableType, globals: &GlobalScope) -> bool {
    match ty {
        VariableType::Primitive(_) | VariableType::Array(_) => true,
        VariableType::Struct(name) => globals.structs.get(name).is_some_and(|s| {
            s.members
                .iter()
                .all(|m| m.default.is_some() || has_default_value(&m.member_type, globals))
        }),
        VariableType::Enum(_) | VariableType::Unknown(_) | VariableType::BuiltinGeneric => false,
    }
}
