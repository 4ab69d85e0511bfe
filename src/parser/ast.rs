// AST (Abstract Syntax Tree) definitions for xlang programs

use crate::semantic::errors::CompileError;
use crate::semantic::types::VariableType;
use rustc_hash::FxHashMap;
use std::fmt;

/// Unique identifier for AST nodes, used to key the validation side table
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Literal payload of a `Constant` expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i128),
    Float(f64),
    String(String),
    Char(char),
    Bool(bool),
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl MathOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            MathOperator::Add => "+",
            MathOperator::Subtract => "-",
            MathOperator::Multiply => "*",
            MathOperator::Divide => "/",
            MathOperator::Modulo => "%",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl CompareOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Equal => "==",
            CompareOperator::NotEqual => "!=",
            CompareOperator::Less => "<",
            CompareOperator::LessEqual => "<=",
            CompareOperator::Greater => ">",
            CompareOperator::GreaterEqual => ">=",
        }
    }

    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOperator::Equal | CompareOperator::NotEqual)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,    // not x
    Negate, // -x
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub kind: ExpressionKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Constant(Literal),
    VariableAccess(VariableAccess),
    FunctionCall(FunctionCall),
    Math {
        op: MathOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Compare {
        op: CompareOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    StructInitializer {
        struct_name: String,
        fields: Vec<FieldInitializer>,
    },
}

/// One step of a variable access chain
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// `[expr]`
    Index(Box<Expression>),
    /// `.name`
    Member { name: String, location: SourceLocation },
}

/// `name`, followed by any number of index / member steps and optionally
/// terminated by a method call: `a.items[2].name.toUpperCase()`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAccess {
    pub name: String,
    pub accessors: Vec<Accessor>,
    pub method: Option<FunctionCall>,
    pub location: SourceLocation,
}

impl VariableAccess {
    /// A plain variable name with nothing chained onto it.
    pub fn is_bare(&self) -> bool {
        self.accessors.is_empty() && self.method.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInitializer {
    pub name: String,
    pub value: Expression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElifBranch {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `x: T;`
    VariableDeclaration {
        id: NodeId,
        name: String,
        var_type: VariableType,
        location: SourceLocation,
    },
    /// `x: T = value;` or `const x: T = value;`
    VariableDefinition {
        id: NodeId,
        name: String,
        var_type: VariableType,
        value: Expression,
        is_const: bool,
        location: SourceLocation,
    },
    /// `access = value;` where `target` is always a `VariableAccess`
    VariableAssign {
        target: Expression,
        value: Expression,
        location: SourceLocation,
    },
    Loop {
        body: Vec<Statement>,
        location: SourceLocation,
    },
    If {
        condition: Expression,
        body: Vec<Statement>,
        elifs: Vec<ElifBranch>,
        else_body: Option<Vec<Statement>>,
        location: SourceLocation,
    },
    Return {
        value: Option<Expression>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    /// `f(args);` where `call` is always a `FunctionCall`
    FunctionCall {
        call: Expression,
        location: SourceLocation,
    },
    /// `access.method(args);` where `access` is always a `VariableAccess`
    MethodCall {
        access: Expression,
        location: SourceLocation,
    },
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::VariableDeclaration { location, .. }
            | Statement::VariableDefinition { location, .. }
            | Statement::VariableAssign { location, .. }
            | Statement::Loop { location, .. }
            | Statement::If { location, .. }
            | Statement::Return { location, .. }
            | Statement::Break { location }
            | Statement::Continue { location }
            | Statement::FunctionCall { location, .. }
            | Statement::MethodCall { location, .. } => *location,
        }
    }
}

/// Function parameter. `reference` parameters alias the caller's variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: VariableType,
    pub reference: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Option<VariableType>,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

/// Struct member with an optional default value expression
#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub member_type: VariableType,
    pub default: Option<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: String,
    pub members: Vec<StructMember>,
    pub location: SourceLocation,
}

impl StructType {
    pub fn member(&self, name: &str) -> Option<&StructMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub entries: Vec<String>,
    pub location: SourceLocation,
}

impl EnumType {
    pub fn has_entry(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }
}

/// Root of the tree: every top-level definition, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalScope {
    pub functions: FxHashMap<String, Function>,
    pub structs: FxHashMap<String, StructType>,
    pub enums: FxHashMap<String, EnumType>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: Function) -> Result<(), CompileError> {
        if self.functions.contains_key(&function.name) {
            return Err(CompileError::duplicate(
                format!("Function '{}' is already defined", function.name),
                function.location,
            ));
        }
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    pub fn add_struct(&mut self, struct_type: StructType) -> Result<(), CompileError> {
        self.check_type_name_free(&struct_type.name, "Struct", struct_type.location)?;
        for (index, member) in struct_type.members.iter().enumerate() {
            if struct_type.members[..index].iter().any(|m| m.name == member.name) {
                return Err(CompileError::duplicate(
                    format!(
                        "Struct '{}' has duplicate member '{}'",
                        struct_type.name, member.name
                    ),
                    member.location,
                ));
            }
        }
        self.structs.insert(struct_type.name.clone(), struct_type);
        Ok(())
    }

    pub fn add_enum(&mut self, enum_type: EnumType) -> Result<(), CompileError> {
        self.check_type_name_free(&enum_type.name, "Enum", enum_type.location)?;
        for (index, entry) in enum_type.entries.iter().enumerate() {
            if enum_type.entries[..index].contains(entry) {
                return Err(CompileError::duplicate(
                    format!("Enum '{}' has duplicate entry '{}'", enum_type.name, entry),
                    enum_type.location,
                ));
            }
        }
        self.enums.insert(enum_type.name.clone(), enum_type);
        Ok(())
    }

    fn check_type_name_free(
        &self,
        name: &str,
        what: &str,
        location: SourceLocation,
    ) -> Result<(), CompileError> {
        if self.structs.contains_key(name) || self.enums.contains_key(name) {
            return Err(CompileError::duplicate(
                format!("{} '{}' is already defined", what, name),
                location,
            ));
        }
        Ok(())
    }

    /// Functions in source order, for deterministic checking and reporting.
    pub fn functions_in_order(&self) -> Vec<&Function> {
        let mut functions: Vec<&Function> = self.functions.values().collect();
        functions.sort_by_key(|f| (f.location.line, f.location.column));
        functions
    }

    /// Structs in source order.
    pub fn structs_in_order(&self) -> Vec<&StructType> {
        let mut structs: Vec<&StructType> = self.structs.values().collect();
        structs.sort_by_key(|s| (s.location.line, s.location.column));
        structs
    }
}
