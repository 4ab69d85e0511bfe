use crate::error::Result;
use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::semantic::types::VariableType;
use log::debug;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Recursive descent parser producing a [`GlobalScope`]
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    next_id: NodeId,
}

impl Parser {
    pub fn new(source: &str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            next_id: 0,
        })
    }

    /// Parse the entire program (top-level definitions).
    ///
    /// Duplicate functions, types, enum entries and struct members are
    /// reported here as definition errors.
    pub fn parse_program(&mut self) -> Result<GlobalScope> {
        let mut globals = GlobalScope::new();

        while !self.is_at_end() {
            match self.peek() {
                Token::Struct(_) => {
                    let struct_type = self.parse_struct_definition()?;
                    globals.add_struct(struct_type)?;
                }
                Token::Enum(_) => {
                    let enum_type = self.parse_enum_definition()?;
                    globals.add_enum(enum_type)?;
                }
                _ => {
                    let function = self.parse_function_definition()?;
                    globals.add_function(function)?;
                }
            }
        }

        debug!(
            "parsed {} functions, {} structs, {} enums",
            globals.functions.len(),
            globals.structs.len(),
            globals.enums.len()
        );
        Ok(globals)
    }

    /// Parse struct definition: struct Name { member: type = default, ... }
    fn parse_struct_definition(&mut self) -> ParseResult<StructType> {
        self.advance(); // consume 'struct'
        let location = self.current_location();
        let name = self.expect_identifier()?;

        self.expect_token(&Token::LBrace(self.current_location()), "Expected '{' after struct name")?;

        let mut members = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            let member_location = self.current_location();
            let member_name = self.expect_identifier()?;
            self.expect_token(&Token::Colon(self.current_location()), "Expected ':' after struct member name")?;
            let member_type = self.parse_type()?;

            let default = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            members.push(StructMember {
                name: member_name,
                member_type,
                default,
                location: member_location,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(&Token::RBrace(self.current_location()), "Expected '}' after struct members")?;

        Ok(StructType {
            name,
            members,
            location,
        })
    }

    /// Parse enum definition: enum Name { A, B, C }
    fn parse_enum_definition(&mut self) -> ParseResult<EnumType> {
        self.advance(); // consume 'enum'
        let location = self.current_location();
        let name = self.expect_identifier()?;

        self.expect_token(&Token::LBrace(self.current_location()), "Expected '{' after enum name")?;

        let mut entries = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            entries.push(self.expect_identifier()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(&Token::RBrace(self.current_location()), "Expected '}' after enum entries")?;

        Ok(EnumType {
            name,
            entries,
            location,
        })
    }

    /// Parse function definition: func name(params): type { body }
    fn parse_function_definition(&mut self) -> ParseResult<Function> {
        self.match_token(&Token::Func(self.current_location()));
        let location = self.current_location();
        let name = self.expect_identifier()?;

        self.expect_token(&Token::LParen(self.current_location()), "Expected '(' after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after parameters")?;

        let return_type = if self.match_token(&Token::Colon(self.current_location())) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(Function {
            name,
            params,
            return_type,
            body,
            location,
        })
    }

    /// Parse parameter list: name: type, name: *type
    fn parse_parameter_list(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        loop {
            let location = self.current_location();
            let name = self.expect_identifier()?;
            self.expect_token(&Token::Colon(self.current_location()), "Expected ':' after parameter name")?;
            let reference = self.match_token(&Token::Star(self.current_location()));
            let param_type = self.parse_type()?;

            params.push(Parameter {
                name,
                param_type,
                reference,
                location,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a type: `name` or `[name]`
    fn parse_type(&mut self) -> ParseResult<VariableType> {
        if self.match_token(&Token::LBracket(self.current_location())) {
            let element = self.expect_identifier()?;
            self.expect_token(&Token::RBracket(self.current_location()), "Expected ']' after array element type")?;
            return Ok(VariableType::Array(Box::new(VariableType::Unknown(element))));
        }

        match self.peek_token() {
            Token::Ident(name, _) => {
                self.advance();
                Ok(VariableType::Unknown(name))
            }
            other => Err(ParseError {
                message: format!("Expected type, found {}", other),
                location: other.location(),
            }),
        }
    }

    /// Parse `{ statement* }`
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_token(&Token::LBrace(self.current_location()), "Expected '{' to open block")?;

        let mut statements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            if self.is_at_end() {
                return Err(ParseError {
                    message: "Expected '}' to close block, found end of file".to_string(),
                    location: self.current_location(),
                });
            }
            statements.push(self.parse_statement()?);
        }

        self.advance(); // consume '}'
        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let location = self.current_location();

        match self.peek_token() {
            Token::Var(_) => {
                self.advance();
                self.parse_declaration(false)
            }
            Token::Const(_) => {
                self.advance();
                self.parse_declaration(true)
            }
            Token::Ident(_, _) if matches!(self.peek_ahead(1), Some(Token::Colon(_))) => {
                self.parse_declaration(false)
            }
            Token::Loop(_) => {
                self.advance();
                let body = self.parse_block()?;
                Ok(Statement::Loop { body, location })
            }
            Token::If(_) => self.parse_if_statement(),
            Token::Return(_) => {
                self.advance();
                let value = if self.check(&Token::Semicolon(location)) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_semicolon("return statement")?;
                Ok(Statement::Return { value, location })
            }
            Token::Break(_) => {
                self.advance();
                self.expect_semicolon("'break'")?;
                Ok(Statement::Break { location })
            }
            Token::Continue(_) => {
                self.advance();
                self.expect_semicolon("'continue'")?;
                Ok(Statement::Continue { location })
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Parse `name: type (= value)?;` after any `var`/`const` keyword
    fn parse_declaration(&mut self, is_const: bool) -> ParseResult<Statement> {
        let location = self.current_location();
        let name = self.expect_identifier()?;
        self.expect_token(&Token::Colon(self.current_location()), "Expected ':' after variable name")?;
        let var_type = self.parse_type()?;
        let id = self.next_node_id();

        if self.match_token(&Token::Eq(self.current_location())) {
            let value = self.parse_expression()?;
            self.expect_semicolon("variable definition")?;
            return Ok(Statement::VariableDefinition {
                id,
                name,
                var_type,
                value,
                is_const,
                location,
            });
        }

        if is_const {
            return Err(ParseError {
                message: format!("Constant '{}' must be initialized", name),
                location: self.current_location(),
            });
        }

        self.expect_semicolon("variable declaration")?;
        Ok(Statement::VariableDeclaration {
            id,
            name,
            var_type,
            location,
        })
    }

    /// Parse if / elif / else chain
    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let location = self.current_location();
        self.advance(); // consume 'if'

        let condition = self.parse_condition("if")?;
        let body = self.parse_block()?;

        let mut elifs = Vec::new();
        while self.match_token(&Token::Elif(self.current_location())) {
            let condition = self.parse_condition("elif")?;
            let body = self.parse_block()?;
            elifs.push(ElifBranch { condition, body });
        }

        let else_body = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            body,
            elifs,
            else_body,
            location,
        })
    }

    fn parse_condition(&mut self, keyword: &str) -> ParseResult<Expression> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' after '{}'", keyword),
        )?;
        let condition = self.parse_expression()?;
        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after condition")?;
        Ok(condition)
    }

    /// Assignment, function call or method call statement
    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let location = self.current_location();
        let expr = self.parse_expression()?;

        if self.match_token(&Token::Eq(self.current_location())) {
            match &expr.kind {
                ExpressionKind::VariableAccess(access) if access.method.is_none() => {}
                _ => {
                    return Err(ParseError {
                        message: "Invalid assignment target".to_string(),
                        location: expr.location,
                    })
                }
            }
            let value = self.parse_expression()?;
            self.expect_semicolon("assignment")?;
            return Ok(Statement::VariableAssign {
                target: expr,
                value,
                location,
            });
        }

        self.expect_semicolon("expression statement")?;

        match expr.kind {
            ExpressionKind::FunctionCall(_) => Ok(Statement::FunctionCall {
                call: expr,
                location,
            }),
            ExpressionKind::VariableAccess(_) => Ok(Statement::MethodCall {
                access: expr,
                location,
            }),
            _ => Err(ParseError {
                message: "Expected statement, found a bare expression".to_string(),
                location,
            }),
        }
    }

    // ===== Expressions =====

    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_comparison()
    }

    /// Parse comparison (==, !=, <, <=, >, >=). Comparisons do not chain.
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_additive()?;

        let op = match self.peek() {
            Token::EqEq(_) => CompareOperator::Equal,
            Token::NotEq(_) => CompareOperator::NotEqual,
            Token::Lt(_) => CompareOperator::Less,
            Token::Le(_) => CompareOperator::LessEqual,
            Token::Gt(_) => CompareOperator::Greater,
            Token::Ge(_) => CompareOperator::GreaterEqual,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_additive()?;
        let location = left.location;
        Ok(self.node(
            ExpressionKind::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        ))
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => MathOperator::Add,
                Token::Minus(_) => MathOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.math(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative (*, /, %)
    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => MathOperator::Multiply,
                Token::Slash(_) => MathOperator::Divide,
                Token::Percent(_) => MathOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.math(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary (not, !, -). `-` directly before a number literal yields
    /// a negative constant.
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let location = self.current_location();

        match self.peek_token() {
            Token::Not(_) | Token::Bang(_) => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(self.node(
                    ExpressionKind::Unary {
                        op: UnaryOperator::Not,
                        operand: Box::new(operand),
                    },
                    location,
                ))
            }
            Token::Minus(_) => {
                self.advance();
                match self.peek_token() {
                    Token::IntLiteral(n, _) => {
                        self.advance();
                        Ok(self.node(ExpressionKind::Constant(Literal::Integer(-n)), location))
                    }
                    Token::FloatLiteral(n, _) => {
                        self.advance();
                        Ok(self.node(ExpressionKind::Constant(Literal::Float(-n)), location))
                    }
                    _ => {
                        let operand = self.parse_unary()?;
                        Ok(self.node(
                            ExpressionKind::Unary {
                                op: UnaryOperator::Negate,
                                operand: Box::new(operand),
                            },
                            location,
                        ))
                    }
                }
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse primary (literals, calls, struct initializers, variable access,
    /// parenthesized expressions)
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let location = self.current_location();

        let literal = match self.peek_token() {
            Token::IntLiteral(n, _) => Some(Literal::Integer(n)),
            Token::FloatLiteral(n, _) => Some(Literal::Float(n)),
            Token::StringLiteral(s, _) => Some(Literal::String(s)),
            Token::CharLiteral(c, _) => Some(Literal::Char(c)),
            Token::True(_) => Some(Literal::Bool(true)),
            Token::False(_) => Some(Literal::Bool(false)),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(self.node(ExpressionKind::Constant(literal), location));
        }

        if self.match_token(&Token::LParen(location)) {
            let expr = self.parse_expression()?;
            self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after expression")?;
            return Ok(expr);
        }

        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();

            if self.check(&Token::LParen(location)) {
                let call = self.parse_call(name, location)?;
                return Ok(self.node(ExpressionKind::FunctionCall(call), location));
            }

            if self.check(&Token::LBrace(location)) {
                return self.parse_struct_initializer(name, location);
            }

            let access = self.parse_access_chain(name, location)?;
            return Ok(self.node(ExpressionKind::VariableAccess(access), location));
        }

        Err(ParseError {
            message: format!("Unexpected token: {}", self.peek()),
            location,
        })
    }

    /// Parse `(args)` after a function or method name
    fn parse_call(&mut self, name: String, location: SourceLocation) -> ParseResult<FunctionCall> {
        self.advance(); // consume '('

        let mut args = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_token(&Token::RParen(self.current_location()), "Expected ')' after arguments")?;

        Ok(FunctionCall {
            name,
            args,
            location,
        })
    }

    /// Parse `Name { field: value, ... }` after the struct name
    fn parse_struct_initializer(
        &mut self,
        struct_name: String,
        location: SourceLocation,
    ) -> ParseResult<Expression> {
        self.advance(); // consume '{'

        let mut fields = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            let field_location = self.current_location();
            let name = self.expect_identifier()?;
            self.expect_token(&Token::Colon(self.current_location()), "Expected ':' after field name")?;
            let value = self.parse_expression()?;
            fields.push(FieldInitializer {
                name,
                value,
                location: field_location,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(&Token::RBrace(self.current_location()), "Expected '}' after struct fields")?;

        Ok(self.node(
            ExpressionKind::StructInitializer {
                struct_name,
                fields,
            },
            location,
        ))
    }

    /// Parse the `[index]` / `.member` / `.method(args)` steps after a name
    fn parse_access_chain(
        &mut self,
        name: String,
        location: SourceLocation,
    ) -> ParseResult<VariableAccess> {
        let mut accessors = Vec::new();
        let mut method = None;

        loop {
            if self.match_token(&Token::LBracket(self.current_location())) {
                let index = self.parse_expression()?;
                self.expect_token(&Token::RBracket(self.current_location()), "Expected ']' after index")?;
                accessors.push(Accessor::Index(Box::new(index)));
            } else if self.match_token(&Token::Dot(self.current_location())) {
                let member_location = self.current_location();
                let member = self.expect_identifier()?;
                if self.check(&Token::LParen(member_location)) {
                    method = Some(self.parse_call(member, member_location)?);
                    break;
                }
                accessors.push(Accessor::Member {
                    name: member,
                    location: member_location,
                });
            } else {
                break;
            }
        }

        if method.is_some()
            && (self.check(&Token::Dot(location)) || self.check(&Token::LBracket(location)))
        {
            return Err(ParseError {
                message: "A method call must end a variable access".to_string(),
                location: self.current_location(),
            });
        }

        Ok(VariableAccess {
            name,
            accessors,
            method,
            location,
        })
    }

    // ===== Helper methods =====

    fn next_node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node(&mut self, kind: ExpressionKind, location: SourceLocation) -> Expression {
        Expression {
            id: self.next_node_id(),
            kind,
            location,
        }
    }

    fn math(&mut self, op: MathOperator, left: Expression, right: Expression) -> Expression {
        let location = left.location;
        self.node(
            ExpressionKind::Math {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        // The token stream always ends with Eof and `advance` never moves past it.
        &self.tokens[self.position]
    }

    fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    fn expect_token(&mut self, token: &Token, message: &str) -> ParseResult<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    fn expect_semicolon(&mut self, after: &str) -> ParseResult<()> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' after {}", after),
        )
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::semantic::errors::CompileErrorKind;

    fn parse(source: &str) -> Result<GlobalScope> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_parse_simple_function() {
        let globals = parse("func add(a: int, b: *i32): i32 { return a; }").unwrap();

        let function = &globals.functions["add"];
        assert_eq!(function.params.len(), 2);
        assert!(!function.params[0].reference);
        assert!(function.params[1].reference);
        assert_eq!(
            function.return_type,
            Some(VariableType::Unknown("i32".to_string()))
        );
        assert_eq!(function.body.len(), 1);
    }

    #[test]
    fn test_func_keyword_is_optional() {
        let globals = parse("main() { x: i32 = 1; var y: [i32]; }").unwrap();
        let body = &globals.functions["main"].body;
        assert!(matches!(body[0], Statement::VariableDefinition { is_const: false, .. }));
        match &body[1] {
            Statement::VariableDeclaration { var_type, .. } => assert_eq!(
                *var_type,
                VariableType::Array(Box::new(VariableType::Unknown("i32".to_string())))
            ),
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_struct_and_enum() {
        let source = "
            enum Color { Red, Green, }
            struct Pixel { x: i32 = 3, color: Color = Color.Red, tags: [string] }
        ";
        let globals = parse(source).unwrap();

        let pixel = &globals.structs["Pixel"];
        assert_eq!(pixel.members.len(), 3);
        assert!(pixel.members[0].default.is_some());
        assert!(pixel.members[2].default.is_none());
        assert_eq!(globals.enums["Color"].entries, vec!["Red", "Green"]);
    }

    #[test]
    fn test_negative_literal_is_constant() {
        let globals = parse("main() { x: i32 = -5; }").unwrap();
        match &globals.functions["main"].body[0] {
            Statement::VariableDefinition { value, .. } => {
                assert_eq!(value.kind, ExpressionKind::Constant(Literal::Integer(-5)));
            }
            other => panic!("Expected definition, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let globals = parse("main() { x: i32 = 1 + 2 * 3; }").unwrap();
        match &globals.functions["main"].body[0] {
            Statement::VariableDefinition { value, .. } => match &value.kind {
                ExpressionKind::Math { op, right, .. } => {
                    assert_eq!(*op, MathOperator::Add);
                    assert!(matches!(
                        right.kind,
                        ExpressionKind::Math { op: MathOperator::Multiply, .. }
                    ));
                }
                other => panic!("Expected math, got {:?}", other),
            },
            other => panic!("Expected definition, got {:?}", other),
        }
    }

    #[test]
    fn test_access_chain_with_method() {
        let globals = parse("main() { s.items[0].name.append(5); }").unwrap();
        match &globals.functions["main"].body[0] {
            Statement::MethodCall { access, .. } => match &access.kind {
                ExpressionKind::VariableAccess(access) => {
                    assert_eq!(access.name, "s");
                    assert_eq!(access.accessors.len(), 3);
                    assert_eq!(access.method.as_ref().map(|m| m.name.as_str()), Some("append"));
                }
                other => panic!("Expected access, got {:?}", other),
            },
            other => panic!("Expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_if_elif_else() {
        let source = "main() { if (true) { } elif (false) { } elif (true) { } else { } }";
        let globals = parse(source).unwrap();
        match &globals.functions["main"].body[0] {
            Statement::If { elifs, else_body, .. } => {
                assert_eq!(elifs.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_node_ids_are_unique() {
        let globals = parse("main() { x: i32 = 1 + 2; y: i32 = x * 3; }").unwrap();
        let mut ids = Vec::new();
        for statement in &globals.functions["main"].body {
            if let Statement::VariableDefinition { id, value, .. } = statement {
                ids.push(*id);
                ids.push(value.id);
            }
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("main() { x: i32 = 1 }").unwrap_err();
        match err {
            Error::Parse(e) => assert!(e.message.starts_with("Expected ';'")),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_bracket() {
        assert!(matches!(parse("main() { loop { }"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_const_requires_value() {
        assert!(matches!(parse("main() { const x: i32; }"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(matches!(parse("main() { f() = 3; }"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_duplicate_definitions() {
        let err = parse("f() {} f() {}").unwrap_err();
        assert!(matches!(
            err,
            Error::Compile(ref e) if e.kind == CompileErrorKind::DuplicateDefinition
        ));

        assert!(parse("struct A { x: i32 } struct A { y: i32 }").is_err());
        assert!(parse("enum E { A, B, A }").is_err());
        assert!(parse("enum E { A } enum E { B }").is_err());
        assert!(parse("struct A { x: i32, x: u8 }").is_err());
    }
}
