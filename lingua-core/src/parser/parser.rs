use std::{collections::HashMap, rc::Rc};

use crate::{
    lexer::prelude::{Spanned, Token},
    resolver::prelude::{Operator, ResolutionError, Resolver},
    utils::prelude::{Event, EventEmitter, Position, SrcSpan},
};
use super::ast::{Block, FuncDef, Identifier, Node, NodeKind, Number};
use super::error::{ParseError, ParseErrorType};

/// Parentheses, prefix operators and function bodies nested deeper than this
/// are rejected instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

pub struct Parser<'r, T: Iterator<Item = Spanned>> {
    pub current_token: Spanned,
    pub next_token: Option<Spanned>,

    tokens: T,
    resolver: &'r dyn Resolver,
    events: EventEmitter,
    // answers keyed by the byte offset of the word, one resolver call per token
    resolutions: HashMap<u32, Result<Operator, ResolutionError>>,
    depth: usize,
}

impl<'r, T: Iterator<Item = Spanned>> Parser<'r, T> {
    pub fn new(mut tokens: T, resolver: &'r dyn Resolver, events: EventEmitter) -> Self {
        let start = Position::default();
        let current_token = tokens.next()
            .unwrap_or((start, Token::Eof, start.next_column()));
        let next_token = tokens.next();

        Self {
            current_token,
            next_token,

            tokens,
            resolver,
            events,
            resolutions: HashMap::new(),
            depth: 0,
        }
    }

    /// Moves to the next token and returns the one stepped over. Once the
    /// stream is exhausted the parser stays on an end-of-input token.
    pub fn step(&mut self) -> Spanned {
        let next = match self.next_token.take() {
            Some(next) => {
                self.next_token = self.tokens.next();
                next
            },
            None if self.current_token.1 == Token::Eof => self.current_token.clone(),
            None => {
                let end = self.current_token.2;
                (end, Token::Eof, end.next_column())
            }
        };

        std::mem::replace(&mut self.current_token, next)
    }

    pub fn current(&self) -> &Token {
        &self.current_token.1
    }

    pub fn current_span(&self) -> SrcSpan {
        SrcSpan::from(self.current_token.0, self.current_token.2)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.next_token.as_ref().map(|(_, token, _)| token)
    }

    pub fn skip_newlines(&mut self) -> usize {
        let mut count = 0;

        while *self.current() == Token::Newline {
            self.step();
            count += 1;
        }

        count
    }

    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let block = self.parse_statements()?;

        match self.current() {
            Token::Eof => {
                let location = block.location;
                Ok(Node::new(NodeKind::Block(block), location))
            },
            token => parse_error(
                ParseErrorType::UnexpectedToken { token: token.clone() },
                self.current_span()
            ),
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<SrcSpan, ParseError> {
        if *self.current() == token {
            let (start, _, end) = self.step();
            return Ok(SrcSpan::from(start, end));
        }

        parse_error(ParseErrorType::Expected { token }, self.current_span())
    }

    pub fn expect_ident(&mut self, error: ParseErrorType) -> Result<Identifier, ParseError> {
        match self.current_token.clone() {
            (start, Token::Ident(value), end) => {
                self.step();
                Ok(Identifier { value, location: SrcSpan::from(start, end) })
            },
            _ => parse_error(error, self.current_span())
        }
    }

    /// Runs `parse` one nesting level deeper. `location` is blamed when the
    /// limit is hit.
    fn nested<N>(
        &mut self,
        location: SrcSpan,
        parse: impl FnOnce(&mut Self) -> Result<N, ParseError>
    ) -> Result<N, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return parse_error(ParseErrorType::NestingLimit { limit: MAX_NESTING_DEPTH }, location);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;

        result
    }

    pub fn parse_statements(&mut self) -> Result<Block, ParseError> {
        self.skip_newlines();

        let start = self.current_token.0;
        let mut statements = vec![];

        while self.can_start_statement() {
            statements.push(self.parse_statement()?);

            if self.skip_newlines() == 0 {
                break;
            }
        }

        let location = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.location.merge(last.location),
            _ => SrcSpan::from(start, start),
        };

        Ok(Block { statements, location })
    }

    fn can_start_statement(&self) -> bool {
        matches!(
            self.current(),
            Token::Create
                | Token::Find
                | Token::Int(_)
                | Token::Float(_)
                | Token::Ident(_)
                | Token::Plus
                | Token::Minus
                | Token::LParen
        )
    }

    pub fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.current() {
            Token::Create => self.parse_create(),
            Token::Find => self.parse_call(),
            _ => self.parse_expression(),
        }
    }

    // create <name> as <expression>
    // create <name> taking <param>* do <statements> end
    fn parse_create(&mut self) -> Result<Node, ParseError> {
        let (start, _, _) = self.step();
        let name = self.expect_ident(ParseErrorType::ExpectedIdent)?;

        match self.current() {
            Token::As => {
                self.step();

                let value = self.parse_expression()?;
                let location = SrcSpan::from(start, value.location.end);

                Ok(Node::new(
                    NodeKind::VarAssign { name, value: Box::new(value) },
                    location
                ))
            },
            Token::Taking => {
                self.step();

                let mut params = vec![];

                while matches!(self.current(), Token::Ident(_)) {
                    params.push(self.expect_ident(ParseErrorType::ExpectedIdent)?);
                }

                let body_start = self.expect_one(Token::Do)?;
                let body = self.nested(body_start, Self::parse_statements)?;
                let end = self.expect_one(Token::End)?;

                let def = FuncDef {
                    name,
                    params,
                    body: Rc::new(body),
                };

                Ok(Node::new(NodeKind::FuncDef(Rc::new(def)), SrcSpan::from(start, end.end)))
            },
            _ => parse_error(ParseErrorType::ExpectedAsOrTaking, self.current_span())
        }
    }

    // find <name> <factor>*
    fn parse_call(&mut self) -> Result<Node, ParseError> {
        let (start, _, _) = self.step();
        let callee = self.expect_ident(ParseErrorType::ExpectedFunctionName)?;

        let mut end = callee.location.end;
        let mut args = vec![];

        while !matches!(self.current(), Token::Newline | Token::Eof | Token::RSBracket)
            && !self.current().is_keyword()
        {
            let arg = self.parse_factor()?;
            end = arg.location.end;
            args.push(arg);
        }

        Ok(Node::new(NodeKind::Call { callee, args }, SrcSpan::from(start, end)))
    }

    /// Entry point for statement expressions, assignment values and
    /// parenthesised expressions. A list or natural phrasing that opens the
    /// expression is the whole expression; anywhere else it is a factor.
    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        if let Token::Ident(_) = self.current() {
            match self.peek() {
                Some(Token::These) => return self.parse_list_form(),
                Some(Token::Of) => return self.parse_natural_form(),
                _ => {}
            }
        }

        self.parse_tier(Precedence::Sum)
    }

    fn parse_tier(&mut self, precedence: Precedence) -> Result<Node, ParseError> {
        if precedence == Precedence::Prefix {
            return self.parse_factor();
        }

        let mut left = self.parse_tier(precedence.next())?;

        loop {
            let operator = match self.peek_operator() {
                Some(operator) if precedence.accepts(operator) => operator,
                _ => break,
            };

            self.step();

            let right = self.parse_tier(precedence.next())?;
            let location = left.location.merge(right.location);

            left = Node::new(
                NodeKind::BinaryOp {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
                location
            );
        }

        Ok(left)
    }

    /// The operator the current token stands for, without consuming it.
    /// Words are put to the resolver; a refusal means "not an operator".
    fn peek_operator(&mut self) -> Option<Operator> {
        let (start, token, end) = self.current_token.clone();

        match token {
            Token::Ident(word) => self.resolve(&word, SrcSpan::from(start, end)).ok(),
            token => Operator::from_token(&token),
        }
    }

    fn resolve(&mut self, word: &str, location: SrcSpan) -> Result<Operator, ResolutionError> {
        if let Some(answer) = self.resolutions.get(&location.start.index) {
            return answer.clone();
        }

        let answer = self.resolver.resolve(word);

        self.events.emit(match &answer {
            Ok(operator) => Event::Resolved {
                word: word.to_string(),
                operator: *operator,
                location,
            },
            Err(err) => Event::Rejected {
                word: word.to_string(),
                reason: err.reason.clone(),
                location,
            },
        });

        self.resolutions.insert(location.start.index, answer.clone());

        answer
    }

    pub fn parse_factor(&mut self) -> Result<Node, ParseError> {
        let (start, token, end) = self.current_token.clone();
        let location = SrcSpan::from(start, end);

        match token {
            Token::Plus | Token::Minus => {
                self.step();

                let operator = match token {
                    Token::Minus => Operator::Subtract,
                    _ => Operator::Add,
                };
                let operand = self.nested(location, Self::parse_factor)?;
                let location = location.merge(operand.location);

                Ok(Node::new(
                    NodeKind::UnaryOp { operator, operand: Box::new(operand) },
                    location
                ))
            },
            Token::Int(_) | Token::Float(_) => self.parse_number(),
            Token::Ident(value) => match self.peek() {
                Some(Token::These) => self.parse_list_form(),
                Some(Token::Of) => self.parse_natural_form(),
                _ => {
                    self.step();
                    Ok(Node::new(NodeKind::VarAccess(Identifier { value, location }), location))
                }
            },
            Token::LParen => {
                self.step();

                let expression = self.nested(location, Self::parse_expression)?;
                self.expect_one(Token::RParen)?;

                Ok(expression)
            },
            _ => parse_error(ParseErrorType::ExpectedFactor, location)
        }
    }

    fn parse_number(&mut self) -> Result<Node, ParseError> {
        let (start, token, end) = self.current_token.clone();
        let location = SrcSpan::from(start, end);

        let number = match token {
            Token::Int(value) => Number::Int(value),
            Token::Float(value) => Number::Float(value),
            _ => return parse_error(ParseErrorType::ExpectedNumber, location),
        };

        self.step();

        Ok(Node::new(NodeKind::Number(number), location))
    }

    /// Resolves the current word and consumes it. A refusal is a syntax error
    /// carrying the resolver's reason.
    fn resolve_eagerly(&mut self) -> Result<(Operator, SrcSpan), ParseError> {
        let location = self.current_span();

        let word = match self.current() {
            Token::Ident(word) => word.clone(),
            _ => return parse_error(ParseErrorType::ExpectedIdent, location),
        };

        match self.resolve(&word, location) {
            Ok(operator) => {
                self.step();
                Ok((operator, location))
            },
            Err(err) => parse_error(
                ParseErrorType::Unresolved { word, reason: err.reason },
                location
            ),
        }
    }

    // <word> these numbers : [ <number> {, <number>} [,] ]
    fn parse_list_form(&mut self) -> Result<Node, ParseError> {
        let (operator, word_location) = self.resolve_eagerly()?;

        self.expect_one(Token::These)?;
        self.expect_one(Token::Numbers)?;
        self.expect_one(Token::Colon)?;
        self.expect_one(Token::LSBracket)?;

        let mut operands = vec![];

        while self.current().is_number() {
            operands.push(self.parse_number()?);

            if *self.current() != Token::Comma {
                break;
            }

            self.step();
        }

        let end = self.expect_one(Token::RSBracket)?;

        Ok(Node::new(
            NodeKind::ListOp { operator, operands },
            word_location.merge(end)
        ))
    }

    // <word> of <number> and <number>
    fn parse_natural_form(&mut self) -> Result<Node, ParseError> {
        let (operator, word_location) = self.resolve_eagerly()?;

        self.expect_one(Token::Of)?;
        let left = self.parse_number()?;
        self.expect_one(Token::And)?;
        let right = self.parse_number()?;

        let location = word_location.merge(right.location);

        Ok(Node::new(
            NodeKind::BinaryOp {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            location
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Sum,
    Product,
    Prefix
}

impl Precedence {
    pub fn next(&self) -> Self {
        match self {
            Self::Sum => Self::Product,
            Self::Product | Self::Prefix => Self::Prefix,
        }
    }

    pub fn accepts(&self, operator: Operator) -> bool {
        match self {
            Self::Sum => operator.is_additive(),
            Self::Product => operator.is_multiplicative(),
            Self::Prefix => false,
        }
    }
}

/// Parses a whole program. The result is a `Block` node.
pub fn parse_tokens(
    tokens: Vec<Spanned>,
    resolver: &dyn Resolver,
    events: EventEmitter
) -> Result<Node, ParseError> {
    let mut parser = Parser::new(tokens.into_iter(), resolver, events);

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
