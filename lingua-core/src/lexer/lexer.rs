use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token};
use crate::utils::prelude::{Position, SrcSpan};
use std::fmt::Display;

pub type Spanned = (Position, Token, Position);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = char>> {
	position: Position,
	ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = char>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tch: {:?}\n}}",
			self.position, self.ch
		)
	}
}

impl<T: Iterator<Item = char>> Lexer<T> {
	pub fn new(mut input: T) -> Self {
		let ch = input.next();

		Self {
			position: Position::default(),
			ch,
			input,
			finished: false,
		}
	}

	pub fn next_token(&mut self) -> LexResult {
		while matches!(self.ch, Some(' ' | '\t' | '\r')) {
			self.next_char();
		}

		let spanned = match self.ch {
			Some(ch) => match ch {
				// Separators stay on the line they end
				'\n' | ';' => {
					let start = self.position;
					self.next_char();

					(start, Token::Newline, start.next_column())
				},
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Star),
				'/' => self.eat_one_char(Token::Slash),
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'[' => self.eat_one_char(Token::LSBracket),
				']' => self.eat_one_char(Token::RSBracket),
				',' => self.eat_one_char(Token::Comma),
				':' => self.eat_one_char(Token::Colon),
				'a'..='z' | 'A'..='Z' => self.lex_ident(),
				'0'..='9' => return self.lex_number(),
				tok => {
					let start = self.position;
					self.next_char();

					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok },
						location: SrcSpan::from(start, self.position),
					});
				}
			},
			None => (self.position, Token::Eof, self.position.next_column()),
		};

		Ok(spanned)
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		if let Some(ch) = ch {
			self.position.advance(ch);
			self.ch = self.input.next();
		}

		ch
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start = self.position;
		self.next_char();

		(start, token, self.position)
	}

	fn lex_ident(&mut self) -> Spanned {
		let start = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			ident.push(ch);
			self.next_char();
		}

		let token = str_to_keyword(&ident).unwrap_or(Token::Ident(ident));

		(start, token, self.position)
	}

	fn lex_number(&mut self) -> LexResult {
		let start = self.position;
		let mut value = String::new();
		let mut has_period = false;

		while let Some(ch) = self.ch {
			match ch {
				'0'..='9' => value.push(ch),
				// A second period ends the numeral rather than failing it
				'.' if !has_period => {
					has_period = true;
					value.push(ch);
				},
				_ => break,
			}

			self.next_char();
		}

		let end = self.position;

		let token = if has_period {
			match value.parse::<f64>() {
				Ok(value) => Token::Float(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location: SrcSpan::from(start, end),
				}),
			}
		} else {
			match value.parse::<i64>() {
				Ok(value) => Token::Int(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location: SrcSpan::from(start, end),
				}),
			}
		};

		Ok((start, token, end))
	}
}

impl<T: Iterator<Item = char>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}

/// Lexes the whole input. The first lexical error discards every token.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, LexicalError> {
	tokenize_stream(src.chars())
}

pub fn tokenize_stream(stream: impl Iterator<Item = char>) -> Result<Vec<Spanned>, LexicalError> {
	Lexer::new(stream).collect()
}
