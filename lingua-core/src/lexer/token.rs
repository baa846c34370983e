#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <letter>{<letter>|<digit>|_}, case preserved
    Ident(String),
    Int(i64),
    Float(f64),

    // Structural keywords, matched case-insensitively
    Create,
    As,
    Find,
    Taking,
    Do,
    End,
    Of,
    And,
    These,
    Numbers,

    // Symbolic operators
    Plus,
    Minus,
    Star,
    Slash,

    LParen,
    RParen,
    LSBracket,
    RSBracket,
    Comma,
    Colon,

    // `\n` or `;`
    Newline,

    Eof,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Create
                | Token::As
                | Token::Find
                | Token::Taking
                | Token::Do
                | Token::End
                | Token::Of
                | Token::And
                | Token::These
                | Token::Numbers
        )
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Int(_) | Token::Float(_))
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => format!("{value}"),
            Token::Float(value) => format!("{value:?}"),

            Token::Create => "create".to_string(),
            Token::As => "as".to_string(),
            Token::Find => "find".to_string(),
            Token::Taking => "taking".to_string(),
            Token::Do => "do".to_string(),
            Token::End => "end".to_string(),
            Token::Of => "of".to_string(),
            Token::And => "and".to_string(),
            Token::These => "these".to_string(),
            Token::Numbers => "numbers".to_string(),

            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),

            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LSBracket => "[".to_string(),
            Token::RSBracket => "]".to_string(),
            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),

            Token::Newline => "\n".to_string(),
            Token::Eof => "\0".to_string(),
        }
    }
}

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word.to_lowercase().as_str() {
        "create" => Token::Create,
        "as" => Token::As,
        "find" => Token::Find,
        "taking" => Token::Taking,
        "do" => Token::Do,
        "end" => Token::End,
        "of" => Token::Of,
        "and" => Token::And,
        "these" => Token::These,
        "numbers" => Token::Numbers,

        _ => return None,
    })
}
