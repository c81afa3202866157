//! Tokenization of parameter, domain, and value expressions.
//!
//! ```
//! use xpotential::lexer::{ Token, tokenize };
//!
//! let tokens: Vec<Token>
//!     = tokenize("lambda x: v0 * x**2").unwrap()
//!     .into_iter()
//!     .map(|(tok, _)| tok)
//!     .collect();
//! assert_eq!(tokens[0], Token::Lambda);
//! assert_eq!(tokens[1], Token::Ident("x".to_string()));
//! assert_eq!(tokens[6], Token::StarStar);
//! ```

use std::{ fmt, ops::Range };
use logos::Logos;
use crate::error::{ ExprError, ExprResult };

/// Expression token.
#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // keywords
    #[token("lambda")]
    Lambda,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,

    // literals
    /// Numeric literal; all numbers are read as `f64`.
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    /// Single- or double-quoted string literal, quotes removed.
    #[regex(r#""[^"\n]*"|'[^'\n]*'"#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Str(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("//")]
    SlashSlash,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,

    // delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Ident(name) => write!(f, "{name}"),
            tok => {
                let s = match tok {
                    Self::Lambda => "lambda",
                    Self::If => "if",
                    Self::Else => "else",
                    Self::And => "and",
                    Self::Or => "or",
                    Self::Not => "not",
                    Self::True => "True",
                    Self::False => "False",
                    Self::None => "None",
                    Self::Plus => "+",
                    Self::Minus => "-",
                    Self::Star => "*",
                    Self::StarStar => "**",
                    Self::Slash => "/",
                    Self::SlashSlash => "//",
                    Self::Percent => "%",
                    Self::Lt => "<",
                    Self::Le => "<=",
                    Self::Gt => ">",
                    Self::Ge => ">=",
                    Self::EqEq => "==",
                    Self::Ne => "!=",
                    Self::LParen => "(",
                    Self::RParen => ")",
                    Self::LBracket => "[",
                    Self::RBracket => "]",
                    Self::Comma => ",",
                    Self::Colon => ":",
                    Self::Dot => ".",
                    Self::Number(_) | Self::Str(_) | Self::Ident(_)
                        => unreachable!(),
                };
                f.write_str(s)
            },
        }
    }
}

/// Split `src` into tokens paired with their byte spans.
pub fn tokenize(src: &str) -> ExprResult<Vec<(Token, Range<usize>)>> {
    Token::lexer(src).spanned()
        .map(|(tok, span)| {
            tok.map(|tok| (tok, span.clone()))
                .map_err(|_| ExprError::Lex { text: src[span.clone()].to_string(), span })
        })
        .collect()
}
