//! Expression syntax tree and a hand-written recursive-descent parser.
//!
//! Operator precedence, loosest first:
//! ```text
//! lambda
//! x if c else y
//! or
//! and
//! not
//! <  <=  >  >=  ==  !=        (chainable)
//! +  -
//! *  /  //  %
//! +x  -x
//! **                          (right-associative)
//! f(..)  x.attr  x[i]
//! ```

use std::{ ops::Range, sync::Arc };
use crate::{
    error::{ ExprError, ExprResult },
    lexer::{ Token, tokenize },
};

/// Binary arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }
}

/// Comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

/// Unary operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Pos,
    Not,
}

/// Parameter list and body of a `lambda`.
#[derive(Clone, Debug, PartialEq)]
pub struct LambdaDef {
    pub params: Vec<String>,
    pub body: Expr,
}

/// Expression syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Bool(bool),
    Str(String),
    None,
    Name(String),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Attr(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// `first op1 e1 op2 e2 ...`, evaluated pairwise and short-circuiting.
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    IfElse { cond: Box<Expr>, then: Box<Expr>, otherwise: Box<Expr> },
    Lambda(Arc<LambdaDef>),
}

/// Maximum nesting depth accepted by [`parse`]; one level of brackets uses
/// two.
pub const MAX_NESTING: usize = 200;

/// Parse a complete expression. A top-level comma-separated list is read as a
/// tuple, so `-a, a` and `(-a, a)` are equivalent.
pub fn parse(src: &str) -> ExprResult<Expr> {
    let tokens = tokenize(src)?;
    let mut stream = TokenStream::new(&tokens);
    let expr = stream.tuple_or_expr()?;
    match stream.peek() {
        None => Ok(expr),
        Some(_) => Err(stream.unexpected("end of expression")),
    }
}

/// Token stream with lookahead for the recursive-descent parser.
struct TokenStream<'t> {
    tokens: &'t [(Token, Range<usize>)],
    pos: usize,
    depth: usize,
}

impl<'t> TokenStream<'t> {
    fn new(tokens: &'t [(Token, Range<usize>)]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let tok = self.peek();
        if tok.is_some() { self.pos += 1; }
        tok
    }

    /// Consume the current token if it equals `expected`.
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &'static str)
        -> ExprResult<()>
    {
        self.eat(expected).then_some(()).ok_or_else(|| self.unexpected(what))
    }

    // nesting levels are released only on success; any error ends the parse
    fn descend(&mut self) -> ExprResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        Ok(())
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        match self.tokens.get(self.pos) {
            Some((tok, span)) => ExprError::Syntax {
                expected,
                found: tok.to_string(),
                span: span.clone(),
            },
            None => ExprError::Eof(expected),
        }
    }

    fn ident(&mut self, what: &'static str) -> ExprResult<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            },
            _ => Err(self.unexpected(what)),
        }
    }

    fn tuple_or_expr(&mut self) -> ExprResult<Expr> {
        let first = self.expr()?;
        if self.peek() != Some(&Token::Comma) { return Ok(first); }
        let mut items = vec![first];
        while self.eat(&Token::Comma) {
            if self.starts_expr() {
                items.push(self.expr()?);
            } else {
                break;
            }
        }
        Ok(Expr::Tuple(items))
    }

    fn starts_expr(&self) -> bool {
        !matches!(
            self.peek(),
            None
            | Some(Token::RParen)
            | Some(Token::RBracket)
            | Some(Token::Comma)
            | Some(Token::Colon)
        )
    }

    fn expr(&mut self) -> ExprResult<Expr> {
        self.descend()?;
        let expr
            = if self.eat(&Token::Lambda) {
                self.lambda()?
            } else {
                self.conditional()?
            };
        self.depth -= 1;
        Ok(expr)
    }

    fn conditional(&mut self) -> ExprResult<Expr> {
        let expr = self.or_expr()?;
        if self.eat(&Token::If) {
            let cond = self.or_expr()?;
            self.expect(&Token::Else, "'else'")?;
            let otherwise = self.expr()?;
            Ok(Expr::IfElse {
                cond: Box::new(cond),
                then: Box::new(expr),
                otherwise: Box::new(otherwise),
            })
        } else {
            Ok(expr)
        }
    }

    fn lambda(&mut self) -> ExprResult<Expr> {
        let mut params: Vec<String> = Vec::new();
        if self.peek() != Some(&Token::Colon) {
            params.push(self.ident("lambda parameter")?);
            while self.eat(&Token::Comma) {
                params.push(self.ident("lambda parameter")?);
            }
        }
        self.expect(&Token::Colon, "':'")?;
        let body = self.expr()?;
        Ok(Expr::Lambda(Arc::new(LambdaDef { params, body })))
    }

    fn or_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::Or) {
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.not_expr()?;
        while self.eat(&Token::And) {
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> ExprResult<Expr> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let operand = self.not_expr()?;
            self.depth -= 1;
            Ok(Expr::Unary(UnOp::Not, Box::new(operand)))
        } else {
            self.comparison()
        }
    }

    fn cmp_op(&self) -> Option<CmpOp> {
        match self.peek()? {
            Token::Lt => Some(CmpOp::Lt),
            Token::Le => Some(CmpOp::Le),
            Token::Gt => Some(CmpOp::Gt),
            Token::Ge => Some(CmpOp::Ge),
            Token::EqEq => Some(CmpOp::Eq),
            Token::Ne => Some(CmpOp::Ne),
            _ => None,
        }
    }

    fn comparison(&mut self) -> ExprResult<Expr> {
        let first = self.arith()?;
        let mut rest: Vec<(CmpOp, Expr)> = Vec::new();
        while let Some(op) = self.cmp_op() {
            self.pos += 1;
            rest.push((op, self.arith()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), rest))
        }
    }

    fn arith(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::SlashSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> ExprResult<Expr> {
        self.descend()?;
        let op = match self.peek() {
            Some(Token::Minus) => Some(UnOp::Neg),
            Some(Token::Plus) => Some(UnOp::Pos),
            _ => None,
        };
        let expr
            = if let Some(op) = op {
                self.pos += 1;
                Expr::Unary(op, Box::new(self.factor()?))
            } else {
                self.power()?
            };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> ExprResult<Expr> {
        let base = self.postfix()?;
        if self.eat(&Token::StarStar) {
            let exp = self.factor()?;
            Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exp)))
        } else {
            Ok(base)
        }
    }

    fn postfix(&mut self) -> ExprResult<Expr> {
        let mut expr = self.atom()?;
        loop {
            if self.eat(&Token::Dot) {
                let attr = self.ident("attribute name")?;
                expr = Expr::Attr(Box::new(expr), attr);
            } else if self.eat(&Token::LParen) {
                let args = self.sequence(&Token::RParen, "')'")?;
                expr = Expr::Call(Box::new(expr), args);
            } else if self.eat(&Token::LBracket) {
                let index = self.tuple_or_expr()?;
                self.expect(&Token::RBracket, "']'")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    // comma-separated expressions up to `close`, allowing a trailing comma;
    // also returns whether any comma was seen
    fn sequence_inner(&mut self, close: &Token, what: &'static str)
        -> ExprResult<(Vec<Expr>, bool)>
    {
        let mut items: Vec<Expr> = Vec::new();
        let mut comma = false;
        while !self.eat(close) {
            items.push(self.expr()?);
            if self.eat(&Token::Comma) {
                comma = true;
            } else {
                self.expect(close, what)?;
                break;
            }
        }
        Ok((items, comma))
    }

    fn sequence(&mut self, close: &Token, what: &'static str)
        -> ExprResult<Vec<Expr>>
    {
        self.sequence_inner(close, what).map(|(items, _)| items)
    }

    fn atom(&mut self) -> ExprResult<Expr> {
        let Some(tok) = self.advance() else {
            return Err(ExprError::Eof("an operand"));
        };
        match tok {
            Token::Number(x) => Ok(Expr::Num(*x)),
            Token::Str(s) => Ok(Expr::Str(s.clone())),
            Token::Ident(name) => Ok(Expr::Name(name.clone())),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::None => Ok(Expr::None),
            Token::LParen => {
                let (mut items, comma)
                    = self.sequence_inner(&Token::RParen, "')'")?;
                if items.len() == 1 && !comma {
                    Ok(items.swap_remove(0))
                } else {
                    Ok(Expr::Tuple(items))
                }
            },
            Token::LBracket => {
                let items = self.sequence(&Token::RBracket, "']'")?;
                Ok(Expr::List(items))
            },
            _ => {
                self.pos -= 1;
                Err(self.unexpected("an operand"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(x: f64) -> Box<Expr> { Box::new(Expr::Num(x)) }

    fn name(s: &str) -> Box<Expr> { Box::new(Expr::Name(s.to_string())) }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::Binary(
                BinOp::Add,
                num(1.0),
                Box::new(Expr::Binary(BinOp::Mul, num(2.0), num(3.0))),
            ),
        );
    }

    #[test]
    fn power_binds_tighter_than_negation() {
        assert_eq!(
            parse("-x**2").unwrap(),
            Expr::Unary(
                UnOp::Neg,
                Box::new(Expr::Binary(BinOp::Pow, name("x"), num(2.0))),
            ),
        );
        assert_eq!(
            parse("2**-1").unwrap(),
            Expr::Binary(
                BinOp::Pow,
                num(2.0),
                Box::new(Expr::Unary(UnOp::Neg, num(1.0))),
            ),
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            parse("2**3**2").unwrap(),
            Expr::Binary(
                BinOp::Pow,
                num(2.0),
                Box::new(Expr::Binary(BinOp::Pow, num(3.0), num(2.0))),
            ),
        );
    }

    #[test]
    fn bare_and_parenthesized_tuples() {
        let bare = parse("-a, a").unwrap();
        let paren = parse("(-a, a)").unwrap();
        assert_eq!(bare, paren);
        assert_eq!(parse("(a,)").unwrap(), Expr::Tuple(vec![Expr::Name("a".to_string())]));
        assert_eq!(parse("(a)").unwrap(), Expr::Name("a".to_string()));
        assert_eq!(parse("()").unwrap(), Expr::Tuple(Vec::new()));
    }

    #[test]
    fn lambda_with_conditional() {
        let expr = parse("lambda x: v0 if x % l < w else 0.").unwrap();
        let Expr::Lambda(def) = expr else { panic!("expected a lambda") };
        assert_eq!(def.params, vec!["x".to_string()]);
        assert!(matches!(def.body, Expr::IfElse { .. }));
    }

    #[test]
    fn chained_comparison() {
        let expr = parse("a < x <= b").unwrap();
        let Expr::Compare(first, rest) = expr else { panic!("expected a comparison") };
        assert_eq!(*first, Expr::Name("a".to_string()));
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].0, CmpOp::Lt);
        assert_eq!(rest[1].0, CmpOp::Le);
    }

    #[test]
    fn postfix_chain() {
        assert_eq!(
            parse("numpy.sqrt(x)[0]").unwrap(),
            Expr::Index(
                Box::new(Expr::Call(
                    Box::new(Expr::Attr(name("numpy"), "sqrt".to_string())),
                    vec![Expr::Name("x".to_string())],
                )),
                num(0.0),
            ),
        );
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(parse("1 +"), Err(ExprError::Eof(_))));
        assert!(matches!(parse("(1, 2"), Err(ExprError::Eof(_))));
        assert!(matches!(parse("1 2"), Err(ExprError::Syntax { .. })));
        assert!(matches!(parse("x if y"), Err(ExprError::Eof(_))));
        assert!(matches!(parse("lambda 1: 2"), Err(ExprError::Syntax { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let shallow = format!("{}1.{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse(&shallow).unwrap(), Expr::Num(1.0));

        let deep = format!("{}1.{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(parse(&deep), Err(ExprError::TooDeep(MAX_NESTING))));

        let unary = format!("{}1.", "-".repeat(1000));
        assert!(matches!(parse(&unary), Err(ExprError::TooDeep(_))));

        let not = format!("{}x", "not ".repeat(1000));
        assert!(matches!(parse(&not), Err(ExprError::TooDeep(_))));

        let power = vec!["2"; 1000].join("**");
        assert!(matches!(parse(&power), Err(ExprError::TooDeep(_))));

        let list = format!("{}1{}", "[".repeat(500), "]".repeat(500));
        assert!(matches!(parse(&list), Err(ExprError::TooDeep(_))));
    }
}
