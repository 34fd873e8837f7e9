//! Recursive-descent parser producing a binary expression AST.
//!
//! One function per grammar level, loosest binding first:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := primary ('^' factor)?
//! primary:= NUMBER | '(' expr ')'
//! ```
//!
//! The additive and multiplicative levels are left-associative loops; `^`
//! is right-associative via the recursive call in `parse_factor`. Parsing
//! consumes a prefix of the token stream – tokens left over after a
//! structurally complete expression are not rejected.

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, token_text};

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Pow,
}

/// Literal payload carried by a leaf. Code generation is integer-only, so
/// `Float` values keep their fraction here but lose it at push time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
  Int(i64),
  Float(f64),
}

impl NumberValue {
  /// Integer view of the literal, truncating any fractional part.
  pub fn truncated(&self) -> i64 {
    match self {
      Self::Int(value) => *value,
      Self::Float(value) => *value as i64,
    }
  }
}

/// Expression tree produced by the parser. Leaves are always `Number`;
/// every internal node owns exactly two children.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
  Number {
    value: NumberValue,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: NumberValue) -> Self {
    Self::Number { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Parse an expression from the token stream. Returns the root node or the
/// first syntax error; no partial tree survives a failure.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);
  parse_expr(&mut stream)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_term(stream)?;

  loop {
    let op = match stream.peek_symbol() {
      Some("+") => BinaryOp::Add,
      Some("-") => BinaryOp::Sub,
      _ => break,
    };

    stream.advance();
    let rhs = parse_term(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_term(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_factor(stream)?;

  loop {
    let op = match stream.peek_symbol() {
      Some("*") => BinaryOp::Mul,
      Some("/") => BinaryOp::Div,
      _ => break,
    };

    stream.advance();
    let rhs = parse_factor(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_factor(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let node = parse_primary(stream)?;

  if stream.equal("^") {
    // Recursing at the same level makes `^` right-associative.
    let rhs = parse_factor(stream)?;
    return Ok(AstNode::binary(BinaryOp::Pow, node, rhs));
  }

  Ok(node)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    if stream.equal(")") {
      return Ok(node);
    }
    let loc = stream
      .peek()
      .map(|token| token.loc)
      .unwrap_or(stream.source.len());
    return Err(CompileError::at(
      stream.source,
      loc,
      "expected closing parenthesis",
    ));
  }

  let Some(token) = stream.peek() else {
    return Err(CompileError::at(
      stream.source,
      stream.source.len(),
      "unexpected end of expression",
    ));
  };

  if token.kind != TokenKind::Number {
    let got = token_text(token, stream.source);
    let loc = token.loc;
    return Err(CompileError::at(
      stream.source,
      loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  stream.get_number().map(AstNode::number)
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Source text of the current token, unless it is a numeric literal.
  fn peek_symbol(&self) -> Option<&'a str> {
    self
      .peek()
      .filter(|token| token.kind != TokenKind::Number)
      .map(|token| token_text(token, self.source))
  }

  fn advance(&mut self) {
    self.pos += 1;
  }

  /// Consume the current token if its source text matches `symbol`.
  fn equal(&mut self, symbol: &str) -> bool {
    if self.peek_symbol() == Some(symbol) {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Parse the current token as a numeric literal returning its value.
  /// Text containing a dot becomes a `Float`, anything else an `Int`.
  fn get_number(&mut self) -> CompileResult<NumberValue> {
    if let Some(token) = self.tokens.get(self.pos)
      && token.kind == TokenKind::Number
    {
      let text = token_text(token, self.source);
      let loc = token.loc;
      let value = if text.contains('.') {
        let parsed = text
          .parse::<f64>()
          .map_err(|err| CompileError::at(self.source, loc, format!("invalid number: {err}")))?;
        NumberValue::Float(parsed)
      } else {
        let parsed = text
          .parse::<i64>()
          .map_err(|err| CompileError::at(self.source, loc, format!("invalid number: {err}")))?;
        NumberValue::Int(parsed)
      };
      self.pos += 1;
      return Ok(value);
    }

    let (loc, got) = match self.tokens.get(self.pos) {
      Some(token) => (token.loc, token_text(token, self.source).to_string()),
      None => (self.source.len(), "end of expression".to_string()),
    };
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }
}
