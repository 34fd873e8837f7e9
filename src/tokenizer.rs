//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond recognising numeric literals and the operator/paren symbols.
//! Decimal literals are matched greedily before bare integers so `12.5`
//! lexes as one token rather than three. Lexing is total: any character
//! outside the expression alphabet (letters, whitespace, a stray `.`) is
//! dropped from the output without an error.

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Number,
  Operator,
  LParen,
  RParen,
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor to keep the `tokenize` loop readable.
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }
}

/// Lex the input into a flat vector of tokens. Unrecognised characters are
/// skipped, so this never fails; `"2x+3"` lexes the same as `"2+3"`.
pub fn tokenize(input: &str) -> Vec<Token> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];

    if c.is_ascii_digit() {
      let start = i;
      i += 1;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      // A dot only extends the literal when at least one digit follows it;
      // otherwise it is left behind for the skip arm below.
      if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        i += 2;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
          i += 1;
        }
      }
      tokens.push(Token::new(TokenKind::Number, start, i - start));
      continue;
    }

    let kind = match c {
      b'+' | b'-' | b'*' | b'/' | b'^' => Some(TokenKind::Operator),
      b'(' => Some(TokenKind::LParen),
      b')' => Some(TokenKind::RParen),
      _ => None,
    };
    if let Some(kind) = kind {
      tokens.push(Token::new(kind, i, 1));
    }
    i += 1;
  }

  tokens
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}
