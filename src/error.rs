//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – a single variant quotes the
//! offending expression and points at the byte where compilation stopped
//! with a caret marker.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// Malformed expression rejected by the parser.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Syntax {
    expr_line: String,
    marker: String,
    message: String,
  },
}

impl CompileError {
  /// Construct an error anchored at a specific byte offset in the source.
  pub fn at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let expr_line = format!("'{expr}'");
    let safe_loc = loc.min(expr.len());
    let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
    let marker = format!("{}^", " ".repeat(char_offset));
    Self::Syntax {
      expr_line,
      marker,
      message: message.into(),
    }
  }
}
