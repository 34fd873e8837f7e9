//! Code generation: lower the parsed AST into a NASM stack-machine program.
//!
//! The emitter uses a simple stack machine: every subexpression leaves
//! exactly one value on the runtime stack, consumed by its parent. A binary
//! node emits its right operand first and its left operand second, so when
//! the combining instructions run the left value sits on top: the first pop
//! always receives the left operand and the second pop the right one. That
//! binding is what makes `-` and `/` come out as `left OP right`.

use std::fmt;

use crate::parser::{AstNode, BinaryOp};
use crate::target;

/// One line of emitted program text, possibly carrying an inline comment.
/// Position in the instruction sequence is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
  pub fn new(line: impl Into<String>) -> Self {
    Self(line.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Emits the program for a single AST. The generator owns the label counter
/// for its one compilation; separate generators restart numbering, so labels
/// are only unique within a run.
pub struct Generator {
  body: Vec<Instruction>,
  label_counter: usize,
}

impl Generator {
  pub fn new() -> Self {
    Self {
      body: Vec::new(),
      label_counter: 0,
    }
  }

  /// Lower `ast` into the complete instruction sequence: fixed target
  /// preamble, stack-machine body, result-printing postamble.
  ///
  /// Generation recurses as deep as the expression nests; host stack depth
  /// is the only bound.
  pub fn compile(mut self, ast: &AstNode) -> Vec<Instruction> {
    self.emit_expr(ast);

    let mut program: Vec<Instruction> = target::HEADER
      .iter()
      .copied()
      .map(Instruction::new)
      .collect();
    program.append(&mut self.body);
    program.extend(target::FOOTER.iter().copied().map(Instruction::new));
    program
  }

  fn emit(&mut self, line: impl Into<String>) {
    self.body.push(Instruction::new(line));
  }

  fn emit_expr(&mut self, node: &AstNode) {
    match node {
      AstNode::Number { value } => {
        // Decimal literals are truncated here; the pipeline is integer-only.
        self.emit(format!("    push {}", value.truncated()));
      }
      AstNode::Binary { op, lhs, rhs } => {
        // Right operand first; the left value ends up on top of the stack.
        self.emit_expr(rhs);
        self.emit_expr(lhs);
        match op {
          BinaryOp::Add => self.emit_arith("add"),
          BinaryOp::Sub => self.emit_arith("sub"),
          BinaryOp::Mul => self.emit_arith("imul"),
          BinaryOp::Div => self.emit_division(),
          BinaryOp::Pow => self.emit_power(),
        }
      }
    }
  }

  /// `add`, `sub` and `imul` all combine the left operand in rax with the
  /// right operand in rbx, leaving `left OP right` in rax.
  fn emit_arith(&mut self, mnemonic: &str) {
    self.emit("    pop rax    ; left operand");
    self.emit("    pop rbx    ; right operand");
    self.emit(format!("    {mnemonic} rax, rbx"));
    self.emit("    push rax");
  }

  /// Integer division. rdx must be zeroed before `idiv`; only the quotient
  /// is pushed, the remainder is discarded.
  fn emit_division(&mut self) {
    self.emit("    pop rax    ; dividend (left operand)");
    self.emit("    pop rbx    ; divisor (right operand)");
    self.emit("    xor rdx, rdx  ; clear remainder register");
    self.emit("    idiv rbx      ; rax = rax / rbx, rdx = remainder");
    self.emit("    push rax");
  }

  /// Exponentiation by repeated multiplication. A zero exponent jumps past
  /// the loop and pushes the untouched accumulator, so `n^0` is 1.
  /// Negative exponents are unsupported; the emitted loop misbehaves on
  /// them and callers get no diagnostic.
  fn emit_power(&mut self) {
    let (loop_label, end_label) = self.next_labels();
    self.emit("    pop rax    ; base (left operand)");
    self.emit("    pop rcx    ; exponent (right operand)");
    self.emit("    mov rbx, 1  ; accumulator");
    self.emit("    cmp rcx, 0");
    self.emit(format!("    je {end_label}"));
    self.emit(format!("{loop_label}:"));
    self.emit("    imul rbx, rax  ; accumulator *= base");
    self.emit("    dec rcx");
    self.emit(format!("    jnz {loop_label}"));
    self.emit(format!("{end_label}:"));
    self.emit("    push rbx");
  }

  /// Allocate the loop-entry/loop-exit label pair for one `^` site. The
  /// counter is bumped per site, so nested and sequential powers never
  /// share a label.
  fn next_labels(&mut self) -> (String, String) {
    let id = self.label_counter;
    self.label_counter += 1;
    (format!("power_loop_{id}"), format!("power_end_{id}"))
  }
}
