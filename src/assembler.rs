//! Final formatting step: join the instruction sequence into program text.
//!
//! Rendering is pure; writing the text anywhere is the caller's concern.

use crate::codegen::Instruction;

/// Render the instruction list as newline-terminated program text.
pub fn render(instructions: &[Instruction]) -> String {
  let mut text = String::new();
  for instruction in instructions {
    text.push_str(instruction.as_str());
    text.push('\n');
  }
  text
}
