//! A tiny interpreter for the emitted NASM subset.
//!
//! Tests feed whole emitted programs through `run` and observe the value
//! the postamble hands to `printf`. Only the instructions the generator
//! actually emits are understood; anything else is a hard failure so new
//! emission forms cannot slip past the suite unnoticed.

use std::collections::HashMap;

use crate::Instruction;

#[derive(Default)]
struct Machine {
  registers: HashMap<String, i64>,
  stack: Vec<i64>,
  zero_flag: bool,
}

impl Machine {
  fn value_of(&self, operand: &str) -> i64 {
    operand
      .parse::<i64>()
      .unwrap_or_else(|_| *self.registers.get(operand).unwrap_or(&0))
  }

  fn set(&mut self, register: &str, value: i64) {
    self.registers.insert(register.to_string(), value);
  }
}

fn strip_comment(line: &str) -> &str {
  match line.split_once(';') {
    Some((code, _)) => code.trim(),
    None => line.trim(),
  }
}

fn operands(rest: &str) -> Vec<&str> {
  rest.split(',').map(str::trim).collect()
}

/// Execute a full emitted program and return the value printed by the
/// `call printf` in the postamble.
pub fn run(program: &[Instruction]) -> i64 {
  let lines: Vec<&str> = program
    .iter()
    .map(|instruction| strip_comment(instruction.as_str()))
    .collect();

  let mut labels = HashMap::new();
  for (index, line) in lines.iter().enumerate() {
    if let Some(name) = line.strip_suffix(':') {
      labels.insert(name.to_string(), index);
    }
  }

  let mut machine = Machine::default();
  let mut printed = None;
  let mut pc = 0;

  while pc < lines.len() {
    let line = lines[pc];
    pc += 1;

    if line.is_empty() || line.ends_with(':') {
      continue;
    }

    let (mnemonic, rest) = line.split_once(' ').unwrap_or((line, ""));
    match mnemonic {
      "global" | "extern" | "section" | "format" | "lea" => {}
      "push" => {
        let value = machine.value_of(rest);
        machine.stack.push(value);
      }
      "pop" => {
        let value = machine.stack.pop().expect("pop from empty stack");
        machine.set(rest, value);
      }
      "mov" => {
        let ops = operands(rest);
        let value = machine.value_of(ops[1]);
        machine.set(ops[0], value);
      }
      "add" => {
        let ops = operands(rest);
        let value = machine.value_of(ops[0]) + machine.value_of(ops[1]);
        machine.set(ops[0], value);
      }
      "sub" => {
        let ops = operands(rest);
        let value = machine.value_of(ops[0]) - machine.value_of(ops[1]);
        machine.set(ops[0], value);
      }
      "imul" => {
        let ops = operands(rest);
        let value = machine.value_of(ops[0]) * machine.value_of(ops[1]);
        machine.set(ops[0], value);
      }
      "xor" => {
        let ops = operands(rest);
        let value = machine.value_of(ops[0]) ^ machine.value_of(ops[1]);
        machine.set(ops[0], value);
      }
      "idiv" => {
        let divisor = machine.value_of(rest);
        let dividend = machine.value_of("rax");
        machine.set("rax", dividend / divisor);
        machine.set("rdx", dividend % divisor);
      }
      "cmp" => {
        let ops = operands(rest);
        machine.zero_flag = machine.value_of(ops[0]) == machine.value_of(ops[1]);
      }
      "dec" => {
        let value = machine.value_of(rest) - 1;
        machine.set(rest, value);
        machine.zero_flag = value == 0;
      }
      "je" => {
        if machine.zero_flag {
          pc = *labels.get(rest).expect("jump to unknown label");
        }
      }
      "jnz" => {
        if !machine.zero_flag {
          pc = *labels.get(rest).expect("jump to unknown label");
        }
      }
      "call" => match rest {
        "printf" => printed = Some(machine.value_of("rcx")),
        "ExitProcess" => break,
        routine => panic!("call to unknown routine: {routine}"),
      },
      other => panic!("unhandled instruction: {other} {rest}"),
    }
  }

  printed.expect("program never reached printf")
}
