//! The one supported emission target: Windows x64, NASM syntax.
//!
//! The calling-convention constants live here as a single fixed template –
//! the compiler does not generalise across architectures. `printf` takes
//! the result in rcx per the Win64 integer argument order, and the prologue
//! reserves the mandatory 32-byte shadow space.

/// Lines emitted before the expression body: entry symbol, externals, the
/// integer format string and the stack-frame prologue.
pub const HEADER: &[&str] = &[
  "; Generated NASM Assembly Code for Windows x64",
  "global main",
  "extern ExitProcess",
  "extern printf",
  "",
  "section .data",
  "    format db \"%d\", 10, 0  ; Format string for printf",
  "",
  "section .text",
  "main:",
  "    ; Initialize stack frame",
  "    push rbp",
  "    mov rbp, rsp",
  "    sub rsp, 32  ; Shadow space for Win64 calling convention",
  "",
];

/// Lines emitted after the body: pop the result into the first argument
/// register, print it, exit with code 0.
pub const FOOTER: &[&str] = &[
  "    ; Prepare for printf (Windows x64 calling convention)",
  "    pop rcx      ; First argument - the value to print",
  "    lea rdx, [format]  ; Second argument - format string",
  "    xor r8, r8   ; Clear other arguments",
  "    xor r9, r9",
  "    call printf",
  "",
  "    ; Exit program",
  "    xor rcx, rcx  ; Exit code 0",
  "    call ExitProcess",
];
