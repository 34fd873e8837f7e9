use std::env;
use std::fs;
use std::process;

use mathasm::DEFAULT_OUTPUT;

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() < 2 || args.len() > 3 {
    let program = args.first().map(String::as_str).unwrap_or("mathasm");
    eprintln!("usage: {program} <expr> [output-file]");
    process::exit(1);
  }

  let expression = &args[1];
  let output = args.get(2).map(String::as_str).unwrap_or(DEFAULT_OUTPUT);

  let asm = match mathasm::generate_assembly(expression) {
    Ok(asm) => asm,
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  };

  if let Err(err) = fs::write(output, &asm) {
    // The compiled program is still intact; dump it to stdout so a failed
    // write does not lose the result.
    eprintln!("failed to write {output}: {err}");
    print!("{asm}");
    process::exit(1);
  }

  println!("Assembly code has been written to {output}");
  println!();
  println!("Compilation instructions:");
  println!("1. Make sure you have NASM installed and in your PATH");
  println!("2. Compile with: nasm -f win64 {output} -o output.obj");
  println!("3. Link with: link output.obj /subsystem:console /entry:main /LARGEADDRESSAWARE:NO");
  println!("4. Run with: output.exe");
}
