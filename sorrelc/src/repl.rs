//! Line-at-a-time REPL: each submitted line runs through the full pipeline
//! as its own program.

use std::env;
use std::io::{self, Write};

use sorrel_parser::parse;
use sorrel_vm::Vm;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn start_repl() {
    println!(
        "Sorrel REPL v{} on {} ({})",
        VERSION,
        env::consts::OS,
        env::consts::ARCH
    );
    let (stdin, mut stdout) = (io::stdin(), io::stdout());
    loop {
        let mut line = String::new();
        print!(">>> ");
        stdout.flush().expect("failed to flush stdout");
        let n = stdin.read_line(&mut line).expect("failed to read line");
        // Zero bytes read means Ctrl-D
        if n == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        run_line(&line);
    }
}

fn run_line(src: &str) {
    let result = parse(src)
        .and_then(|ast| sorrel_ir::lower(&ast))
        .and_then(|ir| sorrel_compiler::compile(&ir))
        .and_then(|code| Vm::new(code).run());
    if let Err(e) = result {
        eprintln!("{e}");
    }
}
