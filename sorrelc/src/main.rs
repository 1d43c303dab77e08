/*

 ▄▄▄▄    ██▓    ▄▄▄       ▄████▄   ██ ▄█▀ ██▀███   █    ██   ██████  ██░ ██
▓█████▄ ▓██▒   ▒████▄    ▒██▀ ▀█   ██▄█▒ ▓██ ▒ ██▒ ██  ▓██▒▒██    ▒ ▓██░ ██▒
▒██▒ ▄██▒██░   ▒██  ▀█▄  ▒▓█    ▄ ▓███▄░ ▓██ ░▄█ ▒▓██  ▒██░░ ▓██▄   ▒██▀▀██░
▒██░█▀  ▒██░   ░██▄▄▄▄██ ▒▓▓▄ ▄██▒▓██ █▄ ▒██▀▀█▄  ▓▓█  ░██░  ▒   ██▒░▓█ ░██
░▓█  ▀█▓░██████▒▓█   ▓██▒▒ ▓███▀ ░▒██▒ █▄░██▓ ▒██▒▒▒█████▓ ▒██████▒▒░▓█▒░██▓
░▒▓███▀▒░ ▒░▓  ░▒▒   ▓▒█░░ ░▒ ▒  ░▒ ▒▒ ▓▒░ ▒▓ ░▒▓░░▒▓▒ ▒ ▒ ▒ ▒▓▒ ▒ ░ ▒ ░░▒░▒
▒░▒   ░ ░ ░ ▒  ░ ▒   ▒▒ ░  ░  ▒   ░ ░▒ ▒░  ░▒ ░ ▒░░░▒░ ░ ░ ░ ░▒  ░ ░ ▒ ░▒░ ░
 ░    ░   ░ ░    ░   ▒   ░        ░ ░░ ░   ░░   ░  ░░░ ░ ░ ░  ░  ░   ░  ░░ ░
 ░          ░  ░     ░  ░░ ░      ░  ░      ░        ░           ░   ░  ░  ░
      ░                  ░
Copyright (C) 2026, Blackrush LLC, All Rights Reserved
Created by Erik Olson, Tarpon Springs, Florida
For more information, visit BlackrushDrive.com

MIT License

Copyright (c) 2026 Erik Lee Olson for Blackrush, LLC

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.

*/

use std::env;

use sorrel_common::Result;
use sorrel_compiler::service::analyze_source;
use sorrel_lexer::Lexer;
use sorrel_parser::parse;
use sorrel_vm::Vm;

mod repl;

fn main() {
    pretty_env_logger::init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        print_help();
        repl::start_repl();
        return;
    }
    if args[0] == "--help" || args[0] == "-h" {
        print_help();
        return;
    }
    if args[0] == "--analyze" || args[0] == "-A" {
        if args.len() < 2 {
            eprintln!("usage: sorrelc --analyze <file.sor> [--json]");
            std::process::exit(2);
        }
        let file = args[1].clone();
        let json = args.iter().any(|a| a == "--json");
        cmd_analyze(file, json);
        return;
    }

    let cmd = args.remove(0);
    match cmd.as_str() {
        "run" => cmd_run(args.first().cloned()),
        "lex" => cmd_lex(args.first().cloned()),
        "dis" => cmd_dis(args.first().cloned()),
        "repl" => repl::start_repl(),
        other => {
            eprintln!("unknown command: '{}'\n", other);
            print_help();
            std::process::exit(2);
        }
    }
}

fn print_help() {
    println!("Sorrel CLI\n");
    println!("Commands:");
    println!("  run <file.sor>     Tokenize → parse → lower → compile → run");
    println!("  lex <file.sor>     Dump tokens from a .sor file (debug)");
    println!("  dis <file.sor>     Compile a .sor file and print the bytecode listing");
    println!("  repl               Interactive prompt (also starts when no command is given)");
    println!("  --analyze <file> [--json]  Print diagnostics and symbols without running\n");
    println!("Usage:");
    println!("  sorrelc <command> [args]\n");
    println!("Examples:");
    println!("  sorrelc run demos/sum.sor");
    println!("  sorrelc dis demos/sum.sor");
    println!("  sorrelc --analyze demos/sum.sor --json");
    println!();
}

// Full pipeline to bytecode, plus the static verifier: the VM only ever
// loads code that decodes end to end.
fn compile_source(src: &str) -> Result<Vec<u8>> {
    let ast = parse(src)?;
    let ir = sorrel_ir::lower(&ast)?;
    let code = sorrel_compiler::compile(&ir)?;
    sorrel_bytecode::verify(&code)?;
    Ok(code)
}

fn read_source(path: &str) -> String {
    if !path.ends_with(".sor") {
        eprintln!("refusing to run a non-.sor file: {}", path);
        std::process::exit(2);
    }
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            eprintln!("file is not UTF-8 text: {}", path);
            std::process::exit(3);
        }
        Err(e) => {
            eprintln!("failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_run(path: Option<String>) {
    let Some(path) = path else {
        eprintln!("usage: sorrelc run <file.sor>");
        std::process::exit(2);
    };
    let src = read_source(&path);
    let code = match compile_source(&src) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let mut vm = Vm::new(code);
    if let Err(e) = vm.run() {
        eprintln!("runtime error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_lex(path: Option<String>) {
    let Some(path) = path else {
        eprintln!("usage: sorrelc lex <file.sor>");
        std::process::exit(2);
    };
    let src = read_source(&path);
    match Lexer::new(&src).tokenize() {
        Ok(toks) => {
            for t in toks {
                println!("{:?}\t'{}'\t@line {}", t.kind, t.text, t.line);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_dis(path: Option<String>) {
    let Some(path) = path else {
        eprintln!("usage: sorrelc dis <file.sor>");
        std::process::exit(2);
    };
    let src = read_source(&path);
    let listing = compile_source(&src).and_then(|code| sorrel_bytecode::disassemble(&code));
    match listing {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_analyze(path: String, json: bool) {
    let src = read_source(&path);
    let diags = analyze_source(&src);
    if json {
        match serde_json::to_string_pretty(&diags) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("json: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        if diags.errors.is_empty() {
            println!("No errors.");
        } else {
            println!("Errors:");
            for e in &diags.errors {
                println!("- {:?} at line {}: {}", e.severity, e.line, e.message);
            }
        }
        if !diags.symbols.is_empty() {
            println!("Symbols:");
            for s in &diags.symbols {
                println!("- {:?} {} @line {}", s.kind, s.name, s.line);
            }
        }
    }
}
