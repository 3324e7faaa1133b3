mod errors;
mod lexer;

use std::env;
use std::fs;
use std::process;

use errors::SourceFile;
use lexer::token::{sanitize_operator, Token, TokenInfo};
use lexer::Lexer;

fn describe(info: &TokenInfo, mangle: bool) -> String {
    match &info.token {
        Token::CustomOp(op) if mangle => {
            format!("CustomOp({}) as `{}`", op, sanitize_operator(op))
        }
        Token::CustomOpMethod(op) if mangle => {
            format!("CustomOpMethod({}) as `op_{}`", op, sanitize_operator(op))
        }
        other => format!("{:?}", other),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("ivy v0.1.0");
        eprintln!("Usage: ivy <source.ivy> [options]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --mangle         Show sanitized spellings for custom operator tokens");
        eprintln!("  -v | --verbose   Verbose output");
        process::exit(1);
    }

    let source_path = &args[1];
    let mut mangle = false;
    let mut verbose = false;

    for arg in &args[2..] {
        match arg.as_str() {
            "--mangle" => mangle = true,
            "--verbose" | "-v" => verbose = true,
            _ => {}
        }
    }

    let source = match fs::read_to_string(source_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", source_path, e);
            process::exit(1);
        }
    };

    if verbose {
        println!("Tokenizing {}...", source_path);
    }

    let mut lexer = Lexer::new(&source);
    let tokens = match lexer.tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            let file = SourceFile::new(source_path, &source);
            eprintln!("{}", file.render_lex_error(&e));
            process::exit(1);
        }
    };

    for info in &tokens {
        println!("{:>4}:{:<4} {}", info.line, info.column, describe(info, mangle));
    }

    if verbose {
        println!("{} tokens", tokens.len());
    }
}
