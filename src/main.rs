use anyhow::Context;
use rill::ast::Stmt;
use rill::{interp_program, ResultKind};
use std::env;
use std::fs;
use std::process::exit;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <program.json>", args[0]);
        exit(64);
    }

    let program = match load(&args[1]) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{error:#}");
            exit(65);
        }
    };

    let result = interp_program(&program);
    match result.kind {
        ResultKind::Ok => print!("{}", result.output.concat()),
        ResultKind::Error => {
            // An error result's output is exactly the diagnostic line.
            eprintln!("{}", result.output.concat());
            exit(70);
        }
    }
}

fn load(path: &str) -> anyhow::Result<Vec<Stmt>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
    let program =
        serde_json::from_str(&source).with_context(|| format!("malformed program AST in '{path}'"))?;
    Ok(program)
}
