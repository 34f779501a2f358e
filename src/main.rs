use std::io::{self, Write};
use std::path::PathBuf;
use std::{env, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxr::error::Host;
use loxr::Lox;

const HISTORY_FILE_NAME: &str = ".lox_history";

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(HISTORY_FILE_NAME))
}

fn run_file(path: &str) -> ! {
    let host = Host::new();
    let stdout = io::stdout();
    let mut lox = Lox::new(&host, stdout.lock());

    lox.run_file(path);

    // `had_runtime_error` is a subset of `had_error` (see Host::had_error),
    // so it must be checked first or a runtime error would exit 65 instead
    // of 70.
    if host.had_runtime_error() {
        process::exit(70);
    }
    if host.had_error() {
        process::exit(65);
    }
    process::exit(0);
}

fn run_prompt() -> ! {
    let host = Host::new();
    let stdout = io::stdout();
    let mut lox = Lox::new(&host, stdout.lock());

    let mut editor = DefaultEditor::new().expect("failed to initialize the line editor");
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                lox.run_prompt_line(&line);
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            },
            Err(error) => {
                eprintln!("Readline error: {error}");
                break;
            },
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    process::exit(0);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 2 => {
            io::stdout().write_all(b"Usage: loxr [script]\n").expect("stdout to accept a write");
            process::exit(64);
        },
        2 => run_file(&args[1]),
        _ => run_prompt(),
    }
}
