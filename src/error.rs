use std::sync::atomic::{AtomicBool, Ordering};

use crate::token::{Token, Type};

/// Process-wide diagnostics sink. The teacher crate this was grown from
/// kept a duplicate pair of these flags in both `error.rs` and `lib.rs`;
/// this is the single owner, so `Lox::run` and every error kind agree on
/// whether the run is already doomed.
#[derive(Default)]
pub struct Host {
    had_error: AtomicBool,
    had_runtime_error: AtomicBool,
}

impl Host {
    pub fn new() -> Self {
        Host::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.load(Ordering::Relaxed) || self.had_runtime_error.load(Ordering::Relaxed)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.load(Ordering::Relaxed)
    }

    pub fn set_error(&self) {
        self.had_error.store(true, Ordering::Relaxed);
    }

    pub fn set_runtime_error(&self) {
        self.had_runtime_error.store(true, Ordering::Relaxed);
    }

    /// Clears both flags. Called between REPL prompts; never called
    /// mid-file.
    pub fn reset(&self) {
        self.had_error.store(false, Ordering::Relaxed);
        self.had_runtime_error.store(false, Ordering::Relaxed);
    }
}

/// Every compile-time/runtime error kind implements this so callers can
/// report-and-continue uniformly.
pub trait Error {
    fn throw(&self, host: &Host);
}

/// An error raised while scanning (bad character, unterminated string).
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self, host: &Host) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        host.set_error();
    }
}

/// An error raised while parsing a token stream into statements.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self, host: &Host) {
        if self.token.r#type == Type::EOF {
            eprintln!("[line {}] Error at end: {}", self.token.line, self.message);
        } else {
            eprintln!(
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            );
        }
        host.set_error();
    }
}

/// An error raised while statically resolving variable scopes.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self, host: &Host) {
        eprintln!(
            "[line {}] Error at '{}': {}",
            self.token.line, self.token.lexeme, self.message
        );
        host.set_error();
    }
}

/// An error raised while executing a resolved, syntactically valid program.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self, host: &Host) {
        eprintln!("{}\n[line {}]", self.message, self.token.line);
        host.set_runtime_error();
    }
}
