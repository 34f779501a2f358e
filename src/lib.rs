#![allow(clippy::needless_return)]

//! `loxr` is a tree-walking interpreter for Lox, a small dynamically typed
//! scripting language with numbers, strings, booleans, nil, lexically
//! scoped variables, control flow, and first-class functions with closures.
//!
//! ## Scanning
//! The first step is scanning: converting a string of characters into a
//! list of tokens. The scanner is implemented in [`scanner`] as an iterator
//! over the characters in the source. It reports syntax errors as
//! [`ScanError`](error::ScanError) (an unterminated string, an unexpected
//! character) and keeps scanning past them, so a single run surfaces every
//! lexical mistake in a file instead of stopping at the first one.
//!
//! ## Parsing
//! The second step converts the token list into an abstract syntax tree.
//! The parser is implemented in [`parser`] as a recursive-descent parser
//! over the grammar in that module's doc comment. [`Expressions`](expr::Expr)
//! produce a value; [`Statements`](stmt::Stmt) perform an action. The parser
//! reports [`ParseError`](error::ParseError)s and recovers via
//! panic-mode synchronization so later declarations still get a chance to
//! parse even after an earlier one failed.
//!
//! ## Resolving
//! The third step is a static pass over the AST that assigns each variable
//! reference a lexical scope depth, implemented in [`resolver`]. This is
//! what lets a closure keep reading the right `x` even after control has
//! left the block that declared it. The resolver reports
//! [`ResolveError`](error::ResolveError)s for scoping mistakes that are
//! syntactically valid but semantically wrong, such as reading a local
//! variable from within its own initializer.
//!
//! ## Interpreting
//! The final step walks the AST and evaluates it, implemented in
//! [`interpreter`]. The interpreter reports [`RuntimeError`](error::RuntimeError)s
//! for mistakes that can only be caught once a program is actually running,
//! such as adding a string to a number. It manages a chain of
//! [`Environment`](environment::Environment)s for lexical scoping and a
//! [`Callable`](object::Callable) abstraction shared by user-defined and
//! native functions.

use std::fs;
use std::io::Write;

pub mod ast;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Host;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Drives the scan -> parse -> resolve -> interpret pipeline for one
/// process run. Owns the interpreter's environment chain, so variables and
/// functions declared at one REPL prompt are still visible at the next.
pub struct Lox<'a, W: Write> {
    host: &'a Host,
    interpreter: Interpreter<'a, W>,
}

impl<'a, W: Write> Lox<'a, W> {
    pub fn new(host: &'a Host, output: W) -> Self {
        Lox { host, interpreter: Interpreter::new(host, output) }
    }

    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).unwrap_or_else(|error| {
            eprintln!("Could not read file '{path}': {error}");
            std::process::exit(74);
        });

        self.run(&contents);
    }

    /// Runs one line (or block) of source, then reports `had_error()`,
    /// clearing it before the next prompt. The runtime-error flag is
    /// likewise per-prompt in REPL mode; `run_file` relies on the flags
    /// never being reset mid-file, since it only calls `run` once.
    pub fn run_prompt_line(&mut self, source: &str) {
        self.host.reset();
        self.run(source);
    }

    pub fn had_error(&self) -> bool {
        self.host.had_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.host.had_runtime_error()
    }

    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source, self.host).scan_tokens();

        if self.host.had_error() {
            return;
        }

        let statements = Parser::new(tokens, self.host).parse();

        if self.host.had_error() {
            return;
        }

        let locals = Resolver::new(self.host).resolve(&statements);

        if self.host.had_error() {
            return;
        }

        self.interpreter.set_locals(locals);
        self.interpreter.interpret(&statements);
    }
}
