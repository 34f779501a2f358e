use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::io::Write;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Unwind};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::Token;

/// A user-defined function, bound to the environment it closed over at
/// declaration time.
///
/// The environment this crate was grown from always parented a call's new
/// scope to `interpreter.globals`, which made a closure forget whatever
/// scope it was declared in as soon as it was called from somewhere else.
/// Parenting to `closure` instead is what makes nested functions actually
/// close over their enclosing locals.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<crate::stmt::Stmt>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(declaration: &FunctionData, closure: Rc<RefCell<Environment>>) -> Self {
        Function {
            name: declaration.name.clone(),
            params: declaration.params.clone(),
            body: declaration.body.clone(),
            closure,
        }
    }
}

impl<W: Write> Callable<W> for Function {
    fn call(&self, interpreter: &mut Interpreter<'_, W>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.body, Rc::new(RefCell::new(environment))) {
            Ok(()) => Ok(Object::from(Literal::Nil)),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A function implemented in the host language rather than in Lox.
///
/// `function` takes only the call arguments, not the interpreter: none of
/// the natives this crate defines (just `clock`) need interpreter access,
/// and a stored `fn` pointer can't itself be generic over the interpreter's
/// output writer the way the `Callable` impl below is.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(Vec<Object>) -> Result<Object, RuntimeError>,
}

impl<W: Write> Callable<W> for NativeFunction {
    fn call(&self, _interpreter: &mut Interpreter<'_, W>, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The natives installed into every interpreter's global scope.
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: "clock",
            arity: 0,
            function: |_| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock to be after the unix epoch")
                    .as_secs_f64();
                Ok(Object::from(now))
            },
        }]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
