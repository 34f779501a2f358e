use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{Host, RuntimeError};
use crate::expr::{AssignData, BinaryData, CallData, Expr, ExprVisitor, GroupingData, LogicalData, NodeId, UnaryData, VariableData};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object, OperandError};
use crate::stmt::{BlockData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt, StmtVisitor, VarData, WhileData};
use crate::token::{Token, Type};

/// What happened while executing a statement: either it ran to completion,
/// it hit a real error, or it is an in-flight `return` unwinding toward the
/// call that will catch it. The last case is a control-flow signal, never a
/// `RuntimeError` — conflating the two would let a `return` trip the host's
/// runtime-error flag.
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

type EvalResult = Result<Object, RuntimeError>;
type ExecResult = Result<(), Unwind>;

/// Tree-walking evaluator. Generic over the output stream so tests can
/// capture `print` output instead of writing to the process's real stdout.
pub struct Interpreter<'a, W: Write> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    host: &'a Host,
    output: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(host: &'a Host, output: W) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            host,
            output,
        }
    }

    /// Installs the resolver's node-id -> depth map. Must be called after
    /// resolving and before interpreting the same statement list.
    pub fn set_locals(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals = locals;
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {},
                Err(Unwind::Error(error)) => {
                    error.throw(self.host);
                    return;
                },
                Err(Unwind::Return(_)) => {
                    unreachable!("the resolver rejects `return` outside a function body");
                },
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;
        result
    }

    fn look_up_variable(&self, id: NodeId, name: &Token) -> EvalResult {
        match self.locals.get(&id) {
            Some(&depth) => Environment::get_at(&self.environment, depth, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn call_error(&self, operator: &Token, error: OperandError) -> RuntimeError {
        RuntimeError { token: operator.clone(), message: error.message().to_string() }
    }
}

impl<'a, W: Write> ExprVisitor<EvalResult> for Interpreter<'a, W> {
    fn visit_literal(&mut self, data: &Literal) -> EvalResult {
        Ok(Object::from(data.clone()))
    }

    fn visit_grouping(&mut self, data: &GroupingData) -> EvalResult {
        self.evaluate(&data.expr)
    }

    fn visit_unary(&mut self, data: &UnaryData) -> EvalResult {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => (-right).map_err(|e| self.call_error(&data.operator, e)),
            Type::Bang => Ok(!right),
            _ => unreachable!("parser only emits Bang/Minus as unary operators"),
        }
    }

    fn visit_binary(&mut self, data: &BinaryData) -> EvalResult {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        match operator.r#type {
            Type::Minus => (left - right).map_err(|e| self.call_error(operator, e)),
            Type::Slash => (left / right).map_err(|e| self.call_error(operator, e)),
            Type::Star => (left * right).map_err(|e| self.call_error(operator, e)),
            Type::Plus => (left + right).map_err(|e| self.call_error(operator, e)),
            Type::Greater => self.compare(operator, left, right, |o| o.is_gt()),
            Type::GreaterEqual => self.compare(operator, left, right, |o| o.is_ge()),
            Type::Less => self.compare(operator, left, right, |o| o.is_lt()),
            Type::LessEqual => self.compare(operator, left, right, |o| o.is_le()),
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("parser only emits arithmetic/comparison/equality operators as binary"),
        }
    }

    fn visit_variable(&mut self, data: &VariableData) -> EvalResult {
        self.look_up_variable(data.id, &data.name)
    }

    fn visit_assign(&mut self, data: &AssignData) -> EvalResult {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&depth) => Environment::assign_at(&self.environment, depth, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_logical(&mut self, data: &LogicalData) -> EvalResult {
        let left = self.evaluate(&data.left)?;

        match data.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::Or => self.evaluate(&data.right),
            Type::And if !left.is_truthy() => Ok(left),
            Type::And => self.evaluate(&data.right),
            _ => unreachable!("parser only emits And/Or as logical operators"),
        }
    }

    fn visit_call(&mut self, data: &CallData) -> EvalResult {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable<W> = match &callee {
            Object::Function(function) => function.as_ref(),
            Object::NativeFunction(function) => function.as_ref(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                });
            },
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len()
                ),
            });
        }

        callable.call(self, arguments)
    }
}

impl<'a, W: Write> Interpreter<'a, W> {
    fn compare(&self, operator: &Token, left: Object, right: Object, check: impl Fn(std::cmp::Ordering) -> bool) -> EvalResult {
        left.partial_cmp(&right)
            .map(|ordering| Object::from(check(ordering)))
            .ok_or_else(|| RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() })
    }
}

impl<'a, W: Write> StmtVisitor<ExecResult> for Interpreter<'a, W> {
    fn visit_expression(&mut self, data: &ExpressionData) -> ExecResult {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print(&mut self, data: &PrintData) -> ExecResult {
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("writing to the configured output stream to succeed");
        Ok(())
    }

    fn visit_var(&mut self, data: &VarData) -> ExecResult {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block(&mut self, data: &BlockData) -> ExecResult {
        let scope = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(scope)))
    }

    fn visit_if(&mut self, data: &IfData) -> ExecResult {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while(&mut self, data: &WhileData) -> ExecResult {
        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_function(&mut self, data: &FunctionData) -> ExecResult {
        let function = Function::new(data, Rc::clone(&self.environment));
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return(&mut self, data: &ReturnData) -> ExecResult {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };
        Err(Unwind::Return(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run(source: &str) -> (String, bool, bool) {
        let host = Host::new();
        let mut output = Vec::new();

        let tokens = Scanner::new(source, &host).scan_tokens();
        let statements = Parser::new(tokens, &host).parse();
        let locals = Resolver::new(&host).resolve(&statements);

        {
            let mut interpreter = Interpreter::new(&host, &mut output);
            interpreter.set_locals(locals);
            if !host.had_error() {
                interpreter.interpret(&statements);
            }
        }

        (
            String::from_utf8(output).unwrap(),
            host.had_error(),
            host.had_runtime_error(),
        )
    }

    #[test]
    fn prints_sum_without_trailing_zero() {
        let (out, had_error, _) = run("print 1 + 2;");
        assert!(!had_error);
        assert_eq!(out, "3\n");
    }

    #[test]
    fn block_scoping_shadows_then_restores() {
        let (out, _, _) = run("var a = 0; { var a = 2; print a; } print a;");
        assert_eq!(out, "2\n0\n");
    }

    #[test]
    fn while_loop_prints_each_iteration() {
        let (out, _, _) = run("var a = 0; while (a < 2) { print a; a = a + 1; }");
        assert_eq!(out, "0\n1\n");
    }

    #[test]
    fn for_loop_desugars_correctly() {
        let (out, _, _) = run("for (var a = 1; a < 3; a = a + 1) print a;");
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn function_call_returns_value() {
        let (out, _, _) = run("fun add(x, y) { return x + y; } print add(3, 4);");
        assert_eq!(out, "7\n");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let (out, _, _) = run(
            "fun mk() { var c = 0; fun inc() { c = c + 1; return c; } return inc; } \
             var f = mk(); print f(); print f();",
        );
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn division_by_zero_is_a_distinguished_runtime_error() {
        let (_, had_error, had_runtime_error) = run("print 1 / 0;");
        assert!(had_error);
        assert!(had_runtime_error);
    }

    #[test]
    fn adding_string_and_number_is_a_runtime_error() {
        let (_, _, had_runtime_error) = run("print \"a\" + 1;");
        assert!(had_runtime_error);
    }

    #[test]
    fn uninitialized_variable_is_nil() {
        let (out, _, _) = run("var x; print x;");
        assert_eq!(out, "nil\n");
    }

    #[test]
    fn undefined_variable_reference_is_a_runtime_error() {
        let (_, _, had_runtime_error) = run("print y;");
        assert!(had_runtime_error);
    }

    #[test]
    fn wrong_arity_is_a_runtime_error() {
        let (_, _, had_runtime_error) = run("fun f(a) { return a; } print f(1, 2);");
        assert!(had_runtime_error);
    }

    #[test]
    fn runtime_error_halts_remaining_statements() {
        let (out, _, had_runtime_error) = run("print 1; print 1/0; print 2;");
        assert!(had_runtime_error);
        assert_eq!(out, "1\n");
    }

    #[test]
    fn logical_or_short_circuits_and_returns_operand_value() {
        let (out, _, _) = run("print nil or \"hi\";");
        assert_eq!(out, "hi\n");
    }

    #[test]
    fn logical_and_returns_first_falsey_operand() {
        let (out, _, _) = run("print false and \"unreached\";");
        assert_eq!(out, "false\n");
    }
}
