use std::collections::HashMap;
use std::mem;

use crate::error::{Error, Host, ResolveError};
use crate::expr::{AssignData, BinaryData, CallData, Expr, ExprVisitor, GroupingData, LogicalData, UnaryData, VariableData};
use crate::literal::Literal;
use crate::stmt::{BlockData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt, StmtVisitor, VarData, WhileData};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
}

/// A single pre-execution pass that assigns each variable reference a scope
/// depth. Runs after parsing and before interpretation; raises
/// [`ResolveError`] for scoping mistakes the interpreter could not otherwise
/// catch until it was too late (e.g. mid-execution).
pub struct Resolver<'a> {
    host: &'a Host,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    locals: HashMap<u32, usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(host: &'a Host) -> Self {
        Resolver {
            host,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            locals: HashMap::new(),
        }
    }

    /// Resolves every statement and returns the node-id -> depth map the
    /// interpreter consults for variable lookups.
    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<u32, usize> {
        self.resolve_stmts(statements);
        self.locals
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, data: &FunctionData, r#type: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        for param in &data.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&data.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: u32, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, depth);
                return;
            }
        }
        // Not found in any scope: treated as global, resolved at runtime.
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_variable(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if let Some(false) = scope.get(&data.name.lexeme) {
                ResolveError {
                    token: data.name.clone(),
                    message: "Can't read local variable in its own initializer.".to_string(),
                }.throw(self.host);
            }
        }

        self.resolve_local(data.id, &data.name);
    }

    fn visit_assign(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name);
    }

    fn visit_literal(&mut self, _data: &Literal) {}

    fn visit_logical(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_unary(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_binary(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_grouping(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_call(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_block(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve_stmts(&data.statements);
        self.end_scope();
    }

    fn visit_var(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_function(&mut self, data: &FunctionData) {
        self.declare(&data.name);
        self.define(&data.name);

        self.resolve_function(data, FunctionType::Function);
    }

    fn visit_expression(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_if(&mut self, data: &IfData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_print(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_return(&mut self, data: &ReturnData) {
        if self.current_function == FunctionType::None {
            ResolveError {
                token: data.keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            }.throw(self.host);
        }

        if let Some(value) = &data.value {
            self.resolve_expr(value);
        }
    }

    fn visit_while(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve(source: &str) -> (HashMap<u32, usize>, bool) {
        let host = Host::new();
        let tokens = Scanner::new(source, &host).scan_tokens();
        let statements = Parser::new(tokens, &host).parse();
        let locals = Resolver::new(&host).resolve(&statements);
        (locals, host.had_error())
    }

    #[test]
    fn own_initializer_is_an_error() {
        let (_, had_error) = resolve("{ var a = a; }");
        assert!(had_error);
    }

    #[test]
    fn shadowing_in_nested_block_is_fine() {
        let (_, had_error) = resolve("{ var a = 1; { var a = a + 1; } }");
        assert!(!had_error);
    }

    #[test]
    fn redeclaration_in_same_scope_is_not_flagged() {
        let (_, had_error) = resolve("{ var a = 1; var a = 2; }");
        assert!(!had_error);
    }

    #[test]
    fn top_level_return_is_an_error() {
        let (_, had_error) = resolve("return 1;");
        assert!(had_error);
    }

    #[test]
    fn return_inside_function_is_fine() {
        let (_, had_error) = resolve("fun f() { return 1; }");
        assert!(!had_error);
    }

    #[test]
    fn global_reference_has_no_recorded_depth() {
        let (locals, had_error) = resolve("var a = 1; print a;");
        assert!(!had_error);
        assert!(locals.is_empty());
    }
}
