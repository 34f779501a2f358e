use crate::expr::{AssignData, BinaryData, CallData, Expr, ExprVisitor, GroupingData, LogicalData, UnaryData, VariableData};
use crate::literal::Literal;
use crate::stmt::{BlockData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt, StmtVisitor, VarData, WhileData};

/// Renders an expression as a fully parenthesized Lisp-like string. Used by
/// tests and the `--print-ast` debugging path to make precedence and
/// associativity visible without guessing at the grammar.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";

            string
        }
    };
}

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal(&mut self, literal: &Literal) -> String {
        literal.to_string()
    }

    fn visit_logical(&mut self, data: &LogicalData) -> String {
        parenthesize!(self, &data.operator.lexeme, &*data.left, &*data.right)
    }

    fn visit_unary(&mut self, data: &UnaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &*data.expr)
    }

    fn visit_binary(&mut self, data: &BinaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &*data.left, &*data.right)
    }

    fn visit_grouping(&mut self, data: &crate::expr::GroupingData) -> String {
        parenthesize!(self, "group", &*data.expr)
    }

    fn visit_variable(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign(&mut self, data: &AssignData) -> String {
        parenthesize!(self, format!("= {}", data.name.lexeme).as_str(), &*data.value)
    }

    fn visit_call(&mut self, data: &CallData) -> String {
        let mut string = data.callee.accept(self);
        string += "(";
        for (i, arg) in data.arguments.iter().enumerate() {
            if i > 0 {
                string += " ";
            }
            string += &arg.accept(self);
        }
        string += ")";
        string
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_expression(&mut self, data: &ExpressionData) -> String {
        parenthesize!(self, "expr", &data.expr)
    }

    fn visit_function(&mut self, data: &FunctionData) -> String {
        let mut string = String::from("(fun ");
        string += &data.name.lexeme;
        string += "(";
        string += &data.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(" ");
        string += ") { ";
        string += &data.body.iter().map(|stmt| stmt.accept(self)).collect::<Vec<_>>().join(" ");
        string += " })";
        string
    }

    fn visit_if(&mut self, data: &IfData) -> String {
        let mut string = String::from("(if ");
        string += &data.condition.accept(self);
        string += " ";
        string += &data.then_branch.accept(self);
        if let Some(else_branch) = &data.else_branch {
            string += " else ";
            string += &else_branch.accept(self);
        }
        string += ")";
        string
    }

    fn visit_print(&mut self, data: &PrintData) -> String {
        parenthesize!(self, "print", &data.expr)
    }

    fn visit_var(&mut self, data: &VarData) -> String {
        let mut string = String::from("(var ");
        string += &data.name.lexeme;
        if let Some(initializer) = &data.initializer {
            string += " = ";
            string += &initializer.accept(self);
        }
        string += ")";
        string
    }

    fn visit_while(&mut self, data: &WhileData) -> String {
        parenthesize!(self, "while", &data.condition, &*data.body)
    }

    fn visit_block(&mut self, data: &BlockData) -> String {
        let mut string = String::from("{");
        for stmt in &data.statements {
            string += " ";
            string += &stmt.accept(self);
        }
        string += " }";
        string
    }

    fn visit_return(&mut self, data: &ReturnData) -> String {
        match &data.value {
            Some(value) => parenthesize!(self, "return", value),
            None => "(return)".to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::BinaryData;
    use crate::token::{Token, Type};

    #[test]
    fn prints_binary_expression() {
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: Token::new(Type::Plus, "+".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::Number(2.0))),
        });

        assert_eq!(AstPrinter.print(&expr), "(+ 1 2)");
    }
}
