use std::sync::atomic::{AtomicU32, Ordering};

use crate::literal::Literal;
use crate::token::Token;

/// Identifies a `Variable`/`Assign` node for the resolver's scope-depth map.
///
/// The teacher's draft keyed resolved depths by `Token`, which collides
/// whenever two distinct occurrences of the same name hash equal (every `x`
/// in a file, for instance). A `NodeId` is stamped once at parse time and is
/// unique per occurrence, so [`crate::interpreter::Interpreter::locals`] can
/// never cross-contaminate two unrelated reads of the same identifier.
pub type NodeId = u32;

fn next_node_id() -> NodeId {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: NodeId,
    pub name: Token,
}

impl VariableData {
    pub fn new(name: Token) -> Self {
        VariableData { id: next_node_id(), name }
    }
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: NodeId,
    pub name: Token,
    pub value: Box<Expr>,
}

impl AssignData {
    pub fn new(name: Token, value: Box<Expr>) -> Self {
        AssignData { id: next_node_id(), name, value }
    }
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

/// An expression node. Variants hold their fields in a `*Data` struct rather
/// than inline so that [`ExprVisitor`] impls can destructure by name.
#[derive(Debug, Clone)]
pub enum Expr {
    Binary(BinaryData),
    Grouping(GroupingData),
    Literal(Literal),
    Unary(UnaryData),
    Variable(VariableData),
    Assign(AssignData),
    Logical(LogicalData),
    Call(CallData),
}

impl Expr {
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Binary(data) => visitor.visit_binary(data),
            Expr::Grouping(data) => visitor.visit_grouping(data),
            Expr::Literal(data) => visitor.visit_literal(data),
            Expr::Unary(data) => visitor.visit_unary(data),
            Expr::Variable(data) => visitor.visit_variable(data),
            Expr::Assign(data) => visitor.visit_assign(data),
            Expr::Logical(data) => visitor.visit_logical(data),
            Expr::Call(data) => visitor.visit_call(data),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_binary(&mut self, data: &BinaryData) -> T;
    fn visit_grouping(&mut self, data: &GroupingData) -> T;
    fn visit_literal(&mut self, data: &Literal) -> T;
    fn visit_unary(&mut self, data: &UnaryData) -> T;
    fn visit_variable(&mut self, data: &VariableData) -> T;
    fn visit_assign(&mut self, data: &AssignData) -> T;
    fn visit_logical(&mut self, data: &LogicalData) -> T;
    fn visit_call(&mut self, data: &CallData) -> T;
}
