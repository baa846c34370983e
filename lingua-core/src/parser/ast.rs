use std::{fmt::Display, rc::Rc};

use crate::{resolver::prelude::Operator, utils::prelude::SrcSpan};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: SrcSpan,
}

impl Node {
    pub fn new(kind: NodeKind, location: SrcSpan) -> Self {
        Self { kind, location }
    }

    fn placeholder() -> Self {
        Self::new(NodeKind::Number(Number::Int(0)), SrcSpan::default())
    }
}

// Children are moved onto a worklist first, so a long operator chain is
// freed without one stack frame per link.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = vec![];
        self.kind.detach_children(&mut pending);

        while let Some(mut node) = pending.pop() {
            node.kind.detach_children(&mut pending);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Number(Number),
    BinaryOp {
        left: Box<Node>,
        operator: Operator,
        right: Box<Node>,
    },
    // operator is `+` or `-`
    UnaryOp {
        operator: Operator,
        operand: Box<Node>,
    },
    // operands are numeric literals, folded left to right
    ListOp {
        operator: Operator,
        operands: Vec<Node>,
    },
    VarAccess(Identifier),
    VarAssign {
        name: Identifier,
        value: Box<Node>,
    },
    FuncDef(Rc<FuncDef>),
    Call {
        callee: Identifier,
        args: Vec<Node>,
    },
    Block(Block),
}

impl NodeKind {
    fn detach_children(&mut self, pending: &mut Vec<Node>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                pending.push(std::mem::replace(&mut **left, Node::placeholder()));
                pending.push(std::mem::replace(&mut **right, Node::placeholder()));
            },
            Self::UnaryOp { operand: child, .. } | Self::VarAssign { value: child, .. } => {
                pending.push(std::mem::replace(&mut **child, Node::placeholder()));
            },
            Self::ListOp { operands: children, .. } | Self::Call { args: children, .. } => {
                pending.append(children);
            },
            Self::Block(block) => pending.append(&mut block.statements),
            // function bodies are shared with closures
            Self::Number(_) | Self::VarAccess(_) | Self::FuncDef(_) => {},
        }
    }
}

// create <name> taking <params>* do <statements> end
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Rc<Block>,
}

// statements -> {\n} [<statement> {\n}+]*
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Node>,
    pub location: SrcSpan,
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Number(number) => write!(f, "{number}"),
            NodeKind::BinaryOp { left, operator, right } => {
                write!(f, "({operator} {left} {right})")
            },
            NodeKind::UnaryOp { operator, operand } => write!(f, "({operator} {operand})"),
            NodeKind::ListOp { operator, operands } => {
                let operands = operands.iter()
                    .map(|operand| format!("{operand}"))
                    .collect::<Vec<String>>();

                write!(f, "({operator} [{}])", operands.join(", "))
            },
            NodeKind::VarAccess(name) => write!(f, "{name}"),
            NodeKind::VarAssign { name, value } => write!(f, "(create {name} {value})"),
            NodeKind::FuncDef(def) => write!(f, "{def}"),
            NodeKind::Call { callee, args } => {
                write!(f, "(find {callee}")?;

                for arg in args {
                    write!(f, " {arg}")?;
                }

                write!(f, ")")
            },
            NodeKind::Block(block) => write!(f, "{block}"),
        }
    }
}

impl Display for FuncDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.value.as_str())
            .collect::<Vec<&str>>();

        write!(f, "(create {} [{}] {})", self.name, params.join(" "), self.body)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| format!("{statement}"))
            .collect::<Vec<String>>();

        write!(f, "{{{}}}", statements.join("; "))
    }
}
