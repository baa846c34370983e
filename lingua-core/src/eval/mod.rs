
pub mod error;

pub mod prelude {
    pub use super::{
        error::*,
        eval,
        eval_block,
        RuntimeResult,
        MAX_CALL_DEPTH,
    };
}

use std::rc::Rc;

use crate::{
    environment::prelude::{Context, Environment, Function, Scope, Value, ValueKind},
    parser::prelude::{Block, Identifier, Node, NodeKind},
    resolver::prelude::Operator,
    utils::prelude::SrcSpan,
};
use error::{RuntimeError, RuntimeErrorType};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Calls nested deeper than this fail instead of exhausting the stack.
pub const MAX_CALL_DEPTH: usize = 128;

/// Evaluates `node` in `scope`. `context` is the traceback frame errors are
/// reported in.
pub fn eval(node: &Node, scope: &Scope, context: &Rc<Context>) -> RuntimeResult<Value> {
    match &node.kind {
        NodeKind::Number(number) => Ok(Value::new(ValueKind::Number(*number), node.location)),
        NodeKind::BinaryOp { .. } => eval_binary(node, scope, context),
        NodeKind::UnaryOp { operator, operand } => {
            let value = eval(operand, scope, context)?;

            match operator {
                Operator::Subtract => {
                    let minus_one = Value::int(-1, node.location);
                    apply(Operator::Multiply, &value, &minus_one, node.location, context)
                },
                _ => Ok(value.at(node.location)),
            }
        },
        NodeKind::ListOp { operator, operands } => {
            let mut operands = operands.iter();

            let Some(first) = operands.next() else {
                return Err(RuntimeError::new(RuntimeErrorType::EmptyList, node.location, context));
            };

            let mut result = eval(first, scope, context)?;

            for operand in operands {
                let next = eval(operand, scope, context)?;
                result = apply(*operator, &result, &next, node.location, context)?;
            }

            Ok(result.at(node.location))
        },
        NodeKind::VarAccess(name) => Ok(lookup(name, scope, context)?.at(node.location)),
        NodeKind::VarAssign { name, value } => {
            let value = eval(value, scope, context)?;
            scope.borrow_mut().set(name.value.clone(), value.clone());

            Ok(value)
        },
        NodeKind::FuncDef(def) => {
            let function = Value::new(
                ValueKind::Function(Function {
                    def: def.clone(),
                    scope: scope.clone(),
                }),
                node.location
            );

            scope.borrow_mut().set(def.name.value.clone(), function.clone());

            Ok(function)
        },
        NodeKind::Call { callee, args } => eval_call(callee, args, node.location, scope, context),
        NodeKind::Block(block) => eval_block(block, scope, context),
    }
}

/// Runs statements in order, stopping at the first error. Bindings made
/// before the error are kept. An empty block is worth `0`.
pub fn eval_block(block: &Block, scope: &Scope, context: &Rc<Context>) -> RuntimeResult<Value> {
    let mut result = Value::int(0, block.location);

    for statement in &block.statements {
        result = eval(statement, scope, context)?;
    }

    Ok(result)
}

/// Folds a left-leaning operator chain from its innermost operand outwards,
/// so `1 + 1 + ... + 1` uses constant stack.
fn eval_binary(node: &Node, scope: &Scope, context: &Rc<Context>) -> RuntimeResult<Value> {
    let mut chain = vec![];
    let mut leftmost = node;

    while let NodeKind::BinaryOp { left, operator, right } = &leftmost.kind {
        chain.push((*operator, &**right, leftmost.location));
        leftmost = &**left;
    }

    let mut lhs = eval(leftmost, scope, context)?;

    for (operator, right, location) in chain.into_iter().rev() {
        let rhs = eval(right, scope, context)?;
        lhs = apply(operator, &lhs, &rhs, location, context)?;
    }

    Ok(lhs)
}

fn lookup(name: &Identifier, scope: &Scope, context: &Rc<Context>) -> RuntimeResult<Value> {
    let value = scope.borrow().get(&name.value);

    value.ok_or_else(|| RuntimeError::new(
        RuntimeErrorType::UndefinedVariable { name: name.value.clone() },
        name.location,
        context
    ))
}

fn apply(
    operator: Operator,
    lhs: &Value,
    rhs: &Value,
    location: SrcSpan,
    context: &Rc<Context>
) -> RuntimeResult<Value> {
    let (Some(left), Some(right)) = (lhs.as_number(), rhs.as_number()) else {
        return Err(RuntimeError::new(RuntimeErrorType::IllegalOperation, location, context));
    };

    match left.apply(operator, right) {
        Ok(number) => Ok(Value::new(ValueKind::Number(number), location)),
        // reported at the divisor
        Err(RuntimeErrorType::DivisionByZero) => Err(RuntimeError::new(
            RuntimeErrorType::DivisionByZero,
            rhs.location,
            context
        )),
        Err(error) => Err(RuntimeError::new(error, location, context)),
    }
}

fn eval_call(
    callee: &Identifier,
    args: &[Node],
    location: SrcSpan,
    scope: &Scope,
    context: &Rc<Context>
) -> RuntimeResult<Value> {
    let target = lookup(callee, scope, context)?;

    let args = args.iter()
        .map(|arg| eval(arg, scope, context))
        .collect::<RuntimeResult<Vec<Value>>>()?;

    let ValueKind::Function(function) = target.kind else {
        return Err(RuntimeError::new(RuntimeErrorType::NotCallable, location, context));
    };

    if args.len() != function.arity() {
        return Err(RuntimeError::new(
            RuntimeErrorType::ArityMismatch { passed: args.len(), expected: function.arity() },
            location,
            context
        ));
    }

    if context.depth() >= MAX_CALL_DEPTH {
        return Err(RuntimeError::new(
            RuntimeErrorType::RecursionLimit { limit: MAX_CALL_DEPTH },
            location,
            context
        ));
    }

    let call_scope = Environment::child_of(&function.scope);

    {
        let mut call_scope = call_scope.borrow_mut();

        for (param, value) in function.def.params.iter().zip(args) {
            call_scope.set(param.value.clone(), value);
        }
    }

    let call_context = Context::child(context, function.name(), location);
    let result = eval_block(&function.def.body, &call_scope, &call_context)?;

    Ok(result.at(location))
}
