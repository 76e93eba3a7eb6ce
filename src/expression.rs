//! The deferred-evaluation graph (`spec.md` §4.1): a tree of
//! computations that only resolve to a value when asked, some of which
//! carry a dynamic reference to a *subject* injected at evaluation
//! time.
//!
//! The source threads the current subject through sub-expressions by
//! mutating a shared slot before recursing. Rust has no aliased mutable
//! slot to borrow that way without a `RefCell` per node, so subject
//! propagation here is an explicit argument passed down through
//! `evaluate` — same contract (every sub-expression sees the subject
//! the parent was evaluated with), expressed as ordinary function-call
//! threading instead.

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    ids::{EntityId, Timestamp},
    overlay::Overlay,
    selection::Selection,
    value::{Attribute, Value},
    world::World,
};

pub struct EvalContext<'a> {
    pub world: &'a World,
    pub overlay: &'a Overlay,
}

impl<'a> EvalContext<'a> {
    pub fn new(world: &'a World, overlay: &'a Overlay) -> Self {
        Self { world, overlay }
    }

    pub fn query(&self, entity: EntityId, attr: Attribute) -> Value {
        self.overlay.query(self.world, entity, attr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Concat,
    Union,
    Diff,
}

type MethodFn = Rc<dyn Fn(&EvalContext, Value, &IndexMap<String, Value>) -> Value>;

#[derive(Clone)]
pub enum Expr {
    Constant(Value),
    /// The subject injected at evaluation time — "the object being
    /// modified" reference that can't be bound at authoring time.
    Subject,
    AttributeRead {
        target: Box<Expr>,
        attr: Attribute,
    },
    MethodCall {
        target: Box<Expr>,
        name: &'static str,
        method: MethodFn,
        args: IndexMap<String, Expr>,
    },
    /// Memoizes on first evaluation; every subsequent call returns the
    /// stored value regardless of what the target would now produce.
    ///
    /// The Python original's `LockedAttributeReport` reads its memo
    /// *before* the guard that would store it, i.e. only after a second
    /// call overwrites the memo does the first call's read become
    /// visible — almost certainly inverted. This implementation uses
    /// the corrected order (store on first call, return the store
    /// thereafter); see `DESIGN.md` Open Questions.
    LockedAttributeRead {
        inner: Box<Expr>,
        memo: Rc<RefCell<Option<Value>>>,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Reduction {
        op: ReduceOp,
        attr: Attribute,
        sequence: Box<Expr>,
    },
    ObjectCount {
        selection: Rc<Selection>,
    },
    Timestamp,
    FreshUuid,
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(v) => write!(f, "Constant({v:?})"),
            Expr::Subject => write!(f, "Subject"),
            Expr::AttributeRead { attr, .. } => write!(f, "AttributeRead({attr:?})"),
            Expr::MethodCall { name, .. } => write!(f, "MethodCall({name})"),
            Expr::LockedAttributeRead { .. } => write!(f, "LockedAttributeRead"),
            Expr::BinaryOp { op, .. } => write!(f, "BinaryOp({op:?})"),
            Expr::Reduction { op, attr, .. } => write!(f, "Reduction({op:?}, {attr:?})"),
            Expr::ObjectCount { .. } => write!(f, "ObjectCount"),
            Expr::Timestamp => write!(f, "Timestamp"),
            Expr::FreshUuid => write!(f, "FreshUuid"),
        }
    }
}

impl Expr {
    pub fn locked(inner: Expr) -> Expr {
        Expr::LockedAttributeRead {
            inner: Box::new(inner),
            memo: Rc::new(RefCell::new(None)),
        }
    }

    pub fn attr(target: Expr, attr: Attribute) -> Expr {
        Expr::AttributeRead {
            target: Box::new(target),
            attr,
        }
    }

    pub fn subject_attr(attr: Attribute) -> Expr {
        Expr::attr(Expr::Subject, attr)
    }

    pub fn evaluate(&self, ctx: &EvalContext, subject: Option<EntityId>) -> Value {
        match self {
            Expr::Constant(v) => v.deep_copy(),
            Expr::Subject => Value::EntityRef(subject),
            Expr::AttributeRead { target, attr } => {
                let resolved = target.evaluate(ctx, subject);
                match resolved.as_entity_ref() {
                    Some(entity) => ctx.query(entity, *attr),
                    None => Value::None,
                }
            }
            Expr::MethodCall {
                target,
                method,
                args,
                ..
            } => {
                let resolved = target.evaluate(ctx, subject);
                let evaluated_args = args
                    .iter()
                    .map(|(k, v)| (k.clone(), v.evaluate(ctx, subject)))
                    .collect();
                method(ctx, resolved, &evaluated_args)
            }
            Expr::LockedAttributeRead { inner, memo } => {
                if let Some(stored) = memo.borrow().as_ref() {
                    return stored.clone();
                }
                let value = inner.evaluate(ctx, subject);
                *memo.borrow_mut() = Some(value.clone());
                value
            }
            Expr::BinaryOp { op, left, right } => {
                let l = left.evaluate(ctx, subject);
                let r = right.evaluate(ctx, subject);
                eval_binary_op(*op, l, r)
            }
            Expr::Reduction {
                op,
                attr,
                sequence,
            } => {
                let current = subject
                    .map(|s| ctx.query(s, *attr))
                    .unwrap_or(Value::None);
                let seq = sequence.evaluate(ctx, subject);
                eval_reduction(*op, current, seq)
            }
            Expr::ObjectCount { selection } => Value::Int(selection.filter(ctx).len() as i64),
            Expr::Timestamp => Value::Int(Timestamp::next().into()),
            Expr::FreshUuid => Value::Str(Uuid::new_v4().to_string()),
        }
    }
}

fn eval_binary_op(op: BinOp, left: Value, right: Value) -> Value {
    match op {
        BinOp::Add => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
            (Value::StrSet(a), Value::StrSet(b)) => {
                Value::StrSet(a.union(&b).cloned().collect())
            }
            _ => Value::None,
        },
        BinOp::Sub => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a - b),
            (Value::StrSet(a), Value::StrSet(b)) => {
                Value::StrSet(a.difference(&b).cloned().collect())
            }
            _ => Value::None,
        },
        BinOp::Eq => Value::Bool(left == right),
        BinOp::Ne => Value::Bool(left != right),
        BinOp::Lt => Value::Bool(cmp_ints(&left, &right).is_some_and(|o| o.is_lt())),
        BinOp::Le => Value::Bool(cmp_ints(&left, &right).is_some_and(|o| o.is_le())),
        BinOp::Gt => Value::Bool(cmp_ints(&left, &right).is_some_and(|o| o.is_gt())),
        BinOp::Ge => Value::Bool(cmp_ints(&left, &right).is_some_and(|o| o.is_ge())),
        BinOp::In => match (&left, &right) {
            (Value::Str(needle), Value::StrSet(haystack)) => Value::Bool(haystack.contains(needle)),
            _ => Value::Bool(false),
        },
    }
}

fn cmp_ints(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    Some(left.as_int()?.cmp(&right.as_int()?))
}

fn eval_reduction(op: ReduceOp, current: Value, sequence: Value) -> Value {
    match (op, current, sequence) {
        (ReduceOp::Concat, Value::StrSet(mut a), Value::StrSet(b)) => {
            a.extend(b);
            Value::StrSet(a)
        }
        (ReduceOp::Union, Value::StrSet(a), Value::StrSet(b)) => {
            Value::StrSet(a.union(&b).cloned().collect())
        }
        (ReduceOp::Diff, Value::StrSet(a), Value::StrSet(b)) => {
            Value::StrSet(a.difference(&b).cloned().collect())
        }
        _ => Value::None,
    }
}
