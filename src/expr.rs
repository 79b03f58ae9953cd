use std::f64::consts;
use std::fmt;

use num_complex::Complex;

use crate::errors::ConstructionError;
use crate::ops::{BinaryOp, OpKind, UnaryFunction};
use crate::value::Value;

pub const PHI: f64 = 1.618_033_988_749_895;

/// How an operation node renders itself. The tag is carried per node and
/// propagated to nested operations by an explicit conflict-resolution
/// pass, never implicitly at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Prefix,
    Infix,
    Postfix,
}

impl Default for Notation {
    fn default() -> Notation {
        Notation::Infix
    }
}

/// Named mathematical constants. Equality and hashing are name-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    Phi,
    Sqrt2,
}

impl Constant {
    /// Resolves a constant by name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, ConstructionError> {
        match name.to_lowercase().as_str() {
            "pi" => Ok(Constant::Pi),
            "e" => Ok(Constant::E),
            "phi" => Ok(Constant::Phi),
            "sqrt2" => Ok(Constant::Sqrt2),
            _ => Err(ConstructionError::UnknownConstant(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constant::Pi => "PI",
            Constant::E => "E",
            Constant::Phi => "PHI",
            Constant::Sqrt2 => "SQRT2",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => consts::PI,
            Constant::E => consts::E,
            Constant::Phi => PHI,
            Constant::Sqrt2 => consts::SQRT_2,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An arithmetic expression: a numeric leaf, a complex leaf, a named
/// constant, or an n-ary operation over sub-expressions.
#[derive(Debug, Clone)]
pub enum Expression {
    Number(Value),
    Complex(Complex<f64>),
    Constant(Constant),
    Operation(Operation),
}

/// An operation node: the operation itself (which fixes the symbol, the
/// neutral element, and the evaluation rules), an ordered argument list,
/// and a notation tag.
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OpKind,
    pub args: Vec<Expression>,
    pub notation: Notation,
}

impl Operation {
    /// Builds an operation node. An empty argument list is legal here;
    /// evaluation reports it. Nested operations whose notation conflicts
    /// with this node's are rewritten to match it.
    pub fn new(kind: OpKind, args: Vec<Expression>, notation: Option<Notation>) -> Operation {
        let mut op = Operation {
            kind,
            args,
            notation: notation.unwrap_or_default(),
        };
        op.resolve_nested_conflicts();
        op
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Operation {
        Operation::new(OpKind::Binary(op), vec![lhs, rhs], None)
    }

    pub fn unary(func: UnaryFunction, arg: Expression) -> Operation {
        Operation::new(OpKind::Unary(func), vec![arg], None)
    }

    pub fn symbol(&self) -> &'static str {
        self.kind.symbol()
    }

    /// The neutral element carried by the operation; unary transcendentals
    /// have none and report 0. Documentation only, evaluation ignores it.
    pub fn neutral(&self) -> i64 {
        match self.kind {
            OpKind::Binary(b) => b.neutral(),
            OpKind::Unary(..) => 0,
        }
    }

    /// Appends more arguments to the operation. Arguments are only ever
    /// added, never removed.
    pub fn add_params(&mut self, params: Vec<Expression>) {
        self.args.extend(params);
    }

    /// Forces this node's notation onto nested operations that disagree
    /// with it, recursing only into the nodes that were rewritten.
    pub fn resolve_nested_conflicts(&mut self) {
        let notation = self.notation;
        for child in &mut self.args {
            if let Expression::Operation(op) = child {
                if op.notation != notation {
                    op.notation = notation;
                    op.resolve_nested_conflicts();
                }
            }
        }
    }
}

impl Expression {
    /// Nesting depth: 0 for leaves, 1 + the deepest argument for
    /// operations.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Operation(op) => 1 + op.args.iter().map(Expression::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Number of operation nodes in the expression.
    pub fn count_ops(&self) -> usize {
        match self {
            Expression::Operation(op) => 1 + op.args.iter().map(Expression::count_ops).sum::<usize>(),
            _ => 0,
        }
    }

    /// Number of leaves (numbers, complex numbers, constants) in the
    /// expression.
    pub fn count_leaves(&self) -> usize {
        match self {
            Expression::Operation(op) => op.args.iter().map(Expression::count_leaves).sum(),
            _ => 1,
        }
    }
}

impl PartialEq for Expression {
    /// Leaves compare after numeric normalization (an integer-valued real
    /// equals a float of the same magnitude), constants by name, and
    /// operations by kind and argument list. Notation tags are ignored.
    fn eq(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::Number(a), Expression::Number(b)) => a.numeric_eq(b),
            (Expression::Complex(a), Expression::Complex(b)) => a == b,
            (Expression::Constant(a), Expression::Constant(b)) => a == b,
            (Expression::Operation(a), Expression::Operation(b)) => {
                a.kind == b.kind && a.args == b.args
            }
            (_, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(i: i64) -> Expression {
        Expression::Number(Value::Int(i))
    }

    #[test]
    fn test_constants() {
        assert_eq!(Constant::from_name("pi"), Ok(Constant::Pi));
        assert_eq!(Constant::from_name("PI"), Ok(Constant::Pi));
        assert_eq!(Constant::from_name("Sqrt2"), Ok(Constant::Sqrt2));
        assert_eq!(
            Constant::from_name("tau"),
            Err(ConstructionError::UnknownConstant("tau".to_string()))
        );
        assert!((Constant::Phi.value() - (1.0 + 5.0f64.sqrt()) / 2.0).abs() < 1e-15);
        assert_eq!(Constant::Pi.name(), "PI");
    }

    #[test]
    fn test_counting() {
        let e = Expression::Operation(Operation::binary(
            BinaryOp::Plus,
            num(3),
            Expression::Operation(Operation::binary(BinaryOp::Times, num(4), num(5))),
        ));
        assert_eq!(e.depth(), 2);
        assert_eq!(e.count_ops(), 2);
        assert_eq!(e.count_leaves(), 3);
        assert_eq!(num(1).depth(), 0);
        assert_eq!(num(1).count_ops(), 0);
        assert_eq!(num(1).count_leaves(), 1);

        let empty = Expression::Operation(Operation::new(OpKind::Binary(BinaryOp::Plus), vec![], None));
        assert_eq!(empty.depth(), 1);
        assert_eq!(empty.count_leaves(), 0);
    }

    #[test]
    fn test_equality() {
        assert_eq!(num(3), Expression::Number(Value::Float(3.0)));
        assert_eq!(
            Expression::Complex(Complex::new(2.0, 1.0)),
            Expression::Complex(Complex::new(2.0, 1.0))
        );
        assert_ne!(num(3), Expression::Complex(Complex::new(3.0, 0.0)));
        let a = Operation::binary(BinaryOp::Plus, num(1), num(2));
        let mut b = Operation::binary(BinaryOp::Plus, num(1), num(2));
        b.notation = Notation::Postfix;
        assert_eq!(Expression::Operation(a.clone()), Expression::Operation(b));
        let c = Operation::binary(BinaryOp::Minus, num(1), num(2));
        assert_ne!(Expression::Operation(a), Expression::Operation(c));
    }

    #[test]
    fn test_construction_conflict_pass() {
        let inner = Operation::new(
            OpKind::Binary(BinaryOp::Plus),
            vec![num(3), num(2)],
            Some(Notation::Prefix),
        );
        let outer = Operation::new(
            OpKind::Binary(BinaryOp::Divides),
            vec![Expression::Operation(inner), num(2)],
            Some(Notation::Infix),
        );
        match &outer.args[0] {
            Expression::Operation(op) => assert_eq!(op.notation, Notation::Infix),
            _ => panic!("expected operation"),
        }
    }

    #[test]
    fn test_add_params() {
        let mut op = Operation::binary(BinaryOp::Plus, num(1), num(2));
        op.add_params(vec![num(3), num(4)]);
        assert_eq!(op.args.len(), 4);
    }

    #[test]
    fn test_symbol_and_neutral() {
        let plus = Operation::binary(BinaryOp::Plus, num(1), num(2));
        assert_eq!(plus.symbol(), "+");
        assert_eq!(plus.neutral(), 0);
        let times = Operation::binary(BinaryOp::Times, num(1), num(2));
        assert_eq!(times.neutral(), 1);
        let sin = Operation::unary(UnaryFunction::Sin, num(1));
        assert_eq!(sin.symbol(), "sin");
        assert_eq!(sin.neutral(), 0);
    }
}
