use std::fmt;

use crate::expr::{Expression, Notation, Operation};
use crate::ops::OpKind;
use crate::value::Value;

/// Resolves notation conflicts for one rendering: returns a copy of the
/// tree whose root operation carries `notation`, with every nested
/// operation that disagreed with its parent rewritten to match it. A
/// child that already agrees is kept as-is, subtree included.
pub fn resolve_notation(expr: &Expression, notation: Notation) -> Expression {
    match expr {
        Expression::Operation(op) => Expression::Operation(resolve_operation(op, notation)),
        other => other.clone(),
    }
}

fn resolve_operation(op: &Operation, notation: Notation) -> Operation {
    let args = op
        .args
        .iter()
        .map(|child| match child {
            Expression::Operation(c) if c.notation != notation => {
                Expression::Operation(resolve_operation(c, notation))
            }
            other => other.clone(),
        })
        .collect();
    Operation {
        kind: op.kind,
        args,
        notation,
    }
}

/// Renders an expression in the given notation. Never fails: unexpected
/// arities fall back to the generic list form.
pub fn render(expr: &Expression, notation: Notation) -> String {
    text_of(&resolve_notation(expr, notation))
}

fn text_of(expr: &Expression) -> String {
    match expr {
        Expression::Number(v) => format!("{}", v),
        Expression::Complex(c) => format!("{}", Value::Complex(*c)),
        Expression::Constant(k) => k.name().to_string(),
        Expression::Operation(op) => operation_text(op),
    }
}

fn operation_text(op: &Operation) -> String {
    // unary transcendentals render as a function call in every notation
    // except postfix, where the call trails its argument
    if let OpKind::Unary(func) = op.kind {
        if op.args.len() == 1 {
            let arg = text_of(&op.args[0]);
            return match op.notation {
                Notation::Prefix | Notation::Infix => format!("{}({})", func.symbol(), arg),
                Notation::Postfix => format!("({}){}", arg, func.symbol()),
            };
        }
    }

    let symbol = op.symbol();
    let parts: Vec<String> = op.args.iter().map(text_of).collect();
    match op.notation {
        Notation::Infix => format!("( {} )", parts.join(&format!(" {} ", symbol))),
        Notation::Prefix => format!("{} ({})", symbol, parts.join(", ")),
        Notation::Postfix => format!("({}) {}", parts.join(", "), symbol),
    }
}

impl fmt::Display for Expression {
    /// Renders the expression with each node's stored notation tag.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", text_of(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Constant;
    use crate::ops::{BinaryOp, UnaryFunction};
    use crate::value::Value;
    use num_complex::Complex;

    fn num(i: i64) -> Expression {
        Expression::Number(Value::Int(i))
    }

    #[test]
    fn test_binary_notations() {
        for (op, symbol) in [
            (BinaryOp::Plus, "+"),
            (BinaryOp::Minus, "-"),
            (BinaryOp::Times, "*"),
            (BinaryOp::Divides, "/"),
        ]
        .iter()
        {
            let e = Expression::Operation(Operation::binary(*op, num(8), num(6)));
            assert_eq!(render(&e, Notation::Prefix), format!("{} (8, 6)", symbol));
            assert_eq!(render(&e, Notation::Infix), format!("( 8 {} 6 )", symbol));
            assert_eq!(render(&e, Notation::Postfix), format!("(8, 6) {}", symbol));
        }
    }

    #[test]
    fn test_nary_postfix() {
        // ((3, 4, 5) +, (5, 3) -, 5) /
        let plus = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![num(3), num(4), num(5)],
            None,
        );
        let minus = Operation::binary(BinaryOp::Minus, num(5), num(3));
        let div = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Divides),
            vec![
                Expression::Operation(plus),
                Expression::Operation(minus),
                num(5),
            ],
            Some(Notation::Postfix),
        );
        let e = Expression::Operation(div);
        assert_eq!(format!("{}", e), "((3, 4, 5) +, (5, 3) -, 5) /");
    }

    #[test]
    fn test_nested_infix() {
        // ( ( ( 3 + 2 ) * ( 5 + ( 4 / 2 ) ) ) / 2 )
        let plus1 = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![num(3), num(2)],
            Some(Notation::Prefix),
        );
        let div1 = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Divides),
            vec![num(4), num(2)],
            Some(Notation::Prefix),
        );
        let plus2 = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![num(5), Expression::Operation(div1)],
            None,
        );
        let times = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Times),
            vec![Expression::Operation(plus1), Expression::Operation(plus2)],
            Some(Notation::Postfix),
        );
        let div2 = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Divides),
            vec![Expression::Operation(times), num(2)],
            Some(Notation::Infix),
        );
        let e = Expression::Operation(div2);
        assert_eq!(format!("{}", e), "( ( ( 3 + 2 ) * ( 5 + ( 4 / 2 ) ) ) / 2 )");
    }

    #[test]
    fn test_function_rendering() {
        let e = Expression::Operation(Operation::unary(UnaryFunction::Sin, num(2)));
        assert_eq!(render(&e, Notation::Prefix), "sin(2)");
        assert_eq!(render(&e, Notation::Infix), "sin(2)");
        assert_eq!(render(&e, Notation::Postfix), "(2)sin");
        let nested = Expression::Operation(Operation::unary(
            UnaryFunction::Sqrt,
            Expression::Operation(Operation::binary(BinaryOp::Plus, num(1), num(3))),
        ));
        assert_eq!(render(&nested, Notation::Infix), "sqrt(( 1 + 3 ))");
    }

    #[test]
    fn test_leaves() {
        assert_eq!(render(&num(8), Notation::Prefix), "8");
        assert_eq!(render(&Expression::Number(Value::Float(2.5)), Notation::Infix), "2.5");
        assert_eq!(
            render(&Expression::Complex(Complex::new(3.0, 4.0)), Notation::Postfix),
            "3.0+4.0i"
        );
        assert_eq!(render(&Expression::Constant(Constant::Pi), Notation::Infix), "PI");
    }

    #[test]
    fn test_conflict_propagation() {
        // root postfix forces the prefix-tagged inner nodes to postfix
        let mut inner = Operation::binary(BinaryOp::Plus, num(1), num(2));
        inner.notation = Notation::Prefix;
        let mid = Operation {
            kind: crate::ops::OpKind::Binary(BinaryOp::Times),
            args: vec![Expression::Operation(inner), num(3)],
            notation: Notation::Prefix,
        };
        let root = Operation {
            kind: crate::ops::OpKind::Binary(BinaryOp::Minus),
            args: vec![Expression::Operation(mid), num(4)],
            notation: Notation::Postfix,
        };
        let out = render(&Expression::Operation(root), Notation::Postfix);
        assert_eq!(out, "(((1, 2) +, 3) *, 4) -");
    }

    #[test]
    fn test_agreeing_child_shields_subtree() {
        // the mid node already agrees with the root, so its differing
        // child keeps its own tag
        let mut inner = Operation::binary(BinaryOp::Plus, num(1), num(2));
        inner.notation = Notation::Prefix;
        let mid = Operation {
            kind: crate::ops::OpKind::Binary(BinaryOp::Times),
            args: vec![Expression::Operation(inner), num(3)],
            notation: Notation::Postfix,
        };
        let root = Operation {
            kind: crate::ops::OpKind::Binary(BinaryOp::Minus),
            args: vec![Expression::Operation(mid), num(4)],
            notation: Notation::Postfix,
        };
        let out = render(&Expression::Operation(root), Notation::Postfix);
        assert_eq!(out, "((+ (1, 2), 3) *, 4) -");
    }

    #[test]
    fn test_render_is_pure() {
        let e = Expression::Operation(Operation::binary(BinaryOp::Plus, num(1), num(2)));
        let first = render(&e, Notation::Prefix);
        let second = render(&e, Notation::Prefix);
        assert_eq!(first, second);
        // rendering postfix did not disturb the original tree
        let _ = render(&e, Notation::Postfix);
        assert_eq!(render(&e, Notation::Infix), "( 1 + 2 )");
    }

    #[test]
    fn test_odd_arities_never_panic() {
        let empty = Expression::Operation(Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![],
            None,
        ));
        assert_eq!(render(&empty, Notation::Prefix), "+ ()");
        assert_eq!(render(&empty, Notation::Infix), "(  )");
        assert_eq!(render(&empty, Notation::Postfix), "() +");
        // a unary function with two arguments falls back to the list form
        let odd = Expression::Operation(Operation::new(
            crate::ops::OpKind::Unary(UnaryFunction::Sin),
            vec![num(1), num(2)],
            None,
        ));
        assert_eq!(render(&odd, Notation::Prefix), "sin (1, 2)");
    }
}
