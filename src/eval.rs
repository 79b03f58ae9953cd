use crate::errors::{EvalError, UnsupportedOperationError};
use crate::expr::{Expression, Operation};
use crate::ops::OpKind;
use crate::value::Value;

/// Evaluation result: either a value or an error
pub type EvalResult = Result<Value, EvalError>;

/// Reduces an expression to a single real or complex value.
///
/// Arguments are reduced first (post-order), then folded pairwise left to
/// right. If any operand of an n-ary arithmetic operation reduces to a
/// complex value, the whole operand list is promoted to the complex domain
/// and the operation's complex rule folds it. Unary transcendental
/// operations dispatch their single operand to the real or complex rule
/// depending on its domain.
///
/// Recursion depth equals the tree depth; very deep expressions are
/// limited only by the host call stack.
pub fn evaluate(expr: &Expression) -> EvalResult {
    match expr {
        Expression::Number(v) => Ok(v.clone()),
        Expression::Complex(c) => Ok(Value::Complex(*c)),
        Expression::Constant(k) => Ok(Value::Float(k.value())),
        Expression::Operation(op) => eval_operation(op),
    }
}

fn eval_operation(op: &Operation) -> EvalResult {
    let mut reduced = Vec::with_capacity(op.args.len());
    for arg in &op.args {
        reduced.push(evaluate(arg)?);
    }

    match op.kind {
        OpKind::Unary(func) => {
            if reduced.is_empty() {
                return Err(EvalError::EmptyOperation(func.symbol()));
            }
            if reduced.len() > 1 {
                return Err(UnsupportedOperationError::UnaryArity(func.symbol(), reduced.len()).into());
            }
            // length checked above - unwrap is fine
            let operand = reduced.pop().unwrap();
            match operand {
                Value::Complex(z) => Ok(Value::Complex(func.op_complex(z)?)),
                real => Ok(Value::Float(func.op_real(real.as_f64())?)),
            }
        }
        OpKind::Binary(bin) => {
            if reduced.is_empty() {
                return Err(EvalError::EmptyOperation(bin.symbol()));
            }
            let any_complex = reduced.iter().any(|v| matches!(v, Value::Complex(..)));
            let mut operands = reduced.into_iter();
            // non-empty - unwrap is fine
            if any_complex {
                let mut acc = operands.next().unwrap().as_complex();
                for v in operands {
                    acc = bin.op_complex(acc, v.as_complex())?;
                }
                Ok(Value::Complex(acc))
            } else {
                let mut acc = operands.next().unwrap();
                for v in operands {
                    acc = bin.op_real(&acc, &v)?;
                }
                Ok(acc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ArithmeticError;
    use crate::expr::Constant;
    use crate::ops::{BinaryOp, UnaryFunction};
    use num_complex::Complex;

    fn num(i: i64) -> Expression {
        Expression::Number(Value::Int(i))
    }

    fn cplx(re: f64, im: f64) -> Expression {
        Expression::Complex(Complex::new(re, im))
    }

    #[test]
    fn test_leaves() {
        assert_eq!(evaluate(&num(7)), Ok(Value::Int(7)));
        assert_eq!(
            evaluate(&cplx(1.0, -2.0)),
            Ok(Value::Complex(Complex::new(1.0, -2.0)))
        );
        assert_eq!(
            evaluate(&Expression::Constant(Constant::E)),
            Ok(Value::Float(std::f64::consts::E))
        );
    }

    #[test]
    fn test_nary_fold() {
        // (3, 4, 5) + folds to 12
        let op = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![num(3), num(4), num(5)],
            None,
        );
        assert_eq!(evaluate(&Expression::Operation(op)), Ok(Value::Int(12)));
        // left fold: (20, 4, 2) / is (20/4)/2
        let op = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Divides),
            vec![num(20), num(4), num(2)],
            None,
        );
        assert_eq!(evaluate(&Expression::Operation(op)), Ok(Value::Int(2)));
        // a single operand folds to itself
        let op = Operation::new(crate::ops::OpKind::Binary(BinaryOp::Plus), vec![num(9)], None);
        assert_eq!(evaluate(&Expression::Operation(op)), Ok(Value::Int(9)));
    }

    #[test]
    fn test_complex_promotion() {
        // one complex operand promotes the whole chain
        let op = Operation::new(
            crate::ops::OpKind::Binary(BinaryOp::Plus),
            vec![num(1), cplx(0.0, 2.0), num(3)],
            None,
        );
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Ok(Value::Complex(Complex::new(4.0, 2.0)))
        );
        // even a zero-imaginary complex operand keeps the result complex
        let op = Operation::binary(BinaryOp::Times, num(2), cplx(3.0, 0.0));
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Ok(Value::Complex(Complex::new(6.0, 0.0)))
        );
    }

    #[test]
    fn test_unary_dispatch() {
        let real = Operation::unary(UnaryFunction::Sin, num(1));
        assert_eq!(
            evaluate(&Expression::Operation(real)),
            Ok(Value::Float(1.0f64.sin()))
        );
        let complex = Operation::unary(UnaryFunction::Sin, cplx(0.0, 1.0));
        match evaluate(&Expression::Operation(complex)) {
            Ok(Value::Complex(c)) => {
                assert!((c.re - 0.0).abs() < 1e-12);
                assert!((c.im - 1.0f64.sinh()).abs() < 1e-12);
            }
            other => panic!("expected complex result, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_operation() {
        let op = Operation::new(crate::ops::OpKind::Binary(BinaryOp::Plus), vec![], None);
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Err(EvalError::EmptyOperation("+"))
        );
        let op = Operation::new(crate::ops::OpKind::Unary(UnaryFunction::Sin), vec![], None);
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Err(EvalError::EmptyOperation("sin"))
        );
    }

    #[test]
    fn test_unary_arity_misuse() {
        let op = Operation::new(
            crate::ops::OpKind::Unary(UnaryFunction::Cos),
            vec![num(1), num(2)],
            None,
        );
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Err(UnsupportedOperationError::UnaryArity("cos", 2).into())
        );
    }

    #[test]
    fn test_complex_modulo_unsupported() {
        let op = Operation::binary(BinaryOp::Modulo, cplx(1.0, 1.0), num(2));
        assert_eq!(
            evaluate(&Expression::Operation(op)),
            Err(UnsupportedOperationError::NoComplexRule("%").into())
        );
    }

    #[test]
    fn test_domain_error_propagates() {
        // 1 + sqrt(-4): the inner error surfaces unchanged
        let inner = Operation::unary(UnaryFunction::Sqrt, num(-4));
        let outer = Operation::binary(BinaryOp::Plus, num(1), Expression::Operation(inner));
        assert_eq!(
            evaluate(&Expression::Operation(outer)),
            Err(ArithmeticError::NegativeSqrt("-4.0".to_string()).into())
        );
    }
}
