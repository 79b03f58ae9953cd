//! # Expression calculator
//!
//! The library parses, evaluates, and renders arithmetic expressions built
//! from numbers, complex numbers, named constants, n-ary arithmetic
//! operations, and unary transcendental functions.
//!
//! Real and complex arithmetic mix transparently: as soon as one operand of
//! a chain is complex, the whole chain is computed in the complex domain.
//! `sqrt(-4)` of a real number is a domain error, while `sqrt(-4+0i)`
//! evaluates to `0+2i`. Real results carry a formatting width: `7 / 2`
//! stays the integer `3` while `7.0 / 2` is the float `3.5`.
//!
//! Expressions are ordinary trees that can also be built by hand and
//! rendered in prefix, infix, or postfix notation; the notation chosen for
//! a node wins over the notation of any nested operation.
//!
//! The list of supported functions (case-insensitive):
//! * trigonometric functions and their inverses: sin, cos, tan, asin, acos, atan
//! * natural and base-10 logarithm: ln, log
//! * exponent and square root: exp, sqrt
//!
//! Operators, starting from the highest priority:
//! * `-` - unary minus
//! * `^` - power (right-associative: `2^3^2` is `2^(3^2)`)
//! * `*`, `/`, `%` - multiplication, division, modulo
//! * `+`, `-` - addition, subtraction
//!
//! Three interchangeable bracket families are accepted: `( )`, `[ ]`, `{ }`.
//!
//! Predefined constants (case-insensitive): `PI`, `E`, `PHI`, `SQRT2`.
//!
//! ```
//! use excalc::{evaluate, parse_expression, render, Notation, Value};
//!
//! let expr = parse_expression("2 + 3 * 4").unwrap();
//! assert_eq!(evaluate(&expr), Ok(Value::Int(14)));
//! assert_eq!(render(&expr, Notation::Postfix), "(2, (3, 4) *) +");
//! ```

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod eval;
pub mod expr;
pub mod ops;
pub mod parse;
pub mod render;
pub mod value;

pub use crate::errors::{
    ArithmeticError, ConstructionError, EvalError, ParseError, UnsupportedOperationError,
};
pub use crate::eval::{evaluate, EvalResult};
pub use crate::expr::{Constant, Expression, Notation, Operation};
pub use crate::ops::{BinaryOp, OpKind, UnaryFunction};
pub use crate::parse::parse_expression;
pub use crate::render::{render, resolve_notation};
pub use crate::value::Value;
