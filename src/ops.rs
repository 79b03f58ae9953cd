use std::f64::consts;

use num_complex::Complex;
use num_traits::Zero;

use crate::errors::{ArithmeticError, EvalError, UnsupportedOperationError};
use crate::value::Value;

// tolerance for the undefined-tangent checks
const TAN_EPS: f64 = 1e-10;

/// The arity class of an operation, fixed at the type level: an n-ary
/// arithmetic operation never carries a unary rule and a transcendental
/// function never carries a binary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Binary(BinaryOp),
    Unary(UnaryFunction),
}

impl OpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            OpKind::Binary(b) => b.symbol(),
            OpKind::Unary(u) => u.symbol(),
        }
    }
}

/// N-ary arithmetic operations. Each variant carries a width-aware
/// real-domain reduction rule and, for `+`, `-`, `*`, `/`, a
/// complex-domain rule selected at construction rather than re-derived
/// at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divides,
    Modulo,
    Power,
}

impl BinaryOp {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(BinaryOp::Plus),
            "-" => Some(BinaryOp::Minus),
            "*" => Some(BinaryOp::Times),
            "/" => Some(BinaryOp::Divides),
            "%" => Some(BinaryOp::Modulo),
            "^" => Some(BinaryOp::Power),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divides => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "^",
        }
    }

    /// The identity element of the operation. Kept for documentation and
    /// extension only: evaluation never consumes it.
    pub fn neutral(&self) -> i64 {
        match self {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Modulo => 0,
            BinaryOp::Times | BinaryOp::Divides | BinaryOp::Power => 1,
        }
    }

    /// Binary reduction in the real domain. The result width is the wider
    /// of the two operands; integer results that leave the `i64` range
    /// fall back to the float width.
    pub fn op_real(&self, l: &Value, r: &Value) -> Result<Value, ArithmeticError> {
        match self {
            BinaryOp::Plus => match (l, r) {
                (Value::Int(a), Value::Int(b)) => Ok(int_or_float(a.checked_add(*b), *a as f64 + *b as f64)),
                _ => Ok(Value::Float(l.as_f64() + r.as_f64())),
            },
            BinaryOp::Minus => match (l, r) {
                (Value::Int(a), Value::Int(b)) => Ok(int_or_float(a.checked_sub(*b), *a as f64 - *b as f64)),
                _ => Ok(Value::Float(l.as_f64() - r.as_f64())),
            },
            BinaryOp::Times => match (l, r) {
                (Value::Int(a), Value::Int(b)) => Ok(int_or_float(a.checked_mul(*b), *a as f64 * *b as f64)),
                _ => Ok(Value::Float(l.as_f64() * r.as_f64())),
            },
            BinaryOp::Divides => {
                if r.is_zero() {
                    return Err(ArithmeticError::DividedByZero(format!("{}", l)));
                }
                match (l, r) {
                    (Value::Int(a), Value::Int(b)) => Ok(int_or_float(a.checked_div(*b), *a as f64 / *b as f64)),
                    _ => Ok(Value::Float(l.as_f64() / r.as_f64())),
                }
            }
            BinaryOp::Modulo => {
                if r.is_zero() {
                    return Err(ArithmeticError::ModuloByZero(format!("{}", l)));
                }
                match (l, r) {
                    (Value::Int(a), Value::Int(b)) => Ok(int_or_float(a.checked_rem(*b), *a as f64 % *b as f64)),
                    _ => Ok(Value::Float(l.as_f64() % r.as_f64())),
                }
            }
            BinaryOp::Power => match (l, r) {
                (Value::Int(a), Value::Int(b)) if *b >= 0 => {
                    let exact = if *b <= u32::MAX as i64 {
                        a.checked_pow(*b as u32)
                    } else {
                        None
                    };
                    Ok(int_or_float(exact, (*a as f64).powf(*b as f64)))
                }
                _ => Ok(Value::Float(l.as_f64().powf(r.as_f64()))),
            },
        }
    }

    /// Binary reduction in the complex domain. Only `+`, `-`, `*` and `/`
    /// carry a complex rule; the rest report a misuse.
    pub fn op_complex(&self, l: Complex<f64>, r: Complex<f64>) -> Result<Complex<f64>, EvalError> {
        match self {
            BinaryOp::Plus => Ok(l + r),
            BinaryOp::Minus => Ok(l - r),
            BinaryOp::Times => Ok(l * r),
            BinaryOp::Divides => {
                if r.is_zero() {
                    let frag = format!("{}", Value::Complex(l));
                    return Err(ArithmeticError::DividedByZero(frag).into());
                }
                Ok(l / r)
            }
            BinaryOp::Modulo | BinaryOp::Power => {
                Err(UnsupportedOperationError::NoComplexRule(self.symbol()).into())
            }
        }
    }
}

/// Unary transcendental operations, each carrying a real-domain rule and
/// a complex-domain rule built from the standard closed-form identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Log,
    Exp,
    Sqrt,
}

impl UnaryFunction {
    /// Looks a function up by its keyword. The name must already be
    /// lowercase; keywords are matched case-insensitively by the tokenizer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(UnaryFunction::Sin),
            "cos" => Some(UnaryFunction::Cos),
            "tan" => Some(UnaryFunction::Tan),
            "asin" => Some(UnaryFunction::Asin),
            "acos" => Some(UnaryFunction::Acos),
            "atan" => Some(UnaryFunction::Atan),
            "ln" => Some(UnaryFunction::Ln),
            "log" => Some(UnaryFunction::Log),
            "exp" => Some(UnaryFunction::Exp),
            "sqrt" => Some(UnaryFunction::Sqrt),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Asin => "asin",
            UnaryFunction::Acos => "acos",
            UnaryFunction::Atan => "atan",
            UnaryFunction::Ln => "ln",
            UnaryFunction::Log => "log",
            UnaryFunction::Exp => "exp",
            UnaryFunction::Sqrt => "sqrt",
        }
    }

    /// The real-domain rule. Domain violations name the violated domain
    /// and the offending value.
    pub fn op_real(&self, x: f64) -> Result<f64, ArithmeticError> {
        match self {
            UnaryFunction::Sin => Ok(x.sin()),
            UnaryFunction::Cos => Ok(x.cos()),
            UnaryFunction::Tan => {
                let m = x % consts::PI;
                if (m - consts::FRAC_PI_2).abs() < TAN_EPS || (m + consts::FRAC_PI_2).abs() < TAN_EPS {
                    Err(ArithmeticError::TangentUndefined(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.tan())
                }
            }
            UnaryFunction::Asin => {
                if x < -1.0 || x > 1.0 {
                    Err(ArithmeticError::AsinOutOfRange(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.asin())
                }
            }
            UnaryFunction::Acos => {
                if x < -1.0 || x > 1.0 {
                    Err(ArithmeticError::AcosOutOfRange(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.acos())
                }
            }
            UnaryFunction::Atan => Ok(x.atan()),
            UnaryFunction::Ln => {
                if x <= 0.0 {
                    Err(ArithmeticError::NonPositiveLn(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.ln())
                }
            }
            UnaryFunction::Log => {
                if x <= 0.0 {
                    Err(ArithmeticError::NonPositiveLog(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.log10())
                }
            }
            UnaryFunction::Exp => Ok(x.exp()),
            UnaryFunction::Sqrt => {
                if x < 0.0 {
                    Err(ArithmeticError::NegativeSqrt(format!("{}", Value::Float(x))))
                } else {
                    Ok(x.sqrt())
                }
            }
        }
    }

    /// The complex-domain rule. Inverse trigonometric functions of a value
    /// with zero imaginary part and an in-range real part short-circuit to
    /// their real result.
    pub fn op_complex(&self, z: Complex<f64>) -> Result<Complex<f64>, ArithmeticError> {
        let a = z.re;
        let b = z.im;
        match self {
            // sin(a+bi) = sin(a)cosh(b) + i*cos(a)sinh(b)
            UnaryFunction::Sin => Ok(Complex::new(a.sin() * b.cosh(), a.cos() * b.sinh())),
            // cos(a+bi) = cos(a)cosh(b) - i*sin(a)sinh(b)
            UnaryFunction::Cos => Ok(Complex::new(a.cos() * b.cosh(), -(a.sin() * b.sinh()))),
            // tan(a+bi) = [sin(2a) + i*sinh(2b)] / [cos(2a) + cosh(2b)]
            UnaryFunction::Tan => {
                let den = (2.0 * a).cos() + (2.0 * b).cosh();
                if den.abs() < TAN_EPS {
                    Err(ArithmeticError::ComplexTangentUndefined)
                } else {
                    Ok(Complex::new((2.0 * a).sin() / den, (2.0 * b).sinh() / den))
                }
            }
            // asin(z) = -i * ln(iz + sqrt(1 - z^2))
            UnaryFunction::Asin => {
                if b == 0.0 && a >= -1.0 && a <= 1.0 {
                    return Ok(Complex::new(a.asin(), 0.0));
                }
                let s = csqrt(Complex::new(1.0, 0.0) - z * z);
                let w = cln(Complex::<f64>::i() * z + s);
                Ok(Complex::new(w.im, -w.re))
            }
            // acos(z) = -i * ln(z + i * sqrt(1 - z^2))
            UnaryFunction::Acos => {
                if b == 0.0 && a >= -1.0 && a <= 1.0 {
                    return Ok(Complex::new(a.acos(), 0.0));
                }
                let s = csqrt(Complex::new(1.0, 0.0) - z * z);
                let w = cln(z + Complex::<f64>::i() * s);
                Ok(Complex::new(w.im, -w.re))
            }
            // atan(z) = i/2 * (ln(1 - iz) - ln(1 + iz))
            UnaryFunction::Atan => {
                if b == 0.0 {
                    return Ok(Complex::new(a.atan(), 0.0));
                }
                let iz = Complex::<f64>::i() * z;
                let d = cln(Complex::new(1.0, 0.0) - iz) - cln(Complex::new(1.0, 0.0) + iz);
                Ok(Complex::new(-0.5 * d.im, 0.5 * d.re))
            }
            // ln(a+bi) = ln|z| + i*arg(z)
            UnaryFunction::Ln => {
                if z.is_zero() {
                    Err(ArithmeticError::LogOfZero("natural logarithm"))
                } else {
                    Ok(cln(z))
                }
            }
            // log10(z) = ln(z) / ln(10)
            UnaryFunction::Log => {
                if z.is_zero() {
                    Err(ArithmeticError::LogOfZero("base-10 logarithm"))
                } else {
                    let w = cln(z);
                    Ok(Complex::new(w.re / consts::LN_10, w.im / consts::LN_10))
                }
            }
            // exp(a+bi) = e^a * (cos(b) + i*sin(b))
            UnaryFunction::Exp => {
                let ea = a.exp();
                Ok(Complex::new(ea * b.cos(), ea * b.sin()))
            }
            // sqrt via half-modulus and half-angle
            UnaryFunction::Sqrt => Ok(csqrt(z)),
        }
    }
}

// sqrt(z) = sqrt(|z|) * (cos(arg/2) + i*sin(arg/2))
fn csqrt(z: Complex<f64>) -> Complex<f64> {
    let sr = z.norm().sqrt();
    let half = z.arg() / 2.0;
    Complex::new(sr * half.cos(), sr * half.sin())
}

// ln(z) = ln|z| + i*arg(z); callers guarantee z != 0
fn cln(z: Complex<f64>) -> Complex<f64> {
    Complex::new(z.norm().ln(), z.arg())
}

fn int_or_float(exact: Option<i64>, approx: f64) -> Value {
    match exact {
        Some(i) => Value::Int(i),
        None => Value::Float(approx),
    }
}
