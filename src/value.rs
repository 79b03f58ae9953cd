use std::fmt;
use std::str;

use num_complex::Complex;
use num_traits::Zero;

use crate::errors::ParseError;

/// A computed value: either a real number carrying its formatting width
/// (integer or float) or a complex number. Every binary reduction picks
/// the wider of its operands' widths, so `2+3` stays an integer while
/// `2+3.0` becomes a float and `2+3i` becomes complex.
#[derive(Clone)]
pub enum Value {
    /// Integer number
    Int(i64),
    /// Float number
    Float(f64),
    /// Complex number
    Complex(Complex<f64>),
}

const F64_BUF_LEN: usize = 48;
fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(g) => write!(f, "{}", format_f64(*g)),
            Value::Complex(c) => {
                if c.im >= 0.0 {
                    write!(f, "{}+{}i", format_f64(c.re), format_f64(c.im))
                } else {
                    write!(f, "{}{}i", format_f64(c.re), format_f64(c.im))
                }
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(i) => write!(f, "Int({:?})", i),
            Value::Float(g) => write!(f, "Float({:?})", g),
            Value::Complex(c) => write!(f, "Complex({:?})", c),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, &other) {
            (Value::Int(i1), Value::Int(i2)) => i1 == i2,
            (Value::Float(f1), Value::Float(f2)) => f1 == f2,
            (Value::Complex(c1), Value::Complex(c2)) => c1 == c2,
            (_, _) => false,
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Int(0)
    }
}

impl Value {
    pub fn new() -> Self {
        Default::default()
    }

    /// Real projection of the value. For complex numbers it is the real part.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Complex(c) => c.re,
        }
    }

    /// Promotes the value to the complex domain (zero imaginary part for
    /// real values).
    pub fn as_complex(&self) -> Complex<f64> {
        match self {
            Value::Complex(c) => *c,
            other => Complex::new(other.as_f64(), 0.0),
        }
    }

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Complex(c) => c.is_zero(),
        }
    }

    /// Equality after numeric normalization: an integer-valued `Int`
    /// equals a `Float` of the same magnitude, and a real value never
    /// equals a complex one with a non-zero imaginary part.
    pub fn numeric_eq(&self, other: &Value) -> bool {
        self.as_complex() == other.as_complex()
    }

    /// Modulus of the value as seen in the complex plane
    pub fn norm(&self) -> f64 {
        self.as_complex().norm()
    }

    /// Argument of the value as seen in the complex plane
    pub fn arg(&self) -> f64 {
        self.as_complex().arg()
    }

    /// Real part of the value; the value itself for real widths
    pub fn re(&self) -> f64 {
        self.as_f64()
    }

    /// Imaginary part of the value; zero for real widths
    pub fn im(&self) -> f64 {
        match self {
            Value::Complex(c) => c.im,
            _ => 0.0,
        }
    }

    /// Conjugates a complex number; real values are returned unchanged
    pub fn conj(self) -> Value {
        match self {
            Value::Complex(c) => Value::Complex(c.conj()),
            other => other,
        }
    }

    /// Inverts the sign of the value
    pub fn negate(self) -> Value {
        match self {
            Value::Int(i) => match i.checked_neg() {
                Some(n) => Value::Int(n),
                None => Value::Float(-(i as f64)),
            },
            Value::Float(f) => Value::Float(-f),
            Value::Complex(c) => Value::Complex(-c),
        }
    }

    /// Convert &str to an integer value. Values out of the `i64` range
    /// fall back to the float width.
    pub fn from_str_integer(s: &str) -> Result<Value, ParseError> {
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        match s.parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(..) => Err(ParseError::InvalidToken(s.to_string())),
        }
    }

    /// Convert &str to a float value: `1.023`, `2.`, `.5`
    pub fn from_str_float(s: &str) -> Result<Value, ParseError> {
        match s.parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(..) => Err(ParseError::InvalidToken(s.to_string())),
        }
    }

    /// Convert &str to a complex number.
    /// Supported formats (decimal parts and a leading sign are optional):
    /// * real only - `3`, `-2.5`
    /// * imaginary only - `4i`, `-0.5i`, `i`, `-i`
    /// * both parts - `3+4i`, `-2-3i`, `+4-i`
    ///
    /// An empty magnitude before `i` defaults the coefficient to 1.
    /// Whitespace is ignored.
    pub fn from_str_complex(input: &str) -> Result<Complex<f64>, ParseError> {
        let s: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if s.is_empty() {
            return Err(ParseError::InvalidComplexNumber(input.to_string()));
        }
        let low = s.to_lowercase();
        if low == "i" || low == "+i" {
            return Ok(Complex::new(0.0, 1.0));
        }
        if low == "-i" {
            return Ok(Complex::new(0.0, -1.0));
        }
        if !low.ends_with('i') {
            return match s.parse::<f64>() {
                Ok(f) => Ok(Complex::new(f, 0.0)),
                Err(..) => Err(ParseError::InvalidComplexNumber(input.to_string())),
            };
        }

        let body = &s[..s.len() - 1];
        // the sign separating the parts is never the leading one
        let split_pos = body
            .char_indices()
            .skip(1)
            .filter(|(_, c)| *c == '+' || *c == '-')
            .map(|(i, _)| i)
            .last();
        if let Some(p) = split_pos {
            let (re_str, im_str) = body.split_at(p);
            let re = match re_str.parse::<f64>() {
                Ok(f) => f,
                Err(..) => return Err(ParseError::InvalidComplexNumber(input.to_string())),
            };
            let im = match im_str {
                "+" => 1.0,
                "-" => -1.0,
                other => match other.parse::<f64>() {
                    Ok(f) => f,
                    Err(..) => return Err(ParseError::InvalidComplexNumber(input.to_string())),
                },
            };
            Ok(Complex::new(re, im))
        } else {
            match body.parse::<f64>() {
                Ok(f) => Ok(Complex::new(0.0, f)),
                Err(..) => Err(ParseError::InvalidComplexNumber(input.to_string())),
            }
        }
    }
}
