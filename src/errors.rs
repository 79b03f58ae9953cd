use std::error;
use std::fmt;

/// Raised when an expression node cannot be built from its inputs.
///
/// A null argument list, the other construction failure of the reference
/// model, is unrepresentable here: an operation always owns a (possibly
/// empty) vector of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    UnknownConstant(String),
}

/// Raised for domain violations discovered while evaluating an expression.
/// The offending value or subexpression is kept for the message.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    DividedByZero(String),
    ModuloByZero(String),
    NonPositiveLn(String),
    NonPositiveLog(String),
    LogOfZero(&'static str),
    NegativeSqrt(String),
    AsinOutOfRange(String),
    AcosOutOfRange(String),
    TangentUndefined(String),
    ComplexTangentUndefined,
}

/// Raised for lexical or structural violations while parsing. The parser
/// does no recovery: the first violation is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidToken(String),
    InvalidComplexNumber(String),
    MismatchedBrackets,
    FunctionWithoutBracket(String),
    FunctionAfterUnaryMinus(String),
    MissingOperand(String),
    TooManyOperands,
    EmptyExpression,
}

/// Raised when an evaluation path is invoked on an operation that does not
/// carry it: a caller misuse, not bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedOperationError {
    NoComplexRule(&'static str),
    UnaryArity(&'static str, usize),
}

/// Everything `evaluate` can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Arithmetic(ArithmeticError),
    Unsupported(UnsupportedOperationError),
    EmptyOperation(&'static str),
}

impl From<ArithmeticError> for EvalError {
    fn from(e: ArithmeticError) -> Self {
        EvalError::Arithmetic(e)
    }
}

impl From<UnsupportedOperationError> for EvalError {
    fn from(e: UnsupportedOperationError) -> Self {
        EvalError::Unsupported(e)
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConstructionError::UnknownConstant(s) => write!(f, "Unknown mathematical constant '{}'", s),
        }
    }
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithmeticError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),
            ArithmeticError::ModuloByZero(s) => write!(f, "'{}' modulo by zero", s),
            ArithmeticError::NonPositiveLn(s) => {
                write!(f, "Cannot compute the natural logarithm of a non-positive number ({})", s)
            }
            ArithmeticError::NonPositiveLog(s) => {
                write!(f, "Cannot compute the base-10 logarithm of a non-positive number ({})", s)
            }
            ArithmeticError::LogOfZero(name) => write!(f, "Cannot compute the {} of zero", name),
            ArithmeticError::NegativeSqrt(s) => {
                write!(f, "Cannot compute the square root of a negative number ({})", s)
            }
            ArithmeticError::AsinOutOfRange(s) => {
                write!(f, "Arc sine is only defined for values in the range [-1, 1], got {}", s)
            }
            ArithmeticError::AcosOutOfRange(s) => {
                write!(f, "Arc cosine is only defined for values in the range [-1, 1], got {}", s)
            }
            ArithmeticError::TangentUndefined(s) => {
                write!(f, "Tangent is undefined at odd multiples of pi/2 ({})", s)
            }
            ArithmeticError::ComplexTangentUndefined => {
                write!(f, "Tangent is undefined for this complex number")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidToken(s) => write!(f, "Invalid token '{}'", s),
            ParseError::InvalidComplexNumber(s) => write!(f, "Invalid complex number '{}'", s),
            ParseError::MismatchedBrackets => write!(f, "Mismatched brackets"),
            ParseError::FunctionWithoutBracket(s) => {
                write!(f, "Function '{}' must be followed by an opening bracket", s)
            }
            ParseError::FunctionAfterUnaryMinus(s) => {
                write!(f, "Function '{}' cannot be preceded by a unary minus", s)
            }
            ParseError::MissingOperand(s) => write!(f, "Missing operand for '{}'", s),
            ParseError::TooManyOperands => write!(f, "Too many operands"),
            ParseError::EmptyExpression => write!(f, "Nothing to parse"),
        }
    }
}

impl fmt::Display for UnsupportedOperationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnsupportedOperationError::NoComplexRule(s) => {
                write!(f, "Operation '{}' is not supported for complex numbers", s)
            }
            UnsupportedOperationError::UnaryArity(s, n) => {
                write!(f, "Function '{}' takes exactly one argument, got {}", s, n)
            }
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::Arithmetic(e) => write!(f, "{}", e),
            EvalError::Unsupported(e) => write!(f, "{}", e),
            EvalError::EmptyOperation(s) => write!(f, "Operation '{}' has no arguments to evaluate", s),
        }
    }
}

impl error::Error for ConstructionError {}
impl error::Error for ArithmeticError {}
impl error::Error for ParseError {}
impl error::Error for UnsupportedOperationError {}
impl error::Error for EvalError {}
