use num_complex::Complex;
use pest::error::InputLocation;
use pest::Parser;

use crate::errors::ParseError;
use crate::expr::{Constant, Expression, Operation};
use crate::ops::{BinaryOp, UnaryFunction};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// A lexical token after minus-sign classification. Signs of negated
/// literals are already folded in, so a unary minus survives only ahead
/// of brackets and constants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(Value),
    Complex(Complex<f64>),
    Constant(Constant),
    Binary(BinaryOp),
    UnaryMinus,
    Function(UnaryFunction),
    OpenBracket,
    CloseBracket,
    ArgSeparator,
}

// emits the surviving unary minus ahead of a non-literal operand
fn flush_unary_minus(tokens: &mut Vec<Token>, pending: &mut bool, odd: &mut bool) {
    if *pending && *odd {
        tokens.push(Token::UnaryMinus);
    }
    *pending = false;
    *odd = false;
}

/// Lexes a source string into a flat token stream. A minus sign is
/// classified as unary when it appears at the start of input, right
/// after an operator, an open bracket, or an argument separator;
/// consecutive unary minuses fold via XOR-of-sign onto the next literal.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let pairs = match CalcParser::parse(Rule::expr, text) {
        Ok(p) => p,
        Err(e) => {
            let pos = match e.location {
                InputLocation::Pos(p) => p,
                InputLocation::Span((s, _)) => s,
            };
            let fragment: String = text[pos..].chars().take(16).collect();
            return Err(ParseError::InvalidToken(fragment.trim().to_string()));
        }
    };

    let mut tokens: Vec<Token> = Vec::new();
    let mut expect_operand = true;
    let mut minus_pending = false;
    let mut minus_odd = false;

    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str().to_lowercase();
        match rule {
            Rule::int | Rule::float => {
                let mut v = if rule == Rule::int {
                    Value::from_str_integer(&val)?
                } else {
                    Value::from_str_float(&val)?
                };
                if minus_pending && minus_odd {
                    v = v.negate();
                }
                minus_pending = false;
                minus_odd = false;
                tokens.push(Token::Number(v));
                expect_operand = false;
            }
            Rule::complex => {
                // a leading sign after a value belongs to the expression,
                // not the literal: "1-2+3i" is 1 - (2+3i)
                if !expect_operand && (val.starts_with('+') || val.starts_with('-')) {
                    let op = if val.starts_with('+') { BinaryOp::Plus } else { BinaryOp::Minus };
                    tokens.push(Token::Binary(op));
                    tokens.push(Token::Complex(Value::from_str_complex(&val[1..])?));
                } else {
                    let mut c = Value::from_str_complex(&val)?;
                    if minus_pending && minus_odd {
                        c = -c;
                    }
                    minus_pending = false;
                    minus_odd = false;
                    tokens.push(Token::Complex(c));
                }
                expect_operand = false;
            }
            Rule::ident => {
                if let Some(func) = UnaryFunction::from_name(&val) {
                    if minus_pending {
                        return Err(ParseError::FunctionAfterUnaryMinus(val));
                    }
                    tokens.push(Token::Function(func));
                    expect_operand = true;
                } else if let Ok(constant) = Constant::from_name(&val) {
                    flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
                    tokens.push(Token::Constant(constant));
                    expect_operand = false;
                } else {
                    return Err(ParseError::InvalidToken(val));
                }
            }
            Rule::operator => {
                if val == "+" && expect_operand {
                    // unary plus changes nothing
                } else if val == "-" && expect_operand {
                    minus_pending = true;
                    minus_odd = !minus_odd;
                } else {
                    flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
                    // the grammar only admits the six known glyphs
                    match BinaryOp::from_symbol(&val) {
                        Some(op) => tokens.push(Token::Binary(op)),
                        None => return Err(ParseError::InvalidToken(val)),
                    }
                    expect_operand = true;
                }
            }
            Rule::open_b => {
                flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
                tokens.push(Token::OpenBracket);
                expect_operand = true;
            }
            Rule::close_b => {
                flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
                tokens.push(Token::CloseBracket);
                expect_operand = false;
            }
            Rule::arg_sep => {
                flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
                tokens.push(Token::ArgSeparator);
                expect_operand = true;
            }
            Rule::EOI => {}
            _ => return Err(ParseError::InvalidToken(val)),
        }
    }
    flush_unary_minus(&mut tokens, &mut minus_pending, &mut minus_odd);
    Ok(tokens)
}

fn precedence(token: &Token) -> (u8, bool) {
    match token {
        Token::Binary(BinaryOp::Plus) | Token::Binary(BinaryOp::Minus) => (1, false),
        Token::Binary(BinaryOp::Times)
        | Token::Binary(BinaryOp::Divides)
        | Token::Binary(BinaryOp::Modulo) => (2, false),
        Token::Binary(BinaryOp::Power) => (3, true),
        Token::UnaryMinus => (4, true),
        Token::Function(..) => (5, false),
        _ => (0, false),
    }
}

/// Linearizes an infix token stream into postfix order (shunting-yard).
/// `^` is right-associative: `2^3^2` becomes `2 3 2 ^ ^`.
pub(crate) fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(..) | Token::Complex(..) | Token::Constant(..) => {
                output.push(token.clone());
            }
            Token::Function(func) => {
                match tokens.get(idx + 1) {
                    Some(Token::OpenBracket) => {}
                    _ => return Err(ParseError::FunctionWithoutBracket(func.symbol().to_string())),
                }
                stack.push(token.clone());
            }
            Token::OpenBracket => stack.push(Token::OpenBracket),
            Token::CloseBracket => {
                let mut matched = false;
                while let Some(top) = stack.pop() {
                    if top == Token::OpenBracket {
                        matched = true;
                        break;
                    }
                    output.push(top);
                }
                if !matched {
                    return Err(ParseError::MismatchedBrackets);
                }
                // function-call resolution
                if let Some(Token::Function(..)) = stack.last() {
                    // last() is Some - unwrap is fine
                    output.push(stack.pop().unwrap());
                }
            }
            Token::ArgSeparator => loop {
                match stack.last() {
                    None => return Err(ParseError::MismatchedBrackets),
                    Some(Token::OpenBracket) => break,
                    Some(..) => {
                        // last() is Some - unwrap is fine
                        output.push(stack.pop().unwrap());
                    }
                }
            },
            Token::Binary(..) | Token::UnaryMinus => {
                let (prec, right_assoc) = precedence(token);
                while let Some(top) = stack.last() {
                    if *top == Token::OpenBracket {
                        break;
                    }
                    let (top_prec, _) = precedence(top);
                    if top_prec > prec || (top_prec == prec && !right_assoc) {
                        // last() is Some - unwrap is fine
                        output.push(stack.pop().unwrap());
                    } else {
                        break;
                    }
                }
                stack.push(token.clone());
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::OpenBracket {
            return Err(ParseError::MismatchedBrackets);
        }
        output.push(top);
    }
    Ok(output)
}

/// Builds an expression tree from a postfix token stream.
pub(crate) fn build(postfix: Vec<Token>) -> Result<Expression, ParseError> {
    let mut stack: Vec<Expression> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(v) => stack.push(Expression::Number(v)),
            Token::Complex(c) => stack.push(Expression::Complex(c)),
            Token::Constant(k) => stack.push(Expression::Constant(k)),
            Token::UnaryMinus => {
                let arg = match stack.pop() {
                    Some(e) => e,
                    None => return Err(ParseError::MissingOperand("-".to_string())),
                };
                stack.push(Expression::Operation(Operation::binary(
                    BinaryOp::Minus,
                    Expression::Number(Value::Int(0)),
                    arg,
                )));
            }
            Token::Function(func) => {
                let arg = match stack.pop() {
                    Some(e) => e,
                    None => return Err(ParseError::MissingOperand(func.symbol().to_string())),
                };
                stack.push(Expression::Operation(Operation::unary(func, arg)));
            }
            Token::Binary(op) => {
                let right = match stack.pop() {
                    Some(e) => e,
                    None => return Err(ParseError::MissingOperand(op.symbol().to_string())),
                };
                let left = match stack.pop() {
                    Some(e) => e,
                    None => return Err(ParseError::MissingOperand(op.symbol().to_string())),
                };
                stack.push(Expression::Operation(Operation::binary(op, left, right)));
            }
            Token::OpenBracket | Token::CloseBracket | Token::ArgSeparator => {
                return Err(ParseError::MismatchedBrackets);
            }
        }
    }

    match stack.len() {
        0 => Err(ParseError::EmptyExpression),
        1 => {
            // length checked - unwrap is fine
            Ok(stack.pop().unwrap())
        }
        _ => Err(ParseError::TooManyOperands),
    }
}

/// Parses a source string into an expression tree. Fails on any lexical
/// or structural violation; there is no partial recovery.
pub fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(text)?;
    let postfix = to_postfix(tokens)?;
    build(postfix)
}
