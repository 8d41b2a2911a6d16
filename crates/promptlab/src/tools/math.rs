//! Arithmetic expression evaluation for the calculator tool.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr     = term (("+" | "-") term)*
//! term     = unary (("*" | "/" | "%") unary)*
//! unary    = ("+" | "-") unary | power
//! power    = postfix ("^" unary)?
//! postfix  = primary ("!" | "%")*
//! primary  = number | constant | name "(" args ")" | "(" expr ")"
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so
//! `-2^2` is `-4` and `2^3^2` is `512`.
//!
//! `%` is modulo when a number, name, or `(` follows it directly, and a
//! percent sign otherwise: `7 % 3` is `1`, `45% * 890` is `400.5`.

use thiserror::Error;

/// Nesting depth at which evaluation gives up instead of recursing further.
const MAX_DEPTH: usize = 200;

/// Largest `n` whose factorial is finite as an `f64`.
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("undefined symbol '{0}'")]
    UnknownSymbol(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("function {name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Domain(String),
    #[error("result is not a finite number")]
    NonFinite,
    #[error("expression is nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("'{name}'"),
            Token::Op(c) => format!("operator '{c}'"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when digits follow, so `2e` stays `2` then `e`.
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| MathError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' | '-' | '*' | '/' | '%' | '^' | '!' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            other => return Err(MathError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_op(&mut self, op: char) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), MathError> {
        match self.next() {
            Some(t) if t == expected => Ok(()),
            Some(t) => Err(MathError::UnexpectedToken(t.describe())),
            None => Err(MathError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(MathError::TooDeep)
        } else {
            Ok(())
        }
    }

    fn expr(&mut self) -> Result<f64, MathError> {
        self.descend()?;
        let mut value = self.term()?;
        loop {
            if self.eat_op('+') {
                value += self.term()?;
            } else if self.eat_op('-') {
                value -= self.term()?;
            } else {
                break;
            }
        }
        self.depth -= 1;
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        loop {
            if self.eat_op('*') {
                value *= self.unary()?;
            } else if self.eat_op('/') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value /= rhs;
            } else if self.eat_op('%') {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value = value.rem_euclid(rhs);
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, MathError> {
        self.descend()?;
        let value = if self.eat_op('-') {
            -self.unary()?
        } else if self.eat_op('+') {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.postfix()?;
        if self.eat_op('^') {
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<f64, MathError> {
        let mut value = self.primary()?;
        loop {
            if self.eat_op('!') {
                value = factorial(value)?;
            } else if self.peek() == Some(&Token::Op('%')) && !self.operand_at(self.pos + 1) {
                self.pos += 1;
                value /= 100.0;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn operand_at(&self, pos: usize) -> bool {
        matches!(
            self.tokens.get(pos),
            Some(Token::Number(_) | Token::Ident(_) | Token::LParen)
        )
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.args()?;
                    call(&name, &args)
                } else {
                    constant(&name).ok_or(MathError::UnknownSymbol(name))
                }
            }
            Some(t) => Err(MathError::UnexpectedToken(t.describe())),
            None => Err(MathError::UnexpectedEnd),
        }
    }

    /// Comma-separated arguments after an opening parenthesis.
    fn args(&mut self) -> Result<Vec<f64>, MathError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(t) => return Err(MathError::UnexpectedToken(t.describe())),
                None => return Err(MathError::UnexpectedEnd),
            }
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" | "E" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        _ => None,
    }
}

fn factorial(n: f64) -> Result<f64, MathError> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(MathError::Domain(
            "factorial requires a non-negative integer".into(),
        ));
    }
    if n > MAX_FACTORIAL {
        return Err(MathError::NonFinite);
    }
    let mut result = 1.0;
    let mut k = 2.0;
    while k <= n {
        result *= k;
        k += 1.0;
    }
    Ok(result)
}

fn arity(name: &str, args: &[f64], expected: &'static str, ok: bool) -> Result<(), MathError> {
    if ok {
        Ok(())
    } else {
        Err(MathError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        })
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, MathError> {
    let unary: Option<fn(f64) -> f64> = match name {
        "sqrt" => Some(f64::sqrt),
        "cbrt" => Some(f64::cbrt),
        "abs" => Some(f64::abs),
        "exp" => Some(f64::exp),
        "ln" => Some(f64::ln),
        "log10" => Some(f64::log10),
        "log2" => Some(f64::log2),
        "sin" => Some(f64::sin),
        "cos" => Some(f64::cos),
        "tan" => Some(f64::tan),
        "asin" => Some(f64::asin),
        "acos" => Some(f64::acos),
        "atan" => Some(f64::atan),
        "sinh" => Some(f64::sinh),
        "cosh" => Some(f64::cosh),
        "tanh" => Some(f64::tanh),
        "floor" => Some(f64::floor),
        "ceil" => Some(f64::ceil),
        "round" => Some(f64::round),
        _ => None,
    };
    if let Some(f) = unary {
        arity(name, args, "1", args.len() == 1)?;
        if name == "sqrt" && args[0] < 0.0 {
            return Err(MathError::Domain("sqrt of a negative number".into()));
        }
        return Ok(f(args[0]));
    }

    match name {
        "log" => {
            arity(name, args, "1 or 2", matches!(args.len(), 1 | 2))?;
            match args {
                [x] => Ok(x.ln()),
                [x, base] => {
                    let denom = base.ln();
                    if denom == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    Ok(x.ln() / denom)
                }
                _ => Err(MathError::UnexpectedEnd),
            }
        }
        "pow" => {
            arity(name, args, "2", args.len() == 2)?;
            Ok(args[0].powf(args[1]))
        }
        "min" => {
            arity(name, args, "at least 1", !args.is_empty())?;
            Ok(args.iter().copied().fold(f64::INFINITY, f64::min))
        }
        "max" => {
            arity(name, args, "at least 1", !args.is_empty())?;
            Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        }
        _ => Err(MathError::UnknownFunction(name.to_string())),
    }
}

/// Evaluate `input` to a finite number.
pub fn eval(input: &str) -> Result<f64, MathError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(MathError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(MathError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(MathError::NonFinite);
    }
    Ok(value)
}

/// Render a result with at most 14 significant digits, trailing zeros
/// trimmed. Very large or very small magnitudes use exponent notation.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let rounded: f64 = format!("{value:.13e}").parse().unwrap_or(value);
    let magnitude = rounded.abs();
    if (1e-7..1e15).contains(&magnitude) {
        format!("{rounded}")
    } else {
        format!("{rounded:e}")
    }
}
