//! Linear equation parser
//!
//! Grammar: exactly one `=`; each side is a `+`-joined list of terms after
//! rewriting `-` as `+-`. A term is a signed number, or an optional signed
//! coefficient immediately followed by a variable token: one Greek or Latin
//! letter and optional digits (`a`, `b12`, `α`). Variables are
//! case-insensitive and stored lowercase.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquationError {
    #[error("expected exactly one '=' in '{0}'")]
    Equals(String),

    #[error("empty side in '{0}'")]
    EmptySide(String),

    #[error("invalid term '{term}' in '{equation}'")]
    InvalidTerm { term: String, equation: String },
}

/// `Σ coefficient · variable = constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearEquation {
    pub coefficients: BTreeMap<String, f64>,
    pub constant: f64,
}

impl LinearEquation {
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.coefficients.keys().map(String::as_str)
    }

    pub fn is_trivial(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Replace a variable by a known value
    pub fn substitute(&mut self, variable: &str, value: f64) {
        if let Some(coefficient) = self.coefficients.remove(variable) {
            self.constant -= coefficient * value;
        }
    }

    /// Add `coefficient · variable` to the left-hand side
    pub fn add_term(&mut self, variable: String, coefficient: f64) {
        let entry = self.coefficients.entry(variable).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.coefficients.retain(|_, c| *c != 0.0);
        }
    }
}

impl fmt::Display for LinearEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (variable, coefficient)) in self.coefficients.iter().enumerate() {
            if *coefficient < 0.0 {
                f.write_str("-")?;
            } else if i > 0 {
                f.write_str("+")?;
            }
            let magnitude = coefficient.abs();
            if magnitude != 1.0 {
                f.write_str(&super::numeric::format_number(magnitude))?;
            }
            f.write_str(variable)?;
        }
        if self.coefficients.is_empty() {
            f.write_str("0")?;
        }
        write!(f, "={}", super::numeric::format_number(self.constant))
    }
}

pub fn parse_equation(input: &str) -> Result<LinearEquation, EquationError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let sides: Vec<&str> = compact.split('=').collect();
    if sides.len() != 2 {
        return Err(EquationError::Equals(input.to_string()));
    }

    let mut equation = LinearEquation::default();
    for (side, sign) in [(sides[0], 1.0), (sides[1], -1.0)] {
        let normalized = side.replace('-', "+-");
        let terms: Vec<&str> = normalized.split('+').filter(|t| !t.is_empty()).collect();
        if terms.is_empty() {
            return Err(EquationError::EmptySide(input.to_string()));
        }
        for term in terms {
            match parse_term(term) {
                Some((Some(variable), coefficient)) => equation.add_term(variable, sign * coefficient),
                Some((None, value)) => equation.constant -= sign * value,
                None => {
                    return Err(EquationError::InvalidTerm {
                        term: term.to_string(),
                        equation: input.to_string(),
                    })
                }
            }
        }
    }

    Ok(equation)
}

/// `(variable, coefficient)` or `(None, constant)`
fn parse_term(term: &str) -> Option<(Option<String>, f64)> {
    let (negative, body) = match term.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, term),
    };
    let split = body
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    let (number, token) = body.split_at(split);
    let sign = if negative { -1.0 } else { 1.0 };

    if token.is_empty() {
        let value: f64 = number.parse().ok()?;
        return Some((None, sign * value));
    }

    let coefficient = if number.is_empty() { 1.0 } else { number.parse::<f64>().ok()? };
    is_variable(token).then(|| (Some(token.to_lowercase()), sign * coefficient))
}

fn is_variable(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || is_greek(first)) && chars.all(|c| c.is_ascii_digit())
}

fn is_greek(c: char) -> bool {
    matches!(c, 'Α'..='Ω' | 'α'..='ω')
}
