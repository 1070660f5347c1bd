//! Constrained arithmetic calculator.
//!
//! The side-panel calculator accepts free-form text, so the input is
//! tokenized and validated before anything is evaluated: only numeric
//! literals, `+ - * / %`, and parentheses are allowed. Identifiers,
//! function calls, strings, and assignment never reach the evaluator.
//! Integer literals are widened to floats so `5 / 2` behaves like a
//! calculator rather than integer division.

use anyhow::{Context, Result, bail, ensure};
use evalexpr::{Value as EvalValue, eval};

pub fn evaluate_arithmetic(input: &str) -> Result<f64> {
    let sanitized = sanitize(input)?;
    let result = eval(&sanitized).with_context(|| format!("Evaluating expression '{input}'"))?;
    let number = match result {
        EvalValue::Int(i) => i as f64,
        EvalValue::Float(f) => f,
        other => bail!("Expression '{input}' did not produce a number (got {other:?})"),
    };
    ensure!(
        number.is_finite(),
        "Expression '{input}' produced a non-finite result"
    );
    Ok(number)
}

/// Validates the token stream and rebuilds the expression with every
/// integer literal widened to a float.
fn sanitize(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len() + 8);
    let mut chars = input.chars().peekable();
    let mut saw_token = false;

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
                out.push(' ');
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                let mut dots = 0;
                while let Some(&c) = chars.peek() {
                    match c {
                        '0'..='9' => literal.push(c),
                        '.' => {
                            dots += 1;
                            literal.push(c);
                        }
                        _ => break,
                    }
                    chars.next();
                }
                ensure!(dots <= 1, "Malformed numeric literal '{literal}'");
                ensure!(literal != ".", "Malformed numeric literal '.'");
                if !literal.contains('.') {
                    literal.push_str(".0");
                }
                out.push_str(&literal);
                saw_token = true;
            }
            '+' | '-' | '*' | '/' | '%' | '(' | ')' => {
                chars.next();
                out.push(ch);
                saw_token = true;
            }
            other => bail!("Unsupported character '{other}' in arithmetic expression"),
        }
    }

    ensure!(saw_token, "Empty arithmetic expression");
    Ok(out)
}
