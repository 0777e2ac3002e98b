use std::cmp::Ordering;

use regex::Regex;

use crate::parser::ast::{ArithmeticOp, ComparatorOp, Like, LikeToken, Value};

/// Evaluation of operators over literal operands, used for constant folding.
/// Every function answers `None` when the operands cannot be evaluated
/// without a data source.
pub struct LiteralResolver;

impl LiteralResolver {
    /// Exact ordering of an integer against a float, without rounding the
    /// integer to the nearest representable f64.
    fn order_int_float(i: i64, f: f64) -> Option<Ordering> {
        const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
        if f.is_nan() {
            return None;
        }
        if f >= TWO_POW_63 {
            return Some(Ordering::Less);
        }
        if f < -TWO_POW_63 {
            return Some(Ordering::Greater);
        }

        let whole = f.trunc();
        match i.cmp(&(whole as i64)) {
            Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
            other => Some(other),
        }
    }

    fn order(l: &Value, r: &Value, match_case: bool) -> Option<Ordering> {
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) if match_case => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.to_lowercase().cmp(&b.to_lowercase())),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => Self::order_int_float(*a, b.into_inner()),
            (Value::Float(a), Value::Integer(b)) => Self::order_int_float(*b, a.into_inner()).map(Ordering::reverse),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        }
    }

    pub fn eval_compare(l: &Value, op: ComparatorOp, r: &Value, match_case: bool) -> Option<bool> {
        if let (Value::Boolean(a), Value::Boolean(b)) = (l, r) {
            return match op {
                ComparatorOp::Eq => Some(a == b),
                ComparatorOp::NotEq => Some(a != b),
                _ => None,
            };
        }

        let ordering = Self::order(l, r, match_case)?;
        Some(match op {
            ComparatorOp::Eq => ordering == Ordering::Equal,
            ComparatorOp::NotEq => ordering != Ordering::Equal,
            ComparatorOp::Lt => ordering == Ordering::Less,
            ComparatorOp::LtEq => ordering != Ordering::Greater,
            ComparatorOp::Gt => ordering == Ordering::Greater,
            ComparatorOp::GtEq => ordering != Ordering::Less,
        })
    }

    pub fn eval_between(value: &Value, lower: &Value, upper: &Value) -> Option<bool> {
        let above = Self::eval_compare(value, ComparatorOp::GtEq, lower, true)?;
        let below = Self::eval_compare(value, ComparatorOp::LtEq, upper, true)?;
        Some(above && below)
    }

    pub fn eval_like(value: &str, like: &Like) -> Option<bool> {
        let mut regex = String::from(if like.match_case { "^" } else { "(?i)^" });
        for token in like.tokens() {
            match token {
                LikeToken::Wildcard => regex.push_str(".*"),
                LikeToken::SingleChar => regex.push('.'),
                LikeToken::Char(ch) => regex.push_str(&regex::escape(&ch.to_string())),
            }
        }
        regex.push('$');
        Regex::new(&regex).ok().map(|re| re.is_match(value))
    }

    /// Numeric arithmetic. Integer overflow and division by zero are left
    /// for the data source to report.
    pub fn eval_arithmetic(op: ArithmeticOp, l: &Value, r: &Value) -> Option<Value> {
        if let (Value::Integer(a), Value::Integer(b)) = (l, r) {
            return match op {
                ArithmeticOp::Add => a.checked_add(*b).map(Value::Integer),
                ArithmeticOp::Sub => a.checked_sub(*b).map(Value::Integer),
                ArithmeticOp::Mul => a.checked_mul(*b).map(Value::Integer),
                ArithmeticOp::Div if *b == 0 => None,
                ArithmeticOp::Div if a.checked_rem(*b) == Some(0) => a.checked_div(*b).map(Value::Integer),
                ArithmeticOp::Div => Value::float(*a as f64 / *b as f64),
            };
        }

        let (a, b) = (l.as_f64()?, r.as_f64()?);
        let result = match op {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Sub => a - b,
            ArithmeticOp::Mul => a * b,
            ArithmeticOp::Div if b == 0.0 => return None,
            ArithmeticOp::Div => a / b,
        };
        if !result.is_finite() {
            return None;
        }
        Value::float(result)
    }
}
