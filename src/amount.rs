// src/amount.rs

use regex::Regex;
use serde::{Serialize, Serializer};
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+$").unwrap());
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

/// A cleaned numeric value. Integer-looking inputs stay integers until a
/// fractional value joins the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Int(i64),
    Float(f64),
}

impl Amount {
    pub fn as_f64(&self) -> f64 {
        match self {
            Amount::Int(i) => *i as f64,
            Amount::Float(f) => *f,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Int(0)
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        match (self, rhs) {
            (Amount::Int(a), Amount::Int(b)) => a
                .checked_add(b)
                .map(Amount::Int)
                .unwrap_or(Amount::Float(a as f64 + b as f64)),
            (a, b) => Amount::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::default(), |acc, a| acc + a)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Int(i) => serializer.serialize_i64(*i),
            Amount::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Int(i) => write!(f, "{i}"),
            Amount::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Strip every `$` then every `,` and parse what is left. Anything that is
/// not a finite number comes back as `None`.
pub fn clean_amount(raw: &str) -> Option<Amount> {
    let stripped = raw.replace('$', "").replace(',', "");
    let s = stripped.trim_matches(|c: char| c.is_ascii_whitespace());

    if INTEGER.is_match(s) {
        return match s.parse::<i64>() {
            Ok(i) => Some(Amount::Int(i)),
            Err(_) => s.parse::<f64>().ok().filter(|f| f.is_finite()).map(Amount::Float),
        };
    }
    if DECIMAL.is_match(s) {
        return s.parse::<f64>().ok().filter(|f| f.is_finite()).map(Amount::Float);
    }
    None
}

/// Sum cleaned values; an empty input sums to integer zero.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Amount>) -> Amount {
    amounts.into_iter().sum()
}
