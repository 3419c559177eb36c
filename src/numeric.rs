//! Positional tokenizer for numeric strings.

use std::sync::OnceLock;

use fancy_regex::Regex;

use crate::constants::NUMERIC_PATTERN;

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMERIC_PATTERN).expect("Invalid numeric pattern"))
}

/// Splits a number into `_{digit}_{power}_` tokens around the decimal point.
///
/// - `"12.5"` -> `_1_1_`, `_2_0_`, `.`, `_5_-1_`
/// - `"-3"` -> `_-3_0_`
///
/// A sign is kept with the digit it precedes. Other characters are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericalTokenizer;

impl NumericalTokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, number: &str) -> Vec<String> {
        let digits: Vec<&str> = numeric_pattern()
            .find_iter(number)
            .flatten()
            .map(|m| m.as_str())
            .collect();
        let dot = digits.iter().position(|&d| d == ".").unwrap_or(digits.len());

        digits
            .iter()
            .enumerate()
            .map(|(idx, &v)| {
                if idx == dot {
                    return v.to_owned();
                }
                let power = if idx < dot {
                    (dot - idx - 1) as i64
                } else {
                    -((idx - dot) as i64)
                };
                format!("_{}_{}_", v, power)
            })
            .collect()
    }
}
