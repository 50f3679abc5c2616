//! Numeric formatting and the complex number type.

use core::fmt;

use crate::HostError;

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Parse the textual form produced by [`Complex`]'s `Display` impl.
    ///
    /// Accepts `(1+2j)`, `2j`, `(-0-1.5j)`, `1+j` and bare reals such as `1.5`.
    pub fn parse(text: &str) -> Result<Self, HostError> {
        let invalid = || HostError::InvalidValue(format!("complex() arg is a malformed string: {text:?}"));

        let trimmed = text.trim();
        let inner = match trimmed.strip_prefix('(') {
            Some(rest) => rest.strip_suffix(')').ok_or_else(invalid)?,
            None => trimmed,
        };

        let Some(body) = inner.strip_suffix(['j', 'J']) else {
            return parse_float(inner).map(|re| Complex::new(re, 0.0)).ok_or_else(invalid);
        };

        // The sign splitting real from imaginary part is the last `+`/`-` that is
        // neither leading nor part of an exponent.
        let split = body
            .char_indices()
            .skip(1)
            .filter(|&(i, c)| {
                (c == '+' || c == '-') && !matches!(body.as_bytes()[i - 1], b'e' | b'E')
            })
            .map(|(i, _)| i)
            .last();

        let (re, im) = match split {
            Some(i) => (parse_float(&body[..i]).ok_or_else(invalid)?, &body[i..]),
            None => (0.0, body),
        };
        let im = match im {
            "" | "+" => 1.0,
            "-" => -1.0,
            other => parse_float(other).ok_or_else(invalid)?,
        };
        Ok(Complex::new(re, im))
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pure imaginary numbers drop the real part and the parentheses.
        if self.re == 0.0 && self.re.is_sign_positive() {
            return write!(f, "{}j", format_float_digits(self.im));
        }
        let sign = if self.im.is_sign_negative() && !self.im.is_nan() { '-' } else { '+' };
        write!(
            f,
            "({}{}{}j)",
            format_float_digits(self.re),
            sign,
            format_float_digits(self.im.abs())
        )
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Format a float the way the host REPL prints it: shortest round-trip digits,
/// always with a decimal point or exponent, `inf`/`nan` spelled out.
pub fn format_float(value: f64) -> String {
    let digits = format_float_digits(value);
    if digits.contains(['.', 'e', 'n']) {
        digits
    } else {
        format!("{digits}.0")
    }
}

/// Shortest round-trip digits without forcing a decimal point (`2`, `1.5`, `1e+16`).
fn format_float_digits(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
