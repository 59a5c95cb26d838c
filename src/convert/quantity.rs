//! Resource quantities: parsing and canonical rendering.
//!
//! A quantity is a signed decimal number with an optional suffix that is
//! either a binary SI unit (`Ki`..`Ei`), a decimal SI unit (`n`..`E`) or a
//! decimal exponent (`e3`, `E-2`). Values are held exactly as
//! `mantissa * 10^scale` with nano precision.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ApiQuantity;

/// Smallest representable scale; finer values are rounded away from zero.
const MIN_SCALE: i32 = -9;
/// Largest decimal SI exponent that has a suffix.
const MAX_SI_EXPONENT: i32 = 18;

const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// QuantityError describes why a quantity string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'")]
    InvalidFormat,

    #[error("unknown quantity suffix {0:?}")]
    UnknownSuffix(String),

    #[error("quantity is out of range")]
    OutOfRange,
}

/// Format records which suffix family a quantity was written in; the
/// canonical form is rendered in the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    DecimalExponent,
    BinarySI,
    DecimalSI,
}

/// Quantity is a parsed resource quantity such as `500m` or `1536Mi`.
#[derive(Debug, Clone, Copy)]
pub struct Quantity {
    mantissa: i128,
    scale: i32,
    format: Format,
}

impl Quantity {
    /// Builds a quantity from `mantissa * 10^scale`, rounding to nano
    /// precision and normalizing trailing zeros.
    fn from_parts(mantissa: i128, scale: i32, format: Format) -> Result<Self, QuantityError> {
        let (mut mantissa, mut scale) = if scale < MIN_SCALE {
            (
                round_away_from_zero(mantissa, MIN_SCALE.saturating_sub(scale)),
                MIN_SCALE,
            )
        } else {
            (mantissa, scale)
        };

        if mantissa == 0 {
            return Ok(Quantity {
                mantissa: 0,
                scale: 0,
                format,
            });
        }
        while mantissa % 10 == 0 {
            mantissa /= 10;
            scale = scale.checked_add(1).ok_or(QuantityError::OutOfRange)?;
        }
        // Positive scales must stay expandable to an integer for rendering.
        if scale > 0 {
            pow10(scale)
                .and_then(|p| mantissa.checked_mul(p))
                .ok_or(QuantityError::OutOfRange)?;
        }
        Ok(Quantity {
            mantissa,
            scale,
            format,
        })
    }

    /// Returns the suffix family the quantity was parsed in.
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Returns the value as an integer when it has no fractional part.
    pub fn as_integer(&self) -> Option<i128> {
        if self.scale < 0 {
            return None;
        }
        pow10(self.scale).and_then(|p| self.mantissa.checked_mul(p))
    }

    /// Converts to the API model's string-backed quantity.
    pub fn to_api(&self) -> ApiQuantity {
        ApiQuantity(self.to_string())
    }

    fn fmt_binary(&self, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
        let mut value = self.as_integer()?;
        if value.unsigned_abs() < 1024 {
            return None;
        }
        let mut exponent = 0;
        while exponent < BINARY_SUFFIXES.len() - 1 && value % 1024 == 0 {
            value /= 1024;
            exponent += 1;
        }
        Some(write!(f, "{}{}", value, BINARY_SUFFIXES[exponent]))
    }

    fn fmt_decimal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exponent = (self.scale.div_euclid(3) * 3).min(MAX_SI_EXPONENT);
        // from_parts guarantees the expansion fits.
        let digits = pow10(self.scale - exponent)
            .and_then(|p| self.mantissa.checked_mul(p))
            .ok_or(fmt::Error)?;
        match self.format {
            Format::DecimalExponent if exponent != 0 => write!(f, "{}e{}", digits, exponent),
            Format::DecimalExponent => write!(f, "{}", digits),
            _ => write!(f, "{}{}", digits, si_suffix(exponent)),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.scale == other.scale
    }
}

impl Eq for Quantity {}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa == 0 {
            return f.write_str("0");
        }
        if self.format == Format::BinarySI {
            if let Some(result) = self.fmt_binary(f) {
                return result;
            }
        }
        self.fmt_decimal(f)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, rest) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(number_end);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::InvalidFormat);
        }

        let mut mantissa: i128 = 0;
        for digit in whole.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit - b'0')))
                .ok_or(QuantityError::OutOfRange)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        let fraction_digits = i32::try_from(fraction.len()).map_err(|_| QuantityError::OutOfRange)?;

        let (format, exponent, binary_power) = parse_suffix(suffix)?;
        if binary_power > 0 {
            let factor = 1024i128
                .checked_pow(binary_power)
                .ok_or(QuantityError::OutOfRange)?;
            mantissa = mantissa
                .checked_mul(factor)
                .ok_or(QuantityError::OutOfRange)?;
        }
        let scale = exponent
            .checked_sub(fraction_digits)
            .ok_or(QuantityError::OutOfRange)?;

        Quantity::from_parts(mantissa, scale, format)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<&Quantity> for ApiQuantity {
    fn from(q: &Quantity) -> Self {
        q.to_api()
    }
}

impl TryFrom<&ApiQuantity> for Quantity {
    type Error = QuantityError;

    fn try_from(q: &ApiQuantity) -> Result<Self, Self::Error> {
        q.0.parse()
    }
}

/// Returns the format, the base-10 exponent and the power of 1024 a suffix
/// stands for.
fn parse_suffix(suffix: &str) -> Result<(Format, i32, u32), QuantityError> {
    type Parsed = Result<(Format, i32, u32), QuantityError>;
    let decimal = |exponent: i32| -> Parsed { Ok((Format::DecimalSI, exponent, 0)) };
    let binary = |power: u32| -> Parsed { Ok((Format::BinarySI, 0, power)) };
    match suffix {
        "" => decimal(0),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        "Ki" => binary(1),
        "Mi" => binary(2),
        "Gi" => binary(3),
        "Ti" => binary(4),
        "Pi" => binary(5),
        "Ei" => binary(6),
        _ => {
            let unknown = || QuantityError::UnknownSuffix(suffix.to_string());
            let exponent = suffix.strip_prefix(['e', 'E']).ok_or_else(unknown)?;
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unknown());
            }
            let exponent = exponent
                .parse::<i32>()
                .map_err(|_| QuantityError::OutOfRange)?;
            Ok((Format::DecimalExponent, exponent, 0))
        }
    }
}

fn si_suffix(exponent: i32) -> &'static str {
    match exponent {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => "",
    }
}

fn pow10(exponent: i32) -> Option<i128> {
    u32::try_from(exponent).ok().and_then(|e| 10i128.checked_pow(e))
}

/// Divides by `10^digits`, rounding any remainder away from zero.
fn round_away_from_zero(mantissa: i128, digits: i32) -> i128 {
    match pow10(digits) {
        Some(divisor) => {
            let quotient = mantissa / divisor;
            if mantissa % divisor != 0 {
                quotient + mantissa.signum()
            } else {
                quotient
            }
        }
        None => mantissa.signum(),
    }
}
