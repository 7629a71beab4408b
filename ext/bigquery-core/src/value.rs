use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use indexmap::IndexMap;
use jiff::civil;
use num::BigInt;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use crate::error::{BigQueryError, Result};
use crate::temporal;

/// Native representation of a decoded (or to-be-encoded) cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BigQueryValue {
    Null,

    // Numeric types
    Integer(i64),
    Float(ordered_float::OrderedFloat<f64>),
    Numeric(BigInt, u32), // unscaled value, scale

    // Basic types
    Boolean(bool),
    String(Arc<str>),
    Bytes(Bytes),

    // Date/Time types
    Timestamp(jiff::Timestamp), // UTC instant
    Zoned(jiff::Zoned),         // instant in a specific zone, only produced by callers
    DateTime(civil::DateTime),  // naive wall-clock datetime
    Date(civil::Date),
    Time(civil::Time),
    Interval(Interval),

    // Complex types
    List(Vec<BigQueryValue>),
    Record(IndexMap<Arc<str>, BigQueryValue>), // preserves schema order
}

/// A calendar interval with independently signed parts.
///
/// Years and months share the calendar sign, days carry their own sign and
/// the time components share the time sign, so the value cannot be collapsed
/// into a single duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Interval {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub microseconds: i64,
}

impl BigQueryValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, BigQueryValue::Null)
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            BigQueryValue::Null => "Null",
            BigQueryValue::Integer(_) => "Integer",
            BigQueryValue::Float(_) => "Float",
            BigQueryValue::Numeric(_, _) => "Numeric",
            BigQueryValue::Boolean(_) => "Boolean",
            BigQueryValue::String(_) => "String",
            BigQueryValue::Bytes(_) => "Bytes",
            BigQueryValue::Timestamp(_) => "Timestamp",
            BigQueryValue::Zoned(_) => "Zoned",
            BigQueryValue::DateTime(_) => "DateTime",
            BigQueryValue::Date(_) => "Date",
            BigQueryValue::Time(_) => "Time",
            BigQueryValue::Interval(_) => "Interval",
            BigQueryValue::List(_) => "List",
            BigQueryValue::Record(_) => "Record",
        }
    }

    /// Shorthand for a string value
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        BigQueryValue::String(Arc::from(s.as_ref()))
    }

    /// Shorthand for a float value
    pub fn float(f: f64) -> Self {
        BigQueryValue::Float(ordered_float::OrderedFloat(f))
    }

    /// Parse an arbitrary-precision decimal such as `-12.50` or `1.5E+3`
    pub fn numeric(s: &str) -> Result<Self> {
        let (unscaled, scale) = parse_decimal(s)?;
        Ok(BigQueryValue::Numeric(unscaled, scale))
    }

    /// JSON rendering used when no type-specific converter applies
    pub fn to_plain_json(&self) -> JsonValue {
        match self {
            BigQueryValue::Null => JsonValue::Null,
            BigQueryValue::Integer(i) => JsonValue::from(*i),
            BigQueryValue::Float(f) => float_to_json(f.0),
            BigQueryValue::Numeric(unscaled, scale) => {
                JsonValue::String(format_decimal(unscaled, *scale))
            }
            BigQueryValue::Boolean(b) => JsonValue::Bool(*b),
            BigQueryValue::String(s) => JsonValue::String(s.to_string()),
            BigQueryValue::Bytes(b) => JsonValue::String(STANDARD.encode(b)),
            BigQueryValue::Timestamp(ts) => {
                JsonValue::String(temporal::format_timestamp_row(temporal::utc_datetime(*ts)))
            }
            BigQueryValue::Zoned(z) => JsonValue::String(z.to_string()),
            BigQueryValue::DateTime(dt) => JsonValue::String(temporal::format_datetime_micros(*dt)),
            BigQueryValue::Date(d) => JsonValue::String(temporal::format_date(*d)),
            BigQueryValue::Time(t) => JsonValue::String(temporal::format_time(*t)),
            BigQueryValue::Interval(i) => JsonValue::String(i.to_string()),
            BigQueryValue::List(items) => {
                JsonValue::Array(items.iter().map(BigQueryValue::to_plain_json).collect())
            }
            BigQueryValue::Record(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_plain_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for BigQueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BigQueryValue::String(s) => f.write_str(s),
            other => match other.to_plain_json() {
                JsonValue::String(s) => f.write_str(&s),
                json => write!(f, "{}", json),
            },
        }
    }
}

/// Finite floats become JSON numbers; NaN and the infinities become strings
pub(crate) fn float_to_json(f: f64) -> JsonValue {
    if f.is_nan() {
        JsonValue::String("nan".to_string())
    } else if f.is_infinite() {
        JsonValue::String(if f > 0.0 { "inf" } else { "-inf" }.to_string())
    } else {
        serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

/// Parse float text, accepting the spellings the API uses for non-finite values
pub(crate) fn parse_float_text(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    Ok(match trimmed.to_ascii_lowercase().as_str() {
        "nan" | "+nan" | "-nan" => f64::NAN,
        "inf" | "+inf" | "infinity" | "+infinity" => f64::INFINITY,
        "-inf" | "-infinity" => f64::NEG_INFINITY,
        _ => trimmed.parse()?,
    })
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calendar_sign = if self.years < 0 || self.months < 0 { "-" } else { "" };
        let time_negative = self.hours < 0
            || self.minutes < 0
            || self.seconds < 0
            || self.microseconds < 0;
        let time_sign = if time_negative { "-" } else { "" };
        write!(
            f,
            "{}{}-{} {} {}{}:{}:{}",
            calendar_sign,
            self.years.abs(),
            self.months.abs(),
            self.days,
            time_sign,
            self.hours.abs(),
            self.minutes.abs(),
            self.seconds.abs()
        )?;
        if self.microseconds != 0 {
            write!(f, ".{:06}", self.microseconds.abs())?;
        }
        Ok(())
    }
}

/// Parse a decimal string into (unscaled value, scale)
pub fn parse_decimal(raw: &str) -> Result<(BigInt, u32)> {
    let invalid =
        || BigQueryError::format(format!("got decimal: '{}' with unexpected format", raw));
    let s = raw.trim();

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => {
            let exp: i64 = s[pos + 1..].parse().map_err(|_| invalid())?;
            (&s[..pos], exp)
        }
        None => (s, 0),
    };

    let (negative, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let joined = format!("{}{}", whole, fraction);
    let mut unscaled: BigInt = joined.parse().map_err(|_| invalid())?;
    if negative {
        unscaled = -unscaled;
    }

    let scale = fraction.len() as i64 - exponent;
    if scale < 0 {
        let factor = BigInt::from(10u32).pow(u32::try_from(-scale).map_err(|_| invalid())?);
        Ok((unscaled * factor, 0))
    } else {
        Ok((unscaled, u32::try_from(scale).map_err(|_| invalid())?))
    }
}

/// Render (unscaled value, scale) as a plain decimal string, keeping the scale
pub fn format_decimal(unscaled: &BigInt, scale: u32) -> String {
    let negative = unscaled.sign() == num::bigint::Sign::Minus;
    let digits = unscaled.magnitude().to_string();
    let scale = scale as usize;

    let body = if scale == 0 {
        digits
    } else {
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let split = padded.len() - scale;
        format!("{}.{}", &padded[..split], &padded[split..])
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}
