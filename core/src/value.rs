//! Typed values for flags and positional arguments.
//!
//! Every flag and argument declares a [`ValueKind`]. Tokens read from the
//! input line are decoded into a [`Value`], a tagged union over the fixed set
//! of supported kinds. Handlers read them back with
//! [`ResultMap::get`](crate::ResultMap::get), which converts through the
//! [`Typed`] trait and reports a kind mismatch instead of panicking.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use command_shell_core::{ScalarKind, Value, decode, decode_list};
//!
//! assert_eq!(decode("0x1f", ScalarKind::Int32).unwrap(), Value::Int32(31));
//! assert_eq!(
//!     decode("1h30m", ScalarKind::Duration).unwrap(),
//!     Value::Duration(Duration::from_secs(5400)),
//! );
//! assert!(decode("300", ScalarKind::Uint8).is_err());
//!
//! let list = decode_list(&["1", "2"], ScalarKind::Int).unwrap();
//! assert_eq!(list.to_string(), "[1 2]");
//! ```

use std::fmt;
use std::time::Duration;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ValueError;

/// Element kinds a value can be decoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Bool,
    /// Platform-native signed integer (`isize`).
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Platform-native unsigned integer (`usize`).
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Duration,
}

impl ScalarKind {
    /// Lowercase name used in help and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a flag or argument: a single element or a homogeneous list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Scalar(ScalarKind),
    List(ScalarKind),
}

impl ValueKind {
    /// Element kind, for both scalars and lists.
    pub fn element(self) -> ScalarKind {
        match self {
            Self::Scalar(kind) | Self::List(kind) => kind,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::List(kind) => write!(f, "{kind} list"),
        }
    }
}

/// A decoded flag or argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(isize),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(usize),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Duration(Duration),
    /// Homogeneous list; the element kind is kept so empty lists stay typed.
    List(ScalarKind, Vec<Value>),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        let scalar = match self {
            Self::String(_) => ScalarKind::String,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Int,
            Self::Int8(_) => ScalarKind::Int8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::Uint(_) => ScalarKind::Uint,
            Self::Uint8(_) => ScalarKind::Uint8,
            Self::Uint16(_) => ScalarKind::Uint16,
            Self::Uint32(_) => ScalarKind::Uint32,
            Self::Uint64(_) => ScalarKind::Uint64,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Duration(_) => ScalarKind::Duration,
            Self::List(kind, _) => return ValueKind::List(*kind),
        };
        ValueKind::Scalar(scalar)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
            Self::Uint16(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Duration(v) => f.write_str(&format_duration(*v)),
            Self::List(_, items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(v) => serializer.serialize_str(v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v as i64),
            Self::Int8(v) => serializer.serialize_i8(*v),
            Self::Int16(v) => serializer.serialize_i16(*v),
            Self::Int32(v) => serializer.serialize_i32(*v),
            Self::Int64(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v as u64),
            Self::Uint8(v) => serializer.serialize_u8(*v),
            Self::Uint16(v) => serializer.serialize_u16(*v),
            Self::Uint32(v) => serializer.serialize_u32(*v),
            Self::Uint64(v) => serializer.serialize_u64(*v),
            Self::Float32(v) => serializer.serialize_f32(*v),
            Self::Float64(v) => serializer.serialize_f64(*v),
            Self::Duration(v) => serializer.serialize_str(&format_duration(*v)),
            Self::List(_, items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Conversion between Rust types and [`Value`].
///
/// Implemented for every supported primitive and for `Vec` of each.
pub trait Typed: Sized {
    /// Kind produced by [`into_value`](Typed::into_value).
    fn kind() -> ValueKind;
    fn into_value(self) -> Value;
    /// Returns `None` when `value` holds a different kind.
    fn from_value(value: &Value) -> Option<Self>;
}

/// A [`Typed`] primitive that can be a flag or a list element.
pub trait Scalar: Typed {
    const SCALAR: ScalarKind;
}

macro_rules! impl_typed {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Typed for $ty {
            fn kind() -> ValueKind {
                ValueKind::Scalar(ScalarKind::$variant)
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.to_owned()),
                    _ => None,
                }
            }
        }

        impl Scalar for $ty {
            const SCALAR: ScalarKind = ScalarKind::$variant;
        }

        impl Typed for Vec<$ty> {
            fn kind() -> ValueKind {
                ValueKind::List(ScalarKind::$variant)
            }

            fn into_value(self) -> Value {
                Value::List(
                    ScalarKind::$variant,
                    self.into_iter().map(Value::$variant).collect(),
                )
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::List(ScalarKind::$variant, items) => {
                        items.iter().map(<$ty as Typed>::from_value).collect()
                    }
                    _ => None,
                }
            }
        }
    )*};
}

impl_typed!(
    String => String,
    bool => Bool,
    isize => Int,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    usize => Uint,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Duration => Duration,
);

/// How integer tokens are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerSyntax {
    /// Sign, base prefix (`0x`, `0o`, `0b`, legacy leading `0` for octal)
    /// and `_` separators. Used for flag values.
    #[default]
    Prefixed,
    /// Sign and decimal digits only; `017` is seventeen. Used for
    /// positional arguments.
    Decimal,
}

/// Decodes a single token into a value of `kind`, reading integers with
/// [`IntegerSyntax::Prefixed`].
///
/// Empty tokens are not special-cased here: an empty bool token is an error.
/// Flags that may omit their value handle that one level up.
pub fn decode(token: &str, kind: ScalarKind) -> Result<Value, ValueError> {
    decode_with(token, kind, IntegerSyntax::Prefixed)
}

/// Decodes a single token into a value of `kind` with the given integer
/// syntax.
pub fn decode_with(
    token: &str,
    kind: ScalarKind,
    syntax: IntegerSyntax,
) -> Result<Value, ValueError> {
    let decoded = match kind {
        ScalarKind::String => Ok(Value::String(token.to_string())),
        ScalarKind::Bool => parse_bool(token).map(Value::Bool),
        ScalarKind::Int => parse_int(token, syntax).map(Value::Int),
        ScalarKind::Int8 => parse_int(token, syntax).map(Value::Int8),
        ScalarKind::Int16 => parse_int(token, syntax).map(Value::Int16),
        ScalarKind::Int32 => parse_int(token, syntax).map(Value::Int32),
        ScalarKind::Int64 => parse_int(token, syntax).map(Value::Int64),
        ScalarKind::Uint => parse_int(token, syntax).map(Value::Uint),
        ScalarKind::Uint8 => parse_int(token, syntax).map(Value::Uint8),
        ScalarKind::Uint16 => parse_int(token, syntax).map(Value::Uint16),
        ScalarKind::Uint32 => parse_int(token, syntax).map(Value::Uint32),
        ScalarKind::Uint64 => parse_int(token, syntax).map(Value::Uint64),
        ScalarKind::Float32 => parse_float::<f32>(token).map(Value::Float32),
        ScalarKind::Float64 => parse_float::<f64>(token).map(Value::Float64),
        ScalarKind::Duration => parse_duration(token).map(Value::Duration),
    };

    decoded.map_err(|reason| ValueError {
        token: token.to_string(),
        kind,
        reason,
    })
}

/// Decodes every token as `kind` into one list value.
///
/// A failure anywhere fails the whole list.
pub fn decode_list<S: AsRef<str>>(tokens: &[S], kind: ScalarKind) -> Result<Value, ValueError> {
    decode_list_with(tokens, kind, IntegerSyntax::Prefixed)
}

/// List form of [`decode_with`].
pub fn decode_list_with<S: AsRef<str>>(
    tokens: &[S],
    kind: ScalarKind,
    syntax: IntegerSyntax,
) -> Result<Value, ValueError> {
    let items = tokens
        .iter()
        .map(|token| decode_with(token.as_ref(), kind, syntax))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::List(kind, items))
}

fn parse_bool(token: &str) -> Result<bool, String> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err("expected one of true, false, t, f, 1, 0".to_string()),
    }
}

fn parse_int<T: TryFrom<i128>>(token: &str, syntax: IntegerSyntax) -> Result<T, String> {
    let value = parse_integer_literal(token, syntax)?;
    T::try_from(value).map_err(|_| "value out of range".to_string())
}

/// Parses an integer literal with an optional sign. Prefixed syntax also
/// takes a base prefix (`0x`, `0o`, `0b`, or a legacy leading `0` for
/// octal) and `_` digit separators.
fn parse_integer_literal(token: &str, syntax: IntegerSyntax) -> Result<i128, String> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'+') => (false, &token[1..]),
        Some(b'-') => (true, &token[1..]),
        _ => (false, token),
    };
    if body.is_empty() {
        return Err("empty number".to_string());
    }

    if syntax == IntegerSyntax::Decimal {
        if !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err("invalid digit found in string".to_string());
        }
        let magnitude: i128 = body
            .parse()
            .map_err(|err: std::num::ParseIntError| err.to_string())?;
        return Ok(if negative { -magnitude } else { magnitude });
    }

    let lower = body.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &body[2..], true),
        Some("0o") => (8, &body[2..], true),
        Some("0b") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    let cleaned = strip_separators(digits, prefixed)?;
    if cleaned.is_empty() || cleaned.starts_with(['+', '-']) {
        return Err("invalid syntax".to_string());
    }

    let magnitude = i128::from_str_radix(&cleaned, radix).map_err(|err| err.to_string())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Removes `_` separators, which may only sit between digits or directly
/// after a base prefix.
fn strip_separators(digits: &str, prefixed: bool) -> Result<String, String> {
    if !digits.contains('_') {
        return Ok(digits.to_string());
    }
    if digits.ends_with('_') || digits.contains("__") || (!prefixed && digits.starts_with('_')) {
        return Err("misplaced '_' separator".to_string());
    }
    Ok(digits.replace('_', ""))
}

fn parse_float<T>(token: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = std::num::ParseFloatError> + Into<f64> + Copy,
{
    let value: T = token.parse().map_err(|err: std::num::ParseFloatError| err.to_string())?;
    if value.into().is_infinite() && !token.to_ascii_lowercase().contains("inf") {
        return Err("value out of range".to_string());
    }
    Ok(value)
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Parses a compound duration such as `1h30m`, `1.5s` or `500ms`.
///
/// Units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
/// Negative durations are rejected.
pub fn parse_duration(token: &str) -> Result<Duration, String> {
    let (negative, mut rest) = match token.as_bytes().first() {
        Some(b'+') => (false, &token[1..]),
        Some(b'-') => (true, &token[1..]),
        _ => (false, token),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let overflow = || "duration out of range".to_string();
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("expected a number".to_string());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            "" => return Err("missing unit".to_string()),
            other => return Err(format!("unknown unit '{other}'")),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;
        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| overflow())?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos += numerator * scale / denominator;
        }
        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    if negative && total != 0 {
        return Err("negative durations are not supported".to_string());
    }
    let nanos = u64::try_from(total).map_err(|_| overflow())?;
    Ok(Duration::from_nanos(nanos))
}

/// Renders a duration in compound form (`1h30m0s`, `1.5s`, `500ms`).
///
/// The output is accepted by [`parse_duration`].
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", fractional(nanos, NANOS_PER_MICRO));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fractional(nanos, NANOS_PER_MILLI));
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let seconds = nanos % NANOS_PER_MIN;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&fractional(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

fn fractional(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bool_literals() {
        for token in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(decode(token, ScalarKind::Bool).unwrap(), Value::Bool(true));
        }
        for token in ["0", "f", "F", "false", "FALSE"] {
            assert_eq!(decode(token, ScalarKind::Bool).unwrap(), Value::Bool(false));
        }
        assert!(decode("", ScalarKind::Bool).is_err());
        assert!(decode("yes", ScalarKind::Bool).is_err());
    }

    #[test]
    fn test_decode_integer_prefixes() {
        assert_eq!(decode("42", ScalarKind::Int).unwrap(), Value::Int(42));
        assert_eq!(decode("-42", ScalarKind::Int64).unwrap(), Value::Int64(-42));
        assert_eq!(decode("0x1F", ScalarKind::Uint16).unwrap(), Value::Uint16(31));
        assert_eq!(decode("0o17", ScalarKind::Int8).unwrap(), Value::Int8(15));
        assert_eq!(decode("017", ScalarKind::Int8).unwrap(), Value::Int8(15));
        assert_eq!(decode("0b101", ScalarKind::Uint8).unwrap(), Value::Uint8(5));
        assert_eq!(decode("1_000", ScalarKind::Int32).unwrap(), Value::Int32(1000));
        assert_eq!(decode("0", ScalarKind::Uint).unwrap(), Value::Uint(0));
    }

    #[test]
    fn test_decode_decimal_integers() {
        let decimal = |token, kind| decode_with(token, kind, IntegerSyntax::Decimal);
        assert_eq!(decimal("017", ScalarKind::Int).unwrap(), Value::Int(17));
        assert_eq!(decimal("08", ScalarKind::Uint8).unwrap(), Value::Uint8(8));
        assert_eq!(decimal("+5", ScalarKind::Int32).unwrap(), Value::Int32(5));
        assert_eq!(decimal("-12", ScalarKind::Int64).unwrap(), Value::Int64(-12));
        assert!(decimal("0x10", ScalarKind::Int).is_err());
        assert!(decimal("1_000", ScalarKind::Int).is_err());
        assert!(decimal("-1", ScalarKind::Uint).is_err());
        assert!(decimal("256", ScalarKind::Uint8).is_err());

        let list = decode_list_with(&["010", "7"], ScalarKind::Uint16, IntegerSyntax::Decimal);
        assert_eq!(
            list.unwrap(),
            Value::List(ScalarKind::Uint16, vec![Value::Uint16(10), Value::Uint16(7)])
        );
    }

    #[test]
    fn test_decode_integer_rejects_bad_syntax() {
        for token in ["", "-", "0x", "1__0", "_1", "1_", "0x-5", "08", "abc", "1.5"] {
            assert!(decode(token, ScalarKind::Int).is_err(), "{token}");
        }
    }

    #[test]
    fn test_decode_integer_width_bounds() {
        assert_eq!(decode("127", ScalarKind::Int8).unwrap(), Value::Int8(127));
        assert_eq!(decode("-128", ScalarKind::Int8).unwrap(), Value::Int8(-128));
        assert!(decode("128", ScalarKind::Int8).is_err());
        assert!(decode("256", ScalarKind::Uint8).is_err());
        assert!(decode("-1", ScalarKind::Uint32).is_err());
        assert_eq!(
            decode("18446744073709551615", ScalarKind::Uint64).unwrap(),
            Value::Uint64(u64::MAX)
        );
        assert!(decode("18446744073709551616", ScalarKind::Uint64).is_err());
        assert_eq!(
            decode(&isize::MIN.to_string(), ScalarKind::Int).unwrap(),
            Value::Int(isize::MIN)
        );
        assert_eq!(
            decode(&usize::MAX.to_string(), ScalarKind::Uint).unwrap(),
            Value::Uint(usize::MAX)
        );
    }

    #[test]
    fn test_decode_floats() {
        assert_eq!(decode("5.55", ScalarKind::Float32).unwrap(), Value::Float32(5.55));
        assert_eq!(decode("-1e3", ScalarKind::Float64).unwrap(), Value::Float64(-1000.0));
        assert!(decode("1e50", ScalarKind::Float32).is_err());
        assert!(decode("inf", ScalarKind::Float64).is_ok());
        assert!(decode("five", ScalarKind::Float64).is_err());
    }

    #[test]
    fn test_parse_duration_compound() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("2µs").unwrap(), Duration::from_micros(2));
        assert_eq!(parse_duration("2us").unwrap(), Duration::from_micros(2));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_errors() {
        for token in ["", "1", "s", "1x", "-1s", "1.s.", "h1"] {
            assert!(parse_duration(token).is_err(), "{token}");
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(15)), "15ns");
        assert_eq!(format_duration(Duration::from_micros(2)), "2µs");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h30m0s");
    }

    #[test]
    fn test_display_round_trip() {
        let samples = [
            Value::String("hello".into()),
            Value::Bool(true),
            Value::Int(-7),
            Value::Int8(i8::MIN),
            Value::Int16(-300),
            Value::Int32(70_000),
            Value::Int64(i64::MAX),
            Value::Uint(12),
            Value::Uint8(u8::MAX),
            Value::Uint16(65_535),
            Value::Uint32(7),
            Value::Uint64(u64::MAX),
            Value::Float32(5.55),
            Value::Float64(0.1),
            Value::Duration(Duration::from_millis(90_250)),
        ];
        for value in samples {
            let kind = value.kind().element();
            assert_eq!(decode(&value.to_string(), kind).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_list_fails_as_a_whole() {
        let err = decode_list(&["1", "two", "3"], ScalarKind::Int).unwrap_err();
        assert_eq!(err.token, "two");
        assert_eq!(err.kind, ScalarKind::Int);

        let empty = decode_list::<&str>(&[], ScalarKind::Bool).unwrap();
        assert_eq!(empty, Value::List(ScalarKind::Bool, vec![]));
        assert_eq!(empty.kind(), ValueKind::List(ScalarKind::Bool));
    }

    #[test]
    fn test_typed_conversions() {
        let value = vec![1u16, 2, 3].into_value();
        assert_eq!(value.kind(), ValueKind::List(ScalarKind::Uint16));
        assert_eq!(Vec::<u16>::from_value(&value), Some(vec![1, 2, 3]));
        assert_eq!(Vec::<u32>::from_value(&value), None);
        assert_eq!(u16::from_value(&value), None);
        assert_eq!(<Duration as Scalar>::SCALAR, ScalarKind::Duration);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::Scalar(ScalarKind::Uint64).to_string(), "uint64");
        assert_eq!(ValueKind::List(ScalarKind::String).to_string(), "string list");
    }
}
