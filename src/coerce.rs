// Normalization rules shared by the entity builders and the wire mapping.
// Integers follow the server's browser client: `parseInt` on the textual form.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("{field}: expected an integer, got {value}")]
    NotAnInteger { field: &'static str, value: String },
}

impl CoercionError {
    pub fn not_an_integer<I: IntegerInput + ?Sized>(field: &'static str, input: &I) -> Self {
        CoercionError::NotAnInteger {
            field,
            value: input.describe(),
        }
    }
}

/// Values accepted wherever an integer field is set.
///
/// `to_integer` returns `None` for inputs `parseInt` would turn into `NaN`.
/// `is_null` marks an explicit null, which nullable fields keep as `None`.
pub trait IntegerInput {
    fn to_integer(&self) -> Option<i64>;

    fn is_null(&self) -> bool {
        false
    }

    fn describe(&self) -> String;
}

macro_rules! lossless_integer_input {
    ($($ty:ty),*) => {
        $(
            impl IntegerInput for $ty {
                fn to_integer(&self) -> Option<i64> {
                    Some(i64::from(*self))
                }

                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

lossless_integer_input!(i8, i16, i32, i64, u8, u16, u32);

impl IntegerInput for u64 {
    fn to_integer(&self) -> Option<i64> {
        i64::try_from(*self).ok()
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl IntegerInput for usize {
    fn to_integer(&self) -> Option<i64> {
        i64::try_from(*self).ok()
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl IntegerInput for f64 {
    fn to_integer(&self) -> Option<i64> {
        truncate(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl IntegerInput for str {
    fn to_integer(&self) -> Option<i64> {
        parse_int(self)
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

impl IntegerInput for String {
    fn to_integer(&self) -> Option<i64> {
        parse_int(self)
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

impl IntegerInput for Value {
    fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncate)),
            Value::String(text) => parse_int(text),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T: IntegerInput> IntegerInput for Option<T> {
    fn to_integer(&self) -> Option<i64> {
        self.as_ref().and_then(IntegerInput::to_integer)
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, IntegerInput::is_null)
    }

    fn describe(&self) -> String {
        self.as_ref()
            .map_or_else(|| "null".to_string(), IntegerInput::describe)
    }
}

impl<T: IntegerInput + ?Sized> IntegerInput for &T {
    fn to_integer(&self) -> Option<i64> {
        (**self).to_integer()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

fn truncate(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// Parses the leading integer of `input` the way JavaScript's `parseInt` does.
///
/// Leading whitespace and a single sign are accepted, a `0x` prefix switches
/// to hexadecimal, and parsing stops at the first character that is not a
/// digit. Returns `None` when no digit is found or the value overflows.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(index, _)| index);
    if end == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// JavaScript truthiness, used for flags the server may send in any shape.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! integer_truthy {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

integer_truthy!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().map_or(true, |n| n.is_truthy()),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().map_or(false, Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}
