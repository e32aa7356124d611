//! Bind values.
//!
//! `Value` is the closed set of scalar types that can travel as a positional
//! parameter or come back out of a row. Conversions into `Value` happen when an
//! expression is built, so an unsupported type is a compile error (or, for
//! `u64`, a `TryFrom` failure) instead of a driver error at execution time.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type, to_sql_checked};

use crate::error::OrmError;

/// A single bind parameter or column value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `true` for the zero value of the variant: `Null`, `0`, `0.0`, `""` or `false`.
    ///
    /// A primary key holding its zero value is treated as "not assigned yet".
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Timestamp(_) => false,
        }
    }

    /// Name of the variant, used in decode errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

// ==================== Rust -> Value ====================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl TryFrom<u64> for Value {
    type Error = OrmError;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        i64::try_from(v).map(Value::Int).map_err(|_| {
            OrmError::validation(format!("{} does not fit in a signed 64-bit integer", v))
        })
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v.and_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ==================== Value -> Rust ====================

/// Conversion out of a [`Value`], used when scanning rows into model fields.
///
/// The error is a human readable message; callers attach the column name.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {}, got {}", expected, got.type_name())
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, String> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(mismatch("int", &other)),
        }
    }
}

macro_rules! narrow_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, String> {
                    let wide = i64::from_value(value)?;
                    <$t>::try_from(wide)
                        .map_err(|_| format!("{} out of range for {}", wide, stringify!($t)))
                }
            }
        )*
    };
}

narrow_int!(i16, i32, u32);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, String> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Timestamp(t) => Ok(t),
            other => Err(mismatch("timestamp", &other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, String> {
        DateTime::<Utc>::from_value(value).map(|t| t.naive_utc())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// ==================== Shorthand arguments ====================

/// A positional argument to a shorthand query string.
///
/// `field = ?` takes a [`Arg::Scalar`]; `field IN ?` takes a [`Arg::List`].
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Scalar(Value),
    List(Vec<Value>),
}

macro_rules! scalar_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_arg!(
    Value,
    bool,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    DateTime<Utc>,
    NaiveDateTime
);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Scalar(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Arg::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Arg {
    fn from(v: &[T]) -> Self {
        Arg::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Arg {
    fn from(v: [T; N]) -> Self {
        Arg::List(v.into_iter().map(Into::into).collect())
    }
}

/// Build a `Vec<Arg>` from heterogeneous expressions.
///
/// ```ignore
/// let users = User::relation().filter("org_id = ?, id IN ?", args![7, vec![1, 2, 3]]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

// ==================== tokio-postgres ====================

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(i) => {
                // width follows the parameter type the server inferred
                if *ty == Type::INT2 {
                    i16::try_from(*i)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*i)?.to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*i as f32).to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*i as f64).to_sql_checked(ty, out)
                } else {
                    i.to_sql_checked(ty, out)
                }
            }
            Value::Float(f) => {
                if *ty == Type::FLOAT4 {
                    (*f as f32).to_sql_checked(ty, out)
                } else {
                    f.to_sql_checked(ty, out)
                }
            }
            Value::Text(s) => s.to_sql_checked(ty, out),
            Value::Timestamp(t) => {
                if *ty == Type::TIMESTAMP {
                    t.naive_utc().to_sql_checked(ty, out)
                } else {
                    t.to_sql_checked(ty, out)
                }
            }
        }
    }

    // Null binds to any type; the other arms go through the inner type's
    // checked encoder.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        if *ty == Type::BOOL {
            Ok(Value::Bool(bool::from_sql(ty, raw)?))
        } else if *ty == Type::INT2 {
            Ok(Value::Int(i16::from_sql(ty, raw)?.into()))
        } else if *ty == Type::INT4 {
            Ok(Value::Int(i32::from_sql(ty, raw)?.into()))
        } else if *ty == Type::INT8 {
            Ok(Value::Int(i64::from_sql(ty, raw)?))
        } else if *ty == Type::FLOAT4 {
            Ok(Value::Float(f32::from_sql(ty, raw)?.into()))
        } else if *ty == Type::FLOAT8 {
            Ok(Value::Float(f64::from_sql(ty, raw)?))
        } else if *ty == Type::TIMESTAMPTZ {
            Ok(Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?))
        } else if *ty == Type::TIMESTAMP {
            Ok(Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()))
        } else if <String as FromSql<'_>>::accepts(ty) {
            Ok(Value::Text(String::from_sql(ty, raw)?))
        } else {
            Err(format!("unsupported column type {}", ty).into())
        }
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::BOOL
            || *ty == Type::INT2
            || *ty == Type::INT4
            || *ty == Type::INT8
            || *ty == Type::FLOAT4
            || *ty == Type::FLOAT8
            || *ty == Type::TIMESTAMPTZ
            || *ty == Type::TIMESTAMP
            || <String as FromSql<'_>>::accepts(ty)
    }
}
