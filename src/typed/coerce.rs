//! Leaf coercion from generic values.
//!
//! Exact kind matches assign directly. Numbers convert between integer and
//! float widths when the value fits. Duration fields take humantime strings
//! (`"10s"`, `"1m 30s"`) or integer nanoseconds.

use crate::error::PathError;
use crate::tree::kind_name;
use crate::typed::field::{Field, LeafSlot, Slot};
use serde_json::Value;
use std::time::Duration;

/// Conversion from a generic value into a concrete leaf type.
trait Coerce: Sized {
    const TYPE_NAME: &'static str;

    fn coerce(value: Value) -> Result<Self, PathError>;
}

fn mismatch<T: Coerce>(value: &Value) -> PathError {
    PathError::TypeMismatch {
        expected: T::TYPE_NAME,
        found: kind_name(value),
    }
}

/// Integral view of a number: exact integers, or floats with no fractional part.
fn integral(value: &Value) -> Option<i128> {
    if let Some(i) = value.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = value.as_u64() {
        return Some(i128::from(u));
    }
    let f = value.as_f64()?;
    // i128 covers the full f64 integral range that i64/u64 can hold
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 1.9e19).then(|| f as i128)
}

macro_rules! coerce_integers {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Coerce for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn coerce(value: Value) -> Result<Self, PathError> {
                    integral(&value)
                        .and_then(|i| $ty::try_from(i).ok())
                        .ok_or_else(|| mismatch::<Self>(&value))
                }
            }
        )*
    };
}

coerce_integers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Coerce for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn coerce(value: Value) -> Result<Self, PathError> {
        value.as_f64().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl Coerce for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn coerce(value: Value) -> Result<Self, PathError> {
        value
            .as_f64()
            .filter(|f| f.abs() <= f64::from(f32::MAX))
            .map(|f| f as f32)
            .ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl Coerce for bool {
    const TYPE_NAME: &'static str = "bool";

    fn coerce(value: Value) -> Result<Self, PathError> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl Coerce for String {
    const TYPE_NAME: &'static str = "String";

    fn coerce(value: Value) -> Result<Self, PathError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Coerce for Duration {
    const TYPE_NAME: &'static str = "Duration";

    fn coerce(value: Value) -> Result<Self, PathError> {
        match value {
            Value::String(s) => {
                humantime::parse_duration(s.trim()).map_err(|source| PathError::InvalidDuration {
                    value: s,
                    source,
                })
            }
            Value::Number(ref n) => n
                .as_u64()
                .map(Duration::from_nanos)
                .ok_or_else(|| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Coerce for Value {
    const TYPE_NAME: &'static str = "Value";

    fn coerce(value: Value) -> Result<Self, PathError> {
        Ok(value)
    }
}

macro_rules! leaf_fields {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LeafSlot for $ty {
                fn type_name(&self) -> &'static str {
                    <$ty as Coerce>::TYPE_NAME
                }

                fn assign(&mut self, value: Value) -> Result<(), PathError> {
                    *self = <$ty as Coerce>::coerce(value)?;
                    Ok(())
                }

                fn validate(&self, value: &Value) -> Result<(), PathError> {
                    <$ty as Coerce>::coerce(value.clone()).map(drop)
                }
            }

            impl Field for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Leaf(self)
                }
            }
        )*
    };
}

leaf_fields!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Duration, Value,
);
