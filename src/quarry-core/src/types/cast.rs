//! Plan-time literal evaluation.
//!
//! `cast_value` converts a literal into a target type the way the execution
//! engine would, failing deterministically with `CastError` when the
//! conversion is invalid or unsupported at plan time.

use chrono::{NaiveDate, NaiveDateTime};

use common_error::{QuarryError, QuarryResult};

use super::{DataType, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cast a literal value to the target data type.
///
/// NULL casts to NULL of any type. Non-string literals are never converted to
/// strings: the evaluator does not format literals.
pub fn cast_value(value: &Value, target: &DataType) -> QuarryResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match target {
        DataType::Null => Err(cast_failure(value, target)),
        DataType::Boolean => to_boolean(value, target).map(Value::Boolean),
        DataType::TinyInt
        | DataType::SmallInt
        | DataType::Int
        | DataType::BigInt
        | DataType::LargeInt => {
            let wide = to_i128(value, target)?;
            integer_value(wide, target)
        }
        DataType::Float => {
            let v = to_f64(value, target)?;
            let narrowed = v as f32;
            if v.is_finite() && !narrowed.is_finite() {
                return Err(overflow(value, target));
            }
            Ok(Value::Float(narrowed))
        }
        DataType::Double => to_f64(value, target).map(Value::Double),
        DataType::Varchar | DataType::Char => match value {
            Value::Varchar(s) => Ok(Value::Varchar(s.clone())),
            _ => Err(cast_failure(value, target)),
        },
        DataType::Date => match value {
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::DateTime(dt) => Ok(Value::Date(dt.date())),
            Value::Varchar(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| cast_failure(value, target)),
            _ => Err(cast_failure(value, target)),
        },
        DataType::DateTime => match value {
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(Value::DateTime)
                .ok_or_else(|| cast_failure(value, target)),
            Value::Varchar(s) => parse_datetime(s.trim())
                .map(Value::DateTime)
                .ok_or_else(|| cast_failure(value, target)),
            _ => Err(cast_failure(value, target)),
        },
        DataType::Array(item_type) => match value {
            Value::Array { items, .. } => {
                let items = items
                    .iter()
                    .map(|item| cast_value(item, item_type))
                    .collect::<QuarryResult<Vec<_>>>()?;
                Ok(Value::array(item_type.as_ref().clone(), items))
            }
            _ => Err(cast_failure(value, target)),
        },
    }
}

fn to_boolean(value: &Value, target: &DataType) -> QuarryResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Varchar(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(cast_failure(value, target)),
        },
        other => other
            .as_i128()
            .map(|v| v != 0)
            .ok_or_else(|| cast_failure(value, target)),
    }
}

fn to_i128(value: &Value, target: &DataType) -> QuarryResult<i128> {
    match value {
        Value::Boolean(b) => Ok(i128::from(*b)),
        Value::Float(v) => float_to_i128(f64::from(*v), value, target),
        Value::Double(v) => float_to_i128(*v, value, target),
        Value::Varchar(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|_| cast_failure(value, target)),
        other => other.as_i128().ok_or_else(|| cast_failure(value, target)),
    }
}

fn float_to_i128(v: f64, value: &Value, target: &DataType) -> QuarryResult<i128> {
    // i128 bounds are exactly representable as f64 powers of two.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let truncated = v.trunc();
    if !truncated.is_finite() || truncated >= LIMIT || truncated < -LIMIT {
        return Err(overflow(value, target));
    }
    Ok(truncated as i128)
}

fn to_f64(value: &Value, target: &DataType) -> QuarryResult<f64> {
    match value {
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Float(v) => Ok(f64::from(*v)),
        Value::Double(v) => Ok(*v),
        Value::Varchar(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| cast_failure(value, target)),
        other => other
            .as_i128()
            .map(|v| v as f64)
            .ok_or_else(|| cast_failure(value, target)),
    }
}

fn integer_value(v: i128, target: &DataType) -> QuarryResult<Value> {
    let out_of_range = || {
        QuarryError::cast_error(format!("value {v} out of range for {target}"))
    };
    match target {
        DataType::TinyInt => i8::try_from(v).map(Value::TinyInt).map_err(|_| out_of_range()),
        DataType::SmallInt => i16::try_from(v).map(Value::SmallInt).map_err(|_| out_of_range()),
        DataType::Int => i32::try_from(v).map(Value::Int).map_err(|_| out_of_range()),
        DataType::BigInt => i64::try_from(v).map(Value::BigInt).map_err(|_| out_of_range()),
        DataType::LargeInt => Ok(Value::LargeInt(v)),
        _ => Err(QuarryError::internal(format!("{target} is not an integer type"))),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn cast_failure(value: &Value, target: &DataType) -> QuarryError {
    QuarryError::cast_error(format!(
        "cannot cast {} literal '{value}' to {target}",
        value.data_type()
    ))
}

fn overflow(value: &Value, target: &DataType) -> QuarryError {
    QuarryError::cast_error(format!("literal '{value}' overflows {target}"))
}
