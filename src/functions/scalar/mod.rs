// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalar function helpers
//!
//! Argument validation and the value conversions shared by scalar functions.

use crate::core::{DataType, Error, Result, Value};

/// Macro to validate argument count for scalar functions.
///
/// # Usage
/// ```ignore
/// // Exact count
/// validate_arg_count!(args, "UPPER", 1);
///
/// // Range (min, max inclusive)
/// validate_arg_count!(args, "REGEXP_LIKE", 2, 3);
/// ```
#[macro_export]
macro_rules! validate_arg_count {
    // Exact count
    ($args:expr, $name:expr, $exact:expr) => {
        if $args.len() != $exact {
            return Err($crate::core::Error::invalid_argument(format!(
                "{} requires exactly {} argument{}, got {}",
                $name,
                $exact,
                if $exact == 1 { "" } else { "s" },
                $args.len()
            )));
        }
    };
    // Range (min to max inclusive)
    ($args:expr, $name:expr, $min:expr, $max:expr) => {
        if $args.len() < $min || $args.len() > $max {
            return Err($crate::core::Error::invalid_argument(format!(
                "{} requires {} to {} arguments, got {}",
                $name,
                $min,
                $max,
                $args.len()
            )));
        }
    };
}

/// Convert a Value to its text form for string functions
///
/// Booleans render as `1`/`0`, the way MySQL converts them to strings.
/// NULL renders as the empty string; callers check for NULL first.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null(_) => String::new(),
        Value::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Timestamp(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        other => other.as_string().unwrap_or_default(),
    }
}

/// Try to convert a Value to i64
///
/// Floats and numeric strings are rounded half away from zero.
pub fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.round() as i64),
        Value::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
            })
        }
        Value::Boolean(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Convert a non-NULL argument to i64, failing with a conversion error
pub fn coerce_to_i64(value: &Value) -> Result<i64> {
    value_to_i64(value).ok_or_else(|| {
        Error::type_conversion(
            value.data_type().to_string(),
            DataType::Integer.to_string(),
        )
    })
}
