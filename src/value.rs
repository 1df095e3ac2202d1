/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use crate::error::ConversionError;

/// The value cell carried by documents and result rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Blob(Vec<u8>),
    Text(String),
    Json(JsonValue),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Tinyint(v) => Some(*v as i64),
            Value::Smallint(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Bigint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    /// Render into plain JSON. Temporal values become their ISO-8601 text,
    /// blobs are base64 encoded.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Tinyint(v) => JsonValue::from(*v),
            Value::Smallint(v) => JsonValue::from(*v),
            Value::Int(v) => JsonValue::from(*v),
            Value::Bigint(v) => JsonValue::from(*v),
            Value::Float(v) => JsonValue::from(*v),
            Value::Double(v) => JsonValue::from(*v),
            Value::Blob(v) => JsonValue::String(base64::encode(v)),
            Value::Text(v) => JsonValue::String(v.to_owned()),
            Value::Json(v) => v.to_owned(),
            Value::Uuid(v) => JsonValue::String(v.to_string()),
            Value::Date(v) => JsonValue::String(v.to_string()),
            Value::Time(v) => JsonValue::String(v.to_string()),
            Value::DateTime(v) => JsonValue::String(v.to_string()),
            Value::Timestamp(v) => JsonValue::String(v.to_rfc3339()),
            Value::List(list) => JsonValue::Array(list.iter().map(Value::to_json).collect()),
            Value::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Lift plain JSON into a value. Integers land on `Bigint`, fractions on
    /// `Double`; strings stay text, no temporal sniffing is attempted.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(*v),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Bigint(i)
                } else {
                    Value::Double(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(s) => Value::Text(s.to_owned()),
            JsonValue::Array(list) => Value::List(list.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_owned(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Tinyint(_) => "tinyint",
            Value::Smallint(_) => "smallint",
            Value::Int(_) => "int",
            Value::Bigint(_) => "bigint",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Blob(_) => "blob",
            Value::Text(_) => "text",
            Value::Json(_) => "json",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Ok(Value::from_json(&json))
    }
}

pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(self.to_owned())
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_to_value {
    ($ty:ty, $variant:ident, $target:ty) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::$variant(self.to_owned() as $target)
            }
        }
    };
}

impl_unsigned_to_value!(u8, Smallint, i16);
impl_unsigned_to_value!(u16, Int, i32);
impl_unsigned_to_value!(u32, Bigint, i64);
impl_unsigned_to_value!(u64, Bigint, i64);
impl_unsigned_to_value!(usize, Bigint, i64);

impl_to_value! {
    bool => Bool,
    i8 => Tinyint,
    i16 => Smallint,
    i32 => Int,
    i64 => Bigint,
    f32 => Float,
    f64 => Double,
    Vec<u8> => Blob,
    String => Text,
    JsonValue => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.to_owned()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

pub trait FromValue: Sized {
    fn from_value_opt(value: &Value) -> Result<Self, ConversionError>;

    fn from_value(value: &Value) -> Self
    where
        Self: Default,
    {
        Self::from_value_opt(value).unwrap_or_default()
    }
}

macro_rules! impl_integer_from_value {
    ($ty:ty) => {
        impl FromValue for $ty {
            fn from_value_opt(value: &Value) -> Result<Self, ConversionError> {
                match value.as_i64() {
                    Some(v) => <$ty>::try_from(v).map_err(|_| {
                        ConversionError::type_mismatch_error(stringify!($ty), value.type_name())
                    }),
                    None => Err(ConversionError::type_mismatch_error(
                        stringify!($ty),
                        value.type_name(),
                    )),
                }
            }
        }
    };
}

impl_integer_from_value!(i8);
impl_integer_from_value!(i16);
impl_integer_from_value!(i32);
impl_integer_from_value!(i64);
impl_integer_from_value!(u32);
impl_integer_from_value!(u64);

impl FromValue for bool {
    fn from_value_opt(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Tinyint(v) => Ok(*v != 0),
            _ => Err(ConversionError::type_mismatch_error(
                "bool",
                value.type_name(),
            )),
        }
    }
}

impl FromValue for String {
    fn from_value_opt(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(s) => Ok(s.to_owned()),
            Value::Null => Err(ConversionError::null_value_error("String")),
            other => Ok(other.to_json().to_string()),
        }
    }
}

impl FromValue for f64 {
    fn from_value_opt(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(*v as f64),
            Value::Double(v) => Ok(*v),
            other => other
                .as_i64()
                .map(|v| v as f64)
                .ok_or_else(|| ConversionError::type_mismatch_error("f64", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let value = Value::Object(IndexMap::from_iter([
            ("id".to_string(), Value::Bigint(7)),
            ("name".to_string(), Value::Text("Kathryn".to_string())),
            ("active".to_string(), Value::Bool(true)),
        ]));
        let json = value.to_json();
        assert_eq!(json["id"], 7);
        assert_eq!(Value::from_json(&json), value);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(42i32.to_value(), Value::Int(42));
        assert_eq!("abc".to_value(), Value::Text("abc".to_string()));
        assert_eq!(Option::<i32>::None.to_value(), Value::Null);
        assert_eq!(i64::from_value_opt(&Value::Int(9)).unwrap(), 9);
        assert!(bool::from_value_opt(&Value::Text("x".to_string())).is_err());
    }

    #[test]
    fn test_blob_serializes_as_base64() {
        let json = Value::Blob(vec![1, 2, 3]).to_json();
        assert_eq!(json, JsonValue::String(base64::encode(&[1u8, 2, 3])));
    }
}
