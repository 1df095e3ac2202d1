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

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::ConversionError;
use crate::value::{ToValue, Value};

/// An ordered, string-keyed document.
///
/// The only payload shape the engine understands: requests, responses,
/// delete conditions and assembled join results all travel as documents.
/// Key order is insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize any `Serialize` entity into a document. Fails when the
    /// entity does not serialize to a JSON object.
    pub fn from_entity<T: Serialize>(entity: &T) -> Result<Self, ConversionError> {
        let json = serde_json::to_value(entity)?;
        match Value::from_json(&json) {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(ConversionError::type_mismatch_error(
                "object",
                other.type_name(),
            )),
        }
    }

    /// Deserialize the document back into an entity.
    pub fn to_entity<T: for<'de> Deserialize<'de>>(&self) -> Result<T, ConversionError> {
        let json = Value::Object(self.entries.clone()).to_json();
        Ok(serde_json::from_value(json)?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    pub fn put<K: Into<String>, V: ToValue>(&mut self, field: K, value: V) -> Option<Value> {
        self.entries.insert(field.into(), value.to_value())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.entries.shift_remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.entries.clone()
    }

    /// Merge `other` into `self`, inserting only the keys not already
    /// present. Existing entries always win.
    pub fn merge_absent(&mut self, other: &Document) {
        for (field, value) in other.iter() {
            if !self.entries.contains_key(field) {
                self.entries.insert(field.to_owned(), value.to_owned());
            }
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        match Value::from_json(&json) {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(serde::de::Error::custom("expected a JSON object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut doc = Document::new();
        doc.put("id", 1i64);
        doc.put("name", "Alice");
        assert_eq!(doc.get("id"), Some(&Value::Bigint(1)));
        assert_eq!(doc.field_names(), vec!["id", "name"]);
        assert_eq!(doc.remove("id"), Some(Value::Bigint(1)));
        assert!(!doc.contains("id"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut doc = Document::new();
        for key in ["z", "a", "m"] {
            doc.put(key, 0i32);
        }
        assert_eq!(doc.field_names(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_merge_absent_prefers_existing() {
        let mut main = Document::new();
        main.put("id", 1i64);
        main.put("name", "main");

        let mut other = Document::new();
        other.put("name", "other");
        other.put("extra", true);

        main.merge_absent(&other);
        assert_eq!(main.get("name"), Some(&Value::Text("main".to_string())));
        assert_eq!(main.get("extra"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_entity_round_trip() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Employee {
            id: i64,
            name: String,
        }

        let emp = Employee {
            id: 3,
            name: "Bob".to_string(),
        };
        let doc = Document::from_entity(&emp).unwrap();
        assert_eq!(doc.get("id"), Some(&Value::Bigint(3)));
        let back: Employee = doc.to_entity().unwrap();
        assert_eq!(back, emp);
    }

    #[test]
    fn test_from_entity_rejects_non_objects() {
        assert!(Document::from_entity(&42i32).is_err());
    }
}
