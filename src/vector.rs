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
use serde::{Deserialize, Serialize};

/// The bidirectional field/column mapping owned by one entity's metadata.
///
/// `field_to_column` and `column_to_field` stay bijective on the covered
/// subset: binding a field that already points at another column (or a
/// column already pointed at) drops the stale reverse entry first.
/// `field_json_to_field` is the secondary alias layer for payload naming
/// differences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldColumnVector {
    field_to_column: IndexMap<String, String>,
    column_to_field: IndexMap<String, String>,
    field_json_to_field: IndexMap<String, String>,
}

impl FieldColumnVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `field` to `column`, keeping both directions consistent.
    pub fn bind(&mut self, field: &str, column: &str) {
        if let Some(old_column) = self.field_to_column.insert(field.to_owned(), column.to_owned())
        {
            self.column_to_field.shift_remove(&old_column);
        }
        if let Some(old_field) = self.column_to_field.insert(column.to_owned(), field.to_owned())
        {
            if old_field != field {
                self.field_to_column.shift_remove(&old_field);
            }
        }
    }

    /// Forward-only binding for a field mapped after column exhaustion:
    /// the field gets its column, the reverse entry keeps its first owner.
    pub fn bind_forward(&mut self, field: &str, column: &str) {
        self.field_to_column
            .insert(field.to_owned(), column.to_owned());
        self.column_to_field
            .entry(column.to_owned())
            .or_insert_with(|| field.to_owned());
    }

    /// Register a payload-name lookup key for `field`.
    pub fn bind_json(&mut self, json_name: &str, field: &str) {
        self.field_json_to_field
            .insert(json_name.to_owned(), field.to_owned());
    }

    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.field_to_column.get(field).map(String::as_str)
    }

    pub fn field_of(&self, column: &str) -> Option<&str> {
        self.column_to_field.get(column).map(String::as_str)
    }

    /// Resolve a payload name to the field it stands for.
    pub fn field_of_json(&self, json_name: &str) -> Option<&str> {
        self.field_json_to_field.get(json_name).map(String::as_str)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.field_to_column.contains_key(field)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.column_to_field.contains_key(column)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_to_column.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.column_to_field.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.field_to_column
            .iter()
            .map(|(f, c)| (f.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.field_to_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_to_column.is_empty()
    }

    /// Layer another vector on top of this one without destroying existing
    /// bindings: only pairs whose field and column are both still free are
    /// taken over, json lookup keys merge the same way.
    pub fn combine(&mut self, other: &FieldColumnVector) {
        for (field, column) in other.iter() {
            if !self.contains_field(field) && !self.contains_column(column) {
                self.bind(field, column);
            }
        }
        for (json_name, field) in other.field_json_to_field.iter() {
            self.field_json_to_field
                .entry(json_name.to_owned())
                .or_insert_with(|| field.to_owned());
        }
    }
}
