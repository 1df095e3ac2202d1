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

use std::ops::Index;

use crate::document::Document;
use crate::error::ConversionError;
use crate::value::{FromValue, Value};

/// One raw relational row: column names plus values in column order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Row {
    pub columns: Vec<String>,
    pub data: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, data: Vec<Value>) -> Self {
        Self { columns, data }
    }

    /// Returns length of a row.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns columns of this row.
    pub fn columns_ref(&self) -> &[String] {
        &self.columns
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    pub fn get_value_by_column(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.data.get(idx))
    }

    pub fn get_by_column<T>(&self, column: &str) -> Option<Result<T, ConversionError>>
    where
        T: FromValue,
    {
        self.get_value_by_column(column).map(T::from_value_opt)
    }

    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            columns: &self.columns,
            data: &self.data,
            index: 0,
        }
    }

    pub fn as_document(&self) -> Document {
        self.iter()
            .map(|(column, value)| (column.to_owned(), value.to_owned()))
            .collect()
    }

    pub fn into_document(self) -> Document {
        self.columns.into_iter().zip(self.data).collect()
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.data[index]
    }
}

impl<'a> Index<&'a str> for Row {
    type Output = Value;

    fn index(&self, column: &'a str) -> &Value {
        match self.get_value_by_column(column) {
            Some(value) => value,
            None => panic!(
                "No such column: `{}` in row with columns: {:?}",
                column, self.columns
            ),
        }
    }
}

/// Iterator of the row
pub struct RowIter<'a> {
    columns: &'a [String],
    data: &'a [Value],
    index: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = (&'a String, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.columns.len() && self.index < self.data.len() {
            let column = &self.columns[self.index];
            let value = &self.data[self.index];
            self.index += 1;
            Some((column, value))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.columns.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_operations() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let data = vec![Value::Int(1), Value::Text("test".to_string())];
        let row = Row::new(columns, data);

        assert_eq!(row.len(), 2);
        assert!(row.contains_column("id"));
        assert!(!row.contains_column("nonexistent"));
        assert_eq!(row["name"], Value::Text("test".to_string()));
        assert_eq!(
            row.get_by_column::<String>("name").unwrap().unwrap(),
            "test"
        );
    }

    #[test]
    fn test_row_into_document() {
        let row = Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(2), Value::Text("Bob".to_string())],
        );
        let doc = row.into_document();
        assert_eq!(doc.field_names(), vec!["id", "name"]);
        assert_eq!(doc.get("id"), Some(&Value::Int(2)));
    }
}
