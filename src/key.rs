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

use std::collections::BTreeSet;

use crate::information::{TableDef, TableKey};
use crate::vector::FieldColumnVector;

/// Extracts primary-key and unique-key information from a table schema,
/// translated through the entity's field/column vector.
pub struct KeyResolver;

impl KeyResolver {
    /// The canonical `(column, field)` primary key of `schema`.
    ///
    /// A composite primary key collapses to the lexicographically first
    /// translated field name. A deliberate simplification, deterministic at
    /// every call site.
    pub fn primary_key(schema: &TableDef, vector: &FieldColumnVector) -> Option<(String, String)> {
        let key = schema
            .table_key
            .iter()
            .find(|k| k.is_pri())
            .map(TableKey::key)?;
        key.columns
            .iter()
            .map(|column| {
                let field = vector.field_of(column).unwrap_or(column).to_owned();
                (column.to_owned(), field)
            })
            .min_by(|(_, a), (_, b)| a.cmp(b))
    }

    /// One field set per declared unique constraint, columns translated to
    /// fields. Empty constraint definitions are skipped.
    pub fn unique_key_sets(schema: &TableDef, vector: &FieldColumnVector) -> Vec<BTreeSet<String>> {
        schema
            .table_key
            .iter()
            .filter(|k| k.is_unique())
            .filter_map(|k| {
                let key = k.key();
                if key.columns.is_empty() {
                    return None;
                }
                Some(
                    key.columns
                        .iter()
                        .map(|column| vector.field_of(column).unwrap_or(column).to_owned())
                        .collect::<BTreeSet<String>>(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::{ColumnDef, Key, TableDef, TableKey};
    use crate::types::SqlType;

    fn schema() -> TableDef {
        TableDef::new("t_employee")
            .with_column(ColumnDef::new("emp_no", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("badge", SqlType::Varchar))
            .with_column(ColumnDef::new("email", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["emp_no"])))
            .with_key(TableKey::UniqueKey(Key::of(&["badge", "email"])))
            .with_key(TableKey::UniqueKey(Key::of(&[])))
    }

    fn vector() -> FieldColumnVector {
        let mut vector = FieldColumnVector::new();
        vector.bind("empNo", "emp_no");
        vector.bind("badge", "badge");
        vector.bind("email", "email");
        vector
    }

    #[test]
    fn test_primary_key() {
        let pk = KeyResolver::primary_key(&schema(), &vector()).unwrap();
        assert_eq!(pk, ("emp_no".to_string(), "empNo".to_string()));
    }

    #[test]
    fn test_composite_primary_key_is_deterministic() {
        let schema = TableDef::new("t_link")
            .with_key(TableKey::PrimaryKey(Key::of(&["right_id", "left_id"])));
        let mut vector = FieldColumnVector::new();
        vector.bind("rightId", "right_id");
        vector.bind("leftId", "left_id");
        // lexicographically first translated field wins
        let pk = KeyResolver::primary_key(&schema, &vector).unwrap();
        assert_eq!(pk, ("left_id".to_string(), "leftId".to_string()));
    }

    #[test]
    fn test_unique_key_sets_skip_empty() {
        let sets = KeyResolver::unique_key_sets(&schema(), &vector());
        assert_eq!(sets.len(), 1);
        assert!(sets[0].contains("badge"));
        assert!(sets[0].contains("email"));
    }

    #[test]
    fn test_untranslated_column_passes_through() {
        let schema =
            TableDef::new("t_raw").with_key(TableKey::PrimaryKey(Key::of(&["opaque_id"])));
        let pk = KeyResolver::primary_key(&schema, &FieldColumnVector::new()).unwrap();
        assert_eq!(pk, ("opaque_id".to_string(), "opaque_id".to_string()));
    }
}
