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

//! Joined-read assembly.
//!
//! Turns raw relational rows into a single merged, alias-aware document
//! per row, using the join graph's column-owner index and each node's
//! field/column vector.

use std::sync::Arc;

use crate::data::Row;
use crate::document::Document;
use crate::error::RelmapError;
use crate::exchange::Exchange;
use crate::join::JoinGraph;
use crate::metadata::EntityMetadata;

pub struct ResultAssembler;

impl ResultAssembler {
    /// Assemble one raw row into its outward document shape.
    ///
    /// A column that is a registered alias passes through unchanged - it
    /// already carries its final output name. Anything else is translated
    /// column -> owning table -> field, and written under the field's
    /// declared payload name when one exists. Columns no node knows about
    /// pass through untranslated.
    pub fn build_row(row: &Row, graph: &JoinGraph) -> Document {
        let mut doc = Document::new();
        for (column, value) in row.iter() {
            if graph.alias_record(column).is_some() {
                doc.put(column.to_owned(), value.to_owned());
                continue;
            }
            let translated = graph
                .column_owner(column)
                .and_then(|table| graph.node_of_table(table))
                .and_then(|node| {
                    node.vector.field_of(column).map(|field| {
                        node.payload_alias_of(field).unwrap_or(field).to_owned()
                    })
                });
            match translated {
                Some(name) => doc.put(name, value.to_owned()),
                None => doc.put(column.to_owned(), value.to_owned()),
            };
        }
        doc
    }

    /// Assemble every row, dropping rows that produce no document.
    pub fn build_rows(rows: &[Row], graph: &JoinGraph) -> Vec<Document> {
        rows.iter()
            .map(|row| Self::build_row(row, graph))
            .filter(|doc| !doc.is_empty())
            .collect()
    }

    /// Merge a primary entity document with its joined secondaries.
    ///
    /// The primary is pushed through the alias-out exchange, each secondary
    /// likewise against its own node, and only the keys not already present
    /// are taken over - the main entity takes precedence on collision.
    pub fn build_merged(
        primary: &Document,
        node: &EntityMetadata,
        secondaries: &[(Document, Arc<EntityMetadata>)],
        graph: &JoinGraph,
    ) -> Result<Document, RelmapError> {
        let mut merged = Exchange::ToPayloadAlias.apply(primary, node, graph)?;
        for (doc, secondary_node) in secondaries {
            let aliased = Exchange::ToPayloadAlias.apply(doc, secondary_node, graph)?;
            merged.merge_absent(&aliased);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::{ColumnDef, EntityDef, EntityField, Key, TableDef, TableKey};
    use crate::join::JoinGraph;
    use crate::types::SqlType;
    use crate::value::Value;

    fn employee() -> Arc<EntityMetadata> {
        let def = EntityDef::new("Employee", "t_employee")
            .with_field(EntityField::new("id", SqlType::Bigint).id())
            .with_field(EntityField::new("deptId", SqlType::Bigint))
            .with_field(EntityField::new("empName", SqlType::Varchar).with_alias("employeeName"));
        let schema = TableDef::new("t_employee")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("dept_id", SqlType::Bigint))
            .with_column(ColumnDef::new("emp_name", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["id"])));
        Arc::new(EntityMetadata::build(&def, &schema))
    }

    fn department() -> Arc<EntityMetadata> {
        let def = EntityDef::new("Department", "t_department")
            .with_field(EntityField::new("id", SqlType::Bigint).id())
            .with_field(EntityField::new("deptName", SqlType::Varchar));
        let schema = TableDef::new("t_department")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("dept_name", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["id"])));
        Arc::new(EntityMetadata::build(&def, &schema))
    }

    fn graph() -> JoinGraph {
        let mut graph = JoinGraph::new(employee(), department(), "dept_id", "id");
        graph
            .register_alias("t_department", "deptName", "departmentName")
            .unwrap();
        graph
    }

    #[test]
    fn test_build_row_translates_and_aliases() {
        let graph = graph();
        let row = Row::new(
            vec![
                "emp_name".to_string(),
                "dept_name".to_string(),
                "departmentName".to_string(),
                "mystery_col".to_string(),
            ],
            vec![
                Value::Text("Dana".to_string()),
                Value::Text("Research".to_string()),
                Value::Text("Research".to_string()),
                Value::Int(1),
            ],
        );
        let doc = ResultAssembler::build_row(&row, &graph);
        // declared payload alias beats the field name
        assert_eq!(
            doc.get("employeeName"),
            Some(&Value::Text("Dana".to_string()))
        );
        // normal translation column -> field
        assert_eq!(
            doc.get("deptName"),
            Some(&Value::Text("Research".to_string()))
        );
        // registered alias bypasses translation
        assert_eq!(
            doc.get("departmentName"),
            Some(&Value::Text("Research".to_string()))
        );
        // unknown columns pass through
        assert_eq!(doc.get("mystery_col"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_build_rows_filters_empty() {
        let graph = graph();
        let rows = vec![
            Row::new(vec!["emp_name".to_string()], vec![Value::Text("A".into())]),
            Row::default(),
        ];
        let docs = ResultAssembler::build_rows(&rows, &graph);
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_build_merged_primary_wins() {
        let graph = graph();
        let emp = employee();
        let dept = department();

        let mut primary = Document::new();
        primary.put("id", 1i64);
        primary.put("empName", "Dana");

        let mut secondary = Document::new();
        secondary.put("id", 9i64); // collides with the primary's id
        secondary.put("deptName", "Research");

        let merged = ResultAssembler::build_merged(
            &primary,
            &emp,
            &[(secondary, Arc::clone(&dept))],
            &graph,
        )
        .unwrap();
        assert_eq!(merged.get("id"), Some(&Value::Bigint(1)));
        assert_eq!(
            merged.get("deptName"),
            Some(&Value::Text("Research".to_string()))
        );
        // the secondary's alias-out copy came along
        assert_eq!(
            merged.get("departmentName"),
            Some(&Value::Text("Research".to_string()))
        );
    }
}
