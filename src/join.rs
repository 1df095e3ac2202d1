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

//! Multi-table join bookkeeping.
//!
//! A `JoinGraph` holds the joined entity nodes, the generated short table
//! aliases (`TL` for the left node, `TR0`, `TR1`, ... for each joined
//! node), the per-table join-key index, the reverse column-owner index and
//! the registry of user-declared logical aliases. The graph is built once
//! (`new` + `add` + `register_alias`) and treated as immutable afterwards;
//! concurrent reads then need no locks.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comm;
use crate::error::RelmapError;
use crate::metadata::EntityMetadata;

/// Short alias of the left (driving) table.
pub static LEFT_ALIAS: &str = "TL";
/// Alias prefix of joined tables, suffixed with the join index.
pub static RIGHT_ALIAS_PREFIX: &str = "TR";

/// A column/column pair describing how one joined table's row relates to
/// another's. `k` is the owning table's column, `v` the counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kv {
    pub k: String,
    pub v: String,
}

impl Kv {
    pub fn new(k: &str, v: &str) -> Self {
        Self {
            k: k.to_owned(),
            v: v.to_owned(),
        }
    }
}

/// A user-declared logical alias: `alias` stands for `field` of the entity
/// backed by `table` in outward-facing documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub table: String,
    pub field: String,
    pub alias: String,
}

impl AliasRecord {
    pub fn new(table: &str, field: &str, alias: &str) -> Self {
        Self {
            table: table.to_owned(),
            field: field.to_owned(),
            alias: alias.to_owned(),
        }
    }

    pub fn is_ok(&self) -> bool {
        !self.table.is_empty() && !self.field.is_empty() && !self.alias.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct JoinGraph {
    nodes: Vec<Arc<EntityMetadata>>,
    alias_of_table: IndexMap<String, String>,
    /// join-key pairs keyed by the table owning the foreign key, stored in
    /// reversed orientation relative to the `new`/`add` arguments: the
    /// owning table stores `(its column, counterpart column)` so that a
    /// joined table can always resolve the pair from its own perspective
    join_keys: IndexMap<String, Vec<Kv>>,
    /// reverse column index, first writer wins on duplicate column names
    column_owner: IndexMap<String, String>,
    alias_registry: IndexMap<String, AliasRecord>,
}

impl JoinGraph {
    /// Join `left` and `right` on `left.on_left_col = right.on_right_col`.
    pub fn new(
        left: Arc<EntityMetadata>,
        right: Arc<EntityMetadata>,
        on_left_col: &str,
        on_right_col: &str,
    ) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            alias_of_table: IndexMap::new(),
            join_keys: IndexMap::new(),
            column_owner: IndexMap::new(),
            alias_registry: IndexMap::new(),
        };
        graph
            .alias_of_table
            .insert(left.table_name(), LEFT_ALIAS.to_owned());
        graph
            .alias_of_table
            .insert(right.table_name(), format!("{}0", RIGHT_ALIAS_PREFIX));
        graph.index_columns(&left);
        graph.index_columns(&right);
        // reversed orientation: keyed by the joined table, its own column
        // first
        graph.join_keys.insert(
            right.table_name(),
            vec![Kv::new(on_right_col, on_left_col)],
        );
        debug!(
            left = %left.table_name(),
            right = %right.table_name(),
            on = %format!("{} = {}", on_left_col, on_right_col),
            "joining tables"
        );
        graph.nodes.push(left);
        graph.nodes.push(right);
        graph
    }

    /// Append another node, joining `node.on.v` to the driving side's
    /// `on.k`. Allocates the next `TR<n>` alias.
    pub fn add(mut self, node: Arc<EntityMetadata>, on: Kv) -> Self {
        let next = self.nodes.len() - 1;
        self.alias_of_table.insert(
            node.table_name(),
            format!("{}{}", RIGHT_ALIAS_PREFIX, next),
        );
        self.index_columns(&node);
        self.join_keys
            .entry(node.table_name())
            .or_default()
            .push(Kv::new(&on.v, &on.k));
        self.nodes.push(node);
        self
    }

    fn index_columns(&mut self, node: &EntityMetadata) {
        let table = node.table_name();
        for column in node.vector.columns() {
            self.column_owner
                .entry(column.to_owned())
                .or_insert_with(|| table.to_owned());
        }
    }

    pub fn nodes(&self) -> &[Arc<EntityMetadata>] {
        &self.nodes
    }

    pub fn node_of_table(&self, table: &str) -> Option<&Arc<EntityMetadata>> {
        self.nodes.iter().find(|n| n.table_name() == table)
    }

    pub fn node_of_entity(&self, entity: &str) -> Option<&Arc<EntityMetadata>> {
        self.nodes.iter().find(|n| n.entity == entity)
    }

    /// The generated short alias of `table`.
    pub fn alias_of(&self, table: &str) -> Option<&str> {
        self.alias_of_table.get(table).map(String::as_str)
    }

    /// The table owning `column`, per the first-writer-wins reverse index.
    pub fn column_owner(&self, column: &str) -> Option<&str> {
        self.column_owner.get(column).map(String::as_str)
    }

    /// Declare a logical alias for `field` of the entity backed by `table`.
    ///
    /// The alias must be a legal identifier in both the field namespace and
    /// the schema namespace and must not collide with any declared field or
    /// payload name of the owning entity, nor with an already-registered
    /// alias. Violations fail fast with `Conflict`.
    pub fn register_alias(
        &mut self,
        table: &str,
        field: &str,
        alias: &str,
    ) -> Result<(), RelmapError> {
        if !comm::is_field_ident(alias) || !comm::is_sql_ident(alias) {
            return Err(RelmapError::conflict(format!(
                "alias `{}` is not a legal identifier",
                alias
            )));
        }
        if self.alias_registry.contains_key(alias) {
            return Err(RelmapError::conflict(format!(
                "alias `{}` is already registered",
                alias
            )));
        }
        if let Some(node) = self.node_of_table(table) {
            if node.declares_name(alias) {
                return Err(RelmapError::conflict(format!(
                    "alias `{}` collides with a declared name of entity `{}`",
                    alias, node.entity
                )));
            }
        }
        self.alias_registry
            .insert(alias.to_owned(), AliasRecord::new(table, field, alias));
        Ok(())
    }

    pub fn alias_record(&self, alias: &str) -> Option<&AliasRecord> {
        self.alias_registry.get(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &AliasRecord> {
        self.alias_registry.values()
    }

    /// All join-key sets, keyed by owning table.
    pub fn all_join_keys(&self) -> impl Iterator<Item = (&str, &[Kv])> {
        self.join_keys
            .iter()
            .map(|(t, pairs)| (t.as_str(), pairs.as_slice()))
    }

    /// The join-key set of the table backing `entity`.
    ///
    /// Returns `None` for the primary/root entity, telling the caller to
    /// look at the aggregate join-key set across all tables; any joined
    /// entity gets its own, possibly empty, set.
    pub fn join_keys_for(&self, entity: &str) -> Option<&[Kv]> {
        let node = self.node_of_entity(entity)?;
        if self.find_primary_entity().entity == node.entity {
            return None;
        }
        Some(
            self.join_keys
                .get(&node.table_name())
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        )
    }

    /// The root of the join graph: the node whose primary key is not the
    /// local side of any join-key pair, i.e. the entity nothing else joins
    /// onto. The left node is checked first, then the right; when neither
    /// qualifies the left node is the default.
    pub fn find_primary_entity(&self) -> Arc<EntityMetadata> {
        let local_sides = self
            .join_keys
            .values()
            .flatten()
            .map(|kv| kv.k.as_str())
            .collect::<Vec<&str>>();
        for node in &self.nodes {
            match node.pk_column() {
                Some(pk) if local_sides.contains(&pk) => continue,
                _ => return Arc::clone(node),
            }
        }
        Arc::clone(&self.nodes[0])
    }

    /// Resolve `field` to `(table_alias, column)`.
    ///
    /// The left node is checked first, then the remaining nodes in
    /// registration order; the first match wins. A field declared on two
    /// joined entities silently resolves to the earlier node - documented
    /// first-match policy, not an error.
    pub fn resolve_column(&self, field: &str) -> Result<(String, String), RelmapError> {
        for node in &self.nodes {
            if let Some(column) = node.vector.column_of(field) {
                let alias = self
                    .alias_of(&node.table_name())
                    .unwrap_or(LEFT_ALIAS)
                    .to_owned();
                return Ok((alias, column.to_owned()));
            }
        }
        Err(RelmapError::not_found(format!(
            "field `{}` has no resolvable column in the join graph",
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::{ColumnDef, EntityDef, EntityField, Key, TableDef, TableKey};
    use crate::metadata::EntityMetadata;
    use crate::types::SqlType;

    fn employee() -> Arc<EntityMetadata> {
        let def = EntityDef::new("Employee", "t_employee")
            .with_field(EntityField::new("id", SqlType::Bigint).id())
            .with_field(EntityField::new("deptId", SqlType::Bigint))
            .with_field(EntityField::new("name", SqlType::Varchar));
        let schema = TableDef::new("t_employee")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("dept_id", SqlType::Bigint))
            .with_column(ColumnDef::new("name", SqlType::Varchar))
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
        JoinGraph::new(employee(), department(), "dept_id", "id")
    }

    #[test]
    fn test_alias_generation() {
        let graph = graph();
        assert_eq!(graph.alias_of("t_employee"), Some("TL"));
        assert_eq!(graph.alias_of("t_department"), Some("TR0"));
    }

    #[test]
    fn test_join_key_reversal() {
        let graph = graph();
        let keys = graph.join_keys_for("Department").unwrap();
        assert_eq!(keys, &[Kv::new("id", "dept_id")]);
    }

    #[test]
    fn test_primary_entity_detection() {
        // Department was registered second, but nothing joins onto
        // Employee's key
        let graph = graph();
        assert_eq!(graph.find_primary_entity().entity, "Employee");
        assert!(graph.join_keys_for("Employee").is_none());
    }

    #[test]
    fn test_column_owner_first_writer_wins() {
        let graph = graph();
        // both tables own an `id` column, the left node is indexed first
        assert_eq!(graph.column_owner("id"), Some("t_employee"));
        assert_eq!(graph.column_owner("dept_name"), Some("t_department"));
    }

    #[test]
    fn test_resolve_column_first_match() {
        let graph = graph();
        let (alias, column) = graph.resolve_column("deptName").unwrap();
        assert_eq!((alias.as_str(), column.as_str()), ("TR0", "dept_name"));

        // `id` exists on both entities, the left node wins
        let (alias, column) = graph.resolve_column("id").unwrap();
        assert_eq!((alias.as_str(), column.as_str()), ("TL", "id"));

        let err = graph.resolve_column("nothing").unwrap_err();
        assert!(matches!(err, RelmapError::NotFound(_)));
    }

    #[test]
    fn test_register_alias_conflicts() {
        let mut graph = graph();
        // collides with a declared field of Department
        let err = graph
            .register_alias("t_department", "deptName", "deptName")
            .unwrap_err();
        assert!(matches!(err, RelmapError::Conflict(_)));

        // not a legal identifier
        assert!(graph
            .register_alias("t_department", "deptName", "dept-name")
            .is_err());

        graph
            .register_alias("t_department", "deptName", "departmentName")
            .unwrap();
        let record = graph.alias_record("departmentName").unwrap();
        assert!(record.is_ok());
        assert_eq!(record.field, "deptName");

        // double registration is a conflict, never an overwrite
        assert!(graph
            .register_alias("t_department", "deptName", "departmentName")
            .is_err());
    }

    #[test]
    fn test_add_third_table() {
        let city_def = EntityDef::new("City", "t_city")
            .with_field(EntityField::new("id", SqlType::Bigint).id())
            .with_field(EntityField::new("cityName", SqlType::Varchar));
        let city_schema = TableDef::new("t_city")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("city_name", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["id"])));
        let city = Arc::new(EntityMetadata::build(&city_def, &city_schema));

        let graph = graph().add(city, Kv::new("city_id", "id"));
        assert_eq!(graph.alias_of("t_city"), Some("TR1"));
        let keys = graph.join_keys_for("City").unwrap();
        assert_eq!(keys, &[Kv::new("id", "city_id")]);
        assert_eq!(graph.find_primary_entity().entity, "Employee");
    }
}
