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

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::information::{EntityDef, EntityField, TableDef, TableName};
use crate::key::KeyResolver;
use crate::mapper::ColumnMapper;
use crate::types::SqlType;
use crate::vector::FieldColumnVector;

/// The per-entity descriptor: table, field types, canonical primary key and
/// the field/column vector. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub entity: String,
    pub table: TableName,
    pub fields: Vec<EntityField>,
    pub field_types: IndexMap<String, SqlType>,
    /// canonical `(column, field)` primary key
    pub primary_key: Option<(String, String)>,
    pub vector: FieldColumnVector,
}

impl EntityMetadata {
    /// Build metadata for one entity from its declared fields and the
    /// schema descriptor of its backing table.
    pub fn build(def: &EntityDef, schema: &TableDef) -> Self {
        let columns = schema.column_names();
        let vector = ColumnMapper::new().build(&columns, &def.fields);
        let field_types = def
            .fields
            .iter()
            .map(|f| (f.name.to_owned(), f.sql_type.to_owned()))
            .collect::<IndexMap<String, SqlType>>();
        let primary_key = KeyResolver::primary_key(schema, &vector).or_else(|| {
            // no declared table key, fall back to the entity-side id marker
            def.fields.iter().find(|f| f.id).and_then(|f| {
                vector
                    .column_of(&f.name)
                    .map(|c| (c.to_owned(), f.name.to_owned()))
            })
        });
        Self {
            entity: def.entity.to_owned(),
            table: TableName::from(&def.table),
            fields: def.fields.to_owned(),
            field_types,
            primary_key,
            vector,
        }
    }

    pub fn table_name(&self) -> String {
        self.table.name()
    }

    pub fn pk_column(&self) -> Option<&str> {
        self.primary_key.as_ref().map(|(c, _)| c.as_str())
    }

    pub fn pk_field(&self) -> Option<&str> {
        self.primary_key.as_ref().map(|(_, f)| f.as_str())
    }

    /// The declared payload name of `field`, when one exists.
    pub fn payload_alias_of(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.alias.as_deref())
    }

    /// Whether `name` collides with a declared field name or a declared
    /// payload alias of this entity.
    pub fn declares_name(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == name || f.alias.as_deref() == Some(name))
    }
}

/// Process-lifetime cache of entity metadata, keyed by entity name.
///
/// Explicitly constructed and injected rather than global. Population is
/// first-write-wins: concurrent callers racing on a previously-unseen
/// entity all observe the same winning instance; reads after construction
/// take no locks beyond the shard lookup.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    cache: DashMap<String, Arc<EntityMetadata>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached metadata for `def.entity`, building it on first
    /// use. Repeat calls are pure cache hits; metadata is never rebuilt.
    pub fn get_or_create(&self, def: &EntityDef, schema: &TableDef) -> Arc<EntityMetadata> {
        if let Some(meta) = self.cache.get(&def.entity) {
            return meta.to_owned();
        }
        self.cache
            .entry(def.entity.to_owned())
            .or_insert_with(|| {
                debug!(entity = %def.entity, table = %def.table, "building entity metadata");
                Arc::new(EntityMetadata::build(def, schema))
            })
            .to_owned()
    }

    pub fn get(&self, entity: &str) -> Option<Arc<EntityMetadata>> {
        self.cache.get(entity).map(|m| m.to_owned())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::{ColumnDef, Key, TableKey};

    fn employee_def() -> EntityDef {
        EntityDef::new("Employee", "t_employee")
            .with_field(EntityField::new("id", SqlType::Bigint).id())
            .with_field(EntityField::new("deptId", SqlType::Bigint))
            .with_field(EntityField::new("name", SqlType::Varchar))
    }

    fn employee_schema() -> TableDef {
        TableDef::new("t_employee")
            .with_column(ColumnDef::new("id", SqlType::Bigint).identity())
            .with_column(ColumnDef::new("dept_id", SqlType::Bigint))
            .with_column(ColumnDef::new("name", SqlType::Varchar))
            .with_key(TableKey::PrimaryKey(Key::of(&["id"])))
    }

    #[test]
    fn test_build_metadata() {
        let meta = EntityMetadata::build(&employee_def(), &employee_schema());
        assert_eq!(meta.table_name(), "t_employee");
        assert_eq!(meta.vector.column_of("deptId"), Some("dept_id"));
        assert_eq!(meta.pk_column(), Some("id"));
        assert_eq!(meta.pk_field(), Some("id"));
        assert_eq!(meta.field_types.get("name"), Some(&SqlType::Varchar));
    }

    #[test]
    fn test_pk_falls_back_to_id_marker() {
        let mut schema = employee_schema();
        schema.table_key.clear();
        let meta = EntityMetadata::build(&employee_def(), &schema);
        assert_eq!(meta.primary_key, Some(("id".to_string(), "id".to_string())));
    }

    #[test]
    fn test_registry_returns_cached_instance() {
        let registry = MetadataRegistry::new();
        let first = registry.get_or_create(&employee_def(), &employee_schema());
        // a different schema on the second call must not rebuild
        let second = registry.get_or_create(&employee_def(), &TableDef::new("ignored"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_concurrent_first_write_wins() {
        let registry = Arc::new(MetadataRegistry::new());
        let handles = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.get_or_create(&employee_def(), &employee_schema())
                })
            })
            .collect::<Vec<_>>();
        let built = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(registry.len(), 1);
        for meta in &built[1..] {
            assert!(Arc::ptr_eq(&built[0], meta));
        }
    }

    #[test]
    fn test_declares_name() {
        let def = EntityDef::new("User", "t_user")
            .with_field(EntityField::new("urlToken", SqlType::Varchar).with_alias("token"));
        let meta = EntityMetadata::build(&def, &TableDef::new("t_user"));
        assert!(meta.declares_name("urlToken"));
        assert!(meta.declares_name("token"));
        assert!(!meta.declares_name("other"));
    }
}
