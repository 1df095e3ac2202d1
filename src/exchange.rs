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

//! Document exchange between alias-space and entity-space.
//!
//! The four strategies are a closed set, selected explicitly at the call
//! site. Every strategy works on a copy of the input document; the
//! caller's original is never mutated.

use crate::document::Document;
use crate::error::RelmapError;
use crate::join::JoinGraph;
use crate::metadata::EntityMetadata;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// Alias-in: copy each registered alias entry of the node's table onto
    /// its field entry (alias overwrites field). Applied before a request
    /// body is deserialized into an entity.
    ToEntityAlias,
    /// Alias-out: copy each field entry onto its registered alias entry.
    /// Applied after an entity is serialized for a response.
    ToPayloadAlias,
    /// Remove the primary node's primary-key field and every join-key field
    /// of every joined table from an outward-facing payload.
    StripJoinColumns,
    /// Derive the condition document selecting the rows to delete for the
    /// node, from its join-key pairs.
    DeleteCondition,
}

impl Exchange {
    pub fn apply(
        &self,
        doc: &Document,
        node: &EntityMetadata,
        graph: &JoinGraph,
    ) -> Result<Document, RelmapError> {
        match self {
            Exchange::ToEntityAlias => Ok(Self::to_entity_alias(doc, node, graph)),
            Exchange::ToPayloadAlias => Ok(Self::to_payload_alias(doc, node, graph)),
            Exchange::StripJoinColumns => Ok(Self::strip_join_columns(doc, graph)),
            Exchange::DeleteCondition => Self::delete_condition(doc, node, graph),
        }
    }

    fn to_entity_alias(doc: &Document, node: &EntityMetadata, graph: &JoinGraph) -> Document {
        let mut out = doc.clone();
        for record in graph.aliases() {
            if record.table != node.table_name() {
                continue;
            }
            if let Some(value) = out.get(&record.alias).cloned() {
                out.put(record.field.to_owned(), value);
            }
        }
        out
    }

    fn to_payload_alias(doc: &Document, node: &EntityMetadata, graph: &JoinGraph) -> Document {
        let mut out = doc.clone();
        for record in graph.aliases() {
            if record.table != node.table_name() {
                continue;
            }
            if let Some(value) = out.get(&record.field).cloned() {
                out.put(record.alias.to_owned(), value);
            }
        }
        out
    }

    /// Strip the SQL plumbing from a payload: the root's primary-key field
    /// plus both sides of every join-key pair, each translated to its
    /// owning entity's field name.
    fn strip_join_columns(doc: &Document, graph: &JoinGraph) -> Document {
        let mut out = doc.clone();
        let primary = graph.find_primary_entity();
        if let Some(pk_field) = primary.pk_field() {
            out.remove(pk_field);
        }
        for (table, pairs) in graph.all_join_keys() {
            for pair in pairs {
                if let Some(node) = graph.node_of_table(table) {
                    if let Some(field) = node.vector.field_of(&pair.k) {
                        out.remove(field);
                    }
                }
                if let Some(owner) = graph.column_owner(&pair.v) {
                    if let Some(node) = graph.node_of_table(owner) {
                        if let Some(field) = node.vector.field_of(&pair.v) {
                            out.remove(field);
                        }
                    }
                }
            }
        }
        out
    }

    /// Build the condition document for deleting `node`'s rows. For the
    /// join root the condition collects the root's side of every join-key
    /// pair; for a joined node each of its pairs is resolved from the
    /// node's own perspective, key side first, value side as the fallback
    /// when the pair was declared the other way around. Neither side
    /// resolving means the graph metadata is broken.
    fn delete_condition(
        doc: &Document,
        node: &EntityMetadata,
        graph: &JoinGraph,
    ) -> Result<Document, RelmapError> {
        let mut condition = Document::new();
        let primary = graph.find_primary_entity();
        if primary.entity == node.entity {
            for (_, pairs) in graph.all_join_keys() {
                for pair in pairs {
                    // pairs not touching the root belong to deeper joins
                    if let Some(entry) = Self::condition_entry(doc, node, &pair.v)
                        .or_else(|| Self::condition_entry(doc, node, &pair.k))
                    {
                        condition.put(entry.0, entry.1);
                    }
                }
            }
            return Ok(condition);
        }
        let pairs = graph.join_keys_for(&node.entity).unwrap_or(&[]);
        for pair in pairs {
            let entry = Self::condition_entry(doc, node, &pair.k)
                .or_else(|| Self::condition_entry(doc, node, &pair.v))
                .ok_or_else(|| {
                    RelmapError::invariant(format!(
                        "join-key pair ({}, {}) resolves on neither side of `{}`",
                        pair.k, pair.v, node.entity
                    ))
                })?;
            condition.put(entry.0, entry.1);
        }
        Ok(condition)
    }

    /// Resolve `column` on `node` and pick the condition value out of the
    /// document, by field name first, by payload alias or raw column name
    /// otherwise.
    fn condition_entry(
        doc: &Document,
        node: &EntityMetadata,
        column: &str,
    ) -> Option<(String, Value)> {
        let field = node.vector.field_of(column)?;
        let value = doc
            .get(field)
            .or_else(|| node.payload_alias_of(field).and_then(|a| doc.get(a)))
            .or_else(|| doc.get(column))
            .cloned()
            .unwrap_or(Value::Null);
        Some((column.to_owned(), value))
    }
}
