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

//! Field-to-column resolution.
//!
//! `ColumnMapper::build` is total and deterministic: every declared field
//! receives exactly one column, no column is consumed twice before all
//! columns are exhausted. Resolution runs a strict priority cascade, each
//! pass skipping fields already resolved and columns already consumed.
//! When every heuristic misses, the leftover pass pairs fields with unused
//! columns in declaration order; degrading to arbitrary pairing is the
//! documented trade-off, not a failure.

use crate::comm;
use crate::information::EntityField;
use crate::vector::FieldColumnVector;

/// Largest edit distance the fuzzy pass accepts.
const MAX_EDIT_DISTANCE: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct ColumnMapper {
    positional_bootstrap: bool,
}

struct MapperState<'a> {
    columns: &'a [String],
    used: Vec<bool>,
    bound: Vec<Option<usize>>,
}

impl<'a> MapperState<'a> {
    fn new(columns: &'a [String], field_count: usize) -> Self {
        Self {
            columns,
            used: vec![false; columns.len()],
            bound: vec![None; field_count],
        }
    }

    fn is_bound(&self, field_idx: usize) -> bool {
        self.bound[field_idx].is_some()
    }

    fn bind(&mut self, field_idx: usize, col_idx: usize) {
        self.bound[field_idx] = Some(col_idx);
        self.used[col_idx] = true;
    }

    /// Index of the first unused column whose name matches `pred`.
    fn find_unused<F: Fn(&str) -> bool>(&self, pred: F) -> Option<usize> {
        self.columns
            .iter()
            .enumerate()
            .find(|(i, c)| !self.used[*i] && pred(c))
            .map(|(i, _)| i)
    }
}

impl ColumnMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the legacy index-pairing bootstrap: when field and column
    /// counts agree, bind everything by position and skip the name
    /// heuristics entirely.
    pub fn with_positional_bootstrap(mut self, positional: bool) -> Self {
        self.positional_bootstrap = positional;
        self
    }

    /// Produce the total field/column mapping for one entity.
    pub fn build(&self, columns: &[String], fields: &[EntityField]) -> FieldColumnVector {
        let mut state = MapperState::new(columns, fields.len());
        let mut vector = FieldColumnVector::new();

        if self.positional_bootstrap && fields.len() == columns.len() {
            for idx in 0..fields.len() {
                state.bind(idx, idx);
            }
            self.finish(&state, fields, &mut vector);
            return vector;
        }

        self.pass_declared_alias(&mut state, fields, &mut vector);
        self.pass_exact(&mut state, fields);
        self.pass_snake(&mut state, fields);
        self.pass_normalized(&mut state, fields);
        self.pass_boolean(&mut state, fields);
        self.pass_edit_distance(&mut state, fields);
        let overflow = self.pass_leftover(&mut state, fields);

        self.finish(&state, fields, &mut vector);
        for (field, column) in overflow {
            vector.bind_forward(&field, &column);
        }
        vector
    }

    fn finish(
        &self,
        state: &MapperState<'_>,
        fields: &[EntityField],
        vector: &mut FieldColumnVector,
    ) {
        for (field_idx, col_idx) in state.bound.iter().enumerate() {
            if let Some(col_idx) = col_idx {
                vector.bind(&fields[field_idx].name, &state.columns[*col_idx]);
            }
        }
    }

    /// Declared-alias match: a field carrying an explicit payload name is
    /// matched by that name, case-insensitively, with surrounding quote or
    /// bracket delimiters stripped. The payload name itself becomes a
    /// secondary lookup key for the same field.
    fn pass_declared_alias(
        &self,
        state: &mut MapperState<'_>,
        fields: &[EntityField],
        vector: &mut FieldColumnVector,
    ) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            let alias = match &field.alias {
                Some(alias) if alias.as_str() != field.name => alias,
                _ => continue,
            };
            let alias_clean = comm::trim_delimiters(alias);
            if let Some(col) = state.find_unused(|c| c.eq_ignore_ascii_case(alias_clean)) {
                state.bind(idx, col);
                vector.bind_json(alias_clean, &field.name);
            }
        }
    }

    /// Exact, then case-insensitive, name match.
    fn pass_exact(&self, state: &mut MapperState<'_>, fields: &[EntityField]) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            if let Some(col) = state.find_unused(|c| c == field.name) {
                state.bind(idx, col);
            } else if let Some(col) = state.find_unused(|c| c.eq_ignore_ascii_case(&field.name)) {
                state.bind(idx, col);
            }
        }
    }

    /// camelCase to snake_case, on the full name first and on the
    /// accessor-prefix-stripped name second.
    fn pass_snake(&self, state: &mut MapperState<'_>, fields: &[EntityField]) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            let full = comm::snake_case(&field.name);
            let stripped = comm::snake_case(comm::strip_accessor_prefix(&field.name));
            for candidate in [full, stripped] {
                if let Some(col) = state.find_unused(|c| c.eq_ignore_ascii_case(&candidate)) {
                    state.bind(idx, col);
                    break;
                }
            }
        }
    }

    /// Lower-cased, underscore-stripped comparison on both sides.
    fn pass_normalized(&self, state: &mut MapperState<'_>, fields: &[EntityField]) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            let norm = comm::normalized(&field.name);
            if let Some(col) = state.find_unused(|c| comm::normalized(c) == norm) {
                state.bind(idx, col);
            }
        }
    }

    /// Boolean-style heuristic: `isX`/`hasX`/`canX` are also tried against
    /// `x`, `snake(x)` and `is_` + `snake(x)`.
    fn pass_boolean(&self, state: &mut MapperState<'_>, fields: &[EntityField]) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            let stem = match comm::boolean_stem(&field.name) {
                Some(stem) => stem,
                None => continue,
            };
            let snake = comm::snake_case(stem);
            let candidates = [stem.to_owned(), snake.to_owned(), format!("is_{}", snake)];
            for candidate in candidates {
                if let Some(col) = state.find_unused(|c| c.eq_ignore_ascii_case(&candidate)) {
                    state.bind(idx, col);
                    break;
                }
            }
        }
    }

    /// Levenshtein fallback over normalized names. Distance zero wins
    /// immediately, ties keep the first-encountered column, anything past
    /// `MAX_EDIT_DISTANCE` is left for the exhaustive pass.
    fn pass_edit_distance(&self, state: &mut MapperState<'_>, fields: &[EntityField]) {
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            let norm_field = comm::normalized_for_distance(&field.name);
            let mut best: Option<(usize, usize)> = None;
            for (col_idx, col) in state.columns.iter().enumerate() {
                if state.used[col_idx] {
                    continue;
                }
                let distance =
                    comm::levenshtein(&norm_field, &comm::normalized_for_distance(col));
                if distance == 0 {
                    best = Some((col_idx, 0));
                    break;
                }
                match best {
                    Some((_, best_distance)) if best_distance <= distance => {}
                    _ => best = Some((col_idx, distance)),
                }
            }
            if let Some((col_idx, distance)) = best {
                if distance <= MAX_EDIT_DISTANCE {
                    state.bind(idx, col_idx);
                }
            }
        }
    }

    /// Exhaustive assignment: whatever is still unresolved takes the next
    /// unused column in original order; once columns run out they are
    /// reused from the start so that every field still ends up mapped.
    /// The wrapped-around pairs come back as forward-only bindings.
    fn pass_leftover(
        &self,
        state: &mut MapperState<'_>,
        fields: &[EntityField],
    ) -> Vec<(String, String)> {
        let mut overflow = Vec::new();
        if state.columns.is_empty() {
            return overflow;
        }
        let mut wrap = 0usize;
        for (idx, field) in fields.iter().enumerate() {
            if state.is_bound(idx) {
                continue;
            }
            if let Some(col_idx) = state.find_unused(|_| true) {
                state.bind(idx, col_idx);
            } else {
                let column = &state.columns[wrap % state.columns.len()];
                overflow.push((field.name.to_owned(), column.to_owned()));
                wrap += 1;
            }
        }
        overflow
    }
}
