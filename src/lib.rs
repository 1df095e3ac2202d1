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

//!
//! Relmap - entity-relational metadata and join resolution.
//!
//! The runtime layer between business-shaped documents and column-keyed
//! table rows: field/column mapping heuristics, per-entity metadata with a
//! memoizing registry, join graphs with alias bookkeeping, document
//! exchange strategies and joined-read assembly.

#![deny(clippy::all)]

mod assembler;
pub mod comm;
mod data;
mod document;
mod error;
mod exchange;
mod information;
mod join;
mod key;
mod mapper;
mod metadata;
mod types;
mod value;
mod vector;

#[doc(inline)]
pub use assembler::*;
#[doc(inline)]
pub use data::*;
#[doc(inline)]
pub use document::*;
#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use exchange::*;
#[doc(inline)]
pub use information::*;
#[doc(inline)]
pub use join::*;
#[doc(inline)]
pub use key::*;
#[doc(inline)]
pub use mapper::*;
#[doc(inline)]
pub use metadata::*;
#[doc(inline)]
pub use types::*;
#[doc(inline)]
pub use value::*;
#[doc(inline)]
pub use vector::*;
pub use serde;
