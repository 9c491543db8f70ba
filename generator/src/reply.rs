// This file is part of orcagen, a generator of typed clients for the Orca screen reader's D-Bus service.
//
// Copyright 2026 The orcagen contributors
//
// SPDX-License-Identifier: GPL-3.0-only
//
// orcagen is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// orcagen is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Typed validation of dynamically typed reply bodies.
//!
//! Listing methods reply with heterogeneous sequences whose shape is only known by convention.
//! These helpers check arity, emptiness and element type at the boundary and turn every
//! violation into [`OrcaGenError::MalformedReply`] naming the offending element. Nothing is
//! skipped or coerced: one bad element fails the whole reply.

use crate::error::OrcaGenError;
use zbus::zvariant::{OwnedValue, Value};

/// Identifies the call a reply belongs to, for error messages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReplyContext<'a> {
    pub path: &'a str,
    pub method: &'a str,
}

impl ReplyContext<'_> {
    fn malformed(&self, index: usize, element: &Value<'_>, reason: impl Into<String>) -> OrcaGenError {
        OrcaGenError::MalformedReply {
            path: self.path.to_string(),
            method: self.method.to_string(),
            index,
            element: element.to_string(),
            reason: reason.into(),
        }
    }
}

/// Strip variant wrappers, which some services put around every element.
fn unwrap_variant<'v, 'a>(value: &'v Value<'a>) -> &'v Value<'a> {
    let mut current = value;
    while let Value::Value(inner) = current {
        current = &**inner;
    }
    current
}

/// The elements of a reply whose body is a single array.
pub(crate) fn reply_elements<'r>(
    ctx: ReplyContext<'_>,
    reply: &'r [OwnedValue],
) -> Result<Vec<&'r Value<'static>>, OrcaGenError> {
    let [body] = reply else {
        return Err(OrcaGenError::MalformedReply {
            path: ctx.path.to_string(),
            method: ctx.method.to_string(),
            index: 0,
            element: format!("{} reply fields", reply.len()),
            reason: "expected exactly one array".to_string(),
        });
    };
    match unwrap_variant(body) {
        Value::Array(array) => Ok(array.iter().collect()),
        other => Err(ctx.malformed(0, other, "expected an array")),
    }
}

/// A non-empty string element.
pub(crate) fn expect_string(
    ctx: ReplyContext<'_>,
    index: usize,
    element: &Value<'_>,
) -> Result<String, OrcaGenError> {
    match unwrap_variant(element) {
        Value::Str(s) if s.as_str().is_empty() => Err(ctx.malformed(index, element, "empty string")),
        Value::Str(s) => Ok(s.as_str().to_string()),
        _ => Err(ctx.malformed(index, element, "expected a string")),
    }
}

/// A 2-tuple of non-empty strings, sent either as a struct or as a two element array.
pub(crate) fn expect_string_pair(
    ctx: ReplyContext<'_>,
    index: usize,
    element: &Value<'_>,
) -> Result<(String, String), OrcaGenError> {
    let fields: Vec<&Value<'_>> = match unwrap_variant(element) {
        Value::Structure(structure) => structure.fields().iter().collect(),
        Value::Array(array) => array.iter().collect(),
        _ => return Err(ctx.malformed(index, element, "expected a 2-tuple")),
    };
    let [first, second] = fields.as_slice() else {
        return Err(ctx.malformed(
            index,
            element,
            format!("expected 2 fields, found {}", fields.len()),
        ));
    };
    let field = |position: usize, value: &Value<'_>| match unwrap_variant(value) {
        Value::Str(s) if !s.as_str().is_empty() => Ok(s.as_str().to_string()),
        Value::Str(_) => Err(ctx.malformed(index, element, format!("field {position} is empty"))),
        _ => Err(ctx.malformed(
            index,
            element,
            format!("field {position} is not a string"),
        )),
    };
    Ok((field(0, first)?, field(1, second)?))
}
