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

//! Error taxonomy for a generation run.
//!
//! Every failure is surfaced to the immediate caller; nothing in the crate retries or falls back
//! to a partial result. The variant name is repeated at the start of each message so callers (and
//! tests) can match on the category from the rendered text alone.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OrcaGenError {
    #[error("OrcaGenError::Connection: Failed to connect to the session bus: {0}")]
    Connection(zbus::Error),
    #[error("OrcaGenError::Call: {interface}.{method} on {path} failed: {e}")]
    Call {
        path: String,
        interface: String,
        method: String,
        e: zbus::Error,
    },
    #[error(
        "OrcaGenError::MalformedReply: invalid item {index} in reply to {method} on {path}: {element} ({reason})"
    )]
    MalformedReply {
        path: String,
        method: String,
        index: usize,
        element: String,
        reason: String,
    },
    #[error("OrcaGenError::MalformedDescription: introspection data for {path} is invalid: {reason}")]
    MalformedDescription { path: String, reason: String },
    #[error(
        "OrcaGenError::NameCollision: in {scope}, {first} and {second} both resolve to `{name}`"
    )]
    NameCollision {
        scope: String,
        name: String,
        first: String,
        second: String,
    },
    #[error("OrcaGenError::Identifier: cannot build an identifier from {raw:?}: {reason}")]
    Identifier { raw: String, reason: String },
    #[error("OrcaGenError::Emit: generated client does not parse as Rust: {0}")]
    Emit(String),
    #[error("OrcaGenError::IOWrite: An IO error occurred when writing to {file:?}: {e}")]
    IOWrite { file: PathBuf, e: std::io::Error },
    #[error("OrcaGenError::IORename: An IO error occurred when renaming {from:?} to {to:?}: {e}")]
    IORename {
        from: PathBuf,
        to: PathBuf,
        e: std::io::Error,
    },
}

impl OrcaGenError {
    pub(crate) fn malformed_description(path: &str, reason: impl Into<String>) -> Self {
        OrcaGenError::MalformedDescription {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
