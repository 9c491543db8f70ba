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

//! Transport seam between the generator and the message bus.
//!
//! Everything above this module talks to the service through the [`Bus`] trait. The production
//! implementation is [`session::Session`], a session bus connection managed by `zbus`. Unit tests
//! substitute an in-memory bus so that classification and introspection can be exercised without
//! a running screen reader.
//!
//! Calls are plain request/response: no retries, no timeouts beyond what the transport itself
//! applies, and no cancellation once a call is issued.

pub mod session;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::OrcaGenError;
use zbus::zvariant::OwnedValue;

/// Standard interface every object exposes to describe itself.
pub static INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// Request/response primitives the generator needs from a bus connection.
#[allow(async_fn_in_trait)]
pub trait Bus {
    /// Call an argument-less method and return the reply body as one value per reply field.
    ///
    /// # Arguments
    ///
    /// * `destination`: bus name of the service
    /// * `path`: object path the method is called on
    /// * `interface`: interface declaring the method
    /// * `method`: member name, e.g. `ListCommands`
    ///
    /// # Returns: `Result<Vec<OwnedValue>, OrcaGenError>`
    /// * `Ok(Vec<OwnedValue>)` - The reply fields in order, still dynamically typed; empty for
    ///   an empty reply body
    /// * `Err(OrcaGenError::Call)` - The call failed
    /// * `Err(OrcaGenError::MalformedReply)` - The reply body could not be decoded
    async fn call(
        &self,
        destination: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Vec<OwnedValue>, OrcaGenError>;

    /// Request the introspection document of `path`.
    ///
    /// # Returns: `Result<String, OrcaGenError>`
    /// * `Ok(String)` - The XML document as reported by the service
    /// * `Err(OrcaGenError::Call)` - The call failed
    async fn introspect(&self, destination: &str, path: &str) -> Result<String, OrcaGenError>;
}

/// Wrap a transport failure with the call it belongs to.
pub(crate) fn call_error(path: &str, interface: &str, method: &str, e: zbus::Error) -> OrcaGenError {
    OrcaGenError::Call {
        path: path.to_string(),
        interface: interface.to_string(),
        method: method.to_string(),
        e,
    }
}
