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

use crate::comm::dbus::{Bus, INTROSPECTABLE_INTERFACE, call_error};
use crate::error::OrcaGenError;
use log::{info, trace};
use zbus::Connection;
use zbus::fdo::IntrospectableProxy;
use zbus::proxy::CacheProperties;
use zbus::zvariant::{OwnedValue, Signature, Structure};

/// A connection to the message bus owned by one generation run.
///
/// The session is only ever used for calls; nothing mutates it after it is established. It is
/// consumed by [`Session::close`] so that it can be released exactly once.
pub struct Session {
    connection: Connection,
}

impl Session {
    /// Connect to the session bus of the current login session.
    ///
    /// # Returns: `Result<Session, OrcaGenError>`
    /// * `Ok(Session)` - Connected
    /// * `Err(OrcaGenError::Connection)` - No session bus is reachable
    pub async fn connect() -> Result<Self, OrcaGenError> {
        let connection = Connection::session()
            .await
            .map_err(OrcaGenError::Connection)?;
        info!("Connected to the session bus");
        Ok(Session { connection })
    }

    /// Wrap an already established connection, e.g. a peer-to-peer one.
    pub fn from_connection(connection: Connection) -> Self {
        Session { connection }
    }

    /// Tear the connection down.
    pub async fn close(self) -> Result<(), OrcaGenError> {
        trace!("Closing bus session");
        self.connection
            .close()
            .await
            .map_err(OrcaGenError::Connection)
    }
}

impl Bus for Session {
    async fn call(
        &self,
        destination: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Vec<OwnedValue>, OrcaGenError> {
        trace!("Calling {interface}.{method} on {destination} {path}");
        let reply = self
            .connection
            .call_method(Some(destination), path, Some(interface), method, &())
            .await
            .map_err(|e| call_error(path, interface, method, e))?;
        let body = reply.body();
        if matches!(body.signature(), Signature::Unit) {
            return Ok(Vec::new());
        }
        let fields: Structure<'_> = body.deserialize().map_err(|e| OrcaGenError::MalformedReply {
            path: path.to_string(),
            method: method.to_string(),
            index: 0,
            element: format!("body of type {}", body.signature()),
            reason: e.to_string(),
        })?;
        fields
            .into_fields()
            .into_iter()
            .map(|field| {
                OwnedValue::try_from(field)
                    .map_err(|e| call_error(path, interface, method, e.into()))
            })
            .collect()
    }

    async fn introspect(&self, destination: &str, path: &str) -> Result<String, OrcaGenError> {
        trace!("Introspecting {destination} {path}");
        let wrap = |e| call_error(path, INTROSPECTABLE_INTERFACE, "Introspect", e);
        let proxy = IntrospectableProxy::builder(&self.connection)
            .destination(destination)
            .map_err(wrap)?
            .path(path)
            .map_err(wrap)?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(wrap)?;
        proxy.introspect().await.map_err(|e| wrap(e.into()))
    }
}
