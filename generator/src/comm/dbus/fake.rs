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

use crate::comm::dbus::{Bus, call_error};
use crate::error::OrcaGenError;
use std::cell::RefCell;
use std::collections::HashMap;
use zbus::zvariant::{OwnedValue, Value};

type ReplyFn = Box<dyn Fn() -> Vec<Value<'static>>>;

/// In-memory bus answering calls from canned replies.
///
/// Replies are keyed by `(path, method)` and produced by closures so that every call gets fresh
/// values. Anything not registered fails like a missing object would.
#[derive(Default)]
pub(crate) struct FakeBus {
    replies: HashMap<(String, String), ReplyFn>,
    documents: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_reply(
        mut self,
        path: &str,
        method: &str,
        reply: impl Fn() -> Vec<Value<'static>> + 'static,
    ) -> Self {
        self.replies
            .insert((path.to_string(), method.to_string()), Box::new(reply));
        self
    }

    pub(crate) fn with_document(mut self, path: &str, xml: &str) -> Self {
        self.documents.insert(path.to_string(), xml.to_string());
        self
    }

    /// Every call made so far, rendered as `<method> <path>`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Bus for FakeBus {
    async fn call(
        &self,
        _destination: &str,
        path: &str,
        interface: &str,
        method: &str,
    ) -> Result<Vec<OwnedValue>, OrcaGenError> {
        self.calls.borrow_mut().push(format!("{method} {path}"));
        let reply = self
            .replies
            .get(&(path.to_string(), method.to_string()))
            .ok_or_else(|| {
                call_error(
                    path,
                    interface,
                    method,
                    zbus::Error::Failure(format!("no such method on {path}")),
                )
            })?;
        Ok(reply()
            .into_iter()
            .map(|value| OwnedValue::try_from(value).expect("fake reply must be ownable"))
            .collect())
    }

    async fn introspect(&self, _destination: &str, path: &str) -> Result<String, OrcaGenError> {
        self.calls.borrow_mut().push(format!("Introspect {path}"));
        self.documents.get(path).cloned().ok_or_else(|| {
            call_error(
                path,
                "org.freedesktop.DBus.Introspectable",
                "Introspect",
                zbus::Error::Failure(format!("no such object {path}")),
            )
        })
    }
}
