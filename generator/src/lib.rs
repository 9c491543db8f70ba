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

//! orcagen - typed client generation for the Orca screen reader's D-Bus service.
//!
//! Orca exposes its features as *modules*, one object per module below the service's root
//! object. Every module lists its runtime getters, runtime setters and plain commands over the
//! bus, and executes them through three generic members. This crate reads all of that from a
//! running service and writes a Rust client with one typed method per command.
//!
//! # Pipeline
//!
//! 1. [`introspection::introspect_tree`] - object tree with the interfaces of every object
//! 2. [`modules::list_modules`] - module names in service order
//! 3. [`commands::classify_module`] - getters, setters and commands of each module
//! 4. [`resolver::resolve_modules`] - a collision-free identifier for every descriptor
//! 5. [`emitter::emit_client`] - Rust source text, validated before it is returned
//!
//! Steps 1 to 4 are bundled as [`build_model`]. [`generate_client`] runs the whole pipeline on
//! the session bus and [`system_io::write_artifact`] puts the result on disk without ever leaving
//! a partial file behind.
//!
//! Every step is fail-fast: a malformed reply or document anywhere aborts the run with an
//! [`OrcaGenError`] and no output.
//!
//! # Environment Variables
//!
//! - `DBUS_SESSION_BUS_ADDRESS` - Session bus used by [`generate_client`] and [`with_session`]

pub mod comm;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod error;
pub mod introspection;
pub mod modules;
mod reply;
pub mod resolver;
pub mod system_io;

pub use crate::comm::dbus::Bus;
pub use crate::comm::dbus::session::Session;
pub use crate::config::BusConfig;
pub use crate::error::OrcaGenError;

use crate::commands::classify_module;
use crate::introspection::{IntrospectionNode, introspect_tree};
use crate::modules::list_modules;
use crate::resolver::{ResolvedModule, resolve_modules};
use log::{info, warn};

/// Everything the emitter needs to know about a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceModel {
    /// Object tree rooted at the service's root object, with every child introspected.
    pub tree: IntrospectionNode,
    /// Classified and resolved modules, in service order.
    pub modules: Vec<ResolvedModule>,
}

/// Introspect, enumerate, classify and resolve.
///
/// All calls are made one after the other; the order of modules and of the descriptors within
/// each category is the order the service reported them in.
///
/// # Returns: `Result<ServiceModel, OrcaGenError>`
/// * `Ok(ServiceModel)` - The complete model
/// * `Err(OrcaGenError)` - The first failure of any step
pub async fn build_model<B: Bus>(bus: &B, config: &BusConfig) -> Result<ServiceModel, OrcaGenError> {
    let tree = introspect_tree(bus, config).await?;
    let names = list_modules(bus, config).await?;
    let mut classified = Vec::with_capacity(names.len());
    for name in &names {
        classified.push(classify_module(bus, config, name).await?);
    }
    let modules = resolve_modules(classified)?;
    info!(
        "Built model of {} with {} module(s)",
        config.service_name,
        modules.len()
    );
    Ok(ServiceModel { tree, modules })
}

/// Build the model over `bus` and emit the client source.
pub async fn generate_with<B: Bus>(bus: &B, config: &BusConfig) -> Result<String, OrcaGenError> {
    let model = build_model(bus, config).await?;
    emitter::emit_client(&model, config)
}

/// Run `f` with a fresh session bus connection that is closed exactly once afterwards, whatever
/// `f` returned. A failed close is logged and does not change the result.
pub async fn with_session<T>(
    f: impl AsyncFnOnce(&Session) -> Result<T, OrcaGenError>,
) -> Result<T, OrcaGenError> {
    let session = Session::connect().await?;
    let result = f(&session).await;
    if let Err(e) = session.close().await {
        warn!("Failed to close the bus session: {e}");
    }
    result
}

/// Connect to the session bus, generate the client for the configured service and disconnect.
///
/// # Returns: `Result<String, OrcaGenError>`
/// * `Ok(String)` - Source text of the generated client
/// * `Err(OrcaGenError::Connection)` - The session bus is not reachable
/// * `Err(OrcaGenError)` - Any failure while building or emitting the model
pub async fn generate_client(config: &BusConfig) -> Result<String, OrcaGenError> {
    with_session(async |session| generate_with(session, config).await).await
}
