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

use crate::comm::dbus::Bus;
use crate::config::BusConfig;
use crate::error::OrcaGenError;
use crate::reply::{ReplyContext, expect_string, reply_elements};
use log::{debug, warn};

/// Ask the root object for the names of every registered module, in service order.
///
/// Every element of the reply must be a non-empty string. A single violating element fails the
/// whole call; no partial list is ever returned.
///
/// # Returns: `Result<Vec<String>, OrcaGenError>`
/// * `Ok(Vec<String>)` - Module names as reported
/// * `Err(OrcaGenError::Call)` - The call failed
/// * `Err(OrcaGenError::MalformedReply)` - An element was not a non-empty string
pub async fn list_modules<B: Bus>(bus: &B, config: &BusConfig) -> Result<Vec<String>, OrcaGenError> {
    let reply = bus
        .call(
            &config.service_name,
            &config.object_path,
            &config.service_interface,
            &config.list_modules_method,
        )
        .await?;
    let ctx = ReplyContext {
        path: &config.object_path,
        method: &config.list_modules_method,
    };
    let modules = reply_elements(ctx, &reply)?
        .into_iter()
        .enumerate()
        .map(|(index, element)| expect_string(ctx, index, element))
        .collect::<Result<Vec<_>, _>>()?;
    if modules.is_empty() {
        warn!("{} reported no modules", config.service_name);
    }
    debug!("Found modules: {modules:?}");
    Ok(modules)
}
