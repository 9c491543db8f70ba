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

//! Modules and commands command implementations.
//!
//! Both print what the generator would work from, as ascii tables, without generating anything.

use orcagen::commands::{ModuleCommands, classify_module};
use orcagen::modules::list_modules;
use orcagen::{BusConfig, OrcaGenError, with_session};

/// Renders module names as an ascii table.
fn modules_message(modules: &[String]) -> String {
    let mut ret_string = String::from(
        "---- MODULES ----\n\
        | module |\n",
    );
    for module in modules {
        ret_string.push_str(&format!("| {module} |\n"));
    }
    ret_string
}

/// Renders every descriptor of `module` as one row of an ascii table.
fn commands_message(module: &ModuleCommands) -> String {
    let mut ret_string = format!(
        "---- {} ----\n\
        | category | command | generated name | description |\n",
        module.name
    );
    for descriptor in module.iter() {
        ret_string += format!(
            "| {} | {} | {} | {} |\n",
            descriptor.category(),
            descriptor.command_name(),
            descriptor.custom_name(),
            descriptor.description()
        )
        .as_str();
    }
    ret_string
}

/// Handler for the modules command.
pub async fn modules_handler(config: &BusConfig) -> Result<String, OrcaGenError> {
    let modules = with_session(async |session| list_modules(session, config).await).await?;
    Ok(modules_message(&modules))
}

/// Handler for the commands command.
pub async fn commands_handler(config: &BusConfig, module: &str) -> Result<String, OrcaGenError> {
    let commands =
        with_session(async |session| classify_module(session, config, module).await).await?;
    Ok(commands_message(&commands))
}
