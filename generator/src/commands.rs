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

//! Command classification.
//!
//! Every module exposes three listings: runtime getters (read a live value, no argument),
//! runtime setters (write a live value, one argument) and plain commands (one-shot actions).
//! Each listing replies with `(name, description)` pairs which are normalised here into
//! [`CommandDescriptor`] records, keeping the order the service reported them in.

use crate::comm::dbus::Bus;
use crate::config::BusConfig;
use crate::error::OrcaGenError;
use crate::reply::{ReplyContext, expect_string_pair, reply_elements};
use log::debug;
use std::fmt::{Display, Formatter};

/// Prefix turning a setter's raw name into its generated name.
pub static SETTER_PREFIX: &str = "Set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    RuntimeGetter,
    RuntimeSetter,
    Command,
}

impl CommandCategory {
    /// Method listing the commands of this category on a module object.
    pub fn listing_method(self, config: &BusConfig) -> &str {
        match self {
            CommandCategory::RuntimeGetter => &config.list_runtime_getters_method,
            CommandCategory::RuntimeSetter => &config.list_runtime_setters_method,
            CommandCategory::Command => &config.list_commands_method,
        }
    }
}

impl Display for CommandCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandCategory::RuntimeGetter => write!(f, "getter"),
            CommandCategory::RuntimeSetter => write!(f, "setter"),
            CommandCategory::Command => write!(f, "command"),
        }
    }
}

/// One command exposed by a module.
///
/// Descriptors are only built through [`CommandDescriptor::new`], which guarantees that a
/// descriptor is never both a getter and a setter and that `custom_name` follows the naming rule
/// of its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    command_name: String,
    custom_name: String,
    description: String,
    is_getter: bool,
    is_setter: bool,
}

impl CommandDescriptor {
    pub fn new(category: CommandCategory, command_name: String, description: String) -> Self {
        let custom_name = match category {
            CommandCategory::RuntimeSetter => format!("{SETTER_PREFIX}{command_name}"),
            CommandCategory::RuntimeGetter | CommandCategory::Command => command_name.clone(),
        };
        CommandDescriptor {
            command_name,
            custom_name,
            description,
            is_getter: category == CommandCategory::RuntimeGetter,
            is_setter: category == CommandCategory::RuntimeSetter,
        }
    }

    /// Name as exposed by the service; this is what gets sent back when executing the command.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Name used for the generated code.
    pub fn custom_name(&self) -> &str {
        &self.custom_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_getter(&self) -> bool {
        self.is_getter
    }

    pub fn is_setter(&self) -> bool {
        self.is_setter
    }

    pub fn category(&self) -> CommandCategory {
        match (self.is_getter, self.is_setter) {
            (true, _) => CommandCategory::RuntimeGetter,
            (_, true) => CommandCategory::RuntimeSetter,
            _ => CommandCategory::Command,
        }
    }
}

/// Everything one module exposes, grouped by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCommands {
    pub name: String,
    pub getters: Vec<CommandDescriptor>,
    pub setters: Vec<CommandDescriptor>,
    pub commands: Vec<CommandDescriptor>,
}

impl ModuleCommands {
    /// All descriptors: getters, then setters, then commands.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.getters
            .iter()
            .chain(self.setters.iter())
            .chain(self.commands.iter())
    }

    pub fn len(&self) -> usize {
        self.getters.len() + self.setters.len() + self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn list_category<B: Bus>(
    bus: &B,
    config: &BusConfig,
    module: &str,
    category: CommandCategory,
) -> Result<Vec<CommandDescriptor>, OrcaGenError> {
    let path = config.module_path(module);
    let method = category.listing_method(config);
    let reply = bus
        .call(&config.service_name, &path, &config.module_interface, method)
        .await?;
    let ctx = ReplyContext {
        path: &path,
        method,
    };
    let descriptors = reply_elements(ctx, &reply)?
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let (name, description) = expect_string_pair(ctx, index, element)?;
            Ok(CommandDescriptor::new(category, name, description))
        })
        .collect::<Result<Vec<_>, OrcaGenError>>()?;
    debug!(
        "{module}: {} {category} descriptor(s) from {method}",
        descriptors.len()
    );
    Ok(descriptors)
}

/// List the runtime getters of `module`: commands returning a value and taking no argument.
pub async fn list_runtime_getters<B: Bus>(
    bus: &B,
    config: &BusConfig,
    module: &str,
) -> Result<Vec<CommandDescriptor>, OrcaGenError> {
    list_category(bus, config, module, CommandCategory::RuntimeGetter).await
}

/// List the runtime setters of `module`: commands taking the new value as their argument.
///
/// Setters usually share their raw name with a getter of the same property, so their generated
/// name carries the [`SETTER_PREFIX`].
pub async fn list_runtime_setters<B: Bus>(
    bus: &B,
    config: &BusConfig,
    module: &str,
) -> Result<Vec<CommandDescriptor>, OrcaGenError> {
    list_category(bus, config, module, CommandCategory::RuntimeSetter).await
}

/// List the plain commands of `module`: actions that change state and return nothing of interest.
pub async fn list_commands<B: Bus>(
    bus: &B,
    config: &BusConfig,
    module: &str,
) -> Result<Vec<CommandDescriptor>, OrcaGenError> {
    list_category(bus, config, module, CommandCategory::Command).await
}

/// Run the three listings for one module, one after the other.
pub async fn classify_module<B: Bus>(
    bus: &B,
    config: &BusConfig,
    module: &str,
) -> Result<ModuleCommands, OrcaGenError> {
    Ok(ModuleCommands {
        name: module.to_string(),
        getters: list_runtime_getters(bus, config, module).await?,
        setters: list_runtime_setters(bus, config, module).await?,
        commands: list_commands(bus, config, module).await?,
    })
}
