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

/// Well-known bus name of the Orca screen reader service.
pub static ORCA_SERVICE_NAME: &str = "org.gnome.Orca.Service";

/// Root object of the service. Each module lives at `<root>/<ModuleName>`.
pub static ORCA_OBJECT_PATH: &str = "/org/gnome/Orca/Service";

/// Interface implemented by the root object.
pub static ORCA_SERVICE_INTERFACE: &str = "org.gnome.Orca.Service";

/// Interface implemented by every module object.
pub static ORCA_MODULE_INTERFACE: &str = "org.gnome.Orca.Module";

pub static LIST_MODULES_METHOD: &str = "ListModules";
pub static LIST_RUNTIME_GETTERS_METHOD: &str = "ListRuntimeGetters";
pub static LIST_RUNTIME_SETTERS_METHOD: &str = "ListRuntimeSetters";
pub static LIST_COMMANDS_METHOD: &str = "ListCommands";

pub static EXECUTE_COMMAND_METHOD: &str = "ExecuteCommand";
pub static EXECUTE_RUNTIME_GETTER_METHOD: &str = "ExecuteRuntimeGetter";
pub static EXECUTE_RUNTIME_SETTER_METHOD: &str = "ExecuteRuntimeSetter";
pub static PRESENT_MESSAGE_METHOD: &str = "PresentMessage";

/// Deepest object tree or XML element nesting accepted from the service.
pub const MAX_INTROSPECTION_DEPTH: usize = 64;

/// Identifiers of the service a generation run targets.
///
/// [`BusConfig::default`] targets the Orca screen reader. Tests and the CLI override individual
/// fields to point the generator at alternate instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    pub service_name: String,
    pub object_path: String,
    pub service_interface: String,
    pub module_interface: String,
    pub list_modules_method: String,
    pub list_runtime_getters_method: String,
    pub list_runtime_setters_method: String,
    pub list_commands_method: String,
    pub execute_command_method: String,
    pub execute_runtime_getter_method: String,
    pub execute_runtime_setter_method: String,
    pub present_message_method: String,
    pub max_depth: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            service_name: ORCA_SERVICE_NAME.to_string(),
            object_path: ORCA_OBJECT_PATH.to_string(),
            service_interface: ORCA_SERVICE_INTERFACE.to_string(),
            module_interface: ORCA_MODULE_INTERFACE.to_string(),
            list_modules_method: LIST_MODULES_METHOD.to_string(),
            list_runtime_getters_method: LIST_RUNTIME_GETTERS_METHOD.to_string(),
            list_runtime_setters_method: LIST_RUNTIME_SETTERS_METHOD.to_string(),
            list_commands_method: LIST_COMMANDS_METHOD.to_string(),
            execute_command_method: EXECUTE_COMMAND_METHOD.to_string(),
            execute_runtime_getter_method: EXECUTE_RUNTIME_GETTER_METHOD.to_string(),
            execute_runtime_setter_method: EXECUTE_RUNTIME_SETTER_METHOD.to_string(),
            present_message_method: PRESENT_MESSAGE_METHOD.to_string(),
            max_depth: MAX_INTROSPECTION_DEPTH,
        }
    }
}

impl BusConfig {
    /// Object path of a module: `<root>/<module>`.
    pub fn module_path(&self, module: &str) -> String {
        join_object_path(&self.object_path, module)
    }
}

/// Compose a child node name onto a parent object path.
pub fn join_object_path(parent: &str, child: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}
