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

//! Introspect command implementation.
//!
//! Prints the object tree of the service: every object path with the interfaces it implements
//! and how many methods, signals and properties each of them has. Without `--recursive` only
//! the root object is introspected and its children are shown as reported.

use orcagen::introspection::{IntrospectionNode, introspect_root, introspect_tree};
use orcagen::{BusConfig, OrcaGenError, with_session};

/// Renders the tree below `root_path` as an indented listing.
fn tree_message(tree: &IntrospectionNode, root_path: &str) -> String {
    let mut ret_string = String::from("---- OBJECTS ----\n");
    for (path, node) in tree.walk(root_path) {
        ret_string.push_str(&path);
        if node.is_stub() && path != root_path {
            ret_string.push_str(" (not introspected)");
        }
        ret_string.push('\n');
        for interface in &node.interfaces {
            ret_string += format!(
                "    {} | {} method(s) | {} signal(s) | {} propert{}\n",
                interface.name,
                interface.methods.len(),
                interface.signals.len(),
                interface.properties.len(),
                if interface.properties.len() == 1 { "y" } else { "ies" }
            )
            .as_str();
        }
    }
    ret_string
}

/// Handler for the introspect command.
pub async fn introspect_handler(config: &BusConfig, recursive: bool) -> Result<String, OrcaGenError> {
    let tree = with_session(async |session| match recursive {
        true => introspect_tree(session, config).await,
        false => introspect_root(session, config).await,
    })
    .await?;
    Ok(tree_message(&tree, &config.object_path))
}
