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

//! Object tree of the service as reported by bus introspection.
//!
//! [`introspect_root`] reads the document of the root object only. [`introspect_tree`] also
//! follows every child the service lists without describing it, so the returned tree carries
//! the interfaces of each module object as well. Both fail as a whole: a malformed document
//! anywhere means no tree at all.

pub mod xml;

use crate::comm::dbus::Bus;
use crate::config::{BusConfig, join_object_path};
use crate::error::OrcaGenError;
use log::{debug, info};
use std::collections::{HashSet, VecDeque};

/// One object of the tree. The root has no name; children are named relative to their parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectionNode {
    pub name: Option<String>,
    pub interfaces: Vec<Interface>,
    pub nodes: Vec<IntrospectionNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
    pub signals: Vec<Signal>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: Option<String>,
    /// D-Bus type signature of the argument, e.g. `a(ss)`.
    pub signature: String,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub signature: String,
    pub access: Access,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn is_readable(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

impl Method {
    /// Arguments the caller sends. Method arguments without a direction are inputs.
    pub fn inputs(&self) -> impl Iterator<Item = &Arg> {
        self.args
            .iter()
            .filter(|arg| arg.direction != Some(Direction::Out))
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Arg> {
        self.args
            .iter()
            .filter(|arg| arg.direction == Some(Direction::Out))
    }
}

impl IntrospectionNode {
    /// A child that was listed by its parent but not described.
    pub fn is_stub(&self) -> bool {
        self.interfaces.is_empty() && self.nodes.is_empty()
    }

    /// Every node of the tree with its full object path, parents before children and siblings
    /// in document order.
    pub fn walk<'a>(&'a self, root_path: &str) -> Vec<(String, &'a IntrospectionNode)> {
        let mut visited = Vec::new();
        let mut pending = vec![(root_path.to_string(), self)];
        while let Some((path, node)) = pending.pop() {
            for child in node.nodes.iter().rev() {
                let name = child.name.as_deref().unwrap_or_default();
                pending.push((join_object_path(&path, name), child));
            }
            visited.push((path, node));
        }
        visited
    }

    fn descendant_mut(&mut self, indices: &[usize]) -> &mut IntrospectionNode {
        let mut node = self;
        for &index in indices {
            node = &mut node.nodes[index];
        }
        node
    }
}

/// Fetch and parse the introspection document of the root object.
///
/// # Returns: `Result<IntrospectionNode, OrcaGenError>`
/// * `Ok(IntrospectionNode)` - The root and whatever the service reported below it
/// * `Err(OrcaGenError::Call)` - The introspection call failed
/// * `Err(OrcaGenError::MalformedDescription)` - The document could not be parsed
pub async fn introspect_root<B: Bus>(
    bus: &B,
    config: &BusConfig,
) -> Result<IntrospectionNode, OrcaGenError> {
    let document = bus
        .introspect(&config.service_name, &config.object_path)
        .await?;
    xml::parse_document(&config.object_path, &document, config.max_depth)
}

/// Introspect the root, then every child object the service only listed by name.
///
/// Children are visited breadth first from a work list. Each visited path must be new and no
/// deeper than the configured ceiling below the root.
pub async fn introspect_tree<B: Bus>(
    bus: &B,
    config: &BusConfig,
) -> Result<IntrospectionNode, OrcaGenError> {
    let mut root = introspect_root(bus, config).await?;
    let mut seen = HashSet::from([config.object_path.clone()]);
    let mut pending: VecDeque<(Vec<usize>, String)> = VecDeque::new();
    queue_children(&root, &[], &config.object_path, &mut pending);

    while let Some((indices, path)) = pending.pop_front() {
        if indices.len() > config.max_depth {
            return Err(OrcaGenError::malformed_description(
                &path,
                format!("object tree deeper than {}", config.max_depth),
            ));
        }
        if !seen.insert(path.clone()) {
            return Err(OrcaGenError::malformed_description(
                &path,
                "object reported more than once",
            ));
        }
        let node = root.descendant_mut(&indices);
        if node.is_stub() {
            debug!("Introspecting child {path}");
            let document = bus.introspect(&config.service_name, &path).await?;
            let described = xml::parse_document(&path, &document, config.max_depth)?;
            node.interfaces = described.interfaces;
            node.nodes = described.nodes;
        }
        queue_children(node, &indices, &path, &mut pending);
    }

    info!("Introspected {} object(s)", seen.len());
    Ok(root)
}

fn queue_children(
    node: &IntrospectionNode,
    indices: &[usize],
    path: &str,
    pending: &mut VecDeque<(Vec<usize>, String)>,
) {
    for (index, child) in node.nodes.iter().enumerate() {
        let mut child_indices = indices.to_vec();
        child_indices.push(index);
        let name = child.name.as_deref().unwrap_or_default();
        pending.push_back((child_indices, join_object_path(path, name)));
    }
}
