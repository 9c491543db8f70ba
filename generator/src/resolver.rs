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

//! Collision-free identifiers for generated code.
//!
//! The classifier already gives setters a `Set` prefix so that a getter and a setter of the same
//! property do not clash. This module turns every `custom_name` into the Rust identifier that will
//! be emitted and refuses any module in which two descriptors would end up with the same name,
//! including the residual case of a plain command that is literally called `Set<Property>`
//! next to a setter for `<Property>`.

use crate::commands::{CommandCategory, CommandDescriptor, ModuleCommands};
use crate::error::OrcaGenError;
use log::debug;
use std::collections::HashMap;

/// Names every generated module wrapper defines besides its commands.
pub static RESERVED_MODULE_MEMBERS: &[&str] = &["new", "proxy", "path"];

/// Field names of the generated client besides its modules.
pub static RESERVED_CLIENT_FIELDS: &[&str] = &["connection", "service"];

/// A module with the identifier chosen for each of its descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub commands: ModuleCommands,
    /// Name of the generated wrapper type, e.g. `SpeechAndVerbosityManager`.
    pub type_name: String,
    /// Name of the wrapper's field on the generated client, e.g. `speech_and_verbosity_manager`.
    pub field_name: String,
    identifiers: HashMap<(CommandCategory, String), String>,
}

impl ResolvedModule {
    /// The method name emitted for `descriptor`.
    pub fn identifier(&self, descriptor: &CommandDescriptor) -> Option<&str> {
        self.identifiers
            .get(&(descriptor.category(), descriptor.command_name().to_string()))
            .map(String::as_str)
    }
}

fn is_boundary(prev: Option<char>, current: char, next: Option<char>) -> bool {
    match prev {
        Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => current.is_ascii_uppercase(),
        Some(p) if p.is_ascii_uppercase() => {
            current.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase())
        }
        _ => false,
    }
}

/// Split a raw name into lowercase words: `ReadURLNow` gives `read`, `url`, `now`.
fn words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]).filter(char::is_ascii_alphanumeric);
        if is_boundary(prev, c, chars.get(i + 1).copied()) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Make `candidate` usable as an identifier: keywords become raw identifiers, and the few
/// keywords that cannot be raw get a trailing underscore.
fn finish_identifier(raw: &str, candidate: String) -> Result<String, OrcaGenError> {
    if candidate.is_empty() {
        return Err(OrcaGenError::Identifier {
            raw: raw.to_string(),
            reason: "no usable characters".to_string(),
        });
    }
    let candidate = if candidate.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{candidate}")
    } else {
        candidate
    };
    if syn::parse_str::<syn::Ident>(&candidate).is_ok() {
        return Ok(candidate);
    }
    match candidate.as_str() {
        "self" | "Self" | "super" | "crate" => Ok(format!("{candidate}_")),
        _ => Ok(format!("r#{candidate}")),
    }
}

/// `snake_case` identifier for a method or field.
pub fn snake_identifier(raw: &str) -> Result<String, OrcaGenError> {
    finish_identifier(raw, words(raw).join("_"))
}

/// `PascalCase` identifier for a type or trait.
pub fn pascal_identifier(raw: &str) -> Result<String, OrcaGenError> {
    let pascal = words(raw)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<String>();
    finish_identifier(raw, pascal)
}

/// Tracks which item claimed each name inside one scope.
pub(crate) struct Namespace {
    scope: String,
    taken: HashMap<String, String>,
}

impl Namespace {
    pub(crate) fn new(scope: impl Into<String>) -> Self {
        Namespace {
            scope: scope.into(),
            taken: HashMap::new(),
        }
    }

    pub(crate) fn reserve(&mut self, names: &[&str], owner: &str) {
        for name in names {
            self.taken.insert(name.to_string(), owner.to_string());
        }
    }

    /// Claim `name` for `owner`, failing if something else already has it.
    pub(crate) fn claim(&mut self, name: &str, owner: String) -> Result<(), OrcaGenError> {
        if let Some(first) = self.taken.get(name) {
            return Err(OrcaGenError::NameCollision {
                scope: self.scope.clone(),
                name: name.to_string(),
                first: first.clone(),
                second: owner,
            });
        }
        self.taken.insert(name.to_string(), owner);
        Ok(())
    }
}

fn describe(descriptor: &CommandDescriptor) -> String {
    format!("{} `{}`", descriptor.category(), descriptor.command_name())
}

/// Choose identifiers for one module, refusing any collision between its descriptors.
///
/// Both the `custom_name`s and the emitted snake-case identifiers must be unique within the
/// module, and no identifier may shadow a member every wrapper defines.
///
/// # Returns: `Result<ResolvedModule, OrcaGenError>`
/// * `Ok(ResolvedModule)` - Every descriptor has its own identifier
/// * `Err(OrcaGenError::NameCollision)` - Two descriptors resolve to the same name
/// * `Err(OrcaGenError::Identifier)` - A name has no usable characters
pub fn resolve_module(commands: ModuleCommands) -> Result<ResolvedModule, OrcaGenError> {
    let scope = format!("module {}", commands.name);
    let mut custom_names = Namespace::new(scope.clone());
    let mut idents = Namespace::new(scope);
    idents.reserve(RESERVED_MODULE_MEMBERS, "the generated wrapper");

    let mut identifiers = HashMap::with_capacity(commands.len());
    for descriptor in commands.iter() {
        custom_names.claim(descriptor.custom_name(), describe(descriptor))?;
        let ident = snake_identifier(descriptor.custom_name())?;
        idents.claim(&ident, describe(descriptor))?;
        identifiers.insert(
            (descriptor.category(), descriptor.command_name().to_string()),
            ident,
        );
    }

    let resolved = ResolvedModule {
        type_name: pascal_identifier(&commands.name)?,
        field_name: snake_identifier(&commands.name)?,
        commands,
        identifiers,
    };
    debug!(
        "Resolved {} identifier(s) for {}",
        resolved.identifiers.len(),
        resolved.commands.name
    );
    Ok(resolved)
}

/// Resolve every module and make sure no two modules share a type or field name.
pub fn resolve_modules(modules: Vec<ModuleCommands>) -> Result<Vec<ResolvedModule>, OrcaGenError> {
    let mut type_names = Namespace::new("generated client types");
    let mut field_names = Namespace::new("generated client fields");
    field_names.reserve(RESERVED_CLIENT_FIELDS, "the generated client");

    let mut resolved = Vec::with_capacity(modules.len());
    for module in modules {
        let module = resolve_module(module)?;
        let owner = format!("module `{}`", module.commands.name);
        type_names.claim(&module.type_name, owner.clone())?;
        field_names.claim(&module.field_name, owner)?;
        resolved.push(module);
    }
    Ok(resolved)
}
