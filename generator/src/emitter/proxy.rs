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

//! `#[zbus::proxy]` traits for the interfaces found in the introspection tree.

use crate::config::BusConfig;
use crate::emitter::signature::{Position, parse_single, return_type, rust_type};
use crate::error::OrcaGenError;
use crate::introspection::{Arg, Interface, IntrospectionNode, Method, Property, Signal};
use crate::resolver::{Namespace, pascal_identifier, snake_identifier};
use log::{debug, trace};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::{HashMap, HashSet};
use zbus::zvariant::Signature;

/// Interfaces every object implements; zbus ships proxies for these.
pub static STANDARD_INTERFACE_PREFIX: &str = "org.freedesktop.DBus.";

/// Members of every generated proxy struct.
static RESERVED_PROXY_MEMBERS: &[&str] = &["new", "builder", "inner", "inner_mut", "into_inner"];

/// An interface together with every object path that implements it.
struct Occurrence<'a> {
    interface: &'a Interface,
    paths: Vec<String>,
}

/// Distinct non-standard interfaces in walk order. The first description of an interface wins.
fn collect_interfaces<'a>(tree: &'a IntrospectionNode, root_path: &str) -> Vec<Occurrence<'a>> {
    let mut found: Vec<Occurrence<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for (path, node) in tree.walk(root_path) {
        for interface in &node.interfaces {
            if interface.name.starts_with(STANDARD_INTERFACE_PREFIX) {
                continue;
            }
            match index.get(interface.name.as_str()) {
                Some(&i) => found[i].paths.push(path.clone()),
                None => {
                    index.insert(&interface.name, found.len());
                    found.push(Occurrence {
                        interface,
                        paths: vec![path.clone()],
                    });
                }
            }
        }
    }
    found
}

/// Trait name from the last two segments: `org.gnome.Orca.Module` gives `OrcaModule`.
pub fn trait_name(interface: &str) -> Result<String, OrcaGenError> {
    let segments: Vec<&str> = interface.rsplit('.').take(2).collect();
    let short = segments.into_iter().rev().collect::<Vec<_>>().join(".");
    pascal_identifier(&short)
}

fn parse_arg_type(path: &str, member: &str, arg: &Arg) -> Result<Signature, OrcaGenError> {
    parse_single(&arg.signature).map_err(|reason| {
        OrcaGenError::malformed_description(
            path,
            format!("bad type {:?} on {member}: {reason}", arg.signature),
        )
    })
}

/// Named parameters for `args`, falling back to `arg_N` for unnamed or clashing ones.
fn parameters<'a>(
    path: &str,
    member: &str,
    args: impl Iterator<Item = &'a Arg>,
    position: Position,
) -> Result<Vec<TokenStream>, OrcaGenError> {
    let mut used = HashSet::new();
    let mut params = Vec::new();
    for (i, arg) in args.enumerate() {
        let ty = rust_type(&parse_arg_type(path, member, arg)?, position);
        let name = arg
            .name
            .as_deref()
            .and_then(|raw| snake_identifier(raw).ok())
            .filter(|name| !used.contains(name))
            .unwrap_or_else(|| format!("arg_{i}"));
        used.insert(name.clone());
        let ident = format_ident!("{}", name);
        params.push(quote!(#ident: #ty));
    }
    Ok(params)
}

fn emit_method(
    path: &str,
    method: &Method,
    members: &mut Namespace,
) -> Result<TokenStream, OrcaGenError> {
    let name = snake_identifier(&method.name)?;
    members.claim(&name, format!("method `{}`", method.name))?;
    let ident = format_ident!("{}", name);
    let raw = &method.name;
    let params = parameters(path, raw, method.inputs(), Position::Argument)?;
    let outputs = method
        .outputs()
        .map(|arg| parse_arg_type(path, raw, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let returns = return_type(&outputs);
    Ok(quote! {
        #[zbus(name = #raw)]
        fn #ident(&self #(, #params)*) -> zbus::Result<#returns>;
    })
}

fn emit_signal(
    path: &str,
    signal: &Signal,
    members: &mut Namespace,
    types: &mut Namespace,
) -> Result<TokenStream, OrcaGenError> {
    let name = snake_identifier(&signal.name)?;
    let owner = format!("signal `{}`", signal.name);
    members.claim(&name, owner.clone())?;
    members.claim(
        &format!("receive_{}", name.trim_start_matches("r#")),
        owner.clone(),
    )?;
    // zbus also emits a message type, its args and its stream at module level
    let type_name = pascal_identifier(&signal.name)?;
    for suffix in ["", "Args", "Stream"] {
        types.claim(&format!("{type_name}{suffix}"), owner.clone())?;
    }
    let ident = format_ident!("{}", name);
    let raw = &signal.name;
    let params = parameters(path, raw, signal.args.iter(), Position::Owned)?;
    Ok(quote! {
        #[zbus(signal, name = #raw)]
        fn #ident(&self #(, #params)*) -> zbus::Result<()>;
    })
}

fn emit_property(
    path: &str,
    property: &Property,
    members: &mut Namespace,
) -> Result<TokenStream, OrcaGenError> {
    let raw = &property.name;
    let ty = parse_single(&property.signature).map_err(|reason| {
        OrcaGenError::malformed_description(
            path,
            format!("bad type {:?} on property {raw}: {reason}", property.signature),
        )
    })?;
    let name = snake_identifier(raw)?;
    let bare = name.trim_start_matches("r#");
    let owner = format!("property `{raw}`");
    let mut tokens = TokenStream::new();
    if property.access.is_readable() {
        members.claim(&name, owner.clone())?;
        members.claim(&format!("cached_{bare}"), owner.clone())?;
        members.claim(&format!("receive_{bare}_changed"), owner.clone())?;
        let ident = format_ident!("{}", name);
        let owned = rust_type(&ty, Position::Owned);
        tokens.extend(quote! {
            #[zbus(property, name = #raw)]
            fn #ident(&self) -> zbus::Result<#owned>;
        });
    }
    if property.access.is_writable() {
        let setter = format!("set_{bare}");
        members.claim(&setter, owner)?;
        let ident = format_ident!("{}", setter);
        let argument = rust_type(&ty, Position::Argument);
        tokens.extend(quote! {
            #[zbus(property, name = #raw)]
            fn #ident(&self, value: #argument) -> zbus::Result<()>;
        });
    }
    Ok(tokens)
}

fn emit_trait(
    occurrence: &Occurrence<'_>,
    config: &BusConfig,
    types: &mut Namespace,
) -> Result<TokenStream, OrcaGenError> {
    let interface = occurrence.interface;
    let path = &occurrence.paths[0];
    let name = trait_name(&interface.name)?;
    let owner = format!("interface `{}`", interface.name);
    types.claim(&name, owner.clone())?;
    types.claim(&format!("{name}Proxy"), owner)?;

    let mut members = Namespace::new(format!("proxy for {}", interface.name));
    members.reserve(RESERVED_PROXY_MEMBERS, "the generated proxy");
    let mut body = TokenStream::new();
    for method in &interface.methods {
        body.extend(emit_method(path, method, &mut members)?);
    }
    for signal in &interface.signals {
        body.extend(emit_signal(path, signal, &mut members, types)?);
    }
    for property in &interface.properties {
        body.extend(emit_property(path, property, &mut members)?);
    }

    let iface = &interface.name;
    let service = &config.service_name;
    let default_path = match occurrence.paths.as_slice() {
        [only] => quote!(default_path = #only,),
        _ => TokenStream::new(),
    };
    let doc = format!(
        " Proxy for `{iface}`, implemented at {}.",
        occurrence
            .paths
            .iter()
            .map(|p| format!("`{p}`"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let ident = format_ident!("{}", name);
    trace!("Emitting proxy trait {name} for {iface}");
    Ok(quote! {
        #[doc = #doc]
        #[zbus::proxy(
            interface = #iface,
            default_service = #service,
            #default_path
            gen_blocking = false
        )]
        pub trait #ident {
            #body
        }
    })
}

/// One proxy trait per distinct non-standard interface of `tree`, claiming every generated type
/// name in `types`.
pub(crate) fn emit_proxies(
    tree: &IntrospectionNode,
    config: &BusConfig,
    types: &mut Namespace,
) -> Result<Vec<TokenStream>, OrcaGenError> {
    let occurrences = collect_interfaces(tree, &config.object_path);
    debug!("Emitting {} proxy trait(s)", occurrences.len());
    occurrences
        .iter()
        .map(|occurrence| emit_trait(occurrence, config, types))
        .collect()
}
