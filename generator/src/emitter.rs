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

//! Rust source for the typed client.
//!
//! The emitted file has no imports and refers to everything through `zbus::` paths, so it can be
//! dropped into any crate that depends on zbus 5. It holds:
//!
//! * one `#[zbus::proxy]` trait per non-standard interface of the introspected tree,
//! * one wrapper struct per module whose methods go through the module's execute members,
//! * `OrcaClient`, owning the session connection and one wrapper per module.
//!
//! The text is parsed back with `syn` before it is returned, so a caller never receives source
//! that does not parse.

pub mod proxy;
pub mod signature;

use crate::ServiceModel;
use crate::commands::CommandCategory;
use crate::config::BusConfig;
use crate::error::OrcaGenError;
use crate::resolver::{Namespace, ResolvedModule};
use log::{debug, info};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Name of the generated aggregate client.
pub static CLIENT_TYPE_NAME: &str = "OrcaClient";

/// First line of every generated file.
pub static GENERATED_HEADER: &str = "// @generated by orcagen. Do not edit by hand.";

fn emit_descriptor_method(
    category: CommandCategory,
    command_name: &str,
    description: &str,
    ident: &str,
    config: &BusConfig,
) -> TokenStream {
    let ident = format_ident!("{}", ident);
    let doc = format!(" {description}");
    match category {
        CommandCategory::Command => {
            let method = &config.execute_command_method;
            quote! {
                #[doc = #doc]
                pub async fn #ident(&self, notify_user: bool) -> zbus::Result<bool> {
                    self.proxy.call(#method, &(#command_name, notify_user)).await
                }
            }
        }
        CommandCategory::RuntimeGetter => {
            let method = &config.execute_runtime_getter_method;
            quote! {
                #[doc = #doc]
                pub async fn #ident(&self) -> zbus::Result<zbus::zvariant::OwnedValue> {
                    self.proxy.call(#method, &(#command_name,)).await
                }
            }
        }
        CommandCategory::RuntimeSetter => {
            let method = &config.execute_runtime_setter_method;
            quote! {
                #[doc = #doc]
                pub async fn #ident(&self, value: &zbus::zvariant::Value<'_>) -> zbus::Result<bool> {
                    self.proxy.call(#method, &(#command_name, value)).await
                }
            }
        }
    }
}

fn emit_module(module: &ResolvedModule, config: &BusConfig) -> Result<TokenStream, OrcaGenError> {
    let mut methods = TokenStream::new();
    for descriptor in module.commands.iter() {
        let ident = module.identifier(descriptor).ok_or_else(|| OrcaGenError::Identifier {
            raw: descriptor.custom_name().to_string(),
            reason: format!("no identifier was resolved in module {}", module.commands.name),
        })?;
        methods.extend(emit_descriptor_method(
            descriptor.category(),
            descriptor.command_name(),
            descriptor.description(),
            ident,
            config,
        ));
    }

    let name = &module.commands.name;
    let ident = format_ident!("{}", module.type_name);
    let path = config.module_path(name);
    let service = &config.service_name;
    let interface = &config.module_interface;
    let doc = format!(
        " The `{name}` module: {} getter(s), {} setter(s) and {} command(s).",
        module.commands.getters.len(),
        module.commands.setters.len(),
        module.commands.commands.len()
    );
    Ok(quote! {
        #[doc = #doc]
        #[derive(Clone, Debug)]
        pub struct #ident {
            proxy: zbus::Proxy<'static>,
        }

        impl #ident {
            pub const PATH: &'static str = #path;

            pub async fn new(connection: &zbus::Connection) -> zbus::Result<Self> {
                let proxy = zbus::Proxy::new(connection, #service, Self::PATH, #interface).await?;
                Ok(Self { proxy })
            }

            pub fn proxy(&self) -> &zbus::Proxy<'static> {
                &self.proxy
            }

            pub fn path(&self) -> &zbus::zvariant::ObjectPath<'_> {
                self.proxy.path()
            }

            #methods
        }
    })
}

fn emit_client_type(modules: &[ResolvedModule], config: &BusConfig) -> TokenStream {
    let client = format_ident!("{}", CLIENT_TYPE_NAME);
    let service = &config.service_name;
    let object_path = &config.object_path;
    let interface = &config.service_interface;
    let present = &config.present_message_method;
    let fields: Vec<_> = modules
        .iter()
        .map(|m| format_ident!("{}", m.field_name))
        .collect();
    let types: Vec<_> = modules
        .iter()
        .map(|m| format_ident!("{}", m.type_name))
        .collect();
    quote! {
        /// Session connection to the screen reader with one handle per module.
        pub struct #client {
            connection: zbus::Connection,
            service: zbus::Proxy<'static>,
            #(pub #fields: #types,)*
        }

        impl #client {
            pub const SERVICE_NAME: &'static str = #service;
            pub const OBJECT_PATH: &'static str = #object_path;

            /// Connect to the session bus and bind every module.
            pub async fn new() -> zbus::Result<Self> {
                let connection = zbus::Connection::session().await?;
                Self::with_connection(connection).await
            }

            pub async fn with_connection(connection: zbus::Connection) -> zbus::Result<Self> {
                let service =
                    zbus::Proxy::new(&connection, Self::SERVICE_NAME, Self::OBJECT_PATH, #interface)
                        .await?;
                Ok(Self {
                    #(#fields: #types::new(&connection).await?,)*
                    service,
                    connection,
                })
            }

            pub fn connection(&self) -> &zbus::Connection {
                &self.connection
            }

            /// Present a message through the screen reader's speech and braille output.
            pub async fn present_message(&self, message: &str) -> zbus::Result<bool> {
                self.service.call(#present, &(message,)).await
            }

            pub async fn close(self) -> zbus::Result<()> {
                self.connection.close().await
            }
        }
    }
}

/// Render the whole client for `model`.
///
/// # Returns: `Result<String, OrcaGenError>`
/// * `Ok(String)` - Source text of the client, starting with [`GENERATED_HEADER`]
/// * `Err(OrcaGenError::NameCollision)` - Two generated items would share a name
/// * `Err(OrcaGenError::MalformedDescription)` - An introspected member has an invalid signature
/// * `Err(OrcaGenError::Emit)` - The rendered text does not parse
pub fn emit_client(model: &ServiceModel, config: &BusConfig) -> Result<String, OrcaGenError> {
    let mut types = Namespace::new("generated client types");
    types.reserve(&[CLIENT_TYPE_NAME], "the generated client");
    for module in &model.modules {
        types.claim(&module.type_name, format!("module `{}`", module.commands.name))?;
    }

    let proxies = proxy::emit_proxies(&model.tree, config, &mut types)?;
    let wrappers = model
        .modules
        .iter()
        .map(|module| emit_module(module, config))
        .collect::<Result<Vec<_>, _>>()?;
    let client = emit_client_type(&model.modules, config);

    let tokens = quote! {
        #(#proxies)*
        #(#wrappers)*
        #client
    };
    let body = tokens.to_string();
    syn::parse_file(&body).map_err(|e| OrcaGenError::Emit(e.to_string()))?;
    debug!("Emitted {} byte(s) of client source", body.len());
    info!(
        "Generated {} proxy trait(s) and {} module wrapper(s)",
        proxies.len(),
        wrappers.len()
    );
    Ok(format!("{GENERATED_HEADER}\n{body}\n"))
}
