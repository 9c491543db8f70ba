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

//! Rust types for D-Bus type signatures.
//!
//! Signatures are parsed and validated by zvariant; this module only decides what each parsed
//! type is written as in generated code.

use proc_macro2::TokenStream;
use quote::quote;
use zbus::zvariant::Signature;

/// Where a type is used: arguments are borrowed when cheap, everything else is owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Argument,
    Owned,
}

/// Parse a signature that must hold exactly one complete type, as an `arg` or `property` does.
pub fn parse_single(raw: &str) -> Result<Signature, String> {
    let signature: Signature = raw.parse().map_err(|e| format!("{e}"))?;
    match signature {
        Signature::Unit => Err("empty signature".to_string()),
        // several top-level types parse as one structure without the parentheses
        s if s.to_string() != raw => Err(format!("expected one complete type in {raw:?}")),
        s => Ok(s),
    }
}

/// The Rust type generated code uses for `signature`.
pub fn rust_type(signature: &Signature, position: Position) -> TokenStream {
    match (signature, position) {
        (Signature::Str, Position::Argument) => quote!(&str),
        (Signature::Variant, Position::Argument) => quote!(&zbus::zvariant::Value<'_>),
        (Signature::Variant, Position::Owned) => quote!(zbus::zvariant::OwnedValue),
        (Signature::Array(child), _) => {
            let inner = rust_type(child.signature(), Position::Owned);
            quote!(::std::vec::Vec<#inner>)
        }
        (Signature::Dict { key, value }, _) => {
            let key = rust_type(key.signature(), Position::Owned);
            let value = rust_type(value.signature(), Position::Owned);
            quote!(::std::collections::HashMap<#key, #value>)
        }
        (Signature::Structure(fields), _) => {
            let fields = fields.iter().map(|f| rust_type(f, Position::Owned));
            quote!((#(#fields,)*))
        }
        (basic, _) => basic_type(basic),
    }
}

fn basic_type(signature: &Signature) -> TokenStream {
    match signature {
        Signature::U8 => quote!(u8),
        Signature::Bool => quote!(bool),
        Signature::I16 => quote!(i16),
        Signature::U16 => quote!(u16),
        Signature::I32 => quote!(i32),
        Signature::U32 => quote!(u32),
        Signature::I64 => quote!(i64),
        Signature::U64 => quote!(u64),
        Signature::F64 => quote!(f64),
        Signature::Str => quote!(::std::string::String),
        Signature::ObjectPath => quote!(zbus::zvariant::OwnedObjectPath),
        Signature::Signature => quote!(zbus::zvariant::Signature),
        #[cfg(unix)]
        Signature::Fd => quote!(zbus::zvariant::OwnedFd),
        _ => quote!(()),
    }
}

/// Return type for a list of output types: `()`, the single type, or a tuple.
pub fn return_type(outputs: &[Signature]) -> TokenStream {
    match outputs {
        [] => quote!(()),
        [single] => rust_type(single, Position::Owned),
        many => {
            let types = many.iter().map(|t| rust_type(t, Position::Owned));
            quote!((#(#types),*))
        }
    }
}
