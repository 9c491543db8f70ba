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

//! orcagen - generate a typed Rust client for the Orca screen reader's D-Bus service.
//!
//! The tool talks to a running Orca over the session bus. It can generate the client, or show
//! what the client would be generated from.
//!
//! # Commands
//!
//! - `generate [--output PATH] [--no-format]` - Write the generated client to `PATH`, or to
//!   stdout. The text is run through `rustfmt` unless `--no-format` is given
//! - `modules` - List the modules the service registers
//! - `commands <MODULE>` - Table of the getters, setters and commands of one module
//! - `introspect [--recursive]` - Object tree with interfaces and member counts
//!
//! `--service` and `--object-path` point every command at another instance of the service.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error` or `off`).
//!   Defaults to `info`

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use orcagen::BusConfig;
use std::error::Error;
use std::path::PathBuf;

mod generate;
mod introspect;
mod list;

use crate::generate::generate_handler;
use crate::introspect::introspect_handler;
use crate::list::{commands_handler, modules_handler};

#[derive(Parser, Debug)]
#[command(name = "orcagen")]
#[command(bin_name = "orcagen")]
#[command(version, about = "Generate a typed client for the Orca screen reader's D-Bus service")]
struct Cli {
    #[arg(
        long = "service",
        global = true,
        help = "Well-known bus name of the service. Defaults to org.gnome.Orca.Service"
    )]
    service: Option<String>,
    #[arg(
        long = "object-path",
        global = true,
        help = "Root object path of the service. Defaults to /org/gnome/Orca/Service"
    )]
    object_path: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the client source.
    Generate {
        /// File to write the client to. Printed to stdout when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep the generated text as emitted instead of running it through rustfmt.
        #[arg(long)]
        no_format: bool,
    },
    /// List the modules registered with the service.
    Modules,
    /// Show the getters, setters and commands of one module.
    Commands {
        /// Module name as listed by `modules`, e.g. SpeechAndVerbosityManager.
        module: String,
    },
    /// Show the object tree of the service.
    Introspect {
        /// Also introspect every child object.
        #[arg(short, long)]
        recursive: bool,
    },
}

impl Cli {
    fn bus_config(&self) -> BusConfig {
        let mut config = BusConfig::default();
        if let Some(service) = &self.service {
            config.service_name = service.clone();
        }
        if let Some(object_path) = &self.object_path {
            config.object_path = object_path.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    let config = cli.bus_config();
    let result = match &cli.command {
        Commands::Generate { output, no_format } => {
            generate_handler(&config, output.as_deref(), !no_format).await
        }
        Commands::Modules => modules_handler(&config).await,
        Commands::Commands { module } => commands_handler(&config, module).await,
        Commands::Introspect { recursive } => introspect_handler(&config, *recursive).await,
    }?;
    println!("{result}");
    Ok(())
}
