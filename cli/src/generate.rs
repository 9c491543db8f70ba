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

//! Generate command implementation.
//!
//! Runs the whole generation pipeline against the service, optionally formats the result with
//! `rustfmt`, and writes it either to stdout or atomically to a file. Formatting is best effort:
//! when `rustfmt` is missing or fails, the emitted text is kept as it is and a warning is logged.

use log::{info, warn};
use orcagen::system_io::write_artifact;
use orcagen::{BusConfig, OrcaGenError, generate_client};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Pipe `source` through `rustfmt`, returning `None` when formatting is not possible.
fn run_rustfmt(source: &str) -> Option<String> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2024"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| warn!("Could not run rustfmt: {e}"))
        .ok()?;
    // rustfmt reads all of stdin before writing anything, so this cannot block on a full pipe
    let mut stdin = child.stdin.take()?;
    stdin
        .write_all(source.as_bytes())
        .map_err(|e| warn!("Could not pass the client to rustfmt: {e}"))
        .ok()?;
    drop(stdin);
    let output = child
        .wait_with_output()
        .map_err(|e| warn!("rustfmt did not finish: {e}"))
        .ok()?;
    if !output.status.success() {
        warn!(
            "rustfmt failed with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }
    String::from_utf8(output.stdout)
        .map_err(|e| warn!("rustfmt produced invalid UTF-8: {e}"))
        .ok()
}

/// Formatted `source`, or `source` unchanged when rustfmt is not usable.
pub fn format_source(source: String) -> String {
    match run_rustfmt(&source) {
        Some(formatted) => formatted,
        None => {
            warn!("Keeping the client unformatted");
            source
        }
    }
}

/// Main handler for the generate command.
///
/// # Arguments
///
/// * `config` - Service to generate the client for
/// * `output` - Destination file; the source itself is returned for printing when `None`
/// * `format` - Whether to run the source through `rustfmt`
///
/// # Returns: `Result<String, OrcaGenError>`
/// * `Ok(String)` - The client source, or a confirmation naming the written file
/// * `Err(OrcaGenError)` - Generation or writing failed; no file was written
pub async fn generate_handler(
    config: &BusConfig,
    output: Option<&Path>,
    format: bool,
) -> Result<String, OrcaGenError> {
    let source = generate_client(config).await?;
    let source = match format {
        true => format_source(source),
        false => source,
    };
    match output {
        None => Ok(source),
        Some(path) => {
            write_artifact(path, &source)?;
            info!("Wrote {} byte(s) to {path:?}", source.len());
            Ok(format!("Client written to {}", path.display()))
        }
    }
}
