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

use orcagen::config::ORCA_OBJECT_PATH;
use tokio::net::UnixStream;
use zbus::connection::Builder;
use zbus::zvariant::OwnedValue;
use zbus::{Connection, Guid, fdo, interface};

pub type Listing = Vec<(String, String)>;

fn listing(entries: &[(&str, &str)]) -> Listing {
    entries
        .iter()
        .map(|(name, description)| (name.to_string(), description.to_string()))
        .collect()
}

/// Root object of the fake screen reader.
pub struct FakeService {
    pub modules: Vec<String>,
}

#[interface(name = "org.gnome.Orca.Service")]
impl FakeService {
    async fn list_modules(&self) -> Vec<String> {
        self.modules.clone()
    }

    async fn present_message(&self, message: &str) -> bool {
        !message.is_empty()
    }

    async fn refresh(&self) {}
}

/// One module object of the fake screen reader.
#[derive(Default, Clone)]
pub struct FakeModule {
    pub getters: Listing,
    pub setters: Listing,
    pub commands: Listing,
}

#[interface(name = "org.gnome.Orca.Module")]
impl FakeModule {
    async fn list_runtime_getters(&self) -> Listing {
        self.getters.clone()
    }

    async fn list_runtime_setters(&self) -> Listing {
        self.setters.clone()
    }

    async fn list_commands(&self) -> Listing {
        self.commands.clone()
    }

    async fn execute_command(&self, name: &str, _notify_user: bool) -> fdo::Result<bool> {
        match self.commands.iter().any(|(command, _)| command == name) {
            true => Ok(true),
            false => Err(fdo::Error::UnknownMethod(name.to_string())),
        }
    }

    async fn execute_runtime_getter(&self, name: &str) -> fdo::Result<OwnedValue> {
        match self.getters.iter().any(|(getter, _)| getter == name) {
            true => Ok(OwnedValue::from(50u32)),
            false => Err(fdo::Error::UnknownMethod(name.to_string())),
        }
    }

    async fn execute_runtime_setter(&self, name: &str, _value: OwnedValue) -> bool {
        self.setters.iter().any(|(setter, _)| setter == name)
    }
}

pub fn speech_module() -> FakeModule {
    FakeModule {
        getters: listing(&[
            ("Rate", "Returns the current speech rate."),
            ("Verbosity", "Returns the current verbosity level."),
        ]),
        setters: listing(&[("Rate", "Sets the current speech rate.")]),
        commands: listing(&[
            ("InterruptSpeech", "Interrupts speech."),
            ("IncreasePitch", "Increases the speech pitch."),
            ("DecreasePitch", "Decreases the speech pitch."),
        ]),
    }
}

pub fn flat_review_module() -> FakeModule {
    FakeModule {
        commands: listing(&[("ToggleFlatReviewMode", "Toggles flat review mode.")]),
        ..FakeModule::default()
    }
}

/// A running fake service and a client connection to it.
pub struct FakeOrca {
    pub client: Connection,
    // dropping the server connection stops the service
    _server: Connection,
}

/// Serve `modules` over a peer-to-peer socket, so no bus daemon is needed.
pub async fn serve(modules: Vec<(&str, FakeModule)>) -> zbus::Result<FakeOrca> {
    let service = FakeService {
        modules: modules.iter().map(|(name, _)| name.to_string()).collect(),
    };
    let (server_stream, client_stream) = UnixStream::pair()?;

    let mut server = Builder::unix_stream(server_stream)
        .server(Guid::generate())?
        .p2p()
        .serve_at(ORCA_OBJECT_PATH, service)?;
    for (name, module) in modules {
        server = server.serve_at(format!("{ORCA_OBJECT_PATH}/{name}"), module)?;
    }
    let client = Builder::unix_stream(client_stream).p2p();

    let (server, client) = tokio::try_join!(server.build(), client.build())?;
    Ok(FakeOrca {
        client,
        _server: server,
    })
}
