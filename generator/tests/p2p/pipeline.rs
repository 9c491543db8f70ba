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

use crate::p2p::fake_orca::{FakeModule, FakeOrca, flat_review_module, serve, speech_module};
use googletest::prelude::*;
use orcagen::commands::{CommandCategory, list_commands};
use orcagen::introspection::introspect_tree;
use orcagen::modules::list_modules;
use orcagen::{BusConfig, Session, build_model, generate_with};
use rstest::*;

const SPEECH: &str = "SpeechAndVerbosityManager";
const FLAT_REVIEW: &str = "FlatReviewPresenter";

#[fixture]
fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The service must outlive the session, so both are handed to the test.
async fn orca_session(modules: Vec<(&str, FakeModule)>) -> (FakeOrca, Session) {
    let orca = serve(modules).await.expect("fake service must start");
    let session = Session::from_connection(orca.client.clone());
    (orca, session)
}

fn full_orca() -> Vec<(&'static str, FakeModule)> {
    vec![(SPEECH, speech_module()), (FLAT_REVIEW, flat_review_module())]
}

#[gtest]
#[tokio::test]
#[rstest]
async fn modules_come_back_in_service_order(_setup: ()) {
    let (_orca, session) = orca_session(full_orca()).await;
    let modules = list_modules(&session, &BusConfig::default()).await;
    assert_that!(modules, ok(elements_are![eq(SPEECH), eq(FLAT_REVIEW)]));
    assert_that!(session.close().await, ok(anything()));
}

#[gtest]
#[tokio::test]
#[rstest]
async fn tree_reaches_every_module(_setup: ()) {
    let (_orca, session) = orca_session(full_orca()).await;
    let config = BusConfig::default();
    let tree = introspect_tree(&session, &config)
        .await
        .expect("tree must introspect");

    let described: Vec<(String, Vec<String>)> = tree
        .walk(&config.object_path)
        .into_iter()
        .filter(|(_, node)| !node.interfaces.is_empty())
        .map(|(path, node)| {
            let names = node
                .interfaces
                .iter()
                .map(|i| i.name.clone())
                .filter(|name| name.starts_with("org.gnome"))
                .collect();
            (path, names)
        })
        .collect();
    expect_that!(
        described,
        unordered_elements_are![
            eq(&(
                "/org/gnome/Orca/Service".to_string(),
                vec!["org.gnome.Orca.Service".to_string()]
            )),
            eq(&(
                "/org/gnome/Orca/Service/SpeechAndVerbosityManager".to_string(),
                vec!["org.gnome.Orca.Module".to_string()]
            )),
            eq(&(
                "/org/gnome/Orca/Service/FlatReviewPresenter".to_string(),
                vec!["org.gnome.Orca.Module".to_string()]
            ))
        ]
    );
}

#[gtest]
#[tokio::test]
#[rstest]
async fn commands_are_classified(_setup: ()) {
    let (_orca, session) = orca_session(full_orca()).await;
    let model = build_model(&session, &BusConfig::default())
        .await
        .expect("model must build");

    assert_that!(model.modules, len(eq(2)));
    let speech = &model.modules[0].commands;
    let summary: Vec<(CommandCategory, String, String)> = speech
        .iter()
        .map(|d| {
            (
                d.category(),
                d.command_name().to_string(),
                d.custom_name().to_string(),
            )
        })
        .collect();
    expect_that!(
        summary,
        elements_are![
            eq(&(CommandCategory::RuntimeGetter, "Rate".to_string(), "Rate".to_string())),
            eq(&(
                CommandCategory::RuntimeGetter,
                "Verbosity".to_string(),
                "Verbosity".to_string()
            )),
            eq(&(CommandCategory::RuntimeSetter, "Rate".to_string(), "SetRate".to_string())),
            eq(&(
                CommandCategory::Command,
                "InterruptSpeech".to_string(),
                "InterruptSpeech".to_string()
            )),
            eq(&(
                CommandCategory::Command,
                "IncreasePitch".to_string(),
                "IncreasePitch".to_string()
            )),
            eq(&(
                CommandCategory::Command,
                "DecreasePitch".to_string(),
                "DecreasePitch".to_string()
            ))
        ]
    );
    expect_that!(model.modules[1].commands.getters, len(eq(0)));
    expect_that!(model.modules[1].commands.setters, len(eq(0)));
}

#[gtest]
#[tokio::test]
#[rstest]
async fn generated_client_covers_the_service(_setup: ()) {
    let (_orca, session) = orca_session(full_orca()).await;
    let source = generate_with(&session, &BusConfig::default())
        .await
        .expect("generation must succeed");

    let file = syn::parse_file(&source).expect("generated client must parse");
    assert_that!(file.items.is_empty(), eq(false));
    let compact: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    expect_that!(
        compact,
        all![
            contains_substring("pubtraitOrcaService"),
            contains_substring("pubtraitOrcaModule"),
            contains_substring("pubstructSpeechAndVerbosityManager{"),
            contains_substring("pubstructFlatReviewPresenter{"),
            contains_substring("pubasyncfnset_rate("),
            contains_substring("pubasyncfntoggle_flat_review_mode(&self,notify_user:bool)"),
            contains_substring("pubflat_review_presenter:FlatReviewPresenter,")
        ]
    );
}

#[gtest]
#[tokio::test]
#[rstest]
async fn residual_setter_collision_is_refused(_setup: ()) {
    let clashing = FakeModule {
        setters: vec![("Rate".to_string(), "Sets the rate.".to_string())],
        commands: vec![("SetRate".to_string(), "Also sets the rate.".to_string())],
        ..FakeModule::default()
    };
    let (_orca, session) = orca_session(vec![(SPEECH, clashing)]).await;

    let result = generate_with(&session, &BusConfig::default()).await;
    assert_that!(
        result,
        err(displays_as(all![
            contains_substring("OrcaGenError::NameCollision"),
            contains_substring("setter `Rate`"),
            contains_substring("command `SetRate`")
        ]))
    );
}

#[gtest]
#[tokio::test]
#[rstest]
async fn malformed_listing_aborts_generation(_setup: ()) {
    let broken = FakeModule {
        commands: vec![("".to_string(), "Nameless.".to_string())],
        ..FakeModule::default()
    };
    let (_orca, session) = orca_session(vec![(SPEECH, broken)]).await;

    let result = list_commands(&session, &BusConfig::default(), SPEECH).await;
    assert_that!(
        result,
        err(displays_as(all![
            contains_substring("OrcaGenError::MalformedReply"),
            contains_substring("invalid item 0 in reply to ListCommands"),
            contains_substring("field 0 is empty")
        ]))
    );
}

#[gtest]
#[tokio::test]
#[rstest]
async fn missing_module_is_a_call_error(_setup: ()) {
    let (_orca, session) = orca_session(vec![(SPEECH, speech_module())]).await;

    let result = list_commands(&session, &BusConfig::default(), "NoSuchModule").await;
    assert_that!(
        result,
        err(displays_as(all![
            contains_substring("OrcaGenError::Call"),
            contains_substring("/org/gnome/Orca/Service/NoSuchModule")
        ]))
    );
}

#[gtest]
#[tokio::test]
#[rstest]
async fn empty_reply_is_malformed(_setup: ()) {
    let (_orca, session) = orca_session(full_orca()).await;
    let config = BusConfig {
        list_modules_method: "Refresh".to_string(),
        ..BusConfig::default()
    };

    let result = list_modules(&session, &config).await;
    assert_that!(
        result,
        err(displays_as(all![
            contains_substring("OrcaGenError::MalformedReply"),
            contains_substring("in reply to Refresh"),
            contains_substring("0 reply fields")
        ]))
    );
}
