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

//! Iterative parser for introspection documents.
//!
//! The document is read as a flat stream of `quick-xml` events and the tree is assembled on an
//! explicit stack of open elements, so nesting depth never turns into call stack depth. The
//! stack is additionally capped by the configured ceiling.

use crate::error::OrcaGenError;
use crate::introspection::{
    Access, Arg, Direction, Interface, IntrospectionNode, Method, Property, Signal,
};
use log::trace;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An element whose end tag has not been seen yet.
enum Frame {
    Node(IntrospectionNode),
    Interface(Interface),
    Method(Method),
    Signal(Signal),
    Property(Property),
    Arg(Arg),
    /// `annotation`, or an element this parser does not model, with everything below it.
    Skipped,
}

impl Frame {
    fn tag(&self) -> &'static str {
        match self {
            Frame::Node(_) => "node",
            Frame::Interface(_) => "interface",
            Frame::Method(_) => "method",
            Frame::Signal(_) => "signal",
            Frame::Property(_) => "property",
            Frame::Arg(_) => "arg",
            Frame::Skipped => "ignored element",
        }
    }
}

/// Attributes of one element, decoded and unescaped.
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn read(path: &str, start: &BytesStart<'_>) -> Result<Self, OrcaGenError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|e| OrcaGenError::malformed_description(path, e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| OrcaGenError::malformed_description(path, e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Attributes(attributes))
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn required(&self, path: &str, tag: &str, key: &str) -> Result<String, OrcaGenError> {
        match self.optional(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(OrcaGenError::malformed_description(
                path,
                format!("<{tag}> is missing the required `{key}` attribute"),
            )),
        }
    }
}

fn parse_access(path: &str, raw: &str) -> Result<Access, OrcaGenError> {
    match raw {
        "read" => Ok(Access::Read),
        "write" => Ok(Access::Write),
        "readwrite" => Ok(Access::ReadWrite),
        other => Err(OrcaGenError::malformed_description(
            path,
            format!("unknown property access {other:?}"),
        )),
    }
}

fn parse_direction(path: &str, raw: Option<String>) -> Result<Option<Direction>, OrcaGenError> {
    match raw.as_deref() {
        None => Ok(None),
        Some("in") => Ok(Some(Direction::In)),
        Some("out") => Ok(Some(Direction::Out)),
        Some(other) => Err(OrcaGenError::malformed_description(
            path,
            format!("unknown argument direction {other:?}"),
        )),
    }
}

/// Build the frame for a newly opened element, checking it may appear below `parent`.
fn open(
    path: &str,
    start: &BytesStart<'_>,
    parent: Option<&Frame>,
    have_root: bool,
) -> Result<Frame, OrcaGenError> {
    let name = start.name();
    let tag = String::from_utf8_lossy(name.as_ref()).into_owned();
    if let Some(Frame::Skipped) = parent {
        return Ok(Frame::Skipped);
    }
    let misplaced = |parent: &str| {
        OrcaGenError::malformed_description(path, format!("unexpected <{tag}> inside {parent}"))
    };
    let attributes = Attributes::read(path, start)?;
    match (parent, tag.as_str()) {
        (None, "node") if !have_root => Ok(Frame::Node(IntrospectionNode {
            name: attributes.optional("name"),
            ..IntrospectionNode::default()
        })),
        (None, "node") => Err(OrcaGenError::malformed_description(
            path,
            "more than one top-level <node>",
        )),
        (None, _) => Err(misplaced("the document root")),
        (Some(Frame::Node(_)), "node") => Ok(Frame::Node(IntrospectionNode {
            name: Some(attributes.required(path, "node", "name")?),
            ..IntrospectionNode::default()
        })),
        (Some(Frame::Node(_)), "interface") => Ok(Frame::Interface(Interface {
            name: attributes.required(path, "interface", "name")?,
            ..Interface::default()
        })),
        (Some(Frame::Interface(_)), "method") => Ok(Frame::Method(Method {
            name: attributes.required(path, "method", "name")?,
            args: Vec::new(),
        })),
        (Some(Frame::Interface(_)), "signal") => Ok(Frame::Signal(Signal {
            name: attributes.required(path, "signal", "name")?,
            args: Vec::new(),
        })),
        (Some(Frame::Interface(_)), "property") => Ok(Frame::Property(Property {
            name: attributes.required(path, "property", "name")?,
            signature: attributes.required(path, "property", "type")?,
            access: parse_access(path, &attributes.required(path, "property", "access")?)?,
        })),
        (Some(Frame::Method(_) | Frame::Signal(_)), "arg") => Ok(Frame::Arg(Arg {
            name: attributes.optional("name").filter(|n| !n.is_empty()),
            signature: attributes.required(path, "arg", "type")?,
            direction: parse_direction(path, attributes.optional("direction"))?,
        })),
        (Some(parent), "node" | "interface" | "method" | "signal" | "property" | "arg") => {
            Err(misplaced(&format!("<{}>", parent.tag())))
        }
        (Some(_), _) => Ok(Frame::Skipped),
    }
}

/// Attach a finished element to its parent, or make it the root.
fn close(
    path: &str,
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<IntrospectionNode>,
) -> Result<(), OrcaGenError> {
    match (frame, stack.last_mut()) {
        (Frame::Skipped, _) => {}
        (Frame::Node(node), None) => *root = Some(node),
        (Frame::Node(node), Some(Frame::Node(parent))) => parent.nodes.push(node),
        (Frame::Interface(interface), Some(Frame::Node(parent))) => {
            parent.interfaces.push(interface)
        }
        (Frame::Method(method), Some(Frame::Interface(parent))) => parent.methods.push(method),
        (Frame::Signal(signal), Some(Frame::Interface(parent))) => parent.signals.push(signal),
        (Frame::Property(property), Some(Frame::Interface(parent))) => {
            parent.properties.push(property)
        }
        (Frame::Arg(arg), Some(Frame::Method(parent))) => parent.args.push(arg),
        (Frame::Arg(arg), Some(Frame::Signal(parent))) => parent.args.push(arg),
        (frame, _) => {
            return Err(OrcaGenError::malformed_description(
                path,
                format!("<{}> closed in an unexpected place", frame.tag()),
            ));
        }
    }
    Ok(())
}

/// Parse the introspection document reported for `path`.
///
/// # Arguments
///
/// * `path`: object path the document describes, used in error messages
/// * `xml`: the document
/// * `max_depth`: deepest element nesting accepted
///
/// # Returns: `Result<IntrospectionNode, OrcaGenError>`
/// * `Ok(IntrospectionNode)` - The complete tree of the document
/// * `Err(OrcaGenError::MalformedDescription)` - Bad markup, a missing required attribute, an
///   element in the wrong place or nesting deeper than `max_depth`
pub fn parse_document(
    path: &str,
    xml: &str,
    max_depth: usize,
) -> Result<IntrospectionNode, OrcaGenError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<IntrospectionNode> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            OrcaGenError::malformed_description(
                path,
                format!("at byte {}: {e}", reader.buffer_position()),
            )
        })?;
        match event {
            Event::Start(start) => {
                if stack.len() >= max_depth {
                    return Err(OrcaGenError::malformed_description(
                        path,
                        format!("elements nested deeper than {max_depth}"),
                    ));
                }
                let frame = open(path, &start, stack.last(), root.is_some())?;
                stack.push(frame);
            }
            Event::Empty(start) => {
                let frame = open(path, &start, stack.last(), root.is_some())?;
                close(path, frame, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    OrcaGenError::malformed_description(path, "unbalanced closing tag")
                })?;
                close(path, frame, &mut stack, &mut root)?;
            }
            Event::Eof => break,
            // declaration, doctype, comments and whitespace carry nothing we model
            _ => {}
        }
    }

    if let Some(open_frame) = stack.last() {
        return Err(OrcaGenError::malformed_description(
            path,
            format!("document ended inside <{}>", open_frame.tag()),
        ));
    }
    let root = root.ok_or_else(|| {
        OrcaGenError::malformed_description(path, "document has no <node> element")
    })?;
    trace!(
        "Parsed {path}: {} interface(s), {} child node(s)",
        root.interfaces.len(),
        root.nodes.len()
    );
    Ok(root)
}

#[cfg(test)]
mod test_parse_document {
    use crate::introspection::xml::parse_document;
    use crate::introspection::{Access, Direction};
    use googletest::prelude::*;
    use rstest::*;

    const PATH: &str = "/org/gnome/Orca/Service";

    const ORCA_ROOT: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <interface name="org.freedesktop.DBus.Introspectable">
    <method name="Introspect">
      <arg type="s" name="xml_data" direction="out"/>
    </method>
  </interface>
  <interface name="org.gnome.Orca.Service">
    <method name="ListModules">
      <arg type="as" direction="out"/>
    </method>
    <method name="PresentMessage">
      <arg name="message" type="s" direction="in"/>
      <arg type="b" direction="out"/>
      <annotation name="org.freedesktop.DBus.Method.NoReply" value="false"/>
    </method>
    <signal name="ModulesChanged">
      <arg name="count" type="u"/>
    </signal>
    <property name="Version" type="s" access="read"/>
    <property name="Verbose" type="b" access="readwrite"/>
  </interface>
  <node name="SpeechAndVerbosityManager"/>
  <node name="FlatReviewPresenter"/>
</node>"#;

    #[gtest]
    fn parses_full_document() {
        let root = parse_document(PATH, ORCA_ROOT, 64).expect("document must parse");
        assert_that!(root.name, none());
        assert_that!(root.interfaces, len(eq(2)));
        let service = &root.interfaces[1];
        expect_that!(service.name, eq("org.gnome.Orca.Service"));
        let methods: Vec<String> = service.methods.iter().map(|m| m.name.clone()).collect();
        expect_that!(methods, elements_are![eq("ListModules"), eq("PresentMessage")]);

        let present = &service.methods[1];
        expect_that!(present.args, len(eq(2)));
        expect_that!(present.args[0].name.as_deref(), some(eq("message")));
        expect_that!(present.args[0].direction, some(eq(Direction::In)));
        expect_that!(present.args[1].name, none());
        expect_that!(present.args[1].signature, eq("b"));

        expect_that!(service.signals[0].name, eq("ModulesChanged"));
        expect_that!(service.signals[0].args[0].direction, none());
        expect_that!(service.properties[0].access, eq(Access::Read));
        expect_that!(service.properties[1].access, eq(Access::ReadWrite));

        let children: Vec<Option<String>> = root.nodes.iter().map(|n| n.name.clone()).collect();
        expect_that!(
            children,
            elements_are![
                some(eq("SpeechAndVerbosityManager")),
                some(eq("FlatReviewPresenter"))
            ]
        );
        expect_that!(root.nodes[0].is_stub(), eq(true));
    }

    #[gtest]
    fn parsing_is_repeatable() {
        let first = parse_document(PATH, ORCA_ROOT, 64).expect("document must parse");
        let second = parse_document(PATH, ORCA_ROOT, 64).expect("document must parse");
        assert_eq!(first, second);
    }

    #[gtest]
    fn nested_child_documents_are_kept() {
        let xml = r#"<node name="/org"><node name="gnome"><node name="Orca">
            <interface name="org.gnome.Orca.Module"><method name="ListCommands"><arg type="a(ss)" direction="out"/></method></interface>
        </node></node></node>"#;
        let root = parse_document(PATH, xml, 64).expect("document must parse");
        assert_that!(root.name.as_deref(), some(eq("/org")));
        let orca = &root.nodes[0].nodes[0];
        assert_that!(orca.name.as_deref(), some(eq("Orca")));
        assert_that!(orca.interfaces[0].methods[0].args[0].signature, eq("a(ss)"));
    }

    #[gtest]
    #[rstest]
    #[case::not_xml("this is not xml <", "OrcaGenError::MalformedDescription")]
    #[case::empty("", "document has no <node> element")]
    #[case::unclosed("<node><interface name=\"a.b\">", "OrcaGenError::MalformedDescription")]
    #[case::mismatched("<node><interface name=\"a.b\"></node>", "OrcaGenError::MalformedDescription")]
    #[case::interface_without_name("<node><interface/></node>", "missing the required `name`")]
    #[case::child_without_name("<node><node/></node>", "missing the required `name`")]
    #[case::arg_without_type(
        "<node><interface name=\"a.b\"><method name=\"M\"><arg name=\"x\"/></method></interface></node>",
        "missing the required `type`"
    )]
    #[case::property_without_access(
        "<node><interface name=\"a.b\"><property name=\"P\" type=\"s\"/></interface></node>",
        "missing the required `access`"
    )]
    #[case::bad_access(
        "<node><interface name=\"a.b\"><property name=\"P\" type=\"s\" access=\"rw\"/></interface></node>",
        "unknown property access"
    )]
    #[case::bad_direction(
        "<node><interface name=\"a.b\"><method name=\"M\"><arg type=\"s\" direction=\"sideways\"/></method></interface></node>",
        "unknown argument direction"
    )]
    #[case::method_outside_interface("<node><method name=\"M\"/></node>", "unexpected <method> inside <node>")]
    #[case::wrong_root("<interface name=\"a.b\"/>", "unexpected <interface> inside the document root")]
    #[case::two_roots("<node/><node/>", "more than one top-level <node>")]
    fn rejects_malformed(#[case] xml: &str, #[case] message: &str) {
        assert_that!(
            parse_document(PATH, xml, 64),
            err(displays_as(all![
                contains_substring("OrcaGenError::MalformedDescription"),
                contains_substring(PATH),
                contains_substring(message)
            ]))
        );
    }

    #[gtest]
    fn unknown_elements_are_skipped_with_their_children() {
        let xml = r#"<node><doc:doc xmlns:doc="http://example.com"><node/><method/></doc:doc>
            <interface name="a.b"><annotation name="x" value="y"><node/></annotation></interface></node>"#;
        let root = parse_document(PATH, xml, 64).expect("document must parse");
        assert_that!(root.nodes, len(eq(0)));
        assert_that!(root.interfaces, len(eq(1)));
    }

    #[gtest]
    fn deep_nesting_is_refused_without_recursion() {
        let depth = 10_000;
        let mut xml = String::from("<node>");
        for i in 0..depth {
            xml.push_str(&format!("<node name=\"n{i}\">"));
        }
        for _ in 0..depth {
            xml.push_str("</node>");
        }
        xml.push_str("</node>");
        assert_that!(
            parse_document(PATH, &xml, 64),
            err(displays_as(contains_substring("nested deeper than 64")))
        );
    }
}
