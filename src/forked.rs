//! Forked representation of listeners.
//!
//! Only [`ForkedListener`] crosses into the worker process: the implementation
//! id, the two output flags and an explicit result file. Conditions, the
//! output directory and the type alias stay with the controller.
//!
//! A handoff document wraps listeners in a `listeners` root:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <listeners>
//!   <listener classname="..." sendSysErr="false" sendSysOut="true"/>
//! </listeners>
//! ```

use std::borrow::Cow;
use std::io::{BufRead, Write};

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::debug;

use crate::listener::ListenerDefinition;

/// Element holding one listener.
pub const LISTENER_ELEMENT: &str = "listener";
/// Root element of a handoff document.
pub const LISTENERS_ELEMENT: &str = "listeners";
/// Attribute carrying the implementation id.
pub const ATTR_CLASS_NAME: &str = "classname";
pub const ATTR_SEND_SYS_ERR: &str = "sendSysErr";
pub const ATTR_SEND_SYS_OUT: &str = "sendSysOut";
pub const ATTR_RESULT_FILE: &str = "resultFile";

/// Errors raised while writing or reading the forked representation.
#[derive(Debug, Error)]
pub enum ForkedError {
    /// The listener has no implementation id to write.
    #[error("listener has no implementation id")]
    MissingImplementationId,
    /// A required attribute is absent.
    #[error("attribute {attribute} is missing at byte {position}")]
    MissingAttribute {
        attribute: &'static str,
        position: u64,
    },
    /// The reader is not where the element boundaries say it should be.
    #[error("expected {expected} at byte {position}, found {found}")]
    UnexpectedEvent {
        expected: &'static str,
        found: String,
        position: u64,
    },
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    /// Writing to the underlying sink failed.
    #[error("failed to write forked representation: {0}")]
    Io(#[from] std::io::Error),
}

/// The part of a [`ListenerDefinition`] sent to a forked worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkedListener {
    pub implementation_id: String,
    pub send_sys_err: bool,
    pub send_sys_out: bool,
    pub result_file: Option<String>,
}

impl TryFrom<&ListenerDefinition> for ForkedListener {
    type Error = ForkedError;

    fn try_from(listener: &ListenerDefinition) -> Result<Self, Self::Error> {
        let implementation_id = listener
            .implementation_id()
            .ok_or(ForkedError::MissingImplementationId)?;
        Ok(Self {
            implementation_id: implementation_id.to_owned(),
            send_sys_err: listener.should_send_sys_err(),
            send_sys_out: listener.should_send_sys_out(),
            result_file: listener.result_file().map(str::to_owned),
        })
    }
}

impl From<ForkedListener> for ListenerDefinition {
    fn from(forked: ForkedListener) -> Self {
        let mut listener = Self::new();
        listener.set_implementation_id(forked.implementation_id);
        listener.set_send_sys_err(forked.send_sys_err);
        listener.set_send_sys_out(forked.send_sys_out);
        if let Some(file) = forked.result_file {
            listener.set_result_file(file);
        }
        listener
    }
}

impl ForkedListener {
    /// Write this listener as a single empty `listener` element.
    ///
    /// # Errors
    ///
    /// Returns [`ForkedError::Io`] if the sink rejects the write.
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ForkedError> {
        let mut element = BytesStart::new(LISTENER_ELEMENT);
        element.push_attribute((ATTR_CLASS_NAME, self.implementation_id.as_str()));
        element.push_attribute((ATTR_SEND_SYS_ERR, bool_token(self.send_sys_err)));
        element.push_attribute((ATTR_SEND_SYS_OUT, bool_token(self.send_sys_out)));
        if let Some(file) = &self.result_file {
            element.push_attribute((ATTR_RESULT_FILE, file.as_str()));
        }
        writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Read a listener whose start tag is `current`, the event the reader
    /// has just produced.
    ///
    /// For a `Start` event the reader is advanced past the matching end tag.
    /// An `Empty` event is already complete.
    ///
    /// # Errors
    ///
    /// Fails if `current` is not a `listener` start tag, if any attribute is
    /// repeated or malformed, if `classname` is missing, or if anything other
    /// than `</listener>` follows the start tag.
    pub fn read<R: BufRead>(
        reader: &mut Reader<R>,
        current: &Event<'_>,
    ) -> Result<Self, ForkedError> {
        let (start, self_closing) = match current {
            Event::Start(e) if is_named(e.name(), LISTENER_ELEMENT) => (e, false),
            Event::Empty(e) if is_named(e.name(), LISTENER_ELEMENT) => (e, true),
            other => return Err(unexpected(reader, "<listener>", other)),
        };

        let attrs = ListenerAttributes::collect(start)?;
        let implementation_id = attrs.class_name.ok_or_else(|| ForkedError::MissingAttribute {
            attribute: ATTR_CLASS_NAME,
            position: reader.buffer_position(),
        })?;
        let listener = Self {
            implementation_id,
            send_sys_err: attrs
                .send_sys_err
                .is_some_and(|v| parse_permissive_bool(&v)),
            send_sys_out: attrs
                .send_sys_out
                .is_some_and(|v| parse_permissive_bool(&v)),
            result_file: attrs.result_file,
        };

        if !self_closing {
            match next_tag(reader)? {
                Event::End(e) if is_named(e.name(), LISTENER_ELEMENT) => {}
                other => return Err(unexpected(reader, "</listener>", &other)),
            }
        }
        debug!(
            implementation_id = %listener.implementation_id,
            "read forked listener"
        );
        Ok(listener)
    }
}

impl ListenerDefinition {
    /// Write the forked representation of this listener.
    ///
    /// Nothing is written when the implementation id is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ForkedError::MissingImplementationId`] when no implementation
    /// id is configured, or [`ForkedError::Io`] if the sink fails.
    pub fn to_forked_representation<W: Write>(
        &self,
        writer: &mut Writer<W>,
    ) -> Result<(), ForkedError> {
        ForkedListener::try_from(self)?.write(writer)
    }

    /// Rebuild a listener from its forked representation.
    ///
    /// See [`ForkedListener::read`] for the reader position contract.
    ///
    /// # Errors
    ///
    /// Propagates any [`ForkedError`] raised while reading.
    pub fn from_forked_representation<R: BufRead>(
        reader: &mut Reader<R>,
        current: &Event<'_>,
    ) -> Result<Self, ForkedError> {
        ForkedListener::read(reader, current).map(Self::from)
    }
}

/// Write a complete handoff document.
///
/// # Errors
///
/// Returns [`ForkedError::Io`] if the sink fails.
pub fn write_document<W: Write>(
    writer: &mut Writer<W>,
    listeners: &[ForkedListener],
) -> Result<(), ForkedError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(LISTENERS_ELEMENT)))?;
    for listener in listeners {
        listener.write(writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(LISTENERS_ELEMENT)))?;
    Ok(())
}

/// Read a complete handoff document.
///
/// # Errors
///
/// Fails on malformed XML, a root other than `listeners`, any child other
/// than `listener`, input that ends before `</listeners>`, or anything but
/// whitespace, comments and processing instructions after it.
pub fn read_document<R: BufRead>(
    reader: &mut Reader<R>,
) -> Result<Vec<ForkedListener>, ForkedError> {
    match next_tag(reader)? {
        Event::Empty(e) if is_named(e.name(), LISTENERS_ELEMENT) => {
            return match next_tag(reader)? {
                Event::Eof => Ok(Vec::new()),
                other => Err(unexpected(reader, "end of input", &other)),
            };
        }
        Event::Start(e) if is_named(e.name(), LISTENERS_ELEMENT) => {}
        other => return Err(unexpected(reader, "<listeners>", &other)),
    }
    let mut listeners = Vec::new();
    loop {
        let event = next_tag(reader)?;
        if let Event::End(e) = &event
            && is_named(e.name(), LISTENERS_ELEMENT)
        {
            return match next_tag(reader)? {
                Event::Eof => Ok(listeners),
                other => Err(unexpected(reader, "end of input", &other)),
            };
        }
        listeners.push(ForkedListener::read(reader, &event)?);
    }
}

/// Serialise listeners into handoff document bytes.
///
/// Every listener is checked before anything is written.
///
/// # Errors
///
/// Returns [`ForkedError::MissingImplementationId`] if any listener lacks an
/// implementation id.
pub fn to_bytes(listeners: &[ListenerDefinition]) -> Result<Vec<u8>, ForkedError> {
    let forked = listeners
        .iter()
        .map(ForkedListener::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, &forked)?;
    Ok(writer.into_inner())
}

/// Rebuild listeners from handoff document bytes.
///
/// # Errors
///
/// Propagates any [`ForkedError`] raised by [`read_document`].
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<ListenerDefinition>, ForkedError> {
    let mut reader = Reader::from_reader(bytes);
    Ok(read_document(&mut reader)?
        .into_iter()
        .map(ListenerDefinition::from)
        .collect())
}

/// `"true"` in any ASCII case is true; everything else is false.
#[must_use]
pub fn parse_permissive_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

const fn bool_token(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn is_named(name: QName<'_>, expected: &str) -> bool {
    name.as_ref() == expected.as_bytes()
}

/// Raw values of the known `listener` attributes.
#[derive(Default)]
struct ListenerAttributes {
    class_name: Option<String>,
    send_sys_err: Option<String>,
    send_sys_out: Option<String>,
    result_file: Option<String>,
}

impl ListenerAttributes {
    /// Walk the attributes once. Duplicate names fail with
    /// [`AttrError::Duplicated`]; unknown names are ignored.
    fn collect(start: &BytesStart<'_>) -> Result<Self, ForkedError> {
        let mut found = Self::default();
        for attr in start.attributes() {
            let attr = attr?;
            let slot = match attr.key.as_ref() {
                key if key == ATTR_CLASS_NAME.as_bytes() => &mut found.class_name,
                key if key == ATTR_SEND_SYS_ERR.as_bytes() => &mut found.send_sys_err,
                key if key == ATTR_SEND_SYS_OUT.as_bytes() => &mut found.send_sys_out,
                key if key == ATTR_RESULT_FILE.as_bytes() => &mut found.result_file,
                _ => continue,
            };
            *slot = Some(attr.unescape_value().map(Cow::into_owned)?);
        }
        Ok(found)
    }
}

/// Advance to the next start, end or empty tag.
///
/// Whitespace, comments, processing instructions and declarations are
/// skipped. Any other event is returned as-is for the caller to reject.
fn next_tag<R: BufRead>(reader: &mut Reader<R>) -> Result<Event<'static>, ForkedError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            other => return Ok(other.into_owned()),
        }
        buf.clear();
    }
}

fn unexpected<R>(reader: &Reader<R>, expected: &'static str, found: &Event<'_>) -> ForkedError {
    ForkedError::UnexpectedEvent {
        expected,
        found: describe(found),
        position: reader.buffer_position(),
    }
}

fn describe(event: &Event<'_>) -> String {
    match event {
        Event::Start(e) => format!("<{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Empty(e) => format!("<{}/>", String::from_utf8_lossy(e.name().as_ref())),
        Event::End(e) => format!("</{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Text(_) | Event::CData(_) => "text".to_owned(),
        Event::Eof => "end of input".to_owned(),
        _ => "markup".to_owned(),
    }
}
