//! Import placeholder extraction and rewriting
//!
//! Placeholders are `text:text-input` fields whose `text:description` is
//! `import`. Both the extractor and the rewriter stream the XML payload with
//! quick-xml; the rewriter echoes every event through a writer and only
//! substitutes the text of matching fields.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

pub(crate) const TEXT_INPUT_ELEMENT: &[u8] = b"text:text-input";
pub(crate) const DESCRIPTION_ATTRIBUTE: &str = "text:description";
pub(crate) const IMPORT_DESCRIPTION: &str = "import";

/// Content of one placeholder element, captured between its start and end tags.
struct FieldContent {
    events: Vec<Event<'static>>,
    text: String,
    end: BytesEnd<'static>,
}

/// Tracks element nesting so truncated or rootless payloads are rejected.
#[derive(Default)]
struct Nesting {
    depth: usize,
    saw_root: bool,
}

impl Nesting {
    fn open(&mut self) {
        self.saw_root = true;
        self.depth += 1;
    }

    fn leaf(&mut self) {
        self.saw_root = true;
    }

    fn close(&mut self) -> Result<()> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| Error::malformed("end tag without matching start tag"))?;
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        if self.depth > 0 {
            return Err(Error::malformed(format!(
                "unexpected end of document with {} unclosed element(s)",
                self.depth
            )));
        }
        if !self.saw_root {
            return Err(Error::malformed("document has no root element"));
        }
        Ok(())
    }
}

/// Returns the text of every import placeholder in document order.
///
/// Duplicates are kept; an empty result is not an error.
pub fn extract_placeholders(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut placeholders = Vec::new();
    let mut nesting = Nesting::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(Error::malformed)? {
            Event::Start(e) => {
                let start = e.into_owned();
                if is_import_field(&start)? {
                    nesting.leaf();
                    let field = read_field_content(&mut reader)?;
                    placeholders.push(field.text);
                } else {
                    nesting.open();
                }
            }
            Event::Empty(e) => {
                nesting.leaf();
                if is_import_field(&e)? {
                    placeholders.push(String::new());
                }
            }
            Event::End(_) => nesting.close()?,
            Event::GeneralRef(e) => resolve_reference(&e, &mut String::new())?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    nesting.finish()?;
    Ok(placeholders)
}

/// Rewrites every placeholder whose text equals `target` exactly.
///
/// Returns `Ok(None)` when nothing changed (no match, or `target` equal to
/// `replacement`), so the caller can leave the member
/// byte-for-byte untouched. Otherwise returns the re-serialized payload and the
/// number of rewritten fields. `indent` is the number of spaces per nesting
/// level; `0` disables indentation.
pub fn replace_placeholders(
    xml: &[u8],
    target: &str,
    replacement: &str,
    indent: usize,
) -> Result<Option<(Vec<u8>, usize)>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut writer = if indent > 0 {
        Writer::new_with_indent(Vec::with_capacity(xml.len()), b' ', indent)
    } else {
        Writer::new(Vec::with_capacity(xml.len()))
    };

    let mut replaced = 0usize;
    let mut nesting = Nesting::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(Error::malformed)?;
        match event {
            Event::Start(e) => {
                let start = e.into_owned();
                if is_import_field(&start)? {
                    nesting.leaf();
                    let field = read_field_content(&mut reader)?;
                    if field.text == target && target != replacement {
                        write_replacement(&mut writer, start, field.end, replacement)?;
                        replaced += 1;
                    } else {
                        write(&mut writer, Event::Start(start))?;
                        for inner in field.events {
                            write(&mut writer, inner)?;
                        }
                        write(&mut writer, Event::End(field.end))?;
                    }
                } else {
                    nesting.open();
                    write(&mut writer, Event::Start(start))?;
                }
            }
            Event::Empty(e) => {
                nesting.leaf();
                if target.is_empty() && !replacement.is_empty() && is_import_field(&e)? {
                    let start = e.into_owned();
                    let end = start.to_end().into_owned();
                    write_replacement(&mut writer, start, end, replacement)?;
                    replaced += 1;
                } else {
                    write(&mut writer, Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                nesting.close()?;
                write(&mut writer, Event::End(e))?;
            }
            Event::GeneralRef(e) => {
                resolve_reference(&e, &mut String::new())?;
                write(&mut writer, Event::GeneralRef(e))?;
            }
            Event::Eof => break,
            other => write(&mut writer, other)?,
        }
        buf.clear();
    }

    nesting.finish()?;

    if replaced == 0 {
        return Ok(None);
    }
    Ok(Some((writer.into_inner(), replaced)))
}

fn is_import_field(start: &BytesStart<'_>) -> Result<bool> {
    if start.name().as_ref() != TEXT_INPUT_ELEMENT {
        return Ok(false);
    }
    let Some(attr) = start
        .try_get_attribute(DESCRIPTION_ATTRIBUTE)
        .map_err(Error::malformed)?
    else {
        return Ok(false);
    };
    let value = attr.unescape_value().map_err(Error::malformed)?;
    Ok(value == IMPORT_DESCRIPTION)
}

/// Consumes events up to the end tag closing the field that was just opened.
fn read_field_content(reader: &mut Reader<&[u8]>) -> Result<FieldContent> {
    let mut events = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(Error::malformed)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(e) if depth == 0 => {
                return Ok(FieldContent {
                    events,
                    text,
                    end: e.clone().into_owned(),
                });
            }
            Event::End(_) => depth -= 1,
            Event::Text(e) => text.push_str(&e.decode().map_err(Error::malformed)?),
            Event::CData(e) => text.push_str(&e.decode().map_err(Error::malformed)?),
            Event::GeneralRef(e) => resolve_reference(e, &mut text)?,
            Event::Eof => {
                return Err(Error::malformed(
                    "unexpected end of document inside a text input field",
                ));
            }
            _ => {}
        }
        events.push(event.into_owned());
        buf.clear();
    }
}

fn resolve_reference(reference: &BytesRef<'_>, text: &mut String) -> Result<()> {
    if let Some(ch) = reference.resolve_char_ref().map_err(Error::malformed)? {
        text.push(ch);
        return Ok(());
    }
    let name = reference.decode().map_err(Error::malformed)?;
    let resolved = resolve_predefined_entity(&name)
        .ok_or_else(|| Error::malformed(format!("unknown entity reference &{name};")))?;
    text.push_str(resolved);
    Ok(())
}

fn write_replacement(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'static>,
    end: BytesEnd<'static>,
    replacement: &str,
) -> Result<()> {
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(replacement)))?;
    write(writer, Event::End(end))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::malformed(format!("failed to serialize XML: {e}")))
}
