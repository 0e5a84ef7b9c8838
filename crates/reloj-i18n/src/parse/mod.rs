//! Reader for Qt Linguist `.ts` documents.
//!
//! The document is consumed as a stream of `quick-xml` events. Structure is
//! checked strictly: a missing `<source>`, `<translation>` or `<location>`
//! fails the whole load instead of producing a partial catalog.


use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::catalog::{Catalog, Entry, Location, TranslationStatus};
use crate::error::CatalogLoadError;
use crate::locale::LocaleId;

/// Parse a complete `.ts` document.
pub(crate) fn parse_document(document: &str) -> Result<Catalog, CatalogLoadError> {
    let mut parser = Parser::new(document);

    let (root, open) = loop {
        match parser.next_node()? {
            Node::Element(e, open) => break (e, open),
            Node::Text(t) if t.trim().is_empty() => continue,
            Node::Text(_) | Node::Close => return Err(unexpected("document", "#text")),
            Node::Eof => return Err(parser.truncated()),
        }
    };
    let root_name = element_name(&root);
    if root_name != "TS" {
        return Err(unexpected("document", &root_name));
    }

    let language = parser
        .attr(&root, "language")?
        .filter(|l| !l.trim().is_empty())
        .ok_or(CatalogLoadError::MissingLanguage)?;
    let locale = LocaleId::parse(&language)?;
    let version = parser.attr(&root, "version")?;
    let source_language = parser
        .attr(&root, "sourcelanguage")?
        .map(|s| LocaleId::parse(&s))
        .transpose()?;

    let mut catalog = Catalog::new(locale, version, source_language);
    let mut contexts = 0usize;

    // An empty `<TS/>` has no body to read; it fails the context count below.
    if open {
        loop {
            match parser.next_node()? {
                Node::Element(e, body) => match element_name(&e).as_str() {
                    "context" if body => {
                        parser.context(&mut catalog)?;
                        contexts += 1;
                    }
                    "context" => {
                        return Err(CatalogLoadError::MissingElement {
                            parent: "context",
                            element: "name",
                            context: String::new(),
                        })
                    }
                    "defaultcodec" | "dependencies" => parser.skip(&e, body)?,
                    other => return Err(unexpected("TS", other)),
                },
                Node::Text(t) if t.trim().is_empty() => {}
                Node::Text(_) => return Err(unexpected("TS", "#text")),
                Node::Close => break,
                Node::Eof => return Err(parser.truncated()),
            }
        }
    }

    if contexts == 0 {
        return Err(CatalogLoadError::MissingElement {
            parent: "TS",
            element: "context",
            context: String::new(),
        });
    }

    // Only whitespace, comments and processing instructions may follow the root.
    loop {
        match parser.next_node()? {
            Node::Eof => break,
            Node::Text(t) if t.trim().is_empty() => {}
            Node::Element(e, _) => return Err(unexpected("document", &element_name(&e))),
            Node::Text(_) | Node::Close => return Err(unexpected("document", "#text")),
        }
    }

    Ok(catalog)
}

/// The events the structural parser cares about.
enum Node<'a> {
    /// A start or empty tag; the flag is true when content follows.
    Element(BytesStart<'a>, bool),
    Text(String),
    Close,
    Eof,
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            reader: Reader::from_str(document),
        }
    }

    fn next_node(&mut self) -> Result<Node<'a>, CatalogLoadError> {
        loop {
            let event = self.reader.read_event();
            let position = self.reader.buffer_position();
            match event {
                Ok(Event::Start(e)) => return Ok(Node::Element(e, true)),
                Ok(Event::Empty(e)) => return Ok(Node::Element(e, false)),
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| xml_error(position, e))?;
                    return Ok(Node::Text(text.into_owned()));
                }
                Ok(Event::CData(c)) => {
                    let text = c.decode().map_err(|e| xml_error(position, e))?;
                    return Ok(Node::Text(text.into_owned()));
                }
                Ok(Event::End(_)) => return Ok(Node::Close),
                Ok(Event::Eof) => return Ok(Node::Eof),
                // Declaration, doctype, comments, processing instructions.
                Ok(_) => {}
                Err(e) => return Err(xml_error(position, e)),
            }
        }
    }

    fn truncated(&self) -> CatalogLoadError {
        xml_error(self.reader.buffer_position(), "unexpected end of document")
    }

    fn attr(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>, CatalogLoadError> {
        let position = self.reader.buffer_position();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| xml_error(position, err))?;
            if attr.key.as_ref() == name.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|err| xml_error(position, err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// Consume an element's content without interpreting it.
    fn skip(&mut self, e: &BytesStart<'_>, open: bool) -> Result<(), CatalogLoadError> {
        if !open {
            return Ok(());
        }
        self.reader
            .read_to_end(e.name())
            .map(|_| ())
            .map_err(|err| xml_error(self.reader.buffer_position(), err))
    }

    /// Text content of a leaf element; child elements are an error.
    fn text(&mut self, e: &BytesStart<'_>, open: bool) -> Result<String, CatalogLoadError> {
        let mut text = String::new();
        if !open {
            return Ok(text);
        }
        loop {
            match self.next_node()? {
                Node::Text(t) => text.push_str(&t),
                Node::Element(child, _) => {
                    return Err(unexpected(&element_name(e), &element_name(&child)))
                }
                Node::Close => return Ok(text),
                Node::Eof => return Err(self.truncated()),
            }
        }
    }

    /// Parse a `<context>` body and add its messages to `catalog`.
    fn context(&mut self, catalog: &mut Catalog) -> Result<(), CatalogLoadError> {
        let mut name: Option<String> = None;
        let mut messages: Vec<Entry> = Vec::new();

        loop {
            match self.next_node()? {
                Node::Element(e, open) => match element_name(&e).as_str() {
                    "name" => {
                        let value = self.text(&e, open)?;
                        set_once(&mut name, value, "context", "name", "")?;
                    }
                    "message" => {
                        let context = name.as_deref().unwrap_or_default();
                        if !open {
                            return Err(missing("message", "source", context));
                        }
                        let entry = self.message(&e, context)?;
                        messages.push(entry);
                    }
                    "comment" => self.skip(&e, open)?,
                    other => return Err(unexpected("context", other)),
                },
                Node::Text(t) if t.trim().is_empty() => {}
                Node::Text(_) => return Err(unexpected("context", "#text")),
                Node::Close => break,
                Node::Eof => return Err(self.truncated()),
            }
        }

        let name = name.ok_or_else(|| missing("context", "name", ""))?;
        for mut entry in messages {
            entry.context = name.clone();
            catalog.insert(entry)?;
        }
        Ok(())
    }

    /// Parse a `<message>` body. The returned entry's context is filled in
    /// by the caller once the context name is known.
    fn message(&mut self, start: &BytesStart<'_>, context: &str) -> Result<Entry, CatalogLoadError> {
        if self.attr(start, "numerus")?.as_deref() == Some("yes") {
            return Err(CatalogLoadError::Unsupported(format!(
                "plural message in context {context:?}"
            )));
        }

        let mut locations = Vec::new();
        let mut source: Option<String> = None;
        let mut disambiguation: Option<String> = None;
        let mut extra_comment: Option<String> = None;
        let mut translation: Option<(String, TranslationStatus)> = None;

        loop {
            match self.next_node()? {
                Node::Element(e, open) => match element_name(&e).as_str() {
                    "location" => {
                        locations.push(self.location(&e)?);
                        self.skip(&e, open)?;
                    }
                    "source" => {
                        let value = self.text(&e, open)?;
                        set_once(&mut source, value, "message", "source", context)?;
                    }
                    "comment" => {
                        let value = self.text(&e, open)?;
                        set_once(&mut disambiguation, value, "message", "comment", context)?;
                    }
                    "extracomment" => {
                        let value = self.text(&e, open)?;
                        set_once(
                            &mut extra_comment,
                            value,
                            "message",
                            "extracomment",
                            context,
                        )?;
                    }
                    "translation" => {
                        if translation.is_some() {
                            return Err(CatalogLoadError::DuplicateElement {
                                parent: "message",
                                element: "translation",
                                context: context.to_string(),
                            });
                        }
                        let status = self.status(&e)?;
                        translation = Some((self.text(&e, open)?, status));
                    }
                    "translatorcomment" | "oldsource" | "oldcomment" | "userdata" => {
                        self.skip(&e, open)?
                    }
                    other if other.starts_with("extra-") => self.skip(&e, open)?,
                    other => return Err(unexpected("message", other)),
                },
                Node::Text(t) if t.trim().is_empty() => {}
                Node::Text(_) => return Err(unexpected("message", "#text")),
                Node::Close => break,
                Node::Eof => return Err(self.truncated()),
            }
        }

        let source = source.ok_or_else(|| missing("message", "source", context))?;
        let (translation, status) =
            translation.ok_or_else(|| missing("message", "translation", context))?;
        if locations.is_empty() {
            return Err(missing("message", "location", context));
        }

        Ok(Entry {
            context: String::new(),
            source,
            disambiguation,
            translation,
            status,
            locations,
            extra_comment,
        })
    }

    fn location(&self, e: &BytesStart<'_>) -> Result<Location, CatalogLoadError> {
        let filename = self
            .attr(e, "filename")?
            .ok_or(CatalogLoadError::MissingAttribute {
                element: "location",
                attribute: "filename",
            })?;
        let line = self.attr(e, "line")?.ok_or(CatalogLoadError::MissingAttribute {
            element: "location",
            attribute: "line",
        })?;
        let line = line
            .trim()
            .parse::<u32>()
            .map_err(|_| CatalogLoadError::InvalidAttribute {
                element: "location",
                attribute: "line",
                value: line.clone(),
            })?;
        Ok(Location { filename, line })
    }

    fn status(&self, e: &BytesStart<'_>) -> Result<TranslationStatus, CatalogLoadError> {
        let kind = self.attr(e, "type")?;
        TranslationStatus::from_attr(kind.as_deref()).ok_or_else(|| {
            CatalogLoadError::InvalidAttribute {
                element: "translation",
                attribute: "type",
                value: kind.unwrap_or_default(),
            }
        })
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn xml_error(position: u64, err: impl std::fmt::Display) -> CatalogLoadError {
    CatalogLoadError::Xml {
        position,
        message: err.to_string(),
    }
}

fn unexpected(parent: &str, element: &str) -> CatalogLoadError {
    CatalogLoadError::UnexpectedElement {
        parent: parent.to_string(),
        element: element.to_string(),
    }
}

fn missing(parent: &'static str, element: &'static str, context: &str) -> CatalogLoadError {
    CatalogLoadError::MissingElement {
        parent,
        element,
        context: context.to_string(),
    }
}

fn set_once(
    slot: &mut Option<String>,
    value: String,
    parent: &'static str,
    element: &'static str,
    context: &str,
) -> Result<(), CatalogLoadError> {
    if slot.is_some() {
        return Err(CatalogLoadError::DuplicateElement {
            parent,
            element,
            context: context.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}
